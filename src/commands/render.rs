//! Render fetched content into the site page

use anyhow::{Context, Result};
use futures::future::join_all;
use std::fs;
use std::path::PathBuf;

use crate::dom::{ContainerRef, Document};
use crate::fetch::HttpFetcher;
use crate::pipeline::{MarkupPipeline, PipelineError, PostListPipeline};
use crate::render::ListRenderer;
use crate::Site;

/// Outcome of a render run
#[derive(Debug)]
pub struct Report {
    /// Where the filled page was written
    pub output: PathBuf,
    /// Pipelines that rendered
    pub rendered: usize,
    /// Pipelines that failed, by resource
    pub failures: Vec<(String, PipelineError)>,
}

/// Fetch every configured resource, render into the page and write it.
///
/// Pipelines fail independently: the page is written with whatever
/// rendered, and the failures are reported in the returned [`Report`].
pub async fn run(site: &Site, url: Option<&str>) -> Result<Report> {
    let start = std::time::Instant::now();
    let config = &site.config;

    let page_path = site.base_dir.join(&config.page);
    let page = fs::read_to_string(&page_path)
        .with_context(|| format!("Failed to read page {:?}", page_path))?;
    let mut document = Document::parse(&page)?;

    let fetcher = HttpFetcher::new(url.unwrap_or(config.url.as_str()))?;
    let converter = site.markdown_renderer()?;
    tracing::info!("Fetching from {}", fetcher.base());

    let mut posts = (!config.posts.endpoint.is_empty()).then(|| {
        PostListPipeline::new(
            config.posts.endpoint.clone(),
            ContainerRef::new(config.posts.container.clone()),
            ListRenderer::new(config.posts.item_class.clone(), config.posts.escape),
        )
    });
    let mut documents: Vec<_> = config
        .markdown
        .iter()
        .map(|source| {
            MarkupPipeline::new(
                source.endpoint.clone(),
                ContainerRef::new(source.container.clone()),
                &converter,
            )
        })
        .collect();

    // Fetches run concurrently, renders run in configuration order
    let (post_list, fetched_documents) = tokio::join!(
        async {
            match posts.as_mut() {
                Some(pipeline) => Some(pipeline.fetch(&fetcher).await),
                None => None,
            }
        },
        join_all(documents.iter_mut().map(|pipeline| pipeline.fetch(&fetcher)))
    );

    let mut rendered = 0;
    let mut failures = Vec::new();

    if let (Some(pipeline), Some(fetched)) = (posts.as_mut(), post_list) {
        match fetched.and_then(|list| pipeline.render(list, &mut document)) {
            Ok(count) => {
                tracing::info!("Rendered {} posts into {}", count, pipeline.container());
                rendered += 1;
            }
            Err(e) => failures.push((pipeline.resource().to_string(), e)),
        }
    }

    for (pipeline, fetched) in documents.iter_mut().zip(fetched_documents) {
        match fetched.and_then(|doc| pipeline.render(doc, &mut document)) {
            Ok(()) => {
                tracing::info!("Rendered {} into {}", pipeline.resource(), pipeline.container());
                rendered += 1;
            }
            Err(e) => failures.push((pipeline.resource().to_string(), e)),
        }
    }

    for (resource, e) in &failures {
        tracing::error!("{}: {}", resource, e);
    }

    let output = site.base_dir.join(&config.output);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, document.write_page(&page)?)?;

    let duration = start.elapsed();
    tracing::info!(
        "Wrote {:?} in {:.2}s ({} rendered, {} failed)",
        output,
        duration.as_secs_f64(),
        rendered,
        failures.len()
    );

    Ok(Report {
        output,
        rendered,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use std::path::Path;

    const PAGE: &str = r#"<html><body><ul id="posts-list"></ul><div id="about">Loading</div><div id="notes">keep</div></body></html>"#;

    async fn spawn_site(dir: &Path) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = crate::server::router(dir.to_path_buf());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn write_site(dir: &Path, markdown: &str) {
        fs::write(dir.join("index.html"), PAGE).unwrap();
        fs::write(
            dir.join("posts.json"),
            r#"[{"path":"/p1","title":"Hello"},{"path":"/p2","title":"World"}]"#,
        )
        .unwrap();
        fs::write(dir.join("about.md"), "# Title").unwrap();
        fs::write(dir.join("_config.yml"), markdown).unwrap();
    }

    #[tokio::test]
    async fn test_render_page() {
        let dir = tempfile::tempdir().unwrap();
        write_site(
            dir.path(),
            "markdown:\n  - endpoint: about.md\n    container: about\n",
        );
        let url = spawn_site(dir.path()).await;

        let site = Site::new(dir.path()).unwrap();
        let report = site.render(Some(&url)).await.unwrap();

        assert_eq!(report.rendered, 2);
        assert!(report.failures.is_empty());
        let html = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(html.contains(
            r#"<ul id="posts-list"><li class="list-group-item"><a href="/p1">Hello</a></li><li class="list-group-item"><a href="/p2">World</a></li></ul>"#
        ));
        assert!(html.contains("<div id=\"about\"><h1>Title</h1>\n</div>"));
        assert!(html.contains(r#"<div id="notes">keep</div>"#));
    }

    #[tokio::test]
    async fn test_failed_pipeline_leaves_its_container() {
        let dir = tempfile::tempdir().unwrap();
        write_site(
            dir.path(),
            "markdown:\n  - endpoint: missing.md\n    container: about\n  - endpoint: about.md\n    container: nowhere\n",
        );
        let url = spawn_site(dir.path()).await;

        let site = Site::new(dir.path()).unwrap();
        let report = site.render(Some(&url)).await.unwrap();

        assert_eq!(report.rendered, 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].0, "missing.md");
        assert!(matches!(
            report.failures[0].1,
            PipelineError::Fetch(FetchError::HttpStatus { code: 404, .. })
        ));
        assert_eq!(report.failures[1].0, "about.md");

        let html = fs::read_to_string(&report.output).unwrap();
        assert!(html.contains(r#"<div id="about">Loading</div>"#));
        assert!(html.contains("Hello"));
    }

    #[tokio::test]
    async fn test_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(site.render(Some("http://127.0.0.1:1/")).await.is_err());
    }
}
