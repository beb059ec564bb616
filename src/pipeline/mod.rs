//! Fetch → render → DOM pipelines
//!
//! Each pipeline moves through `Pending -> Fetched -> Rendered`, or to
//! `Failed` on the first error. Nothing is retried. The fetch half is async
//! and borrows nothing from the document, so several pipelines can fetch
//! concurrently and render one after another afterwards.

use thiserror::Error;

use crate::content::PostEntry;
use crate::dom::{ContainerRef, DomHost};
use crate::fetch::{FetchError, Fetcher, Shape};
use crate::render::{ListRenderer, MarkupConverter, MarkupRenderer, RenderError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Where a pipeline run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Fetched,
    Rendered,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Rendered | Stage::Failed)
    }
}

/// A fetched list of posts, in response order
#[derive(Debug, Clone, PartialEq)]
pub struct PostList(Vec<PostEntry>);

impl PostList {
    pub fn entries(&self) -> &[PostEntry] {
        &self.0
    }
}

/// Raw text of a fetched markup resource
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupDocument(String);

impl MarkupDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn track<T, E: Into<PipelineError>>(
    stage: &mut Stage,
    next: Stage,
    resource: &str,
    result: Result<T, E>,
) -> Result<T, PipelineError> {
    match result {
        Ok(value) => {
            *stage = next;
            tracing::debug!("{}: {:?}", resource, next);
            Ok(value)
        }
        Err(e) => {
            *stage = Stage::Failed;
            let e = e.into();
            tracing::debug!("{}: failed: {}", resource, e);
            Err(e)
        }
    }
}

/// Fetches a JSON list of posts and appends it to a container as links
pub struct PostListPipeline {
    resource: String,
    container: ContainerRef,
    renderer: ListRenderer,
    stage: Stage,
}

impl PostListPipeline {
    pub fn new(resource: impl Into<String>, container: ContainerRef, renderer: ListRenderer) -> Self {
        Self {
            resource: resource.into(),
            container,
            renderer,
            stage: Stage::Pending,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Fetch and decode the list
    pub async fn fetch<F: Fetcher>(&mut self, fetcher: &F) -> Result<PostList, PipelineError> {
        let result = fetch_posts(fetcher, &self.resource).await;
        track(&mut self.stage, Stage::Fetched, &self.resource, result)
    }

    /// Append the fetched entries to the container
    pub fn render<D: DomHost>(&mut self, posts: PostList, dom: &mut D) -> Result<usize, PipelineError> {
        let result = self
            .renderer
            .render(posts.entries(), dom, &self.container)
            .map(|()| posts.0.len());
        track(&mut self.stage, Stage::Rendered, &self.resource, result)
    }

    /// Fetch, then render
    pub async fn run<F: Fetcher, D: DomHost>(
        &mut self,
        fetcher: &F,
        dom: &mut D,
    ) -> Result<usize, PipelineError> {
        let posts = self.fetch(fetcher).await?;
        self.render(posts, dom)
    }
}

async fn fetch_posts<F: Fetcher>(fetcher: &F, resource: &str) -> Result<PostList, FetchError> {
    let value = fetcher.fetch(resource, Shape::Json).await?.into_json().map_err(|source| {
        FetchError::Decode {
            url: resource.to_string(),
            source,
        }
    })?;

    PostEntry::list_from_json(value)
        .map(PostList)
        .map_err(|source| FetchError::Decode {
            url: resource.to_string(),
            source,
        })
}

/// Fetches a markup document and replaces a container's content with it
pub struct MarkupPipeline<C> {
    resource: String,
    container: ContainerRef,
    renderer: MarkupRenderer<C>,
    stage: Stage,
}

impl<C: MarkupConverter> MarkupPipeline<C> {
    pub fn new(resource: impl Into<String>, container: ContainerRef, converter: C) -> Self {
        Self {
            resource: resource.into(),
            container,
            renderer: MarkupRenderer::new(converter),
            stage: Stage::Pending,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn container(&self) -> &ContainerRef {
        &self.container
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Fetch the document as text
    pub async fn fetch<F: Fetcher>(&mut self, fetcher: &F) -> Result<MarkupDocument, PipelineError> {
        let result = fetcher
            .fetch(&self.resource, Shape::Text)
            .await
            .map(|fetched| MarkupDocument(fetched.into_text()));
        track(&mut self.stage, Stage::Fetched, &self.resource, result)
    }

    /// Convert the document and replace the container's content
    pub fn render<D: DomHost>(
        &mut self,
        document: MarkupDocument,
        dom: &mut D,
    ) -> Result<(), PipelineError> {
        let result = self.renderer.render(document.as_str(), dom, &self.container);
        track(&mut self.stage, Stage::Rendered, &self.resource, result)
    }

    /// Fetch, then render
    pub async fn run<F: Fetcher, D: DomHost>(
        &mut self,
        fetcher: &F,
        dom: &mut D,
    ) -> Result<(), PipelineError> {
        let document = self.fetch(fetcher).await?;
        self.render(document, dom)
    }
}
