//! Post list rendering

use super::{EscapePolicy, RenderError};
use crate::content::PostEntry;
use crate::dom::{ContainerRef, DomHost};
use crate::helpers::html_escape;

/// Renders post entries as `<li>` items holding one link each.
///
/// Items are appended after whatever the container already holds, in entry
/// order.
#[derive(Debug, Clone)]
pub struct ListRenderer {
    item_class: String,
    escape: EscapePolicy,
}

impl ListRenderer {
    pub fn new(item_class: impl Into<String>, escape: EscapePolicy) -> Self {
        Self {
            item_class: item_class.into(),
            escape,
        }
    }

    /// Build the fragment for one entry
    pub fn item(&self, entry: &PostEntry) -> String {
        let (path, title) = match self.escape {
            EscapePolicy::Verbatim => (entry.path.clone(), entry.title.clone()),
            EscapePolicy::Escaped => (html_escape(&entry.path), html_escape(&entry.title)),
        };

        format!(
            r#"<li class="{}"><a href="{}">{}</a></li>"#,
            self.item_class, path, title
        )
    }

    /// Append one item per entry to the container
    pub fn render<D: DomHost>(
        &self,
        entries: &[PostEntry],
        dom: &mut D,
        container: &ContainerRef,
    ) -> Result<(), RenderError> {
        let element = dom
            .resolve(container)
            .ok_or_else(|| RenderError::ContainerNotFound(container.id().to_string()))?;

        for entry in entries {
            element.append_child(self.item(entry));
        }

        tracing::debug!("Appended {} items to {}", entries.len(), container);
        Ok(())
    }
}

impl Default for ListRenderer {
    fn default() -> Self {
        Self::new("list-group-item", EscapePolicy::Verbatim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Child, Document, Element};

    fn document() -> Document {
        let mut doc = Document::new();
        doc.insert("posts-list", Element::new("ul"));
        doc
    }

    fn fragments(doc: &Document, id: &str) -> Vec<String> {
        doc.get_element_by_id(id)
            .unwrap()
            .fragments()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_single_entry() {
        let mut doc = document();
        let entries = vec![PostEntry::new("Hello", "/p1")];

        ListRenderer::default()
            .render(&entries, &mut doc, &ContainerRef::new("posts-list"))
            .unwrap();

        assert_eq!(
            fragments(&doc, "posts-list"),
            vec![r#"<li class="list-group-item"><a href="/p1">Hello</a></li>"#]
        );
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let mut doc = document();
        let entries = vec![
            PostEntry::new("Zeta", "/z"),
            PostEntry::new("Alpha", "/a"),
            PostEntry::new("Zeta", "/z"),
        ];

        let renderer = ListRenderer::default();
        renderer
            .render(&entries, &mut doc, &ContainerRef::new("posts-list"))
            .unwrap();

        let expected: Vec<String> = entries.iter().map(|e| renderer.item(e)).collect();
        assert_eq!(fragments(&doc, "posts-list"), expected);
    }

    #[test]
    fn test_append_keeps_existing_children() {
        let mut doc = Document::new();
        doc.insert("posts-list", Element::from_page("ul"))
            .append_child("<li>pinned</li>");

        let renderer = ListRenderer::default();
        let container = ContainerRef::new("posts-list");
        renderer
            .render(&[PostEntry::new("One", "/1")], &mut doc, &container)
            .unwrap();
        renderer
            .render(&[PostEntry::new("Two", "/2")], &mut doc, &container)
            .unwrap();

        let children = doc.get_element_by_id("posts-list").unwrap().children();
        assert_eq!(children.len(), 4);
        assert_eq!(children[0], Child::Original);
        assert_eq!(children[1], Child::Fragment("<li>pinned</li>".to_string()));
        assert!(matches!(&children[3], Child::Fragment(html) if html.contains("Two")));
    }

    #[test]
    fn test_missing_container_leaves_document_alone() {
        let mut doc = document();
        let before = doc.clone();

        let err = ListRenderer::default()
            .render(
                &[PostEntry::new("Hello", "/p1")],
                &mut doc,
                &ContainerRef::new("nope"),
            )
            .unwrap_err();

        assert!(matches!(err, RenderError::ContainerNotFound(id) if id == "nope"));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_empty_entries_leave_container() {
        let mut doc = Document::new();
        doc.insert("posts-list", Element::from_page("ul"))
            .append_child("<li>pinned</li>");
        let before = doc.clone();

        ListRenderer::default()
            .render(&[], &mut doc, &ContainerRef::new("posts-list"))
            .unwrap();

        assert_eq!(doc, before);
    }

    #[test]
    fn test_verbatim_does_not_escape() {
        let renderer = ListRenderer::default();
        let item = renderer.item(&PostEntry::new("<b>Bold</b>", "/a?x=1&y=2"));
        assert_eq!(
            item,
            r#"<li class="list-group-item"><a href="/a?x=1&y=2"><b>Bold</b></a></li>"#
        );
    }

    #[test]
    fn test_escaped_policy() {
        let renderer = ListRenderer::new("post", EscapePolicy::Escaped);
        let item = renderer.item(&PostEntry::new("<b>Bold</b>", r#"/a"onclick="x"#));
        assert_eq!(
            item,
            r#"<li class="post"><a href="/a&quot;onclick=&quot;x">&lt;b&gt;Bold&lt;/b&gt;</a></li>"#
        );
    }
}
