//! In-memory DOM host
//!
//! Only the id-addressable elements of a page are modelled: renderers look a
//! container up by id, then append to it or replace its content. A
//! [`Document`] can be loaded from an HTML page and written back into it.

mod page;

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to process page: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// Handle to a container element, resolved by id when a render runs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    id: String,
}

impl ContainerRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// A child node of a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// Whatever the page held inside the element when it was loaded
    Original,
    /// An HTML fragment inserted by a renderer
    Fragment(String),
}

/// An element addressable by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    children: Vec<Child>,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
        }
    }

    /// Create an element that keeps the content it had in the source page
    pub fn from_page(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: vec![Child::Original],
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Fragments inserted by renderers, in child order
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| match child {
            Child::Fragment(html) => Some(html.as_str()),
            Child::Original => None,
        })
    }

    /// Whether the page's original content is still present
    pub fn keeps_original(&self) -> bool {
        self.children.contains(&Child::Original)
    }

    /// Add a fragment after the existing children
    pub fn append_child(&mut self, fragment: impl Into<String>) {
        self.children.push(Child::Fragment(fragment.into()));
    }

    /// Drop every child and put the fragment in their place
    pub fn replace_children(&mut self, fragment: impl Into<String>) {
        self.children = vec![Child::Fragment(fragment.into())];
    }
}

/// Element lookup by identifier
pub trait DomHost {
    fn get_element_by_id(&self, id: &str) -> Option<&Element>;

    fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Element>;

    /// Resolve a container handle
    fn resolve(&mut self, container: &ContainerRef) -> Option<&mut Element> {
        self.get_element_by_id_mut(container.id())
    }
}

/// A page's id-addressable elements in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: IndexMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element. An id already present keeps its first element.
    pub fn insert(&mut self, id: impl Into<String>, element: Element) -> &mut Element {
        self.elements.entry(id.into()).or_insert(element)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl DomHost for Document {
    fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }
}
