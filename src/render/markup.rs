//! Markup document rendering

use super::{MarkupConverter, RenderError};
use crate::dom::{ContainerRef, DomHost};

/// Renders a markup document through a converter, replacing the
/// container's content with the result.
pub struct MarkupRenderer<C> {
    converter: C,
}

impl<C: MarkupConverter> MarkupRenderer<C> {
    pub fn new(converter: C) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Convert `source` and make it the container's only content.
    ///
    /// The container is left untouched when it is missing or the conversion
    /// fails.
    pub fn render<D: DomHost>(
        &self,
        source: &str,
        dom: &mut D,
        container: &ContainerRef,
    ) -> Result<(), RenderError> {
        if dom.resolve(container).is_none() {
            return Err(RenderError::ContainerNotFound(container.id().to_string()));
        }

        let html = self.converter.convert(source)?;

        let element = dom
            .resolve(container)
            .ok_or_else(|| RenderError::ContainerNotFound(container.id().to_string()))?;
        element.replace_children(html);

        tracing::debug!("Replaced content of {}", container);
        Ok(())
    }
}
