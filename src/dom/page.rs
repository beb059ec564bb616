//! Loading a document from an HTML page and writing it back

use indexmap::IndexMap;
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{Child, Document, DomError, Element};

enum Patch {
    Append(String),
    Replace(String),
}

impl Document {
    /// Collect every element carrying an `id` attribute
    pub fn parse(html: &str) -> Result<Self, DomError> {
        let elements: Rc<RefCell<IndexMap<String, Element>>> = Rc::default();

        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("[id]", {
                    let elements = Rc::clone(&elements);
                    move |el| {
                        // An empty id never matches a lookup
                        if let Some(id) = el.get_attribute("id").filter(|id| !id.is_empty()) {
                            elements
                                .borrow_mut()
                                .entry(id)
                                .or_insert_with(|| Element::from_page(el.tag_name()));
                        }
                        Ok(())
                    }
                })],
                ..RewriteStrSettings::default()
            },
        )?;

        Ok(Self {
            elements: elements.take(),
        })
    }

    /// Apply rendered content to the page the document was loaded from
    pub fn write_page(&self, html: &str) -> Result<String, DomError> {
        let mut patches: HashMap<String, Patch> = self
            .elements
            .iter()
            .filter_map(|(id, element)| patch_for(element).map(|patch| (id.clone(), patch)))
            .collect();

        let output = rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("[id]", move |el| {
                    let Some(id) = el.get_attribute("id").filter(|id| !id.is_empty()) else {
                        return Ok(());
                    };
                    // Only the first element with a given id receives content
                    match patches.remove(&id) {
                        Some(Patch::Append(fragment)) => el.append(&fragment, ContentType::Html),
                        Some(Patch::Replace(fragment)) => {
                            el.set_inner_content(&fragment, ContentType::Html)
                        }
                        None => {}
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::default()
            },
        )?;

        Ok(output)
    }
}

fn patch_for(element: &Element) -> Option<Patch> {
    let fragments: String = element.fragments().collect();

    match element.children().first() {
        Some(Child::Original) if fragments.is_empty() => None,
        Some(Child::Original) => Some(Patch::Append(fragments)),
        _ => Some(Patch::Replace(fragments)),
    }
}
