//! HTML to Markdown conversion
//!
//! A streaming, tag-by-tag translation: each start and end tag maps to a
//! piece of Markdown syntax and text passes through. Nesting is not
//! tracked beyond `<pre>` blocks, so the output is best-effort.

use lol_html::html_content::EndTag;
use lol_html::{
    doc_text, element, rewrite_str, EndTagHandler, HandlerResult, RewriteStrSettings,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::DomError;
use crate::helpers::html_unescape;

#[derive(Default)]
struct State {
    output: String,
    in_code_block: bool,
    text: String,
}

/// Heading level of `h1`..`h6` style tags
fn heading_level(tag: &str) -> Option<usize> {
    let mut chars = tag.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('h'), Some(d), None) => d.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

fn start_tag(state: &mut State, tag: &str, attr: impl Fn(&str) -> Option<String>) {
    if let Some(level) = heading_level(tag) {
        state.output.push('\n');
        state.output.push_str(&"#".repeat(level));
        state.output.push(' ');
        return;
    }

    match tag {
        "p" => state.output.push('\n'),
        "li" => state.output.push_str("- "),
        "pre" => {
            state.in_code_block = true;
            state.output.push_str("\n```\n");
        }
        "code" if !state.in_code_block => state.output.push('`'),
        "strong" | "b" => state.output.push_str("**"),
        "em" | "i" => state.output.push('*'),
        "br" => state.output.push_str("  \n"),
        "a" => state.output.push('['),
        "img" => {
            let src = attr("src").unwrap_or_default();
            let alt = attr("alt").unwrap_or_default();
            state.output.push_str(&format!("![{}]({})", alt, src));
        }
        _ => {}
    }
}

fn end_tag(state: &mut State, tag: &str, href: Option<&str>) {
    if heading_level(tag).is_some() {
        state.output.push('\n');
        return;
    }

    match tag {
        "p" | "li" => state.output.push('\n'),
        "pre" => {
            state.in_code_block = false;
            state.output.push_str("\n```\n");
        }
        "code" if !state.in_code_block => state.output.push('`'),
        "strong" | "b" => state.output.push_str("**"),
        "em" | "i" => state.output.push('*'),
        "a" => state.output.push_str(&format!("]({})", href.unwrap_or_default())),
        _ => {}
    }
}

/// Convert an HTML document or fragment to Markdown
pub fn html_to_markdown(html: &str) -> Result<String, DomError> {
    let state = Rc::new(RefCell::new(State::default()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", {
                let state = Rc::clone(&state);
                move |el| {
                    let tag = el.tag_name();
                    // Attribute values come back raw from the rewriter
                    let attr = |name: &str| el.get_attribute(name).map(|v| html_unescape(&v));
                    start_tag(&mut state.borrow_mut(), &tag, &attr);

                    let href = (tag == "a").then(|| attr("href").unwrap_or_default());
                    if let Some(handlers) = el.end_tag_handlers() {
                        let state = Rc::clone(&state);
                        let handler: EndTagHandler<'static> =
                            Box::new(move |_end: &mut EndTag<'_>| -> HandlerResult {
                                end_tag(&mut state.borrow_mut(), &tag, href.as_deref());
                                Ok(())
                            });
                        handlers.push(handler);
                    }
                    Ok(())
                }
            })],
            document_content_handlers: vec![doc_text!({
                let state = Rc::clone(&state);
                move |chunk| {
                    let mut state = state.borrow_mut();
                    state.text.push_str(chunk.as_str());
                    if chunk.last_in_text_node() {
                        let text = std::mem::take(&mut state.text);
                        state.output.push_str(&html_unescape(&text));
                    }
                    Ok(())
                }
            })],
            ..RewriteStrSettings::default()
        },
    )?;

    let output = std::mem::take(&mut state.borrow_mut().output);
    Ok(output)
}
