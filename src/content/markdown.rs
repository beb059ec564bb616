//! Markdown rendering with optional syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::html_escape;
use crate::render::{ConversionError, MarkupConverter};

struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

/// Markdown renderer, GitHub flavoured
pub struct MarkdownRenderer {
    highlighter: Option<Highlighter>,
}

impl MarkdownRenderer {
    /// Create a renderer that leaves code blocks unhighlighted
    pub fn new() -> Self {
        Self { highlighter: None }
    }

    /// Create a renderer that highlights fenced code with a syntect theme
    pub fn with_highlight(theme: &str, line_numbers: bool) -> Result<Self, ConversionError> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme)
            .ok_or_else(|| ConversionError::UnknownTheme(theme.to_string()))?;

        Ok(Self {
            highlighter: Some(Highlighter {
                syntax_set: SyntaxSet::load_defaults_newlines(),
                theme,
                line_numbers,
            }),
        })
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::new();
        match &self.highlighter {
            Some(highlighter) => {
                html::push_html(&mut html_output, highlight_events(parser, highlighter))
            }
            None => html::push_html(&mut html_output, parser),
        }
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupConverter for MarkdownRenderer {
    fn convert(&self, source: &str) -> Result<String, ConversionError> {
        Ok(self.render(source))
    }
}

/// Replace code blocks with pre-highlighted HTML
fn highlight_events<'a>(
    parser: Parser<'a>,
    highlighter: &Highlighter,
) -> impl Iterator<Item = Event<'a>> {
    let mut events: Vec<Event> = Vec::new();
    let mut in_code_block = false;
    let mut code_block_lang: Option<String> = None;
    let mut code_block_content = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                code_block_lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                code_block_content.clear();
            }
            Event::End(TagEnd::CodeBlock) => {
                let highlighted =
                    highlighter.highlight(&code_block_content, code_block_lang.as_deref());
                events.push(Event::Html(CowStr::from(highlighted)));
                in_code_block = false;
                code_block_lang = None;
            }
            Event::Text(text) if in_code_block => code_block_content.push_str(&text),
            _ => events.push(event),
        }
    }

    events.into_iter()
}

impl Highlighter {
    /// Highlight a code block
    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme) {
            Ok(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Ok(highlighted) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang, highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                )
            }
        }
    }
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let gutter = (1..=code.lines().count())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");
    let code_lines = code.lines().collect::<Vec<_>>().join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang, gutter, code_lines
    )
}
