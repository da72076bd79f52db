use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use pulldown_cmark_escape::escape_html;
use std::fs;
use std::path::Path;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::error::Error;

/// Highlighting theme for fenced code blocks.
const CODE_THEME: &str = "InspiredGitHub";

/// Converts markdown source to semantic HTML.
///
/// The extension set is fixed: tables, strikethrough, and task lists, with
/// language-aware syntax highlighting for fenced code blocks. Failures never
/// escape this boundary; an unreadable slide or a highlighter error degrades
/// to an inline error fragment or a plain code block, and is logged.
/// Rendering holds no mutable state, so identical input always produces
/// identical output.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .get(CODE_THEME)
            .or_else(|| theme_set.themes.values().next())
            .cloned()
            .unwrap_or_default();
        Self { syntax_set, theme }
    }

    /// Read and render a slide file, containing read failures as an error
    /// fragment so one broken slide cannot take navigation down.
    pub fn render_file(&self, path: &Path) -> String {
        match fs::read_to_string(path) {
            Ok(text) => self.render(&text),
            Err(e) => {
                let err = Error::File(format!("failed to read slide '{}': {e}", path.display()));
                tracing::error!("{err}");
                error_fragment(&format!("Error loading slide: {e}"))
            }
        }
    }

    /// Render markdown text to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        // Intercept fenced code blocks so syntect can emit highlighted HTML;
        // everything else passes straight through to the HTML writer.
        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(String, String)> = None;
        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(lang) => lang.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some((language, String::new()));
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, buffer)) = code_block.as_mut() {
                        buffer.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, buffer)) = code_block.take() {
                        events.push(Event::Html(self.highlight(&language, &buffer).into()));
                    }
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut out, events.into_iter());
        out
    }

    fn highlight(&self, language: &str, code: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme) {
            Ok(block) => block,
            Err(e) => {
                let err = Error::Render(format!("syntax highlighting failed for '{language}': {e}"));
                tracing::warn!("{err}");
                plain_code_block(code)
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal HTML fragment shown in place of a slide that failed to render.
pub fn error_fragment(message: &str) -> String {
    let mut escaped = String::new();
    let _ = escape_html(&mut escaped, message);
    format!("<p class=\"render-error\">{escaped}</p>")
}

fn plain_code_block(code: &str) -> String {
    let mut escaped = String::new();
    let _ = escape_html(&mut escaped, code);
    format!("<pre><code>{escaped}</code></pre>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_heading_and_paragraph() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Title\n\nBody text.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Body text.</p>"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = MarkdownRenderer::new();
        let first = renderer.render("# Title\n\nBody text.");
        let second = renderer.render("# Title\n\nBody text.");
        assert_eq!(first, second);
    }

    #[test]
    fn test_table_renders() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>a</th>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_fenced_code_is_highlighted() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        // syntect emits span-styled tokens rather than a bare code block
        assert!(html.contains("<span"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```nosuchlang\nplain text\n```");
        assert!(html.contains("plain text"));
    }

    #[test]
    fn test_render_file_error_fragment() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_file(Path::new("/nonexistent/slide.md"));
        assert!(html.starts_with("<p"));
        assert!(html.contains("Error loading slide"));
    }

    #[test]
    fn test_render_file_reads_slide() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("slide.md");
        let mut file = std::fs::File::create(&path).expect("fixture");
        file.write_all(b"## Subhead").expect("fixture");
        let renderer = MarkdownRenderer::new();
        assert!(renderer.render_file(&path).contains("<h2>Subhead</h2>"));
    }

    #[test]
    fn test_error_fragment_escapes_markup() {
        let fragment = error_fragment("<script>alert(1)</script>");
        assert!(!fragment.contains("<script>"));
        assert!(fragment.contains("&lt;script&gt;"));
    }
}
