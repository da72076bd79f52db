use pulldown_cmark_escape::escape_html;
use std::fmt::Write;

use crate::deck::style::{Justify, StyleMap};

/// Wrap a rendered HTML fragment in a complete, self-contained document.
///
/// The document carries every style it needs in an embedded `<style>` block
/// so the display surface has no external stylesheet dependencies. Colors,
/// font, and size come from the slide's resolved style with fixed fallbacks.
///
/// Center justification is deliberately asymmetric: headings and paragraphs
/// center their text, while lists and code blocks are centered as intrinsic-
/// width blocks whose inner text stays left-aligned with indentation intact.
/// Tables span the full width in every mode.
pub fn compose(html: &str, style: &StyleMap, title: &str) -> String {
    let mut escaped_title = String::new();
    let _ = escape_html(&mut escaped_title, title);

    let justify = style.justify();
    let mut css = String::with_capacity(1024);
    let _ = write!(
        css,
        "body {{\n  \
           margin: 0;\n  \
           padding: 20px;\n  \
           background-color: {background};\n  \
           color: {text};\n  \
           font-family: {font};\n  \
           font-size: {size}px;\n  \
           text-align: {align};\n  \
           overflow: hidden;\n\
         }}\n",
        background = style.background_color(),
        text = style.text_color(),
        font = style.font(),
        size = style.font_size(),
        align = match justify {
            Justify::Left => "left",
            Justify::Center => "center",
        },
    );
    css.push_str(BASE_RULES);
    if justify == Justify::Center {
        css.push_str(CENTER_RULES);
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>{escaped_title}</title>\n\
         <style>\n{css}</style>\n\
         </head>\n\
         <body>\n{html}\n</body>\n\
         </html>\n"
    )
}

const BASE_RULES: &str = "\
pre {
  background-color: #f5f5f5;
  padding: 10px;
  border-radius: 5px;
  overflow-x: auto;
  text-align: left;
}
code {
  font-family: monospace;
}
img {
  max-width: 100%;
  height: auto;
}
table {
  border-collapse: collapse;
  width: 100%;
}
th, td {
  border: 1px solid #ddd;
  padding: 8px;
}
th {
  background-color: #f2f2f2;
}
";

/// Extra rules emitted only for `justify: center`. Lists keep their text
/// left-aligned inside a centered, intrinsically sized box; block quotes are
/// width-constrained and centered; tables stay full-width.
const CENTER_RULES: &str = "\
h1, h2, h3, h4, h5, h6, p {
  text-align: center;
}
ul, ol {
  width: fit-content;
  margin-left: auto;
  margin-right: auto;
  text-align: left;
}
pre {
  width: fit-content;
  margin-left: auto;
  margin-right: auto;
}
blockquote {
  max-width: 75%;
  margin-left: auto;
  margin-right: auto;
}
";

#[cfg(test)]
mod tests {
    use super::*;

    fn style_of(yaml: &str) -> StyleMap {
        let over: StyleMap = serde_yaml::from_str(yaml).expect("style yaml");
        StyleMap::defaults().merged(&over)
    }

    #[test]
    fn test_complete_document() {
        let doc = compose("<h1>Hi</h1>", &StyleMap::defaults(), "Deck");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Deck</title>"));
        assert!(doc.contains("<style>"));
        assert!(doc.contains("<body>\n<h1>Hi</h1>\n</body>"));
    }

    #[test]
    fn test_style_values_applied() {
        let style = style_of(
            "font: Georgia\nfontSize: 36\nbackgroundColor: \"#222222\"\ntextColor: \"#EEEEEE\"",
        );
        let doc = compose("<p>x</p>", &style, "t");
        assert!(doc.contains("background-color: #222222;"));
        assert!(doc.contains("color: #EEEEEE;"));
        assert!(doc.contains("font-family: Georgia;"));
        assert!(doc.contains("font-size: 36px;"));
    }

    #[test]
    fn test_fallbacks_when_keys_absent() {
        let doc = compose("<p>x</p>", &StyleMap::default(), "t");
        assert!(doc.contains("background-color: #FFFFFF;"));
        assert!(doc.contains("color: #000000;"));
        assert!(doc.contains("font-family: Helvetica;"));
        assert!(doc.contains("font-size: 24px;"));
        assert!(doc.contains("text-align: left;"));
    }

    #[test]
    fn test_center_emits_list_override() {
        let doc = compose("<ul><li>a</li></ul>", &style_of("justify: center"), "t");
        assert!(doc.contains("ul, ol {"));
        assert!(doc.contains("width: fit-content;"));
        assert!(doc.contains("margin-left: auto;"));
        // List text stays left-aligned inside the centered block
        let tail = &doc[doc.find("ul, ol {").unwrap()..];
        let rule_body = &tail[..tail.find('}').unwrap()];
        assert!(rule_body.contains("text-align: left;"));
    }

    #[test]
    fn test_left_emits_no_override_block() {
        let doc = compose("<ul><li>a</li></ul>", &StyleMap::defaults(), "t");
        assert!(!doc.contains("fit-content"));
        assert!(doc.contains("text-align: left;"));
    }

    #[test]
    fn test_tables_full_width_in_both_modes() {
        for style in [StyleMap::defaults(), style_of("justify: center")] {
            let doc = compose("<table></table>", &style, "t");
            assert!(doc.contains("table {\n  border-collapse: collapse;\n  width: 100%;\n}"));
        }
    }

    #[test]
    fn test_center_constrains_blockquotes() {
        let doc = compose("<blockquote>q</blockquote>", &style_of("justify: center"), "t");
        assert!(doc.contains("blockquote {\n  max-width: 75%;"));
    }

    #[test]
    fn test_title_is_escaped() {
        let doc = compose("<p>x</p>", &StyleMap::defaults(), "a <b> & c");
        assert!(doc.contains("<title>a &lt;b&gt; &amp; c</title>"));
    }
}
