//! Final document assembly.

use std::fmt::Write;

use crate::config::Config;
use crate::util::escape_html;

/// Overlay rules appended after the source stylesheet. Declared last, they
/// win any direct conflict with the book's own CSS.
fn overlay_css(config: &Config) -> String {
    let (w, h) = (config.page_width, config.page_height);
    let mut css = String::new();
    css.push_str(
        "html, body { margin: 0; padding: 0; background: #111; \
         font-family: system-ui, -apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif; }\n",
    );
    css.push_str("body { position: static !important; }\n");
    let _ = writeln!(
        css,
        ".wrapper {{ max-width: calc({w}px + 40px); margin: 0 auto; padding: 2rem 0; }}"
    );
    css.push_str(
        "h1 { color: #f5f5f5; text-align: center; margin-bottom: 2rem; \
         font-size: 1.5rem; font-weight: 600; }\n",
    );
    css.push_str(
        ".page-label { color: #ccc; text-align: center; margin: 0 0 .5rem; \
         font-size: 0.85rem; letter-spacing: 0.08em; text-transform: uppercase; }\n",
    );
    let _ = writeln!(
        css,
        ".page {{ position: relative; width: {w}px; height: {h}px; margin: 0 auto 3rem; \
         background: #fff; box-shadow: 0 0 20px rgba(0,0,0,0.3); overflow: hidden; }}"
    );
    css.push_str(".page .body { position: relative; }\n");
    css
}

/// Stack normalized page bodies into one HTML document.
///
/// Pages are labelled and anchored by their position in `pages` (1-based),
/// so links rewritten to `#page-N` resolve inside the output.
pub fn assemble_document<S: AsRef<str>>(pages: &[S], css: &str, config: &Config) -> String {
    let body_len: usize = pages.iter().map(|p| p.as_ref().len() + 96).sum();
    let mut doc = String::with_capacity(css.len() + body_len + 1024);

    doc.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(doc, "<html lang=\"{}\">", escape_html(&config.lang));
    doc.push_str("<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(doc, "<title>{}</title>", escape_html(&config.title));
    doc.push_str("<style>\n");
    if !css.is_empty() {
        doc.push_str(css);
        doc.push('\n');
    }
    doc.push_str(&overlay_css(config));
    doc.push_str("</style>\n</head>\n<body>\n<div class=\"wrapper\">\n");
    let _ = writeln!(doc, "<h1>{}</h1>", escape_html(&config.heading));

    for (idx, content) in pages.iter().enumerate() {
        let n = idx + 1;
        let _ = writeln!(doc, "<p class=\"page-label\">Page {n}</p>");
        let _ = writeln!(doc, "<div class=\"page page-{n}\" id=\"page-{n}\">");
        doc.push_str(content.as_ref());
        doc.push_str("\n</div>\n");
    }

    doc.push_str("</div>\n</body>\n</html>\n");
    doc
}
