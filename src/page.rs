//! Page normalization: body extraction, tag repair, asset inlining and link
//! rewriting.
//!
//! Every step is a plain text transformation. The page files come from a
//! single authoring tool with a small, predictable tag vocabulary, so pattern
//! substitution is enough and keeps attributes byte-for-byte intact.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use crate::assets::AssetTable;

/// Non-void elements whose self-closed form (`<div/>`) browsers misparse.
///
/// Void elements (`img`, `br`, `hr`, ...) are deliberately absent.
pub const NON_VOID_ELEMENTS: &[&str] = &[
    "div", "span", "p", "bdi", "a", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article",
    "header", "footer", "li", "ul", "ol", "table", "tbody", "td", "tr", "th", "strong", "em", "b",
    "i", "small", "big", "sup", "sub", "u",
];

static BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<body(?:\s[^>]*)?>(.*)</body>").unwrap());

static SELF_CLOSED: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"<({})(\b[^>]*)/>", NON_VOID_ELEMENTS.join("|"));
    Regex::new(&pattern).unwrap()
});

static IMAGE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="images/([^"/]+)""#).unwrap());
static IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\(images/([^)]+)\)").unwrap());

static PAGE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="page-([0-9]+)\.xhtml""#).unwrap());

/// Content between the first `<body ...>` tag and the last `</body>`,
/// trimmed. Empty when the page has no body.
pub fn extract_body(markup: &str) -> &str {
    BODY.captures(markup)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim())
}

/// Expand self-closed non-void elements into explicit open/close pairs.
///
/// `<div class="x"/>` becomes `<div class="x"></div>`; `<img src="a"/>`
/// is left alone. Applying it twice changes nothing further.
pub fn fix_self_closing(markup: &str) -> Cow<'_, str> {
    SELF_CLOSED.replace_all(markup, "<${1}${2}></${1}>")
}

/// Swap `src="images/<name>"` and `url(images/<name>)` for `data:` URIs.
///
/// References to files missing from `images` are kept verbatim.
pub fn inline_images(markup: &str, images: &AssetTable) -> String {
    let markup = IMAGE_SRC.replace_all(markup, |caps: &Captures| match images.get(&caps[1]) {
        Some(uri) => format!("src=\"{uri}\""),
        None => caps[0].to_string(),
    });
    IMAGE_URL
        .replace_all(&markup, |caps: &Captures| match images.get(&caps[1]) {
            Some(uri) => format!("url({uri})"),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Point `href="page-<N>.xhtml"` at the in-document anchor `#page-<N>`.
pub fn rewrite_page_links(markup: &str) -> Cow<'_, str> {
    PAGE_LINK.replace_all(markup, r##"href="#page-${1}""##)
}

/// Run the full normalization on one page's markup.
///
/// Returns `None` when the page has no body content, so it can be dropped.
pub fn normalize_page(markup: &str, images: &AssetTable) -> Option<String> {
    let body = extract_body(markup);
    if body.is_empty() {
        return None;
    }

    let body = fix_self_closing(body);
    let body = inline_images(&body, images);
    Some(rewrite_page_links(&body).into_owned())
}
