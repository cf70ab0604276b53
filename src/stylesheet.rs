//! Stylesheet collection and font inlining.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::assets::AssetTable;
use crate::util::decode_text;

/// Stylesheet directory, relative to the package root.
pub const STYLE_DIR: &str = "css";

static NESTED_FONT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\([^)]+/fonts/([^)]+)\)").unwrap());
static BARE_FONT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\(fonts/([^)]+)\)").unwrap());

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("css") || e.eq_ignore_ascii_case("scss"))
}

/// Concatenate every stylesheet fragment under `<package_root>/css`.
///
/// Fragments are read in file-name order and joined with newlines. A
/// missing style directory yields an empty string, and unreadable
/// fragments are skipped with a warning.
pub fn read_stylesheets(package_root: &Path) -> String {
    let style_dir = package_root.join(STYLE_DIR);
    if !style_dir.is_dir() {
        debug!(dir = %style_dir.display(), "No stylesheet directory");
        return String::new();
    }

    let mut fragments = Vec::new();
    for entry in WalkDir::new(&style_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_stylesheet(e.path()))
    {
        match fs::read(entry.path()) {
            Ok(bytes) => fragments.push(decode_text(&bytes, None).into_owned()),
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Skipping unreadable stylesheet")
            }
        }
    }

    debug!(count = fragments.len(), "Read stylesheet fragments");
    fragments.join("\n")
}

/// Replace `url(.../fonts/<name>)` and `url(fonts/<name>)` references with
/// `data:` URIs from `fonts`, matched by the basename of `<name>`.
///
/// Unknown fonts are left exactly as written.
pub fn embed_fonts(css: &str, fonts: &AssetTable) -> String {
    let replace = |caps: &Captures| -> String {
        match fonts.get(font_basename(&caps[1])) {
            Some(uri) => format!("url({uri})"),
            None => caps[0].to_string(),
        }
    };

    let css = NESTED_FONT_URL.replace_all(css, replace);
    BARE_FONT_URL.replace_all(&css, replace).into_owned()
}

/// Last path segment of a font reference, without surrounding quotes.
fn font_basename(reference: &str) -> &str {
    let trimmed = reference.trim().trim_end_matches(['"', '\'']).trim_end();
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, MediaFormat};
    use tempfile::TempDir;

    fn font_table() -> AssetTable {
        let mut fonts = AssetTable::new(AssetKind::Font);
        fonts.insert("Body.ttf", MediaFormat::Ttf, b"font");
        fonts
    }

    const BODY_URI: &str = "data:font/ttf;base64,Zm9udA==";

    #[test]
    fn test_embeds_nested_font_path() {
        let css = "@font-face { src: url(../fonts/Body.ttf); }";
        assert_eq!(
            embed_fonts(css, &font_table()),
            format!("@font-face {{ src: url({BODY_URI}); }}")
        );
    }

    #[test]
    fn test_embeds_bare_font_path() {
        let css = "src: url(fonts/Body.ttf) format('truetype');";
        assert_eq!(
            embed_fonts(css, &font_table()),
            format!("src: url({BODY_URI}) format('truetype');")
        );
    }

    #[test]
    fn test_embeds_by_basename_of_deeper_name() {
        let css = "src: url(fonts/sub/Body.ttf);";
        assert_eq!(embed_fonts(css, &font_table()), format!("src: url({BODY_URI});"));
    }

    #[test]
    fn test_quoted_reference() {
        let css = r#"src: url("../fonts/Body.ttf");"#;
        assert_eq!(embed_fonts(css, &font_table()), format!("src: url({BODY_URI});"));
    }

    #[test]
    fn test_unknown_font_left_unchanged() {
        let css = "a { src: url(../fonts/Missing.otf); } b { src: url(fonts/Other.woff); }";
        assert_eq!(embed_fonts(css, &font_table()), css);
    }

    #[test]
    fn test_non_font_urls_untouched() {
        let css = "div { background: url(../images/bg.png); } p { src: url(myfonts/Body.ttf); }";
        assert_eq!(embed_fonts(css, &font_table()), css);
    }

    #[test]
    fn test_read_stylesheets_concatenates_sorted() {
        let dir = TempDir::new().unwrap();
        let css_dir = dir.path().join(STYLE_DIR);
        fs::create_dir_all(css_dir.join("nested")).unwrap();
        fs::write(css_dir.join("b.css"), "b{}").unwrap();
        fs::write(css_dir.join("a.CSS"), "a{}").unwrap();
        fs::write(css_dir.join("nested/c.scss"), "c{}").unwrap();
        fs::write(css_dir.join("readme.txt"), "ignored").unwrap();

        let css = read_stylesheets(dir.path());
        assert_eq!(css, "a{}\nb{}\nc{}");
    }

    #[test]
    fn test_missing_style_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_stylesheets(dir.path()), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_stylesheet_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let css_dir = dir.path().join(STYLE_DIR);
        fs::create_dir_all(&css_dir).unwrap();
        fs::write(css_dir.join("a.css"), "a{}").unwrap();
        let locked = css_dir.join("b.css");
        fs::write(&locked, "b{}").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&locked).is_ok() {
            // Permission bits are not enforced (running as root).
            return;
        }

        assert_eq!(read_stylesheets(dir.path()), "a{}");
    }
}
