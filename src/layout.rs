//! Package root discovery and page ordering.
//!
//! Archive producers nest the package directory at different depths and
//! under different names (`OPS`, `OEBPS`, ...), so the root is found by
//! looking for page files rather than by a fixed path.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::util::natural_sort_key;

/// One fixed-layout page file, `page-<ordinal>.xhtml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    /// Number encoded in the file name. Pages are ordered by this first.
    pub ordinal: u32,
    pub path: PathBuf,
}

/// Parse the ordinal from a page file name.
///
/// Returns `None` for anything other than `page-<digits>.xhtml`
/// (extension compared case-insensitively).
pub fn page_ordinal(file_name: &str) -> Option<u32> {
    let rest = file_name.strip_prefix("page-")?;
    let dot = rest.rfind('.')?;
    let (digits, ext) = (&rest[..dot], &rest[dot + 1..]);

    if !ext.eq_ignore_ascii_case("xhtml")
        || digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

/// Every file under `root` in deterministic (file-name sorted) order.
fn sorted_files(root: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
}

fn ordinal_of(entry: &walkdir::DirEntry) -> Option<u32> {
    entry.file_name().to_str().and_then(page_ordinal)
}

/// Find the directory holding the page files.
///
/// Prefers the directory of the first page, falling back to the directory
/// of any page file.
pub fn locate_package_root(root: &Path) -> Result<PathBuf> {
    let mut fallback: Option<PathBuf> = None;

    for entry in sorted_files(root) {
        match ordinal_of(&entry) {
            Some(1) => {
                let dir = parent_dir(entry.path(), root);
                debug!(root = %dir.display(), "Found first page");
                return Ok(dir);
            }
            Some(_) if fallback.is_none() => {
                fallback = Some(parent_dir(entry.path(), root));
            }
            _ => {}
        }
    }

    match fallback {
        Some(dir) => {
            debug!(root = %dir.display(), "No first page; using first page directory found");
            Ok(dir)
        }
        None => Err(Error::Layout {
            path: root.to_path_buf(),
        }),
    }
}

fn parent_dir(path: &Path, root: &Path) -> PathBuf {
    path.parent().unwrap_or(root).to_path_buf()
}

/// All page files below `package_root`, ordered by ordinal.
///
/// Files sharing an ordinal (in different subdirectories) fall back to
/// natural path order.
pub fn find_pages(package_root: &Path) -> Vec<PageFile> {
    let mut pages: Vec<PageFile> = sorted_files(package_root)
        .filter_map(|entry| {
            let ordinal = ordinal_of(&entry)?;
            Some(PageFile {
                ordinal,
                path: entry.into_path(),
            })
        })
        .collect();

    pages.sort_by(|a, b| {
        a.ordinal.cmp(&b.ordinal).then_with(|| {
            natural_sort_key(&a.path.to_string_lossy())
                .cmp(&natural_sort_key(&b.path.to_string_lossy()))
        })
    });
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<body>x</body>").unwrap();
    }

    #[test]
    fn test_page_ordinal() {
        assert_eq!(page_ordinal("page-1.xhtml"), Some(1));
        assert_eq!(page_ordinal("page-010.xhtml"), Some(10));
        assert_eq!(page_ordinal("page-3.XHTML"), Some(3));
        assert_eq!(page_ordinal("page-.xhtml"), None);
        assert_eq!(page_ordinal("page-1a.xhtml"), None);
        assert_eq!(page_ordinal("page-1.html"), None);
        assert_eq!(page_ordinal("cover.xhtml"), None);
    }

    #[test]
    fn test_locates_root_by_first_page() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "A/page-5.xhtml");
        touch(dir.path(), "OPS/page-1.xhtml");
        touch(dir.path(), "OPS/page-2.xhtml");

        let root = locate_package_root(dir.path()).unwrap();
        assert_eq!(root, dir.path().join("OPS"));
    }

    #[test]
    fn test_falls_back_to_any_page() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "content/OEBPS/page-4.xhtml");
        touch(dir.path(), "META-INF/container.xml");

        let root = locate_package_root(dir.path()).unwrap();
        assert_eq!(root, dir.path().join("content/OEBPS"));
    }

    #[test]
    fn test_no_pages_is_layout_error() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "OPS/chapter1.xhtml");

        let err = locate_package_root(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Layout { .. }));
    }

    #[test]
    fn test_find_pages_orders_numerically() {
        let dir = TempDir::new().unwrap();
        for n in [10, 2, 1, 9] {
            touch(dir.path(), &format!("page-{n}.xhtml"));
        }
        touch(dir.path(), "toc.xhtml");

        let ordinals: Vec<u32> = find_pages(dir.path()).iter().map(|p| p.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 9, 10]);
    }

    #[test]
    fn test_find_pages_breaks_ties_by_path() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "vol10/page-1.xhtml");
        touch(dir.path(), "vol9/page-1.xhtml");

        let pages = find_pages(dir.path());
        assert_eq!(pages.len(), 2);
        assert!(pages[0].path.ends_with("vol9/page-1.xhtml"));
        assert!(pages[1].path.ends_with("vol10/page-1.xhtml"));
    }
}
