//! The conversion pipeline: archive in, single HTML document out.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::archive::extract_archive;
use crate::assets::{AssetKind, AssetTable};
use crate::config::Config;
use crate::document::assemble_document;
use crate::error::{Error, Result};
use crate::layout::{PageFile, find_pages, locate_package_root};
use crate::page::normalize_page;
use crate::stylesheet::{embed_fonts, read_stylesheets};
use crate::util::decode_markup;

/// Font directory, relative to the package root.
pub const FONTS_DIR: &str = "fonts";
/// Image directory, relative to the package root.
pub const IMAGES_DIR: &str = "images";

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Number of pages written (pages with empty bodies are not counted).
    pub pages: usize,
    pub output: PathBuf,
}

/// Fixed-layout EPUB to single-file HTML converter.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: Config,
    scratch_root: Option<PathBuf>,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scratch_root: None,
        }
    }

    /// Extract archives under `dir` instead of the system temp directory.
    pub fn with_scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }

    /// Convert `input` and return the document without touching the disk
    /// beyond the scratch directory.
    pub fn convert_to_string(&self, input: &Path) -> Result<String> {
        self.render(input).map(|(doc, _)| doc)
    }

    /// Convert `input` and write the result to `output`.
    ///
    /// The document is fully assembled before anything is written, and the
    /// destination is replaced atomically, so a failed run leaves no
    /// partial file behind.
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub fn convert(&self, input: &Path, output: &Path) -> Result<Conversion> {
        let (doc, pages) = self.render(input)?;
        write_atomic(output, doc.as_bytes())?;

        info!(pages, bytes = doc.len(), "Wrote document");
        Ok(Conversion {
            pages,
            output: output.to_path_buf(),
        })
    }

    #[instrument(skip_all, fields(input = %input.display()))]
    fn render(&self, input: &Path) -> Result<(String, usize)> {
        self.config.validate()?;

        // Dropping `scratch` removes the extracted tree on every return path.
        let scratch = extract_archive(input, self.scratch_root.as_deref())?;
        let root = locate_package_root(scratch.path()).map_err(|e| match e {
            Error::Layout { .. } => Error::Layout {
                path: input.to_path_buf(),
            },
            other => other,
        })?;

        let fonts = AssetTable::load(&root.join(FONTS_DIR), AssetKind::Font);
        let css = embed_fonts(&read_stylesheets(&root), &fonts);
        let images = AssetTable::load(&root.join(IMAGES_DIR), AssetKind::Image);

        let page_files = find_pages(&root);
        let bodies = load_bodies(&page_files, &images);

        if bodies.is_empty() {
            return Err(Error::EmptyResult {
                path: input.to_path_buf(),
                pages: page_files.len(),
            });
        }

        debug!(
            found = page_files.len(),
            kept = bodies.len(),
            fonts = fonts.len(),
            images = images.len(),
            "Normalized pages"
        );
        Ok((assemble_document(&bodies, &css, &self.config), bodies.len()))
    }
}

/// Read and normalize every page, in order.
///
/// Unreadable pages are skipped with a warning, as are pages whose body is
/// empty.
fn load_bodies(pages: &[PageFile], images: &AssetTable) -> Vec<String> {
    let mut bodies = Vec::with_capacity(pages.len());
    for page in pages {
        let bytes = match fs::read(&page.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %page.path.display(), error = %e, "Skipping unreadable page");
                continue;
            }
        };
        match normalize_page(&decode_markup(&bytes), images) {
            Some(body) => bodies.push(body),
            None => debug!(ordinal = page.ordinal, "Dropping page with empty body"),
        }
    }
    bodies
}

/// Write `data` to a temporary file next to `path`, then rename it into place.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    file.write_all(data).map_err(|e| Error::io(file.path(), e))?;
    file.flush().map_err(|e| Error::io(file.path(), e))?;
    file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// Default output location: the input path with an `.html` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("html")
}

/// Convert `input` into `output` with the given settings.
pub fn convert(input: &Path, output: &Path, config: &Config) -> Result<Conversion> {
    Converter::new(config.clone()).convert(input, output)
}
