//! Font and image encoding into `data:` URIs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

/// Embeddable media formats, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    /// TrueType font
    Ttf,
    /// OpenType font
    Otf,
    /// WOFF font
    Woff,
    /// WOFF2 font
    Woff2,
    /// GIF image
    Gif,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
}

impl MediaFormat {
    /// Detect the format from a file name's extension (case-insensitive).
    ///
    /// Returns `None` for unsupported extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttf" => Some(MediaFormat::Ttf),
            "otf" => Some(MediaFormat::Otf),
            "woff" => Some(MediaFormat::Woff),
            "woff2" => Some(MediaFormat::Woff2),
            "gif" => Some(MediaFormat::Gif),
            "png" => Some(MediaFormat::Png),
            "jpg" | "jpeg" => Some(MediaFormat::Jpeg),
            _ => None,
        }
    }

    /// Get the MIME type string for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaFormat::Ttf => "font/ttf",
            MediaFormat::Otf => "font/otf",
            MediaFormat::Woff => "font/woff",
            MediaFormat::Woff2 => "font/woff2",
            MediaFormat::Gif => "image/gif",
            MediaFormat::Png => "image/png",
            MediaFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn is_font(self) -> bool {
        matches!(
            self,
            MediaFormat::Ttf | MediaFormat::Otf | MediaFormat::Woff | MediaFormat::Woff2
        )
    }

    pub fn kind(self) -> AssetKind {
        if self.is_font() {
            AssetKind::Font
        } else {
            AssetKind::Image
        }
    }
}

/// Which table an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Font,
    Image,
}

/// Build a self-describing `data:` URI for `data`.
pub fn encode_data_uri(format: MediaFormat, data: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data))
}

/// File name → `data:` URI mapping for one kind of asset.
#[derive(Debug, Clone)]
pub struct AssetTable {
    kind: AssetKind,
    entries: BTreeMap<String, String>,
}

impl AssetTable {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Encode every supported file of `kind` directly inside `dir`.
    ///
    /// A missing directory gives an empty table. Files with other
    /// extensions, subdirectories and unreadable files are skipped.
    pub fn load(dir: &Path, kind: AssetKind) -> Self {
        let mut table = Self::new(kind);

        let Ok(read_dir) = fs::read_dir(dir) else {
            debug!(dir = %dir.display(), ?kind, "Asset directory not present");
            return table;
        };

        let mut paths: Vec<_> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let Some(format) = MediaFormat::from_path(&path) else {
                continue;
            };
            if format.kind() != kind {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match fs::read(&path) {
                Ok(data) => table.insert(name, format, &data),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable asset"),
            }
        }

        debug!(dir = %dir.display(), kind = ?table.kind, count = table.len(), "Encoded assets");
        table
    }

    /// Add an asset. An existing entry with the same name is replaced.
    pub fn insert(&mut self, name: impl Into<String>, format: MediaFormat, data: &[u8]) {
        self.entries
            .insert(name.into(), encode_data_uri(format, data));
    }

    /// Look up the `data:` URI for a file name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
