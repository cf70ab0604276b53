//! Conversion settings.
//!
//! Page dimensions default to the A4-in-points viewport used by the
//! fixed-layout exports this tool targets. Other viewports can be supplied
//! through a JSON file:
//!
//! ```json
//! { "pageWidth": 768, "pageHeight": 1024, "title": "Brochure" }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_WIDTH: f64 = 595.28;
pub const DEFAULT_PAGE_HEIGHT: f64 = 841.89;

/// Settings injected into the document assembler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Width of every page frame, in CSS px.
    pub page_width: f64,
    /// Height of every page frame, in CSS px.
    pub page_height: f64,
    /// Contents of the `<title>` element.
    pub title: String,
    /// Heading shown above the first page.
    pub heading: String,
    /// `lang` attribute of the output `<html>` element.
    pub lang: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            title: "Converted EPUB document".to_string(),
            heading: "Converted document".to_string(),
            lang: "en".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_json_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Page dimensions must be finite and positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("pageWidth", self.page_width), ("pageHeight", self.page_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
