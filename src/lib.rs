//! # fxl2html
//!
//! Turn a fixed-layout EPUB into one self-contained HTML file.
//!
//! Every page is stacked vertically inside a fixed-size frame, and all
//! images and fonts are inlined as `data:` URIs, so the result opens in any
//! browser with no external files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use fxl2html::{Config, Converter};
//!
//! let converter = Converter::new(Config::default());
//! let result = converter.convert(Path::new("magazine.epub"), Path::new("magazine.html"))?;
//! println!("{} pages", result.pages);
//! # Ok::<(), fxl2html::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. [`archive`] unpacks the EPUB into a scratch directory.
//! 2. [`layout`] finds the directory holding `page-<N>.xhtml` files.
//! 3. [`assets`] encodes fonts and images.
//! 4. [`stylesheet`] concatenates the CSS and inlines fonts.
//! 5. [`page`] normalizes each page body.
//! 6. [`document`] stacks the pages into the final document.

pub mod archive;
pub mod assets;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod layout;
pub mod page;
pub mod stylesheet;
pub mod util;

pub use assets::{AssetKind, AssetTable, MediaFormat};
pub use config::Config;
pub use convert::{Conversion, Converter, convert, default_output_path};
pub use error::{Error, Result};
pub use layout::PageFile;
