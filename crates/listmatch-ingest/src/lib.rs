#![deny(unsafe_code)]

//! List and configuration ingestion.
//!
//! - **Lists**: the first column of delimited text, trimmed, blanks dropped
//! - **Configuration**: demo presets and match defaults from JSON or TOML
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use listmatch_ingest::{IngestOptions, load_config_or_default, read_list_file};
//!
//! let list_a = read_list_file(Path::new("suppliers.csv"), IngestOptions::default())?;
//! let config = load_config_or_default(Path::new("config.json"));
//! let options = config.match_options();
//! ```

mod config;
mod error;
mod list;

pub use config::{ConfigFormat, load_config, load_config_or_default, parse_config};
pub use error::{ConfigParseError, IngestError, Result};
pub use list::{
    IngestOptions, detect_delimiter, parse_first_column, parse_first_column_with_options,
    read_list_file,
};
