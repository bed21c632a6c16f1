//! Configuration module for Proposal-Audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so running without a file targets the Python
//! PEP index with the stock expected-status table.
//!
//! # Example
//!
//! ```no_run
//! use proposal_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("audit.toml")).unwrap();
//! println!("Index: {}", config.site.index_url);
//! ```

mod expected;
mod parser;
mod types;
mod validation;

pub use expected::ExpectedStatusTable;
pub use types::{CacheConfig, Config, DetailConfig, FetcherConfig, OutputConfig, SiteConfig};

pub use parser::{load_config, load_or_default};
pub use validation::validate;
