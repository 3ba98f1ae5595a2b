//! Core library for adcheck.
//!
//! This crate provides the validators used by the `adcheck` CLI and MCP
//! server, and by any downstream consumers.
//!
//! # Modules
//!
//! - [`length`] - Check a piece of text against a character limit
//! - [`ads`] - Validate a Google Ads responsive search ad bundle
//! - [`pmax`] - Validate a Performance Max asset group
//! - [`text`] - Length measurement and shortening suggestions
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! Every validator returns a structured report; its `Display` impl renders
//! the text a workflow step hands back to its host.
//!
//! # Quick Start
//!
//! ```
//! use adcheck_core::{AdBundle, check_length, validate_ads};
//!
//! let report = check_length("Free Shipping Today", 30);
//! assert!(report.valid);
//!
//! let bundle = AdBundle {
//!     headlines: vec!["Fast".into(), "Cheap".into(), "Good".into()],
//!     descriptions: vec!["Pick two.".into(), "Or all three.".into()],
//!     paths: vec!["deals".into(), "today".into()],
//! };
//! assert!(validate_ads(&bundle).valid);
//! ```
#![deny(unsafe_code)]

pub mod ads;
pub mod config;
pub mod error;
pub mod length;
pub mod pmax;
pub mod text;

pub use ads::{
    AdBundle, AdFormat, AdsInput, AdsReport, AssetBundle, AssetKind, AssetReport, AssetRule,
    validate_ads,
};
pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use error::{ConfigError, ConfigResult, InputError, InputResult};
pub use length::{DEFAULT_LIMIT, LengthInput, LengthReport, check_length};
pub use pmax::{PmaxBundle, PmaxInput, PmaxReport, validate_pmax};
