//! # vigil-loader
//!
//! JSON sources for [`vigil_validator`]: declaration documents, per-class
//! declaration directories and engine configuration.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vigil_loader::{JsonLoader, load_config};
//! use vigil_validator::Validator;
//!
//! let validator = Validator::builder()
//!     .types(types)
//!     .loader(JsonLoader::from_path("constraints.json")?)
//!     .config(load_config("validator.json")?)
//!     .build();
//! ```
//!
//! ## Document Format
//!
//! A constraint is either a bare name (`"NotBlank"`) or an object with
//! `name`, optional `groups` and optional `options`. Inside options, an
//! object with a `constraint` key is a nested constraint; the `constraints`
//! option of `All`/`Any` also accepts bare names. See [`document`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod document;
pub mod error;
pub mod json;

mod convert;

pub use config::{load_config, parse_config};
pub use document::{ClassDocument, ConstraintDocument, ConstraintEntry, Document};
pub use error::{LoaderError, LoaderResult};
pub use json::{DirectoryLoader, JsonLoader};
