//! Dub ecosystem support for vlens.
//!
//! Resolves `dub.json` dependency values against the Dub registry and
//! reads pinned versions from `dub.selections.json`.

pub mod config;
pub mod error;
pub mod registry;
pub mod selections;
pub mod specifier;

pub use config::DubConfig;
pub use error::{DubError, Result};
pub use registry::{DubClient, PROVIDER};
pub use selections::{DubSelections, Selection, read_dub_selections};
pub use specifier::parse_dub_specifier;
