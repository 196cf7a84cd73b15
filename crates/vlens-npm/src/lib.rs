//! npm ecosystem support for vlens.
//!
//! Resolves `package.json` dependency values against the npm registry:
//! node-semver ranges, dist-tags and local `file:`/`link:` directories.

pub mod config;
pub mod error;
pub mod registry;
pub mod specifier;

pub use config::NpmConfig;
pub use error::{NpmError, Result};
pub use registry::{NpmClient, PROVIDER};
pub use specifier::{NpmSpecifier, parse_npm_specifier};
