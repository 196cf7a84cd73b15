//! Pub ecosystem support for vlens.
//!
//! Resolves `pubspec.yaml` dependency constraints against pub.dev.

pub mod config;
pub mod error;
pub mod registry;
pub mod specifier;

pub use config::PubConfig;
pub use error::{PubError, Result};
pub use registry::{PROVIDER, PubClient};
pub use specifier::parse_pub_specifier;
