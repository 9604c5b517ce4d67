//! URL handling module
//!
//! This module provides frontier normalization and the internal-link test
//! used to decide which discovered links belong to the audited site.

mod domain;
mod normalize;

pub use domain::{extract_domain, has_www, is_internal, InternalMatch};
pub use normalize::{normalize_url, NormalizedUrl};
