//! URL handling module for Job-Cascade
//!
//! This module builds listing URLs from search parameters and turns the
//! relative, partial or decorated links found on listing pages into
//! canonical absolute URLs.

mod builder;
mod normalize;

pub use builder::{build_search_url, location_slug};
pub use normalize::{canonicalize_url, origin_root, resolve_url};
