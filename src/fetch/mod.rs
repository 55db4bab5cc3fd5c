//! HTTP fetching for listing, API and detail requests

mod client;

pub use client::{Accept, FetchOptions, FetchResult, HttpFetcher};
