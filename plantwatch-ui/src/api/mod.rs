//! API access for the browser.

mod client;

pub use client::{get_api_base, FetchTransport};
