//! Visual test harness server for the dom-to-image client library.
//!
//! Serves fixture test pages over HTTP so the library's live rendering can be
//! compared against pre-recorded control images in a browser.

pub mod config;
pub mod fixtures;
pub mod handler;
pub mod http;
pub mod logger;
