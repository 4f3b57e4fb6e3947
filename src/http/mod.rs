//! HTTP protocol layer module
//!
//! Protocol-level base functionality, decoupled from harness business logic.

pub mod cache;
pub mod mime;
pub mod query;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_json_response, build_options_response,
};
