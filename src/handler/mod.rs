//! Request handler module
//!
//! Request routing dispatch and harness page logic.

mod assets;
mod page;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
