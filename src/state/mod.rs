//! Shared per-run state
//!
//! - `LastAccessTable`: per-domain last-access instants for crawl-delay enforcement

mod last_access;

pub use last_access::{Interrupted, LastAccessTable};
