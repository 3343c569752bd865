//! # Structgen Development Tools
//!
//! Command-line tools for layout authors:
//! - RON content loader
//! - Catalog validator
//! - ASCII preview of a planned structure

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod loader;
pub mod preview;
pub mod validate;
