//! # Output Generators
//!
//! Implementations of [`crate::core::traits::Generator`].
//!
//! - [`html`]: static HTML pages with a linked stylesheet and event script

/// Static HTML page generation.
pub mod html;

pub use html::HtmlGenerator;
