//! Imports Fabula Ultima rulebook pages into a virtual tabletop.
//!
//! A PDF page is lexed into [`token::Token`]s, parsed either by a page
//! grammar ([`analyzer`]) or by the atlas itemizer ([`atlas`]), mapped to
//! platform payloads ([`payload`]) and saved through a [`platform::Platform`].

pub mod analyzer;
pub mod atlas;
pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod payload;
pub mod pdf;
pub mod platform;
pub mod token;

// Re-exports
pub use error::*;
