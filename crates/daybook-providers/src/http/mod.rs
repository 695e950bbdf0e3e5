//! Booking REST API source.
//!
//! This module provides an [`HttpSource`] that reads availability and
//! appointments from the booking backend over HTTPS.
//!
//! # Example
//!
//! ```ignore
//! use daybook_providers::http::{HttpConfig, HttpSource};
//!
//! let config = HttpConfig::new("https://api.example.com")?.with_token(token);
//! let source = HttpSource::new(config)?;
//! let entries = source.month_availability("p-1", month).await?;
//! ```

mod client;
mod config;
mod source;

pub use config::HttpConfig;
pub use source::HttpSource;
