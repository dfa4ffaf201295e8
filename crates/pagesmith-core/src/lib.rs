//! Pagesmith Core Library
//!
//! Core types, configuration, and error handling for the Pagesmith page
//! build pipeline.

pub mod config;
pub mod content;
pub mod error;

pub use config::{Config, FooterConfig, NavConfig, Severity};
pub use content::{ChangeFreq, ContentRecord, Faq, Family, Link, Payload, RawRecord, RecordId};
pub use error::{CoreError, Result};
