//! # mindstory-core
//!
//! Core library for MindStory, a goal and habit tracker.
//!
//! This library provides:
//! - Relative date labels for entries, challenges and feed items
//! - Timestamp parsing with explicit rejection of invalid input
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use mindstory_core::RelativeDateFormatter;
//!
//! let now: DateTime<Utc> = "2024-05-10T12:00:00Z".parse().unwrap();
//! let formatter = RelativeDateFormatter::default();
//!
//! assert_eq!(formatter.format_at("2024-05-09T08:00:00Z", now).unwrap(), "Yesterday");
//! assert_eq!(formatter.format_at("2023-04-20T12:00:00Z", now).unwrap(), "Apr 20, 2023");
//! assert!(formatter.format_at("not a date", now).is_err());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use format::{
    format_date, format_date_at, DateLabelOverrides, DateLabels, DayBucket,
    RelativeDateFormatter,
};
pub use timestamp::parse_timestamp;

// Public modules
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod timestamp;
