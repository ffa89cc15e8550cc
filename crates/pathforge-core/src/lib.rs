//! # PathForge Core
//!
//! Core types, errors, and settings for PathForge.
//! Provides the geometric value types and the error taxonomy shared by the
//! path model, the transform algebra, and the undo engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::EditorSettings;
pub use error::{Error, HistoryError, HostError, PathError, Result, SettingsError};
pub use types::{Point, Rect};
