//! # PathForge
//!
//! The geometric model and editing engine behind an SVG-style vector editor:
//! - Path data with exact absolute/relative command handling
//! - Structural path edits: remove, split, convert, close, move points
//! - Translate, scale, rotate and skew tools driven by pointer input
//! - A two-phase commit undo/redo history
//!
//! ## Architecture
//!
//! PathForge is organized as a workspace:
//!
//! 1. **pathforge-core** - Point/rect types, error taxonomy, editor settings
//! 2. **pathforge-designer** - Path model, matrix algebra, transforms, history
//! 3. **pathforge** - This crate: re-exports, logging setup and the CLI

pub use pathforge_core::{
    EditorSettings, Error, HistoryError, HostError, PathError, Point, Rect, Result,
    SettingsError,
};
pub use pathforge_designer as designer;
pub use pathforge_designer::{
    decompose_matrix, Action, CommandType, DecomposedMatrix, Document, HandleDescriptor,
    HandlePosition, Matrix, NodeHost, Operation, PathCommand, PathData, PathEdit,
    TransformAction, TransformKind, UndoService,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Compact output on stderr, keeping stdout for command results
/// - RUST_LOG environment variable support, `warn` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
