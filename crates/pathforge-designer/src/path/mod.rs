//! SVG path data model.
//!
//! Raw text is tokenized by [`parse_path`], resolved to absolute commands by
//! [`PathData::analyze`], edited in place, and written back out honoring each
//! command's relative/absolute letter case.

mod command;
mod converter;
mod data;
mod parser;

pub use command::{CommandType, PathCommand};
pub use converter::{arc_to_cubics, convert_command};
pub use data::PathData;
pub use parser::{parse_path, parse_path_lossy, RawCommand};
