//! lodestone-text: shared text and styling types for lodestone.
//!
//! This crate holds the data model that the syntax layer and its callers
//! exchange: byte-addressed ranges and points into a UTF-8 buffer, style
//! attributes contributed by a theme, and [`StyledText`], the mutable
//! styled-text buffer that line highlighters annotate with attribute runs.

mod geometry;
mod styled;

pub use geometry::{ByteRange, SourcePoint};
pub use styled::{Color, FontSettings, Style, StyleRun, StyledText};
