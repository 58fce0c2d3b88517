//! Source file parsing.
//!
//! - `source`: JS/TS/JSX/TSX parser (uses swc for AST generation)

pub mod source;

pub use source::{Dialect, ParsedSource, parse_source};
