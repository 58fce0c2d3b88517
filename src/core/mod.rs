//! Rewrite engine.
//!
//! Files flow through three passes driven by `pipeline`:
//!
//! 1. Plan: each file is parsed (`parsers`) and walked (`walk`) in parallel,
//!    producing a list of planned rewrites classified by `classify`.
//! 2. Register: keys are assigned sequentially in path and source order
//!    (`keys`), so the result never depends on thread scheduling.
//! 3. Render: plans are turned into text edits (`rewrite`), declarations are
//!    added (`inject`), and each file is written atomically.

pub mod classify;
pub mod context;
pub mod error;
pub mod file_scanner;
pub mod inject;
pub mod keys;
pub mod manifest;
pub mod parsers;
pub mod pipeline;
pub mod rewrite;
pub mod walk;

pub use context::{LineIndex, SourceContext, SourceLocation};
pub use error::RewriteError;
