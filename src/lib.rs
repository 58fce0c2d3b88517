//! zhwrap - wraps Chinese literals in JS/TS/JSX sources with i18n calls
//!
//! zhwrap is a CLI tool and library that finds Chinese string literals,
//! template literals and JSX text, replaces them with `t('key')` calls keyed
//! by a pinyin slug, adds the import or hook declaration the call needs, and
//! records every new key in a JSON manifest.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Rewrite engine (plan, register, render)
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
