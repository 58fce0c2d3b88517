//! Translation key generation.
//!
//! - `slug`: text normalization and pinyin slugs
//! - `registry`: run-wide (namespace, text) ↔ key map with collision handling

pub mod registry;
pub mod slug;

pub use registry::KeyRegistry;
pub use slug::{decode_markup_entities, hash_suffix, make_key, normalize_markup_text, slugify};
