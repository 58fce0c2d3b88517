//! Run-wide key registry.
//!
//! One `KeyRegistry` lives for the whole batch and is shared by reference
//! between workers. All state sits behind a single mutex so each operation is
//! atomic: two files proposing the same slug never end up with two keys for
//! one text, and a key is never handed to two texts.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use super::slug::{hash_suffix, make_key, slugify};
use crate::core::RewriteError;

/// Hex digits tried, in order, when a slug is already taken.
pub const SUFFIX_LENGTHS: &[usize] = &[4, 6, 8, 12, 16];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Owner {
    Text { namespace: String, text: String },
    /// Seen in an existing translation call; text unknown.
    Claimed,
}

#[derive(Debug, Default)]
struct RegistryState {
    keys_by_text: HashMap<(String, String), String>,
    owners: HashMap<String, Owner>,
    /// Manifest entries in registration order.
    entries: Vec<(String, String)>,
}

impl RegistryState {
    fn is_free(&self, key: &str) -> bool {
        !self.owners.contains_key(key)
    }

    fn insert(&mut self, namespace: &str, text: &str, key: &str, in_manifest: bool) {
        self.keys_by_text
            .insert((namespace.to_string(), text.to_string()), key.to_string());
        self.owners.insert(
            key.to_string(),
            Owner::Text {
                namespace: namespace.to_string(),
                text: text.to_string(),
            },
        );
        if in_manifest {
            self.entries.push((key.to_string(), text.to_string()));
        }
    }
}

#[derive(Debug)]
pub struct KeyRegistry {
    slug_max_length: usize,
    state: Mutex<RegistryState>,
}

impl KeyRegistry {
    pub fn new(slug_max_length: usize) -> Self {
        Self {
            slug_max_length,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Key for `text` in `namespace`, registering a new one when needed.
    ///
    /// The text must already be normalized. Identical text always returns
    /// the key it got first; a new text takes `{namespace}_{slug}`, or the
    /// first free hash-suffixed variant when the slug belongs to another
    /// text.
    pub fn resolve(&self, namespace: &str, text: &str) -> Result<String, RewriteError> {
        let mut state = self.state.lock();

        if let Some(key) = state
            .keys_by_text
            .get(&(namespace.to_string(), text.to_string()))
        {
            return Ok(key.clone());
        }

        let slug = slugify(text, self.slug_max_length);
        let base = make_key(namespace, &slug);
        if state.is_free(&base) {
            state.insert(namespace, text, &base, true);
            return Ok(base);
        }

        for &len in SUFFIX_LENGTHS {
            let candidate = format!("{base}_{}", hash_suffix(text, len));
            if state.is_free(&candidate) {
                debug!(key = %candidate, text, "slug taken, using hash suffix");
                state.insert(namespace, text, &candidate, true);
                return Ok(candidate);
            }
        }

        Err(RewriteError::KeyCollisionExhausted {
            text: text.to_string(),
            slug: base,
        })
    }

    /// Key previously assigned to `text`, without registering anything.
    pub fn lookup(&self, namespace: &str, text: &str) -> Option<String> {
        self.state
            .lock()
            .keys_by_text
            .get(&(namespace.to_string(), text.to_string()))
            .cloned()
    }

    /// Reserve a key found in an existing translation call.
    pub fn claim(&self, key: &str) {
        let mut state = self.state.lock();
        if state.is_free(key) {
            state.owners.insert(key.to_string(), Owner::Claimed);
        }
    }

    /// Record an existing call whose argument is the text itself.
    ///
    /// The text becomes its own key so the same text elsewhere is rewritten
    /// to match. Nothing changes when the text already has a key or the key
    /// is owned by someone else. These entries stay out of the manifest.
    pub fn register_wrapped(&self, namespace: &str, text: &str) {
        let mut state = self.state.lock();
        let known = state
            .keys_by_text
            .contains_key(&(namespace.to_string(), text.to_string()));
        if !known && state.is_free(text) {
            state.insert(namespace, text, text, false);
        }
    }

    /// Seed one manifest entry.
    ///
    /// The namespace is the longest of `namespaces` that prefixes the key
    /// as `{namespace}_`, else the empty namespace.
    pub fn seed(&self, key: &str, text: &str, namespaces: &[&str]) {
        let namespace = infer_namespace(key, namespaces);
        let mut state = self.state.lock();
        if !state.is_free(key) {
            return;
        }
        let known = state
            .keys_by_text
            .contains_key(&(namespace.to_string(), text.to_string()));
        if known {
            // A second key for the same text: keep it reserved and listed.
            state.owners.insert(
                key.to_string(),
                Owner::Text {
                    namespace: namespace.to_string(),
                    text: text.to_string(),
                },
            );
            state.entries.push((key.to_string(), text.to_string()));
        } else {
            state.insert(namespace, text, key, true);
        }
    }

    pub fn seed_manifest<I>(&self, entries: I, namespaces: &[&str])
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, text) in entries {
            self.seed(&key, &text, namespaces);
        }
    }

    /// Manifest entries (key, text) in registration order.
    pub fn manifest(&self) -> Vec<(String, String)> {
        self.state.lock().entries.clone()
    }

    /// Number of keys reserved, claimed ones included.
    pub fn len(&self) -> usize {
        self.state.lock().owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn infer_namespace<'a>(key: &str, namespaces: &[&'a str]) -> &'a str {
    namespaces
        .iter()
        .filter(|ns| !ns.is_empty())
        .filter(|ns| {
            key.strip_prefix(**ns)
                .is_some_and(|rest| rest.starts_with('_'))
        })
        .max_by_key(|ns| ns.len())
        .copied()
        .unwrap_or("")
}
