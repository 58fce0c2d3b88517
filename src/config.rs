use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".zhwraprc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

/// How the translation function is made available in a rewritten file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    /// One top-of-file `import { t } from '...'`.
    #[default]
    Import,
    /// `const { t } = useTranslation();` inside each component that needs it.
    Hook,
}

/// Maps files matching a glob pattern to a key namespace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamespaceRule {
    pub pattern: String,
    pub namespace: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_translation_call_name")]
    pub translation_call_name: String,
    #[serde(default)]
    pub import_style: ImportStyle,
    #[serde(default = "default_import_source")]
    pub import_source: String,
    #[serde(default = "default_hook_name")]
    pub hook_name: String,
    #[serde(default = "default_hook_source")]
    pub hook_source: String,
    #[serde(default)]
    pub key_namespace_prefix: String,
    #[serde(default)]
    pub namespaces: Vec<NamespaceRule>,
    #[serde(default = "default_slug_max_length")]
    pub slug_max_length: usize,
    #[serde(default)]
    pub whitelist: Vec<String>,
    #[serde(default)]
    pub force_include: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
    #[serde(default = "default_persist_existing_keys")]
    pub persist_existing_keys: bool,
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default = "default_ignored_attributes")]
    pub ignored_attributes: Vec<String>,
    #[serde(default = "default_ignored_callees")]
    pub ignored_callees: Vec<String>,
}

fn default_translation_call_name() -> String {
    "t".to_string()
}

fn default_import_source() -> String {
    "i18next".to_string()
}

fn default_hook_name() -> String {
    "useTranslation".to_string()
}

fn default_hook_source() -> String {
    "react-i18next".to_string()
}

fn default_slug_max_length() -> usize {
    40
}

fn default_persist_existing_keys() -> bool {
    true
}

fn default_manifest_path() -> String {
    "./locales/zh-CN.json".to_string()
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_ignored_attributes() -> Vec<String> {
    ["className", "class", "style", "key", "id", "ref", "href", "src"]
        .map(String::from)
        .to_vec()
}

fn default_ignored_callees() -> Vec<String> {
    [
        "console.log",
        "console.info",
        "console.warn",
        "console.error",
        "console.debug",
    ]
    .map(String::from)
    .to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translation_call_name: default_translation_call_name(),
            import_style: ImportStyle::default(),
            import_source: default_import_source(),
            hook_name: default_hook_name(),
            hook_source: default_hook_source(),
            key_namespace_prefix: String::new(),
            namespaces: Vec::new(),
            slug_max_length: default_slug_max_length(),
            whitelist: Vec::new(),
            force_include: Vec::new(),
            blacklist: Vec::new(),
            persist_existing_keys: default_persist_existing_keys(),
            manifest_path: default_manifest_path(),
            includes: default_includes(),
            source_root: default_source_root(),
            ignore_test_files: default_ignore_test_files(),
            ignored_attributes: default_ignored_attributes(),
            ignored_callees: default_ignored_callees(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern is invalid, the translation call
    /// name is not a (dotted) identifier, or the slug length is zero.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.blacklist {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'blacklist': \"{}\"", pattern))?;
        }

        for rule in &self.namespaces {
            Pattern::new(&rule.pattern).with_context(|| {
                format!("Invalid glob pattern in 'namespaces': \"{}\"", rule.pattern)
            })?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if !is_callee_path(&self.translation_call_name) {
            bail!(
                "Invalid 'translationCallName': \"{}\" (expected an identifier such as \"t\" or \"i18n.t\")",
                self.translation_call_name
            );
        }

        if self.slug_max_length == 0 {
            bail!("'slugMaxLength' must be greater than 0");
        }

        Ok(())
    }

    /// Key namespace for a file: the first matching `namespaces` rule, else the global prefix.
    pub fn namespace_for(&self, file_path: &str) -> &str {
        self.namespaces
            .iter()
            .find(|rule| {
                Pattern::new(&rule.pattern)
                    .map(|p| p.matches(file_path))
                    .unwrap_or(false)
            })
            .map(|rule| rule.namespace.as_str())
            .unwrap_or(self.key_namespace_prefix.as_str())
    }

    /// All namespaces a key may belong to, used when seeding from a manifest.
    pub fn known_namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self
            .namespaces
            .iter()
            .map(|rule| rule.namespace.as_str())
            .collect();
        namespaces.push(self.key_namespace_prefix.as_str());
        namespaces.sort_unstable();
        namespaces.dedup();
        namespaces
    }
}

/// `t`, `i18n.t`, `$t`: dot-separated identifier segments.
fn is_callee_path(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory holding the config file; relative paths resolve against it.
    pub config_dir: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                config_dir: path.parent().map(Path::to_path_buf),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            config_dir: None,
        }),
    }
}
