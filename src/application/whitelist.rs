//! Whitelist loading and lookup
//!
//! Each category lives in its own JSON file mapping an API name to its
//! exempted endpoints. Two entry shapes are accepted side by side in the
//! same array:
//!
//! - legacy: a bare path string, applying to every HTTP method
//! - v2: an object with `path` and `method` (`"*"` for any), plus an
//!   ignored `comment`
//!
//! Entries are normalized at load time so lookups never branch on shape.
//! A missing or unreadable file leaves its category empty; a whitelist is
//! advisory, so load never fails the run.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::matcher;
use crate::config::WhitelistConfig;
use crate::domain::value_objects::WhitelistCategory;

/// One normalized whitelist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistEntry {
    /// Restrict the entry to one HTTP method; `None` covers all methods
    pub method: Option<String>,
    pub path: String,
}

impl WhitelistEntry {
    pub fn any_method(path: impl Into<String>) -> Self {
        Self {
            method: None,
            path: path.into(),
        }
    }

    fn covers(&self, method: &str, path: &str) -> bool {
        if let Some(restricted) = &self.method {
            if !restricted.eq_ignore_ascii_case(method) {
                return false;
            }
        }
        matcher::matches(&self.path, path)
    }
}

/// Top-level shape of a category file
#[derive(Debug, Deserialize)]
struct RawFile {
    #[serde(default)]
    whitelist: HashMap<String, Vec<serde_json::Value>>,
}

/// Raw on-disk entry shapes, resolved into [`WhitelistEntry`] at load time
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Legacy(String),
    V2 {
        path: String,
        method: String,
        #[serde(default)]
        #[allow(dead_code)]
        comment: Option<String>,
    },
}

/// Immutable lookup structure over all whitelist categories.
///
/// Built once at startup and shared read-only across worker tasks.
#[derive(Debug, Default)]
pub struct WhitelistIndex {
    categories: Vec<(WhitelistCategory, HashMap<String, Vec<WhitelistEntry>>)>,
}

impl WhitelistIndex {
    /// Load every configured category file. Categories without a configured
    /// or readable file are empty.
    pub fn load(config: &WhitelistConfig) -> Self {
        let mut index = Self::default();
        for category in WhitelistCategory::ALL {
            let apis = match config.path_for(category) {
                Some(path) => load_file(path),
                None => HashMap::new(),
            };
            debug!(
                category = %category,
                apis = apis.len(),
                "loaded whitelist category"
            );
            index.categories.push((category, apis));
        }
        index
    }

    /// Add one entry; used to assemble indexes without files
    pub fn insert(&mut self, category: WhitelistCategory, api: &str, entry: WhitelistEntry) {
        if let Some((_, apis)) = self.categories.iter_mut().find(|(c, _)| *c == category) {
            apis.entry(api.to_string()).or_default().push(entry);
            return;
        }
        let mut apis = HashMap::new();
        apis.insert(api.to_string(), vec![entry]);
        self.categories.push((category, apis));
    }

    /// All categories with an entry covering the given endpoint.
    ///
    /// The same endpoint may appear in several categories; the result is the
    /// union, ordered by category label. Duplicate matches within one
    /// category count once.
    pub fn categories_for(
        &self,
        api: &str,
        method: &str,
        path: &str,
    ) -> BTreeSet<WhitelistCategory> {
        self.categories
            .iter()
            .filter(|(_, apis)| {
                apis.get(api)
                    .is_some_and(|entries| entries.iter().any(|e| e.covers(method, path)))
            })
            .map(|(category, _)| *category)
            .collect()
    }

    /// Render a category set as the report's whitelist column value
    pub fn label(categories: &BTreeSet<WhitelistCategory>) -> String {
        if categories.is_empty() {
            "NO".to_string()
        } else {
            categories
                .iter()
                .map(WhitelistCategory::as_str)
                .collect::<Vec<_>>()
                .join("+")
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories
            .iter()
            .all(|(_, apis)| apis.values().all(Vec::is_empty))
    }
}

/// Parse one category file into api -> entries. Any file-level failure
/// leaves the category empty.
fn load_file(path: &Path) -> HashMap<String, Vec<WhitelistEntry>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            warn!(file = %path.display(), %error, "whitelist file unreadable; treating as empty");
            return HashMap::new();
        }
    };

    let raw: RawFile = match serde_json::from_str(&contents) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(file = %path.display(), %error, "whitelist file malformed; treating as empty");
            return HashMap::new();
        }
    };

    let mut apis = HashMap::with_capacity(raw.whitelist.len());
    for (api, values) in raw.whitelist {
        let mut entries = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<RawEntry>(value.clone()) {
                Ok(RawEntry::Legacy(p)) | Ok(RawEntry::V2 { path: p, .. }) if p.is_empty() => {
                    warn!(file = %path.display(), api = %api, "skipping whitelist entry with empty path");
                }
                Ok(RawEntry::Legacy(path)) => entries.push(WhitelistEntry { method: None, path }),
                Ok(RawEntry::V2 { path, method, .. }) => entries.push(WhitelistEntry {
                    // A "*" method means any
                    method: (method != "*").then(|| method.to_ascii_uppercase()),
                    path,
                }),
                Err(error) => {
                    warn!(
                        file = %path.display(),
                        api = %api,
                        %error,
                        entry = %value,
                        "skipping malformed whitelist entry"
                    );
                }
            }
        }
        apis.insert(api, entries);
    }
    apis
}
