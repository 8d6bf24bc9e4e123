//! Persistent category-to-keyword ruleset backed by a JSON file
//!
//! The on-disk format is a single JSON object mapping category names to
//! keyword arrays. Entry order is user-visible (it drives menu order and
//! match precedence), so the mapping is kept insertion-ordered and the
//! file is rewritten in full after every mutation.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fallback category. Always present in a store; never a learning target.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Errors raised by rule storage
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rules JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("category not found: '{0}'")]
    CategoryNotFound(String),
}

/// The category ruleset plus the path it persists to
#[derive(Debug)]
pub struct RuleStore {
    path: PathBuf,
    categories: IndexMap<String, Vec<String>>,
}

impl RuleStore {
    /// Load the ruleset at `path`, or start a fresh one if the file does
    /// not exist yet. A present-but-unreadable file is an error, never a
    /// silent reset.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RulesError> {
        let path = path.into();
        let mut categories: IndexMap<String, Vec<String>> = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| RulesError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| RulesError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            IndexMap::new()
        };

        if !categories.contains_key(UNCATEGORIZED) {
            if !categories.is_empty() {
                log::warn!(
                    "rules file {} has no '{UNCATEGORIZED}' entry, reinstating it",
                    path.display()
                );
            }
            categories.shift_insert(0, UNCATEGORIZED.to_string(), Vec::new());
        }

        Ok(Self { path, categories })
    }

    /// Rewrite the rules file in full. The JSON goes to a sibling temp
    /// file first so an interrupted write cannot clobber the previous
    /// ruleset.
    pub fn save(&self) -> Result<(), RulesError> {
        let json = serde_json::to_string_pretty(&self.categories).map_err(|source| {
            RulesError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io_err(source))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| self.io_err(source))?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_err(source))?;
        Ok(())
    }

    /// Create an empty category and persist. A blank (after trimming) or
    /// already present name is a no-op returning false.
    pub fn add_category(&mut self, name: &str) -> Result<bool, RulesError> {
        let name = name.trim();
        if name.is_empty() || self.categories.contains_key(name) {
            return Ok(false);
        }
        self.categories.insert(name.to_string(), Vec::new());
        self.save()?;
        Ok(true)
    }

    /// Append a keyword to an existing category and persist.
    ///
    /// The keyword is trimmed but stored with its casing intact; the
    /// duplicate check is case-insensitive, so "Netflix" and "NETFLIX"
    /// count as one entry. Blank keywords and duplicates are no-ops
    /// returning false.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool, RulesError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(false);
        }
        let keywords = self
            .categories
            .get_mut(category)
            .ok_or_else(|| RulesError::CategoryNotFound(category.to_string()))?;
        let folded = keyword.to_lowercase();
        if keywords.iter().any(|k| k.trim().to_lowercase() == folded) {
            return Ok(false);
        }
        keywords.push(keyword.to_string());
        self.save()?;
        Ok(true)
    }

    /// Category names in insertion order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Keywords of one category, in the order they were added
    pub fn keywords(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Returns true if the category exists (exact name match)
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Iterate categories with their keyword lists, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    /// Path of the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> RulesError {
        RulesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, RuleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::open(dir.path().join("categories.json")).unwrap();
        (dir, store)
    }

    fn names(store: &RuleStore) -> Vec<&str> {
        store.categories().collect()
    }

    fn keywords<'a>(store: &'a RuleStore, category: &str) -> Vec<&'a str> {
        store
            .keywords(category)
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_open_missing_file_starts_with_uncategorized() {
        let (_dir, store) = temp_store();
        assert_eq!(names(&store), vec![UNCATEGORIZED]);
        assert!(store.keywords(UNCATEGORIZED).unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_add_category_persists_and_dedupes() {
        let (_dir, mut store) = temp_store();
        assert!(store.add_category("Groceries").unwrap());
        assert!(!store.add_category("Groceries").unwrap());
        assert!(!store.add_category("   ").unwrap());

        let reopened = RuleStore::open(store.path()).unwrap();
        assert_eq!(names(&reopened), vec![UNCATEGORIZED, "Groceries"]);
    }

    #[test]
    fn test_add_keyword_trims_and_keeps_casing() {
        let (_dir, mut store) = temp_store();
        store.add_category("Subscriptions").unwrap();
        assert!(store.add_keyword("Subscriptions", "  Netflix  ").unwrap());
        assert_eq!(keywords(&store, "Subscriptions"), vec!["Netflix"]);
    }

    #[test]
    fn test_add_keyword_duplicate_is_a_noop() {
        let (_dir, mut store) = temp_store();
        store.add_category("Subscriptions").unwrap();
        assert!(store.add_keyword("Subscriptions", "Netflix").unwrap());
        assert!(!store.add_keyword("Subscriptions", "NETFLIX").unwrap());
        assert!(!store.add_keyword("Subscriptions", " netflix ").unwrap());
        assert_eq!(keywords(&store, "Subscriptions"), vec!["Netflix"]);
    }

    #[test]
    fn test_add_keyword_blank_is_a_noop() {
        let (_dir, mut store) = temp_store();
        store.add_category("Subscriptions").unwrap();
        assert!(!store.add_keyword("Subscriptions", "   ").unwrap());
        assert!(keywords(&store, "Subscriptions").is_empty());
    }

    #[test]
    fn test_add_keyword_unknown_category_errors() {
        let (_dir, mut store) = temp_store();
        let err = store.add_keyword("Travel", "uber").unwrap_err();
        assert!(matches!(err, RulesError::CategoryNotFound(name) if name == "Travel"));
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        fs::write(&path, "{not json").unwrap();
        let err = RuleStore::open(&path).unwrap_err();
        assert!(matches!(err, RulesError::Corrupt { .. }));
    }

    #[test]
    fn test_missing_uncategorized_is_reinstated_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        fs::write(&path, r#"{"Food": ["pasta"]}"#).unwrap();
        let store = RuleStore::open(&path).unwrap();
        assert_eq!(names(&store), vec![UNCATEGORIZED, "Food"]);
        assert_eq!(keywords(&store, "Food"), vec!["pasta"]);
    }

    #[test]
    fn test_round_trip_preserves_entry_order() {
        let (_dir, mut store) = temp_store();
        store.add_category("Transport").unwrap();
        store.add_category("Food").unwrap();
        store.add_keyword("Transport", "uber").unwrap();
        store.add_keyword("Transport", "adnoc").unwrap();
        store.add_keyword("Food", "talabat").unwrap();

        let reopened = RuleStore::open(store.path()).unwrap();
        assert_eq!(names(&reopened), vec![UNCATEGORIZED, "Transport", "Food"]);
        assert_eq!(keywords(&reopened, "Transport"), vec!["uber", "adnoc"]);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.find("Transport").unwrap() < raw.find("Food").unwrap());
    }

    #[test]
    fn test_save_leaves_no_temp_file_behind() {
        let (_dir, mut store) = temp_store();
        store.add_category("Food").unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }
}
