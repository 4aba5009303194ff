//! Category registry: industry categories mapped to tag rules.
//!
//! Built once at startup and never mutated; handlers share it through
//! `AppState` without locking. The built-in table can be replaced wholesale
//! by a TOML file named in `CATEGORIES_FILE`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// A single tag rule: exact key/value match, or key presence when `value`
/// is `None` (wildcard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    pub key: String,
    pub value: Option<String>,
}

impl TagRule {
    /// Exact-match rule.
    pub fn exact(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.to_string()),
        }
    }

    /// Wildcard rule: matches any POI carrying the key.
    pub fn wildcard(key: &str) -> Self {
        Self {
            key: key.to_string(),
            value: None,
        }
    }
}

/// Immutable mapping from category id to its tag rules.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: HashMap<String, Vec<TagRule>>,
}

/// On-disk shape of the registry override file:
///
/// ```toml
/// [categories]
/// supermarkets = [{ key = "shop", value = "supermarket" }]
/// offices = [{ key = "office" }]                 # no value = wildcard
/// ```
#[derive(Debug, Deserialize)]
struct RegistryFile {
    categories: HashMap<String, Vec<RawRule>>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    key: String,
    value: Option<String>,
}

impl CategoryRegistry {
    /// Default category table.
    pub fn builtin() -> Self {
        let categories = HashMap::from([
            (
                "gastronomy".to_string(),
                vec![
                    TagRule::exact("amenity", "restaurant"),
                    TagRule::exact("amenity", "cafe"),
                    TagRule::exact("amenity", "bar"),
                ],
            ),
            (
                "health".to_string(),
                vec![
                    TagRule::exact("amenity", "pharmacy"),
                    TagRule::exact("amenity", "doctors"),
                ],
            ),
            (
                "automotive".to_string(),
                vec![
                    TagRule::exact("shop", "car_repair"),
                    TagRule::exact("amenity", "fuel"),
                ],
            ),
            (
                "supermarkets".to_string(),
                vec![TagRule::exact("shop", "supermarket")],
            ),
            (
                "lodging".to_string(),
                vec![
                    TagRule::exact("tourism", "hotel"),
                    TagRule::exact("tourism", "hostel"),
                    TagRule::exact("tourism", "guest_house"),
                ],
            ),
            ("offices".to_string(), vec![TagRule::wildcard("office")]),
        ]);

        Self { categories }
    }

    /// Build a registry from explicit entries, validating that every
    /// category has at least one rule and every rule a non-empty key.
    pub fn from_entries(entries: HashMap<String, Vec<TagRule>>) -> Result<Self, AppError> {
        for (id, rules) in &entries {
            if rules.is_empty() {
                return Err(AppError::Configuration(format!(
                    "category {id:?} has no tag rules"
                )));
            }
            if rules.iter().any(|r| r.key.is_empty()) {
                return Err(AppError::Configuration(format!(
                    "category {id:?} has a rule with an empty key"
                )));
            }
        }

        Ok(Self {
            categories: entries,
        })
    }

    /// Load the registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Parse registry TOML. A rule with no `value`, or the literal value
    /// `"*"`, is a wildcard.
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        let file: RegistryFile = toml::from_str(text)
            .map_err(|e| AppError::Configuration(format!("invalid category file: {e}")))?;

        let entries = file
            .categories
            .into_iter()
            .map(|(id, rules)| {
                let rules = rules
                    .into_iter()
                    .map(|r| match r.value.as_deref() {
                        None | Some("*") => TagRule::wildcard(&r.key),
                        Some(v) => TagRule::exact(&r.key, v),
                    })
                    .collect();
                (id, rules)
            })
            .collect();

        Self::from_entries(entries)
    }

    /// Look up the rules for a category id.
    pub fn lookup(&self, category_id: &str) -> Option<&[TagRule]> {
        self.categories.get(category_id).map(Vec::as_slice)
    }

    /// Iterate over category ids and their rules.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TagRule])> {
        self.categories
            .iter()
            .map(|(id, rules)| (id.as_str(), rules.as_slice()))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the registry holds no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
