//! Tag predicate compiler.
//!
//! Turns a category's rule list into one parameterized SQL clause: one
//! OR-term per rule, values bound positionally. Placeholder indices are
//! assigned contiguously from a caller-supplied start because the store
//! binds strictly by position; a gap or a reused index would shift every
//! later parameter onto the wrong value.

use crate::error::AppError;
use crate::registry::TagRule;

/// A compiled logical-OR filter over tag rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPredicate {
    /// OR-joined clause text with `$n` placeholders.
    pub clause: String,

    /// Bound values in placeholder order.
    pub params: Vec<String>,
}

/// Compile `rules` into a predicate whose placeholders start at
/// `start_index`.
///
/// An exact rule binds two parameters (key, then value); a wildcard rule
/// binds one (the key). An empty rule list is the invalid-category
/// condition, never an always-match.
pub fn compile(rules: &[TagRule], start_index: usize) -> Result<TagPredicate, AppError> {
    if rules.is_empty() {
        return Err(AppError::EmptyRuleSet);
    }

    let mut terms = Vec::with_capacity(rules.len());
    let mut params = Vec::new();
    let mut index = start_index;

    for rule in rules {
        match &rule.value {
            Some(value) => {
                terms.push(format!("p.tags->>${index} = ${}", index + 1));
                params.push(rule.key.clone());
                params.push(value.clone());
                index += 2;
            }
            None => {
                terms.push(format!("p.tags ? ${index}"));
                params.push(rule.key.clone());
                index += 1;
            }
        }
    }

    Ok(TagPredicate {
        clause: terms.join(" OR "),
        params,
    })
}
