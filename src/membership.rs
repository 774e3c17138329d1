//! Extraction of pool members from a membership response.
//!
//! The management API does not commit to a single envelope for member
//! listings. The member sequence is found under an `items` key, either directly
//! at the top level or inside one of the top-level objects (stats responses
//! nest it, e.g. `{"poolMemberStats": {"items": [...]}}`). Top-level entries
//! are scanned in document order and the first one carrying `items` wins.

use crate::error::Error;
use serde_json::Value;

#[cfg(test)]
mod tests;

/// Key holding the member sequence.
pub const ITEMS_KEY: &str = "items";

/// One entry of a pool's member sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolMember {
    /// Member name, when the entry carries a string `name`.
    pub name: Option<String>,
    /// The entry as returned by the management API.
    pub raw: Value,
}

impl PoolMember {
    fn from_value(raw: &Value) -> Self {
        Self {
            name: raw.get("name").and_then(Value::as_str).map(str::to_string),
            raw: raw.clone(),
        }
    }

    /// Returns true if the member name contains `fragment`.
    #[must_use]
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.as_deref().is_some_and(|name| name.contains(fragment))
    }
}

/// Ordered members of a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolMembership {
    /// Top-level key the members were found under.
    pub source_key: String,
    /// Members in response order.
    pub members: Vec<PoolMember>,
}

impl PoolMembership {
    /// Returns true if any member name contains `fragment`.
    ///
    /// Matching is by substring, so `web1` matches `web1:80` and an empty
    /// fragment matches any named member.
    #[must_use]
    pub fn any_named(&self, fragment: &str) -> bool {
        self.members.iter().any(|m| m.name_contains(fragment))
    }

    /// Member names, skipping entries without one.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(|m| m.name.as_deref())
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the pool has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Finds the member sequence in a membership response.
///
/// Returns `Ok(None)` when no top-level entry carries `items`.
///
/// # Errors
/// Returns [`Error::UnexpectedResponse`] if `items` is present but is not a
/// sequence.
pub fn extract(body: &Value) -> Result<Option<PoolMembership>, Error> {
    let Some(entries) = body.as_object() else {
        return Ok(None);
    };

    for (key, value) in entries {
        let items = if key == ITEMS_KEY {
            Some(value)
        } else {
            value.as_object().and_then(|inner| inner.get(ITEMS_KEY))
        };

        if let Some(items) = items {
            let list = items.as_array().ok_or_else(|| {
                Error::UnexpectedResponse(format!(
                    "`{}` under `{}` is not a sequence",
                    ITEMS_KEY, key
                ))
            })?;

            return Ok(Some(PoolMembership {
                source_key: key.clone(),
                members: list.iter().map(PoolMember::from_value).collect(),
            }));
        }
    }

    Ok(None)
}
