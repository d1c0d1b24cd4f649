use uuid::Uuid;

use crate::foundation::error::{MenuGraphError, MenuGraphResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Stable item key used for cross-references between items (e.g. toggle drives).
pub struct ItemId(pub Uuid);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Identity assigned once when an item is created.
///
/// Every derived parameter, layer and proximity tag name is computed from `token`, never from the
/// current display name, so renaming an item keeps its generated state. The token is stored, not
/// recomputed: deleting and re-creating an item always yields a fresh one.
pub struct NodeIdentity {
    /// Random item key.
    pub id: ItemId,
    /// `<slug of creation-time name>-<32 hex digits of id>`.
    pub token: String,
}

impl NodeIdentity {
    /// Mint a fresh identity for an item created with display name `name`.
    pub fn new(name: &str) -> Self {
        let id = Uuid::new_v4();
        Self {
            token: format!("{}-{}", slug(name), id.simple()),
            id: ItemId(id),
        }
    }

    /// Token used as the basis of every derived name.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Reject tokens that cannot be embedded in derived names.
    pub fn validate(&self) -> MenuGraphResult<()> {
        if self.token.trim().is_empty() {
            return Err(MenuGraphError::validation(format!(
                "item {} has an empty identity token",
                self.id
            )));
        }
        if self.token.contains('/') {
            return Err(MenuGraphError::validation(format!(
                "identity token '{}' must not contain '/'",
                self.token
            )));
        }
        Ok(())
    }
}

/// Reduce a display name to characters that are safe inside parameter and tag names.
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_sep = true;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_sep = false;
        } else if !last_sep {
            out.push('_');
            last_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("item");
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ident.rs"]
mod tests;
