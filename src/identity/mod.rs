/// Player identity resolution
///
/// Translates a display name into the provider-issued identifier, with a
/// cache-aside store in front of the provider.

pub mod identifier;
pub mod provider;
pub mod resolver;

pub use identifier::canonicalize;
pub use provider::{IdentityProvider, MojangProvider};
pub use resolver::IdentityResolver;

use serde::{Deserialize, Serialize};

/// Identity as issued by the provider
///
/// Field names match the provider's JSON and the serialized cache value.
/// An empty `id` marks a player the provider does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

impl IdentityRecord {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// Sentinel for a player the provider could not find
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record: IdentityRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, IdentityRecord::unknown());
        assert!(record.is_unknown());

        let record: IdentityRecord =
            serde_json::from_str(r#"{"id":"abc","legacy":true}"#).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.id, "abc");
    }
}
