use uuid::Uuid;

use crate::domain::errors::ValidationError;

/// Identifier of a copy entry.
///
/// Parsing only accepts the canonical hyphenated 8-4-4-4-12 hex form, so
/// braced, URN or simple UUID spellings are rejected before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its canonical textual form
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if !is_canonical_uuid(value) {
            return Err(ValidationError::MalformedEntryId(value.to_string()));
        }

        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ValidationError::MalformedEntryId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntryId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

fn is_canonical_uuid(value: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let groups: Vec<&str> = value.split('-').collect();
    groups.len() == GROUPS.len()
        && groups
            .iter()
            .zip(GROUPS)
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let id = EntryId::parse("3F2504E0-4F89-11D3-9A0C-0305E82C3301").unwrap();
        assert_eq!(id.to_string(), "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(EntryId::parse("").is_err());
        assert!(EntryId::parse("not-a-uuid").is_err());
        assert!(EntryId::parse("3f2504e04f8911d39a0c0305e82c3301").is_err());
        assert!(EntryId::parse("{3f2504e0-4f89-11d3-9a0c-0305e82c3301}").is_err());
        assert!(EntryId::parse("urn:uuid:3f2504e0-4f89-11d3-9a0c-0305e82c3301").is_err());
        assert!(EntryId::parse("3f2504e0-4f89-11d3-9a0c-0305e82c330g").is_err());
        assert!(EntryId::parse("3f2504e0-4f89-11d3-9a0c0-305e82c3301").is_err());
    }

    #[test]
    fn test_round_trips_through_display() {
        let id = EntryId::new();
        assert_eq!(EntryId::parse(&id.to_string()).unwrap(), id);
    }
}
