//! Placeholder→real asset genesis map.
//!
//! Written once per placeholder by the admin capability after the real
//! asset becomes deliverable. A missing entry means "genesis not yet
//! reached": delivery is refused and the caller retries after the mapping
//! is published. The engine never queues or retries on its own.

use std::collections::HashMap;

use claimdesk_types::{AssetKey, Result, VenueError};

/// Write-once mapping from placeholder identity to real, deliverable
/// identity.
#[derive(Debug, Clone, Default)]
pub struct GenesisMap {
    entries: HashMap<AssetKey, AssetKey>,
}

impl GenesisMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the real identity for a placeholder.
    ///
    /// # Errors
    /// Returns `GenesisAlreadyMapped` on a second write to the same key.
    pub fn publish(&mut self, placeholder: AssetKey, real: AssetKey) -> Result<()> {
        if self.entries.contains_key(&placeholder) {
            return Err(VenueError::GenesisAlreadyMapped(placeholder));
        }
        self.entries.insert(placeholder, real);
        tracing::debug!(placeholder = %placeholder, real = %real, "Genesis mapping published");
        Ok(())
    }

    /// The real identity for a placeholder, if published.
    #[must_use]
    pub fn resolve(&self, placeholder: &AssetKey) -> Option<AssetKey> {
        self.entries.get(placeholder).copied()
    }

    /// Whether a placeholder has been mapped.
    #[must_use]
    pub fn is_mapped(&self, placeholder: &AssetKey) -> bool {
        self.entries.contains_key(placeholder)
    }

    /// Number of published mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimdesk_types::{CollectionId, TokenId};

    #[test]
    fn publish_and_resolve() {
        let mut map = GenesisMap::new();
        let placeholder = AssetKey::new(CollectionId::new(), TokenId(1));
        let real = AssetKey::new(CollectionId::new(), TokenId(1));
        assert!(map.resolve(&placeholder).is_none());

        map.publish(placeholder, real).unwrap();
        assert_eq!(map.resolve(&placeholder), Some(real));
        assert!(map.is_mapped(&placeholder));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn write_once_per_key() {
        let mut map = GenesisMap::new();
        let placeholder = AssetKey::new(CollectionId::new(), TokenId(1));
        let real = AssetKey::new(CollectionId::new(), TokenId(1));
        map.publish(placeholder, real).unwrap();

        let other = AssetKey::new(CollectionId::new(), TokenId(2));
        let err = map.publish(placeholder, other).unwrap_err();
        assert_eq!(err, VenueError::GenesisAlreadyMapped(placeholder));
        // The original mapping is untouched.
        assert_eq!(map.resolve(&placeholder), Some(real));
    }
}
