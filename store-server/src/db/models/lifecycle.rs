use serde::{Deserialize, Serialize};

/// Lifecycle state of a catalog record.
///
/// Records start `Active`, move to `SoftDeleted` when hidden from the
/// storefront, and may only be removed from storage once soft-deleted.
/// A purged record has no state of its own: it is simply gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    #[default]
    Active,
    SoftDeleted,
}

impl Lifecycle {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Lifecycle::SoftDeleted)
    }

    /// Hard deletion is legal only from the soft-deleted state
    pub fn can_purge(&self) -> bool {
        self.is_deleted()
    }

    pub fn toggled(&self) -> Lifecycle {
        match self {
            Lifecycle::Active => Lifecycle::SoftDeleted,
            Lifecycle::SoftDeleted => Lifecycle::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Active => "ACTIVE",
            Lifecycle::SoftDeleted => "SOFT_DELETED",
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(Lifecycle::default(), Lifecycle::Active);
        assert!(!Lifecycle::default().is_deleted());
    }

    #[test]
    fn purge_requires_soft_delete_first() {
        assert!(!Lifecycle::Active.can_purge());
        assert!(Lifecycle::SoftDeleted.can_purge());
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Lifecycle::Active.toggled(), Lifecycle::SoftDeleted);
        assert_eq!(Lifecycle::SoftDeleted.toggled(), Lifecycle::Active);
    }

    #[test]
    fn serializes_as_screaming_snake() {
        let json = serde_json::to_string(&Lifecycle::SoftDeleted).unwrap();
        assert_eq!(json, "\"SOFT_DELETED\"");
        let back: Lifecycle = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(back, Lifecycle::Active);
    }
}
