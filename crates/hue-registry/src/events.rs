//! # Event Log
//!
//! Append-only record of committed mutations, one [`RegistryEvent`] per
//! change. The renderer never reads it, so timestamps cannot leak into
//! documents.

use serde::{Deserialize, Serialize};

use hue_core::{AccountId, SequenceId, Timestamp, TraitName};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Identifier issued under `key`.
    Issued {
        /// Canonical key.
        key: String,
    },
    /// Display name changed.
    Renamed {
        /// Previous display name.
        from: String,
        /// New display name.
        to: String,
        /// Caller that performed the rename.
        by: AccountId,
    },
    /// A trait value was written.
    AttributeSet {
        /// Trait written.
        trait_name: TraitName,
        /// New value.
        value: String,
    },
    /// Trait policy upserted.
    PolicySet {
        /// Trait whose policy changed.
        trait_name: TraitName,
        /// New user-modifiable flag.
        user_modifiable: bool,
        /// New enabled-for-all flag.
        enabled_for_all: bool,
    },
    /// Trait added to an identifier's whitelist.
    TraitGranted {
        /// Trait granted.
        trait_name: TraitName,
    },
    /// Trait removed from an identifier's whitelist.
    TraitRevoked {
        /// Trait revoked.
        trait_name: TraitName,
    },
    /// Identifier suppressed from rendering.
    Suppressed,
    /// Suppression lifted.
    Unsuppressed,
    /// Suppression permanently locked.
    SuppressionLocked,
}

/// One committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// Identifier affected, if the change is per-identifier.
    pub sequence_id: Option<SequenceId>,
    /// The change.
    #[serde(flatten)]
    pub kind: EventKind,
    /// When it was committed.
    pub at: Timestamp,
}

/// Append-only list of events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<RegistryEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sequence_id: Option<SequenceId>, kind: EventKind) {
        self.events.push(RegistryEvent {
            sequence_id,
            kind,
            at: Timestamp::now(),
        });
    }

    /// All events in commit order.
    pub fn all(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Events for one identifier, in commit order.
    pub fn for_id(&self, id: SequenceId) -> impl Iterator<Item = &RegistryEvent> {
        self.events
            .iter()
            .filter(move |e| e.sequence_id == Some(id))
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_flat_kind_tag() {
        let mut log = EventLog::new();
        log.push(
            Some(SequenceId(3)),
            EventKind::Issued {
                key: "#FF00AA".into(),
            },
        );
        log.push(None, EventKind::SuppressionLocked);

        let json = serde_json::to_value(log.all()).unwrap();
        assert_eq!(json[0]["kind"], "issued");
        assert_eq!(json[0]["key"], "#FF00AA");
        assert_eq!(json[0]["sequence_id"], 3);
        assert_eq!(json[1]["kind"], "suppression_locked");
        assert!(json[1]["sequence_id"].is_null());
    }

    #[test]
    fn for_id_filters() {
        let mut log = EventLog::new();
        log.push(Some(SequenceId(0)), EventKind::Suppressed);
        log.push(Some(SequenceId(1)), EventKind::Suppressed);
        log.push(Some(SequenceId(0)), EventKind::Unsuppressed);
        assert_eq!(log.for_id(SequenceId(0)).count(), 2);
        assert_eq!(log.len(), 3);
    }
}
