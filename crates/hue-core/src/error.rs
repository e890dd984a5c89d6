//! # Error Types — Registry Error Taxonomy
//!
//! Defines the errors every registry operation can return. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every error fails the whole attempted operation. Nothing is written
//!   before all preconditions have been checked.
//! - Errors surface verbatim to the caller. The only local recovery in the
//!   system is the renderer's peer-name fallback, which never produces one
//!   of these.
//! - [`RegistryError::reason`] gives a stable, machine-readable tag for
//!   metrics labels and HTTP error codes.

use thiserror::Error;

/// Top-level error type for registry, attribute, and issuance operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed key, display name, word, trait name, or request shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The colour key already has an active record.
    #[error("key {key} is already claimed")]
    AlreadyClaimed {
        /// Canonical key that collided.
        key: String,
    },

    /// The canonical display name is reserved by another identifier.
    #[error("display name {name:?} is taken")]
    NameTaken {
        /// Canonical name key that collided.
        name: String,
    },

    /// The exact word tuple was issued before.
    #[error("word combination {combination:?} was already used")]
    CombinationUsed {
        /// Pipe-joined canonical combination.
        combination: String,
    },

    /// A hex-shaped display name does not spell its own key.
    #[error("display name {name:?} is reserved for key {derived}, not {key}")]
    ReservedNameMismatch {
        /// Key being issued or renamed.
        key: String,
        /// Name that was requested.
        name: String,
        /// Key the name spells.
        derived: String,
    },

    /// The display-name trait can only change through a rename.
    #[error("trait {0:?} is reserved and can only change through a rename")]
    ReservedTraitName(String),

    /// Caller is not the current holder of the identifier.
    #[error("caller {caller} is not the holder of #{sequence_id}")]
    NotHolder {
        /// Identifier the caller tried to act on.
        sequence_id: u64,
        /// Caller identity.
        caller: String,
    },

    /// Caller is not the registry owner.
    #[error("caller {0} is not the registry owner")]
    NotOwner(String),

    /// The trait is not modifiable for this identifier under current policy.
    #[error("trait {trait_name:?} is not modifiable for #{sequence_id}")]
    PolicyDenied {
        /// Identifier the write targeted.
        sequence_id: u64,
        /// Trait that was refused.
        trait_name: String,
    },

    /// Issuance would exceed the namespace, the supply cap, or a quota;
    /// also returned for range queries past the issued count.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Payment amount does not equal price times quantity exactly.
    #[error("payment mismatch: expected {expected}, got {actual}")]
    PaymentMismatch {
        /// Amount required.
        expected: u128,
        /// Amount offered.
        actual: u128,
    },

    /// Administrative action blocked by a lock or a disabled toggle.
    #[error("locked: {0}")]
    Locked(String),

    /// Issuance is globally disabled.
    #[error("issuance is disabled")]
    IssuanceDisabled,

    /// The identifier was never issued.
    #[error("identifier #{0} was never issued")]
    NotFound(u64),

    /// The external settlement collaborator refused the payment.
    #[error("settlement failed: {0}")]
    Settlement(String),

    /// Canonical serialization failed while rendering.
    #[error("canonicalization error: {0}")]
    Canonicalization(String),
}

impl RegistryError {
    /// Stable snake_case tag for this error kind.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::AlreadyClaimed { .. } => "already_claimed",
            Self::NameTaken { .. } => "name_taken",
            Self::CombinationUsed { .. } => "combination_used",
            Self::ReservedNameMismatch { .. } => "reserved_name_mismatch",
            Self::ReservedTraitName(_) => "reserved_trait_name",
            Self::NotHolder { .. } => "not_holder",
            Self::NotOwner(_) => "not_owner",
            Self::PolicyDenied { .. } => "policy_denied",
            Self::CapacityExceeded(_) => "capacity_exceeded",
            Self::PaymentMismatch { .. } => "payment_mismatch",
            Self::Locked(_) => "locked",
            Self::IssuanceDisabled => "issuance_disabled",
            Self::NotFound(_) => "not_found",
            Self::Settlement(_) => "settlement",
            Self::Canonicalization(_) => "canonicalization",
        }
    }
}

impl From<CanonicalizationError> for RegistryError {
    fn from(err: CanonicalizationError) -> Self {
        Self::Canonicalization(err.to_string())
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_tags_are_snake_case() {
        let errs = [
            RegistryError::InvalidInput("x".into()),
            RegistryError::NameTaken { name: "x".into() },
            RegistryError::PaymentMismatch {
                expected: 300,
                actual: 250,
            },
            RegistryError::IssuanceDisabled,
        ];
        for e in errs {
            assert!(e
                .reason()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn display_includes_context() {
        let err = RegistryError::ReservedNameMismatch {
            key: "#FF00AA".into(),
            name: "ff00ab".into(),
            derived: "#FF00AB".into(),
        };
        let s = err.to_string();
        assert!(s.contains("#FF00AB"));
        assert!(s.contains("#FF00AA"));
    }

    #[test]
    fn canonicalization_error_converts() {
        let err: RegistryError = CanonicalizationError::FloatRejected(1.5).into();
        assert_eq!(err.reason(), "canonicalization");
    }
}
