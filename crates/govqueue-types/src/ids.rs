//! Type-safe identifier wrappers for queue entities.
//!
//! Tokens carry a [`Uuid`]-backed identity generated at issuance (UUID v7,
//! time-ordered, for efficient database indexing). Counters use a small
//! integer identity because they form a fixed, human-numbered set
//! ("Counter 1", "Counter 2", ...) that is stable for the operational day.
//!
//! The token's `display_id` (e.g. `R-001`) is a separate, human-facing
//! label and lives on [`Token`](crate::structs::Token) -- it is never used
//! as an identity key.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for an issued token.
///
/// Distinct from the human-facing `display_id`; this is the key all
/// mutations and counter assignments reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TokenId(pub Uuid);

impl TokenId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for TokenId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TokenId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<TokenId> for Uuid {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

/// Unique identifier for a service counter.
///
/// Counters are a small fixed set configured at startup; their numbering
/// is part of the operator-facing display ("Counter 1").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CounterId(pub u32);

impl CounterId {
    /// Wrap a raw counter number.
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    /// Return the inner counter number.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for CounterId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CounterId {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

impl From<CounterId> for u32 {
    fn from(id: CounterId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ids_are_unique() {
        let a = TokenId::new();
        let b = TokenId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn token_id_roundtrip_serde() {
        let original = TokenId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<TokenId, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn token_id_display_matches_uuid() {
        let id = TokenId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn counter_id_display_is_bare_number() {
        let id = CounterId::new(3);
        assert_eq!(id.to_string(), "3");
        assert_eq!(id.into_inner(), 3);
    }

    #[test]
    fn counter_id_orders_numerically() {
        assert!(CounterId::new(2) < CounterId::new(10));
    }
}
