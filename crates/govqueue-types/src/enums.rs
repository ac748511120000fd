//! Enumeration types for the GovQueue token management system.
//!
//! Both enums serialize as `SCREAMING_SNAKE_CASE` strings, matching the
//! wire format the dashboard frontend and the database rows use.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Service categories
// ---------------------------------------------------------------------------

/// A service category with its own sequence numbering and average duration.
///
/// The set is fixed for a deployment; per-category display prefix and
/// average service minutes come from the category registry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ServiceCategory {
    /// Land revenue, certificates, and tax services.
    Revenue,
    /// Aadhaar enrolment and update services.
    Aadhaar,
    /// Ration card services.
    Ration,
    /// Utility bill payment services.
    Utility,
}

impl ServiceCategory {
    /// Every category, in display order.
    ///
    /// Used by the registry to verify configuration completeness and by
    /// the frontend to render the service selection form.
    pub const ALL: [Self; 4] = [Self::Revenue, Self::Aadhaar, Self::Ration, Self::Utility];

    /// The stable string form used on the wire and in database rows.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "REVENUE",
            Self::Aadhaar => "AADHAAR",
            Self::Ration => "RATION",
            Self::Utility => "UTILITY",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REVENUE" => Some(Self::Revenue),
            "AADHAAR" => Some(Self::Aadhaar),
            "RATION" => Some(Self::Ration),
            "UTILITY" => Some(Self::Utility),
            _ => None,
        }
    }
}

impl core::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Token status
// ---------------------------------------------------------------------------

/// Lifecycle state of an issued token.
///
/// Transitions: `Waiting -> Serving -> {Completed | Skipped}` and
/// `Waiting -> Cancelled`. Completed, Cancelled, and Skipped are terminal;
/// no further mutation is permitted once a token reaches one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum TokenStatus {
    /// In the queue, not yet called to a counter.
    Waiting,
    /// Currently being served at a counter.
    Serving,
    /// Service finished successfully.
    Completed,
    /// Withdrawn by the requester before being called.
    Cancelled,
    /// Called but not fulfilled (no-show); never re-queued.
    Skipped,
}

impl TokenStatus {
    /// Whether this status admits no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Skipped)
    }

    /// The stable string form used on the wire and in database rows.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Serving => "SERVING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Skipped => "SKIPPED",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WAITING" => Some(Self::Waiting),
            "SERVING" => Some(Self::Serving),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            "SKIPPED" => Some(Self::Skipped),
            _ => None,
        }
    }
}

impl core::fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_screaming_snake() {
        let json = serde_json::to_string(&ServiceCategory::Aadhaar).ok();
        assert_eq!(json.as_deref(), Some("\"AADHAAR\""));
    }

    #[test]
    fn category_string_roundtrip() {
        for cat in ServiceCategory::ALL {
            assert_eq!(ServiceCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(ServiceCategory::parse("PASSPORT"), None);
    }

    #[test]
    fn status_terminal_classification() {
        assert!(!TokenStatus::Waiting.is_terminal());
        assert!(!TokenStatus::Serving.is_terminal());
        assert!(TokenStatus::Completed.is_terminal());
        assert!(TokenStatus::Cancelled.is_terminal());
        assert!(TokenStatus::Skipped.is_terminal());
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [
            TokenStatus::Waiting,
            TokenStatus::Serving,
            TokenStatus::Completed,
            TokenStatus::Cancelled,
            TokenStatus::Skipped,
        ] {
            assert_eq!(TokenStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TokenStatus::parse("PAUSED"), None);
    }
}
