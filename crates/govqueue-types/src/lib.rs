//! Shared type definitions for the GovQueue token management system.
//!
//! This crate is the single source of truth for all types used across the
//! GovQueue workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the public dashboard and the admin panel.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers for tokens and counters
//! - [`enums`] -- Service categories and token lifecycle states
//! - [`structs`] -- Entity structs (tokens, counters, stats, snapshot)
//! - [`events`] -- Queue lifecycle events for the live-status stream

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ServiceCategory, TokenStatus};
pub use events::QueueEvent;
pub use ids::{CounterId, TokenId};
pub use structs::{Counter, DailyStats, QueueSnapshot, Token};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::TokenId::export_all();
        let _ = crate::ids::CounterId::export_all();

        let _ = crate::enums::ServiceCategory::export_all();
        let _ = crate::enums::TokenStatus::export_all();

        let _ = crate::structs::Token::export_all();
        let _ = crate::structs::Counter::export_all();
        let _ = crate::structs::DailyStats::export_all();
        let _ = crate::structs::QueueSnapshot::export_all();

        let _ = crate::events::QueueEvent::export_all();
    }
}
