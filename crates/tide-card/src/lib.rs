//! A clock-face tide gauge card for terminal dashboards.
//!
//! The card is a pure renderer: it owns a private visual tree, projects the
//! host's entity-state snapshots onto it, and talks back to the host only
//! through an injected notifier.  See [`card::DashboardCard`] for the
//! lifecycle contract a host drives.

pub mod card;
pub mod chrome;
pub mod dial;
pub mod render;
pub mod theme;
