//! Core business logic for snapfeed.
//!
//! Services sit between the GraphQL layer and the repositories. They take
//! the acting user explicitly, stamp audit columns, enforce ownership and
//! resolve polymorphic comment and report targets through the
//! [`TargetRegistry`].

pub mod services;

pub use services::*;
