//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for vehicle registrations and product designations
pub mod autocomplete;
