//! Flutter-facing bindings for the almanac core.

pub mod api;
