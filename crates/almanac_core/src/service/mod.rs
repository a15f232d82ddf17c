//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate key-value repository calls into store-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod budget_service;
pub mod calendar_service;
pub mod export_service;
pub mod leave_service;
pub mod plan_service;
pub mod profile_service;
