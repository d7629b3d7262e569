//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model, persistence, view and reminder layers into the
//!   handlers a driver dispatches user actions to.
//! - Keep drivers decoupled from storage and timer details.

pub mod task_service;
