//! Use-case services outside the map state machine.
//!
//! # Responsibility
//! - Keep list/editing screens decoupled from storage details.

pub mod category_service;
