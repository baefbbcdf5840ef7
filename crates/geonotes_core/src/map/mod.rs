//! Map interaction core.
//!
//! # Responsibility
//! - Mirror displayed markers and derive their icons.
//! - Run the selection/move state machine over gesture and panel events.
//! - Decide GPS snapping of new notes against the live projection.
//!
//! # Invariants
//! - Single-threaded: all events are applied in delivery order on one thread.
//! - Projection state is never cached across events.

pub mod events;
pub mod icon;
pub mod marker_store;
pub mod projection;
pub mod selection;
pub mod snap;
