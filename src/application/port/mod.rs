// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines the abstract interfaces the host implements. The
//! traits use only domain types and std, ensuring the engine remains
//! independent of any concrete page, player, or runtime.
//!
//! # Available Ports
//!
//! - [`source`]: The tracked media element (time, duration, identity)
//! - [`clock`]: Time, injectable for deterministic tests
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync`; the engine itself is single-threaded but
//!   hosts may hand the tracker to an event loop living elsewhere
//! - Degenerate readings are `Option`s, never errors
//! - No `async fn` - the engine is driven by `poll` and events

pub mod clock;
pub mod source;

// Re-export main types for convenience
pub use clock::{Clock, SystemClock, VirtualClock};
pub use source::{ElementId, MediaEvent, MediaSource};
