// SPDX-License-Identifier: MPL-2.0
//! Domain types for the tracking engine.
//!
//! Pure data and policy-free containers: clamped tunables and the bounded
//! position history. No I/O, no clocks, no ports.

pub mod tracking;

pub use tracking::{
    DebounceWindow, HistoryCapacity, MinSeekGap, PositionEntry, PositionHistory,
};
