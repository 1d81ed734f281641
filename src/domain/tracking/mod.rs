// SPDX-License-Identifier: MPL-2.0
//! Position-tracking domain types.

pub mod history;
pub mod newtypes;

pub use history::{PositionEntry, PositionHistory};
pub use newtypes::{DebounceWindow, HistoryCapacity, MinSeekGap};
