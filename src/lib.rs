// SPDX-License-Identifier: MPL-2.0
//! `seekback` remembers recent playback positions on video-streaming
//! pages so a user can jump back to where they were before a seek.
//!
//! The crate is the stateful, event- and timer-driven core of that
//! feature: it decides when a media element is reliably ready for
//! tracking, which candidate positions deserve remembering under
//! distance and debounce rules that differ by input modality, and when
//! the tracked content itself has changed so stale state is discarded.
//!
//! Hosts implement the [`application::port`] traits (a media source and
//! a clock), then drive a [`tracker::SeekTracker`] with polls and media
//! events. Everything is single-threaded and cooperative; timers fire
//! inside `poll`.

#![doc(html_root_url = "https://docs.rs/seekback/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod tracker;

#[cfg(test)]
mod test_utils;

pub use application::port::{Clock, ElementId, MediaEvent, MediaSource, SystemClock, VirtualClock};
pub use domain::tracking::{DebounceWindow, HistoryCapacity, MinSeekGap, PositionEntry};
pub use error::{Error, Result};
pub use tracker::{
    PositionOrigin, RecalledPosition, RecordOutcome, SeekModality, SeekTracker, TrackerParams,
};
