// SPDX-License-Identifier: MPL-2.0
//! Media source port definition.
//!
//! This module defines the [`MediaSource`] trait through which the engine
//! observes the tracked media element. Per-site adapters implement it.
//!
//! # Design Notes
//!
//! - Every reading is an `Option`: an absent element, an unset source URL
//!   or a not-yet-known duration are ordinary states, not errors
//! - `current_time` is the site-overridable accessor; `native_time` is the
//!   element's own reading and serves as the last-resort fallback
//! - `duration` may be overridden per site (some players report duration
//!   through their own API before the element does); `f64::INFINITY` is a
//!   legitimate value for live streams
//! - Content identity is optional: sites that can produce a stable id for
//!   the current content return `true` from `has_content_identity` and
//!   non-null ids from `content_id`

use std::fmt;

/// Opaque identity of a media element.
///
/// The host assigns each distinct element a distinct id and keeps it stable
/// for that element's lifetime. The engine compares ids only; it never
/// interprets the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Readiness-indicating signals forwarded by the host.
///
/// All variants are treated identically by the readiness tracker when it is
/// not yet ready; `SeekCompleted` is additionally the moment a pre-seek
/// stable reading stops being meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// The element learned its metadata (duration, dimensions).
    LoadedMetadata,
    /// First frame of data is available.
    LoadedData,
    /// Playback could begin.
    CanPlay,
    /// The reported duration changed.
    DurationChanged,
    /// A seek finished.
    SeekCompleted,
}

/// Port for observing the tracked media element.
///
/// Implementations are per-site adapters. All methods take `&self`;
/// adapters with internal caches use interior mutability.
pub trait MediaSource: Send + Sync {
    /// Returns the identity of the currently tracked element, if any.
    fn element(&self) -> Option<ElementId>;

    /// Returns the instantaneous playback position in seconds.
    ///
    /// This is the site-overridable accessor and may disagree with
    /// [`native_time`](Self::native_time) around a seek.
    fn current_time(&self) -> Option<f64>;

    /// Returns the element-native playback position in seconds.
    ///
    /// Last-resort fallback when no better reading exists.
    fn native_time(&self) -> Option<f64>;

    /// Returns the duration in seconds, if known.
    ///
    /// Sites may override this with their own accessor. `f64::INFINITY`
    /// is valid (live streams); `0`, negative and `NaN` mean "not loaded".
    fn duration(&self) -> Option<f64>;

    /// Returns the element's reported source string, if set.
    fn source_url(&self) -> Option<String>;

    /// Returns a stable identifier for the current content, if the site
    /// can produce one.
    fn content_id(&self) -> Option<String> {
        None
    }

    /// Returns true when this source supplies stable content identifiers.
    ///
    /// Selects the identity-monitor mode: identifier comparison when true,
    /// source-string tracking otherwise.
    fn has_content_identity(&self) -> bool {
        false
    }
}
