// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports for dependency inversion.
//!
//! This module contains the seams between the tracking engine and its host:
//!
//! - [`port`]: Trait definitions (interfaces) the host implements
//!
//! # Dependency Rule
//!
//! - The application layer depends on the domain layer (uses domain types)
//! - The host (per-site adapters, key interceptors, dialogs) implements the
//!   application layer ports
//! - The tracker consumes ports only, never concrete host types

pub mod port;
