// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Translation between configuration models and wire messages.
//!
//! Nothing in here performs I/O. Outbound translations fill defaults and
//! parse durations and timestamps; inbound translations render wire values
//! back into the textual form stored in state.

pub mod calendar;
pub mod duration;
pub mod namespace;
pub mod schedule;
pub mod search_attribute;

pub use calendar::{format_ranges, format_single_range};
pub use duration::{format_duration, format_duration_canonical, parse_duration};
pub use search_attribute::SearchAttributeType;
