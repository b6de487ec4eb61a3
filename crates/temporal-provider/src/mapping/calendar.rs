// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Rendering of structured calendar ranges back into cron-like field text.

use std::fmt::Write;

use temporal_protocol::proto::schedule::Range;

/// Comma-joined `start[-end][/step]` tokens; empty input gives `""`.
pub fn format_ranges(ranges: &[Range]) -> String {
    let mut out = String::new();
    for (i, range) in ranges.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        format_single_range(&mut out, range);
    }
    out
}

/// Append one range. `-end` only when `end > start`, `/step` only when `step > 1`.
pub fn format_single_range(out: &mut String, range: &Range) {
    let _ = write!(out, "{}", range.start);
    if range.end > range.start {
        let _ = write!(out, "-{}", range.end);
    }
    if range.step > 1 {
        let _ = write!(out, "/{}", range.step);
    }
}
