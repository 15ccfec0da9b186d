use crate::{NormalizedSnapshot, RawUsageRecord};

/// Longest window, in minutes, that still counts as the short (5h) bucket when only one
/// side reports its duration.
pub const SHORT_WINDOW_MAX_MINUTES: u64 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSide {
    Primary,
    Secondary,
}

/// Which upstream side feeds each canonical bucket, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketSources {
    pub short: Option<WindowSide>,
    pub long: Option<WindowSide>,
}

impl BucketSources {
    fn pair(short: WindowSide, long: WindowSide) -> Self {
        Self {
            short: Some(short),
            long: Some(long),
        }
    }

    fn single(side: WindowSide, window_minutes: u64) -> Self {
        if window_minutes <= SHORT_WINDOW_MAX_MINUTES {
            Self {
                short: Some(side),
                long: None,
            }
        } else {
            Self {
                short: None,
                long: Some(side),
            }
        }
    }
}

pub fn classify_windows(
    primary_window_minutes: Option<u64>,
    secondary_window_minutes: Option<u64>,
) -> BucketSources {
    match (primary_window_minutes, secondary_window_minutes) {
        (Some(primary), Some(secondary)) if primary < secondary => {
            BucketSources::pair(WindowSide::Primary, WindowSide::Secondary)
        }
        // Equal durations land here too: secondary is treated as the short window.
        (Some(_), Some(_)) => BucketSources::pair(WindowSide::Secondary, WindowSide::Primary),
        (Some(primary), None) => BucketSources::single(WindowSide::Primary, primary),
        (None, Some(secondary)) => BucketSources::single(WindowSide::Secondary, secondary),
        (None, None) => BucketSources::pair(WindowSide::Secondary, WindowSide::Primary),
    }
}

/// Copies whichever side was classified into each bucket onto the `codex_5h_*` and
/// `codex_7d_*` fields. Raw fields are kept untouched.
pub fn normalize_windows(raw: RawUsageRecord) -> NormalizedSnapshot {
    let sources = classify_windows(raw.primary_window_minutes, raw.secondary_window_minutes);
    let short = sources
        .short
        .map(|side| raw.window(side))
        .unwrap_or_default();
    let long = sources.long.map(|side| raw.window(side)).unwrap_or_default();
    NormalizedSnapshot {
        raw,
        codex_5h_used_percent: short.used_percent,
        codex_5h_reset_after_seconds: short.reset_after_seconds,
        codex_5h_window_minutes: short.window_minutes,
        codex_7d_used_percent: long.used_percent,
        codex_7d_reset_after_seconds: long.reset_after_seconds,
        codex_7d_window_minutes: long.window_minutes,
    }
}
