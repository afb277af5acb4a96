//! Engine tuning parameters.
//!
//! DESIGN
//! ======
//! The redelivery window and the scroll-pin threshold are empirical
//! constants with no derivation from first principles; useful values depend
//! on deployment network characteristics. Both live in [`SyncConfig`] with
//! env overrides so deployments can tune them without a rebuild.

/// Milliseconds within which a same-content, same-sender message is treated
/// as a redelivery of an existing entry.
pub const DEFAULT_DEDUP_WINDOW_MS: i64 = 1000;

/// Distance from the bottom edge, in pixels, still counted as "at bottom"
/// for the scroll-follow policy.
pub const DEFAULT_SCROLL_PIN_THRESHOLD_PX: f64 = 50.0;

/// Tunable parameters shared across the sync stores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    /// Redelivery window for the content+sender duplicate check.
    pub dedup_window_ms: i64,
    /// "At bottom" tolerance for the scroll-follow policy.
    pub scroll_pin_threshold_px: f64,
}

impl SyncConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `CHATSYNC_DEDUP_WINDOW_MS`: default 1000
    /// - `CHATSYNC_SCROLL_THRESHOLD_PX`: default 50
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            dedup_window_ms: env_parse("CHATSYNC_DEDUP_WINDOW_MS", DEFAULT_DEDUP_WINDOW_MS),
            scroll_pin_threshold_px: env_parse(
                "CHATSYNC_SCROLL_THRESHOLD_PX",
                DEFAULT_SCROLL_PIN_THRESHOLD_PX,
            ),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: DEFAULT_DEDUP_WINDOW_MS,
            scroll_pin_threshold_px: DEFAULT_SCROLL_PIN_THRESHOLD_PX,
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
