//! Pinned-to-bottom scroll policy for the message timeline.
//!
//! DESIGN
//! ======
//! Pure geometry, no UI handles: the host reports viewport metrics after
//! every scroll or layout pass, then asks where to scroll whenever the
//! timeline grows. Within the configured threshold of the bottom counts
//! as pinned; a pinned viewport follows new content, an unpinned one
//! stays put. The policy is re-evaluated on every mutation, so a reader
//! who scrolls up stops following until they return to the tail.

use crate::config::SyncConfig;

#[derive(Debug, Clone)]
pub struct ScrollManager {
    threshold_px: f64,
    scroll_top: f64,
    viewport_height: f64,
    content_height: f64,
}

impl ScrollManager {
    #[must_use]
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            threshold_px: config.scroll_pin_threshold_px,
            scroll_top: 0.0,
            viewport_height: 0.0,
            content_height: 0.0,
        }
    }

    /// Record the latest viewport metrics from the host.
    pub fn record_viewport(&mut self, scroll_top: f64, viewport_height: f64, content_height: f64) {
        self.scroll_top = scroll_top;
        self.viewport_height = viewport_height;
        self.content_height = content_height;
    }

    /// Whether the viewport counts as at the bottom right now. Content
    /// shorter than the viewport is always pinned.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        let distance = self.content_height - self.viewport_height - self.scroll_top;
        distance <= self.threshold_px
    }

    /// The timeline grew to `content_height`. Returns the offset the host
    /// should scroll to, or `None` to leave the position untouched.
    #[must_use]
    pub fn on_content_grown(&mut self, content_height: f64) -> Option<f64> {
        let pinned = self.is_pinned();
        self.content_height = content_height;
        if !pinned {
            return None;
        }
        let target = (content_height - self.viewport_height).max(0.0);
        self.scroll_top = target;
        Some(target)
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }
}

#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;
