//! Navigation bar appearance driven by the page scroll offset

use serde::{Deserialize, Serialize};

/// Offset (in scroll units) past which the navigation bar switches style
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 20.0;

/// Appearance of the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollStyle {
    /// Page is at (or near) the top
    #[default]
    Top,
    /// Page has been scrolled past the threshold
    Scrolled,
}

/// Two-state machine tracking [`ScrollStyle`].
///
/// Independent of the listing collection and the search query.
#[derive(Debug, Clone)]
pub struct ScrollStyleState {
    style: ScrollStyle,
    threshold: f64,
}

impl ScrollStyleState {
    pub fn new(threshold: f64) -> Self {
        Self {
            style: ScrollStyle::Top,
            threshold,
        }
    }

    pub fn style(&self) -> ScrollStyle {
        self.style
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed a vertical scroll offset.
    ///
    /// Returns the new style only when the offset caused a transition.
    /// Non-finite offsets are ignored.
    pub fn on_scroll(&mut self, offset: f64) -> Option<ScrollStyle> {
        if !offset.is_finite() {
            return None;
        }

        let next = if offset > self.threshold {
            ScrollStyle::Scrolled
        } else {
            ScrollStyle::Top
        };

        if next == self.style {
            return None;
        }

        self.style = next;
        Some(next)
    }
}

impl Default for ScrollStyleState {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}
