// src/panel.rs
//
// Collapsible settings panel. Toggling animates the height between 0 and
// the expanded height over a fixed duration. A toggle mid-animation starts
// from wherever the panel currently is.

use serde::Serialize;
use std::time::{Duration, Instant};

pub const EXPANDED_HEIGHT: f64 = 100.0;
pub const ANIMATION_DURATION: Duration = Duration::from_millis(100);

/// What the frontend needs to run one animation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelAnimation {
    pub from: f64,
    pub to: f64,
    pub duration_ms: u64,
    pub expanded: bool,
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f64,
    to: f64,
    started: Instant,
}

#[derive(Clone, Debug)]
pub struct PanelTween {
    expanded: bool,
    expanded_height: f64,
    duration: Duration,
    tween: Option<Tween>,
}

impl Default for PanelTween {
    fn default() -> Self {
        Self::new(EXPANDED_HEIGHT, ANIMATION_DURATION)
    }
}

impl PanelTween {
    /// Starts collapsed.
    pub fn new(expanded_height: f64, duration: Duration) -> Self {
        Self {
            expanded: false,
            expanded_height,
            duration,
            tween: None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn target(&self) -> f64 {
        if self.expanded {
            self.expanded_height
        } else {
            0.0
        }
    }

    /// Height at `now`, linearly interpolated while an animation runs.
    pub fn height_at(&self, now: Instant) -> f64 {
        let Some(tween) = self.tween else {
            return self.target();
        };
        if self.duration.is_zero() {
            return tween.to;
        }
        let elapsed = now.saturating_duration_since(tween.started);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        tween.from + (tween.to - tween.from) * t
    }

    /// Flip the panel and start animating from its current height.
    pub fn toggle(&mut self, now: Instant) -> PanelAnimation {
        let from = self.height_at(now);
        self.expanded = !self.expanded;
        let to = self.target();
        self.tween = Some(Tween {
            from,
            to,
            started: now,
        });
        PanelAnimation {
            from,
            to,
            duration_ms: self.duration.as_millis() as u64,
            expanded: self.expanded,
        }
    }
}
