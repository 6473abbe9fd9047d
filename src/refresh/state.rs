use serde::Serialize;

/// Pull distance (after resistance) that must be exceeded on release.
pub const REFRESH_THRESHOLD_PX: f64 = 80.0;
pub const PULL_RESISTANCE: f64 = 0.5;

const INDICATOR_MAX_ROTATION_DEG: f64 = 270.0;
const REFRESHING_CONTENT_OFFSET_PX: f64 = 50.0;

/// Whether the scrollable view is at its top edge. Supplied by the host so
/// the gesture logic never touches a real UI.
pub trait ScrollPosition: Send + Sync {
    fn is_at_top(&self) -> bool;
}

impl<F> ScrollPosition for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_at_top(&self) -> bool {
        self()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RefreshState {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    Pulling {
        #[serde(skip)]
        start_y: f64,
        pull_distance: f64,
    },
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// The event does not apply in the current state.
    Ignored,
    Pulling(f64),
    /// Finger moved back up past the start point.
    Cancelled,
    /// Released below the threshold.
    Released,
    RefreshTriggered,
}

impl RefreshState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_start(&mut self, y: f64, scroll: &dyn ScrollPosition) -> DragOutcome {
        if self.is_refreshing() || !scroll.is_at_top() {
            return DragOutcome::Ignored;
        }
        *self = RefreshState::Pulling {
            start_y: y,
            pull_distance: 0.0,
        };
        DragOutcome::Pulling(0.0)
    }

    /// Pull distance is always derived from the total displacement since
    /// drag start, never accumulated across moves.
    pub fn drag_move(&mut self, y: f64) -> DragOutcome {
        let RefreshState::Pulling { start_y, .. } = *self else {
            return DragOutcome::Ignored;
        };

        let delta = y - start_y;
        if delta > 0.0 {
            let pull_distance = delta * PULL_RESISTANCE;
            *self = RefreshState::Pulling {
                start_y,
                pull_distance,
            };
            DragOutcome::Pulling(pull_distance)
        } else {
            *self = RefreshState::Idle;
            DragOutcome::Cancelled
        }
    }

    pub fn drag_end(&mut self) -> DragOutcome {
        let RefreshState::Pulling { pull_distance, .. } = *self else {
            return DragOutcome::Ignored;
        };

        if pull_distance > REFRESH_THRESHOLD_PX {
            *self = RefreshState::Refreshing;
            DragOutcome::RefreshTriggered
        } else {
            *self = RefreshState::Idle;
            DragOutcome::Released
        }
    }

    /// Ends a refresh. Returns `false` if no refresh was running.
    pub fn finish_refresh(&mut self) -> bool {
        if self.is_refreshing() {
            *self = RefreshState::Idle;
            true
        } else {
            false
        }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(self, RefreshState::Refreshing)
    }

    pub fn pull_distance(&self) -> f64 {
        match self {
            RefreshState::Pulling { pull_distance, .. } => *pull_distance,
            _ => 0.0,
        }
    }

    pub fn indicator_visible(&self) -> bool {
        self.is_refreshing() || self.pull_distance() > 0.0
    }

    /// Spinner rotation while pulling; reaches a full 270 degrees at the
    /// threshold.
    pub fn indicator_rotation_deg(&self) -> f64 {
        self.pull_distance().min(REFRESH_THRESHOLD_PX) / REFRESH_THRESHOLD_PX
            * INDICATOR_MAX_ROTATION_DEG
    }

    pub fn content_offset_px(&self) -> f64 {
        match self {
            RefreshState::Refreshing => REFRESHING_CONTENT_OFFSET_PX,
            RefreshState::Pulling { pull_distance, .. } => *pull_distance,
            RefreshState::Idle => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_top() -> bool {
        true
    }

    fn scrolled() -> bool {
        false
    }

    fn pull(state: &mut RefreshState, displacement: f64) -> DragOutcome {
        state.drag_start(100.0, &at_top);
        state.drag_move(100.0 + displacement / 2.0);
        state.drag_move(100.0 + displacement);
        state.drag_end()
    }

    #[test]
    fn long_pull_starts_refresh() {
        let mut state = RefreshState::new();
        assert_eq!(pull(&mut state, 200.0), DragOutcome::RefreshTriggered);
        assert!(state.is_refreshing());
    }

    #[test]
    fn short_pull_returns_to_idle() {
        let mut state = RefreshState::new();
        assert_eq!(pull(&mut state, 100.0), DragOutcome::Released);
        assert_eq!(state, RefreshState::Idle);
    }

    #[test]
    fn exactly_threshold_does_not_refresh() {
        let mut state = RefreshState::new();
        assert_eq!(pull(&mut state, 160.0), DragOutcome::Released);
        assert_eq!(state, RefreshState::Idle);
    }

    #[test]
    fn pull_distance_tracks_total_displacement() {
        let mut state = RefreshState::new();
        state.drag_start(10.0, &at_top);
        assert_eq!(state.drag_move(50.0), DragOutcome::Pulling(20.0));
        assert_eq!(state.drag_move(210.0), DragOutcome::Pulling(100.0));
        assert_eq!(state.drag_move(110.0), DragOutcome::Pulling(50.0));
        assert_eq!(state.pull_distance(), 50.0);
    }

    #[test]
    fn moving_up_cancels_immediately() {
        let mut state = RefreshState::new();
        state.drag_start(300.0, &at_top);
        state.drag_move(500.0);
        assert_eq!(state.drag_move(300.0), DragOutcome::Cancelled);
        assert_eq!(state, RefreshState::Idle);
        assert_eq!(state.pull_distance(), 0.0);
        assert_eq!(state.drag_end(), DragOutcome::Ignored);
    }

    #[test]
    fn drag_start_requires_top_of_view() {
        let mut state = RefreshState::new();
        assert_eq!(state.drag_start(0.0, &scrolled), DragOutcome::Ignored);
        assert_eq!(state.drag_move(400.0), DragOutcome::Ignored);
        assert_eq!(state, RefreshState::Idle);
    }

    #[test]
    fn gestures_are_ignored_while_refreshing() {
        let mut state = RefreshState::Refreshing;
        assert_eq!(state.drag_start(0.0, &at_top), DragOutcome::Ignored);
        assert_eq!(state.drag_move(400.0), DragOutcome::Ignored);
        assert_eq!(state.drag_end(), DragOutcome::Ignored);
        assert!(state.is_refreshing());

        assert!(state.finish_refresh());
        assert!(!state.finish_refresh());
    }

    #[test]
    fn indicator_geometry() {
        let mut state = RefreshState::new();
        assert!(!state.indicator_visible());
        assert_eq!(state.content_offset_px(), 0.0);

        state.drag_start(0.0, &at_top);
        state.drag_move(80.0);
        assert!(state.indicator_visible());
        assert_eq!(state.indicator_rotation_deg(), 135.0);
        assert_eq!(state.content_offset_px(), 40.0);

        state.drag_move(400.0);
        assert_eq!(state.indicator_rotation_deg(), 270.0);

        state.drag_end();
        assert!(state.indicator_visible());
        assert_eq!(state.content_offset_px(), 50.0);
    }

    #[test]
    fn serializes_with_status_tag() {
        let value = serde_json::to_value(RefreshState::Pulling {
            start_y: 12.0,
            pull_distance: 30.0,
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "status": "pulling", "pullDistance": 30.0 })
        );
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(RefreshState::default(), RefreshState::Idle);
        assert_eq!(
            serde_json::to_value(RefreshState::new()).unwrap(),
            serde_json::json!({ "status": "idle" })
        );
    }
}
