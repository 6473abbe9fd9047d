pub mod controller;
pub mod state;

pub use controller::{NoopRefresh, RefreshAction, RefreshController, REFRESH_HOLD};
pub use state::{DragOutcome, RefreshState, ScrollPosition, PULL_RESISTANCE, REFRESH_THRESHOLD_PX};
