//! Handler für den Frame-Tick.

use crate::app::use_cases;
use crate::app::AppState;

/// Führt die Frame-Pipeline für `dt` Sekunden aus.
pub fn advance(state: &mut AppState, dt: f32) {
    use_cases::frame::advance(state, dt);
}
