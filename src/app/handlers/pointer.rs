//! Handler für Pointer-Eingaben.

use crate::app::use_cases;
use crate::app::AppState;
use glam::Vec2;

pub fn set_pointer(state: &mut AppState, ndc: Vec2) {
    use_cases::pointer::set_pointer(state, ndc);
}

pub fn set_hovered(state: &mut AppState, hovered: bool) {
    use_cases::pointer::set_hovered(state, hovered);
}

/// Startet den Drag an der zuletzt gesetzten Pointer-Position.
pub fn begin_drag(state: &mut AppState) {
    use_cases::pointer::begin_drag(state);
}

pub fn end_drag(state: &mut AppState) {
    use_cases::pointer::end_drag(state);
}
