//! Use-Case-Funktionen für Pointer, Hover und Drag.

use crate::app::AppState;
use glam::Vec2;

/// Speichert die aktuelle Pointer-Position (NDC).
pub fn set_pointer(state: &mut AppState, ndc: Vec2) {
    state.pointer.ndc = ndc;
}

/// Setzt den Hover-Zustand (nur Cursor-Feedback).
pub fn set_hovered(state: &mut AppState, hovered: bool) {
    state.pointer.drag.set_hovered(hovered);
}

/// Startet einen Drag an der aktuellen Pointer-Position.
///
/// Ohne Kette oder bei bereits laufendem Drag passiert nichts.
pub fn begin_drag(state: &mut AppState) {
    let Some(chain) = state.scene.chain.as_mut() else {
        log::debug!("Drag ohne Kette ignoriert");
        return;
    };
    if state.pointer.drag.is_dragging() {
        return;
    }
    let Some(card_pos) = chain.end_effector_position(&state.scene.world) else {
        log::warn!("Karte nicht in der Physik-Welt, Drag ignoriert");
        return;
    };
    let aspect = state.view.aspect();
    state
        .pointer
        .drag
        .on_pointer_down(state.pointer.ndc, &state.view.camera, aspect, card_pos);
    chain.begin_drag(&mut state.scene.world);
}

/// Beendet den Drag und gibt die Karte an die Simulation zurück.
pub fn end_drag(state: &mut AppState) {
    state.pointer.drag.on_pointer_up();
    if let Some(chain) = state.scene.chain.as_mut() {
        chain.end_drag(&mut state.scene.world);
    }
}
