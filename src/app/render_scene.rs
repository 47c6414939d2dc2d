//! Builder für Render-Szenen aus dem AppState.

use crate::app::AppState;
use crate::shared::spline_geometry::polyline_length;
use crate::shared::RenderScene;
use glam::Quat;

/// Baut eine RenderScene aus dem aktuellen AppState.
pub fn build(state: &AppState) -> RenderScene {
    let pose = state
        .scene
        .chain
        .as_ref()
        .and_then(|chain| chain.card_pose(&state.scene.world));
    let drag = &state.pointer.drag;

    RenderScene {
        band: state.scene.band.clone(),
        band_length: polyline_length(&state.scene.band),
        card_position: pose.map(|(position, _)| position),
        card_rotation: pose.map_or(Quat::IDENTITY, |(_, rotation)| rotation),
        cursor: drag.cursor(),
        hovered: drag.is_hovered(),
        dragging: drag.is_dragging(),
        height: state.scene.height,
        card_block: state.scene.card_block,
        camera: state.view.camera,
        viewport_size: state.view.viewport_size,
    }
}
