//! Mapping von Host-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState};
use crate::core::Camera3D;
use glam::Vec2;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::SceneMounted => {
            // Nach dem Hochziehen wird die versetzte, verzögerte Kette eingehängt
            let command = if state.scene.card_block {
                AppCommand::MountChain {
                    displacement_x: state.options.blocked_displacement_x,
                    delay_ms: state.options.blocked_delay_ms,
                }
            } else {
                AppCommand::MountChain {
                    displacement_x: 0.0,
                    delay_ms: 0,
                }
            };
            vec![command]
        }
        AppIntent::SceneUnmounted => vec![AppCommand::UnmountChain],
        AppIntent::ViewportResized { size } => vec![AppCommand::SetViewportSize { size }],
        AppIntent::PointerEntered => vec![AppCommand::SetHovered { hovered: true }],
        AppIntent::PointerLeft => vec![AppCommand::SetHovered { hovered: false }],
        AppIntent::PointerPressed { screen_pos } => {
            let ndc = screen_to_ndc(state, screen_pos);
            if state.scene.is_mounted() {
                vec![AppCommand::SetPointer { ndc }, AppCommand::BeginDrag]
            } else {
                vec![AppCommand::SetPointer { ndc }]
            }
        }
        AppIntent::PointerMoved { screen_pos } => vec![AppCommand::SetPointer {
            ndc: screen_to_ndc(state, screen_pos),
        }],
        AppIntent::PointerReleased => {
            if state.pointer.drag.is_dragging() {
                vec![AppCommand::EndDrag]
            } else {
                Vec::new()
            }
        }
        AppIntent::FrameRequested { dt } => vec![AppCommand::AdvanceFrame { dt }],
        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],
        AppIntent::SaveOptionsRequested { path } => vec![AppCommand::SaveOptions {
            path: path.unwrap_or_else(crate::shared::LanyardOptions::config_path),
        }],
    }
}

fn screen_to_ndc(state: &AppState, screen_pos: Vec2) -> Vec2 {
    Camera3D::screen_to_ndc(screen_pos, Vec2::from_array(state.view.viewport_size))
}

#[cfg(test)]
mod tests;
