//! Application Controller für zentrale Event-Verarbeitung.

use super::render_scene;
use super::{AppCommand, AppIntent, AppState};
use crate::shared::RenderScene;

/// Orchestriert Host-Events und Use-Cases auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Szene ===
            AppCommand::MountChain {
                displacement_x,
                delay_ms,
            } => handlers::scene::mount(state, displacement_x, delay_ms),
            AppCommand::UnmountChain => handlers::scene::unmount(state),

            // === Viewport ===
            AppCommand::SetViewportSize { size } => handlers::view::set_viewport_size(state, size),

            // === Pointer ===
            AppCommand::SetHovered { hovered } => handlers::pointer::set_hovered(state, hovered),
            AppCommand::SetPointer { ndc } => handlers::pointer::set_pointer(state, ndc),
            AppCommand::BeginDrag => handlers::pointer::begin_drag(state),
            AppCommand::EndDrag => handlers::pointer::end_drag(state),

            // === Frame ===
            AppCommand::AdvanceFrame { dt } => handlers::frame::advance(state, dt),

            // === Optionen ===
            AppCommand::ApplyOptions { options } => handlers::options::apply(state, *options)?,
            AppCommand::SaveOptions { path } => handlers::options::save(state, &path)?,
        }

        Ok(())
    }

    /// Baut die Render-Szene aus dem aktuellen AppState.
    pub fn build_render_scene(&self, state: &AppState) -> RenderScene {
        render_scene::build(state)
    }
}
