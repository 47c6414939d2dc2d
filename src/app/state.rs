//! Application State: Optionen, Ansicht, Pointer und die laufende Szene.

use super::CommandLog;
use crate::core::{Camera3D, DragController, RopeChain, RopeWorld};
use crate::shared::LanyardOptions;
use glam::{Vec2, Vec3};

/// Kamera und Viewport.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub camera: Camera3D,
    /// Viewport-Größe in Pixeln [Breite, Höhe]
    pub viewport_size: [f32; 2],
}

impl ViewState {
    pub fn new(camera: Camera3D) -> Self {
        Self {
            camera,
            viewport_size: [1280.0, 720.0],
        }
    }

    /// Seitenverhältnis des aktuellen Viewports.
    pub fn aspect(&self) -> f32 {
        Camera3D::aspect_of(self.viewport_size)
    }
}

/// Pointer-Position und Drag-Zustand.
#[derive(Debug, Clone)]
pub struct PointerState {
    /// Letzte Pointer-Position in NDC
    pub ndc: Vec2,
    pub drag: DragController,
}

impl PointerState {
    pub fn new(drag_retain: f32) -> Self {
        Self {
            ndc: Vec2::ZERO,
            drag: DragController::new(drag_retain),
        }
    }
}

/// Physik-Welt, Kette und abgeleitete Frame-Daten.
#[derive(Debug)]
pub struct SceneState {
    pub world: RopeWorld,
    /// Aktive Kette (None = Szene nicht eingehängt)
    pub chain: Option<RopeChain>,
    /// Karte wurde über die Schwelle gezogen, Ersatz-Kette aktiv
    pub card_block: bool,
    /// Kartenhöhe nach dem letzten Frame
    pub height: Option<f32>,
    /// Band-Stützpunkte des letzten Frames
    pub band: Vec<Vec3>,
    /// Anzahl ausgeführter Frames seit dem Start
    pub frame_count: u64,
}

impl SceneState {
    pub fn new(options: &LanyardOptions) -> Self {
        Self {
            world: RopeWorld::new(options.solver_config()),
            chain: None,
            card_block: false,
            height: None,
            band: Vec::new(),
            frame_count: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.chain.is_some()
    }
}

/// Hauptzustand der Anwendung
#[derive(Debug)]
pub struct AppState {
    pub view: ViewState,
    pub pointer: PointerState,
    pub scene: SceneState,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: LanyardOptions,
}

impl AppState {
    /// Erstellt einen neuen App-State mit Standard-Optionen
    pub fn new() -> Self {
        Self::with_options(LanyardOptions::default())
    }

    /// Erstellt einen App-State mit gegebenen Optionen
    pub fn with_options(options: LanyardOptions) -> Self {
        Self {
            view: ViewState::new(options.camera()),
            pointer: PointerState::new(options.drag_retain),
            scene: SceneState::new(&options),
            command_log: CommandLog::new(),
            options,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
