//! Drag-Logik für die Karte: Pointer (NDC) → kinematisches 3D-Ziel.
//!
//! Zwischen zwei Frames wird das Ziel tiefpassgefiltert, damit Pointer-Zittern
//! keine sichtbare Schwingung in der Kette auslöst.

use super::camera::Camera3D;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Anteil der vorherigen Zielposition, der pro Frame erhalten bleibt.
pub const DRAG_FILTER_RETAIN: f32 = 0.92;

/// Aktiver Drag: Versatz vom Karten-Ursprung zum Griffpunkt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub grab_offset: Vec3,
}

/// Cursor-Rückmeldung für den Host (rein visuell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorStyle {
    #[default]
    Auto,
    Grab,
    Grabbing,
}

/// Zustand des Pointer-Drags inkl. Hover-Affordance.
#[derive(Debug, Clone)]
pub struct DragController {
    state: Option<DragState>,
    /// Gefiltertes Ziel des letzten Frames (None = nächster Frame ungefiltert)
    filtered: Option<Vec3>,
    hovered: bool,
    retain: f32,
}

impl DragController {
    /// Erstellt einen Controller mit Filter-Anteil `retain` ∈ [0, 1].
    pub fn new(retain: f32) -> Self {
        Self {
            state: None,
            filtered: None,
            hovered: false,
            retain: retain.clamp(0.0, 1.0),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn drag_state(&self) -> Option<DragState> {
        self.state
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn set_retain(&mut self, retain: f32) {
        self.retain = retain.clamp(0.0, 1.0);
    }

    /// Zuletzt ausgegebenes (gefiltertes) Ziel, falls gerade gezogen wird.
    pub fn last_target(&self) -> Option<Vec3> {
        self.filtered
    }

    /// Cursor-Stil: nur bei Hover relevant, während des Ziehens "Grabbing".
    pub fn cursor(&self) -> CursorStyle {
        match (self.hovered, self.is_dragging()) {
            (false, _) => CursorStyle::Auto,
            (true, false) => CursorStyle::Grab,
            (true, true) => CursorStyle::Grabbing,
        }
    }

    /// Startet einen Drag und merkt sich den Griff-Versatz.
    pub fn on_pointer_down(
        &mut self,
        ndc: Vec2,
        camera: &Camera3D,
        aspect: f32,
        end_effector_pos: Vec3,
    ) -> DragState {
        let grab_point = camera.pointer_to_world(ndc, aspect);
        let state = DragState {
            grab_offset: grab_point - end_effector_pos,
        };
        self.state = Some(state);
        self.filtered = None;
        log::debug!("Drag gestartet, Griff-Versatz {:?}", state.grab_offset);
        state
    }

    /// Berechnet das Karten-Ziel für den aktuellen Frame. `None`, wenn kein Drag aktiv ist.
    ///
    /// Der erste Aufruf nach dem Drag-Start liefert das ungefilterte Ziel.
    pub fn on_pointer_move(&mut self, ndc: Vec2, camera: &Camera3D, aspect: f32) -> Option<Vec3> {
        let state = self.state?;
        let raw = camera.pointer_to_world(ndc, aspect) - state.grab_offset;
        let target = match self.filtered {
            Some(previous) => previous * self.retain + raw * (1.0 - self.retain),
            None => raw,
        };
        self.filtered = Some(target);
        Some(target)
    }

    /// Beendet den Drag; der nächste Drag startet wieder ungefiltert.
    pub fn on_pointer_up(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Drag beendet");
        }
        self.filtered = None;
    }

    /// Abbau der Szene: Drag und Hover werden verworfen, auch ohne Pointer-Up.
    pub fn cancel(&mut self) {
        self.on_pointer_up();
        self.hovered = false;
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DRAG_FILTER_RETAIN)
    }
}
