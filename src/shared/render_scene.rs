//! Render-Szene als expliziter Übergabevertrag zwischen App und Renderer.
//!
//! Lebt im shared-Modul, da `app` sie baut und der Host-Renderer sie konsumiert.

use crate::core::{Camera3D, CursorStyle};
use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use serde::Serialize;

/// Vertex des Bands für GPU-Upload (Position + Textur-Koordinate entlang des Bands).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct BandVertex {
    /// Position im 3D-Raum
    pub position: [f32; 3],
    /// Bogenlänge ab Bandanfang in Welteinheiten (für wiederholende Texturen)
    pub arc_length: f32,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone, Serialize)]
pub struct RenderScene {
    /// Band-Stützpunkte von der Karte bis zum Aufhängepunkt (leer ohne Kette)
    pub band: Vec<Vec3>,
    /// Länge des Bands
    pub band_length: f32,
    pub card_position: Option<Vec3>,
    pub card_rotation: Quat,
    pub cursor: CursorStyle,
    pub hovered: bool,
    pub dragging: bool,
    /// Kartenhöhe für die Host-Anzeige
    pub height: Option<f32>,
    /// Ersatz-Kette nach dem Hochziehen aktiv
    pub card_block: bool,
    /// Kamera-Zustand für diesen Frame
    pub camera: Camera3D,
    /// Viewport-Größe in Pixeln [Breite, Höhe]
    pub viewport_size: [f32; 2],
}

impl RenderScene {
    /// Gibt zurück, ob eine Kette gerendert werden kann.
    pub fn has_chain(&self) -> bool {
        self.card_position.is_some()
    }

    /// Band als Vertex-Liste mit kumulierter Bogenlänge.
    pub fn band_vertices(&self) -> Vec<BandVertex> {
        let mut arc_length = 0.0;
        let mut previous = self.band.first().copied();
        self.band
            .iter()
            .map(|point| {
                if let Some(prev) = previous {
                    arc_length += prev.distance(*point);
                }
                previous = Some(*point);
                BandVertex {
                    position: point.to_array(),
                    arc_length,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scene_with_band(band: Vec<Vec3>) -> RenderScene {
        RenderScene {
            band_length: crate::shared::spline_geometry::polyline_length(&band),
            band,
            card_position: Some(Vec3::ZERO),
            card_rotation: Quat::IDENTITY,
            cursor: CursorStyle::Auto,
            hovered: false,
            dragging: false,
            height: Some(0.0),
            card_block: false,
            camera: Camera3D::new(),
            viewport_size: [800.0, 600.0],
        }
    }

    #[test]
    fn test_band_vertices_accumulate_length() {
        let scene = scene_with_band(vec![
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
        ]);
        let vertices = scene.band_vertices();
        assert_eq!(vertices.len(), 3);
        assert_relative_eq!(vertices[0].arc_length, 0.0);
        assert_relative_eq!(vertices[2].arc_length, scene.band_length);
        assert_eq!(vertices[1].position, [0.0, 1.0, 0.0]);
        // Pod-Layout: 4 floats pro Vertex
        assert_eq!(bytemuck::cast_slice::<BandVertex, f32>(&vertices).len(), 12);
    }

    #[test]
    fn test_empty_band() {
        let scene = scene_with_band(Vec::new());
        assert!(scene.band_vertices().is_empty());
        assert_relative_eq!(scene.band_length, 0.0);
    }
}
