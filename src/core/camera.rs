//! 3D-Perspektivkamera mit Unproject für Pointer-Eingaben.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Perspektivkamera, die auf `target` blickt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera3D {
    /// Position der Kamera in Welt-Koordinaten
    pub position: Vec3,
    /// Blickpunkt
    pub target: Vec3,
    /// Vertikales Sichtfeld in Grad
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    /// Standard-Kameraposition der Lanyard-Szene.
    pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 12.0);
    /// Standard-Sichtfeld in Grad.
    pub const DEFAULT_FOV_Y: f32 = 25.0;
    /// Tiefe (NDC-z), auf der der Pointer-Strahl aufgespannt wird.
    pub const POINTER_DEPTH_NDC: f32 = 0.5;

    /// Erstellt eine neue Kamera
    pub fn new() -> Self {
        Self {
            position: Self::DEFAULT_POSITION,
            target: Vec3::ZERO,
            fov_y_degrees: Self::DEFAULT_FOV_Y,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projektionsmatrix (OpenGL-Konvention, NDC-z ∈ [-1, 1]).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    /// Transformiert einen NDC-Punkt (x, y, z) zurück in Weltkoordinaten.
    pub fn unproject(&self, ndc: Vec3, aspect: f32) -> Vec3 {
        let inverse = (self.projection_matrix(aspect) * self.view_matrix()).inverse();
        let world = inverse * ndc.extend(1.0);
        if world.w.abs() < f32::EPSILON {
            return world.truncate();
        }
        world.truncate() / world.w
    }

    /// Bildet einen Pointer (NDC) auf einen 3D-Punkt ab.
    ///
    /// Näherung statt echter Ebenen-Schnittpunkt: Der Strahl von der Kamera durch den
    /// unprojizierten Punkt wird um die Länge des Kamera-Positionsvektors verlängert.
    pub fn pointer_to_world(&self, ndc: Vec2, aspect: f32) -> Vec3 {
        let point = self.unproject(ndc.extend(Self::POINTER_DEPTH_NDC), aspect);
        let dir = (point - self.position).normalize_or_zero();
        point + dir * self.position.length()
    }

    /// Konvertiert Screen-Pixel (Ursprung oben links) in NDC (-1 bis 1, y nach oben).
    pub fn screen_to_ndc(screen_pos: Vec2, viewport_size: Vec2) -> Vec2 {
        let size = viewport_size.max(Vec2::ONE);
        let normalized = screen_pos / size;
        Vec2::new(normalized.x * 2.0 - 1.0, 1.0 - normalized.y * 2.0)
    }

    /// Seitenverhältnis eines Viewports (Breite / Höhe).
    pub fn aspect_of(viewport_size: [f32; 2]) -> f32 {
        viewport_size[0].max(1.0) / viewport_size[1].max(1.0)
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new()
    }
}
