//! Physik-Schnittstelle: Body-/Joint-Beschreibungen und der `PhysicsWorld`-Vertrag.
//!
//! Die Seilkette spricht ausschließlich über diesen Trait mit der Physik.
//! Lesende Zugriffe auf unbekannte Handles liefern `None`, schreibende sind No-ops.

use glam::{Quat, Vec3};

/// Handle auf einen Rigid Body in einer `PhysicsWorld`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u32);

/// Handle auf einen Joint in einer `PhysicsWorld`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub u32);

/// Simulationsmodus eines Bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Voll simuliert (Gravitation + Constraints)
    Dynamic,
    /// Unbeweglich, unendliche Masse
    Fixed,
    /// Position wird extern vorgegeben, beeinflusst aber andere Bodies
    Kinematic,
}

/// Parameter für die Erzeugung eines Rigid Bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    /// Startposition in Weltkoordinaten
    pub position: Vec3,
    pub mass: f32,
    /// Skalare Trägheits-Näherung (Hauptträgheitsmoment)
    pub inertia: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
}

impl BodyDesc {
    /// Dynamischer Body mit Einheitsmasse an `position`.
    pub fn dynamic(position: Vec3) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            mass: 1.0,
            inertia: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            can_sleep: true,
        }
    }

    /// Fixierter Body (Aufhängepunkt).
    pub fn fixed(position: Vec3) -> Self {
        Self {
            kind: BodyKind::Fixed,
            ..Self::dynamic(position)
        }
    }

    /// Masse und Trägheit einer Vollkugel mit gegebener Dichte.
    pub fn with_ball(mut self, radius: f32, density: f32) -> Self {
        let mass = density * 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3);
        self.mass = mass;
        self.inertia = 0.4 * mass * radius * radius;
        self
    }

    /// Trägheit eines Quaders (Halbachsen) bei fester Masse.
    ///
    /// Verwendet das größte der drei Hauptträgheitsmomente.
    pub fn with_cuboid(mut self, half_extents: Vec3, mass: f32) -> Self {
        let e = half_extents * 2.0;
        let ix = e.y * e.y + e.z * e.z;
        let iy = e.x * e.x + e.z * e.z;
        let iz = e.x * e.x + e.y * e.y;
        self.mass = mass;
        self.inertia = mass / 12.0 * ix.max(iy).max(iz);
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }
}

/// Seil-Joint: begrenzt den Maximalabstand zweier Ankerpunkte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopeJointDesc {
    /// Ankerpunkt in lokalen Koordinaten von Body A
    pub local_anchor_a: Vec3,
    /// Ankerpunkt in lokalen Koordinaten von Body B
    pub local_anchor_b: Vec3,
    pub max_distance: f32,
    pub damping: f32,
}

/// Kugelgelenk: hält zwei lokale Ankerpunkte deckungsgleich.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalJointDesc {
    pub local_anchor_a: Vec3,
    pub local_anchor_b: Vec3,
    pub damping: f32,
}

/// Vertrag der Physik-Engine, wie ihn die Seilkette konsumiert.
pub trait PhysicsWorld {
    /// Legt einen Body an.
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;
    /// Entfernt einen Body samt aller daran hängenden Joints.
    fn remove_body(&mut self, body: BodyHandle);
    /// Legt einen Seil-Joint an. `None`, wenn einer der Bodies fehlt.
    fn create_rope_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        desc: RopeJointDesc,
    ) -> Option<JointHandle>;
    /// Legt ein Kugelgelenk an. `None`, wenn einer der Bodies fehlt.
    fn create_spherical_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        desc: SphericalJointDesc,
    ) -> Option<JointHandle>;
    fn remove_joint(&mut self, joint: JointHandle);

    fn translation(&self, body: BodyHandle) -> Option<Vec3>;
    fn rotation(&self, body: BodyHandle) -> Option<Quat>;
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3>;
    fn angular_velocity(&self, body: BodyHandle) -> Option<Vec3>;
    fn body_kind(&self, body: BodyHandle) -> Option<BodyKind>;
    fn is_sleeping(&self, body: BodyHandle) -> Option<bool>;

    fn set_angular_velocity(&mut self, body: BodyHandle, angvel: Vec3);
    /// Zielposition eines kinematischen Bodies für den nächsten Step.
    fn set_next_kinematic_translation(&mut self, body: BodyHandle, translation: Vec3);
    fn set_body_kind(&mut self, body: BodyHandle, kind: BodyKind);
    fn wake_up(&mut self, body: BodyHandle);
    fn sleep(&mut self, body: BodyHandle);

    /// Schreitet die Simulation um `dt` Sekunden voran.
    fn step(&mut self, dt: f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ball_mass_from_density() {
        let desc = BodyDesc::dynamic(Vec3::ZERO).with_ball(0.1, 1.0);
        assert_relative_eq!(desc.mass, 0.004_188_79, epsilon = 1e-6);
        assert_relative_eq!(desc.inertia, 0.4 * desc.mass * 0.01, epsilon = 1e-9);
    }

    #[test]
    fn test_cuboid_uses_largest_moment() {
        let desc = BodyDesc::dynamic(Vec3::ZERO).with_cuboid(Vec3::new(0.8, 1.125, 0.01), 0.2);
        // Größtes Moment: um die Z-Achse (Breite² + Höhe²)
        let expected = 0.2 / 12.0 * (1.6f32 * 1.6 + 2.25 * 2.25);
        assert_relative_eq!(desc.inertia, expected, epsilon = 1e-6);
        assert_relative_eq!(desc.mass, 0.2);
    }

    #[test]
    fn test_fixed_keeps_position() {
        let desc = BodyDesc::fixed(Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(desc.kind, BodyKind::Fixed);
        assert_eq!(desc.position, Vec3::new(0.0, 4.0, 0.0));
    }
}
