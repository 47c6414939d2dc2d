//! Seilkette: Aufhängepunkt, drei Zwischenglieder und die Karte als End-Effektor.
//!
//! Die Kette besitzt nur Handles; Positionen und Geschwindigkeiten gehören der
//! `PhysicsWorld`. Pro Frame werden die Rohpositionen nach dem Physik-Schritt
//! gelesen und für Glättung und Kurve zwischengespeichert.

use super::physics::{
    BodyDesc, BodyHandle, BodyKind, JointHandle, PhysicsWorld, RopeJointDesc, SphericalJointDesc,
};
use super::release::{CancelToken, PendingRelease, ReleaseState};
use super::smoothing::{smooth_towards, SmoothingParams};
use super::stabilizer::{stabilize, StabilizerParams};
use crate::shared::spline_geometry::{catmull_rom_curve, SplineParameterization};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anzahl der Glieder (Anker, drei Zwischenglieder, Karte).
pub const CHAIN_LEN: usize = 5;

const ANCHOR: usize = 0;
const MID_1: usize = 1;
const MID_2: usize = 2;
const MID_3: usize = 3;
const CARD: usize = 4;

/// Geometrie und Materialwerte der Kette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Höhe des Aufhängepunkts
    pub anchor_height: f32,
    /// Abstand der Glieder entlang X beim Erzeugen
    pub link_spacing: f32,
    /// Maximale Länge eines Seilstücks
    pub rope_length: f32,
    pub rope_damping: f32,
    /// Gelenkpunkt im lokalen Raum der Karte
    pub card_pivot: Vec3,
    pub pivot_damping: f32,
    pub segment_radius: f32,
    pub segment_density: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub card_mass: f32,
    pub card_half_extents: Vec3,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            anchor_height: 4.0,
            link_spacing: 0.5,
            rope_length: 1.0,
            rope_damping: 10.0,
            card_pivot: Vec3::new(0.0, 1.45, 0.0),
            pivot_damping: 5.0,
            segment_radius: 0.1,
            segment_density: 1.0,
            linear_damping: 3.0,
            angular_damping: 4.0,
            card_mass: 0.2,
            card_half_extents: Vec3::new(0.8, 1.125, 0.01),
        }
    }
}

/// Rolle eines Glieds in der Kette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointRole {
    Anchor,
    Mid1,
    Mid2,
    Mid3,
    Card,
}

impl JointRole {
    /// Reihenfolge vom Aufhängepunkt bis zur Karte.
    pub const ORDER: [JointRole; CHAIN_LEN] = [
        JointRole::Anchor,
        JointRole::Mid1,
        JointRole::Mid2,
        JointRole::Mid3,
        JointRole::Card,
    ];
}

/// Ein Glied der Kette.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainJoint {
    pub handle: BodyHandle,
    pub role: JointRole,
    /// Rohposition nach dem letzten Physik-Schritt
    pub raw: Vec3,
    /// Geglättete Position, `None` bis zum ersten Filter-Update
    pub smoothed: Option<Vec3>,
}

/// Betriebsart der Karte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndEffectorMode {
    /// Kinematisch festgehalten, bis die verzögerte Freigabe feuert
    Parked { at: Vec3 },
    /// Frei simuliert
    Dynamic,
    /// Kinematisch vom Pointer geführt
    Dragging { target: Vec3 },
}

/// Die Seilkette einer Szene.
#[derive(Debug)]
pub struct RopeChain {
    joints: [ChainJoint; CHAIN_LEN],
    links: Vec<JointHandle>,
    mode: EndEffectorMode,
    release: Option<PendingRelease>,
    anchor_position: Vec3,
}

impl RopeChain {
    /// Erzeugt die Kette bei `[displacement_x, anchor_height, 0]`.
    ///
    /// Mit `delay > 0` wird die Karte bei `park_at` (sonst im Ursprung) kinematisch
    /// geparkt, schlafen gelegt und eine verzögerte Freigabe geschärft.
    pub fn spawn<W: PhysicsWorld>(
        world: &mut W,
        config: &ChainConfig,
        displacement_x: f32,
        delay: Option<Duration>,
        park_at: Option<Vec3>,
    ) -> Self {
        let origin = Vec3::new(displacement_x, config.anchor_height, 0.0);
        let local = |index: usize| Vec3::new(index as f32 * config.link_spacing, 0.0, 0.0);
        let parked = delay.filter(|d| !d.is_zero());

        let segment = |position: Vec3| {
            BodyDesc::dynamic(position)
                .with_ball(config.segment_radius, config.segment_density)
                .with_damping(config.linear_damping, config.angular_damping)
                .with_can_sleep(true)
        };

        let anchor = world.create_body(&BodyDesc::fixed(origin));
        let mid_1 = world.create_body(&segment(origin + local(MID_1)));
        let mid_2 = world.create_body(&segment(origin + local(MID_2)));
        let mid_3 = world.create_body(&segment(origin + local(MID_3)));

        let park_position = park_at.unwrap_or(Vec3::ZERO);
        let mut card_desc = BodyDesc::dynamic(origin + local(CARD))
            .with_cuboid(config.card_half_extents, config.card_mass)
            .with_damping(config.linear_damping, config.angular_damping)
            .with_can_sleep(true);
        if parked.is_some() {
            card_desc.kind = BodyKind::Kinematic;
            card_desc.position = park_position;
        }
        let card = world.create_body(&card_desc);

        let rope = RopeJointDesc {
            local_anchor_a: Vec3::ZERO,
            local_anchor_b: Vec3::ZERO,
            max_distance: config.rope_length,
            damping: config.rope_damping,
        };
        let pivot = SphericalJointDesc {
            local_anchor_a: Vec3::ZERO,
            local_anchor_b: config.card_pivot,
            damping: config.pivot_damping,
        };
        let links = [
            world.create_rope_joint(anchor, mid_1, rope),
            world.create_rope_joint(mid_1, mid_2, rope),
            world.create_rope_joint(mid_2, mid_3, rope),
            world.create_spherical_joint(mid_3, card, pivot),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        let handles = [anchor, mid_1, mid_2, mid_3, card];
        let joints = std::array::from_fn(|index| {
            let handle = handles[index];
            ChainJoint {
                handle,
                role: JointRole::ORDER[index],
                raw: world.translation(handle).unwrap_or(origin),
                smoothed: None,
            }
        });

        let (mode, release) = match parked {
            Some(delay) => {
                world.sleep(card);
                log::info!(
                    "Kette bei x={displacement_x} erzeugt, Karte geparkt bei {park_position:?} für {}ms",
                    delay.as_millis()
                );
                (
                    EndEffectorMode::Parked { at: park_position },
                    Some(PendingRelease::arm(delay, card)),
                )
            }
            None => {
                log::info!("Kette bei x={displacement_x} erzeugt");
                (EndEffectorMode::Dynamic, None)
            }
        };

        Self {
            joints,
            links,
            mode,
            release,
            anchor_position: origin,
        }
    }

    pub fn mode(&self) -> EndEffectorMode {
        self.mode
    }

    pub fn joints(&self) -> &[ChainJoint; CHAIN_LEN] {
        &self.joints
    }

    pub fn joint(&self, role: JointRole) -> &ChainJoint {
        &self.joints[role as usize]
    }

    pub fn anchor_position(&self) -> Vec3 {
        self.anchor_position
    }

    pub fn card_handle(&self) -> BodyHandle {
        self.joints[CARD].handle
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn release_state(&self) -> Option<ReleaseState> {
        self.release.as_ref().map(PendingRelease::state)
    }

    /// Abbruch-Token der verzögerten Freigabe (falls eine existiert).
    pub fn release_token(&self) -> Option<CancelToken> {
        self.release.as_ref().map(PendingRelease::token)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, EndEffectorMode::Dragging { .. })
    }

    /// Liest die Zustände nach dem Physik-Schritt und zählt die Freigabe hoch.
    pub fn step<W: PhysicsWorld>(&mut self, world: &mut W, dt: f32) {
        for joint in &mut self.joints {
            if let Some(position) = world.translation(joint.handle) {
                joint.raw = position;
            }
        }

        let Some(callback) = self.release.as_mut().and_then(|r| r.advance(dt)) else {
            return;
        };
        match self.mode {
            EndEffectorMode::Parked { .. } => {
                if callback.invoke(world) {
                    log::debug!("Karte freigegeben");
                    self.mode = EndEffectorMode::Dynamic;
                }
            }
            // Nach einem Drag ist die Karte bereits frei
            EndEffectorMode::Dynamic | EndEffectorMode::Dragging { .. } => {}
        }
    }

    /// Schaltet die Karte auf kinematische Führung.
    ///
    /// Eine noch ausstehende Freigabe wird verworfen: nach dem Loslassen ist die Karte frei.
    pub fn begin_drag<W: PhysicsWorld>(&mut self, world: &mut W) {
        if self.is_dragging() {
            return;
        }
        if let Some(release) = self.release.as_mut() {
            release.cancel();
        }
        let card = self.card_handle();
        let target = world.translation(card).unwrap_or(self.joints[CARD].raw);
        world.set_body_kind(card, BodyKind::Kinematic);
        self.wake_all(world);
        self.mode = EndEffectorMode::Dragging { target };
        log::debug!("Karte wird gezogen");
    }

    /// Gibt die Karte an die Simulation zurück. `false`, wenn nicht gezogen wurde.
    pub fn end_drag<W: PhysicsWorld>(&mut self, world: &mut W) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let card = self.card_handle();
        world.set_body_kind(card, BodyKind::Dynamic);
        world.wake_up(card);
        self.mode = EndEffectorMode::Dynamic;
        log::debug!("Karte losgelassen");
        true
    }

    /// Gibt die Kartenposition für den nächsten Schritt exakt vor und weckt die ganze Kette.
    ///
    /// Nur im Drag-Modus wirksam, sonst `false`.
    pub fn set_end_effector_target<W: PhysicsWorld>(&mut self, world: &mut W, pos: Vec3) -> bool {
        let EndEffectorMode::Dragging { target } = &mut self.mode else {
            return false;
        };
        *target = pos;
        world.set_next_kinematic_translation(self.joints[CARD].handle, pos);
        self.wake_all(world);
        true
    }

    fn wake_all<W: PhysicsWorld>(&self, world: &mut W) {
        for joint in &self.joints {
            world.wake_up(joint.handle);
        }
    }

    /// Zieht die geglätteten Positionen der beiden oberen Zwischenglieder nach.
    pub fn update_smoothing(&mut self, dt: f32, params: &SmoothingParams) {
        for index in [MID_1, MID_2] {
            let joint = &mut self.joints[index];
            smooth_towards(&mut joint.smoothed, joint.raw, dt, params);
        }
    }

    /// Kontrollpunkte des Bands: Karte (roh), Mitte-2 und Mitte-1 (geglättet), Anker (roh).
    pub fn control_points(&self) -> [Vec3; 4] {
        let smoothed = |index: usize| {
            let joint = &self.joints[index];
            joint.smoothed.unwrap_or(joint.raw)
        };
        [
            self.joints[CARD].raw,
            smoothed(MID_2),
            smoothed(MID_1),
            self.joints[ANCHOR].raw,
        ]
    }

    pub fn build_curve(&self, samples: usize, parameterization: SplineParameterization) -> Vec<Vec3> {
        catmull_rom_curve(&self.control_points(), samples, parameterization)
    }

    /// Dreht die Karte Richtung Kamera zurück. Nur bei wacher, frei simulierter Karte.
    pub fn stabilize<W: PhysicsWorld>(&self, world: &mut W, params: &StabilizerParams) {
        if self.mode != EndEffectorMode::Dynamic {
            return;
        }
        let card = self.card_handle();
        if world.body_kind(card) != Some(BodyKind::Dynamic) || world.is_sleeping(card) != Some(false)
        {
            return;
        }
        let (Some(angvel), Some(rotation)) = (world.angular_velocity(card), world.rotation(card))
        else {
            return;
        };
        world.set_angular_velocity(card, stabilize(angvel, rotation, params));
    }

    pub fn end_effector_position<W: PhysicsWorld>(&self, world: &W) -> Option<Vec3> {
        world.translation(self.card_handle())
    }

    /// Höhe der Karte (Y) für die Host-Anzeige.
    pub fn end_effector_height<W: PhysicsWorld>(&self, world: &W) -> Option<f32> {
        self.end_effector_position(world).map(|p| p.y)
    }

    pub fn card_pose<W: PhysicsWorld>(&self, world: &W) -> Option<(Vec3, Quat)> {
        let card = self.card_handle();
        Some((world.translation(card)?, world.rotation(card)?))
    }

    /// Baut die Kette ab. Eine ausstehende Freigabe wird dabei abgebrochen.
    pub fn despawn<W: PhysicsWorld>(mut self, world: &mut W) {
        if let Some(release) = self.release.as_mut() {
            release.cancel();
        }
        for link in self.links.drain(..) {
            world.remove_joint(link);
        }
        for joint in &self.joints {
            world.remove_body(joint.handle);
        }
        log::info!("Kette bei {:?} abgebaut", self.anchor_position);
    }
}
