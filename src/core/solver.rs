//! Eingebauter Positions-basierter Löser für die Seilkette.
//!
//! `RopeWorld` implementiert `PhysicsWorld` gerade so weit, wie die Kette es braucht:
//! Gravitation, Dämpfung, Seil- und Kugelgelenke, kinematische Bodies und Schlafen.
//! Kollisionen werden nicht erkannt.

use super::physics::{
    BodyDesc, BodyHandle, BodyKind, JointHandle, PhysicsWorld, RopeJointDesc, SphericalJointDesc,
};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Unterhalb dieser Länge gilt ein Vektor als Null.
const LENGTH_EPSILON: f32 = 1e-6;
/// Toleranz, ab der ein Seil als gespannt gilt.
const TAUT_TOLERANCE: f32 = 1e-3;

/// Globale Löser-Parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub gravity: Vec3,
    /// Fester Simulationsschritt in Sekunden
    pub timestep: f32,
    /// Constraint-Iterationen pro Schritt
    pub iterations: u32,
    /// Obergrenze der Teilschritte pro `step`-Aufruf (verhindert Nachlauf-Spiralen)
    pub max_substeps: u32,
    pub linear_sleep_threshold: f32,
    pub angular_sleep_threshold: f32,
    /// Ruhezeit in Sekunden, bevor ein Body einschläft
    pub time_until_sleep: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -40.0, 0.0),
            timestep: 1.0 / 60.0,
            iterations: 20,
            max_substeps: 4,
            linear_sleep_threshold: 0.4,
            angular_sleep_threshold: 0.5,
            time_until_sleep: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Body {
    kind: BodyKind,
    position: Vec3,
    prev_position: Vec3,
    rotation: Quat,
    prev_rotation: Quat,
    linvel: Vec3,
    angvel: Vec3,
    inv_mass: f32,
    inv_inertia: f32,
    linear_damping: f32,
    angular_damping: f32,
    can_sleep: bool,
    sleeping: bool,
    rest_time: f32,
    kinematic_target: Option<Vec3>,
}

impl Body {
    fn from_desc(desc: &BodyDesc) -> Self {
        let inverse = |v: f32| if v > 0.0 { 1.0 / v } else { 0.0 };
        Self {
            kind: desc.kind,
            position: desc.position,
            prev_position: desc.position,
            rotation: Quat::IDENTITY,
            prev_rotation: Quat::IDENTITY,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            inv_mass: inverse(desc.mass),
            inv_inertia: inverse(desc.inertia),
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
            can_sleep: desc.can_sleep,
            sleeping: false,
            rest_time: 0.0,
            kinematic_target: None,
        }
    }

    /// Wird der Body vom Löser bewegt?
    fn is_simulated(&self) -> bool {
        self.kind == BodyKind::Dynamic && !self.sleeping
    }

    /// Hält der Body wache Nachbarn wach bzw. weckt schlafende auf?
    fn is_active(&self) -> bool {
        match self.kind {
            BodyKind::Fixed => false,
            BodyKind::Dynamic | BodyKind::Kinematic => !self.sleeping,
        }
    }

    fn generalized_inv_mass(&self, r: Vec3, n: Vec3) -> f32 {
        if !self.is_simulated() {
            return 0.0;
        }
        self.inv_mass + self.inv_inertia * r.cross(n).length_squared()
    }

    /// Positionskorrektur `p` am Hebelarm `r` (XPBD-Stil).
    fn apply_correction(&mut self, p: Vec3, r: Vec3) {
        if !self.is_simulated() {
            return;
        }
        self.position += p * self.inv_mass;
        if self.inv_inertia > 0.0 {
            let dtheta = r.cross(p) * self.inv_inertia;
            self.rotation = integrate_rotation(self.rotation, dtheta, 1.0);
        }
    }

    fn wake(&mut self) {
        self.sleeping = false;
        self.rest_time = 0.0;
    }
}

#[derive(Debug, Clone, Copy)]
enum JointKind {
    Rope { max_distance: f32 },
    Spherical,
}

#[derive(Debug, Clone, Copy)]
struct Joint {
    a: BodyHandle,
    b: BodyHandle,
    local_a: Vec3,
    local_b: Vec3,
    damping: f32,
    kind: JointKind,
}

/// Minimaler Constraint-Löser für eine Seilkette.
#[derive(Debug, Clone, Default)]
pub struct RopeWorld {
    config: SolverConfig,
    bodies: Vec<Option<Body>>,
    joints: Vec<Option<Joint>>,
    accumulator: f32,
}

impl RopeWorld {
    /// Erstellt eine leere Welt mit den gegebenen Löser-Parametern.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            joints: Vec::new(),
            accumulator: 0.0,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Anzahl lebender Bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    /// Anzahl lebender Joints.
    pub fn joint_count(&self) -> usize {
        self.joints.iter().flatten().count()
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize)?.as_ref()
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize)?.as_mut()
    }

    fn push_joint(&mut self, joint: Joint) -> Option<JointHandle> {
        if joint.a == joint.b || self.body(joint.a).is_none() || self.body(joint.b).is_none() {
            return None;
        }
        self.joints.push(Some(joint));
        Some(JointHandle((self.joints.len() - 1) as u32))
    }

    fn substep(&mut self, h: f32) {
        self.propagate_wake();
        self.integrate(h);
        for _ in 0..self.config.iterations {
            self.solve_positions();
        }
        self.update_velocities(h);
        self.apply_joint_damping(h);
        self.update_sleep(h);
    }

    /// Schlafende dynamische Bodies aufwecken, die an einem aktiven Nachbarn hängen.
    fn propagate_wake(&mut self) {
        // Eine Kette braucht höchstens so viele Durchläufe wie sie Joints hat.
        for _ in 0..self.joints.len().max(1) {
            let mut changed = false;
            for joint in self.joints.iter().flatten() {
                let (Some(a), Some(b)) = (self.body(joint.a), self.body(joint.b)) else {
                    continue;
                };
                let wake_b = a.is_active() && b.kind == BodyKind::Dynamic && b.sleeping;
                let wake_a = b.is_active() && a.kind == BodyKind::Dynamic && a.sleeping;
                let (ja, jb) = (joint.a, joint.b);
                if wake_b {
                    if let Some(body) = self.bodies.get_mut(jb.0 as usize).and_then(Option::as_mut) {
                        body.wake();
                        changed = true;
                    }
                }
                if wake_a {
                    if let Some(body) = self.bodies.get_mut(ja.0 as usize).and_then(Option::as_mut) {
                        body.wake();
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn integrate(&mut self, h: f32) {
        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut().flatten() {
            body.prev_position = body.position;
            body.prev_rotation = body.rotation;
            match body.kind {
                BodyKind::Fixed => {}
                BodyKind::Kinematic => {
                    if let Some(target) = body.kinematic_target.take() {
                        body.position = target;
                    }
                }
                BodyKind::Dynamic => {
                    if body.sleeping {
                        continue;
                    }
                    body.linvel += gravity * h;
                    body.linvel *= 1.0 / (1.0 + h * body.linear_damping);
                    body.angvel *= 1.0 / (1.0 + h * body.angular_damping);
                    body.position += body.linvel * h;
                    body.rotation = integrate_rotation(body.rotation, body.angvel, h);
                }
            }
        }
    }

    fn solve_positions(&mut self) {
        for index in 0..self.joints.len() {
            let Some(joint) = self.joints[index] else {
                continue;
            };
            let Some((a, b)) = pair_mut(&mut self.bodies, joint.a, joint.b) else {
                continue;
            };
            let ra = a.rotation * joint.local_a;
            let rb = b.rotation * joint.local_b;
            let delta = (b.position + rb) - (a.position + ra);
            let distance = delta.length();
            let error = match joint.kind {
                JointKind::Rope { max_distance } => distance - max_distance,
                JointKind::Spherical => distance,
            };
            if error <= 0.0 || distance < LENGTH_EPSILON {
                continue;
            }
            let n = delta / distance;
            let w = a.generalized_inv_mass(ra, n) + b.generalized_inv_mass(rb, n);
            if w <= f32::EPSILON {
                continue;
            }
            let p = n * (error / w);
            a.apply_correction(p, ra);
            b.apply_correction(-p, rb);
        }
    }

    fn update_velocities(&mut self, h: f32) {
        for body in self.bodies.iter_mut().flatten() {
            match body.kind {
                BodyKind::Fixed => {}
                BodyKind::Kinematic => {
                    body.linvel = (body.position - body.prev_position) / h;
                    body.angvel = Vec3::ZERO;
                }
                BodyKind::Dynamic => {
                    if body.sleeping {
                        continue;
                    }
                    body.linvel = (body.position - body.prev_position) / h;
                    let dq = body.rotation * body.prev_rotation.inverse();
                    let omega = Vec3::new(dq.x, dq.y, dq.z) * (2.0 / h);
                    body.angvel = if dq.w < 0.0 { -omega } else { omega };
                }
            }
        }
    }

    /// Relative Geschwindigkeitsdämpfung entlang der Joints.
    fn apply_joint_damping(&mut self, h: f32) {
        for index in 0..self.joints.len() {
            let Some(joint) = self.joints[index] else {
                continue;
            };
            if joint.damping <= 0.0 {
                continue;
            }
            let factor = (joint.damping * h).min(1.0);
            let Some((a, b)) = pair_mut(&mut self.bodies, joint.a, joint.b) else {
                continue;
            };
            let wa = if a.is_simulated() { a.inv_mass } else { 0.0 };
            let wb = if b.is_simulated() { b.inv_mass } else { 0.0 };
            if wa + wb <= f32::EPSILON {
                continue;
            }
            match joint.kind {
                JointKind::Rope { max_distance } => {
                    let delta = (b.position + b.rotation * joint.local_b)
                        - (a.position + a.rotation * joint.local_a);
                    let distance = delta.length();
                    if distance < max_distance - TAUT_TOLERANCE || distance < LENGTH_EPSILON {
                        continue;
                    }
                    let n = delta / distance;
                    let dv = n * (b.linvel - a.linvel).dot(n) * factor;
                    a.linvel += dv * (wa / (wa + wb));
                    b.linvel -= dv * (wb / (wa + wb));
                }
                JointKind::Spherical => {
                    let ia = if a.is_simulated() { a.inv_inertia } else { 0.0 };
                    let ib = if b.is_simulated() { b.inv_inertia } else { 0.0 };
                    if ia + ib <= f32::EPSILON {
                        continue;
                    }
                    let dw = (b.angvel - a.angvel) * factor;
                    a.angvel += dw * (ia / (ia + ib));
                    b.angvel -= dw * (ib / (ia + ib));
                }
            }
        }
    }

    fn update_sleep(&mut self, h: f32) {
        let lin_sq = self.config.linear_sleep_threshold.powi(2);
        let ang_sq = self.config.angular_sleep_threshold.powi(2);
        let time_until_sleep = self.config.time_until_sleep;

        let mut candidates = vec![false; self.bodies.len()];
        for (index, slot) in self.bodies.iter_mut().enumerate() {
            let Some(body) = slot else { continue };
            if !body.is_simulated() || !body.can_sleep {
                continue;
            }
            if body.linvel.length_squared() < lin_sq && body.angvel.length_squared() < ang_sq {
                body.rest_time += h;
            } else {
                body.rest_time = 0.0;
            }
            candidates[index] = body.rest_time >= time_until_sleep;
        }

        // Ein Body schläft nur ein, wenn kein aktiver Nachbar ihn festhält.
        loop {
            let mut changed = false;
            for joint in self.joints.iter().flatten() {
                let (ia, ib) = (joint.a.0 as usize, joint.b.0 as usize);
                let (Some(a), Some(b)) = (self.body(joint.a), self.body(joint.b)) else {
                    continue;
                };
                let holds_b = a.is_active() && !candidates[ia];
                let holds_a = b.is_active() && !candidates[ib];
                if holds_b && candidates[ib] {
                    candidates[ib] = false;
                    changed = true;
                }
                if holds_a && candidates[ia] {
                    candidates[ia] = false;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        for (index, slot) in self.bodies.iter_mut().enumerate() {
            if let Some(body) = slot {
                if candidates[index] {
                    body.sleeping = true;
                    body.linvel = Vec3::ZERO;
                    body.angvel = Vec3::ZERO;
                }
            }
        }
    }
}

impl PhysicsWorld for RopeWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        self.bodies.push(Some(Body::from_desc(desc)));
        BodyHandle((self.bodies.len() - 1) as u32)
    }

    fn remove_body(&mut self, body: BodyHandle) {
        if let Some(slot) = self.bodies.get_mut(body.0 as usize) {
            *slot = None;
        }
        for slot in &mut self.joints {
            if slot.is_some_and(|j| j.a == body || j.b == body) {
                *slot = None;
            }
        }
    }

    fn create_rope_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        desc: RopeJointDesc,
    ) -> Option<JointHandle> {
        self.push_joint(Joint {
            a,
            b,
            local_a: desc.local_anchor_a,
            local_b: desc.local_anchor_b,
            damping: desc.damping,
            kind: JointKind::Rope {
                max_distance: desc.max_distance.max(0.0),
            },
        })
    }

    fn create_spherical_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        desc: SphericalJointDesc,
    ) -> Option<JointHandle> {
        self.push_joint(Joint {
            a,
            b,
            local_a: desc.local_anchor_a,
            local_b: desc.local_anchor_b,
            damping: desc.damping,
            kind: JointKind::Spherical,
        })
    }

    fn remove_joint(&mut self, joint: JointHandle) {
        if let Some(slot) = self.joints.get_mut(joint.0 as usize) {
            *slot = None;
        }
    }

    fn translation(&self, body: BodyHandle) -> Option<Vec3> {
        self.body(body).map(|b| b.position)
    }

    fn rotation(&self, body: BodyHandle) -> Option<Quat> {
        self.body(body).map(|b| b.rotation)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.body(body).map(|b| b.linvel)
    }

    fn angular_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.body(body).map(|b| b.angvel)
    }

    fn body_kind(&self, body: BodyHandle) -> Option<BodyKind> {
        self.body(body).map(|b| b.kind)
    }

    fn is_sleeping(&self, body: BodyHandle) -> Option<bool> {
        self.body(body).map(|b| b.sleeping)
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, angvel: Vec3) {
        if let Some(b) = self.body_mut(body) {
            b.angvel = angvel;
        }
    }

    fn set_next_kinematic_translation(&mut self, body: BodyHandle, translation: Vec3) {
        if let Some(b) = self.body_mut(body) {
            if b.kind == BodyKind::Kinematic {
                b.kinematic_target = Some(translation);
                b.wake();
            }
        }
    }

    fn set_body_kind(&mut self, body: BodyHandle, kind: BodyKind) {
        if let Some(b) = self.body_mut(body) {
            if b.kind != kind {
                b.kind = kind;
                b.kinematic_target = None;
                b.wake();
            }
        }
    }

    fn wake_up(&mut self, body: BodyHandle) {
        if let Some(b) = self.body_mut(body) {
            b.wake();
        }
    }

    fn sleep(&mut self, body: BodyHandle) {
        if let Some(b) = self.body_mut(body) {
            if b.kind != BodyKind::Fixed {
                b.sleeping = true;
                b.linvel = Vec3::ZERO;
                b.angvel = Vec3::ZERO;
            }
        }
    }

    fn step(&mut self, dt: f32) {
        let h = self.config.timestep;
        if h <= 0.0 {
            return;
        }
        self.accumulator += dt.max(0.0);
        let mut substeps = 0;
        while self.accumulator + 1e-6 >= h && substeps < self.config.max_substeps {
            self.substep(h);
            self.accumulator = (self.accumulator - h).max(0.0);
            substeps += 1;
        }
        if self.accumulator >= h {
            log::debug!(
                "Physik hinkt hinterher, verwerfe {:.3}s Rückstand",
                self.accumulator
            );
            self.accumulator %= h;
        }
    }
}

/// Integriert eine Orientierung um die Winkelgeschwindigkeit `omega` über `h`.
fn integrate_rotation(rotation: Quat, omega: Vec3, h: f32) -> Quat {
    let spin = Quat::from_xyzw(omega.x, omega.y, omega.z, 0.0) * rotation;
    (rotation + spin * (0.5 * h)).normalize()
}

/// Zwei verschiedene Bodies gleichzeitig mutabel ausleihen.
fn pair_mut(
    bodies: &mut [Option<Body>],
    a: BodyHandle,
    b: BodyHandle,
) -> Option<(&mut Body, &mut Body)> {
    let (ia, ib) = (a.0 as usize, b.0 as usize);
    if ia == ib || ia >= bodies.len() || ib >= bodies.len() {
        return None;
    }
    if ia < ib {
        let (left, right) = bodies.split_at_mut(ib);
        Some((left[ia].as_mut()?, right[0].as_mut()?))
    } else {
        let (left, right) = bodies.split_at_mut(ia);
        let body_b = left[ib].as_mut()?;
        let body_a = right[0].as_mut()?;
        Some((body_a, body_b))
    }
}
