//! Orientierungs-Stabilisierung der Karte (reiner P-Regler um eine Achse).

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Standard-Korrekturfaktor für die Drehung um die Hochachse.
pub const DEFAULT_CORRECTION_FACTOR: f32 = 0.20;

/// Parameter des Stabilisierers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerParams {
    /// Achse, um die zurückgedreht wird (wird normalisiert)
    pub axis: Vec3,
    pub correction_factor: f32,
}

impl Default for StabilizerParams {
    fn default() -> Self {
        Self {
            axis: Vec3::Y,
            correction_factor: DEFAULT_CORRECTION_FACTOR,
        }
    }
}

/// Drehwinkel von `rotation` um `axis` (Twist-Anteil der Swing-Twist-Zerlegung), in (-π, π].
///
/// Bewusst der echte Winkel, nicht die rohe Quaternion-Komponente entlang der Achse.
pub fn twist_angle(rotation: Quat, axis: Vec3) -> f32 {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO {
        return 0.0;
    }
    let projected = Vec3::new(rotation.x, rotation.y, rotation.z).dot(axis);
    wrap_angle(2.0 * projected.atan2(rotation.w))
}

/// Korrigierte Winkelgeschwindigkeit: Achsanteil wird um `winkel * faktor` reduziert.
///
/// Die beiden übrigen Achsen bleiben unverändert.
pub fn stabilize(angvel: Vec3, rotation: Quat, params: &StabilizerParams) -> Vec3 {
    let axis = params.axis.normalize_or_zero();
    if axis == Vec3::ZERO {
        return angvel;
    }
    let angle = twist_angle(rotation, axis);
    angvel - axis * (angle * params.correction_factor)
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_twist_angle_of_pure_yaw() {
        for angle in [-2.5_f32, -0.3, 0.0, 0.7, 3.0] {
            let q = Quat::from_rotation_y(angle);
            assert_relative_eq!(twist_angle(q, Vec3::Y), angle, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_twist_ignores_swing() {
        let q = Quat::from_rotation_y(0.4) * Quat::from_rotation_x(0.6);
        assert_relative_eq!(twist_angle(Quat::from_rotation_x(0.6), Vec3::Y), 0.0);
        // Schwingen um X verfälscht den Twist nur leicht, das Vorzeichen bleibt
        assert!(twist_angle(q, Vec3::Y) > 0.0);
    }

    #[test]
    fn test_twist_range_is_half_open() {
        let q = Quat::from_rotation_y(PI);
        let angle = twist_angle(q, Vec3::Y);
        assert!(angle > -PI && angle <= PI);
        assert_relative_eq!(angle.abs(), PI, epsilon = 1e-5);
    }

    #[test]
    fn test_correction_only_touches_axis() {
        let params = StabilizerParams::default();
        let angvel = Vec3::new(0.3, 1.0, -0.2);
        let rotation = Quat::from_rotation_y(0.5);
        let corrected = stabilize(angvel, rotation, &params);
        assert_relative_eq!(corrected.x, 0.3);
        assert_relative_eq!(corrected.z, -0.2);
        assert_relative_eq!(corrected.y, 1.0 - 0.5 * 0.20, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_rotation_is_fixed_point() {
        let angvel = Vec3::new(0.1, 0.0, 0.2);
        let corrected = stabilize(angvel, Quat::IDENTITY, &StabilizerParams::default());
        assert_eq!(corrected, angvel);
    }

    #[test]
    fn test_repeated_correction_decays_towards_rest() {
        // Einfache Rotations-Simulation um Y mit Winkeldämpfung wie an der Karte
        let params = StabilizerParams::default();
        let dt = 1.0 / 60.0;
        let damping = 4.0;
        let mut angle = 1.2_f32;
        let mut omega = 0.0_f32;
        // Maximum von |Winkel| je 2.5s-Fenster (enthält mindestens ein Extremum)
        let mut envelope = vec![0.0_f32; 4];
        for frame in 0..600 {
            let corrected = stabilize(
                Vec3::new(0.0, omega, 0.0),
                Quat::from_rotation_y(angle),
                &params,
            );
            omega = corrected.y / (1.0 + dt * damping);
            angle += omega * dt;
            let window = frame / 150;
            envelope[window] = envelope[window].max(angle.abs());
        }
        for pair in envelope.windows(2) {
            assert!(pair[1] < pair[0], "Winkel wächst: {envelope:?}");
        }
        assert!(angle.abs() < 0.1, "nicht abgeklungen: {angle}");
    }

    #[test]
    fn test_degenerate_axis_is_passthrough() {
        let params = StabilizerParams {
            axis: Vec3::ZERO,
            ..Default::default()
        };
        let angvel = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(stabilize(angvel, Quat::from_rotation_y(1.0), &params), angvel);
    }
}
