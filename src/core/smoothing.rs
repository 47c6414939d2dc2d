//! Glättungsfilter für Joint-Positionen (distanzabhängiges Lerp).
//!
//! Kleine Abweichungen werden langsam nachgezogen, große schnell. Damit sind
//! sowohl der Nachlauf als auch das Überschwingen nach oben begrenzt.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Untere Klemmgrenze für den Abstand geglättet → roh.
pub const SMOOTHING_MIN_DISTANCE: f32 = 0.1;
/// Obere Klemmgrenze für den Abstand geglättet → roh.
pub const SMOOTHING_MAX_DISTANCE: f32 = 1.0;

/// Geschwindigkeitsgrenzen des Filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Nachzieh-Rate bei kleiner Abweichung
    pub min_speed: f32,
    /// Nachzieh-Rate bei großer Abweichung
    pub max_speed: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            min_speed: 5.0,
            max_speed: 30.0,
        }
    }
}

/// Interpolationsfaktor für einen bereits geklemmten Abstand.
///
/// Monoton nicht fallend in `clamped_distance`, solange `max_speed >= min_speed`.
pub fn smoothing_factor(dt: f32, clamped_distance: f32, params: &SmoothingParams) -> f32 {
    dt * (params.min_speed + clamped_distance * (params.max_speed - params.min_speed))
}

/// Zieht `smoothed` in Richtung `raw` nach und gibt die neue Position zurück.
///
/// Beim ersten Aufruf (`None`) wird ohne Verzögerung auf `raw` gesetzt.
/// Der Faktor wird auf [0, 1] begrenzt, das Ergebnis liegt also immer
/// auf der Strecke zwischen alter Position und `raw`.
pub fn smooth_towards(
    smoothed: &mut Option<Vec3>,
    raw: Vec3,
    dt: f32,
    params: &SmoothingParams,
) -> Vec3 {
    let next = match *smoothed {
        None => raw,
        Some(previous) => {
            let clamped = previous
                .distance(raw)
                .clamp(SMOOTHING_MIN_DISTANCE, SMOOTHING_MAX_DISTANCE);
            let t = smoothing_factor(dt, clamped, params);
            if t.is_finite() {
                previous.lerp(raw, t.clamp(0.0, 1.0))
            } else {
                previous
            }
        }
    };
    *smoothed = Some(next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_non_finite_dt_keeps_previous_position() {
        let previous = Vec3::new(0.0, 1.0, 0.0);
        let mut smoothed = Some(previous);

        let out = smooth_towards(
            &mut smoothed,
            Vec3::new(2.0, 1.0, 0.0),
            f32::NAN,
            &SmoothingParams::default(),
        );

        assert_eq!(out, previous);
        assert_eq!(smoothed, Some(previous));
    }

    #[test]
    fn test_first_update_seeds_without_lag() {
        let mut smoothed = None;
        let raw = Vec3::new(1.0, 2.0, 3.0);
        let out = smooth_towards(&mut smoothed, raw, DT, &SmoothingParams::default());
        assert_eq!(out, raw);
        assert_eq!(smoothed, Some(raw));
    }

    #[test]
    fn test_factor_monotonic_in_distance() {
        let params = SmoothingParams::default();
        let mut last = f32::MIN;
        for i in 0..=90 {
            let d = SMOOTHING_MIN_DISTANCE + i as f32 * 0.01;
            let f = smoothing_factor(DT, d, &params);
            assert!(f >= last, "Faktor fällt bei d={d}: {f} < {last}");
            last = f;
        }
        // Grenzwerte: 5/60 bei 0.1 → 7.5/60, 30/60 bei 1.0
        assert_relative_eq!(smoothing_factor(DT, 1.0, &params), 0.5, epsilon = 1e-6);
        assert_relative_eq!(smoothing_factor(DT, 0.1, &params), 7.5 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_output_stays_on_segment() {
        let params = SmoothingParams::default();
        let start = Vec3::new(0.0, 0.0, 0.0);
        let raw = Vec3::new(4.0, -2.0, 1.0);
        for dt in [0.001, DT, 0.05, 0.5, 2.0] {
            let mut smoothed = Some(start);
            let out = smooth_towards(&mut smoothed, raw, dt, &params);
            let along = (out - start).dot(raw - start) / (raw - start).length_squared();
            assert!((0.0..=1.0).contains(&along), "überschwingt bei dt={dt}: {along}");
            let off_line = (out - start).cross(raw - start).length();
            assert_relative_eq!(off_line, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_large_displacement_catches_up_faster() {
        let params = SmoothingParams::default();
        let mut near = Some(Vec3::ZERO);
        let mut far = Some(Vec3::ZERO);
        let near_out = smooth_towards(&mut near, Vec3::new(0.2, 0.0, 0.0), DT, &params);
        let far_out = smooth_towards(&mut far, Vec3::new(2.0, 0.0, 0.0), DT, &params);
        // Relativer Fortschritt: weit entfernte Ziele werden anteilig schneller erreicht
        assert!(far_out.x / 2.0 > near_out.x / 0.2);
    }

    #[test]
    fn test_converges_to_stationary_target() {
        let params = SmoothingParams::default();
        let raw = Vec3::new(1.0, 1.0, 0.0);
        let mut smoothed = Some(Vec3::ZERO);
        for _ in 0..300 {
            smooth_towards(&mut smoothed, raw, DT, &params);
        }
        let out = smoothed.expect("Seed erwartet");
        assert_relative_eq!(out.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(out.y, 1.0, epsilon = 1e-4);
    }
}
