//! Reine Geometrie-Funktionen für Catmull-Rom-Splines im Raum.
//!
//! Layer-neutral: wird von `core` (Kette) und `app` (Render-Szene) genutzt,
//! ohne Zirkel-Abhängigkeiten zu erzeugen.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Anzahl der Band-Stützpunkte pro Frame.
pub const CURVE_SAMPLES: usize = 32;

/// Unterhalb dieser Sehnenlänge gilt ein Segment als entartet.
const CHORD_EPSILON: f32 = 1e-4;

/// Knoten-Parametrisierung der Spline (Exponent auf die Sehnenlänge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineParameterization {
    /// α = 0
    Uniform,
    /// α = 0.5
    Centripetal,
    /// α = 1
    #[default]
    Chordal,
}

impl SplineParameterization {
    /// Exponent α für den Knotenabstand `|p_i+1 - p_i|^α`.
    pub fn alpha(self) -> f32 {
        match self {
            Self::Uniform => 0.0,
            Self::Centripetal => 0.5,
            Self::Chordal => 1.0,
        }
    }
}

/// Berechnet einen Punkt auf einem nicht-uniformen Catmull-Rom-Segment (t ∈ [0, 1]).
///
/// p0, p1, p2, p3: vier aufeinanderfolgende Kontrollpunkte.
/// Die Kurve verläuft von p1 nach p2. Ist eine der drei Sehnen entartet,
/// wird linear zwischen p1 und p2 interpoliert.
pub fn catmull_rom_point(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    t: f32,
    parameterization: SplineParameterization,
) -> Vec3 {
    let d0 = p0.distance(p1);
    let d1 = p1.distance(p2);
    let d2 = p2.distance(p3);
    if d0 < CHORD_EPSILON || d1 < CHORD_EPSILON || d2 < CHORD_EPSILON {
        return p1.lerp(p2, t);
    }

    let alpha = parameterization.alpha();
    let dt0 = d0.powf(alpha);
    let dt1 = d1.powf(alpha);
    let dt2 = d2.powf(alpha);

    // Tangenten nach Barry-Goldman, auf das Intervall [0, 1] skaliert
    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    let t2 = t * t;
    let t3 = t2 * t;
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2;
    let c3 = 2.0 * p1 - 2.0 * p2 + m1 + m2;
    p1 + m1 * t + c2 * t2 + c3 * t3
}

/// Wertet eine offene Catmull-Rom-Spline durch `points` am globalen Parameter `u` ∈ [0, 1] aus.
///
/// Für Rand-Segmente werden Phantom-Punkte gespiegelt, damit die Kurve
/// natürlich durch den ersten und letzten Punkt läuft.
pub fn catmull_rom_at(points: &[Vec3], u: f32, parameterization: SplineParameterization) -> Vec3 {
    match points.len() {
        0 => return Vec3::ZERO,
        1 => return points[0],
        _ => {}
    }
    let n = points.len();
    let scaled = (n - 1) as f32 * u.clamp(0.0, 1.0);
    let mut seg = scaled.floor() as usize;
    let mut local = scaled - seg as f32;
    if seg >= n - 1 {
        seg = n - 2;
        local = 1.0;
    }

    let p1 = points[seg];
    let p2 = points[seg + 1];
    // Phantom-Punkte an den Rändern
    let p0 = if seg > 0 {
        points[seg - 1]
    } else {
        2.0 * points[0] - points[1]
    };
    let p3 = if seg + 2 < n {
        points[seg + 2]
    } else {
        2.0 * points[n - 1] - points[n - 2]
    };

    catmull_rom_point(p0, p1, p2, p3, local, parameterization)
}

/// Baut das Band aus den vier Kontrollpunkten: genau `samples` Punkte von Start bis Ende.
///
/// Wird jeden Frame frisch allokiert, da sich die Kontrollpunkte ständig bewegen.
pub fn catmull_rom_curve(
    control_points: &[Vec3; 4],
    samples: usize,
    parameterization: SplineParameterization,
) -> Vec<Vec3> {
    if samples == 0 {
        return Vec::new();
    }
    if samples == 1 {
        return vec![control_points[0]];
    }
    let last = (samples - 1) as f32;
    (0..samples)
        .map(|i| catmull_rom_at(control_points, i as f32 / last, parameterization))
        .collect()
}

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
