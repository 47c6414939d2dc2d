//! Zentrale Konfiguration der Lanyard-Szene.
//!
//! `LanyardOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::{Camera3D, ChainConfig, SmoothingParams, SolverConfig, StabilizerParams};
use crate::shared::spline_geometry::{SplineParameterization, CURVE_SAMPLES};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ── Physik ──────────────────────────────────────────────────────────

/// Gravitation (nur Y-Komponente).
pub const GRAVITY_Y: f32 = -40.0;
/// Fester Simulationsschritt in Sekunden.
pub const PHYSICS_TIMESTEP: f32 = 1.0 / 60.0;
/// Constraint-Iterationen pro Schritt.
pub const SOLVER_ITERATIONS: u32 = 20;
/// Maximale Teilschritte pro Frame.
pub const MAX_SUBSTEPS: u32 = 4;

// ── Glättung ────────────────────────────────────────────────────────

/// Nachzieh-Rate bei kleiner Abweichung.
pub const SMOOTHING_MIN_SPEED: f32 = 5.0;
/// Nachzieh-Rate bei großer Abweichung.
pub const SMOOTHING_MAX_SPEED: f32 = 30.0;

// ── Drag ────────────────────────────────────────────────────────────

/// Anteil des Vorframe-Ziels beim Ziehen.
pub const DRAG_RETAIN: f32 = crate::core::drag::DRAG_FILTER_RETAIN;

// ── Stabilisierung ──────────────────────────────────────────────────

/// Rückdreh-Faktor um die Hochachse.
pub const STABILIZER_FACTOR: f32 = crate::core::stabilizer::DEFAULT_CORRECTION_FACTOR;

// ── Host-Szene ──────────────────────────────────────────────────────

/// Ab dieser Kartenhöhe gilt die Karte als "hochgezogen".
pub const PULL_THRESHOLD: f32 = 5.0;
/// Versatz der Ersatz-Kette nach dem Hochziehen.
pub const BLOCKED_DISPLACEMENT_X: f32 = 2.0;
/// Verzögerung der Ersatz-Kette in Millisekunden.
pub const BLOCKED_DELAY_MS: u64 = 2000;

/// Ungültige Optionen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("Zeitschritt muss positiv sein, ist {0}")]
    NonPositiveTimestep(f32),
    #[error("mindestens eine Löser-Iteration erforderlich")]
    NoSolverIterations,
    #[error("Glättung: max_speed ({max}) kleiner als min_speed ({min})")]
    InvertedSmoothingSpeeds { min: f32, max: f32 },
    #[error("Drag-Filter-Anteil außerhalb von [0, 1]: {0}")]
    DragRetainOutOfRange(f32),
    #[error("Band braucht mindestens 2 Stützpunkte, nicht {0}")]
    TooFewCurveSamples(usize),
    #[error("Sichtfeld außerhalb von (0, 180): {0}")]
    InvalidFieldOfView(f32),
    #[error("Seillänge muss positiv sein, ist {0}")]
    NonPositiveRopeLength(f32),
}

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `portfolio_lanyard.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanyardOptions {
    // ── Physik ──────────────────────────────────────────────────
    /// Gravitation entlang Y
    pub gravity_y: f32,
    /// Fester Simulationsschritt
    pub timestep: f32,
    pub solver_iterations: u32,
    pub max_substeps: u32,

    // ── Glättung / Band ─────────────────────────────────────────
    pub smoothing_min_speed: f32,
    pub smoothing_max_speed: f32,
    /// Anzahl der Band-Stützpunkte
    pub curve_samples: usize,
    pub curve_parameterization: SplineParameterization,

    // ── Interaktion ─────────────────────────────────────────────
    /// Anteil des Vorframe-Ziels beim Ziehen (0 = ungefiltert)
    pub drag_retain: f32,
    /// Rückdreh-Faktor der Karte
    pub stabilizer_factor: f32,

    // ── Host-Szene ──────────────────────────────────────────────
    /// Kartenhöhe, ab der die Ersatz-Kette eingesetzt wird
    pub pull_threshold: f32,
    pub blocked_displacement_x: f32,
    pub blocked_delay_ms: u64,

    // ── Kamera ──────────────────────────────────────────────────
    pub camera_position: Vec3,
    pub camera_fov_y: f32,

    // ── Kette ───────────────────────────────────────────────────
    /// Geometrie, Massen und Dämpfungen der Kette (TOML-Tabelle, daher zuletzt)
    pub chain: ChainConfig,
}

impl Default for LanyardOptions {
    fn default() -> Self {
        Self {
            gravity_y: GRAVITY_Y,
            timestep: PHYSICS_TIMESTEP,
            solver_iterations: SOLVER_ITERATIONS,
            max_substeps: MAX_SUBSTEPS,

            smoothing_min_speed: SMOOTHING_MIN_SPEED,
            smoothing_max_speed: SMOOTHING_MAX_SPEED,
            curve_samples: CURVE_SAMPLES,
            curve_parameterization: SplineParameterization::Chordal,

            drag_retain: DRAG_RETAIN,
            stabilizer_factor: STABILIZER_FACTOR,

            pull_threshold: PULL_THRESHOLD,
            blocked_displacement_x: BLOCKED_DISPLACEMENT_X,
            blocked_delay_ms: BLOCKED_DELAY_MS,

            camera_position: Camera3D::DEFAULT_POSITION,
            camera_fov_y: Camera3D::DEFAULT_FOV_Y,

            chain: ChainConfig::default(),
        }
    }
}

impl LanyardOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(opts) => match opts.validate() {
                    Ok(()) => {
                        log::info!("Optionen geladen aus: {}", path.display());
                        opts
                    }
                    Err(e) => {
                        log::warn!("Optionen ungültig, verwende Standardwerte: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("portfolio-lanyard"))
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("portfolio_lanyard.toml")
    }

    /// Prüft die Werte auf Konsistenz.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.timestep <= 0.0 || !self.timestep.is_finite() {
            return Err(OptionsError::NonPositiveTimestep(self.timestep));
        }
        if self.solver_iterations == 0 {
            return Err(OptionsError::NoSolverIterations);
        }
        if self.smoothing_max_speed < self.smoothing_min_speed {
            return Err(OptionsError::InvertedSmoothingSpeeds {
                min: self.smoothing_min_speed,
                max: self.smoothing_max_speed,
            });
        }
        if !(0.0..=1.0).contains(&self.drag_retain) {
            return Err(OptionsError::DragRetainOutOfRange(self.drag_retain));
        }
        if self.curve_samples < 2 {
            return Err(OptionsError::TooFewCurveSamples(self.curve_samples));
        }
        if !(self.camera_fov_y > 0.0 && self.camera_fov_y < 180.0) {
            return Err(OptionsError::InvalidFieldOfView(self.camera_fov_y));
        }
        if self.chain.rope_length <= 0.0 {
            return Err(OptionsError::NonPositiveRopeLength(self.chain.rope_length));
        }
        Ok(())
    }

    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            gravity: Vec3::new(0.0, self.gravity_y, 0.0),
            timestep: self.timestep,
            iterations: self.solver_iterations,
            max_substeps: self.max_substeps.max(1),
            ..SolverConfig::default()
        }
    }

    pub fn smoothing_params(&self) -> SmoothingParams {
        SmoothingParams {
            min_speed: self.smoothing_min_speed,
            max_speed: self.smoothing_max_speed,
        }
    }

    pub fn stabilizer_params(&self) -> StabilizerParams {
        StabilizerParams {
            correction_factor: self.stabilizer_factor,
            ..StabilizerParams::default()
        }
    }

    /// Kamera mit den konfigurierten Startwerten.
    pub fn camera(&self) -> Camera3D {
        Camera3D {
            position: self.camera_position,
            fov_y_degrees: self.camera_fov_y,
            ..Camera3D::new()
        }
    }

    /// Verzögerung der Ersatz-Kette.
    pub fn blocked_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.blocked_delay_ms)
    }
}
