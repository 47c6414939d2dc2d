//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Typen, die zwischen `core`, `app` und dem Host-Renderer geteilt werden,
//! um direkte Abhängigkeiten zu vermeiden.

pub mod options;
mod render_scene;
pub mod spline_geometry;

pub use options::{LanyardOptions, OptionsError};
pub use render_scene::{BandVertex, RenderScene};
pub use spline_geometry::{SplineParameterization, CURVE_SAMPLES};
