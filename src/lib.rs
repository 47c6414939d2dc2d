//! Portfolio Lanyard Library.
//! Physik-Animation einer Ausweiskarte am Seil, als Library exportiert für Tests und Host-Renderer.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{AppCommand, AppController, AppIntent, AppState, ViewState};
pub use core::{
    Camera3D, ChainConfig, CursorStyle, DragController, EndEffectorMode, JointRole, RopeChain,
    RopeWorld, SmoothingParams, StabilizerParams,
};
pub use shared::{BandVertex, LanyardOptions, OptionsError, RenderScene, SplineParameterization};
