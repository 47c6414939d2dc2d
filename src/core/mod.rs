//! Core-Domänentypen: Physik-Vertrag, Seilkette, Glättung, Drag, Kamera.

pub mod camera;
pub mod drag;
pub mod physics;
pub mod release;
/// Seilkette aus Anker, drei Zwischengliedern und Karte
///
/// - `RopeChain`: besitzt die Body-Handles und den End-Effektor-Modus
/// - `ChainJoint`: Rohposition nach dem Schritt plus geglättete Position
/// - `EndEffectorMode`: Parked / Dynamic / Dragging
pub mod rope_chain;
pub mod smoothing;
pub mod solver;
pub mod stabilizer;

pub use camera::Camera3D;
pub use drag::{CursorStyle, DragController, DragState};
pub use physics::{BodyDesc, BodyHandle, BodyKind, JointHandle, PhysicsWorld};
pub use release::{CancelToken, PendingRelease, ReleaseCallback, ReleaseState};
pub use rope_chain::{ChainConfig, ChainJoint, EndEffectorMode, JointRole, RopeChain};
pub use smoothing::{smooth_towards, SmoothingParams};
pub use solver::{RopeWorld, SolverConfig};
pub use stabilizer::{stabilize, StabilizerParams};
