//! Use-Cases der Application-Layer-Orchestrierung.

pub mod frame;
pub mod options;
pub mod pointer;
pub mod scene;
pub mod viewport;
