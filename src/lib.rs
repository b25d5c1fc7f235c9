//! Hazard Run
//!
//! An isometric tactics game on procedurally generated hazard arenas, built
//! with winit, wgpu and egui.

/// Game application - windowing, rendering, and input handling
pub mod app;

/// Build-time information (git SHA, branch, timestamp, etc.)
pub mod build_info;

/// Startup diagnostics (`--check`)
pub mod health;

/// Game simulation - arenas, squads, deployment and turns
pub mod sim;
