//! Game application module
//!
//! Handles windowing, rendering, and user input. The battle itself lives in
//! [`crate::sim`]; this module only turns it into pixels and feeds it keys.

pub mod config;
mod debug_ui;
pub mod geometry;
pub mod hud;
pub mod input;
pub mod renderer;
mod runner;
pub mod shader_system;
pub mod shape_renderer;
mod window;

pub use config::{AppConfig, LevelConfig, WindowConfig};
pub use runner::App;
pub use window::window_attributes_from_config;
