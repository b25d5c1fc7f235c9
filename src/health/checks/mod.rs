//! Built-in health checks for core systems

pub mod build_info;
pub mod config;
pub mod level_generation;
pub mod system_info;
pub mod world;

pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use level_generation::LevelGenerationCheck;
pub use system_info::SystemInfoCheck;
pub use world::WorldCheck;
