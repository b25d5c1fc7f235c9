//! Debug UI state and rendering

use std::time::Instant;

use sysinfo::System;

use super::input::{InputContext, ViewportId};
use crate::sim::World;

/// Renderer figures shown in the debug window
#[derive(Debug, Clone, Default)]
pub struct RendererDebugInfo {
    pub adapter: String,
    pub backend: String,
    pub board_texture: (u32, u32),
    pub commands: usize,
    pub batches: usize,
}

/// Host facts gathered once per session
#[derive(Debug, Clone)]
struct SystemSummary {
    os: String,
    kernel: String,
    physical_cores: usize,
    logical_cores: usize,
    total_memory_gb: f64,
}

impl SystemSummary {
    fn gather() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let os_name = System::name().unwrap_or_else(|| "Unknown".to_string());
        let os_version = System::os_version().unwrap_or_else(|| "Unknown".to_string());
        Self {
            os: format!("{} {}", os_name, os_version),
            kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
            physical_cores: System::physical_core_count().unwrap_or(0),
            logical_cores: sys.cpus().len(),
            total_memory_gb: sys.total_memory() as f64 / 1_073_741_824.0,
        }
    }
}

/// Debug UI state for toggling different panels
#[derive(Debug, Clone)]
pub struct DebugUIState {
    pub show_window: bool,
    pub show_fps: bool,
    pub show_world_state: bool,
    pub show_battle_state: bool,
    pub show_debug_info: bool,
    pub show_input_info: bool,
    pub show_system_info: bool,
    frame_times: Vec<f32>,
    last_frame_time: Instant,
    system: Option<SystemSummary>,
}

impl Default for DebugUIState {
    fn default() -> Self {
        Self {
            show_window: cfg!(debug_assertions),
            show_fps: true,
            show_world_state: true,
            show_battle_state: true,
            show_debug_info: true,
            show_input_info: false,
            show_system_info: false,
            frame_times: Vec::with_capacity(100),
            last_frame_time: Instant::now(),
            system: None,
        }
    }
}

impl DebugUIState {
    /// Toggles the debug window visibility (debug builds only)
    #[cfg(debug_assertions)]
    pub fn toggle_window(&mut self) {
        self.show_window = !self.show_window;
    }

    /// Updates frame timing information
    pub fn update_frame_time(&mut self) {
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.remove(0);
        }
    }

    /// Gets the current FPS
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg_frame_time: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    /// Last frame time in milliseconds
    pub fn last_frame_ms(&self) -> f32 {
        self.frame_times.last().map_or(0.0, |t| t * 1000.0)
    }

    /// Renders the debug UI
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        world: &World,
        surface_config: &wgpu::SurfaceConfiguration,
        renderer: &RendererDebugInfo,
        input: &InputContext,
        last_click: Option<&str>,
    ) {
        // Only show debug window if enabled
        if !self.show_window {
            return;
        }

        // Update frame timing
        self.update_frame_time();

        // Single debug window with toggleable sections
        egui::Window::new("Debug Info")
            .default_pos([10.0, 40.0])
            .default_width(300.0)
            .resizable(true)
            .scroll([false, true])
            .show(ctx, |ui| {
                ui.heading("Categories");
                ui.separator();

                // Toggle checkboxes
                ui.checkbox(&mut self.show_fps, "FPS");
                ui.checkbox(&mut self.show_world_state, "World State");
                ui.checkbox(&mut self.show_battle_state, "Battle State");
                ui.checkbox(&mut self.show_debug_info, "Renderer Info");
                ui.checkbox(&mut self.show_input_info, "Input Routing");
                ui.checkbox(&mut self.show_system_info, "System Info");

                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        // FPS Section
                        if self.show_fps {
                            ui.heading("FPS");
                            ui.label(format!("FPS: {:.1}", self.fps()));
                            ui.label(format!("Frame time: {:.2}ms", self.last_frame_ms()));
                            ui.separator();
                        }

                        // World State Section
                        if self.show_world_state {
                            ui.heading("World State");
                            ui.label(format!("Simulation time: {:.2}s", world.sim_time()));
                            ui.label(format!("Tick count: {}", world.tick_count()));
                            ui.label(format!("Time scale: {:.2}x", world.time_scale()));
                            ui.label(format!("Paused: {}", world.is_paused()));
                            ui.separator();
                        }

                        if self.show_battle_state {
                            ui.heading("Battle State");
                            match world.tactics() {
                                Some(tactics) => {
                                    let settings = tactics.current_settings();
                                    let cursor = tactics.cursor().position();
                                    ui.label(format!("Mode: {:?}", tactics.ui_mode()));
                                    ui.label(format!("Phase: {:?}", tactics.phase()));
                                    ui.label(format!("Turn: {}", tactics.turn()));
                                    ui.label(format!("Arena revision: {}", tactics.level_revision()));
                                    ui.label(format!(
                                        "Arena: {}x{} @ {} px, hazard {:.2}",
                                        settings.width(),
                                        settings.height(),
                                        settings.tile_size(),
                                        settings.hazard_density()
                                    ));
                                    ui.label(format!(
                                        "Seed: {}{}",
                                        settings.seed(),
                                        if settings.lock_seed() { " (locked)" } else { "" }
                                    ));
                                    ui.label(format!("Cursor: ({}, {})", cursor.col, cursor.row));
                                    if let Some(unit) = tactics.selected_unit() {
                                        ui.label(format!("Selected: {}", unit.display_name()));
                                    }
                                }
                                None => {
                                    ui.label("No tactics simulation registered");
                                }
                            }
                            ui.separator();
                        }

                        // Renderer Info Section
                        if self.show_debug_info {
                            ui.heading("Renderer Info");
                            ui.label(format!("Adapter: {}", renderer.adapter));
                            ui.label(format!("Backend: {}", renderer.backend));
                            ui.label(format!(
                                "Surface: {}x{}",
                                surface_config.width, surface_config.height
                            ));
                            ui.label(format!("Format: {:?}", surface_config.format));
                            ui.label(format!(
                                "Board texture: {}x{}",
                                renderer.board_texture.0, renderer.board_texture.1
                            ));
                            ui.label(format!(
                                "Commands: {} ({} batches)",
                                renderer.commands, renderer.batches
                            ));
                            ui.separator();
                        }

                        if self.show_input_info {
                            ui.heading("Input Routing");
                            for (name, priority) in input.debug_handlers() {
                                ui.label(format!("Handler {} (priority {})", name, priority));
                            }
                            if let Some(rect) = input.viewport_rect(ViewportId(0)) {
                                ui.label(format!(
                                    "Board viewport: {:.0},{:.0} {:.0}x{:.0}",
                                    rect.x, rect.y, rect.width, rect.height
                                ));
                            }
                            if let Some(pos) = input.state().mouse.screen_pos {
                                ui.label(format!("Mouse: ({:.1}, {:.1})", pos[0], pos[1]));
                            }
                            ui.label(format!("Last click: {}", last_click.unwrap_or("none")));
                            for event in input.debug_last_events() {
                                ui.monospace(event);
                            }
                            ui.separator();
                        }

                        // System Info Section
                        if self.show_system_info {
                            ui.heading("System Info");
                            let system = self.system.get_or_insert_with(SystemSummary::gather);
                            ui.label(format!("OS: {}", system.os));
                            ui.label(format!("Kernel: {}", system.kernel));
                            ui.label(format!("Physical cores: {}", system.physical_cores));
                            ui.label(format!("Logical cores: {}", system.logical_cores));
                            ui.label(format!("Memory: {:.1} GB", system.total_memory_gb));
                            ui.separator();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_frame_times() {
        let mut state = DebugUIState::default();
        assert_eq!(state.fps(), 0.0);
        assert_eq!(state.last_frame_ms(), 0.0);

        state.frame_times = vec![0.02, 0.02];
        assert!((state.fps() - 50.0).abs() < 1e-3);
        assert!((state.last_frame_ms() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_frame_history_is_bounded() {
        let mut state = DebugUIState::default();
        for _ in 0..150 {
            state.update_frame_time();
        }
        assert_eq!(state.frame_times.len(), 100);
    }
}
