//! Main application handler for the game

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

#[cfg(debug_assertions)]
use winit::keyboard::{KeyCode, PhysicalKey};

use super::config::AppConfig;
use super::debug_ui::{DebugUIState, RendererDebugInfo};
use super::geometry::IsoLayout;
use super::hud;
use super::input::{
    GameAction, GameInputHandler, InputCollector, InputContext, MouseButton as InputMouseButton,
    Rect, ViewportId,
};
use super::renderer::Renderer;
use super::renderer::sim::pick_cell;
use super::renderer::viewport::fit_size;
use super::window::{arena_inner_size, window_attributes_from_config};
use crate::sim::{TacticsSimulation, World};

/// Hit-test id of the board image
const BOARD_VIEWPORT: ViewportId = ViewportId(0);

/// Main game application
pub struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    world: World,
    debug_ui: DebugUIState,
    last_update: Option<Instant>,
    // Input system
    input_collector: InputCollector,
    input_context: InputContext,
    /// Arena revision the window was last sized for
    sized_for_revision: Option<u64>,
    // Debug info
    last_click_info: Option<String>,
}

impl App {
    /// Creates a new game application with the provided configuration
    ///
    /// The first arena is generated here from the `[level]` section.
    pub fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, "Starting game");
        info!(?config.window, ?config.level, "Configuration");

        let mut world = World::new();
        match TacticsSimulation::new(config.level.to_settings()) {
            Ok(tactics) => world.add_simulation(Box::new(tactics)),
            Err(e) => error!(error = %e, "Failed to create the tactics session"),
        }

        // Initialize input system
        let mut input_context = InputContext::new();
        input_context.register_handler(Box::new(GameInputHandler::new(BOARD_VIEWPORT)));

        Self {
            config,
            window: None,
            renderer: None,
            world,
            debug_ui: DebugUIState::default(),
            last_update: None,
            input_collector: InputCollector::new(),
            input_context,
            sized_for_revision: None,
            last_click_info: None,
        }
    }

    /// Toggles debug window (debug builds only)
    #[cfg(debug_assertions)]
    fn toggle_debug_window(&mut self) {
        self.debug_ui.toggle_window();
    }

    /// Drain game actions from the input handler and apply them to the battle
    fn process_game_actions(&mut self) {
        let viewport_rect = self.input_context.viewport_rect(BOARD_VIEWPORT);

        let actions = match self
            .input_context
            .get_handler_mut("game")
            .and_then(|h| h.as_any_mut().downcast_mut::<GameInputHandler>())
        {
            Some(game_handler) => {
                if let Some(rect) = viewport_rect {
                    game_handler.set_viewport_rect(rect);
                }
                game_handler.take_actions()
            }
            None => return,
        };

        for action in actions {
            match action {
                GameAction::Key(key) => {
                    if let Some(tactics) = self.world.tactics_mut() {
                        tactics.handle_key(key);
                    }
                }
                GameAction::ViewportClick {
                    local_pos,
                    button: InputMouseButton::Left,
                } => self.process_viewport_click(local_pos, viewport_rect),
                GameAction::ViewportClick { .. } => {}
            }
        }
    }

    /// Moves the cursor to the clicked board tile
    fn process_viewport_click(&mut self, local_pos: [f32; 2], viewport_rect: Option<Rect>) {
        let (Some(renderer), Some(rect)) = (&self.renderer, viewport_rect) else {
            return;
        };
        let Some(layout) = renderer.sim_renderer().layout().copied() else {
            return;
        };

        let Some(cell) = pick_cell(&layout, [rect.width, rect.height], local_pos) else {
            self.last_click_info = Some(format!(
                "Click outside board: viewport_pos=({:.1}, {:.1})",
                local_pos[0], local_pos[1]
            ));
            return;
        };

        let focused = self
            .world
            .tactics_mut()
            .is_some_and(|tactics| tactics.focus_tile(cell));
        self.last_click_info = Some(if focused {
            format!("Cursor moved to ({}, {})", cell.col, cell.row)
        } else {
            format!("Tile ({}, {}) ignored while a menu is open", cell.col, cell.row)
        });
        debug!(col = cell.col, row = cell.row, focused, "Board click");
    }

    /// Fits the window to a freshly generated arena
    fn sync_window_size(&mut self) {
        let (Some(window), Some(renderer)) = (&self.window, &self.renderer) else {
            return;
        };
        let Some(revision) = self.world.tactics().map(|t| t.level_revision()) else {
            return;
        };
        if self.sized_for_revision == Some(revision) || self.config.window.fullscreen {
            return;
        }
        // The board texture catches up with the arena on the next draw
        let Some(layout) = renderer.sim_renderer().layout() else {
            return;
        };
        let current = self
            .world
            .tactics()
            .map(|t| IsoLayout::for_level(t.level()));
        if current.as_ref() != Some(layout) {
            return;
        }

        let size = arena_inner_size(layout);
        info!(
            width = size.width,
            height = size.height,
            revision,
            "Resizing window to arena"
        );
        let _ = window.request_inner_size(size);
        self.sized_for_revision = Some(revision);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = window_attributes_from_config(&self.config.window);

            match event_loop.create_window(window_attributes) {
                Ok(window) => {
                    let size = window.inner_size();
                    info!(
                        window.width = size.width,
                        window.height = size.height,
                        "Window created successfully"
                    );

                    let window = Arc::new(window);

                    // Initialize renderer using tokio runtime
                    // We create a runtime here because winit's event loop is synchronous
                    let runtime = match tokio::runtime::Runtime::new() {
                        Ok(runtime) => runtime,
                        Err(e) => {
                            error!(error = %e, "Failed to create tokio runtime");
                            event_loop.exit();
                            return;
                        }
                    };
                    let renderer =
                        runtime.block_on(Renderer::new(window.clone(), self.config.window.vsync));

                    match renderer {
                        Ok(renderer) => {
                            info!("Renderer initialized successfully");
                            self.renderer = Some(renderer);
                            self.window = Some(window);
                            self.last_update = Some(Instant::now());
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to initialize renderer");
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to create window");
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Update simulation
        if let Some(last_update) = self.last_update {
            let now = Instant::now();
            let delta_time = (now - last_update).as_secs_f32();
            self.last_update = Some(now);

            // Process input BEFORE simulation update
            // Clone state BEFORE advancing so we can detect edge transitions (JustPressed)
            let input_state = self.input_collector.clone_state();
            self.input_context.update_state(input_state);
            self.input_context.process();

            // Advance frame AFTER processing to transition edges to steady states
            self.input_collector.advance_frame();

            // Apply game actions to simulations
            self.process_game_actions();

            if self.world.tactics().is_some_and(|t| t.quit_requested()) {
                info!("Quit requested, exiting");
                event_loop.exit();
                return;
            }

            // Update simulation
            self.world.tick(delta_time);
            self.sync_window_size();

            // Request redraw after simulation update
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Feed events to input collector FIRST (before egui)
        // This ensures we see all raw input
        self.input_collector.handle_window_event(&event);

        // Update scale factor if needed
        if let Some(window) = &self.window {
            let scale_factor = window.scale_factor() as f32;
            self.input_collector.set_scale_factor(scale_factor);
        }

        // Let egui handle the event for UI interactions
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            let _ = renderer.handle_event(window, &event);
        }

        // Handle debug hotkeys (debug builds only)
        #[cfg(debug_assertions)]
        if let WindowEvent::KeyboardInput { event, .. } = &event
            && event.state.is_pressed()
            && let PhysicalKey::Code(KeyCode::Backquote) = event.physical_key
        {
            self.toggle_debug_window();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    let debug_ui = &mut self.debug_ui;
                    let world = &self.world;
                    let config = renderer.config().clone();
                    let adapter = renderer.adapter_info().clone();
                    let input_context = &mut self.input_context;
                    let last_click_info = self.last_click_info.as_deref();

                    // Viewports are re-registered each frame (no need to clear)
                    // We need them to persist between frames for input processing

                    match renderer.draw(window, world, |ctx, board| {
                        egui::CentralPanel::default()
                            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
                            .show(ctx, |ui| {
                                let (width, height) = board.size();
                                let native = [width as f32, height as f32];
                                let available = ui.available_size();
                                let [w, h] = fit_size(native, [available.x, available.y]);

                                let (area, _) =
                                    ui.allocate_exact_size(available, egui::Sense::hover());
                                let rect = egui::Rect::from_center_size(
                                    area.center(),
                                    egui::vec2(w, h),
                                );
                                egui::Image::new(egui::load::SizedTexture::new(
                                    board.texture_id(),
                                    egui::vec2(w, h),
                                ))
                                .paint_at(ui, rect);

                                // Register viewport for input hit testing
                                input_context.register_viewport(
                                    BOARD_VIEWPORT,
                                    Rect::new(rect.left(), rect.top(), rect.width(), rect.height()),
                                    "board",
                                );

                                match world.tactics() {
                                    Some(tactics) => {
                                        let scale = if native[0] > 0.0 {
                                            rect.width() / native[0]
                                        } else {
                                            1.0
                                        };
                                        hud::show(ctx, rect, scale, tactics);
                                    }
                                    None => hud::show_unavailable(ctx, rect),
                                }
                            });

                        let renderer_info = RendererDebugInfo {
                            adapter: adapter.name.clone(),
                            backend: format!("{:?}", adapter.backend),
                            board_texture: board.size(),
                            commands: board.command_count(),
                            batches: board.batch_count(),
                        };
                        debug_ui.render(
                            ctx,
                            world,
                            &config,
                            &renderer_info,
                            input_context,
                            last_click_info,
                        );
                    }) {
                        Ok(_) => {
                            // Rendering successful
                        }
                        Err(wgpu::SurfaceError::Lost) => {
                            warn!("Surface lost, reconfiguring");
                            let size = window.inner_size();
                            renderer.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("Out of memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => {
                            error!(error = %e, "Render error");
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
