use super::context::{Bounds, Rect, RenderContext, ViewportConfig, ViewportScope};
use super::viewport::Viewport;
use crate::app::geometry::{Highlight, IsoLayout};
use crate::app::shader_system::ShaderRegistry;
use crate::app::shape_renderer::ShapeRenderer;
use crate::sim::{BattlePhase, GridPosition, TacticsSimulation, UiMode, UnitFaction, World};
use tracing::debug;

/// Depth layers, drawn back to front
const DEPTH_BOARD: f32 = 0.0;
const DEPTH_ZONES: f32 = 1.0;
const DEPTH_PREVIEW: f32 = 2.0;
const DEPTH_UNITS: f32 = 3.0;
const DEPTH_CURSOR: f32 = 4.0;

/// Board dimming while a menu covers it
const MENU_TINT: [f32; 4] = [0.55, 0.55, 0.6, 1.0];

/// Renderer for the simulation view
pub struct SimRenderer {
    viewport: Viewport,
    shader_registry: ShaderRegistry,
    render_context: RenderContext,
    layout: Option<IsoLayout>,
    width: u32,
    height: u32,
}

impl SimRenderer {
    /// Creates a new simulation renderer
    pub fn new(
        device: &wgpu::Device,
        egui_renderer: &mut egui_wgpu::Renderer,
        width: u32,
        height: u32,
    ) -> Self {
        let viewport = Viewport::new(device, egui_renderer, width, height, "Sim Texture");

        let mut shader_registry = ShaderRegistry::new();
        shader_registry.register(Box::new(ShapeRenderer::new()));
        shader_registry.init_all(device, &Self::surface_config(&viewport, width, height));

        Self {
            viewport,
            shader_registry,
            render_context: RenderContext::new(width, height),
            layout: None,
            width,
            height,
        }
    }

    fn surface_config(viewport: &Viewport, width: u32, height: u32) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: viewport.texture.format(),
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    /// Returns the texture ID for egui
    pub fn texture_id(&self) -> egui::TextureId {
        self.viewport.texture_id
    }

    /// Size of the board texture in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Layout used for the last drawn frame
    pub fn layout(&self) -> Option<&IsoLayout> {
        self.layout.as_ref()
    }

    /// Commands recorded for the last frame
    pub fn command_count(&self) -> usize {
        self.render_context.commands().len()
    }

    pub fn batch_count(&self) -> usize {
        self.render_context.batch_count()
    }

    /// Resizes the render texture
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        egui_renderer: &mut egui_wgpu::Renderer,
        width: u32,
        height: u32,
    ) {
        if self.width == width && self.height == height {
            return;
        }
        self.viewport.resize(device, egui_renderer, width, height);
        self.width = self.viewport.width;
        self.height = self.viewport.height;
        self.render_context.resize(self.width, self.height);

        let config = Self::surface_config(&self.viewport, self.width, self.height);
        self.shader_registry.init_all(device, &config);
        debug!(width = self.width, height = self.height, "Board texture resized");
    }

    /// Draws the simulation to the texture
    ///
    /// The texture follows the arena's canvas size, so a new arena resizes
    /// it before drawing.
    pub fn draw(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        egui_renderer: &mut egui_wgpu::Renderer,
        queue: &wgpu::Queue,
        world: &World,
    ) {
        let Some(tactics) = world.tactics() else {
            return;
        };

        let layout = IsoLayout::for_level(tactics.level());
        self.resize(
            device,
            egui_renderer,
            layout.pixel_width(),
            layout.pixel_height(),
        );
        self.layout = Some(layout);

        let viewport = board_viewport(&layout, self.width, self.height);

        self.render_context.clear();
        let dimmed = tactics.ui_mode() != UiMode::Playing;
        self.render_context.viewport(viewport, |scope| {
            if dimmed {
                scope.tinted(MENU_TINT, |inner| record_scene(inner, &layout, tactics));
            } else {
                record_scene(scope, &layout, tactics);
            }
        });
        self.render_context.submit(&mut self.shader_registry);

        self.shader_registry.begin_frame(device, queue);

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sim Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.viewport.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.0,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.shader_registry.render_all(&mut rpass);
        }

        self.shader_registry.end_frame();
    }
}

/// Maps the whole canvas of `layout` onto a `width` x `height` pixel region
fn board_viewport(layout: &IsoLayout, width: u32, height: u32) -> ViewportConfig {
    ViewportConfig::new(
        Rect {
            x: 0,
            y: 0,
            width,
            height,
        },
        Bounds {
            min: [0.0, 0.0],
            max: [layout.pixel_width() as f32, layout.pixel_height() as f32],
        },
    )
}

/// Cell under a point of the displayed board image
///
/// `display_size` is the size the board texture is shown at and
/// `local_pos` is relative to its top-left corner.
pub fn pick_cell(
    layout: &IsoLayout,
    display_size: [f32; 2],
    local_pos: [f32; 2],
) -> Option<GridPosition> {
    let width = display_size[0].round() as u32;
    let height = display_size[1].round() as u32;
    if width == 0 || height == 0 {
        return None;
    }
    let viewport = board_viewport(layout, width, height);
    if !viewport.contains_screen(local_pos) {
        return None;
    }
    let [x, y] = viewport.screen_to_world(local_pos);
    layout.screen_to_cell(x, y)
}

/// Records the board, overlays and units for one frame
fn record_scene(scope: &mut ViewportScope<'_>, layout: &IsoLayout, tactics: &TacticsSimulation) {
    let level = tactics.level();

    for (pos, tile) in level.cells() {
        scope.primitives(&layout.tile(pos, tile), DEPTH_BOARD);
    }

    for &spawn in level.player_spawn_tiles() {
        scope.primitives(&layout.highlight(spawn, Highlight::PLAYER_SPAWN), DEPTH_ZONES);
    }
    for &spawn in level.enemy_spawn_tiles() {
        scope.primitives(&layout.highlight(spawn, Highlight::ENEMY_SPAWN), DEPTH_ZONES);
    }

    if tactics.phase() == BattlePhase::Active
        && let Some(preview) = tactics.movement_preview()
    {
        for tile in preview.reachable_tiles() {
            let highlight = if tile == preview.origin() {
                Highlight::PREVIEW_ORIGIN
            } else {
                let distance = preview.distance_to(tile).unwrap_or(0);
                Highlight::preview_tile(distance, preview.max_distance())
            };
            scope.primitives(&layout.highlight(tile, highlight), DEPTH_PREVIEW);
        }
    }

    for faction in [UnitFaction::Enemy, UnitFaction::Player] {
        for unit in tactics.squad(faction).units() {
            if let Some(pos) = unit.position() {
                scope.primitives(&layout.unit_figure(pos, faction), DEPTH_UNITS);
            }
        }
    }
    if let Some(pos) = tactics.selected_unit().and_then(|u| u.position()) {
        scope.primitives(&layout.highlight(pos, Highlight::SELECTED_UNIT), DEPTH_UNITS);
    }

    scope.primitives(
        &layout.highlight(tactics.cursor().position(), Highlight::CURSOR),
        DEPTH_CURSOR,
    );
}
