//! Rendering context with viewport transforms and state management

use super::super::geometry::{Primitive, Rgba};
use super::super::shader_system::ShaderRegistry;
use super::super::shape_renderer::{SHAPE_SHADER_NAME, ShapeRenderer};
use super::command::{LineCommand, PolygonCommand, RenderCommand};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

// ============================================================================
// GEOMETRY TYPES
// ============================================================================

/// Rectangle in pixel coordinates
#[derive(Clone, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Coordinate bounds in logical space
#[derive(Clone, Debug)]
pub struct Bounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Bounds {
    /// Get the width of the bounds
    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    /// Get the height of the bounds
    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    /// Get the aspect ratio (width / height)
    pub fn aspect_ratio(&self) -> f32 {
        self.width() / self.height()
    }

    /// Get the center point
    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

// ============================================================================
// VIEWPORT CONFIGURATION
// ============================================================================

/// Viewport configuration
#[derive(Clone, Debug)]
pub struct ViewportConfig {
    /// Pixel region to render to
    pub pixel_rect: Rect,

    /// Logical coordinate bounds that map to this region
    pub coord_bounds: Bounds,

    /// Depth range (default: 0.0 to 1.0)
    pub depth_range: (f32, f32),
}

impl ViewportConfig {
    /// Create a viewport with default depth range
    pub fn new(pixel_rect: Rect, coord_bounds: Bounds) -> Self {
        Self {
            pixel_rect,
            coord_bounds,
            depth_range: (0.0, 1.0),
        }
    }

    /// Convert screen pixel coordinates to world coordinates
    /// Screen coordinates are in pixels relative to the top-left of the window
    pub fn screen_to_world(&self, screen_pos: [f32; 2]) -> [f32; 2] {
        // Normalize to 0-1 range within the pixel rect
        let norm_x = (screen_pos[0] - self.pixel_rect.x as f32) / self.pixel_rect.width as f32;
        let norm_y = (screen_pos[1] - self.pixel_rect.y as f32) / self.pixel_rect.height as f32;

        // Map to world bounds
        [
            self.coord_bounds.min[0] + norm_x * self.coord_bounds.width(),
            self.coord_bounds.min[1] + norm_y * self.coord_bounds.height(),
        ]
    }

    /// Convert world coordinates to screen pixel coordinates
    pub fn world_to_screen(&self, world_pos: [f32; 2]) -> [f32; 2] {
        // Normalize to 0-1 range within world bounds
        let norm_x = (world_pos[0] - self.coord_bounds.min[0]) / self.coord_bounds.width();
        let norm_y = (world_pos[1] - self.coord_bounds.min[1]) / self.coord_bounds.height();

        // Map to pixel rect
        [
            self.pixel_rect.x as f32 + norm_x * self.pixel_rect.width as f32,
            self.pixel_rect.y as f32 + norm_y * self.pixel_rect.height as f32,
        ]
    }

    /// Whether a screen position falls inside the pixel region
    pub fn contains_screen(&self, screen_pos: [f32; 2]) -> bool {
        let rect = &self.pixel_rect;
        screen_pos[0] >= rect.x as f32
            && screen_pos[1] >= rect.y as f32
            && screen_pos[0] < rect.x as f32 + rect.width as f32
            && screen_pos[1] < rect.y as f32 + rect.height as f32
    }

    /// Get the scale factor from pixels to world units
    /// This is useful for converting pixel measurements (like line thickness) to world units
    pub fn pixels_to_world_scale(&self) -> f32 {
        self.coord_bounds.width() / self.pixel_rect.width as f32
    }

    /// Get the scale factor from world units to pixels
    pub fn world_to_pixels_scale(&self) -> f32 {
        self.pixel_rect.width as f32 / self.coord_bounds.width()
    }
}

/// Viewport state
#[derive(Clone, Debug)]
pub struct ViewportState {
    pub pixel_rect: Rect,
    pub coord_bounds: Bounds,
    pub depth_range: (f32, f32),
}

impl From<ViewportConfig> for ViewportState {
    fn from(config: ViewportConfig) -> Self {
        Self {
            pixel_rect: config.pixel_rect,
            coord_bounds: config.coord_bounds,
            depth_range: config.depth_range,
        }
    }
}

// ============================================================================
// CONTEXT STATE
// ============================================================================

/// Complete rendering context state
#[derive(Clone, Debug)]
pub struct ContextState {
    pub viewport: ViewportState,
    pub color_tint: [f32; 4],
    pub alpha_multiplier: f32,
}

impl ContextState {
    /// Create default context state for full screen
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: ViewportState {
                pixel_rect: Rect {
                    x: 0,
                    y: 0,
                    width,
                    height,
                },
                coord_bounds: Bounds {
                    min: [0.0, 0.0],
                    max: [width as f32, height as f32],
                },
                depth_range: (0.0, 1.0),
            },
            color_tint: [1.0, 1.0, 1.0, 1.0],
            alpha_multiplier: 1.0,
        }
    }
}

impl ContextState {
    /// Applies the tint and alpha multiplier to a colour
    pub fn apply_tint(&self, color: Rgba) -> Rgba {
        [
            color[0] * self.color_tint[0],
            color[1] * self.color_tint[1],
            color[2] * self.color_tint[2],
            color[3] * self.color_tint[3] * self.alpha_multiplier,
        ]
    }
}

impl PartialEq for ContextState {
    fn eq(&self, other: &Self) -> bool {
        // Tint is baked into commands, only the transform matters here
        let (a, b) = (&self.viewport, &other.viewport);
        a.pixel_rect.x == b.pixel_rect.x
            && a.pixel_rect.y == b.pixel_rect.y
            && a.pixel_rect.width == b.pixel_rect.width
            && a.pixel_rect.height == b.pixel_rect.height
            && a.coord_bounds.min == b.coord_bounds.min
            && a.coord_bounds.max == b.coord_bounds.max
    }
}

// ============================================================================
// RENDER CONTEXT
// ============================================================================

/// Main rendering context with command buffer
pub struct RenderContext {
    /// Stack of context states
    state_stack: Vec<ContextState>,

    /// Current active state
    current: ContextState,

    /// Snapshots of all context states used this frame
    context_snapshots: Vec<ContextState>,

    /// Commands reference context snapshots by ID
    commands: Vec<RenderCommand>,
}

impl RenderContext {
    /// Create a new rendering context
    pub fn new(width: u32, height: u32) -> Self {
        let default_state = ContextState::new(width, height);

        Self {
            state_stack: Vec::new(),
            current: default_state.clone(),
            context_snapshots: vec![default_state],
            commands: Vec::with_capacity(1024),
        }
    }

    /// Capture current context state and return its ID
    pub(crate) fn capture_context_snapshot(&mut self) -> usize {
        if let Some(id) = self
            .context_snapshots
            .iter()
            .position(|s| s == &self.current)
        {
            return id;
        }

        let id = self.context_snapshots.len();
        self.context_snapshots.push(self.current.clone());
        id
    }

    fn with_state(
        &mut self,
        state: ContextState,
        f: impl FnOnce(&mut ViewportScope<'_>),
    ) {
        let previous = std::mem::replace(&mut self.current, state);
        self.state_stack.push(previous);

        let mut scope = ViewportScope { ctx: self };
        f(&mut scope);

        if let Some(previous) = self.state_stack.pop() {
            self.current = previous;
        }
    }

    /// Push a new viewport context
    pub fn viewport(&mut self, config: ViewportConfig, f: impl FnOnce(&mut ViewportScope<'_>)) {
        let mut state = self.current.clone();
        state.viewport = config.into();
        self.with_state(state, f);
    }

    /// Apply color tint; nested tints multiply
    pub fn tinted(&mut self, tint: [f32; 4], f: impl FnOnce(&mut ViewportScope<'_>)) {
        let mut state = self.current.clone();
        state.color_tint = [
            state.color_tint[0] * tint[0],
            state.color_tint[1] * tint[1],
            state.color_tint[2] * tint[2],
            state.color_tint[3] * tint[3],
        ];
        self.with_state(state, f);
    }

    /// Convert logical coords to pixel coords (for debugging/UI)
    pub fn logical_to_pixels(&self, logical_pos: [f32; 2]) -> [f32; 2] {
        let bounds = &self.current.viewport.coord_bounds;
        let rect = &self.current.viewport.pixel_rect;

        let norm_x = (logical_pos[0] - bounds.min[0]) / (bounds.max[0] - bounds.min[0]);
        let norm_y = (logical_pos[1] - bounds.min[1]) / (bounds.max[1] - bounds.min[1]);

        [
            rect.x as f32 + norm_x * rect.width as f32,
            rect.y as f32 + norm_y * rect.height as f32,
        ]
    }

    /// Clear command buffer for new frame
    pub fn clear(&mut self) {
        self.commands.clear();
        self.context_snapshots.clear();
        self.context_snapshots.push(self.current.clone());
    }

    /// Resets the root state to a new target size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.state_stack.clear();
        self.current = ContextState::new(width, height);
        self.clear();
    }

    /// Submit all commands to shader registry
    ///
    /// Commands are stably sorted by (context_id, depth) so submission order
    /// is kept within a layer.
    pub fn submit(&mut self, shader_registry: &mut ShaderRegistry) {
        self.commands
            .sort_by_key(|cmd| (cmd.context_id, OrderedFloat(cmd.depth)));

        let mut current_context_id = usize::MAX; // Force initial context switch
        for cmd in &self.commands {
            if cmd.context_id != current_context_id {
                current_context_id = cmd.context_id;

                if let Some(ctx_state) = self.context_snapshots.get(current_context_id)
                    && let Some(shapes) = shader_registry
                        .get_mut(SHAPE_SHADER_NAME)
                        .and_then(|r| r.as_any_mut().downcast_mut::<ShapeRenderer>())
                {
                    let bounds = &ctx_state.viewport.coord_bounds;
                    shapes.set_viewport(bounds.min, bounds.max);
                }
            }

            cmd.command.dispatch(shader_registry);
        }
    }

    /// Get reference to context snapshots (for render pass state application)
    pub fn context_snapshots(&self) -> &[ContextState] {
        &self.context_snapshots
    }

    /// Get reference to recorded commands
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of distinct batch keys recorded this frame
    pub fn batch_count(&self) -> usize {
        self.commands
            .iter()
            .map(|cmd| cmd.command.batch_key())
            .collect::<HashSet<_>>()
            .len()
    }

    // ===== CONVENIENCE DRAW METHODS (delegate to default viewport) =====

    /// Draw a filled convex polygon
    pub fn polygon(&mut self, points: &[[f32; 2]]) -> PolygonBuilder<'_> {
        PolygonBuilder::new(self, vec![points.to_vec()])
    }

    /// Draw a polyline
    pub fn polyline(&mut self, points: &[[f32; 2]]) -> LineBuilder<'_> {
        LineBuilder::new(self, points.to_vec())
    }

    /// Draw generated primitives at one depth
    pub fn primitives(&mut self, primitives: &[Primitive], depth: f32) {
        for primitive in primitives {
            match primitive {
                Primitive::Polygon { points, color } => {
                    self.polygon(points).color(*color).depth(depth);
                }
                Primitive::Polyline {
                    points,
                    closed,
                    thickness,
                    color,
                } => {
                    self.polyline(points)
                        .closed(*closed)
                        .thickness(*thickness)
                        .color(*color)
                        .depth(depth);
                }
            }
        }
    }
}

// ============================================================================
// VIEWPORT SCOPE
// ============================================================================

/// Scoped rendering context with viewport transform
pub struct ViewportScope<'a> {
    pub(crate) ctx: &'a mut RenderContext,
}

impl<'a> ViewportScope<'a> {
    /// Draw a filled convex polygon
    pub fn polygon(&mut self, points: &[[f32; 2]]) -> PolygonBuilder<'_> {
        self.ctx.polygon(points)
    }

    /// Draw several polygons with shared properties (batch)
    pub fn polygons(&mut self, polygons: &[Vec<[f32; 2]>]) -> PolygonBuilder<'_> {
        PolygonBuilder::new(self.ctx, polygons.to_vec())
    }

    /// Draw a polyline
    pub fn polyline(&mut self, points: &[[f32; 2]]) -> LineBuilder<'_> {
        self.ctx.polyline(points)
    }

    /// Draw generated primitives at one depth
    pub fn primitives(&mut self, primitives: &[Primitive], depth: f32) {
        self.ctx.primitives(primitives, depth);
    }

    // ===== CONTEXT NESTING =====

    /// Nested viewport
    pub fn viewport(&mut self, config: ViewportConfig, f: impl FnOnce(&mut ViewportScope<'_>)) {
        self.ctx.viewport(config, f);
    }

    /// Apply color tint
    pub fn tinted(&mut self, tint: [f32; 4], f: impl FnOnce(&mut ViewportScope<'_>)) {
        self.ctx.tinted(tint, f);
    }

    // ===== CONTEXT QUERIES =====

    /// Get viewport dimensions
    pub fn width(&self) -> u32 {
        self.ctx.current.viewport.pixel_rect.width
    }

    pub fn height(&self) -> u32 {
        self.ctx.current.viewport.pixel_rect.height
    }

    /// Convert logical coords to pixels (for hit testing, etc.)
    pub fn logical_to_pixels(&self, logical_pos: [f32; 2]) -> [f32; 2] {
        self.ctx.logical_to_pixels(logical_pos)
    }
}

// ============================================================================
// BUILDER TYPES
// ============================================================================

/// Builder for polygon commands
pub struct PolygonBuilder<'a> {
    ctx: &'a mut RenderContext,
    polygons: Vec<Vec<[f32; 2]>>,
    color: Rgba,
    depth: f32,
    context_id: usize,
}

impl<'a> PolygonBuilder<'a> {
    fn new(ctx: &'a mut RenderContext, polygons: Vec<Vec<[f32; 2]>>) -> Self {
        let context_id = ctx.capture_context_snapshot();
        Self {
            ctx,
            polygons,
            color: [1.0, 1.0, 1.0, 1.0],
            depth: 0.0,
            context_id,
        }
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }
}

impl Drop for PolygonBuilder<'_> {
    fn drop(&mut self) {
        let command = PolygonCommand {
            polygons: std::mem::take(&mut self.polygons),
            color: self.ctx.current.apply_tint(self.color),
        };

        self.ctx
            .commands
            .push(RenderCommand::new(command, self.depth, self.context_id));
    }
}

/// Builder for line commands
pub struct LineBuilder<'a> {
    ctx: &'a mut RenderContext,
    points: Vec<[f32; 2]>,
    closed: bool,
    thickness: f32,
    color: Rgba,
    depth: f32,
    context_id: usize,
}

impl<'a> LineBuilder<'a> {
    fn new(ctx: &'a mut RenderContext, points: Vec<[f32; 2]>) -> Self {
        let context_id = ctx.capture_context_snapshot();
        Self {
            ctx,
            points,
            closed: false,
            thickness: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
            depth: 0.0,
            context_id,
        }
    }

    /// Joins the last point back to the first
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }
}

impl Drop for LineBuilder<'_> {
    fn drop(&mut self) {
        let command = LineCommand {
            points: std::mem::take(&mut self.points),
            closed: self.closed,
            thickness: self.thickness,
            color: self.ctx.current.apply_tint(self.color),
        };

        self.ctx
            .commands
            .push(RenderCommand::new(command, self.depth, self.context_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_dimensions() {
        let bounds = Bounds {
            min: [0.0, 0.0],
            max: [100.0, 50.0],
        };

        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
        assert_eq!(bounds.aspect_ratio(), 2.0);
        assert_eq!(bounds.center(), [50.0, 25.0]);
    }

    #[test]
    fn test_bounds_negative_coords() {
        let bounds = Bounds {
            min: [-10.0, -20.0],
            max: [10.0, 20.0],
        };

        assert_eq!(bounds.width(), 20.0);
        assert_eq!(bounds.height(), 40.0);
        assert_eq!(bounds.aspect_ratio(), 0.5);
        assert_eq!(bounds.center(), [0.0, 0.0]);
    }

    #[test]
    fn test_viewport_screen_to_world_simple() {
        // Simple case: 100x100 pixel rect mapping to [0,0] to [10,10] world
        let viewport = ViewportConfig::new(
            Rect {
                x: 0,
                y: 0,
                width: 100,
                height: 100,
            },
            Bounds {
                min: [0.0, 0.0],
                max: [10.0, 10.0],
            },
        );

        // Center of screen should map to center of world
        assert_eq!(viewport.screen_to_world([50.0, 50.0]), [5.0, 5.0]);

        // Corners
        assert_eq!(viewport.screen_to_world([0.0, 0.0]), [0.0, 0.0]);
        assert_eq!(viewport.screen_to_world([100.0, 100.0]), [10.0, 10.0]);

        // Quarter points
        assert_eq!(viewport.screen_to_world([25.0, 25.0]), [2.5, 2.5]);
        assert_eq!(viewport.screen_to_world([75.0, 75.0]), [7.5, 7.5]);
    }

    #[test]
    fn test_viewport_screen_to_world_with_offset() {
        // Viewport doesn't start at origin
        let viewport = ViewportConfig::new(
            Rect {
                x: 50,
                y: 50,
                width: 100,
                height: 100,
            },
            Bounds {
                min: [-1.0, -1.0],
                max: [1.0, 1.0],
            },
        );

        // Screen [50, 50] is top-left of viewport -> world [-1, -1]
        assert_eq!(viewport.screen_to_world([50.0, 50.0]), [-1.0, -1.0]);

        // Screen [100, 100] is center of viewport -> world [0, 0]
        assert_eq!(viewport.screen_to_world([100.0, 100.0]), [0.0, 0.0]);

        // Screen [150, 150] is bottom-right of viewport -> world [1, 1]
        assert_eq!(viewport.screen_to_world([150.0, 150.0]), [1.0, 1.0]);
    }

    #[test]
    fn test_viewport_world_to_screen_simple() {
        let viewport = ViewportConfig::new(
            Rect {
                x: 0,
                y: 0,
                width: 100,
                height: 100,
            },
            Bounds {
                min: [0.0, 0.0],
                max: [10.0, 10.0],
            },
        );

        // World center to screen center
        assert_eq!(viewport.world_to_screen([5.0, 5.0]), [50.0, 50.0]);

        // Corners
        assert_eq!(viewport.world_to_screen([0.0, 0.0]), [0.0, 0.0]);
        assert_eq!(viewport.world_to_screen([10.0, 10.0]), [100.0, 100.0]);

        // Quarter points
        assert_eq!(viewport.world_to_screen([2.5, 2.5]), [25.0, 25.0]);
        assert_eq!(viewport.world_to_screen([7.5, 7.5]), [75.0, 75.0]);
    }

    #[test]
    fn test_viewport_world_to_screen_with_offset() {
        let viewport = ViewportConfig::new(
            Rect {
                x: 50,
                y: 50,
                width: 100,
                height: 100,
            },
            Bounds {
                min: [-1.0, -1.0],
                max: [1.0, 1.0],
            },
        );

        // World [-1, -1] -> screen [50, 50] (top-left of viewport)
        assert_eq!(viewport.world_to_screen([-1.0, -1.0]), [50.0, 50.0]);

        // World [0, 0] -> screen [100, 100] (center of viewport)
        assert_eq!(viewport.world_to_screen([0.0, 0.0]), [100.0, 100.0]);

        // World [1, 1] -> screen [150, 150] (bottom-right of viewport)
        assert_eq!(viewport.world_to_screen([1.0, 1.0]), [150.0, 150.0]);
    }

    #[test]
    fn test_viewport_roundtrip_conversion() {
        let viewport = ViewportConfig::new(
            Rect {
                x: 100,
                y: 200,
                width: 800,
                height: 600,
            },
            Bounds {
                min: [-1.5, -2.0],
                max: [1.5, 2.0],
            },
        );

        // Test that screen -> world -> screen is identity
        let screen_pos = [450.0, 500.0];
        let world_pos = viewport.screen_to_world(screen_pos);
        let back_to_screen = viewport.world_to_screen(world_pos);

        assert!((screen_pos[0] - back_to_screen[0]).abs() < 0.001);
        assert!((screen_pos[1] - back_to_screen[1]).abs() < 0.001);

        // Test that world -> screen -> world is identity
        let world_pos = [0.5, -1.0];
        let screen_pos = viewport.world_to_screen(world_pos);
        let back_to_world = viewport.screen_to_world(screen_pos);

        assert!((world_pos[0] - back_to_world[0]).abs() < 0.001);
        assert!((world_pos[1] - back_to_world[1]).abs() < 0.001);
    }

    #[test]
    fn test_viewport_scale_factors() {
        let viewport = ViewportConfig::new(
            Rect {
                x: 0,
                y: 0,
                width: 800,
                height: 600,
            },
            Bounds {
                min: [-1.5, -2.0],
                max: [1.5, 2.0],
            },
        );

        // World width is 3.0, pixel width is 800
        // So pixels_to_world = 3.0 / 800.0 = 0.00375
        let pixels_to_world = viewport.pixels_to_world_scale();
        assert!((pixels_to_world - 3.0 / 800.0).abs() < 0.0001);

        // world_to_pixels = 800.0 / 3.0 â‰ˆ 266.667
        let world_to_pixels = viewport.world_to_pixels_scale();
        assert!((world_to_pixels - 800.0 / 3.0).abs() < 0.001);

        // These should be inverses
        assert!((pixels_to_world * world_to_pixels - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_contains_screen() {
        let viewport = ViewportConfig::new(
            Rect {
                x: 10,
                y: 20,
                width: 100,
                height: 50,
            },
            Bounds {
                min: [0.0, 0.0],
                max: [100.0, 50.0],
            },
        );
        assert!(viewport.contains_screen([10.0, 20.0]));
        assert!(viewport.contains_screen([109.0, 69.0]));
        assert!(!viewport.contains_screen([110.0, 30.0]));
        assert!(!viewport.contains_screen([50.0, 19.0]));
    }

    fn square() -> Vec<[f32; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn test_builders_record_on_drop() {
        let mut ctx = RenderContext::new(200, 100);
        ctx.polygon(&square()).color([1.0, 0.0, 0.0, 1.0]).depth(2.0);
        ctx.polyline(&square()).closed(true).thickness(2.0);
        assert_eq!(ctx.commands().len(), 2);
        assert_eq!(ctx.commands()[0].depth, 2.0);
        assert_eq!(ctx.commands()[1].command.debug_name(), "Line loop");

        ctx.clear();
        assert!(ctx.commands().is_empty());
        assert_eq!(ctx.context_snapshots().len(), 1);
    }

    #[test]
    fn test_tint_is_baked_into_commands() {
        let mut ctx = RenderContext::new(200, 100);
        ctx.tinted([0.5, 0.5, 0.5, 1.0], |scope| {
            scope.tinted([1.0, 1.0, 1.0, 0.5], |inner| {
                let tinted = inner.ctx.current.apply_tint([1.0, 1.0, 1.0, 1.0]);
                assert_eq!(tinted, [0.5, 0.5, 0.5, 0.5]);
                inner.polygon(&square()).color([1.0, 1.0, 1.0, 1.0]);
            });
        });
        // Outside the scope the tint no longer applies
        ctx.polygon(&square());

        let unchanged = ctx.current.apply_tint([1.0, 1.0, 1.0, 1.0]);
        assert_eq!(unchanged, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(ctx.commands().len(), 2);
        assert_eq!(ctx.context_snapshots().len(), 1);
    }

    #[test]
    fn test_viewport_scopes_share_snapshots() {
        let mut ctx = RenderContext::new(200, 100);
        let config = ViewportConfig::new(
            Rect {
                x: 0,
                y: 0,
                width: 200,
                height: 100,
            },
            Bounds {
                min: [0.0, 0.0],
                max: [400.0, 200.0],
            },
        );
        ctx.viewport(config.clone(), |scope| {
            scope.polygon(&square());
        });
        ctx.viewport(config, |scope| {
            scope.polyline(&square());
        });
        assert_eq!(ctx.context_snapshots().len(), 2);
        assert_eq!(ctx.commands()[0].context_id, 1);
        assert_eq!(ctx.commands()[1].context_id, 1);
    }

    #[test]
    fn test_primitives_map_to_commands() {
        let mut ctx = RenderContext::new(200, 100);
        let shapes = vec![
            Primitive::Polygon {
                points: square(),
                color: [0.2, 0.2, 0.2, 1.0],
            },
            Primitive::Polyline {
                points: square(),
                closed: true,
                thickness: 1.5,
                color: [0.0, 0.0, 0.0, 1.0],
            },
        ];
        ctx.primitives(&shapes, 3.0);
        assert_eq!(ctx.commands().len(), 2);
        assert!(ctx.commands().iter().all(|c| c.depth == 3.0));
        assert_eq!(ctx.batch_count(), 2);
    }

    #[test]
    fn test_submit_keeps_order_within_depth() {
        let mut registry = ShaderRegistry::new();
        registry.register(Box::new(ShapeRenderer::new()));

        let mut ctx = RenderContext::new(200, 100);
        ctx.polygon(&square()).depth(1.0);
        ctx.polygon(&[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0]]).depth(0.0);
        ctx.polyline(&[[0.0, 0.0], [3.0, 0.0]]).depth(1.0);
        ctx.submit(&mut registry);

        let depths: Vec<f32> = ctx.commands().iter().map(|c| c.depth).collect();
        assert_eq!(depths, vec![0.0, 1.0, 1.0]);
        assert_eq!(ctx.commands()[1].command.debug_name(), "Polygon");

        let shapes = registry
            .get_mut(SHAPE_SHADER_NAME)
            .and_then(|r| r.as_any_mut().downcast_mut::<ShapeRenderer>())
            .unwrap();
        // triangle (3) + quad fan (6) + one segment quad (6)
        assert_eq!(shapes.queued_vertices(), 15);
    }
}
