//! Command-based rendering system
//!
//! Provides a trait-based command buffer for declarative rendering with
//! viewport-based coordinate transforms. Commands are replayed in painter's
//! order, so later commands at the same depth cover earlier ones.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::super::shader_system::ShaderRegistry;
use super::super::shape_renderer::{SHAPE_SHADER_NAME, ShapeRenderer};

/// Core trait that all drawable commands implement
pub trait DrawCommand: Send + Sync {
    /// Which shader renders this command?
    fn shader_name(&self) -> &str;

    /// Dispatch this command to the shader registry
    /// Called once per command during frame submission
    fn dispatch(&self, shader_registry: &mut ShaderRegistry);

    /// Batching key - commands with same key share pipeline state
    /// Format: high 32 bits = shader hash, low 32 bits = material/state hash
    fn batch_key(&self) -> u64;

    /// Approximate memory size for profiling (optional)
    fn size_hint(&self) -> usize {
        std::mem::size_of_val(self)
    }

    /// Debug name for render debugging
    fn debug_name(&self) -> &str {
        self.shader_name()
    }
}

/// Helper for computing batch keys
pub fn compute_batch_key(shader: &str, material_hash: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    shader.hash(&mut hasher);
    let shader_hash = hasher.finish();

    // Combine shader hash (high bits) with material hash (low bits)
    (shader_hash & 0xFFFFFFFF00000000) | (material_hash & 0x00000000FFFFFFFF)
}

fn color_hash(color: &[f32; 4]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for channel in color {
        channel.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

fn shape_renderer(shader_registry: &mut ShaderRegistry) -> Option<&mut ShapeRenderer> {
    shader_registry
        .get_mut(SHAPE_SHADER_NAME)
        .and_then(|r| r.as_any_mut().downcast_mut::<ShapeRenderer>())
}

// ============================================================================
// POLYGON COMMANDS
// ============================================================================

/// Filled convex polygons sharing one colour
#[derive(Clone, Debug)]
pub struct PolygonCommand {
    pub polygons: Vec<Vec<[f32; 2]>>,
    pub color: [f32; 4],
}

impl DrawCommand for PolygonCommand {
    fn shader_name(&self) -> &str {
        SHAPE_SHADER_NAME
    }

    fn dispatch(&self, shader_registry: &mut ShaderRegistry) {
        if let Some(renderer) = shape_renderer(shader_registry) {
            for points in &self.polygons {
                renderer.fill_polygon(points, self.color);
            }
        }
    }

    fn batch_key(&self) -> u64 {
        compute_batch_key(SHAPE_SHADER_NAME, color_hash(&self.color))
    }

    fn size_hint(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .polygons
                .iter()
                .map(|p| p.len() * std::mem::size_of::<[f32; 2]>())
                .sum::<usize>()
    }

    fn debug_name(&self) -> &str {
        if self.polygons.len() == 1 {
            "Polygon"
        } else {
            "Polygons (batch)"
        }
    }
}

// ============================================================================
// LINE COMMANDS
// ============================================================================

/// Polyline stroke, optionally closed into a loop
#[derive(Clone, Debug)]
pub struct LineCommand {
    pub points: Vec<[f32; 2]>,
    pub closed: bool,
    pub thickness: f32,
    pub color: [f32; 4],
}

impl LineCommand {
    /// Consecutive point pairs, including the closing segment for loops
    pub fn segments(&self) -> Vec<([f32; 2], [f32; 2])> {
        let mut segments: Vec<_> = self.points.windows(2).map(|w| (w[0], w[1])).collect();
        if self.closed
            && self.points.len() > 2
            && let (Some(first), Some(last)) = (self.points.first(), self.points.last())
        {
            segments.push((*last, *first));
        }
        segments
    }
}

impl DrawCommand for LineCommand {
    fn shader_name(&self) -> &str {
        SHAPE_SHADER_NAME
    }

    fn dispatch(&self, shader_registry: &mut ShaderRegistry) {
        if let Some(renderer) = shape_renderer(shader_registry) {
            for (from, to) in self.segments() {
                renderer.stroke_line(from, to, self.thickness, self.color);
            }
        }
    }

    fn batch_key(&self) -> u64 {
        let material_hash = color_hash(&self.color) ^ self.thickness.to_bits() as u64;
        compute_batch_key(SHAPE_SHADER_NAME, material_hash)
    }

    fn size_hint(&self) -> usize {
        std::mem::size_of::<Self>() + self.points.len() * std::mem::size_of::<[f32; 2]>()
    }

    fn debug_name(&self) -> &str {
        if self.closed { "Line loop" } else { "Line strip" }
    }
}

// ============================================================================
// RENDER COMMAND
// ============================================================================

/// A command with rendering context
pub struct RenderCommand {
    /// The drawable command (trait object)
    pub command: Box<dyn DrawCommand>,

    /// Depth within viewport context; lower depths are drawn first
    pub depth: f32,

    /// Which viewport/context state to use
    pub context_id: usize,
}

impl RenderCommand {
    pub fn new(command: impl DrawCommand + 'static, depth: f32, context_id: usize) -> Self {
        Self {
            command: Box::new(command),
            depth,
            context_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<[f32; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn test_closed_line_adds_return_segment() {
        let mut line = LineCommand {
            points: square(),
            closed: false,
            thickness: 1.0,
            color: [1.0; 4],
        };
        assert_eq!(line.segments().len(), 3);
        line.closed = true;
        let segments = line.segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3], ([0.0, 1.0], [0.0, 0.0]));
    }

    #[test]
    fn test_batch_key_depends_on_colour() {
        let red = PolygonCommand {
            polygons: vec![square()],
            color: [1.0, 0.0, 0.0, 1.0],
        };
        let blue = PolygonCommand {
            polygons: vec![square()],
            color: [0.0, 0.0, 1.0, 1.0],
        };
        assert_ne!(red.batch_key(), blue.batch_key());
        assert_eq!(red.batch_key(), red.clone().batch_key());
        // Same shader prefix
        assert_eq!(
            red.batch_key() & 0xFFFFFFFF00000000,
            blue.batch_key() & 0xFFFFFFFF00000000
        );
    }
}
