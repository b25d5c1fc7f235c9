//! Pluggable shader system for declarative rendering
//!
//! Draw commands look shaders up by name and queue geometry on them; the
//! registry then uploads and renders every shader once per frame.

use std::collections::HashMap;
use wgpu::{Device, Queue, RenderPass, SurfaceConfiguration};

/// Trait that all shaders must implement
pub trait Shader: Send + Sync {
    /// Returns the shader's unique name
    fn name(&self) -> &str;

    /// Initializes the shader with the given device and configuration
    fn init(&mut self, device: &Device, config: &SurfaceConfiguration);

    /// Begins a new frame, allowing the shader to prepare for rendering
    fn begin_frame(&mut self, device: &Device, queue: &Queue);

    /// Renders the shader's contents to the given render pass
    fn render<'rpass>(&'rpass self, rpass: &mut RenderPass<'rpass>);

    /// Ends the frame, allowing cleanup
    fn end_frame(&mut self);

    /// Allows downcasting to concrete types
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Registry for managing shaders
pub struct ShaderRegistry {
    shaders: HashMap<String, Box<dyn Shader>>,
    render_order: Vec<String>,
}

impl ShaderRegistry {
    /// Creates a new empty shader registry
    pub fn new() -> Self {
        Self {
            shaders: HashMap::new(),
            render_order: Vec::new(),
        }
    }

    /// Registers a shader with the registry
    ///
    /// Shaders are rendered in the order they are registered.
    /// Registering a name twice replaces the shader and keeps its slot.
    pub fn register(&mut self, shader: Box<dyn Shader>) {
        let name = shader.name().to_string();
        if !self.render_order.contains(&name) {
            self.render_order.push(name.clone());
        }
        self.shaders.insert(name, shader);
    }

    /// Initializes all registered shaders
    pub fn init_all(&mut self, device: &Device, config: &SurfaceConfiguration) {
        for shader in self.shaders.values_mut() {
            shader.init(device, config);
        }
    }

    /// Gets a mutable reference to a shader by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Shader + '_)> {
        match self.shaders.get_mut(name) {
            Some(shader) => Some(shader.as_mut()),
            None => None,
        }
    }

    /// Shader names in render order
    pub fn names(&self) -> &[String] {
        &self.render_order
    }

    /// Begins a new frame for all shaders
    pub fn begin_frame(&mut self, device: &Device, queue: &Queue) {
        for shader in self.shaders.values_mut() {
            shader.begin_frame(device, queue);
        }
    }

    /// Renders all shaders in registration order
    pub fn render_all<'rpass>(&'rpass self, rpass: &mut RenderPass<'rpass>) {
        for name in &self.render_order {
            if let Some(shader) = self.shaders.get(name) {
                shader.render(rpass);
            }
        }
    }

    /// Ends the frame for all shaders
    pub fn end_frame(&mut self) {
        for shader in self.shaders.values_mut() {
            shader.end_frame();
        }
    }
}

impl Default for ShaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::shape_renderer::{SHAPE_SHADER_NAME, ShapeRenderer};

    #[test]
    fn test_lookup_and_downcast() {
        let mut registry = ShaderRegistry::new();
        registry.register(Box::new(ShapeRenderer::new()));

        let shape = registry
            .get_mut(SHAPE_SHADER_NAME)
            .and_then(|s| s.as_any_mut().downcast_mut::<ShapeRenderer>());
        assert!(shape.is_some());
        assert!(registry.get_mut("missing").is_none());
    }

    #[test]
    fn test_reregistering_keeps_order() {
        let mut registry = ShaderRegistry::new();
        registry.register(Box::new(ShapeRenderer::new()));
        registry.register(Box::new(ShapeRenderer::new()));
        assert_eq!(registry.names(), [SHAPE_SHADER_NAME.to_string()]);

        registry.end_frame();
    }
}
