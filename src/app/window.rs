//! Window attributes and arena-fitted sizes

use super::config::WindowConfig;
use super::geometry::IsoLayout;
use winit::dpi::LogicalSize;
use winit::window::{Fullscreen, WindowAttributes};

/// Smallest window that still fits the HUD and menu panels
pub const MIN_WINDOW_SIZE: (f64, f64) = (480.0, 360.0);

/// Creates window attributes from configuration
pub fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(clamp_to_minimum(LogicalSize::new(
            config.width,
            config.height,
        )))
        .with_min_inner_size(LogicalSize::new(MIN_WINDOW_SIZE.0, MIN_WINDOW_SIZE.1))
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    attrs
}

/// Window size showing the whole arena plus HUD at native scale
pub fn arena_inner_size(layout: &IsoLayout) -> LogicalSize<f64> {
    clamp_to_minimum(LogicalSize::new(
        f64::from(layout.pixel_width()),
        f64::from(layout.pixel_height()),
    ))
}

fn clamp_to_minimum(size: LogicalSize<f64>) -> LogicalSize<f64> {
    LogicalSize::new(
        size.width.max(MIN_WINDOW_SIZE.0),
        size.height.max(MIN_WINDOW_SIZE.1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LevelSettings, generator::LevelGenerator};

    fn layout(settings: LevelSettings) -> IsoLayout {
        let level = LevelGenerator::from_settings(&settings)
            .unwrap()
            .generate()
            .unwrap();
        IsoLayout::for_level(&level)
    }

    #[test]
    fn test_arena_size_matches_layout() {
        let layout = layout(LevelSettings::new(25, 19, 48, 0.1, 3, true));
        let size = arena_inner_size(&layout);
        assert_eq!(size.width, f64::from(layout.pixel_width()));
        assert_eq!(size.height, f64::from(layout.pixel_height()));
    }

    #[test]
    fn test_tiny_arenas_keep_minimum_window() {
        let layout = layout(LevelSettings::new(5, 5, 16, 0.0, 3, true));
        let size = arena_inner_size(&layout);
        assert!(size.width >= MIN_WINDOW_SIZE.0);
        assert!(size.height >= MIN_WINDOW_SIZE.1);
    }
}
