//! Geometry generators for the isometric arena
//!
//! Projects grid cells onto the screen and turns tiles, highlights and unit
//! figures into flat polygons and polylines for the shape renderer.

use crate::sim::{GridPosition, Level, TileType, UnitFaction};

/// Height reserved for the HUD bar at the top of the board texture
pub const HUD_HEIGHT: f32 = 64.0;

const TILE_HEIGHT_RATIO: f32 = 0.6;
const WALL_HEIGHT_RATIO: f32 = 2.2;
const TOP_PADDING_RATIO: f32 = 3.0;
const BOTTOM_PADDING_RATIO: f32 = 6.0;
const OUTLINE_THICKNESS: f32 = 1.5;
const CIRCLE_SEGMENTS: usize = 18;

/// RGBA colour
pub type Rgba = [f32; 4];

/// A flat shape in board pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled convex polygon
    Polygon { points: Vec<[f32; 2]>, color: Rgba },
    /// Connected line segments
    Polyline {
        points: Vec<[f32; 2]>,
        closed: bool,
        thickness: f32,
        color: Rgba,
    },
}

/// Fill and outline colours of a translucent tile highlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub fill: Rgba,
    pub outline: Rgba,
}

impl Highlight {
    pub const PLAYER_SPAWN: Highlight = Highlight {
        fill: [0.25, 0.55, 0.95, 0.15],
        outline: [0.5, 0.85, 1.0, 0.6],
    };
    pub const ENEMY_SPAWN: Highlight = Highlight {
        fill: [0.85, 0.35, 0.35, 0.18],
        outline: [0.95, 0.55, 0.45, 0.75],
    };
    pub const CURSOR: Highlight = Highlight {
        fill: [0.2, 0.6, 0.95, 0.35],
        outline: [0.85, 0.95, 1.0, 0.9],
    };
    pub const SELECTED_UNIT: Highlight = Highlight {
        fill: [0.3, 0.75, 0.95, 0.4],
        outline: [0.9, 1.0, 1.0, 0.95],
    };
    pub const PREVIEW_ORIGIN: Highlight = Highlight {
        fill: [0.6, 0.85, 1.0, 0.4],
        outline: [0.9, 0.95, 1.0, 0.95],
    };

    /// Reachable tile shading; nearer tiles are more opaque
    pub fn preview_tile(distance: u32, max_distance: u32) -> Highlight {
        let intensity = if max_distance == 0 {
            1.0
        } else {
            1.0 - distance as f32 / max_distance as f32
        };
        Highlight {
            fill: [0.25, 0.85, 0.45, 0.22 + 0.12 * intensity],
            outline: [0.35, 0.95, 0.45, 0.7],
        }
    }
}

/// Isometric projection of a level onto a pixel canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoLayout {
    columns: i32,
    rows: i32,
    tile_width: f32,
    tile_height: f32,
    origin_x: f32,
    origin_y: f32,
    pixel_width: u32,
    pixel_height: u32,
}

impl IsoLayout {
    /// Sizes the canvas so the whole arena, its walls and the HUD fit
    pub fn for_level(level: &Level) -> Self {
        let columns = level.columns();
        let rows = level.rows();
        let tile_width = level.tile_size() as f32;
        let tile_height = tile_width * TILE_HEIGHT_RATIO;
        let half_w = tile_width / 2.0;
        let half_h = tile_height / 2.0;

        let min_center_x = -((rows - 1) as f32) * half_w;
        let max_center_x = (columns - 1) as f32 * half_w;
        let width_span = (max_center_x - min_center_x) + tile_width;
        let margin = tile_width * 2.0;

        let origin_x = margin - min_center_x;
        let origin_y =
            HUD_HEIGHT + tile_height * TOP_PADDING_RATIO + tile_height * WALL_HEIGHT_RATIO;
        let board_depth = (columns + rows - 2) as f32 * half_h + tile_height;

        Self {
            columns,
            rows,
            tile_width,
            tile_height,
            origin_x,
            origin_y,
            pixel_width: (width_span + margin * 2.0).ceil() as u32,
            pixel_height: (origin_y + board_depth + tile_height * BOTTOM_PADDING_RATIO).ceil()
                as u32,
        }
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    fn half_w(&self) -> f32 {
        self.tile_width / 2.0
    }

    fn half_h(&self) -> f32 {
        self.tile_height / 2.0
    }

    /// Screen position of the centre of a cell's floor diamond
    pub fn cell_center(&self, pos: GridPosition) -> [f32; 2] {
        [
            self.origin_x + (pos.col - pos.row) as f32 * self.half_w(),
            self.origin_y + (pos.col + pos.row) as f32 * self.half_h(),
        ]
    }

    /// Y of the diamond's bottom corner, where figures stand
    pub fn cell_ground(&self, pos: GridPosition) -> f32 {
        self.cell_center(pos)[1] + self.half_h()
    }

    /// Cell whose floor diamond contains the point, if it lies on the grid
    pub fn screen_to_cell(&self, x: f32, y: f32) -> Option<GridPosition> {
        let u = (x - self.origin_x) / self.half_w();
        let v = (y - self.origin_y) / self.half_h();
        let col = ((u + v) / 2.0).round() as i32;
        let row = ((v - u) / 2.0).round() as i32;
        if col < 0 || row < 0 || col >= self.columns || row >= self.rows {
            return None;
        }
        Some(GridPosition::new(col, row))
    }

    fn diamond(&self, center: [f32; 2], half_w: f32, half_h: f32) -> Vec<[f32; 2]> {
        let [cx, cy] = center;
        vec![
            [cx, cy - half_h],
            [cx + half_w, cy],
            [cx, cy + half_h],
            [cx - half_w, cy],
        ]
    }

    // ========================================================================
    // TILES
    // ========================================================================

    /// Shapes for one tile: a raised block for walls, a floor diamond with an
    /// optional glyph otherwise
    pub fn tile(&self, pos: GridPosition, tile: TileType) -> Vec<Primitive> {
        if tile == TileType::Wall {
            return self.wall_block(pos, tile);
        }

        let center = self.cell_center(pos);
        let rgb = tile.rgb();
        let outline = self.diamond(center, self.half_w(), self.half_h());
        let mut shapes = vec![
            Primitive::Polygon {
                points: outline.clone(),
                color: shade(rgb, 1.05),
            },
            Primitive::Polyline {
                points: outline,
                closed: true,
                thickness: OUTLINE_THICKNESS,
                color: shade(rgb, 0.65),
            },
        ];

        match tile {
            TileType::Hazard => shapes.extend(self.hazard_glyph(center)),
            TileType::Start => shapes.push(self.start_marker(center)),
            TileType::Exit => shapes.push(self.exit_marker(center)),
            _ => {}
        }
        shapes
    }

    fn hazard_glyph(&self, [cx, cy]: [f32; 2]) -> [Primitive; 2] {
        let dx = self.half_w() * 0.45;
        let dy = self.half_h() * 0.6;
        let color = [1.0, 0.95, 0.95, 1.0];
        [
            Primitive::Polyline {
                points: vec![[cx - dx, cy - dy], [cx + dx, cy + dy]],
                closed: false,
                thickness: OUTLINE_THICKNESS,
                color,
            },
            Primitive::Polyline {
                points: vec![[cx + dx, cy - dy], [cx - dx, cy + dy]],
                closed: false,
                thickness: OUTLINE_THICKNESS,
                color,
            },
        ]
    }

    fn start_marker(&self, [cx, cy]: [f32; 2]) -> Primitive {
        let top = cy - self.half_h() * 0.5;
        let bottom = cy + self.half_h() * 0.4;
        let half_width = self.half_w() * 0.35;
        Primitive::Polygon {
            points: vec![[cx, top], [cx - half_width, bottom], [cx + half_width, bottom]],
            color: [0.95, 1.0, 1.0, 1.0],
        }
    }

    fn exit_marker(&self, center: [f32; 2]) -> Primitive {
        Primitive::Polyline {
            points: self.diamond(center, self.half_w() * 0.4, self.half_h() * 0.7),
            closed: true,
            thickness: OUTLINE_THICKNESS,
            color: [0.98, 1.0, 0.9, 1.0],
        }
    }

    fn wall_block(&self, pos: GridPosition, tile: TileType) -> Vec<Primitive> {
        let [cx, cy] = self.cell_center(pos);
        let [r, g, b] = tile.rgb();
        let height = self.tile_height * WALL_HEIGHT_RATIO;
        let (hw, hh) = (self.half_w(), self.half_h());
        let bottom = cy + hh;
        let roof_center = cy - height;
        let roof_bottom = roof_center + hh;
        let roof = self.diamond([cx, roof_center], hw, hh);

        vec![
            Primitive::Polygon {
                points: self.diamond([cx, cy], hw, hh),
                color: [0.05, 0.05, 0.08, 1.0],
            },
            // Left face
            Primitive::Polygon {
                points: vec![
                    [cx, bottom],
                    [cx - hw, cy],
                    [cx - hw, roof_center],
                    [cx, roof_bottom],
                ],
                color: [r * 0.65, g * 0.65, b * 0.7, 1.0],
            },
            // Right face
            Primitive::Polygon {
                points: vec![
                    [cx + hw, cy],
                    [cx, bottom],
                    [cx, roof_bottom],
                    [cx + hw, roof_center],
                ],
                color: [r * 0.75, g * 0.75, b * 0.8, 1.0],
            },
            Primitive::Polygon {
                points: roof.clone(),
                color: shade([r, g, b], 1.15),
            },
            Primitive::Polyline {
                points: roof,
                closed: true,
                thickness: OUTLINE_THICKNESS,
                color: [0.0, 0.0, 0.0, 1.0],
            },
        ]
    }

    // ========================================================================
    // OVERLAYS
    // ========================================================================

    /// Translucent diamond over a cell; cells outside the grid draw nothing
    pub fn highlight(&self, pos: GridPosition, highlight: Highlight) -> Vec<Primitive> {
        if pos.col < 0 || pos.row < 0 || pos.col >= self.columns || pos.row >= self.rows {
            return Vec::new();
        }
        let points = self.diamond(self.cell_center(pos), self.half_w(), self.half_h());
        vec![
            Primitive::Polygon {
                points: points.clone(),
                color: highlight.fill,
            },
            Primitive::Polyline {
                points,
                closed: true,
                thickness: OUTLINE_THICKNESS,
                color: highlight.outline,
            },
        ]
    }

    /// Standing figure: shadow, body column, accent stripe and head
    pub fn unit_figure(&self, pos: GridPosition, faction: UnitFaction) -> Vec<Primitive> {
        let [bx, _] = self.cell_center(pos);
        let by = self.cell_ground(pos);
        let sprite_h = self.tile_width * 0.65;
        let radius = sprite_h * 0.35;
        let (base, accent) = match faction {
            UnitFaction::Player => ([0.25, 0.65, 0.92], 0.3),
            UnitFaction::Enemy => ([0.78, 0.32, 0.35], 0.6),
        };
        let [r, g, b] = base;

        let shadow = ellipse(
            [bx, by - sprite_h * 0.05],
            radius * 0.9,
            radius * 0.35,
            CIRCLE_SEGMENTS,
        );
        let stripe_top = by - sprite_h * 0.6;
        let stripe_bottom = stripe_top + sprite_h * 0.12;
        let head = ellipse(
            [bx, by - sprite_h * 1.05],
            radius * 0.65,
            radius * 0.65,
            CIRCLE_SEGMENTS,
        );

        vec![
            Primitive::Polygon {
                points: shadow,
                color: [0.0, 0.0, 0.0, 1.0],
            },
            Primitive::Polygon {
                points: vec![
                    [bx - radius * 0.5, by],
                    [bx + radius * 0.5, by],
                    [bx + radius * 0.4, by - sprite_h],
                    [bx - radius * 0.4, by - sprite_h],
                ],
                color: [r, g, b, 1.0],
            },
            Primitive::Polygon {
                points: vec![
                    [bx - radius * 0.45, stripe_top],
                    [bx + radius * 0.45, stripe_top],
                    [bx + radius * 0.35, stripe_bottom],
                    [bx - radius * 0.35, stripe_bottom],
                ],
                color: clamp_rgba([r + accent, g + accent * 0.3, b + accent * 0.2, 1.0]),
            },
            Primitive::Polygon {
                points: head.clone(),
                color: clamp_rgba([r + accent * 0.5, g + accent * 0.4, b + accent * 0.3, 1.0]),
            },
            Primitive::Polyline {
                points: head,
                closed: true,
                thickness: OUTLINE_THICKNESS,
                color: [0.0, 0.0, 0.0, 1.0],
            },
        ]
    }
}

fn ellipse(center: [f32; 2], rx: f32, ry: f32, segments: usize) -> Vec<[f32; 2]> {
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            [center[0] + angle.cos() * rx, center[1] + angle.sin() * ry]
        })
        .collect()
}

fn shade([r, g, b]: [f32; 3], factor: f32) -> Rgba {
    clamp_rgba([r * factor, g * factor, b * factor, 1.0])
}

fn clamp_rgba(color: Rgba) -> Rgba {
    color.map(|c| c.clamp(0.0, 1.0))
}
