//! Tile kinds that make up a level

/// A single tile of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    Floor,
    Wall,
    Start,
    Exit,
    Hazard,
    PlayerSpawn,
    EnemySpawn,
}

impl TileType {
    pub const ALL: [TileType; 7] = [
        TileType::Floor,
        TileType::Wall,
        TileType::Start,
        TileType::Exit,
        TileType::Hazard,
        TileType::PlayerSpawn,
        TileType::EnemySpawn,
    ];

    /// Character used in level layouts
    pub fn symbol(self) -> char {
        match self {
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::Start => 'S',
            TileType::Exit => 'G',
            TileType::Hazard => 'X',
            TileType::PlayerSpawn => 'P',
            TileType::EnemySpawn => 'E',
        }
    }

    /// Base colour as linear RGB
    pub fn rgb(self) -> [f32; 3] {
        match self {
            TileType::Floor => [0.18, 0.18, 0.2],
            TileType::Wall => [0.09, 0.09, 0.1],
            TileType::Start => [0.24, 0.32, 0.54],
            TileType::Exit => [0.36, 0.75, 0.34],
            TileType::Hazard => [0.83, 0.27, 0.27],
            TileType::PlayerSpawn => [0.38, 0.58, 0.82],
            TileType::EnemySpawn => [0.72, 0.32, 0.32],
        }
    }

    pub fn blocks_movement(self) -> bool {
        matches!(self, TileType::Wall)
    }

    /// Parses a layout character. Unknown characters read as floor.
    pub fn from_symbol(symbol: char) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.symbol() == symbol)
            .unwrap_or(TileType::Floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_unique() {
        for a in TileType::ALL {
            for b in TileType::ALL {
                if a != b {
                    assert_ne!(a.symbol(), b.symbol());
                }
            }
        }
    }

    #[test]
    fn test_from_symbol() {
        assert_eq!(TileType::from_symbol('#'), TileType::Wall);
        assert_eq!(TileType::from_symbol('X'), TileType::Hazard);
        assert_eq!(TileType::from_symbol('?'), TileType::Floor);
    }

    #[test]
    fn test_only_walls_block() {
        let blocking: Vec<_> = TileType::ALL
            .into_iter()
            .filter(|t| t.blocks_movement())
            .collect();
        assert_eq!(blocking, vec![TileType::Wall]);
    }
}
