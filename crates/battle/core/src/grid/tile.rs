use std::collections::BTreeSet;

use super::{GridBounds, GridOracle, Position};

/// Canonical terrain classes for battle tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Floor,
    Wall,
    Water,
    Void,
}

impl Terrain {
    pub fn is_passable(self) -> bool {
        matches!(self, Terrain::Floor)
    }
}

/// Dense in-memory grid implementing [`GridOracle`].
///
/// Stores one [`Terrain`] per tile in row-major order plus the set of occupied
/// tiles. Out-of-bounds queries are impassable and unoccupied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    bounds: GridBounds,
    tiles: Vec<Terrain>,
    occupied: BTreeSet<Position>,
}

impl TileGrid {
    /// Creates an all-floor grid.
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            tiles: vec![Terrain::Floor; bounds.area() as usize],
            occupied: BTreeSet::new(),
        }
    }

    /// Builds a grid from ASCII rows: `#` wall, `~` water, space void, anything else floor.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(GridBounds::new(width, height));

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let terrain = match ch {
                    '#' => Terrain::Wall,
                    '~' => Terrain::Water,
                    ' ' => Terrain::Void,
                    _ => Terrain::Floor,
                };
                grid.set_terrain(Position::new(x as i32, y as i32), terrain);
            }
        }

        grid
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.bounds
            .contains(position)
            .then(|| position.y as usize * self.bounds.width as usize + position.x as usize)
    }

    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        self.index(position).map(|i| self.tiles[i])
    }

    /// Sets the terrain at `position`. Returns false when the position is out of bounds.
    pub fn set_terrain(&mut self, position: Position, terrain: Terrain) -> bool {
        match self.index(position) {
            Some(i) => {
                self.tiles[i] = terrain;
                true
            }
            None => false,
        }
    }

    pub fn set_wall(&mut self, position: Position) -> bool {
        self.set_terrain(position, Terrain::Wall)
    }

    pub fn set_occupied(&mut self, position: Position, occupied: bool) {
        if occupied {
            self.occupied.insert(position);
        } else {
            self.occupied.remove(&position);
        }
    }

    pub fn clear_occupants(&mut self) {
        self.occupied.clear();
    }
}

impl GridOracle for TileGrid {
    fn bounds(&self) -> GridBounds {
        self.bounds
    }

    fn is_passable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(Terrain::is_passable)
    }

    fn is_occupied(&self, position: Position) -> bool {
        self.occupied.contains(&position)
    }
}
