use std::{fmt, str::FromStr};

use rand::{seq::SliceRandom, Rng};

use super::Pos;
use crate::error::{Error, Result};

/// Static classification of a cell
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Start,
    RewardA,
    RewardB,
    Punishment,
    Wall,
}

impl Tile {
    /// Map symbol used by [`World`]'s text format
    pub const fn symbol(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Start => 'S',
            Tile::RewardA => 'A',
            Tile::RewardB => 'B',
            Tile::Punishment => 'X',
            Tile::Wall => '#',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Tile::Empty),
            'S' => Some(Tile::Start),
            'A' => Some(Tile::RewardA),
            'B' => Some(Tile::RewardB),
            'X' => Some(Tile::Punishment),
            '#' => Some(Tile::Wall),
            _ => None,
        }
    }

    pub const fn is_goal(self) -> bool {
        matches!(self, Tile::RewardA | Tile::RewardB)
    }

    /// Cells an episode may start on
    pub const fn is_open(self) -> bool {
        matches!(self, Tile::Empty | Tile::Start)
    }
}

/// Static tile layout of a `width` x `depth` grid
///
/// The text format lists rows north-most first, one symbol per cell:
///
/// ```text
/// ...A
/// .#.X
/// S..B
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct World {
    width: usize,
    depth: usize,
    tiles: Vec<Tile>,
}

impl World {
    /// An all-empty world
    ///
    /// **Panics** if either dimension is zero
    pub fn empty(width: usize, depth: usize) -> Self {
        assert!(width > 0 && depth > 0, "World dimensions must be non-zero.");
        Self {
            width,
            depth,
            tiles: vec![Tile::Empty; width * depth],
        }
    }

    /// Procedurally place goals and punishments on distinct empty cells around a start tile
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        depth: usize,
        start: Pos,
        n_a: usize,
        n_b: usize,
        n_punishments: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let mut world = Self::empty(width, depth);
        world.set(start, Tile::Start)?;

        let needed = n_a + n_b + n_punishments;
        let mut free = world
            .cells()
            .filter(|&(_, tile)| tile == Tile::Empty)
            .map(|(pos, _)| pos)
            .collect::<Vec<_>>();
        if free.len() < needed {
            return Err(Error::NotEnoughFreeCells {
                needed,
                available: free.len(),
            });
        }

        let (chosen, _) = free.partial_shuffle(rng, needed);
        let tiles = std::iter::repeat(Tile::Punishment)
            .take(n_punishments)
            .chain(std::iter::repeat(Tile::RewardA).take(n_a))
            .chain(std::iter::repeat(Tile::RewardB).take(n_b));
        for (&pos, tile) in chosen.iter().zip(tiles) {
            world.tiles[pos.z as usize * width + pos.x as usize] = tile;
        }

        Ok(world)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.z >= 0
            && (pos.x as usize) < self.width
            && (pos.z as usize) < self.depth;
        in_bounds.then(|| pos.z as usize * self.width + pos.x as usize)
    }

    /// The tile at `pos`, or `None` outside the grid
    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.index(pos).map(|ix| self.tiles[ix])
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) -> Result<()> {
        let ix = self.index(pos).ok_or(Error::OutOfBounds {
            x: pos.x,
            z: pos.z,
            width: self.width,
            depth: self.depth,
        })?;
        self.tiles[ix] = tile;
        Ok(())
    }

    /// Walls and everything outside the grid block movement alike
    pub fn is_blocked(&self, pos: Pos) -> bool {
        self.tile(pos).map_or(true, |tile| tile == Tile::Wall)
    }

    /// Every cell with its tile, row by row from the south
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(ix, &tile)| {
            let pos = Pos::new((ix % self.width) as i32, (ix / self.width) as i32);
            (pos, tile)
        })
    }

    pub fn start_tiles(&self) -> Vec<Pos> {
        self.cells()
            .filter(|&(_, tile)| tile == Tile::Start)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn open_cells(&self) -> Vec<Pos> {
        self.cells()
            .filter(|&(_, tile)| tile.is_open())
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}

impl FromStr for World {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(Error::EmptyWorld);
        }

        let depth = rows.len();
        let mut world = World::empty(width, depth);
        for (row, line) in rows.iter().enumerate() {
            let got = line.chars().count();
            if got != width {
                return Err(Error::RaggedRow {
                    row,
                    got,
                    expected: width,
                });
            }
            let z = depth - 1 - row;
            for (column, symbol) in line.chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(Error::UnknownTile {
                    symbol,
                    row,
                    column,
                })?;
                world.tiles[z * width + column] = tile;
            }
        }

        Ok(world)
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in (0..self.depth).rev() {
            let row = &self.tiles[z * self.width..(z + 1) * self.width];
            let line = row.iter().map(|tile| tile.symbol()).collect::<String>();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const MAP: &str = "
        ...A
        .#.X
        S..B
    ";

    #[test]
    fn parses_north_first() {
        let world: World = MAP.parse().unwrap();
        assert_eq!((world.width(), world.depth()), (4, 3));
        assert_eq!(world.tile(Pos::new(0, 0)), Some(Tile::Start));
        assert_eq!(world.tile(Pos::new(3, 2)), Some(Tile::RewardA));
        assert_eq!(world.tile(Pos::new(3, 0)), Some(Tile::RewardB));
        assert_eq!(world.tile(Pos::new(1, 1)), Some(Tile::Wall));
        assert_eq!(world.tile(Pos::new(4, 0)), None, "outside the grid");
        assert_eq!(world.to_string(), "...A\n.#.X\nS..B\n", "displays as parsed");
    }

    #[test]
    fn rejects_malformed_maps() {
        assert_eq!("".parse::<World>(), Err(Error::EmptyWorld));
        assert_eq!(
            "...\n..".parse::<World>(),
            Err(Error::RaggedRow {
                row: 1,
                got: 2,
                expected: 3
            })
        );
        assert!(matches!(
            "..?".parse::<World>(),
            Err(Error::UnknownTile { symbol: '?', .. })
        ));
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let world: World = MAP.parse().unwrap();
        assert!(world.is_blocked(Pos::new(-1, 0)));
        assert!(world.is_blocked(Pos::new(0, 3)));
        assert!(world.is_blocked(Pos::new(1, 1)), "wall");
        assert!(!world.is_blocked(Pos::new(3, 1)), "punishment is walkable");
    }

    #[test]
    fn set_checks_bounds() {
        let mut world = World::empty(2, 2);
        assert!(world.set(Pos::new(1, 1), Tile::Wall).is_ok());
        assert!(matches!(
            world.set(Pos::new(2, 0), Tile::Wall),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn random_world_places_every_tile() {
        let mut rng = StdRng::seed_from_u64(3);
        let world = World::random(6, 5, Pos::new(0, 0), 1, 2, 5, &mut rng).unwrap();
        assert_eq!(world.tile(Pos::new(0, 0)), Some(Tile::Start));
        assert_eq!(world.count(Tile::RewardA), 1);
        assert_eq!(world.count(Tile::RewardB), 2);
        assert_eq!(world.count(Tile::Punishment), 5);
        assert_eq!(world.count(Tile::Empty), 30 - 9);
    }

    #[test]
    fn random_world_needs_room() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            World::random(2, 2, Pos::new(0, 0), 2, 1, 1, &mut rng),
            Err(Error::NotEnoughFreeCells {
                needed: 4,
                available: 3
            })
        );
    }
}
