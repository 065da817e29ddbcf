use std::error;
use std::fmt;

use itertools::Itertools;
use rand::{Rng, XorShiftRng};
use smallvec::SmallVec;

use crate::cells::{offset_coordinate, Cartesian2DCoordinate, CellState, CompassPrimary};
use crate::generators;
use crate::units::{Height, Width};

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeError {
    ZeroDimension,
    InvalidGridCoordinate,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeError::ZeroDimension => write!(f, "maze width and height must be non zero"),
            MazeError::InvalidGridCoordinate => write!(f, "coordinate is outside the maze grid"),
        }
    }
}

impl error::Error for MazeError {}

/// A rectangular grid of wall and space cells.
///
/// The cells are a flat row major vector - index `y * width + x` - sized and
/// filled once at construction time and mutated afterwards only through the
/// explicit `cell_mut` handle.
#[derive(Debug, Clone)]
pub struct Maze {
    cells: Vec<CellState>,
    width: Width,
    height: Height,
    wall_probability: f64,
}

impl Maze {
    /// Create a maze of the given size with every cell a space.
    ///
    /// The wall probability is recorded for use by the random fill pass.
    /// Zero sized dimensions are rejected up front rather than faulting on
    /// first access. Probabilities outside [0, 1] are accepted - every draw
    /// is in [0, 1) so they only bias the fill to all walls or all spaces.
    pub fn new(width: Width, height: Height, wall_probability: f64) -> Result<Maze, MazeError> {
        let (Width(w), Height(h)) = (width, height);
        if w == 0 || h == 0 {
            return Err(MazeError::ZeroDimension);
        }

        Ok(Maze {
            cells: vec![CellState::Space; w * h],
            width,
            height,
            wall_probability,
        })
    }

    /// Create a maze by random wall fill followed by the isolated wall clean up pass.
    ///
    /// One uniform draw is taken from the given generator per cell, so a fixed
    /// seed reproduces the exact same maze.
    pub fn generate(width: Width,
                    height: Height,
                    wall_probability: f64,
                    rng: &mut XorShiftRng)
                    -> Result<Maze, MazeError> {
        let mut maze = Maze::new(width, height, wall_probability)?;
        generators::random_fill(&mut maze, rng);
        generators::remove_isolated_walls(&mut maze);
        Ok(maze)
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn wall_probability(&self) -> f64 {
        self.wall_probability
    }

    /// The state of the cell at the given coordinate.
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Result<CellState, MazeError> {
        self.cell_index(coord)
            .map(|index| self.cells[index])
            .ok_or(MazeError::InvalidGridCoordinate)
    }

    /// Writable access to the cell at the given coordinate.
    ///
    /// Changes made through the reference are visible to all later queries.
    /// The maze itself never changes a cell after construction, so this is the
    /// only mutation path - e.g. for markers or carving by a consumer.
    pub fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> Result<&mut CellState, MazeError> {
        match self.cell_index(coord) {
            Some(index) => Ok(&mut self.cells[index]),
            None => Err(MazeError::InvalidGridCoordinate),
        }
    }

    /// Is the coordinate within the bounds of the grid?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        let (Width(w), Height(h)) = (self.width, self.height);
        (coord.x as usize) < w && (coord.y as usize) < h
    }

    /// Passable cells bordering the given coordinate.
    ///
    /// Candidates are generated east, south, west then north and filtered in
    /// place keeping that order: anything outside the grid or blocked by a
    /// wall is dropped, leaving 0 to 4 coordinates. The queried coordinate
    /// itself does not have to be within the grid.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        [CompassPrimary::East, CompassPrimary::South, CompassPrimary::West, CompassPrimary::North]
            .iter()
            .filter_map(|&dir| offset_coordinate(coord, dir))
            .filter(|&candidate| {
                self.cell(candidate)
                    .map(|state| state != CellState::Wall)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Any cell coordinate of the maze, chosen uniformly at random.
    pub fn random_cell(&self, rng: &mut XorShiftRng) -> Cartesian2DCoordinate {
        let index = rng.gen::<usize>() % self.size();
        self.coordinate_from_index(index)
    }

    pub fn iter(&self) -> CellIter {
        let (Width(w), Height(h)) = (self.width, self.height);
        CellIter {
            current_cell_number: 0,
            row_length: w,
            cells_count: w * h,
        }
    }

    pub fn iter_row(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Row,
            current_index: 0,
            width: self.width,
            height: self.height,
        }
    }

    pub fn iter_column(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Column,
            current_index: 0,
            width: self.width,
            height: self.height,
        }
    }

    fn cell_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            let Width(w) = self.width;
            Some(coord.y as usize * w + coord.x as usize)
        } else {
            None
        }
    }

    fn coordinate_from_index(&self, index: usize) -> Cartesian2DCoordinate {
        let Width(w) = self.width;
        Cartesian2DCoordinate::new((index % w) as u32, (index / w) as u32)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL: char = '#';
        const SPACE: char = '.';

        let rendered = self.iter_row()
            .map(|row| {
                row.into_iter()
                    .map(|coord| match self.cell(coord) {
                        Ok(CellState::Wall) => WALL,
                        _ => SPACE,
                    })
                    .collect::<String>()
            })
            .join("\n");
        writeln!(f, "{}", rendered)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_length: usize,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let x = self.current_cell_number % self.row_length;
            let y = self.current_cell_number / self.row_length;
            self.current_cell_number += 1;
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

// This form is useful if you have the Maze by value, otherwise `maze.iter()` reads better.
impl<'a> IntoIterator for &'a Maze {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    width: Width,
    height: Height,
}
impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let (Width(w), Height(h)) = (self.width, self.height);
        let (batches_count, batch_length) = if let BatchIterType::Row = self.iter_type {
            (h, w)
        } else {
            (w, h)
        };

        if self.current_index < batches_count {
            let coords = (0..batch_length)
                .map(|i| {
                    if let BatchIterType::Row = self.iter_type {
                        Cartesian2DCoordinate::new(i as u32, self.current_index as u32)
                    } else {
                        Cartesian2DCoordinate::new(self.current_index as u32, i as u32)
                    }
                })
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (Width(w), Height(h)) = (self.width, self.height);
        let batches_count = if let BatchIterType::Row = self.iter_type {
            h
        } else {
            w
        };
        let remaining = batches_count - self.current_index;
        (remaining, Some(remaining))
    }
}
