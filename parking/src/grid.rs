use crate::error::{GridError, Result};
use crate::find::{MapStorage, MapTrait, NodeReference};
use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Occupied,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn toggled(self) -> Self {
        match self {
            Cell::Empty => Cell::Occupied,
            Cell::Occupied => Cell::Empty,
        }
    }

    /// The 0/1 value used by the tabular grid formats
    pub fn value(&self) -> i64 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied => 1,
        }
    }
}

impl TryFrom<i64> for Cell {
    type Error = GridError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Occupied),
            v => Err(GridError::invalid_grid(format!(
                "Values should be 0 or 1, found {}",
                v
            ))),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Empty => ".",
                Cell::Occupied => "X",
            }
        )
    }
}

/// The four orthogonal moves, in the order the neighbors are produced
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// (row, col) offset of a single step in this direction
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Number of orthogonal steps between two points, ignoring obstacles
    pub fn manhattan(&self, other: &Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.manhattan(other) == 1
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A rectangular occupancy grid. Only constructible through validation, and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParkingGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
}

impl ParkingGrid {
    /// Validate a grid of raw 0/1 values
    pub fn new<R: AsRef<[i64]>>(values: &[R]) -> Result<Self> {
        let mut cells = Vec::with_capacity(values.len());
        for row in values {
            cells.push(
                row.as_ref()
                    .iter()
                    .map(|v| Cell::try_from(*v))
                    .collect::<Result<Vec<_>>>()?,
            );
        }
        Self::from_cells(cells)
    }

    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self> {
        let columns = match cells.first() {
            Some(row) => row.len(),
            None => return Err(GridError::invalid_grid("Grid has no rows")),
        };

        if cells.iter().any(|row| row.len() != columns) {
            return Err(GridError::invalid_grid("Rows have different lengths"));
        }
        if columns == 0 {
            return Err(GridError::invalid_grid("Grid has no columns"));
        }

        Ok(Self {
            rows: cells.len(),
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell(&self, node: Point) -> Option<Cell> {
        self.cells.get(node.row)?.get(node.col).copied()
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Signed bounds check, usable on unvalidated user input
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.rows as u64 && (col as u64) < self.columns as u64
    }

    /// Copy of the grid as raw 0/1 values
    pub fn to_values(&self) -> Vec<Vec<i64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Cell::value).collect())
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_empty()).count()
    }

    fn step(&self, node: Point, direction: Direction) -> Option<Point> {
        let (dr, dc) = direction.offset();
        let row = node.row as i64 + dr;
        let col = node.col as i64 + dc;

        if self.in_bounds(row, col) {
            Some(Point::new(row as usize, col as usize))
        } else {
            None
        }
    }
}

impl Display for ParkingGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A MapStorage over a rectangular grid, stored row-major in a single vec
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn get(&self, node: Self::Reference) -> T {
        self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.values.chunks(self.columns.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl MapTrait for ParkingGrid {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    fn is_free(&self, node: Self::Reference) -> bool {
        self.cells[node.row][node.col].is_empty()
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(node, direction))
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage {
            columns: self.columns,
            values: vec![Default::default(); self.rows * self.columns],
        }
    }
}
