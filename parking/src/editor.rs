//! Mutable grid buffer behind the interactive editor.
//!
//! The editor is the only place where cells change. Queries always run on an immutable
//! [`ParkingSpotFinder`] taken with [`GridEditor::snapshot`].

use anyhow::{bail, ensure};
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{Cell, ParkingGrid, ParkingSpotFinder, Point, SearchConfig};

pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 100;
pub const DEFAULT_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct GridEditor {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
    start: Option<Point>,
    config: SearchConfig,
}

impl Default for GridEditor {
    fn default() -> Self {
        Self {
            rows: DEFAULT_SIZE,
            columns: DEFAULT_SIZE,
            cells: vec![vec![Cell::Empty; DEFAULT_SIZE]; DEFAULT_SIZE],
            start: None,
            config: SearchConfig::default(),
        }
    }
}

fn check_size(rows: usize, columns: usize) -> Result<(), anyhow::Error> {
    ensure!(
        (MIN_SIZE..=MAX_SIZE).contains(&rows) && (MIN_SIZE..=MAX_SIZE).contains(&columns),
        "grid size {}x{} is outside of {}..={}",
        rows,
        columns,
        MIN_SIZE,
        MAX_SIZE
    );
    Ok(())
}

impl GridEditor {
    /// An all empty grid
    pub fn new(rows: usize, columns: usize) -> Result<Self, anyhow::Error> {
        check_size(rows, columns)?;

        Ok(Self {
            rows,
            columns,
            cells: vec![vec![Cell::Empty; columns]; rows],
            ..Default::default()
        })
    }

    /// Replace the buffer with a loaded grid. Loaded grids are not bound by the editor size limits.
    pub fn load_grid(&mut self, grid: &ParkingGrid) {
        self.rows = grid.rows();
        self.columns = grid.columns();
        self.cells = grid.cells().to_vec();
        self.start = None;
        debug!("editor loaded {}x{} grid", self.rows, self.columns);
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.cells.get(point.row)?.get(point.col).copied()
    }

    fn check_point(&self, point: Point) -> Result<(), anyhow::Error> {
        ensure!(
            point.row < self.rows && point.col < self.columns,
            "position {} is outside of the {}x{} grid",
            point,
            self.rows,
            self.columns
        );
        Ok(())
    }

    /// Change the dimensions. The resized grid starts out all empty with no start point.
    pub fn resize(&mut self, rows: usize, columns: usize) -> Result<(), anyhow::Error> {
        check_size(rows, columns)?;

        self.rows = rows;
        self.columns = columns;
        self.clear();

        debug!("editor resized to {}x{}", rows, columns);
        Ok(())
    }

    /// Flip a cell between empty and occupied. The start cell cannot be modified.
    pub fn toggle(&mut self, point: Point) -> Result<Cell, anyhow::Error> {
        self.check_point(point)?;
        if self.start == Some(point) {
            bail!("cannot modify the start point {}", point);
        }

        let cell = &mut self.cells[point.row][point.col];
        *cell = cell.toggled();
        Ok(*cell)
    }

    pub fn set_cell(&mut self, point: Point, cell: Cell) -> Result<(), anyhow::Error> {
        self.check_point(point)?;
        self.cells[point.row][point.col] = cell;
        Ok(())
    }

    pub fn set_start(&mut self, point: Point) -> Result<(), anyhow::Error> {
        self.check_point(point)?;
        self.start = Some(point);
        Ok(())
    }

    /// Empty every cell and forget the start
    pub fn clear(&mut self) {
        self.cells = vec![vec![Cell::Empty; self.columns]; self.rows];
        self.start = None;
    }

    /// Occupy exactly `rows * columns * percent / 100` (rounded down) distinct cells chosen at
    /// random, empty all others and forget the start.
    pub fn randomize(&mut self, percent: f64, seed: u64) -> Result<usize, anyhow::Error> {
        ensure!(
            (0.0..=100.0).contains(&percent),
            "occupancy rate must be between 0 and 100, got {}",
            percent
        );

        let total = self.rows * self.columns;
        let occupied = ((total as f64) * percent / 100.0).floor() as usize;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        self.clear();
        for index in rand::seq::index::sample(&mut rng, total, occupied) {
            self.cells[index / self.columns][index % self.columns] = Cell::Occupied;
        }

        debug!(
            "randomized {}x{} grid: {} of {} cells occupied",
            self.rows, self.columns, occupied, total
        );
        Ok(occupied)
    }

    /// Freeze the current buffer into a query engine
    pub fn snapshot(&self) -> Result<ParkingSpotFinder, anyhow::Error> {
        let grid = ParkingGrid::from_cells(self.cells.clone())?;
        Ok(ParkingSpotFinder::from_grid(grid).with_config(self.config))
    }
}
