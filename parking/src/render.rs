//! Text rendering of query results on top of a grid.
//!
//! `X` occupied, `.` empty, `S` start, `*` nearest spot, `o` route cell.

use std::fmt::Display;

use crate::{ParkingGrid, Point, SpotResult};

pub struct Overlay<'a> {
    grid: &'a ParkingGrid,
    start: Option<Point>,
    spots: &'a [SpotResult<Point>],
    route: &'a [Point],
}

impl<'a> Overlay<'a> {
    pub fn new(grid: &'a ParkingGrid) -> Self {
        Self {
            grid,
            start: None,
            spots: &[],
            route: &[],
        }
    }

    pub fn with_start(mut self, start: Point) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_spots(mut self, spots: &'a [SpotResult<Point>]) -> Self {
        self.spots = spots;
        self
    }

    pub fn with_route(mut self, route: &'a [Point]) -> Self {
        self.route = route;
        self
    }

    fn symbol(&self, point: Point) -> char {
        // start over spots over route over the cell itself
        if self.start == Some(point) {
            'S'
        } else if self.spots.iter().any(|s| s.point == point) {
            '*'
        } else if self.route.contains(&point) {
            'o'
        } else {
            match self.grid.cell(point) {
                Some(cell) if cell.is_empty() => '.',
                _ => 'X',
            }
        }
    }
}

impl Display for Overlay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.columns() {
                write!(f, "{}", self.symbol(Point::new(row, col)))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// One line per spot, the way the spot list is reported to the user
pub fn spot_lines(spots: &[SpotResult<Point>]) -> String {
    spots
        .iter()
        .map(|s| format!("Spot: {}, Distance: {}\n", s.point, s.distance))
        .collect()
}
