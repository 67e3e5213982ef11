pub mod config;
pub mod editor;
pub mod error;
pub mod find;
pub mod grid;
pub mod render;
pub mod util;

pub use config::{NeighborOrder, Passage, SearchConfig};
pub use error::{GridError, Result};
pub use find::{MapStorage, MapTrait, PathFinderState, SpotFinderState, SpotResult, Visited};
pub use grid::{Cell, CellStorage, ParkingGrid, Point};

/// Spot search over a [`ParkingGrid`], steppable one cell at a time
pub type GridSpotFinder = find::SpotFinder<Point, CellStorage<Visited<Point>>, ParkingGrid>;

/// Route search over a [`ParkingGrid`], steppable one cell at a time
pub type GridRouteFinder = find::RouteFinder<Point, CellStorage<Visited<Point>>, ParkingGrid>;

/// Query engine over an immutable occupancy grid.
///
/// Each query allocates its own search state, so a single engine can be shared between callers.
#[derive(Debug, Clone)]
pub struct ParkingSpotFinder {
    grid: ParkingGrid,
    config: SearchConfig,
}

impl ParkingSpotFinder {
    /// Build an engine from raw 0/1 rows.
    ///
    /// Fails with [`GridError::InvalidGrid`] if the rows have different lengths, the grid is empty,
    /// or a value is neither 0 (empty) nor 1 (occupied).
    pub fn new<R: AsRef<[i64]>>(values: &[R]) -> Result<Self> {
        Ok(Self::from_grid(ParkingGrid::new(values)?))
    }

    pub fn from_grid(grid: ParkingGrid) -> Self {
        Self {
            grid,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn grid(&self) -> &ParkingGrid {
        &self.grid
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        self.grid.in_bounds(row, col)
    }

    /// Turn (possibly negative) user input into a point inside the grid
    pub fn point(&self, row: i64, col: i64) -> Result<Point> {
        if self.in_bounds(row, col) {
            Ok(Point::new(row as usize, col as usize))
        } else {
            Err(self.invalid_position(row, col))
        }
    }

    /// All empty cells tied at the smallest distance from `start`, in discovery order.
    ///
    /// The start itself counts at distance 0 when it is empty. Returns an empty list when no
    /// empty cell can be reached.
    pub fn nearest_empty_cells(&self, start: Point) -> Result<Vec<SpotResult<Point>>> {
        let (state, _) = self.spot_finder(start)?.finish(&self.grid);
        Ok(state.into_spots())
    }

    /// A shortest route from `start` to `target`, both inclusive, or an empty route if the target
    /// cannot be reached.
    ///
    /// With the default [`Passage::Unrestricted`] the route may cross occupied cells.
    pub fn route_to(&self, start: Point, target: Point) -> Result<Vec<Point>> {
        let (state, _) = self.route_finder(start, target)?.finish(&self.grid);
        Ok(state.into_path())
    }

    pub fn spot_finder(&self, start: Point) -> Result<GridSpotFinder> {
        self.check(start)?;
        Ok(GridSpotFinder::new(
            start,
            self.grid.create_storage(),
            &self.config,
        ))
    }

    pub fn route_finder(&self, start: Point, target: Point) -> Result<GridRouteFinder> {
        self.check(start)?;
        self.check(target)?;
        Ok(GridRouteFinder::new(
            start,
            target,
            self.grid.create_storage(),
            &self.config,
        ))
    }

    fn check(&self, point: Point) -> Result<()> {
        if self.grid.is_valid(point) {
            Ok(())
        } else {
            Err(self.invalid_position(
                i64::try_from(point.row).unwrap_or(i64::MAX),
                i64::try_from(point.col).unwrap_or(i64::MAX),
            ))
        }
    }

    fn invalid_position(&self, row: i64, col: i64) -> GridError {
        GridError::InvalidPosition {
            row,
            col,
            rows: self.rows(),
            cols: self.columns(),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn p(row: usize, col: usize) -> Point {
        Point::new(row, col)
    }

    fn sorted(spots: Vec<SpotResult<Point>>) -> Vec<(usize, usize, usize)> {
        let mut spots: Vec<_> = spots
            .into_iter()
            .map(|s| (s.point.row, s.point.col, s.distance))
            .collect();
        spots.sort();
        spots
    }

    #[test]
    fn test_occupied_start_finds_four_neighbors() {
        let finder = ParkingSpotFinder::new(&[[0, 0, 0], [0, 1, 0], [0, 0, 0]]).unwrap();

        let spots = finder.nearest_empty_cells(p(1, 1)).unwrap();
        assert_eq!(
            sorted(spots),
            vec![(0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 1, 1)]
        );
    }

    #[test]
    fn test_route_ignores_occupancy() {
        let finder = ParkingSpotFinder::new(&[[0, 1], [1, 0]]).unwrap();

        let route = finder.route_to(p(0, 0), p(1, 1)).unwrap();
        assert!(
            route == vec![p(0, 0), p(0, 1), p(1, 1)] || route == vec![p(0, 0), p(1, 0), p(1, 1)],
            "unexpected route {:?}",
            route
        );
    }

    #[test]
    fn test_route_blocked_when_open_cells_only() {
        let finder = ParkingSpotFinder::new(&[[0, 1], [1, 0]])
            .unwrap()
            .with_config(SearchConfig::default().with_passage(Passage::OpenCellsOnly));

        assert!(finder.route_to(p(0, 0), p(1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_route_to_self() {
        let finder = ParkingSpotFinder::new(&[[1, 1, 1]]).unwrap();
        assert_eq!(finder.route_to(p(0, 2), p(0, 2)).unwrap(), vec![p(0, 2)]);
    }

    #[test]
    fn test_empty_start_is_its_own_nearest_spot() {
        let finder = ParkingSpotFinder::new(&[[0, 0], [0, 0]]).unwrap();
        assert_eq!(
            finder.nearest_empty_cells(p(1, 0)).unwrap(),
            vec![SpotResult {
                point: p(1, 0),
                distance: 0
            }]
        );
    }

    #[test]
    fn test_all_occupied_has_no_spots() {
        let finder = ParkingSpotFinder::new(&[[1, 1, 1], [1, 1, 1]]).unwrap();
        assert!(finder.nearest_empty_cells(p(0, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_grid() {
        assert!(matches!(
            ParkingSpotFinder::new(&[vec![0, 1], vec![0]]),
            Err(GridError::InvalidGrid { .. })
        ));
        assert!(matches!(
            ParkingSpotFinder::new(&[[0, 3]]),
            Err(GridError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_invalid_position() {
        let finder = ParkingSpotFinder::new(&[[0, 0, 0], [0, 0, 0]]).unwrap();

        for (row, col) in [(-1, 0), (0, -1), (2, 0), (0, 3), (i64::MIN, i64::MAX)] {
            assert!(!finder.in_bounds(row, col));
            assert!(matches!(
                finder.point(row, col),
                Err(GridError::InvalidPosition { .. })
            ));
        }

        assert_eq!(
            finder.nearest_empty_cells(p(2, 0)),
            Err(GridError::InvalidPosition {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            })
        );
        assert!(finder.route_to(p(0, 0), p(0, 3)).is_err());
        assert!(finder.route_to(p(5, 0), p(0, 0)).is_err());

        // the engine stays usable after a rejected query
        assert_eq!(finder.point(1, 2).unwrap(), p(1, 2));
        assert_eq!(finder.route_to(p(0, 0), p(1, 2)).unwrap().len(), 4);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParkingSpotFinder>();
    }

    #[test]
    fn test_stepping_through_engine() {
        let finder = ParkingSpotFinder::new(&[[1, 1, 0]]).unwrap();
        let mut spots = finder.spot_finder(p(0, 0)).unwrap();

        let mut steps = 0;
        while !spots.step(finder.grid()).is_done() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(
            spots.state().clone().into_spots(),
            vec![SpotResult {
                point: p(0, 2),
                distance: 2
            }]
        );
    }
}
