use std::{
    collections::VecDeque,
    fmt::{Debug, Display},
    ops::{Deref, DerefMut},
};

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{NeighborOrder, Passage, SearchConfig};

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference is inside the map
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Check if the provided node is an empty spot
    fn is_free(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the orthogonal neighbors of the provided node, occupied or not
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

#[derive(Clone, Copy, Debug)]
pub struct VisitedItem<R> {
    pub distance: usize,
    pub from: Option<R>,
}

#[derive(Clone, Copy, Debug)]
pub struct Visited<R>(Option<VisitedItem<R>>);

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<R> Deref for Visited<R> {
    type Target = Option<VisitedItem<R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<R> DerefMut for Visited<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl<R> Display for Visited<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(item) => write!(f, "{:03} ", item.distance),
            None => write!(f, "{:03} ", ""),
        }
    }
}

/// Decides which neighbors of a node get expanded, and in which order
#[derive(Debug, Clone)]
struct Expansion {
    passage: Passage,
    rng: Option<ChaCha8Rng>,
}

impl Expansion {
    fn new(config: &SearchConfig) -> Self {
        Self {
            passage: config.passage,
            rng: match config.neighbor_order {
                NeighborOrder::Fixed => None,
                NeighborOrder::Shuffled { seed } => Some(ChaCha8Rng::seed_from_u64(seed)),
            },
        }
    }

    fn neighbors<M: MapTrait>(
        &mut self,
        map: &M,
        start: M::Reference,
        node: M::Reference,
    ) -> Vec<M::Reference> {
        if self.passage == Passage::OpenCellsOnly && node != start && !map.is_free(node) {
            return Vec::new();
        }

        let mut neighbors: Vec<_> = map.neighbors_of(node).collect();
        if let Some(rng) = &mut self.rng {
            neighbors.shuffle(rng);
        }
        neighbors
    }
}

/// The objects that we store in the queue
#[derive(Debug, Clone, Copy)]
struct ToVisit<R> {
    distance: usize,
    point: R,
}

/// Mark the start as visited at distance 0 and return the initial queue
fn seed_search<R: NodeReference, S: MapStorage<Visited<R>, Reference = R>>(
    start: R,
    visited: &mut S,
) -> VecDeque<ToVisit<R>> {
    *visited.get_mut(start) = Visited(Some(VisitedItem {
        distance: 0,
        from: None,
    }));
    VecDeque::from([ToVisit {
        distance: 0,
        point: start,
    }])
}

/// Push every not yet visited neighbor of `visit`, marking it visited on discovery
fn enqueue_neighbors<R, S, M>(
    map: &M,
    expansion: &mut Expansion,
    start: R,
    visit: ToVisit<R>,
    visited: &mut S,
    visit_list: &mut VecDeque<ToVisit<R>>,
) where
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R>,
{
    for point in expansion.neighbors(map, start, visit.point) {
        if visited.get(point).is_none() {
            *visited.get_mut(point) = Visited(Some(VisitedItem {
                distance: visit.distance + 1,
                from: Some(visit.point),
            }));
            visit_list.push_back(ToVisit {
                distance: visit.distance + 1,
                point,
            });
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub struct SpotResult<R> {
    pub point: R,
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotFinderState<R> {
    Computing,
    NoSpotFound,
    SpotsFound(Vec<SpotResult<R>>),
}

impl<R> SpotFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, SpotFinderState::Computing)
    }

    /// The spots found so far, empty while computing or when nothing was found
    pub fn into_spots(self) -> Vec<SpotResult<R>> {
        match self {
            SpotFinderState::SpotsFound(spots) => spots,
            _ => Vec::new(),
        }
    }
}

/// Breadth-first search for every free node tied at the smallest distance from `start`.
///
/// Nodes are processed in non-decreasing distance order, so as soon as a node further away than
/// the first free one is dequeued the search is over.
#[derive(Debug)]
pub struct SpotFinder<
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
> {
    start: R,
    visited: S,
    visit_list: VecDeque<ToVisit<R>>,
    expansion: Expansion,
    found: Vec<SpotResult<R>>,
    state: SpotFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > SpotFinder<R, S, M>
{
    pub fn new(start: R, mut visited: S, config: &SearchConfig) -> Self {
        Self {
            start,
            visit_list: seed_search(start, &mut visited),
            visited,
            expansion: Expansion::new(config),
            found: Vec::new(),
            state: SpotFinderState::Computing,
            _map: std::marker::PhantomData,
        }
    }

    pub fn finish(mut self, map: &M) -> (SpotFinderState<R>, S) {
        loop {
            match self.step(map) {
                SpotFinderState::Computing => {}
                s => return (s, self.visited),
            }
        }
    }

    pub fn step(&mut self, map: &M) -> SpotFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let min_distance = self.found.first().map(|spot| spot.distance);

        match self.visit_list.pop_front() {
            // everything left in the queue is at least this far away
            Some(visit) if min_distance.is_some_and(|min| visit.distance > min) => {
                self.complete();
            }
            Some(visit) => {
                if map.is_free(visit.point) {
                    self.found.push(SpotResult {
                        point: visit.point,
                        distance: visit.distance,
                    });
                }

                // nothing beyond the current layer can improve on a spot that was already found
                if self.found.is_empty() {
                    enqueue_neighbors(
                        map,
                        &mut self.expansion,
                        self.start,
                        visit,
                        &mut self.visited,
                        &mut self.visit_list,
                    );
                }
            }
            None => self.complete(),
        }

        self.state.clone()
    }

    fn complete(&mut self) {
        self.state = if self.found.is_empty() {
            SpotFinderState::NoSpotFound
        } else {
            SpotFinderState::SpotsFound(std::mem::take(&mut self.found))
        };
    }

    pub fn state(&self) -> &SpotFinderState<R> {
        &self.state
    }

    pub fn get_visited(&self) -> &S {
        &self.visited
    }

    pub fn start(&self) -> R {
        self.start
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }

    /// The path from start to goal (both inclusive), or an empty path if there is none
    pub fn into_path(self) -> Vec<R> {
        match self {
            PathFinderState::PathFound(result) => result.path,
            _ => Vec::new(),
        }
    }
}

/// Breadth-first shortest path from `start` to `goal` with parent tracking
#[derive(Debug)]
pub struct RouteFinder<
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
> {
    start: R,
    goal: R,
    visited: S,
    visit_list: VecDeque<ToVisit<R>>,
    expansion: Expansion,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > RouteFinder<R, S, M>
{
    pub fn new(start: R, goal: R, mut visited: S, config: &SearchConfig) -> Self {
        Self {
            start,
            goal,
            visit_list: seed_search(start, &mut visited),
            visited,
            expansion: Expansion::new(config),
            state: PathFinderState::Computing,
            _map: std::marker::PhantomData,
        }
    }

    pub fn finish(mut self, map: &M) -> (PathFinderState<R>, S) {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return (s, self.visited),
            }
        }
    }

    pub fn step(&mut self, map: &M) -> PathFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        match self.visit_list.pop_front() {
            Some(visit) if visit.point == self.goal => {
                self.state = PathFinderState::PathFound(PathResult {
                    path: self.backtrack(),
                    start: self.start,
                    goal: self.goal,
                    total_distance: visit.distance,
                });
            }
            Some(visit) => {
                enqueue_neighbors(
                    map,
                    &mut self.expansion,
                    self.start,
                    visit,
                    &mut self.visited,
                    &mut self.visit_list,
                );
            }
            None => self.state = PathFinderState::NoPathFound,
        }

        self.state.clone()
    }

    /// Follow the parent links from the goal back to the start
    fn backtrack(&self) -> Vec<R> {
        let mut path = vec![self.goal];
        let mut current = self.goal;

        while let Some(VisitedItem {
            from: Some(from), ..
        }) = *self.visited.get(current)
        {
            path.push(from);
            current = from;
        }

        path.reverse();
        path
    }

    pub fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    pub fn get_visited(&self) -> &S {
        &self.visited
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }
}
