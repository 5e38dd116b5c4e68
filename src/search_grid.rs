use crate::error::GridError;
use crate::DEFAULT_PIXEL_SIZE;
use core::fmt;
use core::str::FromStr;
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;

/// Offsets in (row, col) for the 4-neighbourhood in the order neighbours are reported:
/// down, up, right, left.
const NEUMANN_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// The durable classification of a cell, managed by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
}

impl Role {
    fn symbol(self) -> Option<char> {
        match self {
            Role::Empty => None,
            Role::Barrier => Some('#'),
            Role::Start => Some('S'),
            Role::End => Some('E'),
        }
    }
}

/// Per-run search bookkeeping of a cell. Only meaningful while a strategy is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Marker {
    #[default]
    Unvisited,
    Frontier,
    Expanded,
    OnPath,
}

impl Marker {
    fn symbol(self) -> char {
        match self {
            Marker::Unvisited => '.',
            Marker::Frontier => 'o',
            Marker::Expanded => 'x',
            Marker::OnPath => '*',
        }
    }
}

/// [SearchGrid] is a square matrix of cells addressed by [Point]s whose `x` is the row and `y`
/// the column. Roles and transient markers live in separate arrays so a run can wipe its
/// markers without touching the host's layout. Adjacency is cached per cell and must be
/// refreshed with [refresh_adjacency](Self::refresh_adjacency) after barrier edits.
/// Connected components are kept in a [UnionFind] like the adjacency, but are regenerated
/// lazily through [update](Self::update).
#[derive(Clone, Debug)]
pub struct SearchGrid {
    size: usize,
    cell_width: usize,
    roles: Vec<Role>,
    markers: Vec<Marker>,
    adjacency: Vec<Vec<Point>>,
    adjacency_stale: bool,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl SearchGrid {
    /// Allocates a `rows`×`rows` grid of empty cells drawn `pixel_size` pixels wide.
    pub fn new(rows: usize, pixel_size: usize) -> Result<SearchGrid, GridError> {
        if rows == 0 {
            return Err(GridError::EmptyGrid);
        }
        let n = rows * rows;
        let mut grid = SearchGrid {
            size: rows,
            cell_width: pixel_size / rows,
            roles: vec![Role::Empty; n],
            markers: vec![Marker::Unvisited; n],
            adjacency: vec![Vec::new(); n],
            adjacency_stale: true,
            components: UnionFind::new(n),
            components_dirty: false,
        };
        grid.refresh_adjacency();
        grid.generate_components();
        Ok(grid)
    }

    /// Number of rows, which is also the number of columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Edge length of a cell in pixels.
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    pub(crate) fn index(&self, pos: Point) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.x as usize * self.size + pos.y as usize)
        } else {
            None
        }
    }

    fn point(&self, ix: usize) -> Point {
        Point::new((ix / self.size) as i32, (ix % self.size) as i32)
    }

    /// All cells in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.roles.len()).map(move |ix| self.point(ix))
    }

    pub fn role(&self, pos: Point) -> Option<Role> {
        self.index(pos).map(|ix| self.roles[ix])
    }

    pub fn marker(&self, pos: Point) -> Option<Marker> {
        self.index(pos).map(|ix| self.markers[ix])
    }

    pub fn is_barrier(&self, pos: Point) -> bool {
        self.role(pos) == Some(Role::Barrier)
    }

    /// Overwrites the role of a cell. Does not check that only one start or end exists.
    /// Placing a barrier flags the components as dirty, clearing one joins the neighbouring
    /// components right away. Either way the adjacency is stale until refreshed.
    pub fn set_role(&mut self, pos: Point, role: Role) -> Result<(), GridError> {
        let ix = self.index(pos).ok_or(GridError::OutOfBounds {
            pos,
            size: self.size,
        })?;
        let was_barrier = self.roles[ix] == Role::Barrier;
        let blocked = role == Role::Barrier;
        self.roles[ix] = role;
        if was_barrier != blocked {
            self.adjacency_stale = true;
            if blocked {
                self.components_dirty = true;
            } else {
                let joined = self
                    .open_neighbours(pos)
                    .filter_map(|n| self.index(n))
                    .collect::<Vec<_>>();
                for n_ix in joined {
                    self.components.union(ix, n_ix);
                }
            }
        }
        Ok(())
    }

    /// Sets every role back to [Role::Empty].
    pub fn reset(&mut self) {
        self.roles.iter_mut().for_each(|r| *r = Role::Empty);
        self.reset_markers();
        self.refresh_adjacency();
        self.generate_components();
    }

    /// First cell in row-major order carrying `role`.
    pub fn find_role(&self, role: Role) -> Option<Point> {
        self.roles
            .iter()
            .position(|r| *r == role)
            .map(|ix| self.point(ix))
    }

    pub(crate) fn set_marker(&mut self, pos: Point, marker: Marker) {
        if let Some(ix) = self.index(pos) {
            self.markers[ix] = marker;
        }
    }

    /// Wipes all transient markers back to [Marker::Unvisited].
    pub fn reset_markers(&mut self) {
        self.markers.iter_mut().for_each(|m| *m = Marker::Unvisited);
    }

    /// A copy sharing the roles and adjacency of this grid, with clean markers.
    pub fn fresh_copy(&self) -> SearchGrid {
        let mut copy = self.clone();
        copy.reset_markers();
        copy
    }

    fn open_neighbours(&self, pos: Point) -> impl Iterator<Item = Point> + '_ {
        NEUMANN_OFFSETS
            .iter()
            .map(move |(dr, dc)| Point::new(pos.x + dr, pos.y + dc))
            .filter(move |p| self.in_bounds(*p) && !self.is_barrier(*p))
    }

    /// Recomputes the neighbour list of every cell from the current roles.
    pub fn refresh_adjacency(&mut self) {
        let adjacency = (0..self.roles.len())
            .map(|ix| self.open_neighbours(self.point(ix)).collect::<Vec<_>>())
            .collect();
        self.adjacency = adjacency;
        self.adjacency_stale = false;
    }

    /// True when roles changed since the last [refresh_adjacency](Self::refresh_adjacency).
    pub fn adjacency_stale(&self) -> bool {
        self.adjacency_stale
    }

    /// The cached neighbours of `pos`, empty when out of bounds.
    pub fn neighbours(&self, pos: Point) -> &[Point] {
        match self.index(pos) {
            Some(ix) => &self.adjacency[ix],
            None => &[],
        }
    }

    /// Maps a pixel position to the cell under it. The first coordinate selects the row.
    pub fn cell_at_pixel(&self, px: (usize, usize)) -> Option<Point> {
        if self.cell_width == 0 {
            return None;
        }
        let pos = Point::new(
            (px.0 / self.cell_width) as i32,
            (px.1 / self.cell_width) as i32,
        );
        self.in_bounds(pos).then_some(pos)
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.index(*start), self.index(*goal)) {
            (Some(s), Some(g)) => self.components.equiv(s, g),
            _ => false,
        }
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open cells with their open
    /// neighbour below and to the right.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.roles.len());
        self.components_dirty = false;
        for ix in 0..self.roles.len() {
            if self.roles[ix] == Role::Barrier {
                continue;
            }
            let p = self.point(ix);
            for n in [Point::new(p.x + 1, p.y), Point::new(p.x, p.y + 1)] {
                if let Some(n_ix) = self.index(n) {
                    if self.roles[n_ix] != Role::Barrier {
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }

    /// Builds a grid from the ASCII form printed by [Display]: `S` start, `E` end, `#` barrier,
    /// `.` empty. Adjacency and components are ready on return.
    pub fn parse_ascii(map: &str, pixel_size: usize) -> Result<SearchGrid, GridError> {
        let lines = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let mut grid = SearchGrid::new(lines.len(), pixel_size)?;
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != grid.size {
                return Err(GridError::Parse {
                    line: row + 1,
                    reason: format!("expected {} cells, found {}", grid.size, width),
                });
            }
            for (col, c) in line.chars().enumerate() {
                let role = match c {
                    '.' => Role::Empty,
                    '#' => Role::Barrier,
                    'S' => Role::Start,
                    'E' => Role::End,
                    other => {
                        return Err(GridError::Parse {
                            line: row + 1,
                            reason: format!("unknown cell '{}'", other),
                        })
                    }
                };
                grid.set_role(Point::new(row as i32, col as i32), role)?;
            }
        }
        grid.refresh_adjacency();
        grid.generate_components();
        Ok(grid)
    }
}

impl FromStr for SearchGrid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchGrid::parse_ascii(s, DEFAULT_PIXEL_SIZE)
    }
}

impl fmt::Display for SearchGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.size {
            let line = (0..self.size)
                .map(|col| {
                    let ix = row * self.size + col;
                    self.roles[ix]
                        .symbol()
                        .unwrap_or_else(|| self.markers[ix].symbol())
                })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
