use crate::error::{Result, SimError};
use shared::{AgentId, CellOccupancy, Position, Topology};
use std::collections::BTreeSet;

/// Fixed-size 2D grid recording which agents stand on each cell
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    pub width: usize,
    pub height: usize,
    topology: Topology,
    /// cells[y][x] holds the ids standing at (x, y)
    cells: Vec<Vec<BTreeSet<AgentId>>>,
}

impl SpatialGrid {
    /// Create an empty grid with the given dimensions
    pub fn new(width: usize, height: usize, topology: Topology) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidArgument(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            topology,
            cells: vec![vec![BTreeSet::new(); width]; height],
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Check if position is valid
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn check(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(SimError::InvalidPosition {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// All in-bounds cells within Chebyshev `radius` of `pos`, in row-major order.
    ///
    /// On a toroidal grid offsets wrap, and cells reached twice (grids smaller
    /// than the neighborhood) are reported once. The center is reported only
    /// when `include_center` is set, even if wrapping lands back on it.
    pub fn neighborhood(
        &self,
        pos: Position,
        radius: usize,
        include_center: bool,
    ) -> Result<Vec<Position>> {
        self.check(pos)?;

        let mut cells = BTreeSet::new();
        match self.topology {
            Topology::Bounded => {
                let min_x = pos.x.saturating_sub(radius);
                let max_x = pos.x.saturating_add(radius).min(self.width - 1);
                let min_y = pos.y.saturating_sub(radius);
                let max_y = pos.y.saturating_add(radius).min(self.height - 1);

                for y in min_y..=max_y {
                    for x in min_x..=max_x {
                        cells.insert(Position::new(x, y));
                    }
                }
            }
            Topology::Toroidal => {
                // Beyond this reach every column/row is already covered
                let reach_x = radius.min(self.width / 2);
                let reach_y = radius.min(self.height / 2);

                for dy in 0..=2 * reach_y {
                    for dx in 0..=2 * reach_x {
                        let x = wrap(pos.x, dx, reach_x, self.width);
                        let y = wrap(pos.y, dy, reach_y, self.height);
                        cells.insert(Position::new(x, y));
                    }
                }
            }
        }

        if !include_center {
            cells.remove(&pos);
        }

        // BTreeSet orders by (x, y); report row-major instead
        let mut cells: Vec<Position> = cells.into_iter().collect();
        cells.sort_by_key(|p| (p.y, p.x));
        Ok(cells)
    }

    pub fn occupants(&self, pos: Position) -> Result<&BTreeSet<AgentId>> {
        self.check(pos)?;
        Ok(&self.cells[pos.y][pos.x])
    }

    pub fn place(&mut self, id: AgentId, pos: Position) -> Result<()> {
        self.check(pos)?;
        if !self.cells[pos.y][pos.x].insert(id) {
            return Err(SimError::inconsistent(format!(
                "agent {id} placed twice at {pos}"
            )));
        }
        Ok(())
    }

    /// Remove `id` from `pos`; the id must be there
    pub fn remove(&mut self, id: AgentId, pos: Position) -> Result<()> {
        self.check(pos)?;
        if !self.cells[pos.y][pos.x].remove(&id) {
            return Err(SimError::inconsistent(format!(
                "agent {id} is not at {pos}"
            )));
        }
        Ok(())
    }

    pub fn move_agent(&mut self, id: AgentId, from: Position, to: Position) -> Result<()> {
        // Validate the destination before touching anything
        self.check(to)?;
        self.remove(id, from)?;
        self.cells[to.y][to.x].insert(id);
        Ok(())
    }

    /// Every cell that holds at least one agent, in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &BTreeSet<AgentId>)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, ids)| !ids.is_empty())
                .map(move |(x, ids)| (Position::new(x, y), ids))
        })
    }

    pub fn len(&self) -> usize {
        self.occupied().map(|(_, ids)| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn occupancy(&self) -> Vec<CellOccupancy> {
        self.occupied()
            .map(|(position, ids)| CellOccupancy {
                position,
                agents: ids.iter().copied().collect(),
            })
            .collect()
    }
}

fn wrap(coord: usize, step: usize, reach: usize, size: usize) -> usize {
    (coord + size + step - reach) % size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(grid: &SpatialGrid, pos: Position) -> Vec<AgentId> {
        grid.occupants(pos).unwrap().iter().copied().collect()
    }

    #[test]
    fn test_grid_creation() {
        let grid = SpatialGrid::new(10, 7, Topology::Bounded).unwrap();
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 7);
        assert!(grid.is_empty());
        assert!(grid.contains(Position::new(9, 6)));
        assert!(!grid.contains(Position::new(10, 0)));
    }

    #[test]
    fn test_zero_sized_grid_rejected() {
        let err = SpatialGrid::new(0, 5, Topology::Bounded).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_neighborhood_interior() {
        let grid = SpatialGrid::new(5, 5, Topology::Bounded).unwrap();
        let cells = grid.neighborhood(Position::new(2, 2), 1, false).unwrap();
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&Position::new(2, 2)));
        assert!(cells.iter().all(|c| c.chebyshev(&Position::new(2, 2)) == 1));

        let with_center = grid.neighborhood(Position::new(2, 2), 1, true).unwrap();
        assert_eq!(with_center.len(), 9);
        assert!(with_center.contains(&Position::new(2, 2)));
    }

    #[test]
    fn test_neighborhood_clipped_at_corner() {
        let grid = SpatialGrid::new(5, 5, Topology::Bounded).unwrap();
        let cells = grid.neighborhood(Position::new(0, 0), 1, false).unwrap();
        assert_eq!(
            cells,
            vec![Position::new(1, 0), Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_neighborhood_radius_two() {
        let grid = SpatialGrid::new(10, 10, Topology::Bounded).unwrap();
        let cells = grid.neighborhood(Position::new(5, 5), 2, false).unwrap();
        assert_eq!(cells.len(), 24);
    }

    #[test]
    fn test_neighborhood_single_cell_grid_is_empty() {
        let grid = SpatialGrid::new(1, 1, Topology::Bounded).unwrap();
        assert!(grid.neighborhood(Position::new(0, 0), 1, false).unwrap().is_empty());

        let torus = SpatialGrid::new(1, 1, Topology::Toroidal).unwrap();
        assert!(torus.neighborhood(Position::new(0, 0), 1, false).unwrap().is_empty());
        assert_eq!(
            torus.neighborhood(Position::new(0, 0), 1, true).unwrap(),
            vec![Position::new(0, 0)]
        );
    }

    #[test]
    fn test_neighborhood_wraps_on_torus() {
        let grid = SpatialGrid::new(5, 5, Topology::Toroidal).unwrap();
        let cells = grid.neighborhood(Position::new(0, 0), 1, false).unwrap();
        assert_eq!(cells.len(), 8);
        assert!(cells.contains(&Position::new(4, 4)));
        assert!(cells.contains(&Position::new(4, 0)));
        assert!(cells.contains(&Position::new(0, 4)));
        assert!(cells
            .iter()
            .all(|c| c.chebyshev_wrapped(&Position::new(0, 0), 5, 5) == 1));
    }

    #[test]
    fn test_neighborhood_small_torus_has_no_duplicates() {
        let grid = SpatialGrid::new(2, 3, Topology::Toroidal).unwrap();
        let cells = grid.neighborhood(Position::new(0, 0), 1, false).unwrap();
        // Every other cell of the 2x3 torus, exactly once
        assert_eq!(cells.len(), 5);
        let unique: BTreeSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len());
        assert!(cells
            .iter()
            .all(|c| c.chebyshev_wrapped(&Position::new(0, 0), 2, 3) == 1));
    }

    #[test]
    fn test_neighborhood_out_of_bounds_center() {
        let grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        let err = grid.neighborhood(Position::new(3, 1), 1, false).unwrap_err();
        assert!(matches!(err, SimError::InvalidPosition { .. }));
    }

    #[test]
    fn test_place_and_remove() {
        let mut grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        let pos = Position::new(1, 1);
        grid.place(AgentId(1), pos).unwrap();
        grid.place(AgentId(2), pos).unwrap();
        assert_eq!(ids(&grid, pos), vec![AgentId(1), AgentId(2)]);
        assert_eq!(grid.len(), 2);

        grid.remove(AgentId(1), pos).unwrap();
        assert_eq!(ids(&grid, pos), vec![AgentId(2)]);
    }

    #[test]
    fn test_remove_absent_is_inconsistent() {
        let mut grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        grid.place(AgentId(1), Position::new(0, 0)).unwrap();
        let err = grid.remove(AgentId(1), Position::new(1, 1)).unwrap_err();
        assert!(err.is_fatal());
        let err = grid.remove(AgentId(9), Position::new(0, 0)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        let err = grid.place(AgentId(1), Position::new(0, 3)).unwrap_err();
        assert!(matches!(err, SimError::InvalidPosition { .. }));
    }

    #[test]
    fn test_move_agent() {
        let mut grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        grid.place(AgentId(4), Position::new(0, 0)).unwrap();
        grid.move_agent(AgentId(4), Position::new(0, 0), Position::new(2, 1))
            .unwrap();
        assert!(ids(&grid, Position::new(0, 0)).is_empty());
        assert_eq!(ids(&grid, Position::new(2, 1)), vec![AgentId(4)]);
    }

    #[test]
    fn test_move_agent_out_of_bounds_leaves_grid_untouched() {
        let mut grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        grid.place(AgentId(4), Position::new(0, 0)).unwrap();
        let err = grid
            .move_agent(AgentId(4), Position::new(0, 0), Position::new(5, 5))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidPosition { .. }));
        assert_eq!(ids(&grid, Position::new(0, 0)), vec![AgentId(4)]);
    }

    #[test]
    fn test_move_absent_agent_is_inconsistent() {
        let mut grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        let err = grid
            .move_agent(AgentId(4), Position::new(0, 0), Position::new(1, 1))
            .unwrap_err();
        assert!(matches!(err, SimError::InconsistentState(_)));
    }

    #[test]
    fn test_occupancy_row_major() {
        let mut grid = SpatialGrid::new(3, 3, Topology::Bounded).unwrap();
        grid.place(AgentId(0), Position::new(2, 0)).unwrap();
        grid.place(AgentId(1), Position::new(0, 2)).unwrap();
        grid.place(AgentId(2), Position::new(1, 0)).unwrap();

        let positions: Vec<_> = grid.occupancy().iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![Position::new(1, 0), Position::new(2, 0), Position::new(0, 2)]
        );
    }
}
