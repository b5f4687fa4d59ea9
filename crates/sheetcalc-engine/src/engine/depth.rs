//! Dependency depth: the length of the longest reference chain starting at
//! each cell.

use std::fmt;

use super::cycle::walk_grid;
use super::{CellRef, Grid};

/// Depth of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Depth {
    Level(usize),
    /// The cell is part of a reference cycle.
    Cycle,
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Level(n) => write!(f, "{}", n),
            Depth::Cycle => write!(f, "*"),
        }
    }
}

/// Depth of every cell of a grid, indexed by column then row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthMap {
    columns: Vec<Vec<Depth>>,
}

impl DepthMap {
    pub fn get(&self, cell_ref: &CellRef) -> Option<Depth> {
        self.columns.get(cell_ref.col)?.get(cell_ref.row).copied()
    }

    /// The deepest non-cycle chain in the grid.
    pub fn max_level(&self) -> usize {
        self.columns
            .iter()
            .flatten()
            .filter_map(|d| match d {
                Depth::Level(n) => Some(*n),
                Depth::Cycle => None,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Compute the depth of every cell.
///
/// Non-formula cells have depth 0. A formula has depth
/// `1 + max(depth of each valid reference)`, or 0 when it has none; a
/// reference is valid when it is in bounds and its target is not on a cycle.
/// Cells on a cycle get [`Depth::Cycle`].
pub fn depth_map(grid: &Grid) -> DepthMap {
    let mut depths: Vec<Option<Depth>> = vec![None; grid.len()];

    walk_grid(grid, |group| {
        for &member in &group.members {
            let depth = if group.cyclic {
                Depth::Cycle
            } else {
                let deepest = grid
                    .references(member)
                    .into_iter()
                    .filter_map(|r| match depths[r] {
                        Some(Depth::Level(n)) => Some(n),
                        _ => None,
                    })
                    .max();
                match deepest {
                    Some(n) => Depth::Level(n + 1),
                    None => Depth::Level(0),
                }
            };
            depths[member] = Some(depth);
        }
    });

    let height = grid.height();
    let mut columns = Vec::with_capacity(grid.width());
    for col in 0..grid.width() {
        columns.push(
            depths[col * height..(col + 1) * height]
                .iter()
                .map(|d| d.unwrap_or(Depth::Cycle))
                .collect(),
        );
    }
    DepthMap { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid_with(cells: &[(&str, &str)]) -> Grid {
        let mut grid = Grid::new(6, 6);
        for (name, input) in cells {
            assert!(grid.set(&CellRef::from_str(name).unwrap(), input));
        }
        grid
    }

    fn depth(map: &DepthMap, name: &str) -> Depth {
        map.get(&CellRef::from_str(name).unwrap()).unwrap()
    }

    #[test]
    fn test_non_formula_cells_are_zero() {
        let grid = grid_with(&[("A0", "5"), ("B0", "text")]);
        let map = depth_map(&grid);
        assert_eq!(depth(&map, "A0"), Depth::Level(0));
        assert_eq!(depth(&map, "B0"), Depth::Level(0));
        assert_eq!(depth(&map, "F5"), Depth::Level(0));
    }

    #[test]
    fn test_formula_over_values_is_one() {
        let grid = grid_with(&[("A0", "1"), ("A1", "2"), ("B0", "=A0+A1")]);
        assert_eq!(depth(&depth_map(&grid), "B0"), Depth::Level(1));
    }

    #[test]
    fn test_formula_without_references_is_zero() {
        let grid = grid_with(&[("A0", "=1+2"), ("A1", "=Z9"), ("A2", "=1+")]);
        let map = depth_map(&grid);
        assert_eq!(depth(&map, "A0"), Depth::Level(0));
        assert_eq!(depth(&map, "A1"), Depth::Level(0));
        assert_eq!(depth(&map, "A2"), Depth::Level(0));
    }

    #[test]
    fn test_three_level_chain() {
        let grid = grid_with(&[("A0", "=A1"), ("A1", "=A2*2"), ("A2", "=A3+1"), ("A3", "4")]);
        let map = depth_map(&grid);
        assert_eq!(depth(&map, "A0"), Depth::Level(3));
        assert_eq!(depth(&map, "A1"), Depth::Level(2));
        assert_eq!(depth(&map, "A2"), Depth::Level(1));
        assert_eq!(map.max_level(), 3);
    }

    #[test]
    fn test_longest_branch_wins() {
        let grid = grid_with(&[("A0", "=B0+C0"), ("B0", "1"), ("C0", "=D0"), ("D0", "=E0"), ("E0", "2")]);
        assert_eq!(depth(&depth_map(&grid), "A0"), Depth::Level(3));
    }

    #[test]
    fn test_cycle_members_marked() {
        let grid = grid_with(&[("A0", "=A1"), ("A1", "=A0"), ("B0", "=A0+C0"), ("C0", "=D0")]);
        let map = depth_map(&grid);
        assert_eq!(depth(&map, "A0"), Depth::Cycle);
        assert_eq!(depth(&map, "A1"), Depth::Cycle);
        // B0 only counts its valid branch through C0.
        assert_eq!(depth(&map, "B0"), Depth::Level(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Depth::Level(2).to_string(), "2");
        assert_eq!(Depth::Cycle.to_string(), "*");
    }
}
