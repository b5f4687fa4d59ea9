//! Reference graph traversal and circular dependency detection.
//!
//! Both formula evaluation and dependency depth walk the reference graph the
//! same way, so they always agree on which cells are part of a cycle. The walk
//! is an iterative depth-first search with three colours:
//!
//! - white: not visited yet
//! - gray: on the traversal stack, its group not finished yet
//! - black: finished; results for it are final and are never recomputed
//!
//! Meeting a gray cell closes a cycle: every cell on the stack from that cell
//! up to the current one belongs to the same group. Groups are handed out
//! dependencies-first, so when a group is visited everything it references
//! outside itself is already black.

use super::{CellRef, Grid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// A finished group of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    /// Storage indices of the cells in the group.
    pub members: Vec<usize>,
    /// True when the members reference each other in a loop.
    pub cyclic: bool,
}

struct Frame {
    node: usize,
    refs: Vec<usize>,
    next: usize,
}

/// Traversal state over one grid, shared across roots so finished cells are
/// visited once.
pub struct ReferenceWalk<'a> {
    grid: &'a Grid,
    color: Vec<Color>,
    order: Vec<usize>,
    low: Vec<usize>,
    counter: usize,
    pending: Vec<usize>,
}

impl<'a> ReferenceWalk<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        ReferenceWalk {
            grid,
            color: vec![Color::White; grid.len()],
            order: vec![0; grid.len()],
            low: vec![0; grid.len()],
            counter: 0,
            pending: Vec::new(),
        }
    }

    /// Visit every unfinished cell reachable from `root`, calling `finish`
    /// once per group with all of the group's outside references finished.
    pub fn visit<F>(&mut self, root: usize, mut finish: F)
    where
        F: FnMut(&Group),
    {
        if self.color[root] != Color::White {
            return;
        }

        let mut stack = vec![self.enter(root)];

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.refs.len() {
                let node = frame.node;
                let target = frame.refs[frame.next];
                frame.next += 1;

                match self.color[target] {
                    Color::White => {
                        let entered = self.enter(target);
                        stack.push(entered);
                    }
                    Color::Gray => {
                        self.low[node] = self.low[node].min(self.order[target]);
                    }
                    Color::Black => {}
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let node = done.node;
            if let Some(parent) = stack.last() {
                self.low[parent.node] = self.low[parent.node].min(self.low[node]);
            }

            if self.low[node] == self.order[node] {
                let group = self.close_group(node, &done.refs);
                if group.cyclic {
                    log::debug!(
                        "circular reference among {}",
                        describe(self.grid, &group.members)
                    );
                }
                finish(&group);
            }
        }
    }

    fn enter(&mut self, node: usize) -> Frame {
        self.color[node] = Color::Gray;
        self.order[node] = self.counter;
        self.low[node] = self.counter;
        self.counter += 1;
        self.pending.push(node);
        Frame {
            node,
            refs: self.grid.references(node),
            next: 0,
        }
    }

    fn close_group(&mut self, root: usize, root_refs: &[usize]) -> Group {
        let mut members = Vec::new();
        while let Some(member) = self.pending.pop() {
            self.color[member] = Color::Black;
            members.push(member);
            if member == root {
                break;
            }
        }
        members.reverse();
        let cyclic = members.len() > 1 || root_refs.contains(&root);
        Group { members, cyclic }
    }
}

/// Walk the whole grid, calling `finish` for every group dependencies-first.
pub fn walk_grid<F>(grid: &Grid, mut finish: F)
where
    F: FnMut(&Group),
{
    let mut walk = ReferenceWalk::new(grid);
    for root in 0..grid.len() {
        walk.visit(root, &mut finish);
    }
}

/// Find every group of cells that reference each other in a loop.
pub fn find_cycles(grid: &Grid) -> Vec<Vec<CellRef>> {
    let mut cycles = Vec::new();
    walk_grid(grid, |group| {
        if group.cyclic {
            let mut cells: Vec<CellRef> =
                group.members.iter().map(|&m| grid.cell_ref_at(m)).collect();
            cells.sort();
            cycles.push(cells);
        }
    });
    cycles
}

/// Detect a circular dependency reachable from a cell.
/// Returns the cells of the first cycle found, if any.
pub fn detect_cycle(start: &CellRef, grid: &Grid) -> Option<Vec<CellRef>> {
    let root = grid.index_of(start)?;
    let mut walk = ReferenceWalk::new(grid);
    let mut found = None;
    walk.visit(root, |group| {
        if found.is_none() && group.cyclic {
            found = Some(group.members.iter().map(|&m| grid.cell_ref_at(m)).collect());
        }
    });
    found
}

fn describe(grid: &Grid, members: &[usize]) -> String {
    members
        .iter()
        .map(|&m| grid.cell_ref_at(m).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
