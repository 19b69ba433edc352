//! Dependency edge maintenance and cache invalidation.
//!
//! Forward edges live in each formula (its referenced cells); reverse edges
//! live in each referenced cell's dependents set. Both are keyed by
//! [`Position`], so cells never hold references to one another.

use std::collections::HashSet;

use super::{Cell, Grid, Position};

/// Move `cell`'s reverse edges from `old_refs` to `new_refs`.
///
/// Positions present in both sets are left untouched. Newly referenced
/// positions without a cell get an empty one so the edge has somewhere to
/// live. Returns the positions that lost `cell` as a dependent.
pub fn update_dependents(
    grid: &mut Grid,
    cell: Position,
    old_refs: &[Position],
    new_refs: &[Position],
) -> Vec<Position> {
    let mut detached = Vec::new();

    for pos in old_refs {
        if new_refs.contains(pos) {
            continue;
        }
        if let Some(referenced) = grid.get_mut(pos) {
            referenced.remove_dependent(cell);
            detached.push(*pos);
        }
    }

    for pos in new_refs {
        if old_refs.contains(pos) {
            continue;
        }
        grid.entry(*pos).or_default().add_dependent(cell);
    }

    detached
}

/// Clear the memoized value of `changed` and of everything that depends on
/// it, transitively. Returns the number of cells visited.
pub fn invalidate_dependents(grid: &mut Grid, changed: Position) -> usize {
    let mut to_process = vec![changed];
    let mut visited = HashSet::new();

    while let Some(pos) = to_process.pop() {
        if !visited.insert(pos) {
            continue;
        }
        if let Some(cell) = grid.get_mut(&pos) {
            cell.invalidate_cache();
            to_process.extend(cell.dependents().filter(|dep| !visited.contains(dep)));
        }
    }

    visited.len()
}

/// Remove the cell at `pos` if it is empty and nothing references it.
pub fn prune_if_unused(grid: &mut Grid, pos: Position) -> bool {
    let unused = grid
        .get(&pos)
        .is_some_and(|cell: &Cell| cell.content().is_empty() && !cell.is_referenced());
    if unused {
        grid.remove(&pos);
    }
    unused
}
