//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).
//! The search runs before anything is mutated, walking forward references
//! from the candidate formula's references.

use std::collections::HashMap;

use super::{Grid, Position};

/// Check whether giving `target` a formula referencing `new_refs` would
/// create a cycle.
///
/// Returns the closing reference chain (`target`, ..., `target`) if so.
/// Absent cells have no outgoing references and end their branch.
pub fn find_cycle(grid: &Grid, target: Position, new_refs: &[Position]) -> Option<Vec<Position>> {
    // Maps each discovered position to the position it was reached from.
    let mut reached_from: HashMap<Position, Option<Position>> = HashMap::new();
    let mut stack = Vec::new();

    for &pos in new_refs {
        if !reached_from.contains_key(&pos) {
            reached_from.insert(pos, None);
            stack.push(pos);
        }
    }

    while let Some(current) = stack.pop() {
        if current == target {
            return Some(chain_to(target, &reached_from));
        }

        let Some(cell) = grid.get(&current) else {
            continue;
        };
        for &next in cell.referenced_cells() {
            if !reached_from.contains_key(&next) {
                reached_from.insert(next, Some(current));
                stack.push(next);
            }
        }
    }

    None
}

fn chain_to(target: Position, reached_from: &HashMap<Position, Option<Position>>) -> Vec<Position> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(Some(prev)) = reached_from.get(&current) {
        path.push(*prev);
        current = *prev;
    }
    path.push(target);
    path.reverse();
    path
}
