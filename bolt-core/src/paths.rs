//! Path queries over a [`ChildParentGraph`].

use crate::{tree::ChildParentGraph, types::CellIndex};
use std::collections::HashSet;

/// Walks parent pointers from `target` up to `origin`.
///
/// At every node:
/// 1. If it is `origin`, it is appended and the path is complete.
/// 2. If it has no parent, the walk dead-ends and an empty path is returned.
/// 3. If its parent is in `restrict` (and is not `origin`), the walk stops:
///    with `allow_partial` the path collected so far is returned, otherwise
///    an empty path.
///
/// Reaching `origin` wins over the restriction, so a channel can be traced
/// back onto its already drawn branch root. Tip branches use [`trace_tip`]
/// instead, which has no such exception.
///
/// ### Returns
/// Indices from `target` towards `origin`, or an empty vector.
pub fn trace_path(
    origin: CellIndex,
    target: CellIndex,
    graph: &ChildParentGraph,
    restrict: &HashSet<CellIndex>,
    allow_partial: bool,
) -> Vec<CellIndex> {
    let mut path = Vec::new();
    let mut current = target;

    // Parents always have smaller indices, so this terminates.
    loop {
        if current == origin {
            path.push(current);
            return path;
        }
        let Some(parent) = graph.parent(current) else {
            return Vec::new();
        };
        path.push(current);
        if parent != origin && restrict.contains(&parent) {
            return if allow_partial { path } else { Vec::new() };
        }
        current = parent;
    }
}

/// Walks parent pointers from `tip` and stops before the first node in
/// `drawn`. The root gets no special treatment, so a twig hanging off a
/// drawn root is just the twig.
///
/// ### Returns
/// Indices from `tip` upwards, or an empty vector if `tip` is itself drawn
/// or not in the graph.
pub fn trace_tip(
    tip: CellIndex,
    graph: &ChildParentGraph,
    drawn: &HashSet<CellIndex>,
) -> Vec<CellIndex> {
    if tip >= graph.len() || drawn.contains(&tip) {
        return Vec::new();
    }
    let mut path = vec![tip];
    let mut current = tip;
    while let Some(parent) = graph.parent(current) {
        if drawn.contains(&parent) {
            break;
        }
        path.push(parent);
        current = parent;
    }
    path
}

/// Nodes without children, in ascending order.
pub fn find_tips(graph: &ChildParentGraph) -> Vec<CellIndex> {
    graph
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(id, n)| n.children.is_empty().then_some(id))
        .collect()
}

/// Nodes of `path` with at least one child that is neither on `path` nor in
/// `restrict`, in path order.
pub fn find_branch_roots(
    path: &[CellIndex],
    graph: &ChildParentGraph,
    restrict: &HashSet<CellIndex>,
) -> Vec<CellIndex> {
    let on_path: HashSet<CellIndex> = path.iter().copied().collect();
    let mut seen = HashSet::new();

    path.iter()
        .copied()
        .filter(|&node| {
            graph
                .children(node)
                .iter()
                .any(|c| !on_path.contains(c) && !restrict.contains(c))
        })
        .filter(|&node| seen.insert(node))
        .collect()
}

/// Branching check for a traced path.
///
/// Looks at every node except the last (the attachment point) and returns the
/// child count of the first one that forks. Returns `1` if none forks and `0`
/// for an empty path. Callers only compare the result against `1`.
pub fn branching_degree(path: &[CellIndex], graph: &ChildParentGraph) -> usize {
    let Some((_, body)) = path.split_last() else {
        return 0;
    };
    body.iter()
        .map(|&node| graph.children(node).len())
        .find(|&n| n > 1)
        .unwrap_or(1)
}
