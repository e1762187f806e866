//! Splits a grown tree into strokes: one main channel, levels of secondary
//! channels, and the remaining tip branches.

use crate::{
    paths::{branching_degree, find_branch_roots, find_tips, trace_path, trace_tip},
    tree::ChildParentGraph,
    types::CellIndex,
};
use log::info;
use std::collections::HashSet;

/// Result of [`classify`]. Every path runs from its far end back towards the
/// root.
///
/// A secondary channel ends on the branch root it hangs from, which belongs
/// to an earlier path. Tip paths stop below their first drawn ancestor, so
/// they share no node with any other path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedPaths {
    /// Last grown cell back to the root.
    pub main_path: Vec<CellIndex>,
    /// `h_order_paths[level]` holds the channels found at that level.
    pub h_order_paths: Vec<Vec<Vec<CellIndex>>>,
    pub tip_paths: Vec<Vec<CellIndex>>,
}

impl ClassifiedPaths {
    /// All paths in the order they were drawn.
    pub fn strokes(&self) -> impl Iterator<Item = &[CellIndex]> {
        std::iter::once(self.main_path.as_slice())
            .chain(self.h_order_paths.iter().flatten().map(Vec::as_slice))
            .chain(self.tip_paths.iter().map(Vec::as_slice))
    }

    pub fn h_order_count(&self) -> usize {
        self.h_order_paths.iter().map(Vec::len).sum()
    }
}

/// Picks the longest channel from `root` to any remaining tip.
///
/// Only paths that fork somewhere below `root` qualify. Ties keep the first
/// tip found, in ascending tip order.
///
/// ### Returns
/// Position of the winning tip in `tips` together with its path.
fn longest_channel(
    root: CellIndex,
    tips: &[CellIndex],
    graph: &ChildParentGraph,
    drawn: &HashSet<CellIndex>,
) -> Option<(usize, Vec<CellIndex>)> {
    let mut best: Option<(usize, Vec<CellIndex>)> = None;
    for (pos, &tip) in tips.iter().enumerate() {
        let path = trace_path(root, tip, graph, drawn, false);
        if path.is_empty() || branching_degree(&path, graph) <= 1 {
            continue;
        }
        if best.as_ref().is_none_or(|(_, b)| path.len() > b.len()) {
            best = Some((pos, path));
        }
    }
    best
}

/// Classifies the tree rooted at index `0`.
///
/// 1. The main path runs from the last node (the last grown cell) to the root.
/// 2. For each of `h_order_count` levels, every path of the previous level
///    is searched for branch roots; each root gets its longest forking
///    channel ([`longest_channel`]), which is then marked drawn and its tip
///    consumed.
/// 3. Each tip not yet drawn is traced back until the first drawn ancestor.
///
/// ### Parameters
/// - `graph` - Tree built by [`ChildParentGraph::build`].
/// - `h_order_count` - Number of secondary channel levels.
pub fn classify(graph: &ChildParentGraph, h_order_count: usize) -> ClassifiedPaths {
    let Some(last) = graph.len().checked_sub(1) else {
        return ClassifiedPaths::default();
    };

    let main_path = trace_path(0, last, graph, &HashSet::new(), false);
    let mut drawn: HashSet<CellIndex> = main_path.iter().copied().collect();
    let mut tips: Vec<CellIndex> = find_tips(graph)
        .into_iter()
        .filter(|t| !drawn.contains(t))
        .collect();

    let mut h_order_paths = Vec::with_capacity(h_order_count);
    let mut previous = vec![main_path.clone()];
    for _ in 0..h_order_count {
        let mut level = Vec::new();
        for path in &previous {
            for root in find_branch_roots(path, graph, &drawn) {
                if let Some((pos, channel)) = longest_channel(root, &tips, graph, &drawn) {
                    tips.remove(pos);
                    drawn.extend(channel.iter().copied());
                    level.push(channel);
                }
            }
        }
        previous = level.clone();
        h_order_paths.push(level);
    }

    let mut tip_paths = Vec::with_capacity(tips.len());
    for tip in tips {
        let path = trace_tip(tip, graph, &drawn);
        if !path.is_empty() {
            drawn.extend(path.iter().copied());
            tip_paths.push(path);
        }
    }

    let out = ClassifiedPaths {
        main_path,
        h_order_paths,
        tip_paths,
    };
    info!(
        "classified {} nodes: main {} long, {} secondary, {} tips",
        graph.len(),
        out.main_path.len(),
        out.h_order_count(),
        out.tip_paths.len()
    );
    out
}
