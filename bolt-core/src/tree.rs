use crate::{
    error::{BoltError, Result},
    stencil,
    types::{Cell, CellIndex},
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub parent: Option<CellIndex>,
    pub children: Vec<CellIndex>,
}

/// Rooted tree over charge grid indices.
///
/// Node `0` is the root and has no parent. Every other node has exactly one
/// parent with a smaller index.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildParentGraph {
    pub nodes: Vec<TreeNode>,
}

impl ChildParentGraph {
    /// A graph holding only the root.
    pub fn new() -> Self {
        Self::link(std::iter::empty())
    }

    /// Wires nodes `1..` to the given parents. Every parent must be smaller
    /// than its child.
    fn link(parents: impl IntoIterator<Item = CellIndex>) -> Self {
        let mut nodes = vec![TreeNode {
            parent: None,
            children: Vec::new(),
        }];
        for parent in parents {
            let id = nodes.len();
            nodes.push(TreeNode {
                parent: Some(parent),
                children: Vec::new(),
            });
            nodes[parent].children.push(id);
        }
        Self { nodes }
    }

    /// Rebuilds a graph from the parents of nodes `1..`, in node order.
    ///
    /// ### Returns
    /// `None` if some node does not point at an earlier node.
    pub fn from_parents(parents: &[CellIndex]) -> Option<Self> {
        parents
            .iter()
            .enumerate()
            .all(|(i, &p)| p <= i)
            .then(|| Self::link(parents.iter().copied()))
    }

    /// Derives the tree from cells in growth order.
    ///
    /// For each cell after the root, its 26 neighbours are scanned in stencil
    /// order against all earlier cells, and the **last** earlier neighbour
    /// found becomes the parent. This is not necessarily the closest one.
    ///
    /// ### Errors
    /// [`BoltError::GraphIntegrity`] if a cell touches no earlier cell.
    pub fn build(cells: &[Cell]) -> Result<Self> {
        let Some(&root) = cells.first() else {
            return Ok(Self { nodes: Vec::new() });
        };
        let mut seen: HashMap<Cell, CellIndex> = HashMap::with_capacity(cells.len());
        seen.insert(root, 0);

        let mut parents = Vec::with_capacity(cells.len() - 1);
        for (i, &cell) in cells.iter().enumerate().skip(1) {
            let parent = stencil::neighbors(cell)
                .iter()
                .filter_map(|n| seen.get(n).copied())
                .last()
                .ok_or(BoltError::GraphIntegrity { index: i, cell })?;
            parents.push(parent);
            seen.insert(cell, i);
        }
        Ok(Self::link(parents))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn parent(&self, id: CellIndex) -> Option<CellIndex> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    #[inline]
    pub fn children(&self, id: CellIndex) -> &[CellIndex] {
        match self.nodes.get(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// `(child, parent)` pairs in child order.
    pub fn edges(&self) -> impl Iterator<Item = (CellIndex, CellIndex)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.parent.map(|p| (id, p)))
    }
}

impl Default for ChildParentGraph {
    fn default() -> Self {
        Self::new()
    }
}
