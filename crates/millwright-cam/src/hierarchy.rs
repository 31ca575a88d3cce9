//! Polygon hierarchy analyzer (C6): groups a flat set of polygons into a
//! solid/hole nesting forest.
//!
//! Stored as an arena (`Vec<HierarchyNode>` indexed by `HierarchyNodeId`)
//! rather than the source's parent/child pointer graph — an id-indexed
//! arena has no ownership cycles to manage, so there's no analog needed
//! for the shared/weak pointer pairing the original relies on.

use millwright_core::geom::Polygon2D;

use crate::boolean_engine::polygon_contains;

/// Index into a [`PolygonHierarchy`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HierarchyNodeId(pub usize);

/// One polygon's place in the nesting forest.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub polygon: Polygon2D,
    pub parent: Option<HierarchyNodeId>,
    pub children: Vec<HierarchyNodeId>,
    pub depth: u32,
    pub is_hole: bool,
}

/// The nesting forest itself.
#[derive(Debug, Clone, Default)]
pub struct PolygonHierarchy {
    nodes: Vec<HierarchyNode>,
    roots: Vec<HierarchyNodeId>,
}

impl PolygonHierarchy {
    pub fn node(&self, id: HierarchyNodeId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[HierarchyNodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every solid polygon (even depth: 0, 2, 4, ...).
    pub fn solids(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().filter(|n| !n.is_hole)
    }

    /// Every hole polygon (odd depth: 1, 3, 5, ...).
    pub fn holes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().filter(|n| n.is_hole)
    }
}

/// Build a [`PolygonHierarchy`] from a flat set of polygons by nesting
/// each polygon under the smallest polygon that contains it.
/// `is_hole = (depth % 2 == 1)`: a polygon nested once is a hole in its
/// parent, nested twice is an island inside that hole, and so on.
pub fn build_hierarchy(polygons: &[Polygon2D]) -> PolygonHierarchy {
    let n = polygons.len();
    if n == 0 {
        return PolygonHierarchy::default();
    }

    // For each polygon, find the index of its immediate parent: among all
    // polygons that contain it, the one with the smallest area.
    let mut parent_of: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        let mut best: Option<(usize, f64)> = None;
        for j in 0..n {
            if i == j {
                continue;
            }
            if polygon_contains(&polygons[j], &polygons[i]) {
                let area = polygons[j].area();
                if best.map(|(_, a)| area < a).unwrap_or(true) {
                    best = Some((j, area));
                }
            }
        }
        parent_of[i] = best.map(|(j, _)| j);
    }

    let mut nodes: Vec<HierarchyNode> = polygons
        .iter()
        .map(|p| HierarchyNode {
            polygon: p.clone(),
            parent: None,
            children: Vec::new(),
            depth: 0,
            is_hole: false,
        })
        .collect();

    let mut roots = Vec::new();
    for i in 0..n {
        match parent_of[i] {
            Some(j) => {
                nodes[i].parent = Some(HierarchyNodeId(j));
                nodes[j].children.push(HierarchyNodeId(i));
            }
            None => roots.push(HierarchyNodeId(i)),
        }
    }

    // Assign depth breadth-first from each root, then derive is_hole.
    let mut queue: std::collections::VecDeque<(HierarchyNodeId, u32)> =
        roots.iter().map(|id| (*id, 0)).collect();
    while let Some((id, depth)) = queue.pop_front() {
        nodes[id.0].depth = depth;
        nodes[id.0].is_hole = depth % 2 == 1;
        for child in nodes[id.0].children.clone() {
            queue.push_back((child, depth + 1));
        }
    }

    PolygonHierarchy { nodes, roots }
}
