//! Levelled, centered layout for the risk escalation graph.
//!
//! Escalation targets sit on top and reporters below them. Levels come from a
//! single-visit breadth-first walk starting at the roots; within a level the
//! nodes are centered on the slide as one group, in input order. Siblings are
//! not placed under their own parent; every row is centered on the slide.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use serde::Serialize;

use super::geometry::{Rect, Segment, SlideDimensions, SlideFrame};
use crate::models::{EscalationNode, Hierarchy};

/// Inch-based sizing of the escalation diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HierarchyGeometry {
    pub slide: SlideDimensions,
    pub node_width: f64,
    pub node_height: f64,
    pub gutter: f64,
    pub chart_top: f64,
    pub chart_bottom_margin: f64,
}

impl HierarchyGeometry {
    pub fn new(slide: SlideDimensions) -> Self {
        Self {
            slide,
            node_width: 2.2,
            node_height: 0.8,
            gutter: 0.4,
            chart_top: 1.6,
            chart_bottom_margin: 0.6,
        }
    }

    fn chart_height(&self) -> f64 {
        self.slide.height - self.chart_top - self.chart_bottom_margin
    }
}

/// Where a node ended up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePosition {
    pub level: usize,
    /// Left-to-right position within its level.
    pub index: usize,
    pub root: bool,
    pub rect: Rect,
}

/// A reporting line drawn from the child's top edge to the parent's bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorPath {
    pub from_id: String,
    pub to_id: String,
    pub label: String,
    pub segment: Segment,
}

impl ConnectorPath {
    /// Anchor point for the caption.
    pub fn label_anchor(&self) -> (f64, f64) {
        self.segment.midpoint()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyLayout {
    /// Node id to position, in input node order.
    pub positions: IndexMap<String, NodePosition>,
    /// Root ids in input order.
    pub root_ids: Vec<String>,
    /// Node ids per level, each in input order.
    pub levels: Vec<Vec<String>>,
    pub max_level: usize,
    pub connectors: Vec<ConnectorPath>,
}

impl HierarchyLayout {
    pub fn is_root(&self, id: &str) -> bool {
        self.positions.get(id).is_some_and(|p| p.root)
    }

    pub fn level_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).map(|p| p.level)
    }
}

/// Lay out `hierarchy` as a top-down tree.
///
/// 1. Roots are nodes that never appear as a link's `from_id`. When there
///    are none (cycles) the first node becomes the only root.
/// 2. Levels are assigned breadth-first from all roots at level 0; a node
///    keeps the level of the first parent that reaches it, in link order.
///    Unreached nodes stay at level 0.
/// 3. Each level is centered horizontally as a group, in input order.
/// 4. Links whose endpoints both resolve get a connector; the rest are dropped.
///
/// Every node is visited at most once, so self-loops and cycles terminate.
/// Duplicate node ids are ignored after their first occurrence.
pub fn layout_hierarchy(hierarchy: &Hierarchy, geometry: &HierarchyGeometry) -> HierarchyLayout {
    let nodes = unique_nodes(&hierarchy.nodes);

    let mut reporters: HashSet<&str> = HashSet::new();
    let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for link in &hierarchy.links {
        reporters.insert(link.from_id.as_str());
        children_of
            .entry(link.to_id.as_str())
            .or_default()
            .push(link.from_id.as_str());
    }

    let mut roots: Vec<&str> = nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !reporters.contains(id))
        .collect();
    if roots.is_empty() {
        if let Some(first) = nodes.first() {
            roots.push(first.id.as_str());
        }
    }

    // Walk ids rather than nodes: a dangling id can still bridge to real
    // reporters further down.
    let mut levels: HashMap<&str, usize> = roots.iter().map(|&id| (id, 0)).collect();
    let mut queue: VecDeque<&str> = roots.iter().copied().collect();
    while let Some(current) = queue.pop_front() {
        let level = levels.get(current).copied().unwrap_or(0);
        for &child in children_of.get(current).into_iter().flatten() {
            if !levels.contains_key(child) {
                levels.insert(child, level + 1);
                queue.push_back(child);
            }
        }
    }

    let node_level = |node: &EscalationNode| levels.get(node.id.as_str()).copied().unwrap_or(0);
    let max_level = nodes.iter().map(|&n| node_level(n)).max().unwrap_or(0);

    let mut by_level: Vec<Vec<&EscalationNode>> = vec![Vec::new(); max_level + 1];
    for &node in &nodes {
        by_level[node_level(node)].push(node);
    }

    let root_set: HashSet<&str> = roots.iter().copied().collect();
    let frame = SlideFrame::new(geometry.slide);
    let level_height = geometry.chart_height() / (max_level + 1) as f64;
    let mut placed: HashMap<&str, NodePosition> = HashMap::with_capacity(nodes.len());
    for (level, row) in by_level.iter().enumerate() {
        let count = row.len() as f64;
        let total_width = count * geometry.node_width + (count - 1.0).max(0.0) * geometry.gutter;
        let start_x = (geometry.slide.width - total_width) / 2.0;
        let top = geometry.chart_top + level as f64 * level_height;
        for (index, node) in row.iter().enumerate() {
            let left = start_x + index as f64 * (geometry.node_width + geometry.gutter);
            placed.insert(
                node.id.as_str(),
                NodePosition {
                    level,
                    index,
                    root: root_set.contains(node.id.as_str()),
                    rect: frame.rect(left, top, geometry.node_width, geometry.node_height),
                },
            );
        }
    }

    let positions: IndexMap<String, NodePosition> = nodes
        .iter()
        .filter_map(|n| placed.get(n.id.as_str()).map(|p| (n.id.clone(), *p)))
        .collect();

    let connectors = hierarchy
        .links
        .iter()
        .filter_map(|link| {
            let child = positions.get(&link.from_id)?;
            let parent = positions.get(&link.to_id)?;
            Some(ConnectorPath {
                from_id: link.from_id.clone(),
                to_id: link.to_id.clone(),
                label: link.label.clone(),
                segment: Segment {
                    x1: child.rect.center_x(),
                    y1: child.rect.top,
                    x2: parent.rect.center_x(),
                    y2: parent.rect.bottom(),
                },
            })
        })
        .collect();

    HierarchyLayout {
        positions,
        root_ids: roots.into_iter().map(str::to_string).collect(),
        levels: by_level
            .iter()
            .map(|row| row.iter().map(|n| n.id.clone()).collect())
            .collect(),
        max_level,
        connectors,
    }
}

fn unique_nodes(nodes: &[EscalationNode]) -> Vec<&EscalationNode> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes
        .iter()
        .filter(|n| seen.insert(n.id.as_str()))
        .collect()
}
