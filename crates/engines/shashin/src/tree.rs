//! Arena-backed search tree.
//!
//! The tree owns every node; parents refer to their children by [`NodeId`]
//! and children point back with a plain index. Nodes are never removed, and
//! the whole arena is dropped with the tree at the end of a search.

use chess_core::Move;

use crate::node::{Node, NodeId};

/// Visit statistics of one root move.
#[derive(Debug, Clone, PartialEq)]
pub struct RootMoveStat {
    pub mv: Move,
    pub visits: u32,
    pub win_rate: f64,
}

/// Summary of a tree, for logging.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    /// Mean score at the root, for the side that moved into it.
    pub root_value: f64,
    pub root_children: usize,
    pub max_depth: usize,
}

#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true; the root always exists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, root first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Append a child for `mv` under `parent` and return it.
    pub fn add_child(&mut self, parent: NodeId, mv: Move, prior: f64) -> NodeId {
        debug_assert!(
            !self.has_child_move(parent, mv),
            "duplicate child {mv:?} under {parent:?}"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::child(parent, mv, prior));
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    pub fn has_child_move(&self, parent: NodeId, mv: Move) -> bool {
        self.get(parent)
            .children()
            .iter()
            .any(|&child| self.get(child).mv() == Some(mv))
    }

    /// Child with the highest PUCT score; the first one wins ties.
    pub fn best_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let parent_visits = node.visits().max(1);

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &child in node.children() {
            let score = self.get(child).uct_score(parent_visits, exploration);
            if score > best_score {
                best_score = score;
                best = Some(child);
            }
        }
        best
    }

    /// Add `score` at `leaf` and alternate perspective on the way to the root.
    ///
    /// Only touches atomics, so it may run concurrently on a shared tree.
    pub fn backpropagate(&self, leaf: NodeId, score: f64) {
        let mut current = Some(leaf);
        let mut score = score;
        while let Some(id) = current {
            let node = self.get(id);
            node.record(score);
            score = 1.0 - score;
            current = node.parent();
        }
    }

    /// Moves from the root down to `id`.
    pub fn path_to(&self, id: NodeId) -> Vec<Move> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.map(|id| self.get(id)) {
            path.extend(node.mv());
            current = node.parent();
        }
        path.reverse();
        path
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        std::iter::successors(self.get(id).parent(), |&p| self.get(p).parent()).count()
    }

    /// Visited root moves, most visited first.
    pub fn root_stats(&self) -> Vec<RootMoveStat> {
        let mut stats: Vec<RootMoveStat> = self
            .get(self.root())
            .children()
            .iter()
            .map(|&id| self.get(id))
            .filter(|node| node.visits() > 0)
            .filter_map(|node| {
                Some(RootMoveStat {
                    mv: node.mv()?,
                    visits: node.visits(),
                    win_rate: node.win_rate(),
                })
            })
            .collect();
        // Stable sort keeps generation order among equal visit counts.
        stats.sort_by(|a, b| b.visits.cmp(&a.visits));
        stats
    }

    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root());
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits(),
            root_value: root.win_rate(),
            root_children: root.children().len(),
            max_depth: self.iter().map(|(id, _)| self.depth(id)).max().unwrap_or(0),
        }
    }
}

impl Default for SearchTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
