//! Search tree node.
//!
//! Statistics are atomics so any number of threads may backpropagate through
//! a shared tree without locking. Structure (the `children` list) is only
//! changed through `&mut SearchTree`.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use chess_core::Move;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// `f64` with an atomic add, stored as its bit pattern.
#[derive(Debug, Default)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Add `delta`, returning the previous value.
    pub fn fetch_add(&self, delta: f64) -> f64 {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + delta).to_bits();
            match self.bits.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(previous) => return f64::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }
}

/// One ply of the search tree.
#[derive(Debug)]
pub struct Node {
    /// Move from the parent (None for the root)
    mv: Option<Move>,
    /// Back-reference for backpropagation; never owns
    parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    visits: AtomicU32,
    /// Sum of simulation scores, each in [0, 1], from the point of view of
    /// the side that played `mv`
    total_score: AtomicF64,
    prior: f64,
    terminal: AtomicBool,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new(None, None, 1.0)
    }

    pub(crate) fn child(parent: NodeId, mv: Move, prior: f64) -> Self {
        Self::new(Some(mv), Some(parent), prior.clamp(0.0, 1.0))
    }

    fn new(mv: Option<Move>, parent: Option<NodeId>, prior: f64) -> Self {
        Self {
            mv,
            parent,
            children: Vec::new(),
            visits: AtomicU32::new(0),
            total_score: AtomicF64::default(),
            prior,
            terminal: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits.load(Ordering::Acquire)
    }

    #[inline]
    pub fn total_score(&self) -> f64 {
        self.total_score.load()
    }

    #[inline]
    pub fn prior(&self) -> f64 {
        self.prior
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal.load(Ordering::Acquire)
    }

    /// Flag the node as having no legal replies. Never cleared.
    pub fn mark_terminal(&self) {
        self.terminal.store(true, Ordering::Release);
    }

    /// Mean score, 0.5 for an unvisited node.
    pub fn win_rate(&self) -> f64 {
        match self.visits() {
            0 => 0.5,
            v => self.total_score() / f64::from(v),
        }
    }

    pub fn is_fully_expanded(&self, legal_move_count: usize) -> bool {
        self.children.len() >= legal_move_count
    }

    /// Count one visit worth `score`.
    ///
    /// Visits go first, so a concurrent reader never sees a mean above 1.
    pub fn record(&self, score: f64) {
        self.visits.fetch_add(1, Ordering::AcqRel);
        self.total_score.fetch_add(score);
    }

    /// PUCT selection score as seen from a parent with `parent_visits`
    /// visits (at least 1).
    pub fn uct_score(&self, parent_visits: u32, exploration: f64) -> f64 {
        let parent_visits = f64::from(parent_visits.max(1));
        let dynamic_exploration = exploration * (0.65 + 0.85 / (1.0 + parent_visits / 64.0));
        let log_parent = (parent_visits + 1.0).ln();

        let visits = self.visits();
        if visits == 0 {
            return self.prior + dynamic_exploration * log_parent.sqrt();
        }

        let visits = f64::from(visits);
        let exploitation = self.total_score() / visits;
        let progressive = (2.0 / (1.0 + visits / 10.0)).sqrt();
        let explore = dynamic_exploration * progressive * (log_parent / visits).sqrt();
        let prior_bonus = self.prior * (0.3 - visits * 0.01).max(0.05);
        exploitation + explore + prior_bonus
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod node_tests;
