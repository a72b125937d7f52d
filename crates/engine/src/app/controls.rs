use std::mem;

use super::{InputSnapshot, InputSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Pressed,
    Held,
    Released,
}

/// Two consecutive input snapshots and the edges between them.
///
/// Edges are recomputed from the pair on every query; nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    current: InputSnapshot,
    previous: InputSnapshot,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances one tick: the old current becomes previous and `next` becomes
    /// current. Both fields change within this call.
    pub fn update(&mut self, next: InputSnapshot) {
        self.previous = mem::replace(&mut self.current, next);
    }

    pub fn current(&self) -> &InputSnapshot {
        &self.current
    }

    pub fn previous(&self) -> &InputSnapshot {
        &self.previous
    }

    pub fn edge(&self, source: impl Into<InputSource>) -> Option<Edge> {
        let source = source.into();
        match (self.current.contains(source), self.previous.contains(source)) {
            (true, false) => Some(Edge::Pressed),
            (true, true) => Some(Edge::Held),
            (false, true) => Some(Edge::Released),
            (false, false) => None,
        }
    }

    pub fn is_pressed(&self, source: impl Into<InputSource>) -> bool {
        self.edge(source) == Some(Edge::Pressed)
    }

    pub fn is_held(&self, source: impl Into<InputSource>) -> bool {
        self.edge(source) == Some(Edge::Held)
    }

    pub fn is_released(&self, source: impl Into<InputSource>) -> bool {
        self.edge(source) == Some(Edge::Released)
    }

    /// Down this tick, whether newly pressed or held.
    pub fn is_down(&self, source: impl Into<InputSource>) -> bool {
        self.current.contains(source)
    }

    pub fn pressed(&self) -> impl Iterator<Item = InputSource> + '_ {
        self.current
            .iter()
            .copied()
            .filter(|source| !self.previous.contains(*source))
    }

    pub fn released(&self) -> impl Iterator<Item = InputSource> + '_ {
        self.previous
            .iter()
            .copied()
            .filter(|source| !self.current.contains(*source))
    }

    /// -1, 0 or 1 from a pair of opposing sources that are down this tick.
    pub fn axis(&self, negative: &[InputSource], positive: &[InputSource]) -> i32 {
        let down = |sources: &[InputSource]| sources.iter().any(|source| self.is_down(*source));
        i32::from(down(positive)) - i32::from(down(negative))
    }
}
