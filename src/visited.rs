use std::collections::HashSet;

/// Paths that have already contributed their body to an output.
///
/// Paths are never removed. First-visit order is kept so a run can report
/// what it inlined.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl VisitedSet {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `path` visited. Returns `false` if it already was.
    pub fn insert(&mut self, path: &str) -> bool {
        if self.seen.contains(path) {
            return false;
        }
        self.seen.insert(path.to_string());
        self.order.push(path.to_string());
        true
    }

    /// Visited paths in the order they were first seen
    pub fn into_order(self) -> Vec<String> {
        self.order
    }
}
