//! Per-phase span tree with push/pop stack discipline.
//!
//! Spans live in a flat arena owned by the tree. Children are stored as
//! ordered index lists on their parent; the parent link is a plain index used
//! only for walking back up the open path. Indices are meaningless once the
//! tree is `reset`, which happens at every frame boundary.
//!
//! Marks are matched by name among the cursor's direct children, so after the
//! first frame the tree shape is stable and pushes only restart timers.

use log::trace;

/// Index of a span inside its owning tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(usize);

impl SpanId {
    /// The implicit phase root
    pub const ROOT: SpanId = SpanId(0);
}

/// A named, timed unit of work within one frame of a phase
#[derive(Debug, Clone)]
pub struct Span {
    name: String,
    description: String,
    parent: Option<SpanId>,
    children: Vec<SpanId>,
    total_time: f64,
    time_start: Option<f64>,
}

impl Span {
    fn new(name: &str, description: &str, parent: Option<SpanId>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parent,
            children: Vec::new(),
            total_time: 0.0,
            time_start: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parent(&self) -> Option<SpanId> {
        self.parent
    }

    /// Children in insertion order (display order)
    pub fn children(&self) -> &[SpanId] {
        &self.children
    }

    /// Seconds accumulated during the current frame
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn is_running(&self) -> bool {
        self.time_start.is_some()
    }

    fn start(&mut self, now: f64) {
        debug_assert!(self.time_start.is_none(), "span '{}' started twice", self.name);
        self.time_start = Some(now);
    }

    fn stop(&mut self, now: f64) {
        if let Some(start) = self.time_start.take() {
            self.total_time += (now - start).max(0.0);
        }
    }
}

/// The span tree of a single phase
///
/// **Public** - owned by the profiler, read by presentation code
#[derive(Debug, Clone)]
pub struct SpanTree {
    nodes: Vec<Span>,
    cursor: SpanId,
    activations: u32,
}

impl SpanTree {
    /// Create a tree holding only a stopped root span
    pub fn new(root_name: &str, root_description: &str) -> Self {
        Self {
            nodes: vec![Span::new(root_name, root_description, None)],
            cursor: SpanId::ROOT,
            activations: 0,
        }
    }

    pub fn root(&self) -> &Span {
        &self.nodes[SpanId::ROOT.0]
    }

    pub fn get(&self, id: SpanId) -> &Span {
        &self.nodes[id.0]
    }

    pub fn is_at_root(&self) -> bool {
        self.cursor == SpanId::ROOT
    }

    /// Whether the root is running, i.e. the phase is open
    pub fn is_open(&self) -> bool {
        self.root().is_running()
    }

    /// Number of open marks below the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut at = self.cursor;
        while let Some(parent) = self.nodes[at.0].parent {
            depth += 1;
            at = parent;
        }
        depth
    }

    /// Number of spans, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root is present
    pub fn has_no_marks(&self) -> bool {
        self.nodes.len() == 1
    }

    /// How many times the root was opened since the last reset
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Find a direct child of `parent` by name
    pub fn find_child(&self, parent: SpanId, name: &str) -> Option<SpanId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].name == name)
    }

    /// Start the root span and make it the cursor
    ///
    /// # Panics
    /// If the root is already running.
    pub fn open(&mut self, now: f64) {
        assert!(
            !self.is_open(),
            "Phase '{}' opened while already open",
            self.root().name
        );
        self.nodes[SpanId::ROOT.0].start(now);
        self.cursor = SpanId::ROOT;
        self.activations += 1;
    }

    /// Stop the root span
    ///
    /// # Panics
    /// If marks are still open below the root, or the root is not running.
    pub fn close(&mut self, now: f64) {
        assert!(
            self.is_at_root(),
            "Phase '{}' closed with {} mark(s) still open (innermost: '{}')",
            self.root().name,
            self.depth(),
            self.nodes[self.cursor.0].name
        );
        assert!(
            self.is_open(),
            "Phase '{}' closed while not open",
            self.root().name
        );
        self.nodes[SpanId::ROOT.0].stop(now);
    }

    /// Open a mark under the cursor, reusing a same-named child if present
    ///
    /// # Panics
    /// If the tree's root is not running.
    pub fn push_mark(&mut self, name: &str, description: &str, now: f64) -> SpanId {
        assert!(
            self.is_open(),
            "Mark '{}' pushed while phase '{}' is not open",
            name,
            self.root().name
        );

        let id = match self.find_child(self.cursor, name) {
            Some(existing) => existing,
            None => {
                let id = SpanId(self.nodes.len());
                self.nodes.push(Span::new(name, description, Some(self.cursor)));
                self.nodes[self.cursor.0].children.push(id);
                trace!("New span '{}' under '{}'", name, self.nodes[self.cursor.0].name);
                id
            }
        };

        self.nodes[id.0].start(now);
        self.cursor = id;
        id
    }

    /// Close the cursor's mark and move the cursor to its parent
    ///
    /// # Panics
    /// If the cursor is at the root: the root is only closed with the phase.
    pub fn pop_mark(&mut self, now: f64) -> SpanId {
        let popped = self.cursor;
        let parent = match self.nodes[popped.0].parent {
            Some(parent) => parent,
            None => panic!(
                "Too many popped marks: cursor is already at the root of phase '{}'",
                self.nodes[popped.0].name
            ),
        };
        self.nodes[popped.0].stop(now);
        self.cursor = parent;
        popped
    }

    /// Drop every span but the root and zero the root's time
    ///
    /// The arena keeps its capacity, so a warmed-up tree does not reallocate
    /// its node storage on the next frame.
    ///
    /// # Panics
    /// If the root is still running.
    pub fn reset(&mut self) {
        assert!(
            !self.is_open(),
            "Phase '{}' reset while still open",
            self.root().name
        );
        self.nodes.truncate(1);
        let root = &mut self.nodes[SpanId::ROOT.0];
        root.children.clear();
        root.total_time = 0.0;
        self.cursor = SpanId::ROOT;
        self.activations = 0;
    }

    /// Depth-first, pre-order walk yielding `(depth, id, span)`
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![(0, SpanId::ROOT)],
        }
    }
}

/// Iterator returned by [`SpanTree::walk`]
pub struct Walk<'a> {
    tree: &'a SpanTree,
    stack: Vec<(usize, SpanId)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, SpanId, &'a Span);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        let span = self.tree.get(id);
        for child in span.children.iter().rev() {
            self.stack.push((depth + 1, *child));
        }
        Some((depth, id, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn open_tree() -> SpanTree {
        let mut tree = SpanTree::new("Update", "root");
        tree.open(0.0);
        tree
    }

    #[test]
    fn test_balanced_marks_return_to_root() {
        let mut tree = open_tree();
        let a = tree.push_mark("A", "", 1.0);
        let b = tree.push_mark("B", "", 2.0);
        assert_eq!(tree.depth(), 2);

        assert_eq!(tree.pop_mark(3.0), b);
        assert_eq!(tree.pop_mark(4.0), a);

        assert!(tree.is_at_root());
        assert_eq!(tree.get(a).children(), &[b]);
        assert_eq!(tree.get(a).total_time(), 3.0);
        assert_eq!(tree.get(b).total_time(), 1.0);
        assert!(!tree.get(a).is_running());
        assert!(tree.root().is_running());
    }

    #[test]
    #[should_panic(expected = "Too many popped marks")]
    fn test_pop_past_root_panics() {
        let mut tree = open_tree();
        tree.push_mark("A", "", 0.0);
        tree.push_mark("B", "", 0.0);
        tree.pop_mark(1.0);
        tree.pop_mark(1.0);
        tree.pop_mark(1.0);
    }

    #[test]
    #[should_panic(expected = "still open")]
    fn test_close_with_open_marks_panics() {
        let mut tree = open_tree();
        tree.push_mark("A", "", 0.0);
        tree.close(1.0);
    }

    #[test]
    #[should_panic(expected = "is not open")]
    fn test_push_on_closed_tree_panics() {
        let mut tree = SpanTree::new("Draw", "");
        tree.push_mark("A", "", 0.0);
    }

    #[test]
    fn test_same_name_reuses_node_and_accumulates() {
        let mut tree = open_tree();
        let first = tree.push_mark("A", "first", 0.0);
        tree.pop_mark(0.25);
        let second = tree.push_mark("A", "ignored", 1.0);
        tree.pop_mark(1.5);

        assert_eq!(first, second);
        assert_eq!(tree.root().children().len(), 1);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(first).total_time(), 0.75);
        assert_eq!(tree.get(first).description(), "first");
    }

    #[test]
    fn test_same_name_under_different_parents_is_distinct() {
        let mut tree = open_tree();
        let outer = tree.push_mark("A", "", 0.0);
        let inner = tree.push_mark("A", "", 0.0);
        tree.pop_mark(1.0);
        tree.pop_mark(1.0);

        assert_ne!(outer, inner);
        assert_eq!(tree.get(inner).parent(), Some(outer));
    }

    #[test]
    fn test_running_only_on_open_path() {
        let mut tree = open_tree();
        let a = tree.push_mark("A", "", 0.0);
        tree.pop_mark(0.1);
        let b = tree.push_mark("B", "", 0.1);
        let c = tree.push_mark("C", "", 0.2);

        let running: Vec<SpanId> = tree
            .walk()
            .filter(|(_, _, span)| span.is_running())
            .map(|(_, id, _)| id)
            .collect();
        assert_eq!(running, vec![SpanId::ROOT, b, c]);
        assert!(!tree.get(a).is_running());
    }

    #[test]
    fn test_close_and_reopen_accumulates_root() {
        let mut tree = open_tree();
        tree.close(2.0);
        tree.open(5.0);
        tree.close(6.0);

        assert_eq!(tree.root().total_time(), 3.0);
        assert_eq!(tree.activations(), 2);
    }

    #[test]
    fn test_reset_keeps_root_identity() {
        let mut tree = open_tree();
        tree.push_mark("A", "", 0.0);
        tree.pop_mark(1.0);
        tree.close(1.0);

        tree.reset();

        assert!(tree.has_no_marks());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().name(), "Update");
        assert_eq!(tree.root().total_time(), 0.0);
        assert_eq!(tree.activations(), 0);
    }

    #[test]
    fn test_walk_is_preorder_in_insertion_order() {
        let mut tree = open_tree();
        tree.push_mark("A", "", 0.0);
        tree.push_mark("A1", "", 0.0);
        tree.pop_mark(0.0);
        tree.pop_mark(0.0);
        tree.push_mark("B", "", 0.0);
        tree.pop_mark(0.0);

        let order: Vec<(usize, String)> = tree
            .walk()
            .map(|(depth, _, span)| (depth, span.name().to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "Update".to_string()),
                (1, "A".to_string()),
                (2, "A1".to_string()),
                (1, "B".to_string()),
            ]
        );
    }
}
