//! Per-vertex search state: distance, parent and settled flag.

/// Dense vertex index.
pub type VertexId = usize;

/// Parent pointer of a vertex.
///
/// A `Provisional` parent was recorded through a non-taut edge and carries a
/// penalty in the vertex's distance. It is turned into `Confirmed` (and the
/// penalty removed) when the vertex is settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parent {
    #[default]
    None,
    Confirmed(VertexId),
    Provisional(VertexId),
}

impl Parent {
    /// The parent vertex, whatever its state.
    #[inline]
    pub fn vertex(self) -> Option<VertexId> {
        match self {
            Parent::None => None,
            Parent::Confirmed(v) | Parent::Provisional(v) => Some(v),
        }
    }

    #[inline]
    pub fn is_provisional(self) -> bool {
        matches!(self, Parent::Provisional(_))
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Parent::None
    }
}

#[derive(Clone)]
struct Node {
    distance: f32,
    parent: Parent,
    visited: bool,
    generation: u32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            distance: f32::INFINITY,
            parent: Parent::None,
            visited: false,
            generation: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchMemory
// ---------------------------------------------------------------------------

/// Distance, parent and visited state for every vertex of a search.
///
/// [`reset`](Self::reset) is O(1): slots carry the generation that last wrote
/// them and anything older reads as the default (infinite distance, no
/// parent, not visited). The backing storage only ever grows, so one memory
/// can serve many queries without reallocating.
pub struct SearchMemory {
    nodes: Vec<Node>,
    generation: u32,
    len: usize,
}

impl Default for SearchMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchMemory {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generation: 1,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut memory = Self::new();
        memory.nodes.resize(capacity, Node::default());
        memory
    }

    /// Forget the previous search and make room for `len` vertices.
    pub fn reset(&mut self, len: usize) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: old stamps could alias the new generation.
            for node in &mut self.nodes {
                node.generation = 0;
            }
            self.generation = 1;
        }
        if self.nodes.len() < len {
            self.nodes.resize(len, Node::default());
        }
        self.len = len;
    }

    /// Number of vertices addressable in the current search.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated slots; never shrinks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn node(&self, v: VertexId) -> Option<&Node> {
        self.nodes
            .get(v)
            .filter(|n| v < self.len && n.generation == self.generation)
    }

    fn node_mut(&mut self, v: VertexId) -> &mut Node {
        debug_assert!(v < self.len, "vertex {v} out of range {}", self.len);
        let generation = self.generation;
        let node = &mut self.nodes[v];
        if node.generation != generation {
            *node = Node {
                generation,
                ..Node::default()
            };
        }
        node
    }

    #[inline]
    pub fn distance(&self, v: VertexId) -> f32 {
        self.node(v).map_or(f32::INFINITY, |n| n.distance)
    }

    #[inline]
    pub fn parent(&self, v: VertexId) -> Parent {
        self.node(v).map_or(Parent::None, |n| n.parent)
    }

    #[inline]
    pub fn is_visited(&self, v: VertexId) -> bool {
        self.node(v).is_some_and(|n| n.visited)
    }

    pub fn set_distance(&mut self, v: VertexId, distance: f32) {
        debug_assert!(!self.is_visited(v), "settled vertex {v} rewritten");
        self.node_mut(v).distance = distance;
    }

    pub fn set_parent(&mut self, v: VertexId, parent: Parent) {
        debug_assert!(!self.is_visited(v), "settled vertex {v} rewritten");
        self.node_mut(v).parent = parent;
    }

    /// Record a new best distance together with the parent it came from.
    pub fn update(&mut self, v: VertexId, distance: f32, parent: Parent) {
        debug_assert!(!self.is_visited(v), "settled vertex {v} rewritten");
        let node = self.node_mut(v);
        node.distance = distance;
        node.parent = parent;
    }

    pub fn set_visited(&mut self, v: VertexId) {
        self.node_mut(v).visited = true;
    }

    /// Turn a provisional parent into a confirmed one, recomputing the
    /// distance through it with `cost(parent)`. Returns whether anything
    /// changed.
    pub fn confirm(&mut self, v: VertexId, cost: impl FnOnce(VertexId) -> f32) -> bool {
        let Parent::Provisional(p) = self.parent(v) else {
            return false;
        };
        let distance = self.distance(p) + cost(p);
        self.update(v, distance, Parent::Confirmed(p));
        true
    }
}
