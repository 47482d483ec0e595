//! Node definitions for the practice game tree
//!
//! Nodes are stored in a flat array owned by [`GameTree`] and addressed by
//! [`NodeId`] (pre-order position, root = 0). Child links are ids; the parent
//! link lives on the node's [`Edge`] and is a plain id, so ownership only ever
//! flows from the tree to its nodes.
//!
//! A node only carries the fields a human edits (value, display window,
//! pruning flag). Canonical results are kept apart in
//! [`crate::search::Solution`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Upper bound on the number of nodes a single tree may hold.
pub const MAX_NODES: usize = 1 << 20;

/// Upper bound on tree depth. Every traversal recurses once per level.
pub const MAX_DEPTH: u32 = 32;

/// Node ID type (index into flat array storage)
pub type NodeId = u32;

/// The side to move at an internal node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Maximizing player
    Max,
    /// Minimizing player
    Min,
}

impl Side {
    /// Get the side that moves one level down
    pub fn opponent(self) -> Side {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }

    /// Pick the preferred of two values for this side.
    pub fn better(self, a: i32, b: i32) -> i32 {
        match self {
            Side::Max => a.max(b),
            Side::Min => a.min(b),
        }
    }

    /// Starting value before any child has been seen.
    pub fn worst(self) -> i32 {
        match self {
            Side::Max => i32::MIN,
            Side::Min => i32::MAX,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Max => f.write_str("max"),
            Side::Min => f.write_str("min"),
        }
    }
}

/// Node type as exposed to callers and snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Max,
    Min,
    Leaf,
}

impl From<Side> for NodeKind {
    fn from(side: Side) -> Self {
        match side {
            Side::Max => NodeKind::Max,
            Side::Min => NodeKind::Min,
        }
    }
}

/// An alpha or beta bound.
///
/// Variant order gives the total order `NegInfinity < Finite(_) < PosInfinity`,
/// so bounds compare directly with `max`/`min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Bound {
    NegInfinity,
    Finite(i32),
    PosInfinity,
}

impl Bound {
    /// The finite value, if any
    pub fn finite(self) -> Option<i32> {
        match self {
            Bound::Finite(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for Bound {
    fn from(value: i32) -> Self {
        Bound::Finite(value)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInfinity => f.write_str("-inf"),
            Bound::Finite(v) => write!(f, "{}", v),
            Bound::PosInfinity => f.write_str("+inf"),
        }
    }
}

/// Link from a node to its parent, carrying the user's pruning mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Parent node ID (non-owning)
    pub parent: NodeId,
    /// Whether the user marked this edge as pruned
    pub pruned: bool,
}

/// Represents a node in the game tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Max or Min node whose value the user has to work out
    Internal {
        /// Unique identifier for this node (pre-order index)
        id: NodeId,
        /// Side to move
        side: Side,
        /// 1-based level, root = 1
        depth: u32,
        /// Edge to the parent (None for root)
        parent: Option<Edge>,
        /// Child node IDs in evaluation order
        children: Vec<NodeId>,
        /// User-entered value
        value: Option<i32>,
        /// Display alpha, filled on reveal
        alpha: Option<Bound>,
        /// Display beta, filled on reveal
        beta: Option<Bound>,
    },
    /// Leaf with a fixed value drawn at generation time
    Leaf {
        id: NodeId,
        depth: u32,
        parent: Option<Edge>,
        value: i32,
    },
}

impl Node {
    /// Get the node ID
    pub fn id(&self) -> NodeId {
        match self {
            Node::Internal { id, .. } | Node::Leaf { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Internal { side, .. } => (*side).into(),
            Node::Leaf { .. } => NodeKind::Leaf,
        }
    }

    /// Side to move (None for leaves)
    pub fn side(&self) -> Option<Side> {
        match self {
            Node::Internal { side, .. } => Some(*side),
            Node::Leaf { .. } => None,
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            Node::Internal { depth, .. } | Node::Leaf { depth, .. } => *depth,
        }
    }

    /// Number of children (0 for leaves)
    pub fn arity(&self) -> usize {
        self.children().len()
    }

    /// Get the edge to the parent
    pub fn parent(&self) -> Option<&Edge> {
        match self {
            Node::Internal { parent, .. } | Node::Leaf { parent, .. } => parent.as_ref(),
        }
    }

    pub(crate) fn parent_mut(&mut self) -> Option<&mut Edge> {
        match self {
            Node::Internal { parent, .. } | Node::Leaf { parent, .. } => parent.as_mut(),
        }
    }

    /// Get child node IDs
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Internal { children, .. } => children,
            Node::Leaf { .. } => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The value shown for this node: fixed for leaves, user-entered otherwise.
    pub fn value(&self) -> Option<i32> {
        match self {
            Node::Internal { value, .. } => *value,
            Node::Leaf { value, .. } => Some(*value),
        }
    }

    /// Display window `(alpha, beta)`; always empty for leaves.
    pub fn window(&self) -> (Option<Bound>, Option<Bound>) {
        match self {
            Node::Internal { alpha, beta, .. } => (*alpha, *beta),
            Node::Leaf { .. } => (None, None),
        }
    }

    /// Whether the user marked the edge to this node as pruned
    pub fn is_pruned(&self) -> bool {
        self.parent().map_or(false, |edge| edge.pruned)
    }
}

/// Number of `(nodes, leaves)` in a uniform tree of the given shape.
///
/// Fails if the shape is degenerate or exceeds [`MAX_DEPTH`] or [`MAX_NODES`].
pub fn shape_size(depth: u32, branching_factor: u32) -> Result<(usize, usize)> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(EngineError::InvalidParameter(format!(
            "depth must be between 1 and {}, got {}",
            MAX_DEPTH, depth
        )));
    }
    if branching_factor < 1 {
        return Err(EngineError::InvalidParameter(format!(
            "branching factor must be at least 1, got {}",
            branching_factor
        )));
    }

    let too_large = || {
        EngineError::InvalidParameter(format!(
            "depth {} with branching factor {} exceeds {} nodes",
            depth, branching_factor, MAX_NODES
        ))
    };

    let bf = branching_factor as usize;
    let mut level = 1usize;
    let mut total = 0usize;
    for _ in 0..depth {
        total = total.checked_add(level).ok_or_else(too_large)?;
        if total > MAX_NODES {
            return Err(too_large());
        }
        level = level.checked_mul(bf).ok_or_else(too_large)?;
    }
    // `level` has been multiplied once past the leaf row
    let leaves = level / bf;
    Ok((total, leaves))
}

/// Game tree aggregate
///
/// Owns every node in a flat array. The `editable` flag gates all user
/// annotation operations.
#[derive(Debug, Clone, PartialEq)]
pub struct GameTree {
    root_side: Side,
    depth: u32,
    branching_factor: u32,
    nodes: Vec<Node>,
    editable: bool,
}

impl GameTree {
    /// Build a uniform alternating tree whose leaves, left to right, take
    /// the given values.
    ///
    /// `leaves.len()` must equal `branching_factor^(depth-1)`.
    pub fn from_leaves(
        root_side: Side,
        depth: u32,
        branching_factor: u32,
        leaves: &[i32],
    ) -> Result<Self> {
        let (node_count, leaf_count) = shape_size(depth, branching_factor)?;
        if leaves.len() != leaf_count {
            return Err(EngineError::InvalidParameter(format!(
                "expected {} leaf values, got {}",
                leaf_count,
                leaves.len()
            )));
        }

        let mut nodes = Vec::with_capacity(node_count);
        let mut values = leaves.iter().copied();
        let shape = Shape { depth, branching_factor };
        build_subtree(&mut nodes, &mut values, shape, root_side, 1, None)?;

        Ok(GameTree {
            root_side,
            depth,
            branching_factor,
            nodes,
            editable: true,
        })
    }

    pub fn root_side(&self) -> Side {
        self.root_side
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn branching_factor(&self) -> u32 {
        self.branching_factor
    }

    /// Whether user annotation is currently permitted
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub(crate) fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// All nodes in pre-order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Get a node by ID, failing on unknown ids
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id)
            .ok_or_else(|| EngineError::InvalidParameter(format!("no node with id {}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id as usize)
            .ok_or_else(|| EngineError::InvalidParameter(format!("no node with id {}", id)))
    }

    /// Id of the `k`-th child of `id`.
    pub fn child(&self, id: NodeId, k: usize) -> Result<NodeId> {
        let node = self.node(id)?;
        node.children().get(k).copied().ok_or_else(|| {
            EngineError::InvalidParameter(format!(
                "node {} only holds {} children, asked for index {}",
                id,
                node.arity(),
                k
            ))
        })
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// `(id, value)` of every leaf, left to right
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, i32)> + '_ {
        self.nodes.iter().filter_map(|n| match n {
            Node::Leaf { id, value, .. } => Some((*id, *value)),
            Node::Internal { .. } => None,
        })
    }

    /// Ids of all internal nodes in pre-order
    pub fn internal_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter(|n| !n.is_leaf()).map(Node::id)
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.editable {
            Ok(())
        } else {
            Err(EngineError::IllegalMutation(
                "tree is frozen; reset it before editing".to_string(),
            ))
        }
    }

    /// Enter a value for an internal node.
    pub fn set_value(&mut self, id: NodeId, new_value: i32) -> Result<()> {
        self.ensure_editable()?;
        self.write_value(id, Some(new_value))
    }

    /// Remove the user's value from an internal node.
    pub fn clear_value(&mut self, id: NodeId) -> Result<()> {
        self.ensure_editable()?;
        self.write_value(id, None)
    }

    /// Mark or unmark the edge from `id` to its parent as pruned.
    pub fn set_pruned(&mut self, id: NodeId, pruned: bool) -> Result<()> {
        self.ensure_editable()?;
        self.write_pruned(id, pruned)
    }

    /// Flip the pruning mark on the edge to `id`. Returns the new state.
    pub fn toggle_pruned(&mut self, id: NodeId) -> Result<bool> {
        self.ensure_editable()?;
        let flipped = !self.node(id)?.is_pruned();
        self.write_pruned(id, flipped)?;
        Ok(flipped)
    }

    fn write_value(&mut self, id: NodeId, new_value: Option<i32>) -> Result<()> {
        match self.node_mut(id)? {
            Node::Internal { value, .. } => {
                *value = new_value;
                Ok(())
            }
            Node::Leaf { .. } => Err(EngineError::IllegalMutation(format!(
                "node {} is a leaf; leaf values are fixed",
                id
            ))),
        }
    }

    fn write_pruned(&mut self, id: NodeId, pruned: bool) -> Result<()> {
        match self.node_mut(id)?.parent_mut() {
            Some(edge) => {
                edge.pruned = pruned;
                Ok(())
            }
            None => Err(EngineError::InvalidParameter(format!(
                "node {} has no parent edge",
                id
            ))),
        }
    }
}

#[derive(Clone, Copy)]
struct Shape {
    depth: u32,
    branching_factor: u32,
}

/// Push the subtree rooted at `level` in pre-order and return its id.
fn build_subtree(
    nodes: &mut Vec<Node>,
    leaves: &mut impl Iterator<Item = i32>,
    shape: Shape,
    side: Side,
    level: u32,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    let id = nodes.len() as NodeId;
    let edge = parent.map(|parent| Edge { parent, pruned: false });

    if level == shape.depth {
        let value = leaves.next().ok_or_else(|| {
            EngineError::InvalidParameter("ran out of leaf values".to_string())
        })?;
        nodes.push(Node::Leaf { id, depth: level, parent: edge, value });
        return Ok(id);
    }

    nodes.push(Node::Internal {
        id,
        side,
        depth: level,
        parent: edge,
        children: Vec::new(),
        value: None,
        alpha: None,
        beta: None,
    });

    let mut child_ids = Vec::with_capacity(shape.branching_factor as usize);
    for _ in 0..shape.branching_factor {
        child_ids.push(build_subtree(nodes, leaves, shape, side.opponent(), level + 1, Some(id))?);
    }
    if let Node::Internal { children, .. } = &mut nodes[id as usize] {
        *children = child_ids;
    }
    Ok(id)
}
