use mt_core::Point2f;

pub type NodeId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    End,
    Junction,
    Isolated,
    LoopAnchor,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub idx: (usize, usize),
    pub degree: usize,
    pub incident_edges: Vec<EdgeId>,
}

impl Node {
    pub fn position(&self) -> Point2f {
        Point2f::new(self.idx.0 as f32, self.idx.1 as f32)
    }
}

/// A run of skeleton pixels between two nodes (or around a loop).
///
/// `points` starts at node `a`'s pixel and walks towards `b`. Loop edges do
/// not repeat the anchor pixel at the end.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
    pub points: Vec<Point2f>,
    pub length: f32,
    pub is_loop: bool,
}

impl GraphEdge {
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.a == node { self.b } else { self.a }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkeletonGraph {
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<Node>,
    pub edges: Vec<GraphEdge>,
}

impl SkeletonGraph {
    pub fn num_junctions(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Junction)
            .count()
    }

    pub fn num_ends(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::End)
            .count()
    }

    pub fn num_loops(&self) -> usize {
        self.edges.iter().filter(|e| e.is_loop).count()
    }

    pub fn total_length(&self) -> f32 {
        self.edges.iter().map(|e| e.length).sum()
    }
}
