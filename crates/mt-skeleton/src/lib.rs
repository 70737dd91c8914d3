//! Skeleton topology and closed-loop selection.
//!
//! A thinned track mask is turned into a graph whose nodes are skeleton
//! pixels with degree `!= 2` and whose edges are the pixel runs between them.
//! Pure loop components are represented by a loop edge on a
//! [`NodeKind::LoopAnchor`] node.
//!
//! [`select_longest_cycle`] then reduces the graph to the race loop: the
//! simple cycle with the largest total length. Stray marks, spurs and smaller
//! loops are discarded but counted, so callers can flag ambiguous masks. A
//! search that runs out of steps before its first cycle reports
//! [`CycleSearchError::Exhausted`] rather than a missing loop.

mod build;
mod cycle;
mod error;
mod graph;

pub use build::{SkeletonGraphConfig, build_skeleton_graph};
pub use cycle::{CycleSearchConfig, CycleSelection, orient_cycle, select_longest_cycle};
pub use error::CycleSearchError;
pub use graph::{EdgeId, GraphEdge, Node, NodeId, NodeKind, SkeletonGraph};
