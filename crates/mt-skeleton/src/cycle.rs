use std::collections::HashSet;

use mt_core::{Point2f, Polyline2f};

use crate::error::CycleSearchError;
use crate::graph::{EdgeId, NodeId, SkeletonGraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSearchConfig {
    /// Upper bound on edge expansions during cycle enumeration.
    pub max_steps: usize,
}

impl Default for CycleSearchConfig {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
        }
    }
}

/// The longest simple cycle of a skeleton graph.
#[derive(Debug, Clone)]
pub struct CycleSelection {
    /// Edges in walking order; `true` means the edge is walked from `b` to `a`.
    pub edges: Vec<(EdgeId, bool)>,
    /// Pixel centerline: positive signed area, starting at the raster-first
    /// pixel, closing point not repeated.
    pub points: Vec<Point2f>,
    pub length: f32,
    /// Number of distinct simple cycles seen.
    pub candidates: usize,
    pub runner_up_length: Option<f32>,
    /// The step budget ran out before every cycle was enumerated.
    pub exhausted: bool,
}

impl CycleSelection {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates > 1 || self.exhausted
    }

    /// `1.0` for an unambiguous loop, otherwise the share of the winner in
    /// `winner + runner_up`.
    pub fn confidence(&self) -> f32 {
        match self.runner_up_length {
            Some(r) if self.length + r > 0.0 => self.length / (self.length + r),
            _ => 1.0,
        }
    }
}

/// Picks the simple cycle with the largest total edge length.
///
/// Spurs are pruned first (2-core), then cycles are enumerated by depth-first
/// search from every node over higher-numbered nodes only, so each cycle is
/// rooted at its smallest node. Cycles are deduplicated by edge set; ties keep
/// the first one found.
///
/// Fails with [`CycleSearchError::NoCycle`] when the graph has no cycle, and
/// with [`CycleSearchError::Exhausted`] when the step budget ran out before
/// the first one was found.
pub fn select_longest_cycle(
    graph: &SkeletonGraph,
    cfg: &CycleSearchConfig,
) -> Result<CycleSelection, CycleSearchError> {
    let alive = two_core_edges(graph);
    let n_alive = alive.iter().filter(|&&a| a).count();
    if n_alive == 0 {
        log::debug!("skeleton graph has no cycle after pruning spurs");
        return Err(CycleSearchError::NoCycle);
    }

    let mut search = Search {
        graph,
        alive: &alive,
        max_steps: cfg.max_steps,
        steps: 0,
        seen: HashSet::new(),
        best: None,
        runner_up: None,
    };

    let mut exhausted = false;
    for s in 0..graph.nodes.len() {
        if !search.enumerate_from(s) {
            exhausted = true;
            break;
        }
    }

    let Some((length, edges)) = search.best else {
        if !exhausted {
            return Err(CycleSearchError::NoCycle);
        }
        log::warn!("cycle search stopped after {} steps before finding any loop", cfg.max_steps);
        return Err(CycleSearchError::Exhausted {
            steps: cfg.max_steps,
        });
    };
    if exhausted {
        log::warn!(
            "cycle search stopped after {} steps; keeping the longest loop found so far",
            cfg.max_steps
        );
    }

    let mut points = cycle_points(graph, &edges);
    orient_cycle(&mut points);

    Ok(CycleSelection {
        edges,
        points,
        length,
        candidates: search.seen.len(),
        runner_up_length: search.runner_up,
        exhausted,
    })
}

/// Reorders a closed pixel loop to positive signed area, starting at the
/// raster-first point (smallest `y`, then smallest `x`).
pub fn orient_cycle(points: &mut [Point2f]) {
    if points.len() < 3 {
        return;
    }

    let area = Polyline2f::new(points.to_vec()).signed_area();
    if area < 0.0 {
        points.reverse();
    }

    let start = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    points.rotate_left(start);
}

struct Search<'a> {
    graph: &'a SkeletonGraph,
    alive: &'a [bool],
    max_steps: usize,
    steps: usize,
    seen: HashSet<Vec<EdgeId>>,
    best: Option<(f32, Vec<(EdgeId, bool)>)>,
    runner_up: Option<f32>,
}

impl Search<'_> {
    /// Enumerates cycles rooted at `s`. Returns `false` when the step budget
    /// is exhausted.
    fn enumerate_from(&mut self, s: NodeId) -> bool {
        let graph = self.graph;
        let nodes = &graph.nodes;
        let edges = &graph.edges;
        if !nodes[s].incident_edges.iter().any(|&e| self.alive[e]) {
            return true;
        }

        let mut on_path = vec![false; nodes.len()];
        let mut used = vec![false; edges.len()];
        let mut path: Vec<(EdgeId, bool)> = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = vec![(s, 0)];
        on_path[s] = true;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&e) = nodes[node].incident_edges.get(frame.1) else {
                stack.pop();
                on_path[node] = false;
                if !stack.is_empty()
                    && let Some((pe, _)) = path.pop()
                {
                    used[pe] = false;
                }
                continue;
            };
            frame.1 += 1;

            if self.steps >= self.max_steps {
                return false;
            }
            self.steps += 1;

            if !self.alive[e] || used[e] {
                continue;
            }

            let edge = &edges[e];
            let reversed = edge.a != node;
            let other = edge.other(node);

            if other == s {
                path.push((e, reversed));
                self.record(&path);
                path.pop();
                continue;
            }
            if other < s || on_path[other] {
                continue;
            }

            used[e] = true;
            on_path[other] = true;
            path.push((e, reversed));
            stack.push((other, 0));
        }

        true
    }

    fn record(&mut self, path: &[(EdgeId, bool)]) {
        let mut key: Vec<EdgeId> = path.iter().map(|&(e, _)| e).collect();
        key.sort_unstable();
        if !self.seen.insert(key) {
            return;
        }

        let length: f32 = path.iter().map(|&(e, _)| self.graph.edges[e].length).sum();
        match &self.best {
            Some((best, _)) if length <= *best => {
                if self.runner_up.is_none_or(|r| length > r) {
                    self.runner_up = Some(length);
                }
            }
            _ => {
                if let Some((prev, _)) = self.best.take() {
                    self.runner_up = Some(prev);
                }
                self.best = Some((length, path.to_vec()));
            }
        }
    }
}

/// Marks the edges that survive repeated removal of nodes with degree <= 1.
fn two_core_edges(graph: &SkeletonGraph) -> Vec<bool> {
    let mut alive = vec![true; graph.edges.len()];
    let mut degree: Vec<usize> = graph
        .nodes
        .iter()
        .map(|n| {
            n.incident_edges
                .iter()
                .map(|&e| if graph.edges[e].is_loop { 2 } else { 1 })
                .sum()
        })
        .collect();

    let mut queue: Vec<NodeId> = (0..graph.nodes.len()).filter(|&i| degree[i] <= 1).collect();
    while let Some(node) = queue.pop() {
        for &e in &graph.nodes[node].incident_edges {
            if !alive[e] {
                continue;
            }
            alive[e] = false;
            degree[node] = degree[node].saturating_sub(1);

            let other = graph.edges[e].other(node);
            if other != node {
                degree[other] -= 1;
                if degree[other] == 1 {
                    queue.push(other);
                }
            }
        }
    }

    alive
}

fn cycle_points(graph: &SkeletonGraph, edges: &[(EdgeId, bool)]) -> Vec<Point2f> {
    let mut points: Vec<Point2f> = Vec::new();
    for &(e, reversed) in edges {
        let pts = &graph.edges[e].points;
        if reversed {
            pts.iter().rev().for_each(|&p| push_distinct(&mut points, p));
        } else {
            pts.iter().for_each(|&p| push_distinct(&mut points, p));
        }
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn push_distinct(points: &mut Vec<Point2f>, p: Point2f) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}
