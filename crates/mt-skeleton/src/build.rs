use mt_core::{ImageView, Point2f};

use crate::graph::{EdgeId, GraphEdge, Node, NodeId, NodeKind, SkeletonGraph};

const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, -1, -1, -1, 0, 1, 1, 1];
const DIRS: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
const NO_NODE: u32 = u32::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonGraphConfig {
    /// Components with fewer pixels are ignored.
    pub min_component_size: usize,
}

impl Default for SkeletonGraphConfig {
    fn default() -> Self {
        Self {
            min_component_size: 8,
        }
    }
}

/// Builds the topological graph of a one-pixel-wide skeleton.
///
/// Non-zero pixels are skeleton. Pixels whose degree is not 2 become nodes,
/// runs of degree-2 pixels become edges, and components made only of
/// degree-2 pixels become a single loop edge on a [`NodeKind::LoopAnchor`].
///
/// Pixels are 8-connected, but a diagonal step only links two pixels when
/// both pixels beside the step are unset, so staircases stay simple chains.
pub fn build_skeleton_graph(
    skeleton: &ImageView<'_, u8>,
    cfg: &SkeletonGraphConfig,
) -> SkeletonGraph {
    let width = skeleton.width();
    let height = skeleton.height();
    let mut graph = SkeletonGraph {
        width,
        height,
        ..SkeletonGraph::default()
    };
    if width == 0 || height == 0 {
        return graph;
    }

    let grid = Grid { width, height };

    let mut raw = Vec::with_capacity(width * height);
    for y in 0..height {
        raw.extend(skeleton.row(y).iter().map(|&v| u8::from(v != 0)));
    }
    let active = grid.drop_small_components(&raw, cfg.min_component_size);
    let n = active.len();

    let mut deg = vec![0_u8; n];
    for p in 0..n {
        if active[p] != 0 {
            deg[p] = DIRS
                .iter()
                .filter(|&&d| grid.neighbor(p, d, &active).is_some())
                .count() as u8;
        }
    }

    let mut node_at = vec![NO_NODE; n];
    for p in 0..n {
        if active[p] != 0 && deg[p] != 2 {
            let kind = kind_from_degree(deg[p]);
            push_node(&mut graph.nodes, &mut node_at, p, width, deg[p], kind);
        }
    }

    let mut used_link = vec![0_u8; n];

    let mut start_node = 0;
    while start_node < graph.nodes.len() {
        let (sx, sy) = graph.nodes[start_node].idx;
        let start = sy * width + sx;

        for &dir in &DIRS {
            let Some(first) = grid.neighbor(start, dir, &active) else {
                continue;
            };
            if is_link_used(&used_link, start, dir) {
                continue;
            }

            let chain = grid.trace_chain(start, first, dir, &active, &node_at, &mut used_link);
            let end_node = node_for(
                &mut graph.nodes,
                &mut node_at,
                chain.end,
                width,
                &deg,
                NodeKind::End,
            );
            let is_loop = chain.closed && end_node == start_node;
            push_edge(&mut graph.edges, start_node, end_node, chain.points, is_loop);
        }

        start_node += 1;
    }

    // Components made only of degree-2 pixels.
    for p in 0..n {
        if active[p] == 0 {
            continue;
        }

        for &dir in &DIRS {
            let Some(next) = grid.neighbor(p, dir, &active) else {
                continue;
            };
            if is_link_used(&used_link, p, dir) {
                continue;
            }

            let anchor = node_for(
                &mut graph.nodes,
                &mut node_at,
                p,
                width,
                &deg,
                NodeKind::LoopAnchor,
            );
            let chain = grid.trace_chain(p, next, dir, &active, &node_at, &mut used_link);
            let (b, is_loop) = if chain.closed {
                (anchor, true)
            } else {
                let end = node_for(
                    &mut graph.nodes,
                    &mut node_at,
                    chain.end,
                    width,
                    &deg,
                    NodeKind::End,
                );
                (end, end == anchor)
            };
            push_edge(&mut graph.edges, anchor, b, chain.points, is_loop);
        }
    }

    for edge in &graph.edges {
        graph.nodes[edge.a].incident_edges.push(edge.id);
        if edge.a != edge.b {
            graph.nodes[edge.b].incident_edges.push(edge.id);
        }
    }

    log::debug!(
        "skeleton graph {}x{}: {} nodes ({} junctions, {} ends), {} edges ({} loops), {:.1}px",
        width,
        height,
        graph.nodes.len(),
        graph.num_junctions(),
        graph.num_ends(),
        graph.edges.len(),
        graph.num_loops(),
        graph.total_length()
    );

    graph
}

struct Chain {
    points: Vec<Point2f>,
    end: usize,
    closed: bool,
}

struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    fn point(&self, p: usize) -> Point2f {
        Point2f::new((p % self.width) as f32, (p / self.width) as f32)
    }

    fn trace_chain(
        &self,
        start: usize,
        first: usize,
        start_dir: u8,
        active: &[u8],
        node_at: &[u32],
        used_link: &mut [u8],
    ) -> Chain {
        let mut points = vec![self.point(start)];
        let mut prev = start;
        let mut cur = first;
        let mut dir = start_dir;

        for _ in 0..active.len().max(1) {
            mark_link_both(used_link, prev, dir, cur);
            if cur == start {
                return Chain {
                    points,
                    end: start,
                    closed: true,
                };
            }

            points.push(self.point(cur));
            if node_at[cur] != NO_NODE {
                break;
            }

            let Some((next_dir, next)) = self.next_neighbor(cur, prev, active, used_link) else {
                break;
            };

            if next == start {
                mark_link_both(used_link, cur, next_dir, start);
                return Chain {
                    points,
                    end: start,
                    closed: true,
                };
            }

            prev = cur;
            cur = next;
            dir = next_dir;
        }

        Chain {
            points,
            end: cur,
            closed: false,
        }
    }

    fn next_neighbor(
        &self,
        cur: usize,
        prev: usize,
        active: &[u8],
        used_link: &[u8],
    ) -> Option<(u8, usize)> {
        let mut fallback = None;
        for &dir in &DIRS {
            let Some(nb) = self.neighbor(cur, dir, active) else {
                continue;
            };
            if nb == prev {
                continue;
            }

            if !is_link_used(used_link, cur, dir) {
                return Some((dir, nb));
            }
            if fallback.is_none() {
                fallback = Some((dir, nb));
            }
        }

        fallback
    }

    fn drop_small_components(&self, raw: &[u8], min_component_size: usize) -> Vec<u8> {
        if min_component_size <= 1 {
            return raw.to_vec();
        }

        let n = raw.len();
        let mut active = vec![0_u8; n];
        let mut seen = vec![false; n];
        let mut stack = Vec::new();
        let mut component = Vec::new();
        let mut dropped = 0usize;

        for i in 0..n {
            if raw[i] == 0 || seen[i] {
                continue;
            }

            stack.clear();
            component.clear();
            seen[i] = true;
            stack.push(i);

            while let Some(p) = stack.pop() {
                component.push(p);
                for &dir in &DIRS {
                    if let Some(nb) = self.neighbor(p, dir, raw)
                        && !seen[nb]
                    {
                        seen[nb] = true;
                        stack.push(nb);
                    }
                }
            }

            if component.len() >= min_component_size {
                for &p in &component {
                    active[p] = 1;
                }
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            log::debug!("dropped {dropped} skeleton components below {min_component_size} pixels");
        }

        active
    }

    /// Neighbor of `p` in direction `dir` if it is set and linked.
    #[inline]
    fn neighbor(&self, p: usize, dir: u8, occupancy: &[u8]) -> Option<usize> {
        let x = (p % self.width) as isize;
        let y = (p / self.width) as isize;
        let dx = DX[dir as usize];
        let dy = DY[dir as usize];

        let nb = self.index(x + dx, y + dy)?;
        if occupancy[nb] == 0 {
            return None;
        }

        if dx != 0 && dy != 0 {
            let side_set = |i: Option<usize>| i.is_some_and(|i| occupancy[i] != 0);
            if side_set(self.index(x + dx, y)) || side_set(self.index(x, y + dy)) {
                return None;
            }
        }

        Some(nb)
    }

    #[inline]
    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

fn push_node(
    nodes: &mut Vec<Node>,
    node_at: &mut [u32],
    pixel: usize,
    width: usize,
    degree: u8,
    kind: NodeKind,
) -> NodeId {
    let id = nodes.len();
    node_at[pixel] = id as u32;
    nodes.push(Node {
        id,
        kind,
        idx: (pixel % width, pixel / width),
        degree: degree as usize,
        incident_edges: Vec::new(),
    });
    id
}

/// Node at `pixel`, created on demand. Degree-2 pixels get `fallback_kind`.
fn node_for(
    nodes: &mut Vec<Node>,
    node_at: &mut [u32],
    pixel: usize,
    width: usize,
    deg: &[u8],
    fallback_kind: NodeKind,
) -> NodeId {
    if node_at[pixel] != NO_NODE {
        return node_at[pixel] as usize;
    }

    let kind = match deg[pixel] {
        2 => fallback_kind,
        d => kind_from_degree(d),
    };
    push_node(nodes, node_at, pixel, width, deg[pixel], kind)
}

fn push_edge(
    edges: &mut Vec<GraphEdge>,
    a: NodeId,
    b: NodeId,
    points: Vec<Point2f>,
    is_loop: bool,
) {
    let id: EdgeId = edges.len();
    edges.push(GraphEdge {
        id,
        a,
        b,
        length: arc_length(&points, is_loop),
        points,
        is_loop,
    });
}

fn kind_from_degree(d: u8) -> NodeKind {
    match d {
        0 => NodeKind::Isolated,
        1 => NodeKind::End,
        _ => NodeKind::Junction,
    }
}

fn arc_length(points: &[Point2f], closed: bool) -> f32 {
    let open: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(&first), Some(&last)) if points.len() > 1 => open + last.distance(first),
        _ => open,
    }
}

#[inline]
fn opposite_dir(dir: u8) -> u8 {
    (dir + 4) & 7
}

#[inline]
fn is_link_used(used_link: &[u8], p: usize, dir: u8) -> bool {
    used_link[p] & (1_u8 << dir) != 0
}

#[inline]
fn mark_link_both(used_link: &mut [u8], a: usize, dir_ab: u8, b: usize) {
    used_link[a] |= 1_u8 << dir_ab;
    used_link[b] |= 1_u8 << opposite_dir(dir_ab);
}
