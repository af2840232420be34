//! Roadmap search ([`spec.md` §4.H]): start/goal attachment by nearest
//! neighbour, then A* with an early-exit visitor per candidate
//! `(start, goal)` neighbour pair, first success wins.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::Graph;

#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Found { path: Vec<u32>, cost: f64 },
    Exhausted,
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

/// The `k` nearest graph vertices to `query` within `radius`, ascending
/// by distance.
pub fn nearest_vertices(graph: &Graph, query: &[f64], k: usize, radius: f64) -> Vec<u32> {
    let mut dists: Vec<(f64, u32)> = graph
        .vertices
        .iter()
        .enumerate()
        .map(|(i, v)| (euclidean(v, query), i as u32))
        .filter(|(d, _)| *d <= radius)
        .collect();
    dists.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    dists.truncate(k);
    dists.into_iter().map(|(_, i)| i).collect()
}

#[derive(Copy, Clone)]
struct HeapEntry {
    f: f64,
    vertex: u32,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest `f`.
        other.f.partial_cmp(&self.f).unwrap_or(Ordering::Equal)
    }
}

/// A* from `start` to `goal` with heuristic `h(v) = Euclidean(v, goal)`;
/// aborts (returns `Found`) the instant `goal` is popped off the open
/// set, never expanding past it.
pub fn astar(graph: &Graph, start: u32, goal: u32) -> SearchOutcome {
    let adj = graph.adjacency();
    let n = graph.num_vertices();
    let goal_coords = &graph.vertices[goal as usize];

    let mut g_score = vec![f64::INFINITY; n];
    let mut came_from = vec![u32::MAX; n];
    let mut visited = vec![false; n];
    let mut open = BinaryHeap::new();

    g_score[start as usize] = 0.0;
    open.push(HeapEntry { f: euclidean(&graph.vertices[start as usize], goal_coords), vertex: start });

    while let Some(HeapEntry { vertex, .. }) = open.pop() {
        if visited[vertex as usize] {
            continue;
        }
        visited[vertex as usize] = true;
        if vertex == goal {
            return SearchOutcome::Found { path: reconstruct(&came_from, start, goal), cost: g_score[goal as usize] };
        }
        for &(neighbor, weight) in &adj[vertex as usize] {
            let tentative = g_score[vertex as usize] + weight;
            if tentative < g_score[neighbor as usize] {
                g_score[neighbor as usize] = tentative;
                came_from[neighbor as usize] = vertex;
                open.push(HeapEntry { f: tentative + euclidean(&graph.vertices[neighbor as usize], goal_coords), vertex: neighbor });
            }
        }
    }
    SearchOutcome::Exhausted
}

fn reconstruct(came_from: &[u32], start: u32, goal: u32) -> Vec<u32> {
    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        cur = came_from[cur as usize];
        path.push(cur);
    }
    path.reverse();
    path
}

/// Try every `(start-neighbour, goal-neighbour)` pair in order; the
/// first pair A* connects wins (`spec.md` §4.H's state machine).
pub fn plan(graph: &Graph, start_neighbors: &[u32], goal_neighbors: &[u32]) -> SearchOutcome {
    for &s in start_neighbors {
        for &g in goal_neighbors {
            if s == g {
                return SearchOutcome::Found { path: vec![s], cost: 0.0 };
            }
            if let SearchOutcome::Found { path, cost } = astar(graph, s, g) {
                return SearchOutcome::Found { path, cost };
            }
        }
    }
    SearchOutcome::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Graph {
        let mut g = Graph::new();
        for i in 0..n {
            g.add_vertex(vec![i as f64, 0.0]);
        }
        for i in 0..n - 1 {
            g.add_edge(i as u32, (i + 1) as u32);
        }
        g
    }

    #[test]
    fn astar_finds_shortest_path_on_a_chain() {
        let g = chain(5);
        match astar(&g, 0, 4) {
            SearchOutcome::Found { path, cost } => {
                assert_eq!(path, vec![0, 1, 2, 3, 4]);
                assert!((cost - 4.0).abs() < 1e-9);
            }
            SearchOutcome::Exhausted => panic!("expected a path"),
        }
    }

    #[test]
    fn astar_reports_exhausted_when_disconnected() {
        let mut g = chain(3);
        g.add_vertex(vec![100.0, 100.0]);
        assert_eq!(astar(&g, 0, 3), SearchOutcome::Exhausted);
    }

    #[test]
    fn nearest_vertices_respects_radius_and_k() {
        let g = chain(10);
        let within = nearest_vertices(&g, &[0.0, 0.0], 2, 1.5);
        assert_eq!(within, vec![0, 1]);
    }

    #[test]
    fn plan_tries_pairs_in_order_and_takes_the_first_hit() {
        let g = chain(5);
        let outcome = plan(&g, &[0], &[4]);
        assert!(matches!(outcome, SearchOutcome::Found { .. }));
    }
}
