//! Per-edge pruning labels for hierarchy searches.
//!
//! Both label families are computed with the same sweep: one Dijkstra
//! per source, restricted to upward edges, which propagates the first
//! edge of each shortest path to every settled node. Source ranges
//! partition the work, so separate processes can each label the edges
//! leaving their range and the results can be concatenated afterwards.

use super::*;
use crate::datastr::{index_heap::*, node_order::*, timestamped_vector::*};
use crate::util::in_range_option::InRangeOption;
use std::ops::Range;

use crate::algo::dijkstra::State;

/// For every upward edge `(s, v)` with `s` in `sources`: the maximum
/// remaining distance past `v` over all shortest up-paths which start
/// with that edge. Edges without a label hold 0.
pub fn down_distance_labels<G: RandomLinkAccessGraph>(graph: &G, order: &NodeOrder, sources: Range<NodeId>) -> Vec<Weight> {
    let mut labels = vec![0; graph.num_arcs()];
    let mut sweep = UpwardSweep::new(graph, order);

    for source in sources {
        sweep.run(source, |edge, distance, _node| {
            let remaining = distance - graph.link(edge).weight;
            labels[edge as usize] = std::cmp::max(labels[edge as usize], remaining);
        });
    }

    labels
}

/// For every upward edge `(s, v)` with `s` in `sources`: the rank of the
/// apex, the highest ranked node reached over all shortest up-paths
/// which start with that edge. Edges without a label hold 0.
pub fn apex_distance_labels<G: RandomLinkAccessGraph>(graph: &G, order: &NodeOrder, sources: Range<NodeId>) -> Vec<Rank> {
    let mut labels = vec![0; graph.num_arcs()];
    let mut sweep = UpwardSweep::new(graph, order);

    for source in sources {
        sweep.run(source, |edge, _distance, node| {
            // ranks only grow along an up-path, the apex is the settled node itself
            labels[edge as usize] = std::cmp::max(labels[edge as usize], order.rank(node));
        });
    }

    labels
}

/// Dijkstra restricted to edges towards higher ranks, tracking for each
/// settled node the first edge of its shortest path from the source.
struct UpwardSweep<'a, G> {
    graph: &'a G,
    order: &'a NodeOrder,
    distances: TimestampedVector<Weight>,
    first_hop: TimestampedVector<InRangeOption<EdgeId>>,
    queue: IndexedMinHeap<State<Weight>>,
}

impl<'a, G: RandomLinkAccessGraph> UpwardSweep<'a, G> {
    fn new(graph: &'a G, order: &'a NodeOrder) -> Self {
        let n = graph.num_nodes();
        UpwardSweep {
            graph,
            order,
            distances: TimestampedVector::new(n, INFINITY),
            first_hop: TimestampedVector::new(n, InRangeOption::none()),
            queue: IndexedMinHeap::new(n),
        }
    }

    /// Settle all nodes reachable from `source` through ascending ranks.
    /// `on_settle(first_edge, distance, node)` is invoked for every
    /// settled node except the source itself.
    fn run(&mut self, source: NodeId, mut on_settle: impl FnMut(EdgeId, Weight, NodeId)) {
        self.queue.clear();
        self.distances.reset();
        self.first_hop.reset();
        self.distances.set(source as usize, 0);
        self.queue.push(State { key: 0, node: source });

        while let Some(State { key: distance, node }) = self.queue.pop() {
            if node != source {
                let first = self.first_hop[node as usize].value().expect("settled node without first hop");
                on_settle(first, distance, node);
            }

            let rank = self.order.rank(node);
            for edge in self.graph.neighbor_edge_indices(node) {
                let Link { node: head, weight } = self.graph.link(edge);
                if self.order.rank(head) <= rank {
                    continue;
                }

                let next_distance = distance + weight;
                if next_distance < self.distances[head as usize] {
                    self.distances.set(head as usize, next_distance);
                    let first = if node == source {
                        InRangeOption::some(edge)
                    } else {
                        self.first_hop[node as usize]
                    };
                    self.first_hop.set(head as usize, first);

                    let next = State {
                        key: next_distance,
                        node: head,
                    };
                    if self.queue.contains_index(next.as_index()) {
                        self.queue.decrease_key(next);
                    } else {
                        self.queue.push(next);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ascending path a -> b -> c -> d with ranks equal to the ids
    fn ascending_path() -> (OwnedGraph, NodeOrder) {
        let graph = OwnedGraph::new(vec![0, 1, 2, 3, 3], vec![1, 2, 3], vec![1, 2, 4]);
        (graph, NodeOrder::identity(4))
    }

    #[test]
    fn down_distance_of_path_edges() {
        let (graph, order) = ascending_path();
        let labels = down_distance_labels(&graph, &order, 0..4);

        // the label of (a, b) covers the rest of the path behind b
        assert_eq!(labels, vec![2 + 4, 4, 0]);
    }

    #[test]
    fn apex_of_path_edges() {
        let (graph, order) = ascending_path();
        let labels = apex_distance_labels(&graph, &order, 0..4);

        assert_eq!(labels, vec![3, 3, 3]);
    }

    #[test]
    fn partial_range_only_labels_its_sources() {
        let (graph, order) = ascending_path();
        let labels = down_distance_labels(&graph, &order, 1..2);

        assert_eq!(labels, vec![0, 4, 0]);
    }

    #[test]
    fn branching_takes_the_maximum() {
        // 0 -> 1 forks into 1 -> 2 (weight 1) and 1 -> 3 (weight 7),
        // everything ascending with ranks equal to the ids
        let graph = OwnedGraph::new(vec![0, 1, 3, 3, 3], vec![1, 2, 3], vec![1, 1, 7]);
        let order = NodeOrder::identity(4);
        let labels = down_distance_labels(&graph, &order, 0..1);

        // the deeper branch through node 3 dominates the label of (0, 1)
        assert_eq!(labels[0], 7);
    }
}
