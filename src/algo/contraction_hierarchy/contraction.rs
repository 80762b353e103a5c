//! The machinery shared by both contraction variants: a mutable graph
//! representation, shortcut insertion and the witness search.

use super::*;
use crate::algo::dijkstra::State;
use crate::datastr::{index_heap::*, timestamped_vector::*};

/// Budget of a single witness search.
///
/// The search gives up beyond these limits, which errs on the safe side:
/// a witness that goes undetected only means an unnecessary shortcut,
/// never a wrong distance.
#[derive(Debug, Clone, Copy)]
pub struct WitnessParams {
    /// maximum number of edges on a witness path
    pub hop_limit: u32,
    /// maximum number of nodes settled per search
    pub max_settled: usize,
}

impl Default for WitnessParams {
    fn default() -> Self {
        WitnessParams {
            hop_limit: 5,
            max_settled: 500,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Arc {
    pub node: NodeId,
    pub weight: Weight,
    pub middle: InRangeOption<NodeId>,
}

// Insert an arc, or lower the weight of the existing one to that node.
// Keeping a single arc per node pair makes edge ids unambiguous later.
fn insert_or_decrease(arcs: &mut Vec<Arc>, node: NodeId, weight: Weight, middle: InRangeOption<NodeId>) -> bool {
    for arc in arcs.iter_mut() {
        if arc.node == node {
            if weight < arc.weight {
                arc.weight = weight;
                arc.middle = middle;
            }
            return false;
        }
    }

    arcs.push(Arc { node, weight, middle });
    true
}

/// Intermediate graph representation for the preprocessing.
/// Contraction needs a mutable graph with incoming edge access, so we
/// keep per-node arc lists in both directions instead of an adjacency
/// array. Contracted nodes stay in the lists (their arcs become the
/// hierarchy) and are masked out of the neighborhood iterators.
#[derive(Debug)]
pub(super) struct ContractionGraph {
    outgoing: Vec<Vec<Arc>>,
    incoming: Vec<Vec<Arc>>,
    contracted: Vec<bool>,
    num_shortcuts: usize,
}

impl ContractionGraph {
    pub fn new<G: for<'a> LinkIterGraph<'a>>(graph: &G) -> ContractionGraph {
        let n = graph.num_nodes();
        let mut outgoing: Vec<Vec<Arc>> = (0..n).map(|_| Vec::new()).collect();
        let mut incoming: Vec<Vec<Arc>> = (0..n).map(|_| Vec::new()).collect();

        for node in 0..(n as NodeId) {
            for Link { node: head, weight } in graph.neighbor_iter(node) {
                // loops never appear on shortest paths, parallels collapse to the cheapest
                if head == node {
                    continue;
                }
                insert_or_decrease(&mut outgoing[node as usize], head, weight, InRangeOption::none());
                insert_or_decrease(&mut incoming[head as usize], node, weight, InRangeOption::none());
            }
        }

        ContractionGraph {
            outgoing,
            incoming,
            contracted: vec![false; n],
            num_shortcuts: 0,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.contracted.len()
    }

    pub fn num_shortcuts(&self) -> usize {
        self.num_shortcuts
    }

    pub fn uncontracted_out(&self, node: NodeId) -> impl Iterator<Item = Arc> + '_ {
        self.outgoing[node as usize].iter().copied().filter(|arc| !self.contracted[arc.node as usize])
    }

    pub fn uncontracted_in(&self, node: NodeId) -> impl Iterator<Item = Arc> + '_ {
        self.incoming[node as usize].iter().copied().filter(|arc| !self.contracted[arc.node as usize])
    }

    /// All uncontracted nodes with an arc from or to `node`, each once.
    pub fn uncontracted_neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let mut neighbors: Vec<NodeId> = self.uncontracted_out(node).chain(self.uncontracted_in(node)).map(|arc| arc.node).collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// The shortcuts contracting `node` would make necessary:
    /// for each uncontracted pair (u, node), (node, v) with u != v the
    /// witness search checks whether a path of at most the combined
    /// weight survives without `node`. Only pairs without such a
    /// witness are returned.
    pub fn required_shortcuts(&self, node: NodeId, witness: &mut WitnessSearch) -> Vec<(NodeId, NodeId, Weight)> {
        let mut shortcuts = Vec::new();
        let incoming: Vec<Arc> = self.uncontracted_in(node).collect();
        let outgoing: Vec<Arc> = self.uncontracted_out(node).collect();

        for &Arc { node: from, weight: from_weight, .. } in &incoming {
            // one search from `from` covers all pairs, capped at the longest candidate
            let cap = outgoing
                .iter()
                .filter(|arc| arc.node != from)
                .map(|arc| from_weight + arc.weight)
                .max();
            let cap = match cap {
                Some(cap) => cap,
                None => continue,
            };
            witness.run(self, from, node, cap);

            for &Arc { node: to, weight: to_weight, .. } in &outgoing {
                if to == from {
                    continue;
                }
                let path_weight = from_weight + to_weight;
                if witness.distance(to) > path_weight {
                    shortcuts.push((from, to, path_weight));
                }
            }
        }

        shortcuts
    }

    /// Contract `node`. Returns the number of edges removed from the
    /// remaining graph and the number of shortcuts required.
    pub fn contract_node(&mut self, node: NodeId, witness: &mut WitnessSearch) -> (usize, usize) {
        let shortcuts = self.required_shortcuts(node, witness);
        let removed = self.uncontracted_in(node).count() + self.uncontracted_out(node).count();

        for &(from, to, weight) in &shortcuts {
            let middle = InRangeOption::some(node);
            let new_out = insert_or_decrease(&mut self.outgoing[from as usize], to, weight, middle);
            let new_in = insert_or_decrease(&mut self.incoming[to as usize], from, weight, middle);
            debug_assert_eq!(new_out, new_in);
            if new_out {
                self.num_shortcuts += 1;
            }
        }
        self.contracted[node as usize] = true;

        (removed, shortcuts.len())
    }

    /// `shortcuts needed - edges removed` if `node` were contracted now.
    pub fn edge_difference(&self, node: NodeId, witness: &mut WitnessSearch) -> i64 {
        let shortcuts = self.required_shortcuts(node, witness).len() as i64;
        let removed = (self.uncontracted_in(node).count() + self.uncontracted_out(node).count()) as i64;
        shortcuts - removed
    }

    /// Freeze the accumulated arcs into the final hierarchy.
    pub fn into_contracted(self, order: NodeOrder) -> ContractedGraph {
        let n = self.outgoing.len();
        let mut adjacency_lists: Vec<Vec<Link>> = Vec::with_capacity(n);
        let mut middle = Vec::new();

        for arcs in self.outgoing {
            let mut links = Vec::with_capacity(arcs.len());
            for Arc { node, weight, middle: over } in arcs {
                links.push(Link { node, weight });
                middle.push(over);
            }
            adjacency_lists.push(links);
        }

        ContractedGraph::new(OwnedGraph::from_adjacency_lists(adjacency_lists), middle, order)
    }
}

/// A bounded one-to-many Dijkstra over the uncontracted part of the
/// graph, avoiding the contraction candidate. State is recycled across
/// the many runs of a preprocessing pass.
#[derive(Debug)]
pub struct WitnessSearch {
    distances: TimestampedVector<Weight>,
    hops: TimestampedVector<u32>,
    queue: IndexedMinHeap<State<Weight>>,
    params: WitnessParams,
}

impl WitnessSearch {
    pub fn new(n: usize, params: WitnessParams) -> WitnessSearch {
        WitnessSearch {
            distances: TimestampedVector::new(n, INFINITY),
            hops: TimestampedVector::new(n, 0),
            queue: IndexedMinHeap::new(n),
            params,
        }
    }

    pub(super) fn run(&mut self, graph: &ContractionGraph, from: NodeId, avoid: NodeId, cap: Weight) {
        self.queue.clear();
        self.distances.reset();
        self.hops.reset();
        self.distances.set(from as usize, 0);
        self.queue.push(State { key: 0, node: from });

        let mut settled = 0;

        while let Some(State { key: distance, node }) = self.queue.pop() {
            // everything left is longer than any candidate shortcut
            if distance > cap {
                break;
            }
            settled += 1;
            if settled > self.params.max_settled {
                break;
            }

            let hops = self.hops[node as usize];
            if hops >= self.params.hop_limit {
                continue;
            }

            for arc in graph.uncontracted_out(node) {
                if arc.node == avoid {
                    continue;
                }
                let next_distance = distance + arc.weight;
                if next_distance < self.distances[arc.node as usize] {
                    self.distances.set(arc.node as usize, next_distance);
                    self.hops.set(arc.node as usize, hops + 1);

                    let next = State {
                        key: next_distance,
                        node: arc.node,
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

    /// Tentative distance of the last run, INFINITY if unreached.
    pub fn distance(&self, node: NodeId) -> Weight {
        self.distances[node as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // a -> b -> c with a direct a -> c of weight 3,
    // contracting b requires a shortcut of weight 2
    fn triangle(direct_weight: Weight) -> OwnedGraph {
        OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![1, direct_weight, 1])
    }

    #[test]
    fn shortcut_needed_without_witness() {
        let graph = triangle(3);
        let mut cg = ContractionGraph::new(&graph);
        let mut witness = WitnessSearch::new(3, WitnessParams::default());

        let shortcuts = cg.required_shortcuts(1, &mut witness);
        assert_eq!(shortcuts, vec![(0, 2, 2)]);

        cg.contract_node(1, &mut witness);
        assert_eq!(cg.num_shortcuts(), 0); // decreased the existing a -> c edge

        let ch = cg.into_contracted(NodeOrder::from_node_order(vec![1, 0, 2]));
        let edge = ch.graph().edge_index(0, 2).unwrap();
        assert_eq!(ch.graph().link(edge).weight, 2);
        assert_eq!(ch.middle(edge), Some(1));
    }

    #[test]
    fn witness_makes_shortcut_unnecessary() {
        let graph = triangle(1);
        let mut cg = ContractionGraph::new(&graph);
        let mut witness = WitnessSearch::new(3, WitnessParams::default());

        assert_eq!(cg.required_shortcuts(1, &mut witness), vec![]);

        cg.contract_node(1, &mut witness);
        let ch = cg.into_contracted(NodeOrder::from_node_order(vec![1, 0, 2]));
        assert_eq!(ch.num_shortcuts(), 0);
        let edge = ch.graph().edge_index(0, 2).unwrap();
        assert_eq!(ch.graph().link(edge).weight, 1);
        assert_eq!(ch.middle(edge), None);
    }

    #[test]
    fn exhausted_hop_budget_inserts_conservatively() {
        // witness path 0 -> 2 -> 3 -> 4 -> 1 of weight 4 matches the
        // candidate 0 -> 5 -> 1 of weight 4, but needs 4 hops
        let graph = OwnedGraph::new(
            vec![0, 2, 2, 3, 4, 5, 6],
            vec![2, 5, 3, 4, 1, 1],
            vec![1, 2, 1, 1, 1, 2],
        );
        let params = WitnessParams {
            hop_limit: 2,
            ..Default::default()
        };

        let mut cg = ContractionGraph::new(&graph);
        let mut witness = WitnessSearch::new(6, params);
        // the witness stays hidden behind the hop limit, so the shortcut is inserted
        assert_eq!(cg.required_shortcuts(5, &mut witness), vec![(0, 1, 4)]);

        let mut unbounded = WitnessSearch::new(6, WitnessParams::default());
        assert_eq!(cg.required_shortcuts(5, &mut unbounded), vec![]);
    }

    #[test]
    fn edge_difference_counts_both_sides() {
        let graph = triangle(3);
        let mut cg = ContractionGraph::new(&graph);
        let mut witness = WitnessSearch::new(3, WitnessParams::default());

        // contracting b removes (a,b) and (b,c) and adds one shortcut
        assert_eq!(cg.edge_difference(1, &mut witness), -1);
        // contracting a removes two outgoing edges and adds nothing
        assert_eq!(cg.edge_difference(0, &mut witness), -2);
    }
}
