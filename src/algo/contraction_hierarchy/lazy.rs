//! Priority-driven node ordering.
//!
//! Nodes are contracted in the order of a dynamic priority function.
//! Priorities in the queue are allowed to go stale; a popped node is
//! revalidated against the next best candidate and re-queued if its
//! recomputed priority no longer wins. This defers the expensive
//! recomputations until they actually matter.

use super::contraction::*;
use super::*;
use crate::datastr::index_heap::*;
use crate::report::*;

/// Coefficients of the priority terms.
/// The priority of a node is the weighted sum of its edge difference,
/// its depth in the contraction hierarchy built so far and the number
/// of its already contracted neighbors. Lower means contracted earlier.
#[derive(Debug, Clone, Copy)]
pub struct PriorityParams {
    pub edge_difference: i64,
    pub depth: i64,
    pub contracted_neighbors: i64,
}

impl Default for PriorityParams {
    fn default() -> Self {
        PriorityParams {
            edge_difference: 1,
            depth: 1,
            contracted_neighbors: 1,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct PriorityEntry {
    priority: i64,
    node: NodeId,
}

impl Ord for PriorityEntry {
    #[inline]
    fn cmp(&self, rhs: &Self) -> std::cmp::Ordering {
        // the node id breaks ties, making the contraction order deterministic
        self.priority.cmp(&rhs.priority).then_with(|| self.node.cmp(&rhs.node))
    }
}

impl PartialOrd for PriorityEntry {
    #[inline]
    fn partial_cmp(&self, rhs: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Indexing for PriorityEntry {
    #[inline]
    fn as_index(&self) -> usize {
        self.node as usize
    }
}

/// CH preprocessing with lazy dynamic node ordering.
#[derive(Debug, Default)]
pub struct LazyContraction {
    priority_params: PriorityParams,
    witness_params: WitnessParams,
    verify: bool,
    partial: Option<u32>,
}

impl LazyContraction {
    pub fn new() -> LazyContraction {
        Default::default()
    }

    pub fn set_priority_params(&mut self, params: PriorityParams) {
        self.priority_params = params;
    }

    pub fn set_witness_params(&mut self, params: WitnessParams) {
        self.witness_params = params;
    }

    /// Recompute every queued priority before each contraction.
    /// Defeats the laziness, only useful to debug priority staleness.
    pub fn set_verify(&mut self, verify: bool) {
        self.verify = verify;
    }

    /// Only contract the given percentage of nodes.
    pub fn set_partial_contraction_percentage(&mut self, percentage: u32) {
        assert!((1..=100).contains(&percentage));
        self.partial = Some(percentage);
    }

    /// Run the preprocessing.
    pub fn contract<G: for<'a> LinkIterGraph<'a>>(&self, graph: &G) -> ContractedGraph {
        let n = graph.num_nodes();
        let mut contraction_graph = ContractionGraph::new(graph);
        let mut witness = WitnessSearch::new(n, self.witness_params);
        let mut depth = vec![0u32; n];
        let mut contracted_neighbors = vec![0u32; n];
        let mut ranks: Vec<Rank> = vec![n as Rank; n];
        let mut queue: IndexedMinHeap<PriorityEntry> = IndexedMinHeap::new(n);

        report!("num_nodes", n);

        for node in 0..(n as NodeId) {
            let priority = self.priority(&contraction_graph, &mut witness, &depth, &contracted_neighbors, node);
            queue.push(PriorityEntry { priority, node });
        }

        let goal = self.contraction_goal(n);
        let mut next_rank: Rank = 0;

        while (next_rank as usize) < goal {
            if self.verify {
                let queued: Vec<NodeId> = queue.elements().iter().map(|entry| entry.node).collect();
                for node in queued {
                    let priority = self.priority(&contraction_graph, &mut witness, &depth, &contracted_neighbors, node);
                    queue.update_key(PriorityEntry { priority, node });
                }
            }

            let PriorityEntry { node, .. } = match queue.pop() {
                Some(entry) => entry,
                None => break,
            };

            if !self.verify {
                // lazy validation against the next best candidate
                let priority = self.priority(&contraction_graph, &mut witness, &depth, &contracted_neighbors, node);
                if let Some(top) = queue.peek() {
                    if priority > top.priority {
                        queue.push(PriorityEntry { priority, node });
                        continue;
                    }
                }
            }

            contraction_graph.contract_node(node, &mut witness);
            ranks[node as usize] = next_rank;
            next_rank += 1;

            // neighbor priorities go stale here and are fixed up on pop
            for neighbor in contraction_graph.uncontracted_neighbors(node) {
                contracted_neighbors[neighbor as usize] += 1;
                depth[neighbor as usize] = std::cmp::max(depth[neighbor as usize], depth[node as usize] + 1);
            }
        }

        report!("num_nodes_contracted", next_rank);
        report!("num_shortcuts", contraction_graph.num_shortcuts());

        // with partial contraction the core keeps the remaining ranks in id order
        for rank in ranks.iter_mut().filter(|rank| **rank == n as Rank) {
            *rank = next_rank;
            next_rank += 1;
        }

        contraction_graph.into_contracted(NodeOrder::from_ranks(ranks))
    }

    fn contraction_goal(&self, n: usize) -> usize {
        match self.partial {
            Some(percentage) => (n * percentage as usize) / 100,
            None => n,
        }
    }

    fn priority(
        &self,
        contraction_graph: &ContractionGraph,
        witness: &mut WitnessSearch,
        depth: &[u32],
        contracted_neighbors: &[u32],
        node: NodeId,
    ) -> i64 {
        self.priority_params.edge_difference * contraction_graph.edge_difference(node, witness)
            + self.priority_params.depth * i64::from(depth[node as usize])
            + self.priority_params.contracted_neighbors * i64::from(contracted_neighbors[node as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // a path graph contracts without any shortcuts when the
    // endpoints go last, and lazy ordering figures that out
    #[test]
    fn path_graph_needs_no_shortcuts_between_endpoints() {
        // 0 -> 1 -> 2 -> 3 -> 4
        let graph = OwnedGraph::new(vec![0, 1, 2, 3, 4, 4], vec![1, 2, 3, 4], vec![1, 1, 1, 1]);
        let ch = LazyContraction::new().contract(&graph);

        // every node has a unique rank
        let mut ranks = ch.order().ranks().to_vec();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn partial_contraction_leaves_a_core() {
        let graph = OwnedGraph::new(vec![0, 1, 2, 3, 4, 4], vec![1, 2, 3, 4], vec![1, 1, 1, 1]);
        let mut contraction = LazyContraction::new();
        contraction.set_partial_contraction_percentage(40);
        let ch = contraction.contract(&graph);

        let mut ranks = ch.order().ranks().to_vec();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
        // no new edges can appear from contracting two nodes of a path
        assert_eq!(ch.graph().num_arcs(), 4 + ch.num_shortcuts());
    }
}
