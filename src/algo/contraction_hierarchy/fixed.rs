//! Contraction along an externally supplied node order.
//!
//! Same contraction mechanics as the lazy variant, but the order comes
//! from the caller (usually a node order file), so there is no priority
//! queue and no revalidation. Partial contraction processes a prefix of
//! the order.

use super::contraction::*;
use super::*;
use crate::report::*;

#[derive(Debug, Default)]
pub struct FixedContraction {
    witness_params: WitnessParams,
    partial: Option<u32>,
}

impl FixedContraction {
    pub fn new() -> FixedContraction {
        Default::default()
    }

    pub fn set_witness_params(&mut self, params: WitnessParams) {
        self.witness_params = params;
    }

    /// Only contract the given percentage of nodes (a prefix of the order).
    pub fn set_partial_contraction_percentage(&mut self, percentage: u32) {
        assert!((1..=100).contains(&percentage));
        self.partial = Some(percentage);
    }

    /// Contract the graph along `order`, which must be a permutation of
    /// all node ids with the node to contract first at rank 0.
    pub fn contract<G: for<'a> LinkIterGraph<'a>>(&self, graph: &G, order: NodeOrder) -> ContractedGraph {
        let n = graph.num_nodes();
        assert_eq!(order.len(), n, "node order does not match the graph");

        let mut contraction_graph = ContractionGraph::new(graph);
        let mut witness = WitnessSearch::new(n, self.witness_params);

        let goal = match self.partial {
            Some(percentage) => (n * percentage as usize) / 100,
            None => n,
        };

        report!("num_nodes", n);

        for rank in 0..goal {
            contraction_graph.contract_node(order.node(rank as Rank), &mut witness);
        }

        report!("num_nodes_contracted", goal);
        report!("num_shortcuts", contraction_graph.num_shortcuts());

        contraction_graph.into_contracted(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_gets_its_shortcut() {
        // a -> b -> c plus a direct a -> c of weight 3, contract b first
        let graph = OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![1, 3, 1]);
        let ch = FixedContraction::new().contract(&graph, NodeOrder::from_node_order(vec![1, 0, 2]));

        let edge = ch.graph().edge_index(0, 2).unwrap();
        assert_eq!(ch.graph().link(edge).weight, 2);
        assert_eq!(ch.middle(edge), Some(1));
    }

    #[test]
    fn prefix_contraction() {
        let graph = OwnedGraph::new(vec![0, 1, 2, 3, 4, 4], vec![1, 2, 3, 4], vec![1, 1, 1, 1]);
        let mut contraction = FixedContraction::new();
        contraction.set_partial_contraction_percentage(60);
        let ch = contraction.contract(&graph, NodeOrder::identity(5));

        assert_eq!(ch.order().ranks(), NodeOrder::identity(5).ranks());
        // contracting the path front to back never leaves an in/out pair
        assert_eq!(ch.num_shortcuts(), 0);
    }
}
