//! Contraction Hierarchies.
//!
//! Preprocessing contracts nodes one by one, either in a dynamically
//! computed order (`lazy`) or along a precomputed one (`fixed`), and
//! inserts shortcuts so that every shortest path survives as an
//! up-then-down path. The query in `query` exploits that structure.

use super::*;
use crate::datastr::node_order::*;
use crate::util::in_range_option::InRangeOption;

pub mod contraction;
pub mod fixed;
pub mod lazy;
pub mod query;

pub use contraction::WitnessParams;
pub use fixed::FixedContraction;
pub use lazy::{LazyContraction, PriorityParams};

/// The completely preprocessed graph: all original edges plus shortcuts,
/// the middle node of each shortcut for path unpacking, and the
/// contraction order assigning each node its unique rank.
#[derive(Debug)]
pub struct ContractedGraph {
    graph: OwnedGraph,
    middle: Vec<InRangeOption<NodeId>>,
    order: NodeOrder,
}

impl ContractedGraph {
    pub fn new(graph: OwnedGraph, middle: Vec<InRangeOption<NodeId>>, order: NodeOrder) -> ContractedGraph {
        assert_eq!(middle.len(), graph.num_arcs());
        assert_eq!(order.len(), graph.num_nodes());
        ContractedGraph { graph, middle, order }
    }

    /// The augmented graph in original orientation.
    pub fn graph(&self) -> &OwnedGraph {
        &self.graph
    }

    pub fn order(&self) -> &NodeOrder {
        &self.order
    }

    /// The bypassed node of the given edge, None for original edges.
    pub fn middle(&self, edge: EdgeId) -> Option<NodeId> {
        self.middle[edge as usize].value()
    }

    pub fn middle_nodes(&self) -> &[InRangeOption<NodeId>] {
        &self.middle
    }

    pub fn num_shortcuts(&self) -> usize {
        self.middle.iter().filter(|middle| middle.value().is_some()).count()
    }

    /// Split the augmented graph into the upward graph of edges towards
    /// higher ranks and the backward view of the downward edges.
    /// A forward search on the first and a backward search on the second
    /// together cover exactly the up-then-down paths of the hierarchy.
    pub fn ch_split(&self) -> (OwnedGraph, OwnedGraph) {
        let n = self.graph.num_nodes();
        let mut up: Vec<Vec<Link>> = (0..n).map(|_| Vec::<Link>::new()).collect();
        let mut down: Vec<Vec<Link>> = (0..n).map(|_| Vec::<Link>::new()).collect();

        for node in 0..(n as NodeId) {
            for Link { node: neighbor, weight } in self.graph.neighbor_iter(node) {
                if self.order.rank(node) < self.order.rank(neighbor) {
                    up[node as usize].push(Link { node: neighbor, weight });
                } else {
                    down[neighbor as usize].push(Link { node, weight });
                }
            }
        }

        (OwnedGraph::from_adjacency_lists(up), OwnedGraph::from_adjacency_lists(down))
    }

    pub fn decompose(self) -> (OwnedGraph, Vec<InRangeOption<NodeId>>, NodeOrder) {
        (self.graph, self.middle, self.order)
    }
}
