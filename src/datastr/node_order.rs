use crate::datastr::graph::*;

pub type Rank = NodeId;

/// A bidirectional mapping between nodes and their ranks in a contraction order.
///
/// Rank 0 is the least important node (contracted first),
/// rank n-1 the most important one. Keeping both directions of the
/// mapping around makes it always clear which way a lookup goes.
#[derive(Debug, Clone)]
pub struct NodeOrder {
    // node ids ordered by rank, ascending in importance
    node_order: Vec<NodeId>,
    // the rank of each node
    ranks: Vec<Rank>,
}

impl NodeOrder {
    /// Create a `NodeOrder` where each node id is its own rank.
    pub fn identity(n: usize) -> NodeOrder {
        NodeOrder {
            node_order: (0..n as NodeId).collect(),
            ranks: (0..n as NodeId).collect(),
        }
    }

    /// Create a `NodeOrder` from an order vector,
    /// that is a vector containing the node ids ordered by rank.
    pub fn from_node_order(node_order: Vec<NodeId>) -> NodeOrder {
        let n = node_order.len();
        assert!(n < NodeId::MAX as usize);
        let mut ranks = vec![n as Rank; n];

        for (rank, &node) in node_order.iter().enumerate() {
            ranks[node as usize] = rank as Rank;
        }

        debug_assert_eq!(ranks.iter().position(|&rank| rank == n as Rank), None, "node order is not a permutation");

        NodeOrder { node_order, ranks }
    }

    /// Create a `NodeOrder` from a rank vector,
    /// that is a vector where `ranks[id]` contains the rank of node `id`.
    pub fn from_ranks(ranks: Vec<Rank>) -> NodeOrder {
        let n = ranks.len();
        assert!(n < NodeId::MAX as usize);
        let mut node_order = vec![n as NodeId; n];

        for (node, &rank) in ranks.iter().enumerate() {
            node_order[rank as usize] = node as NodeId;
        }

        debug_assert_eq!(node_order.iter().position(|&node| node == n as NodeId), None, "ranks are not a permutation");

        NodeOrder { node_order, ranks }
    }

    /// Get the order (rank -> node) as a slice.
    pub fn order(&self) -> &[NodeId] {
        &self.node_order
    }

    /// Get the ranks (node -> rank) as a slice.
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    pub fn rank(&self, node: NodeId) -> Rank {
        self.ranks[node as usize]
    }

    pub fn node(&self, rank: Rank) -> NodeId {
        self.node_order[rank as usize]
    }

    pub fn len(&self) -> usize {
        self.node_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_and_ranks_are_inverse() {
        let order = NodeOrder::from_node_order(vec![2, 0, 3, 1]);
        assert_eq!(order.rank(2), 0);
        assert_eq!(order.rank(1), 3);
        assert_eq!(order.node(0), 2);
        assert_eq!(order.node(3), 1);

        let from_ranks = NodeOrder::from_ranks(order.ranks().to_vec());
        assert_eq!(from_ranks.order(), order.order());
    }
}
