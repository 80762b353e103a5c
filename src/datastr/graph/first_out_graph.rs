//! The static graph representation all search algorithms run on.
//!
//! An adjacency array made of three collections: `first_out` with `n+1`
//! entries (starting at `0` and ending at `m`), and `head` and `weight`
//! with one entry per edge. The outgoing edges of node `x` are the
//! contiguous range `first_out[x]..first_out[x+1]`, which keeps
//! iteration order deterministic and edge ids dense and stable.

use super::*;

/// Adjacency array container, generic over the backing collections.
/// Anything that dereferences to a slice works, so graphs can either
/// own their data or borrow it from somewhere else.
#[derive(Debug, Clone)]
pub struct FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer> {
    // where the edges of each node start, one extra entry in the end
    first_out: FirstOutContainer,
    // edge heads
    head: HeadContainer,
    // edge weights
    weight: WeightContainer,
}

pub type OwnedGraph = FirstOutGraph<Vec<EdgeId>, Vec<NodeId>, Vec<Weight>>;

impl<FirstOutContainer, HeadContainer, WeightContainer> FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    /// Build a graph from the three raw collections.
    /// Panics when they do not form a consistent adjacency array.
    pub fn new(first_out: FirstOutContainer, head: HeadContainer, weight: WeightContainer) -> Self {
        let (first_out_slice, head_slice, weight_slice) = (first_out.as_ref(), head.as_ref(), weight.as_ref());
        assert!(first_out_slice.len() < NodeId::MAX as usize);
        assert!(head_slice.len() < EdgeId::MAX as usize);
        assert_eq!(first_out_slice.first(), Some(&0));
        assert_eq!(*first_out_slice.last().unwrap() as usize, head_slice.len());
        assert_eq!(weight_slice.len(), head_slice.len());

        Self { first_out, head, weight }
    }

    pub fn first_out(&self) -> &[EdgeId] {
        self.first_out.as_ref()
    }

    pub fn head(&self) -> &[NodeId] {
        self.head.as_ref()
    }

    pub fn weight(&self) -> &[Weight] {
        self.weight.as_ref()
    }
}

impl OwnedGraph {
    /// Flatten per-node neighbor lists into the adjacency array form.
    pub fn from_adjacency_lists(adjacency_lists: Vec<Vec<Link>>) -> OwnedGraph {
        // prefix sum over the list lengths yields first_out
        let first_out = std::iter::once(0)
            .chain(adjacency_lists.iter().scan(0, |degrees, neighbors| {
                *degrees += neighbors.len() as EdgeId;
                Some(*degrees)
            }))
            .collect();

        let (head, weight) = adjacency_lists
            .into_iter()
            .flat_map(|neighbors| neighbors.into_iter().map(|Link { node, weight }| (node, weight)))
            .unzip();

        OwnedGraph::new(first_out, head, weight)
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> Graph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    fn num_nodes(&self) -> usize {
        self.first_out().len() - 1
    }

    fn num_arcs(&self) -> usize {
        self.head().len()
    }

    fn degree(&self, node: NodeId) -> usize {
        self.neighbor_edge_indices(node).len()
    }
}

impl<'a, FirstOutContainer, HeadContainer, WeightContainer> LinkIterGraph<'a> for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    #[allow(clippy::type_complexity)]
    type Iter = std::iter::Map<std::iter::Zip<std::slice::Iter<'a, NodeId>, std::slice::Iter<'a, Weight>>, fn((&NodeId, &Weight)) -> Link>;

    #[inline]
    fn neighbor_iter(&'a self, node: NodeId) -> Self::Iter {
        let range = self.neighbor_edge_indices_usize(node);
        self.head()[range.clone()]
            .iter()
            .zip(self.weight()[range].iter())
            .map(|(&node, &weight)| Link { node, weight })
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> RandomLinkAccessGraph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[Weight]>,
{
    #[inline]
    fn link(&self, edge_id: EdgeId) -> Link {
        Link {
            node: self.head()[edge_id as usize],
            weight: self.weight()[edge_id as usize],
        }
    }

    fn edge_index(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.neighbor_edge_indices(from).find(|&edge| self.head()[edge as usize] == to)
    }

    #[inline]
    fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId> {
        self.first_out()[node as usize]..self.first_out()[node as usize + 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversal() {
        let graph = FirstOutGraph::new(vec![0, 2, 3, 6, 8, 8, 8], vec![2, 1, 3, 1, 3, 4, 0, 4], vec![10, 1, 2, 1, 3, 1, 7, 2]);

        //
        //                  7
        //          +-----------------+
        //          |                 |
        //          v   1        2    |  2
        //          0 -----> 1 -----> 3 ---> 4
        //          |        ^        ^      ^
        //          |        | 1      |      |
        //          |        |        | 3    | 1
        //          +------> 2 -------+      |
        //           10      |               |
        //                   +---------------+
        //
        let expected = FirstOutGraph::new(vec![0, 1, 3, 4, 6, 8, 8], vec![3, 0, 2, 0, 1, 2, 2, 3], vec![7, 1, 1, 10, 2, 3, 1, 2]);
        let reversed = graph.reverse();

        assert_eq!(reversed.first_out(), expected.first_out());
        assert_eq!(reversed.head(), expected.head());
        assert_eq!(reversed.weight(), expected.weight());
    }

    #[test]
    fn test_edge_indices() {
        let graph = FirstOutGraph::new(vec![0, 2, 3, 6, 8, 8, 8], vec![2, 1, 3, 1, 3, 4, 0, 4], vec![10, 1, 2, 1, 3, 1, 7, 2]);

        assert_eq!(graph.edge_index(0, 2), Some(0));
        assert_eq!(graph.edge_index(2, 4), Some(5));
        assert_eq!(graph.edge_index(4, 0), None);
        assert_eq!(graph.neighbor_edge_indices(2), 3..6);
        assert_eq!(graph.degree(2), 3);
        assert_eq!(graph.link(6), Link { node: 0, weight: 7 });
    }
}
