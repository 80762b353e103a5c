//! Basic variants of Dijkstra's algorithm.

use super::*;
use crate::datastr::{index_heap::*, timestamped_vector::*};

/// Result of a single search iteration.
#[derive(Debug, Clone)]
pub enum QueryProgress {
    Settled(State<Weight>),
    Done(Option<Weight>),
}

/// Priority queue entries, keyed by tentative distance (plus potential, where applicable).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct State<W> {
    pub key: W,
    pub node: NodeId,
}

impl<W: std::cmp::PartialOrd> std::cmp::PartialOrd for State<W> {
    #[inline]
    fn partial_cmp(&self, rhs: &Self) -> Option<std::cmp::Ordering> {
        self.key.partial_cmp(&rhs.key)
    }
}

impl<W: std::cmp::Ord> std::cmp::Ord for State<W> {
    #[inline]
    fn cmp(&self, rhs: &Self) -> std::cmp::Ordering {
        self.key.cmp(&rhs.key)
    }
}

impl<W> Indexing for State<W> {
    #[inline]
    fn as_index(&self) -> usize {
        self.node as usize
    }
}

/// Dijkstra which can be advanced node by node.
/// The caller controls when to stop settling, which is what the
/// bidirectional servers and the label sweeps need.
#[derive(Debug)]
pub struct SteppedDijkstra<Graph: for<'a> LinkIterGraph<'a>> {
    graph: Graph,
    distances: TimestampedVector<Weight>,
    predecessors: Vec<NodeId>,
    queue: IndexedMinHeap<State<Weight>>,
    // the current query
    query: Option<Query>,
    // Some as soon as the algorithm ran to completion
    #[allow(clippy::option_option)]
    result: Option<Option<Weight>>,
}

impl<Graph: for<'a> LinkIterGraph<'a>> SteppedDijkstra<Graph> {
    pub fn new(graph: Graph) -> SteppedDijkstra<Graph> {
        let n = graph.num_nodes();

        SteppedDijkstra {
            graph,
            distances: TimestampedVector::new(n, INFINITY),
            predecessors: vec![n as NodeId; n],
            queue: IndexedMinHeap::new(n),
            query: None,
            result: None,
        }
    }

    pub fn initialize_query(&mut self, query: Query) {
        let from = query.from;
        self.query = Some(query);
        self.result = None;
        self.queue.clear();
        self.distances.reset();
        self.distances.set(from as usize, 0);

        self.queue.push(State { key: 0, node: from });
    }

    pub fn next_step(&mut self) -> QueryProgress {
        match self.result {
            Some(result) => QueryProgress::Done(result),
            None => self.settle_next_node(),
        }
    }

    fn settle_next_node(&mut self) -> QueryProgress {
        let to = self.query.expect("query was not initialized properly").to;

        if let Some(State { key: distance, node }) = self.queue.pop() {
            if node == to {
                self.result = Some(Some(distance));
            }

            for edge in self.graph.neighbor_iter(node) {
                let next_distance = distance + edge.weight;

                if next_distance < self.distances[edge.node as usize] {
                    self.distances.set(edge.node as usize, next_distance);
                    self.predecessors[edge.node as usize] = node;

                    let next = State {
                        key: next_distance,
                        node: edge.node,
                    };
                    if self.queue.contains_index(next.as_index()) {
                        self.queue.decrease_key(next);
                    } else {
                        self.queue.push(next);
                    }
                }
            }

            QueryProgress::Settled(State { key: distance, node })
        } else {
            self.result = Some(None);
            QueryProgress::Done(None)
        }
    }

    pub fn tentative_distance(&self, node: NodeId) -> Weight {
        self.distances[node as usize]
    }

    pub fn predecessor(&self, node: NodeId) -> NodeId {
        self.predecessors[node as usize]
    }

    pub fn query(&self) -> Query {
        self.query.unwrap()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

/// Full Dijkstra query server.
/// Mostly useful as a baseline and as ground truth in tests.
#[derive(Debug)]
pub struct Server<Graph: for<'a> LinkIterGraph<'a>> {
    dijkstra: SteppedDijkstra<Graph>,
}

impl<Graph: for<'a> LinkIterGraph<'a>> Server<Graph> {
    pub fn new(graph: Graph) -> Server<Graph> {
        Server {
            dijkstra: SteppedDijkstra::new(graph),
        }
    }

    pub fn distance(&mut self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.dijkstra.initialize_query(Query { from, to });

        loop {
            match self.dijkstra.next_step() {
                QueryProgress::Settled(_) => (),
                QueryProgress::Done(result) => return result,
            }
        }
    }

    fn path(&self) -> Vec<NodeId> {
        let mut path = vec![self.dijkstra.query().to];

        while *path.last().unwrap() != self.dijkstra.query().from {
            let next = self.dijkstra.predecessor(*path.last().unwrap());
            path.push(next);
        }

        path.reverse();
        path
    }
}

pub struct PathServerWrapper<'s, G: for<'a> LinkIterGraph<'a>>(&'s Server<G>);

impl<'s, G: for<'a> LinkIterGraph<'a>> PathServer for PathServerWrapper<'s, G> {
    type NodeInfo = NodeId;

    fn path(&mut self) -> Vec<Self::NodeInfo> {
        Server::path(self.0)
    }
}

impl<'s, G: for<'a> LinkIterGraph<'a> + 's> QueryServer<'s> for Server<G> {
    type P = PathServerWrapper<'s, G>;

    fn query(&'s mut self, query: Query) -> Option<QueryResult<Self::P, Weight>> {
        self.distance(query.from, query.to).map(move |distance| QueryResult::new(distance, PathServerWrapper(self)))
    }
}
