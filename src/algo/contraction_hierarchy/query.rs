//! Contraction Hierarchy query server.
//!
//! A bidirectional Dijkstra over the up/down split of the hierarchy:
//! the forward search only climbs towards higher ranks, the backward
//! search does the same on the reversed downward edges, and both run
//! until their own frontier passes the best connection found. What
//! remains here is the path unpacking, which expands every shortcut
//! through its stored middle node.

use super::*;
use crate::algo::bidirectional_search::{BalancePolicy, BidirectionalSearch, StoppingCriterion};
use crate::algo::heuristics::ZeroHeuristic;
use crate::report::benchmark::measure;

#[derive(Debug)]
pub struct Server {
    search: BidirectionalSearch<OwnedGraph, OwnedGraph, ZeroHeuristic>,
    // the augmented graph in original orientation, for unpacking
    graph: OwnedGraph,
    middle: Vec<InRangeOption<NodeId>>,
}

impl Server {
    pub fn new(ch: ContractedGraph) -> Server {
        let (up, down) = ch.ch_split();
        let (graph, middle, _order) = ch.decompose();

        let mut search = BidirectionalSearch::new(up, down, ZeroHeuristic);
        // the up and down searches cover disjoint edge sets, so each
        // direction has to run until its own frontier passes the best
        // connection, the sum bound would stop too early
        search.set_stopping_criterion(StoppingCriterion::FrontierMinimum);

        Server { search, graph, middle }
    }

    pub fn distance(&mut self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.search.distance(Query { from, to })
    }

    pub fn set_cost_cutoff(&mut self, cutoff: Weight) {
        self.search.set_cost_cutoff(cutoff)
    }

    pub fn set_expansion_cutoff(&mut self, cutoff: usize) {
        self.search.set_expansion_cutoff(cutoff)
    }

    pub fn set_balance_policy(&mut self, policy: BalancePolicy) {
        self.search.set_balance_policy(policy)
    }

    /// Full query including the unpacked path.
    pub fn solve(&mut self, query: Query) -> Solution {
        let (distance, elapsed) = measure(|| self.search.distance(query));
        match distance {
            Some(cost) => Solution {
                cost,
                path: self.path_with_costs(),
                stats: self.search.stats(),
                cutoff: self.search.cutoff_hit(),
                elapsed,
            },
            None => Solution::unreachable(self.search.stats(), self.search.cutoff_hit(), elapsed),
        }
    }

    /// Distance-only query, skips path unpacking.
    pub fn solve_distance(&mut self, query: Query) -> Solution {
        let (distance, elapsed) = measure(|| self.search.distance(query));
        match distance {
            Some(cost) => Solution {
                cost,
                path: Vec::new(),
                stats: self.search.stats(),
                cutoff: self.search.cutoff_hit(),
                elapsed,
            },
            None => Solution::unreachable(self.search.stats(), self.search.cutoff_hit(), elapsed),
        }
    }

    pub fn mem(&self) -> usize {
        self.search.mem()
    }

    /// The path of the last query over original edges only.
    fn path(&self) -> Vec<NodeId> {
        let packed = self.search.node_path();
        let mut path = match packed.first() {
            Some(&first) => vec![first],
            None => return Vec::new(),
        };

        for step in packed.windows(2) {
            self.append_unpacked(step[0], step[1], &mut path);
        }

        path
    }

    fn path_with_costs(&self) -> Vec<(NodeId, Weight)> {
        let path = self.path();
        let mut cost = 0;
        path.iter()
            .enumerate()
            .map(|(i, &node)| {
                if i > 0 {
                    cost += self.edge_weight(path[i - 1], node);
                }
                (node, cost)
            })
            .collect()
    }

    // `out` ends with `from`; afterwards it ends with `to` and contains
    // every node a shortcut between the two bypasses
    fn append_unpacked(&self, from: NodeId, to: NodeId, out: &mut Vec<NodeId>) {
        let mut stack = vec![to];
        let mut current = from;

        while let Some(&target) = stack.last() {
            match self.middle_node(current, target) {
                Some(middle) => stack.push(middle),
                None => {
                    out.push(target);
                    current = target;
                    stack.pop();
                }
            }
        }
    }

    fn middle_node(&self, from: NodeId, to: NodeId) -> Option<NodeId> {
        let edge = self.graph.edge_index(from, to).expect("path edge missing from the hierarchy");
        self.middle[edge as usize].value()
    }

    fn edge_weight(&self, from: NodeId, to: NodeId) -> Weight {
        let edge = self.graph.edge_index(from, to).expect("path edge missing from the hierarchy");
        self.graph.link(edge).weight
    }
}

pub struct PathServerWrapper<'s>(&'s Server);

impl<'s> PathServer for PathServerWrapper<'s> {
    type NodeInfo = NodeId;

    fn path(&mut self) -> Vec<Self::NodeInfo> {
        Server::path(self.0)
    }
}

impl<'s> QueryServer<'s> for Server {
    type P = PathServerWrapper<'s>;

    fn query(&'s mut self, query: Query) -> Option<QueryResult<Self::P, Weight>> {
        self.distance(query.from, query.to)
            .map(move |distance| QueryResult::new(distance, PathServerWrapper(self)))
    }
}
