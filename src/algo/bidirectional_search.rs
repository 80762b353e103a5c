//! Bidirectional best-first search.
//!
//! The engine is generic over the two search graphs and the heuristic.
//! Plugging in a graph and its reversal yields bidirectional A*
//! (or bidirectional Dijkstra for the zero heuristic), plugging in the
//! up/down parts of a contraction hierarchy yields the CH query
//! algorithm. The expansion order within a direction is deterministic:
//! by key, then by larger tentative distance, then by node id.

use super::heuristics::*;
use super::*;
use crate::datastr::{index_heap::*, timestamped_vector::*};
use crate::report::benchmark::measure;
use crate::util::in_range_option::InRangeOption;
use std::cmp::min;

/// Priority queue entries of the bidirectional engine.
/// Ordered by key ascending; ties prefer the entry with the larger
/// tentative distance, which keeps the closed sets smaller on plateaus.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct QueueEntry {
    pub key: Weight,
    pub g: Weight,
    pub node: NodeId,
}

impl Ord for QueueEntry {
    #[inline]
    fn cmp(&self, rhs: &Self) -> std::cmp::Ordering {
        self.key
            .cmp(&rhs.key)
            .then_with(|| rhs.g.cmp(&self.g))
            .then_with(|| self.node.cmp(&rhs.node))
    }
}

impl PartialOrd for QueueEntry {
    #[inline]
    fn partial_cmp(&self, rhs: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Indexing for QueueEntry {
    #[inline]
    fn as_index(&self) -> usize {
        self.node as usize
    }
}

/// How the engine picks the direction to expand next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalancePolicy {
    /// Expand the side whose queue minimum has the smaller key, ties go forward.
    SmallerKey,
    /// Strictly alternate between the directions.
    Alternate,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        BalancePolicy::SmallerKey
    }
}

/// The lower bound which decides when no better connection can be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppingCriterion {
    /// Sum of the two frontier minima. The tightest sound bound for
    /// bidirectional Dijkstra over a graph and its exact reversal,
    /// where every s-t path crosses both frontiers.
    SumOfFrontiers,
    /// Smaller of the two frontier minima. Required whenever the two
    /// searches cover different edge sets and only share their meeting
    /// points, as on the up/down split of a hierarchy: a direction may
    /// still improve the connection until its own frontier passes the
    /// best known cost. Also the bound for bidirectional A* keys.
    FrontierMinimum,
}

/// Per-direction search state, sized once and reset lazily between
/// queries through the epoch counters of the timestamped vectors.
#[derive(Debug)]
struct SearchSpace {
    distances: TimestampedVector<Weight>,
    predecessors: Vec<NodeId>,
    expanded: TimestampedVector<bool>,
    queue: IndexedMinHeap<QueueEntry>,
}

impl SearchSpace {
    fn new(n: usize) -> SearchSpace {
        SearchSpace {
            distances: TimestampedVector::new(n, INFINITY),
            predecessors: vec![n as NodeId; n],
            expanded: TimestampedVector::new(n, false),
            queue: IndexedMinHeap::new(n),
        }
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.distances.reset();
        self.expanded.reset();
    }

    fn mem(&self) -> usize {
        self.distances.mem() + self.expanded.mem() + self.predecessors.len() * std::mem::size_of::<NodeId>() + self.queue.mem()
    }
}

/// The bidirectional search engine.
#[derive(Debug)]
pub struct BidirectionalSearch<FG, BG, H = ZeroHeuristic> {
    forward: FG,
    backward: BG,
    heuristic: H,
    fwd: SearchSpace,
    bwd: SearchSpace,
    query: Option<Query>,
    meeting_node: InRangeOption<NodeId>,
    best_cost: Weight,
    cost_cutoff: Weight,
    expansion_cutoff: usize,
    balance: BalancePolicy,
    stopping: StoppingCriterion,
    cutoff_hit: bool,
    stats: SearchStats,
}

impl<FG, BG, H> BidirectionalSearch<FG, BG, H>
where
    FG: for<'a> LinkIterGraph<'a>,
    BG: for<'a> LinkIterGraph<'a>,
    H: Heuristic,
{
    /// Create an engine from a forward graph, a backward graph and a heuristic.
    /// The backward graph is traversed from the target, so it has to be
    /// the reversal of the graph the backward direction should cover.
    pub fn new(forward: FG, backward: BG, heuristic: H) -> Self {
        assert_eq!(forward.num_nodes(), backward.num_nodes());
        let n = forward.num_nodes();

        BidirectionalSearch {
            forward,
            backward,
            heuristic,
            fwd: SearchSpace::new(n),
            bwd: SearchSpace::new(n),
            query: None,
            meeting_node: InRangeOption::none(),
            best_cost: INFINITY,
            cost_cutoff: INFINITY,
            expansion_cutoff: usize::MAX,
            balance: BalancePolicy::default(),
            // a zero heuristic means plain bidirectional Dijkstra,
            // where the sharper sum bound applies
            stopping: if H::IS_ZERO {
                StoppingCriterion::SumOfFrontiers
            } else {
                StoppingCriterion::FrontierMinimum
            },
            cutoff_hit: false,
            stats: SearchStats::default(),
        }
    }

    /// Abort once no path of cost `<= cutoff` can exist anymore.
    pub fn set_cost_cutoff(&mut self, cutoff: Weight) {
        self.cost_cutoff = cutoff;
    }

    /// Abort after this many node expansions.
    pub fn set_expansion_cutoff(&mut self, cutoff: usize) {
        self.expansion_cutoff = cutoff;
    }

    pub fn set_balance_policy(&mut self, policy: BalancePolicy) {
        self.balance = policy;
    }

    pub fn set_stopping_criterion(&mut self, stopping: StoppingCriterion) {
        self.stopping = stopping;
    }

    /// Run the search and return the shortest distance, None if the
    /// target is unreachable (or the search was cut off).
    pub fn distance(&mut self, query: Query) -> Option<Weight> {
        self.query = Some(query);
        self.fwd.reset();
        self.bwd.reset();
        self.meeting_node = InRangeOption::none();
        self.best_cost = INFINITY;
        self.cutoff_hit = false;
        self.stats = SearchStats::default();

        self.fwd.distances.set(query.from as usize, 0);
        self.fwd.queue.push(QueueEntry {
            key: self.heuristic.h(query.from, query.to),
            g: 0,
            node: query.from,
        });
        self.bwd.distances.set(query.to as usize, 0);
        self.bwd.queue.push(QueueEntry {
            key: self.heuristic.h(query.to, query.from),
            g: 0,
            node: query.to,
        });
        self.stats.nodes_generated += 2;
        self.stats.queue_pushes += 2;

        // used by the alternating policy only
        let mut forward_turn = false;

        loop {
            let f_top = self.fwd.queue.peek().copied();
            let b_top = self.bwd.queue.peek().copied();
            if f_top.is_none() && b_top.is_none() {
                break;
            }

            // lower bound on the cost of any connection still to be found
            let bound = match self.stopping {
                StoppingCriterion::SumOfFrontiers => f_top.map(|e| e.g).unwrap_or(INFINITY) + b_top.map(|e| e.g).unwrap_or(INFINITY),
                StoppingCriterion::FrontierMinimum => {
                    min(f_top.map(|e| e.key).unwrap_or(INFINITY), b_top.map(|e| e.key).unwrap_or(INFINITY))
                }
            };

            if bound > self.best_cost {
                break;
            }
            if bound > self.cost_cutoff {
                self.cutoff_hit = true;
                break;
            }
            if self.stats.nodes_expanded >= self.expansion_cutoff {
                self.cutoff_hit = true;
                break;
            }

            let expand_forward = match self.balance {
                BalancePolicy::SmallerKey => match (f_top, b_top) {
                    (Some(f), Some(b)) => f.key <= b.key,
                    (Some(_), None) => true,
                    _ => false,
                },
                BalancePolicy::Alternate => {
                    forward_turn = !forward_turn;
                    // fall back to the other side when ours ran dry
                    if forward_turn {
                        f_top.is_some()
                    } else {
                        b_top.is_none()
                    }
                }
            };

            if expand_forward {
                expand_side(
                    &self.forward,
                    &mut self.fwd,
                    &self.bwd,
                    &self.heuristic,
                    query.to,
                    &mut self.best_cost,
                    &mut self.meeting_node,
                    &mut self.stats,
                );
            } else {
                expand_side(
                    &self.backward,
                    &mut self.bwd,
                    &self.fwd,
                    &self.heuristic,
                    query.from,
                    &mut self.best_cost,
                    &mut self.meeting_node,
                    &mut self.stats,
                );
            }
        }

        match self.best_cost {
            INFINITY => None,
            dist => Some(dist),
        }
    }

    /// Path of the last query as node ids, still containing shortcuts
    /// when searching a hierarchy. Empty if the target was unreachable.
    pub fn node_path(&self) -> Vec<NodeId> {
        let query = self.query.expect("no query was run yet");
        let meeting = match self.meeting_node.value() {
            Some(node) => node,
            None => return Vec::new(),
        };

        let mut path = vec![meeting];
        while *path.last().unwrap() != query.from {
            path.push(self.fwd.predecessors[*path.last().unwrap() as usize]);
        }
        path.reverse();
        while *path.last().unwrap() != query.to {
            path.push(self.bwd.predecessors[*path.last().unwrap() as usize]);
        }

        path
    }

    /// Like `node_path`, but each node paired with its cost from the source.
    pub fn node_path_with_costs(&self) -> Vec<(NodeId, Weight)> {
        let meeting = self.meeting_node.value();
        let mut seen_meeting = false;
        self.node_path()
            .into_iter()
            .map(|node| {
                // up to the meeting node costs come from the forward
                // search, behind it from the backward search
                let cost = if seen_meeting {
                    self.best_cost - self.bwd.distances[node as usize]
                } else {
                    self.fwd.distances[node as usize]
                };
                if Some(node) == meeting {
                    seen_meeting = true;
                }
                (node, cost)
            })
            .collect()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn cutoff_hit(&self) -> bool {
        self.cutoff_hit
    }

    pub fn forward_graph(&self) -> &FG {
        &self.forward
    }

    /// Memory occupied by the search state of both directions.
    pub fn mem(&self) -> usize {
        self.fwd.mem() + self.bwd.mem()
    }
}

fn expand_side<G: for<'a> LinkIterGraph<'a>, H: Heuristic>(
    graph: &G,
    own: &mut SearchSpace,
    opp: &SearchSpace,
    heuristic: &H,
    side_target: NodeId,
    best_cost: &mut Weight,
    meeting_node: &mut InRangeOption<NodeId>,
    stats: &mut SearchStats,
) {
    let node = match own.queue.pop() {
        Some(entry) => entry.node,
        None => return,
    };
    let g = own.distances[node as usize];
    own.expanded.set(node as usize, true);
    stats.nodes_expanded += 1;

    // check against the opposite frontier before relaxing, so that a
    // start node which already is the meeting point is picked up
    if g + opp.distances[node as usize] < *best_cost {
        *best_cost = g + opp.distances[node as usize];
        *meeting_node = InRangeOption::some(node);
    }

    for link in graph.neighbor_iter(node) {
        stats.nodes_touched += 1;
        let head = link.node as usize;
        if own.expanded[head] {
            continue;
        }

        let new_g = g + link.weight;
        if !own.distances.is_current(head) {
            own.distances.set(head, new_g);
            own.predecessors[head] = node;
            own.queue.push(QueueEntry {
                key: new_g + heuristic.h(link.node, side_target),
                g: new_g,
                node: link.node,
            });
            stats.nodes_generated += 1;
            stats.queue_pushes += 1;
        } else if new_g < own.distances[head] {
            own.distances.set(head, new_g);
            own.predecessors[head] = node;
            own.queue.update_key(QueueEntry {
                key: new_g + heuristic.h(link.node, side_target),
                g: new_g,
                node: link.node,
            });
            stats.nodes_updated += 1;
        }

        // updating the best connection on every relaxed edge is what
        // makes the sum bound termination sound
        if own.distances[head] + opp.distances[head] < *best_cost {
            *best_cost = own.distances[head] + opp.distances[head];
            *meeting_node = InRangeOption::some(link.node);
        }
    }
}

/// Bidirectional query server over a plain graph and its reversal.
#[derive(Debug)]
pub struct Server<G, H = ZeroHeuristic> {
    search: BidirectionalSearch<G, OwnedGraph, H>,
}

impl<G: for<'a> LinkIterGraph<'a>> Server<G, ZeroHeuristic> {
    pub fn new(graph: G) -> Self {
        Self::with_heuristic(graph, ZeroHeuristic)
    }
}

impl<G: for<'a> LinkIterGraph<'a>, H: Heuristic> Server<G, H> {
    pub fn with_heuristic(graph: G, heuristic: H) -> Self {
        let reversed = graph.reverse();
        Server {
            search: BidirectionalSearch::new(graph, reversed, heuristic),
        }
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

    /// Full query including path reconstruction.
    pub fn solve(&mut self, query: Query) -> Solution {
        let (distance, elapsed) = measure(|| self.search.distance(query));
        match distance {
            Some(cost) => Solution {
                cost,
                path: self.search.node_path_with_costs(),
                stats: self.search.stats(),
                cutoff: self.search.cutoff_hit(),
                elapsed,
            },
            None => Solution::unreachable(self.search.stats(), self.search.cutoff_hit(), elapsed),
        }
    }

    /// Distance-only query, skips path reconstruction.
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
}

pub struct PathServerWrapper<'s, G, H>(&'s Server<G, H>);

impl<'s, G, H> PathServer for PathServerWrapper<'s, G, H>
where
    G: for<'a> LinkIterGraph<'a>,
    H: Heuristic,
{
    type NodeInfo = NodeId;

    fn path(&mut self) -> Vec<Self::NodeInfo> {
        self.0.search.node_path()
    }
}

impl<'s, G, H> QueryServer<'s> for Server<G, H>
where
    G: for<'a> LinkIterGraph<'a> + 's,
    H: Heuristic + 's,
{
    type P = PathServerWrapper<'s, G, H>;

    fn query(&'s mut self, query: Query) -> Option<QueryResult<Self::P, Weight>> {
        self.search
            .distance(query)
            .map(move |distance| QueryResult::new(distance, PathServerWrapper(self)))
    }
}
