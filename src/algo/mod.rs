//! Building blocks for fast routing algorithms.

use crate::datastr::graph::*;
use std::time::Duration;

pub mod arc_labels;
pub mod bidirectional_search;
pub mod contraction_hierarchy;
pub mod dijkstra;
pub mod heuristics;

/// Simply a source-target pair.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub from: NodeId,
    pub to: NodeId,
}

/// Counters over the work done by one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// nodes popped from a queue and relaxed
    pub nodes_expanded: usize,
    /// neighbors looked at during relaxation
    pub nodes_touched: usize,
    /// nodes initialized and queued for the first time this search
    pub nodes_generated: usize,
    /// queued nodes whose tentative distance improved
    pub nodes_updated: usize,
    /// total queue insertions
    pub queue_pushes: usize,
}

/// The complete answer to a query.
///
/// An unreachable target is encoded as `cost = INFINITY` with an empty path,
/// never as an error. `cutoff` is set when the search was stopped by a
/// cost or expansion budget before it could prove optimality.
#[derive(Debug, Clone)]
pub struct Solution {
    /// length of the shortest path found, `INFINITY` if none was found
    pub cost: Weight,
    /// path nodes paired with the cumulative cost from the source,
    /// over original edges only (shortcuts unpacked), empty if unreachable
    pub path: Vec<(NodeId, Weight)>,
    pub stats: SearchStats,
    pub cutoff: bool,
    pub elapsed: Duration,
}

impl Solution {
    pub fn unreachable(stats: SearchStats, cutoff: bool, elapsed: Duration) -> Solution {
        Solution {
            cost: INFINITY,
            path: Vec::new(),
            stats,
            cutoff,
            elapsed,
        }
    }
}

/// Generic container for query results.
/// Contains a distance and allows lazily fetching the actual path.
/// Borrows the server, because the path data lives in the server's
/// search state and is invalidated by the next query.
#[derive(Debug)]
pub struct QueryResult<P, W> {
    distance: W,
    path_server: P,
}

impl<P: PathServer, W: Copy> QueryResult<P, W> {
    fn new(distance: W, path_server: P) -> Self {
        Self { distance, path_server }
    }

    pub fn distance(&self) -> W {
        self.distance
    }

    pub fn path(&mut self) -> Vec<P::NodeInfo> {
        self.path_server.path()
    }
}

/// Trait for query algorithm servers.
pub trait QueryServer<'s> {
    /// Type of the object that can retrieve the actual shortest path.
    type P: PathServer;
    /// Calculate the shortest distance from source to target.
    /// Returns None if they are not connected.
    fn query(&'s mut self, query: Query) -> Option<QueryResult<Self::P, Weight>>;
}

/// Trait for path retrievers, for internal use.
pub trait PathServer {
    /// Information for each node on the path.
    type NodeInfo;
    /// Fetch the shortest path of the last query.
    fn path(&mut self) -> Vec<Self::NodeInfo>;
}
