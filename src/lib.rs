//! A toolkit for point-to-point shortest path queries on large static road networks.
//!
//! Preprocessing builds a Contraction Hierarchy with either a lazy,
//! priority-driven node ordering or an externally supplied fixed order,
//! and optionally augments the hierarchy with per-edge arc labels.
//! Queries run a bidirectional best-first search which exploits the
//! hierarchy to prune exploration.

#[macro_use]
pub mod report;
pub mod algo;
pub mod cli;
pub mod datastr;
pub mod io;
pub mod util;
