//! Compact binary format for contracted graphs.
//!
//! Layout: a header of four little-endian-agnostic `u32`s
//! `{magic, version, num_nodes, num_edges}`, the rank of each node,
//! then one `{tail, head, weight, middle}` record per edge, where
//! originals carry `u32::MAX` as their middle. Everything is written in
//! native byte order; a file from a foreign-endian machine is detected
//! through its byte-swapped magic and rejected.

use super::*;
use crate::algo::contraction_hierarchy::ContractedGraph;
use crate::datastr::{graph::*, node_order::NodeOrder};
use crate::util::in_range_option::InRangeOption;

/// `"CHD1"` as a big-endian integer.
pub const MAGIC: u32 = 0x4348_4431;
pub const VERSION: u32 = 1;

const NO_MIDDLE: u32 = u32::MAX;

pub fn write_contracted_graph(path: &Path, ch: &ContractedGraph) -> Result<()> {
    let graph = ch.graph();
    let n = graph.num_nodes();
    let m = graph.num_arcs();

    let mut data: Vec<u32> = Vec::with_capacity(4 + n + 4 * m);
    data.extend([MAGIC, VERSION, n as u32, m as u32]);
    data.extend(ch.order().ranks());

    for tail in 0..n as NodeId {
        for edge in graph.neighbor_edge_indices(tail) {
            let Link { node: head, weight } = graph.link(edge);
            data.extend([tail, head, weight, ch.middle(edge).unwrap_or(NO_MIDDLE)]);
        }
    }

    write_atomically(path, |file| file.write_all(data.data_bytes()))
}

pub fn read_contracted_graph(path: &Path) -> Result<ContractedGraph> {
    let data: Vec<u32> = Vec::load_from(path)?;

    if data.len() < 4 {
        return Err(invalid_data(format!("{}: truncated header", path.display())));
    }
    let (magic, version, n, m) = (data[0], data[1], data[2], data[3]);

    if magic != MAGIC {
        if magic.swap_bytes() == MAGIC {
            return Err(invalid_data(format!("{}: written on a machine with different byte order", path.display())));
        }
        return Err(invalid_data(format!("{}: not a contracted graph file", path.display())));
    }
    if version != VERSION {
        return Err(invalid_data(format!("{}: unsupported version {}", path.display(), version)));
    }

    let n = n as usize;
    let m = m as usize;
    if data.len() != 4 + n + 4 * m {
        return Err(invalid_data(format!("{}: truncated file", path.display())));
    }

    let ranks = data[4..4 + n].to_vec();
    if ranks.iter().any(|&rank| rank as usize >= n) {
        return Err(invalid_data(format!("{}: node rank out of range", path.display())));
    }

    let mut adjacency: Vec<Vec<Link>> = (0..n).map(|_| Vec::new()).collect();
    let mut middle_by_tail: Vec<Vec<InRangeOption<NodeId>>> = (0..n).map(|_| Vec::new()).collect();

    for record in data[4 + n..].chunks_exact(4) {
        let (tail, head, weight, middle) = (record[0], record[1], record[2], record[3]);
        if tail as usize >= n || head as usize >= n {
            return Err(invalid_data(format!("{}: edge endpoint out of range", path.display())));
        }
        adjacency[tail as usize].push(Link { node: head, weight });
        middle_by_tail[tail as usize].push(if middle == NO_MIDDLE {
            InRangeOption::none()
        } else {
            InRangeOption::some(middle)
        });
    }

    let middle = middle_by_tail.into_iter().flatten().collect();

    Ok(ContractedGraph::new(
        OwnedGraph::from_adjacency_lists(adjacency),
        middle,
        NodeOrder::from_ranks(ranks),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::contraction_hierarchy::FixedContraction;
    use std::fs;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("ch_engine_chd_{}_{}", std::process::id(), name));
        path
    }

    #[test]
    fn roundtrip() {
        let graph = OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![1, 3, 1]);
        let ch = FixedContraction::new().contract(&graph, NodeOrder::from_node_order(vec![1, 0, 2]));
        let path = tmp_path("roundtrip.chd");

        write_contracted_graph(&path, &ch).unwrap();
        let read = read_contracted_graph(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(read.graph().first_out(), ch.graph().first_out());
        assert_eq!(read.graph().head(), ch.graph().head());
        assert_eq!(read.graph().weight(), ch.graph().weight());
        assert_eq!(read.order().ranks(), ch.order().ranks());
        assert_eq!(read.middle_nodes(), ch.middle_nodes());
    }

    #[test]
    fn rejects_foreign_magic() {
        let path = tmp_path("bad_magic.chd");
        let data: Vec<u32> = vec![MAGIC.swap_bytes(), VERSION, 0, 0];
        fs::write(&path, data.data_bytes()).unwrap();
        let result = read_contracted_graph(&path);
        fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("byte order"));
    }
}
