//! DIMACS shortest path challenge formats.
//!
//! `.gr` files carry one `a tail head weight` line per arc after a
//! `p sp <nodes> <arcs>` problem line, `.co` files one `v id x y` line
//! per node; ids are 1-indexed and `c` lines are comments. The extended
//! `.ch` flavor written for contracted graphs adds a fourth field to
//! shortcut arc lines (the 1-indexed middle node) and `l id level`
//! lines assigning each node its contraction rank.

use super::*;
use crate::algo::contraction_hierarchy::ContractedGraph;
use crate::datastr::{graph::*, node_order::NodeOrder};
use crate::util::in_range_option::InRangeOption;
use std::io::{BufRead, BufReader};

/// Load a `.gr` graph file.
pub fn read_graph(path: &Path) -> Result<OwnedGraph> {
    let (graph, _middle, _ranks) = read_gr_like(path, false)?;
    Ok(graph)
}

/// Load a `.ch` contracted graph file.
pub fn read_contracted_graph(path: &Path) -> Result<ContractedGraph> {
    let (graph, middle, ranks) = read_gr_like(path, true)?;
    let n = graph.num_nodes();
    let mut rank_of = vec![n as NodeId; n];
    for (node, rank) in ranks {
        if rank as usize >= n {
            return Err(invalid_data(format!("{}: node level out of range", path.display())));
        }
        rank_of[node as usize] = rank;
    }
    if rank_of.iter().any(|&rank| rank == n as NodeId) {
        return Err(invalid_data(format!("{}: missing level lines", path.display())));
    }
    Ok(ContractedGraph::new(graph, middle, NodeOrder::from_ranks(rank_of)))
}

#[allow(clippy::type_complexity)]
fn read_gr_like(path: &Path, with_levels: bool) -> Result<(OwnedGraph, Vec<InRangeOption<NodeId>>, Vec<(NodeId, NodeId)>)> {
    let file = BufReader::new(File::open(path)?);
    let mut header: Option<(usize, usize)> = None;
    let mut adjacency: Vec<Vec<(Link, InRangeOption<NodeId>)>> = Vec::new();
    let mut levels = Vec::new();

    for line in file.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("c") | None => continue,
            Some("p") => {
                if header.is_some() {
                    return Err(invalid_data(format!("{}: repeated problem line", path.display())));
                }
                if tokens.next() != Some("sp") {
                    return Err(invalid_data(format!("{}: expected problem line 'p sp n m'", path.display())));
                }
                let n = parse_next(&mut tokens, path, "node count")?;
                let m = parse_next(&mut tokens, path, "arc count")?;
                adjacency = (0..n).map(|_| Vec::new()).collect();
                header = Some((n, m));
            }
            Some("a") => {
                let (n, _) = header.ok_or_else(|| invalid_data(format!("{}: arc line before problem line", path.display())))?;
                let tail: usize = parse_next(&mut tokens, path, "arc tail")?;
                let head: usize = parse_next(&mut tokens, path, "arc head")?;
                let weight: Weight = parse_next(&mut tokens, path, "arc weight")?;
                if tail < 1 || tail > n || head < 1 || head > n {
                    return Err(invalid_data(format!("{}: arc endpoint out of range", path.display())));
                }
                let middle = match tokens.next() {
                    Some(middle) if with_levels => {
                        let middle: usize = middle
                            .parse()
                            .ok()
                            .filter(|&middle| middle >= 1 && middle <= n)
                            .ok_or_else(|| invalid_data(format!("{}: malformed middle node", path.display())))?;
                        InRangeOption::some((middle - 1) as NodeId)
                    }
                    _ => InRangeOption::none(),
                };
                adjacency[tail - 1].push((
                    Link {
                        node: (head - 1) as NodeId,
                        weight,
                    },
                    middle,
                ));
            }
            Some("l") => {
                if with_levels {
                    let node: usize = parse_next(&mut tokens, path, "level node")?;
                    let level: NodeId = parse_next(&mut tokens, path, "level value")?;
                    if node < 1 {
                        return Err(invalid_data(format!("{}: node ids are 1-indexed", path.display())));
                    }
                    levels.push(((node - 1) as NodeId, level));
                }
            }
            Some(other) => {
                return Err(invalid_data(format!("{}: unexpected line starting with '{}'", path.display(), other)));
            }
        }
    }

    let (n, m) = header.ok_or_else(|| invalid_data(format!("{}: missing problem line", path.display())))?;
    let num_arcs: usize = adjacency.iter().map(Vec::len).sum();
    if num_arcs != m {
        return Err(invalid_data(format!("{}: expected {} arcs, found {}", path.display(), m, num_arcs)));
    }
    debug_assert_eq!(adjacency.len(), n);

    let mut middle = Vec::with_capacity(num_arcs);
    let mut links: Vec<Vec<Link>> = Vec::with_capacity(n);
    for arcs in adjacency {
        let mut neighbors = Vec::with_capacity(arcs.len());
        for (link, over) in arcs {
            neighbors.push(link);
            middle.push(over);
        }
        links.push(neighbors);
    }

    Ok((OwnedGraph::from_adjacency_lists(links), middle, levels))
}

/// Load a `.co` coordinates file as parallel x/y arrays.
pub fn read_coordinates(path: &Path) -> Result<(Vec<i32>, Vec<i32>)> {
    let file = BufReader::new(File::open(path)?);
    let mut xs: Vec<i32> = Vec::new();
    let mut ys: Vec<i32> = Vec::new();

    for line in file.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let id: usize = parse_next(&mut tokens, path, "node id")?;
                let x = parse_next(&mut tokens, path, "x coordinate")?;
                let y = parse_next(&mut tokens, path, "y coordinate")?;
                if xs.len() < id {
                    xs.resize(id, 0);
                    ys.resize(id, 0);
                }
                xs[id - 1] = x;
                ys[id - 1] = y;
            }
            _ => continue,
        }
    }

    Ok((xs, ys))
}

/// Write a `.gr` graph file.
pub fn write_graph<G: for<'a> LinkIterGraph<'a>>(path: &Path, graph: &G) -> Result<()> {
    write_atomically(path, |file| {
        writeln!(file, "p sp {} {}", graph.num_nodes(), graph.num_arcs())?;

        for node in 0..graph.num_nodes() {
            for Link { node: head, weight } in graph.neighbor_iter(node as NodeId) {
                writeln!(file, "a {} {} {}", node + 1, head + 1, weight)?;
            }
        }

        Ok(())
    })
}

/// Write a `.ch` contracted graph file.
pub fn write_contracted_graph(path: &Path, ch: &ContractedGraph) -> Result<()> {
    write_atomically(path, |file| {
        let graph = ch.graph();
        writeln!(file, "p sp {} {}", graph.num_nodes(), graph.num_arcs())?;

        for node in 0..graph.num_nodes() as NodeId {
            for edge in graph.neighbor_edge_indices(node) {
                let Link { node: head, weight } = graph.link(edge);
                match ch.middle(edge) {
                    Some(middle) => writeln!(file, "a {} {} {} {}", node + 1, head + 1, weight, middle + 1)?,
                    None => writeln!(file, "a {} {} {}", node + 1, head + 1, weight)?,
                }
            }
        }

        for node in 0..graph.num_nodes() as NodeId {
            writeln!(file, "l {} {}", node + 1, ch.order().rank(node))?;
        }

        Ok(())
    })
}

/// Write an arc label file, one `edge_id value` line per edge.
pub fn write_arc_labels(path: &Path, labels: &[u32]) -> Result<()> {
    write_atomically(path, |file| {
        for (edge, label) in labels.iter().enumerate() {
            writeln!(file, "{} {}", edge, label)?;
        }
        Ok(())
    })
}

fn parse_next<'a, T: std::str::FromStr>(tokens: &mut impl Iterator<Item = &'a str>, path: &Path, what: &str) -> Result<T> {
    tokens
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| invalid_data(format!("{}: missing or malformed {}", path.display(), what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastr::graph::Graph;
    use std::fs;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("ch_engine_dimacs_{}_{}", std::process::id(), name));
        path
    }

    #[test]
    fn graph_roundtrip() {
        let graph = OwnedGraph::new(vec![0, 2, 3, 6, 8, 8, 8], vec![2, 1, 3, 1, 3, 4, 0, 4], vec![10, 1, 2, 1, 3, 1, 7, 2]);
        let path = tmp_path("roundtrip.gr");

        write_graph(&path, &graph).unwrap();
        let read = read_graph(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(read.first_out(), graph.first_out());
        assert_eq!(read.head(), graph.head());
        assert_eq!(read.weight(), graph.weight());
    }

    #[test]
    fn comments_are_skipped() {
        let path = tmp_path("comments.gr");
        fs::write(&path, "c tiny graph\np sp 2 1\nc another comment\na 1 2 7\n").unwrap();
        let graph = read_graph(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.num_arcs(), 1);
        assert_eq!(graph.weight(), &[7]);
    }

    #[test]
    fn arc_count_mismatch_is_invalid() {
        let path = tmp_path("mismatch.gr");
        fs::write(&path, "p sp 2 2\na 1 2 7\n").unwrap();
        let result = read_graph(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn coordinates() {
        let path = tmp_path("coords.co");
        fs::write(&path, "c coords\nv 1 100 -200\nv 2 0 4\n").unwrap();
        let (x, y) = read_coordinates(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(x, vec![100, 0]);
        assert_eq!(y, vec![-200, 4]);
    }

    #[test]
    fn contracted_graph_roundtrip() {
        use crate::algo::contraction_hierarchy::FixedContraction;

        let graph = OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![1, 3, 1]);
        let ch = FixedContraction::new().contract(&graph, NodeOrder::from_node_order(vec![1, 0, 2]));
        let path = tmp_path("roundtrip.ch");

        write_contracted_graph(&path, &ch).unwrap();
        let read = read_contracted_graph(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(read.graph().first_out(), ch.graph().first_out());
        assert_eq!(read.graph().head(), ch.graph().head());
        assert_eq!(read.graph().weight(), ch.graph().weight());
        assert_eq!(read.order().ranks(), ch.order().ranks());
        let edge = read.graph().edge_index(0, 2).unwrap();
        assert_eq!(read.middle(edge), Some(1));
    }
}
