//! Node order files: one node id per line, the node to contract first
//! at the top. An optional `# ch-node-order` header is accepted, as are
//! both 0- and 1-indexed ids (1-indexed by default, matching DIMACS).

use super::*;
use crate::datastr::graph::NodeId;
use std::io::{BufRead, BufReader};

pub fn read_node_order(path: &Path, one_indexed: bool) -> Result<Vec<NodeId>> {
    let file = BufReader::new(File::open(path)?);
    let mut order = Vec::new();

    for line in file.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let id: u64 = line
            .parse()
            .map_err(|_| invalid_data(format!("{}: malformed node id '{}'", path.display(), line)))?;
        let id = if one_indexed {
            id.checked_sub(1)
                .ok_or_else(|| invalid_data(format!("{}: node id 0 in a 1-indexed order", path.display())))?
        } else {
            id
        };
        if id >= u64::from(NodeId::MAX) {
            return Err(invalid_data(format!("{}: node id {} out of range", path.display(), id)));
        }
        order.push(id as NodeId);
    }

    Ok(order)
}

/// Check that `order` is a permutation of `[0, num_nodes)`.
pub fn validate_node_order(path: &Path, order: &[NodeId], num_nodes: usize) -> Result<()> {
    if order.len() != num_nodes {
        return Err(invalid_data(format!(
            "{}: order of {} nodes for a graph with {}",
            path.display(),
            order.len(),
            num_nodes
        )));
    }

    let mut seen = vec![false; num_nodes];
    for &node in order {
        if (node as usize) >= num_nodes || seen[node as usize] {
            return Err(invalid_data(format!("{}: not a permutation of the node ids", path.display())));
        }
        seen[node as usize] = true;
    }

    Ok(())
}

pub fn write_node_order(path: &Path, order: &[NodeId], one_indexed: bool) -> Result<()> {
    write_atomically(path, |file| {
        writeln!(file, "# ch-node-order")?;
        for &node in order {
            writeln!(file, "{}", if one_indexed { node + 1 } else { node })?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("ch_engine_order_{}_{}", std::process::id(), name));
        path
    }

    #[test]
    fn roundtrip_one_indexed() {
        let path = tmp_path("roundtrip1.txt");
        write_node_order(&path, &[2, 0, 1], true).unwrap();
        let order = read_node_order(&path, true).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn zero_indexed_with_header() {
        let path = tmp_path("roundtrip0.txt");
        fs::write(&path, "# ch-node-order\n2\n0\n1\n").unwrap();
        let order = read_node_order(&path, false).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn id_zero_in_one_indexed_file_is_invalid() {
        let path = tmp_path("bad.txt");
        fs::write(&path, "0\n1\n").unwrap();
        let result = read_node_order(&path, true);
        fs::remove_file(&path).unwrap();

        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::InvalidData);
    }
}
