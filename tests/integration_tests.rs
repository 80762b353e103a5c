use ch_engine::{
    algo::{
        bidirectional_search::{BalancePolicy, Server as BiDirServer},
        contraction_hierarchy::{query::Server as ChServer, FixedContraction, LazyContraction},
        dijkstra::Server as DijkServer,
        heuristics::EuclideanHeuristic,
        Query,
    },
    datastr::{graph::*, node_order::NodeOrder},
};

fn graph() -> OwnedGraph {
    // This is the directed graph we're going to use.
    // The node numbers correspond to the different states,
    // and the edge weights symbolize the cost of moving
    // from one node to another.
    // Note that the edges are one-way.
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
    OwnedGraph::new(
        vec![0,      2,  3,        6,    8, 8, 8],
        vec![2,  1,  3,  1, 3, 4,  0, 4],
        vec![10, 1,  2,  1, 3, 1,  7, 2])
}

// a unit weight grid, edges going right and down
fn grid(size: usize) -> OwnedGraph {
    let mut adjacency: Vec<Vec<Link>> = (0..size * size).map(|_| Vec::new()).collect();
    for row in 0..size {
        for column in 0..size {
            let node = row * size + column;
            if column + 1 < size {
                adjacency[node].push(Link { node: (node + 1) as NodeId, weight: 1 });
            }
            if row + 1 < size {
                adjacency[node].push(Link { node: (node + size) as NodeId, weight: 1 });
            }
        }
    }
    OwnedGraph::from_adjacency_lists(adjacency)
}

#[test]
fn simple_dijkstra_correct_distances() {
    let mut server = DijkServer::new(graph());

    assert_eq!(server.distance(0, 1), Some(1));
    assert_eq!(server.distance(0, 3), Some(3));
    assert_eq!(server.distance(3, 0), Some(7));
    assert_eq!(server.distance(0, 4), Some(5));
    assert_eq!(server.distance(4, 0), None);
}

#[test]
fn bidir_dijkstra_correct_distances() {
    let mut server = BiDirServer::new(graph());

    assert_eq!(server.distance(0, 1), Some(1));
    assert_eq!(server.distance(0, 3), Some(3));
    assert_eq!(server.distance(3, 0), Some(7));
    assert_eq!(server.distance(0, 4), Some(5));
    assert_eq!(server.distance(4, 0), None);
}

#[test]
fn alternating_balance_same_distances() {
    let mut server = BiDirServer::new(graph());
    server.set_balance_policy(BalancePolicy::Alternate);

    assert_eq!(server.distance(0, 1), Some(1));
    assert_eq!(server.distance(0, 3), Some(3));
    assert_eq!(server.distance(3, 0), Some(7));
    assert_eq!(server.distance(0, 4), Some(5));
    assert_eq!(server.distance(4, 0), None);
}

#[test]
fn unit_path_graph_query() {
    // 0 -> 1 -> 2 -> 3 -> 4
    let graph = OwnedGraph::new(vec![0, 1, 2, 3, 4, 4], vec![1, 2, 3, 4], vec![1, 1, 1, 1]);
    let mut server = BiDirServer::new(graph);

    let solution = server.solve(Query { from: 0, to: 4 });
    assert_eq!(solution.cost, 4);
    assert_eq!(solution.path, vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
    assert!(!solution.cutoff);
    assert!(solution.stats.nodes_expanded > 0);
}

#[test]
fn bidirectional_searches_meet_in_the_middle() {
    // star: 0 -> 2 of weight 5, 2 -> 1 of weight 5
    let graph = OwnedGraph::new(vec![0, 1, 1, 2], vec![2, 1], vec![5, 5]);
    let mut server = BiDirServer::new(graph);

    let solution = server.solve(Query { from: 0, to: 1 });
    assert_eq!(solution.cost, 10);
    assert_eq!(solution.path, vec![(0, 0), (2, 5), (1, 10)]);
}

#[test]
fn unreachable_target_yields_infinity_and_empty_path() {
    // two disconnected pairs: 0 -> 1 and 2 -> 3
    let graph = OwnedGraph::new(vec![0, 1, 1, 2, 2], vec![1, 3], vec![1, 1]);
    let mut server = BiDirServer::new(graph);

    let solution = server.solve(Query { from: 0, to: 2 });
    assert_eq!(solution.cost, INFINITY);
    assert_eq!(solution.path, vec![]);
    assert!(!solution.cutoff);
}

#[test]
fn cost_cutoff_aborts_early() {
    let mut server = BiDirServer::new(grid(10));
    server.set_cost_cutoff(5);

    // the true corner to corner distance is 18
    let solution = server.solve(Query { from: 0, to: 99 });
    assert_eq!(solution.cost, INFINITY);
    assert_eq!(solution.path, vec![]);
    assert!(solution.cutoff);
}

#[test]
fn expansion_cutoff_aborts_early() {
    let mut server = BiDirServer::new(grid(10));
    server.set_expansion_cutoff(1);

    let solution = server.solve(Query { from: 0, to: 99 });
    assert_eq!(solution.cost, INFINITY);
    assert!(solution.cutoff);
    assert_eq!(solution.stats.nodes_expanded, 1);
}

#[test]
fn astar_with_euclidean_heuristic_stays_optimal() {
    let size = 6;
    let mut x = Vec::new();
    let mut y = Vec::new();
    for row in 0..size {
        for column in 0..size {
            x.push(column as i32);
            y.push(row as i32);
        }
    }

    // unit edge weights dominate the Euclidean distance between the endpoints
    let mut astar = BiDirServer::with_heuristic(grid(size), EuclideanHeuristic::new(x, y, 1.0));
    let mut baseline = DijkServer::new(grid(size));

    for &(from, to) in &[(0, 35), (0, 5), (30, 35), (7, 28), (35, 0)] {
        assert_eq!(astar.distance(from, to), baseline.distance(from, to));
    }
}

#[test]
fn triangle_contraction_inserts_shortcut_and_unpacks() {
    // a -> b = 1, b -> c = 1, a -> c = 3; contract b first
    let graph = OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![1, 3, 1]);
    let ch = FixedContraction::new().contract(&graph, NodeOrder::from_node_order(vec![1, 0, 2]));

    let mut server = ChServer::new(ch);
    let solution = server.solve(Query { from: 0, to: 2 });
    assert_eq!(solution.cost, 2);
    assert_eq!(solution.path, vec![(0, 0), (1, 1), (2, 2)]);
}

#[test]
fn no_shortcut_when_witness_exists() {
    // as above but the direct edge a -> c = 1 is the witness
    let graph = OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![1, 1, 1]);
    let ch = FixedContraction::new().contract(&graph, NodeOrder::from_node_order(vec![1, 0, 2]));
    assert_eq!(ch.num_shortcuts(), 0);

    let mut server = ChServer::new(ch);
    let solution = server.solve(Query { from: 0, to: 2 });
    assert_eq!(solution.cost, 1);
    assert_eq!(solution.path, vec![(0, 0), (2, 1)]);
}

#[test]
fn lazy_contraction_preserves_all_distances() {
    let original = graph();
    let ch = LazyContraction::new().contract(&original);
    let mut baseline = DijkServer::new(graph());
    let mut server = ChServer::new(ch);

    for from in 0..6 {
        for to in 0..6 {
            assert_eq!(server.distance(from, to), baseline.distance(from, to), "query {} -> {}", from, to);
        }
    }
}

#[test]
fn fixed_contraction_preserves_all_distances() {
    let original = graph();
    let ch = FixedContraction::new().contract(&original, NodeOrder::identity(6));
    let mut baseline = DijkServer::new(graph());
    let mut server = ChServer::new(ch);

    for from in 0..6 {
        for to in 0..6 {
            assert_eq!(server.distance(from, to), baseline.distance(from, to), "query {} -> {}", from, to);
        }
    }
}

#[test]
fn unpacked_paths_use_original_edges_only() {
    let original = graph();
    let ch = LazyContraction::new().contract(&original);
    let mut server = ChServer::new(ch);

    for from in 0..6 {
        for to in 0..6 {
            let solution = server.solve(Query { from, to });
            if solution.cost == INFINITY {
                assert!(solution.path.is_empty());
                continue;
            }

            assert_eq!(solution.path.first().unwrap().0, from);
            assert_eq!(solution.path.last().unwrap().0, to);
            assert_eq!(solution.path.last().unwrap().1, solution.cost);

            for step in solution.path.windows(2) {
                let ((tail, tail_cost), (head, head_cost)) = (step[0], step[1]);
                // every step is an edge of the input graph and the costs add up
                let weight = original
                    .neighbor_iter(tail)
                    .filter(|link| link.node == head)
                    .map(|link| link.weight)
                    .min()
                    .expect("path step is not an original edge");
                assert_eq!(head_cost - tail_cost, weight);
            }
        }
    }
}

#[test]
fn repeated_queries_match_fresh_engines() {
    let mut server = BiDirServer::new(graph());
    let queries = [(0, 4), (4, 0), (3, 0), (0, 4), (2, 1), (0, 4)];

    for &(from, to) in &queries {
        let mut fresh = BiDirServer::new(graph());
        assert_eq!(server.distance(from, to), fresh.distance(from, to));
        assert_eq!(server.solve(Query { from, to }).path, fresh.solve(Query { from, to }).path);
    }
}

#[test]
fn partial_contraction_preserves_distances_in_augmented_graph() {
    let original = graph();
    let mut contraction = LazyContraction::new();
    contraction.set_partial_contraction_percentage(50);
    let ch = contraction.contract(&original);

    // plain search over the partially augmented graph must agree with
    // plain search over the input
    let mut baseline = DijkServer::new(graph());
    let mut augmented = DijkServer::new(ch.graph().clone());

    for from in 0..6 {
        for to in 0..6 {
            assert_eq!(augmented.distance(from, to), baseline.distance(from, to), "query {} -> {}", from, to);
        }
    }
}

#[test]
fn down_distance_label_covers_the_descent() {
    use ch_engine::algo::arc_labels::down_distance_labels;

    // a -> b -> c -> d with ascending levels
    let path = OwnedGraph::new(vec![0, 1, 2, 3, 3], vec![1, 2, 3], vec![2, 3, 5]);
    let labels = down_distance_labels(&path, &NodeOrder::identity(4), 0..4);

    let first_edge = path.edge_index(0, 1).unwrap();
    assert_eq!(labels[first_edge as usize], 3 + 5);
}
