//! Run random queries against a contracted graph and check every
//! distance against plain Dijkstra on the augmented graph.

use std::path::Path;

use ch_engine::{
    algo::{contraction_hierarchy::query::Server, dijkstra, Query},
    cli::{Args, Failure},
    datastr::graph::{Graph, NodeId, INFINITY},
    io::chd,
    report,
    report::*,
    report_silent,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn help() {
    eprintln!("run random queries on a contracted graph");
    eprintln!("valid parameters:");
    eprintln!("\t--chd [contracted graph file]");
    eprintln!("\t--count [number of queries] (default 1000)");
    eprintln!("\t--seed [rng seed] (default 42)");
}

fn main() {
    if std::env::args().len() <= 1 {
        help();
        return;
    }

    if let Err(failure) = run() {
        eprintln!("{}", failure);
        if matches!(failure, Failure::Usage(_)) {
            help();
        }
        std::process::exit(failure.exit_code());
    }
}

fn run() -> Result<(), Failure> {
    let args = Args::parse();
    let _reporting = enable_reporting("queries");

    let chd_file = args.value("chd").ok_or_else(|| Failure::usage("required: --chd [contracted graph file]"))?;
    let count: usize = args
        .value("count")
        .unwrap_or("1000")
        .parse()
        .map_err(|_| Failure::usage("--count expects a number"))?;
    let seed: u64 = args
        .value("seed")
        .unwrap_or("42")
        .parse()
        .map_err(|_| Failure::usage("--seed expects a number"))?;

    let ch = report_time_with_key("loading contracted graph", "graph_loading_running_time_ms", || chd::read_contracted_graph(Path::new(chd_file))).map_err(Failure::Input)?;
    let n = ch.graph().num_nodes() as NodeId;
    report!("num_nodes", n);
    report!("num_shortcuts", ch.num_shortcuts());

    // the shortcuts preserve distances, so Dijkstra over the augmented
    // graph serves as ground truth
    let mut baseline = dijkstra::Server::new(ch.graph().clone());
    let mut server = Server::new(ch);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut total_ms = 0.0;

    let mut queries = push_collection_context("queries".to_string());
    for _ in 0..count {
        let _query_ctx = queries.push_collection_item();
        let from = rng.gen_range(0..n);
        let to = rng.gen_range(0..n);
        report_silent!("from", from);
        report_silent!("to", to);

        let solution = server.solve_distance(Query { from, to });
        report_silent!("distance", solution.cost);
        report_silent!("num_nodes_expanded", solution.stats.nodes_expanded);
        report_silent!("running_time_ms", solution.elapsed.as_secs_f64() * 1000.0);
        total_ms += solution.elapsed.as_secs_f64() * 1000.0;

        let expected = baseline.distance(from, to);
        let got = match solution.cost {
            INFINITY => None,
            cost => Some(cost),
        };
        assert_eq!(got, expected, "distance mismatch for query {} -> {}", from, to);
    }
    drop(queries);

    report!("num_queries", count);
    eprintln!("ran {} queries, avg time {}ms", count, total_ms / count as f64);

    Ok(())
}
