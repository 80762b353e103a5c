//! Create a contraction hierarchy from a DIMACS input graph.

use std::path::{Path, PathBuf};

use ch_engine::{
    algo::contraction_hierarchy::{FixedContraction, LazyContraction, WitnessParams},
    cli::{Args, Failure},
    datastr::{graph::Graph, node_order::NodeOrder},
    io::{chd, dimacs, order},
    report::*,
};

fn help() {
    eprintln!("create a contraction hierarchy from a given (currently, DIMACS-format only) input graph");
    eprintln!("valid parameters:");
    eprintln!("\t--input [gr file] [co file] (IN THIS ORDER!!)");
    eprintln!("\t--order [ fixed [node order file] | lazy ]");
    eprintln!("\t--partial [1-100] (optional; percentage of nodes to contract)");
    eprintln!("\t--hops [limit] (optional; witness search hop budget)");
    eprintln!("\t--verify (verify lazy node priorities before contraction)");
    eprintln!("\t--verbose (optional)");
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
    let _reporting = enable_reporting("ch");

    let input = args.values("input").ok_or_else(|| Failure::usage("insufficient input parameters. required, in order: --input [gr file] [co file]"))?;
    let [gr_file, co_file] = input else {
        return Err(Failure::usage("insufficient input parameters. required, in order: --input [gr file] [co file]"));
    };

    let order_args = args
        .values("order")
        .ok_or_else(|| Failure::usage("required: --order [ fixed [node order file] | lazy ]"))?;

    let partial = match args.value("partial") {
        Some(partial) => Some(
            partial
                .parse::<u32>()
                .ok()
                .filter(|pct| (1..=100).contains(pct))
                .ok_or_else(|| Failure::usage("--partial expects a percentage between 1 and 100"))?,
        ),
        None => None,
    };

    let mut witness_params = WitnessParams::default();
    if let Some(hops) = args.value("hops") {
        witness_params.hop_limit = hops.parse().map_err(|_| Failure::usage("--hops expects a number"))?;
    }

    let graph = report_time_with_key("loading graph", "graph_loading_running_time_ms", || dimacs::read_graph(Path::new(gr_file))).map_err(Failure::Input)?;
    let (x, _y) = dimacs::read_coordinates(Path::new(co_file)).map_err(Failure::Input)?;
    if x.len() != graph.num_nodes() {
        return Err(Failure::Input(ch_engine::io::invalid_data(format!(
            "{}: {} coordinates for {} nodes",
            co_file,
            x.len(),
            graph.num_nodes()
        ))));
    }

    if args.flag("verbose") {
        eprintln!("graph has {} nodes and {} arcs", graph.num_nodes(), graph.num_arcs());
    }

    match order_args.first().map(String::as_str) {
        Some("fixed") => {
            let order_file = order_args
                .get(1)
                .ok_or_else(|| Failure::usage("fixed order requires input file. syntax: --order fixed [node order file]"))?;
            let node_order = order::read_node_order(Path::new(order_file), true).map_err(Failure::Input)?;
            order::validate_node_order(Path::new(order_file), &node_order, graph.num_nodes()).map_err(Failure::Input)?;

            let mut contraction = FixedContraction::new();
            contraction.set_witness_params(witness_params);
            if let Some(pct) = partial {
                contraction.set_partial_contraction_percentage(pct);
            }
            let ch = report_time_with_key("contracting graph", "contraction_running_time_ms", || contraction.contract(&graph, NodeOrder::from_node_order(node_order)));

            let out_file = with_suffix(gr_file, if partial.is_some() { ".pch" } else { ".ch" });
            eprintln!("saving contracted graph to file {}", out_file.display());
            dimacs::write_contracted_graph(&out_file, &ch).map_err(Failure::Output)?;
        }
        Some("lazy") => {
            let mut contraction = LazyContraction::new();
            contraction.set_witness_params(witness_params);
            contraction.set_verify(args.flag("verify"));
            if let Some(pct) = partial {
                contraction.set_partial_contraction_percentage(pct);
            }
            let ch = report_time_with_key("contracting graph", "contraction_running_time_ms", || contraction.contract(&graph));

            let out_file = with_suffix(gr_file, if partial.is_some() { ".chd_p" } else { ".chd" });
            eprintln!("saving contracted graph to file {}", out_file.display());
            chd::write_contracted_graph(&out_file, &ch).map_err(Failure::Output)?;
        }
        _ => return Err(Failure::usage("unknown parameter for --order")),
    }

    eprintln!("all done!");
    Ok(())
}

fn with_suffix(file: &str, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", file, suffix))
}
