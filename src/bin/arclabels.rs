//! Create arc labels for a contracted DIMACS input graph.

use std::path::{Path, PathBuf};

use ch_engine::{
    algo::arc_labels,
    cli::{Args, Failure},
    datastr::{
        graph::{Graph, NodeId},
        node_order::NodeOrder,
    },
    io::{dimacs, order},
    report::*,
};

fn help() {
    eprintln!("create arc labels for a given (currently, DIMACS-format only) input graph");
    eprintln!("valid parameters:");
    eprintln!("\t--dimacs [gr file] [co file] (IN THIS ORDER!!)");
    eprintln!("\t--order [order-of-contraction file]");
    eprintln!("\t--arclabels [ downdist | apexdist ] [first id] [last id] (optional id range)");
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
    let _reporting = enable_reporting("arclabels");

    let input = args
        .values("dimacs")
        .ok_or_else(|| Failure::usage("insufficient values for param --dimacs (need gr and co files)"))?;
    let [gr_file, _co_file] = input else {
        return Err(Failure::usage("insufficient values for param --dimacs (need gr and co files)"));
    };

    let order_file = args.value("order").ok_or_else(|| Failure::usage("required: node order file"))?;
    let label_args = args
        .values("arclabels")
        .ok_or_else(|| Failure::usage("required: --arclabels [ downdist | apexdist ]"))?;

    let graph = report_time_with_key("loading graph", "graph_loading_running_time_ms", || dimacs::read_graph(Path::new(gr_file))).map_err(Failure::Input)?;
    let node_order = order::read_node_order(Path::new(order_file), true).map_err(Failure::Input)?;
    order::validate_node_order(Path::new(order_file), &node_order, graph.num_nodes()).map_err(Failure::Input)?;
    let node_order = NodeOrder::from_node_order(node_order);

    let n = graph.num_nodes() as NodeId;
    let (first, last) = match label_args {
        [_] => (0, n),
        [_, first, last] => {
            let first: NodeId = first.parse().map_err(|_| Failure::usage("--arclabels range expects numbers"))?;
            let last: NodeId = last.parse().map_err(|_| Failure::usage("--arclabels range expects numbers"))?;
            if first >= last || last > n {
                return Err(Failure::usage("--arclabels range is empty or out of bounds"));
            }
            (first, last)
        }
        _ => return Err(Failure::usage("--arclabels takes the label kind and optionally [first id] [last id]")),
    };
    let partial_range = (first, last) != (0, n);

    if args.flag("verbose") {
        eprintln!("labeling edges of {} source nodes out of {}", last - first, n);
    }

    // each label kind dispatches exactly once
    let (labels, extension) = match label_args[0].as_str() {
        "downdist" => (
            report_time_with_key("computing down distance labels", "labeling_running_time_ms", || {
                arc_labels::down_distance_labels(&graph, &node_order, first..last)
            }),
            ".ddist.arclabel",
        ),
        "apexdist" => (
            report_time_with_key("computing apex distance labels", "labeling_running_time_ms", || {
                arc_labels::apex_distance_labels(&graph, &node_order, first..last)
            }),
            ".apex.arclabel",
        ),
        other => return Err(Failure::usage(format!("invalid option for parameter arclabel: {}", other))),
    };

    let mut out_file = format!("{}{}", gr_file, extension);
    if partial_range {
        out_file.push_str(&format!(".{}.{}", first, last - 1));
    }
    let out_file = PathBuf::from(out_file);

    eprintln!("saving arc labels to file {}", out_file.display());
    dimacs::write_arc_labels(&out_file, &labels).map_err(Failure::Output)?;

    eprintln!("all done!");
    Ok(())
}
