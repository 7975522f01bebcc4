//! Resolves a gate network description and prints the number on its output wires.
//!
//! ```shell
//! RUST_LOG=debug cargo run --release -- input.txt --prefix z
//! ```

use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use gate_network::{AdderAudit, Error, Resolver, Strategy, assemble, parse_file};
use log::info;

/// The arguments for the command.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network description
    path: PathBuf,

    /// Wires starting with this prefix form the output number
    #[arg(long, default_value = "z")]
    prefix: String,

    /// worklist, topological or parallel-sweep
    #[arg(long, default_value_t = Strategy::Worklist)]
    strategy: Strategy,

    /// Print every resolved wire as JSON instead of the number
    #[arg(long)]
    json: bool,

    /// Audit the network as an `x + y = z` adder and search for repairing swaps
    #[arg(long)]
    check_adder: bool,
}

fn main() {
    // Initialize logging (default to warn if RUST_LOG not set)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}: {err}", args.path.display());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let (network, report) = parse_file(&args.path)?;
    info!(
        "loaded {} wire(s), {} gate(s), skipped {} line(s)",
        network.wire_count(),
        report.gates,
        report.skipped.len()
    );

    if args.check_adder {
        let audit = AdderAudit::run(&network, args.strategy)?;
        if audit.is_correct() {
            println!("adder ok ({} bits, {} probes)", audit.width, audit.probes);
        } else {
            let bits = audit
                .failing_bits
                .iter()
                .map(|bit| format!("{bit:02}"))
                .join(",");
            println!("adder broken at bit(s) {bits}");

            for (bit, wires) in &audit.suspects {
                println!("  bit {bit:02} suspects: {}", wires.iter().join(" "));
            }
            for swap in audit.find_swaps(&network, args.strategy)? {
                let repaired = swap.repaired.iter().map(|bit| format!("{bit:02}")).join(",");
                println!("  swap {} <-> {} repairs bit(s) {repaired}", swap.a, swap.b);
            }
        }
        return Ok(());
    }

    let resolved = Resolver::new(network)
        .with_strategy(args.strategy)
        .resolve()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("{}", assemble(&resolved, &args.prefix)?);
    }

    Ok(())
}
