use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use clap::Parser;
use lrulib::cache::AccessOutcome;
use lrulib::config::CacheConfig;
use lrulib::io::read_trace;
use lrulib::simulator::Simulator;
use lrulib::trace::AccessKind;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Simulates an LRU set-associative cache against a valgrind memory trace"))]
struct Args {
    /// Number of set index bits
    #[arg(short = 's', required_unless_present = "config", conflicts_with = "config")]
    set_index_bits: Option<u32>,

    /// Number of lines per set
    #[arg(short = 'E', required_unless_present = "config", conflicts_with = "config")]
    lines_per_set: Option<u32>,

    /// Number of block offset bits
    #[arg(short = 'b', required_unless_present = "config", conflicts_with = "config")]
    block_offset_bits: Option<u32>,

    /// Trace file to replay
    #[arg(short = 't', long)]
    trace: String,

    /// JSON cache configuration file, instead of -s, -E, and -b
    #[arg(short, long)]
    config: Option<String>,

    /// Print the outcome of every access
    #[arg(short, long)]
    verbose: bool,

    /// Print the result as JSON instead of the summary line
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    let config = load_config(&args)?;
    let mut simulator = Simulator::new(&config)
        .map_err(|e| format!("Invalid cache configuration: {e}"))?;
    let events = read_trace(&args.trace)
        .map_err(|e| format!("{}: {e}", args.trace))?;
    let result = if args.verbose {
        simulator.simulate_with(&events, &mut |kind, address, outcome| {
            println!("{} {address:x} {}", kind_letter(kind), describe(outcome));
        })
    } else {
        simulator.simulate(&events)
    };
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(result)
                .map_err(|e| format!("Couldn't serialise the output: {e}"))?
        );
    } else {
        println!(
            "hits:{} misses:{} evictions:{}",
            result.hits, result.misses, result.evictions
        );
    }
    let end = Instant::now();
    if args.performance {
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes trace parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        println!("Trace events replayed: {}", events.len());
        println!("Uninitialised cache lines: {}", simulator.uninitialised_line_count());
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<CacheConfig, String> {
    if let Some(path) = &args.config {
        let config_file = File::open(path)
            .map_err(|e| format!("Couldn't open the config file at path {path}: {e}"))?;
        serde_json::from_reader(BufReader::new(config_file))
            .map_err(|e| format!("Couldn't parse the config file: {e}"))
    } else {
        match (args.set_index_bits, args.lines_per_set, args.block_offset_bits) {
            (Some(s), Some(e), Some(b)) => Ok(CacheConfig::new(s, e, b)),
            _ => Err("missing arguments: -s, -E, and -b must all be given unless --config is used".to_string()),
        }
    }
}

fn kind_letter(kind: AccessKind) -> char {
    match kind {
        AccessKind::Load => 'L',
        AccessKind::Store => 'S',
        AccessKind::Modify => 'M',
    }
}

fn describe(outcome: AccessOutcome) -> &'static str {
    match outcome {
        AccessOutcome::Hit => "hit",
        AccessOutcome::MissFilled => "miss",
        AccessOutcome::MissEvicted => "miss eviction",
    }
}
