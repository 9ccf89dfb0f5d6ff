use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use muroga_rs::encode::encode;
use muroga_rs::gate::parse_gates;
use muroga_rs::solver::{PbSolver, Scip, ScipConfig, Solver};
use muroga_rs::synth::synthesize;
use muroga_rs::truth::TruthTable;

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Backend {
    /// In-process SAT-based optimizer.
    Native,
    /// External SCIP executable.
    Scip,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Minimal-wiring NOT/NAND circuit synthesis")]
struct Cli {
    /// Truth table, one output bit per row (x1 varies fastest).
    #[arg(long, value_name = "BITS", default_value = "01010011")]
    truth: String,

    /// Space-separated gate sequence; the last gate is the output.
    #[arg(long, value_name = "GATES", default_value = "NOT NAND NAND NAND")]
    gates: String,

    /// Solver backend.
    #[arg(long, value_enum, default_value = "native")]
    solver: Backend,

    /// SCIP executable (default: `$SCIP_BIN`, then `scip`).
    #[arg(long, value_name = "FILE")]
    scip: Option<PathBuf>,

    /// Keep the SCIP model and log files.
    #[arg(long)]
    keep: bool,

    /// Debug logging, and let SCIP print its progress.
    #[arg(long)]
    verbose: bool,

    /// Write the circuit in DOT format.
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Write the model in LP format and exit without solving.
    #[arg(long, value_name = "FILE")]
    lp: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let table: TruthTable = args.truth.parse()?;
    let gates = parse_gates(&args.gates)?;

    if let Some(path) = &args.lp {
        let encoding = encode(&table, &gates)?;
        std::fs::write(path, encoding.model().to_lp()?)?;
        println!("Wrote model to {}", path.display());
        return Ok(());
    }

    let mut solver: Box<dyn Solver> = match args.solver {
        Backend::Native => Box::new(PbSolver::default()),
        Backend::Scip => {
            let mut config = ScipConfig::from_env();
            if let Some(program) = args.scip.clone() {
                config.program = program;
            }
            config.verbose = args.verbose;
            config.keep_lp = args.keep;
            config.keep_log = args.keep;
            Box::new(Scip::new(config))
        }
    };

    let time_solve = std::time::Instant::now();
    let circuit = synthesize(&table, &gates, &mut solver)?;
    println!("Solved in {:.3} s", time_solve.elapsed().as_secs_f64());

    let Some(circuit) = circuit else {
        println!("No circuit with gates [{}] computes {}", args.gates, table);
        return Ok(());
    };

    println!("Minimal circuit with {} connections:", circuit.cost());
    print!("{}", circuit);
    println!("Simulated truth table: {}", circuit.truth_table());

    if let Some(path) = &args.dot {
        std::fs::write(path, circuit.to_dot()?)?;
        println!("Wrote circuit to {}", path.display());
    }

    Ok(())
}
