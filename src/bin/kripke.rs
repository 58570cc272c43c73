use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;

use kripke_rs::kripke::Kripke;
use kripke_rs::manager::ExprManager;

#[derive(Debug, Parser)]
#[command(author, version, about = "Finite Kripke model evaluator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate a formula over a Kripke model
    Check {
        /// Kripke model file (see the models directory for examples)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Logical expression to test over the model
        expression: String,

        /// Display the model
        #[arg(short, long)]
        model: bool,

        /// Display a stack trace of the evaluation
        #[arg(short, long)]
        stack: bool,
    },

    /// Parse expressions and show their representations
    #[command(after_help = "Expression examples:\n  \
        P \\/ Q /\\ ~R -> S\n  \
        ((a or c) or d)\n  \
        throw_money_in_machine implies candy_rolls_out\n  \
        ! ~ not ~ ! True\n  \
        ◇d \\/ not ◇◇t")]
    Parse {
        /// Logic expressions (quote each one)
        #[arg(value_name = "EXPRESSION", required = true)]
        expressions: Vec<String>,
    },

    /// Render a formula's parse graph in DOT format
    Dot {
        /// Expression to draw
        expression: String,

        /// File to write the DOT output to (default stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    match cli.command {
        Commands::Check {
            file,
            expression,
            model,
            stack,
        } => {
            let kripke = Kripke::from_path(&file)?;
            let manager = ExprManager::new();
            let f = manager.parse(&expression)?;

            if model {
                println!("𝓜  consists of the triplet (W, R, V):");
                println!("{}", kripke);
                println!();
            }

            if stack {
                println!("stack based evaluation");
                println!("{}", "-".repeat(32));
                let (_, trace) = manager.calc_trace(f, &kripke);
                println!("{}", trace);
                println!();
            }

            if manager.entails(&kripke, f) {
                println!("𝓜  ⊨ {}", manager.to_text(f));
            } else {
                println!("𝓜  ⊭ {}", manager.to_text(f));

                let holds = manager.calc(f, &kripke);
                if !holds.is_empty() {
                    println!("However,");
                    let mut names: Vec<&str> = holds.iter().map(|w| kripke.world_name(w)).collect();
                    names.sort_unstable();
                    for name in names {
                        println!("𝓜 , {} ⊨ {}", name, manager.to_text(f));
                    }
                }
            }
        }

        Commands::Parse { expressions } => {
            let manager = ExprManager::new();
            for input in expressions {
                println!("Input                  : '{}'", input);
                match manager.parse(&input) {
                    Ok(f) => {
                        println!("Internal representation: {}", manager.to_repr(f));
                        println!("Human    representation: {}", manager.to_text(f));
                        println!();
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        println!("Input could not be parsed");
                    }
                }
            }
        }

        Commands::Dot { expression, output } => {
            let manager = ExprManager::new();
            let f = manager.parse(&expression)?;
            let dot = manager.to_dot(&[f])?;

            match output {
                Some(path) => std::fs::write(path, dot)?,
                None => print!("{}", dot),
            }
        }
    }

    Ok(())
}
