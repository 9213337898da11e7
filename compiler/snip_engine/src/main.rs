//! Snip CLI
//!
//! Runs scripts through the execution engine.

use snip_engine::commands::{eval_source, run_file, CliError, Report};
use snip_engine::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let outcome = match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: snip run <file> [options]");
                print_options();
                std::process::exit(1);
            }
            run_file(&args[2..]).await
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: snip eval '<source>' [options]");
                print_options();
                std::process::exit(1);
            }
            eval_source(&args[2..]).await
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "--version" | "-V" => {
            println!("snip {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    finish(outcome);
}

fn finish(outcome: Result<Report, CliError>) {
    match outcome {
        Ok(report) => {
            print!("{}", report.stdout);
            eprint!("{}", report.stderr);
            if !report.success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Snip - run scripts with injected bindings");
    println!();
    println!("Usage: snip <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>         Execute a script file");
    println!("  eval '<source>'    Execute inline source");
    println!("  help               Show this message");
    println!();
    println!("Run options:");
    println!("  --arg name=<json>  Bind a JSON value to a name (repeatable)");
    println!("  --context <json>   Value of the `context` binding");
    println!("  --stats            Print execution statistics");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=snip::console=info) to see logs.");
}

fn print_options() {
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --arg name=<json>  Bind a JSON value to a name (repeatable)");
    eprintln!("  --context <json>   Value of the `context` binding");
    eprintln!("  --stats            Print execution statistics");
}
