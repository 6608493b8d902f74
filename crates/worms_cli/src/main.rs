use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

mod highlighter;
mod repl;
mod runner;

use runner::{Runner, TurnReport};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let vi_mode = args.iter().any(|a| a == "--vi");
    let args: Vec<&str> = args
        .iter()
        .filter(|a| *a != "--vi")
        .map(|s| s.as_str())
        .collect();

    match args.first().copied() {
        Some("check") => {
            if args.len() < 2 {
                eprintln!("usage: worms check <files...>");
                process::exit(1);
            }
            check_files(&args[1..]);
        }
        Some("run") => run_command(&args[1..]),
        Some(other) => {
            eprintln!("unknown subcommand: {}", other);
            eprintln!("usage: worms [--vi] [check <files...> | run <program.wcp>]");
            process::exit(1);
        }
        None => {
            if io::stdin().is_terminal() {
                repl::run_repl(vi_mode);
            } else {
                run_pipe();
            }
        }
    }
}

/// Pipe mode: read a whole program from stdin and run it with defaults.
fn run_pipe() {
    let source = match io::read_to_string(io::stdin()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("read error: {}", e);
            process::exit(1);
        }
    };
    run_source("<stdin>", &source, 0, 10.0, 20);
}

/// `worms run <file> [--seed N] [--budget N] [--turns N]`
fn run_command(args: &[&str]) {
    let mut path: Option<&str> = None;
    let mut seed: u64 = 0;
    let mut budget: f64 = 10.0;
    let mut turns: u32 = 20;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--seed" | "--budget" | "--turns" => {
                let flag = args[i];
                let Some(value) = args.get(i + 1) else {
                    eprintln!("{} needs a value", flag);
                    process::exit(1);
                };
                match flag {
                    "--seed" => seed = parse_flag(flag, value),
                    "--budget" => budget = parse_flag(flag, value),
                    _ => turns = parse_flag(flag, value),
                }
                i += 2;
            }
            other if path.is_none() => {
                path = Some(other);
                i += 1;
            }
            other => {
                eprintln!("unexpected argument: {}", other);
                process::exit(1);
            }
        }
    }

    let Some(path) = path else {
        eprintln!("usage: worms run <program.wcp> [--seed N] [--budget N] [--turns N]");
        process::exit(1);
    };
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cannot read '{}': {}", path, e);
            process::exit(1);
        }
    };
    run_source(path, &source, seed, budget, turns);
}

fn parse_flag<T: std::str::FromStr>(flag: &str, value: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("invalid value for {}: '{}'", flag, value);
            process::exit(1);
        }
    }
}

fn run_source(label: &str, source: &str, seed: u64, budget: f64, turns: u32) {
    let mut runner = Runner::new(seed);
    if let Err(rendered) = runner.load(source) {
        eprintln!("{}: {}", label, rendered);
        process::exit(1);
    }

    for turn in 1..=turns {
        let report = runner.turn(budget);
        print_report(turn, &report);
        match report {
            TurnReport::Suspended { .. } => {}
            TurnReport::Finished { .. } => return,
            TurnReport::Crashed { .. } => process::exit(1),
            TurnReport::NoProgram => return,
        }
    }
    println!("stopped after {} turns", turns);
}

fn print_report(turn: u32, report: &TurnReport) {
    match report {
        TurnReport::NoProgram => println!("no program loaded"),
        TurnReport::Suspended { lines, actions }
        | TurnReport::Finished { lines, actions } => {
            println!("-- turn {} --", turn);
            for action in actions {
                println!("  {}", action);
            }
            for line in lines {
                println!("  print: {}", line);
            }
            if matches!(report, TurnReport::Finished { .. }) {
                println!("program finished");
            }
        }
        TurnReport::Crashed {
            lines,
            actions,
            fault,
        } => {
            println!("-- turn {} --", turn);
            for action in actions {
                println!("  {}", action);
            }
            for line in lines {
                println!("  print: {}", line);
            }
            eprintln!("program crashed\n{}", fault);
        }
    }
}

/// `worms check <files...>` with glob support.
fn check_files(file_args: &[&str]) {
    let mut paths: Vec<PathBuf> = Vec::new();
    for arg in file_args {
        if arg.contains('*') || arg.contains('?') || arg.contains('[') {
            match glob::glob(arg) {
                Ok(entries) => {
                    let mut found = false;
                    for entry in entries {
                        match entry {
                            Ok(path) => {
                                paths.push(path);
                                found = true;
                            }
                            Err(e) => {
                                eprintln!("glob error for '{}': {}", arg, e);
                                process::exit(1);
                            }
                        }
                    }
                    if !found {
                        eprintln!("no files matched pattern '{}'", arg);
                        process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("invalid glob pattern '{}': {}", arg, e);
                    process::exit(1);
                }
            }
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    let mut had_error = false;
    for path in &paths {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("cannot read '{}': {}", path.display(), e);
                process::exit(1);
            }
        };
        match runner::check_source(&source) {
            Ok(()) => println!("{}: ok", path.display()),
            Err(rendered) => {
                eprintln!("{}:\n{}", path.display(), rendered);
                had_error = true;
            }
        }
    }
    if had_error {
        process::exit(1);
    }
}

fn print_usage() {
    println!(
        "\
worms — worm control program interpreter

USAGE:
  worms [--vi]                          Start the interactive REPL
  worms run <program.wcp> [options]     Run a program in the demo arena
  worms check <files...>                Parse and type-check programs
  cat prog.wcp | worms                  Pipe mode (run with defaults)

RUN OPTIONS:
  --seed N      Random seed for the arena (default 0)
  --budget N    Action points granted per turn (default 10)
  --turns N     Turn limit (default 20)

FLAGS:
  --vi          Use vi keybindings in the REPL
  -h, --help    Show this help

REPL:
  Type 'help' inside the REPL for a list of commands."
    );
}
