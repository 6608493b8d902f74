use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    DefaultHinter, EditMode, Emacs, FileBackedHistory, Prompt, PromptEditMode,
    PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal, Vi,
};

use crate::highlighter::WormsHighlighter;
use crate::runner::{Runner, TurnReport};

struct WormsPrompt;

impl Prompt for WormsPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(Color::Green.bold().paint("worms").to_string())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> std::borrow::Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Vi(reedline::PromptViMode::Normal) => std::borrow::Cow::Borrowed(": "),
            _ => std::borrow::Cow::Borrowed("> "),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("... > ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        std::borrow::Cow::Owned(format!("{}search: ", prefix))
    }
}

fn history_path() -> Option<std::path::PathBuf> {
    let data_dir = std::env::var_os("XDG_DATA_HOME")
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| std::path::PathBuf::from(h).join(".local/share"))
        })?
        .join("worms");
    std::fs::create_dir_all(&data_dir).ok()?;
    Some(data_dir.join("history.txt"))
}

pub fn run_repl(vi_mode: bool) {
    let mut runner = Runner::new(0);
    let mut budget: f64 = 10.0;

    let edit_mode: Box<dyn EditMode> = if vi_mode {
        Box::new(Vi::new(
            default_vi_insert_keybindings(),
            default_vi_normal_keybindings(),
        ))
    } else {
        Box::new(Emacs::new(default_emacs_keybindings()))
    };

    let mut editor = Reedline::create()
        .with_highlighter(Box::new(WormsHighlighter))
        .with_hinter(Box::new(
            DefaultHinter::default().with_style(Style::new().fg(Color::DarkGray)),
        ))
        .with_edit_mode(edit_mode);
    if let Some(path) = history_path() {
        if let Ok(history) = FileBackedHistory::with_file(500, path) {
            editor = editor.with_history(Box::new(history));
        }
    }

    println!("worm control program REPL. Type 'help' for commands.");
    loop {
        match editor.read_line(&WormsPrompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if !dispatch(line, &mut runner, &mut budget) {
                    break;
                }
            }
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Err(e) => {
                eprintln!("input error: {}", e);
                break;
            }
        }
    }
}

/// Handle one REPL line. Returns false to exit.
fn dispatch(line: &str, runner: &mut Runner, budget: &mut f64) -> bool {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("quit") | Some("exit") => return false,
        Some("help") => print_help(),
        Some("state") => {
            for entry in runner.describe_state() {
                println!("{}", entry);
            }
            if let (Some(status), Some(points)) = (runner.status(), runner.points()) {
                println!("program: {:?}, {} points carried", status, points);
            }
        }
        Some("load") => match words.next() {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(source) => report_load(runner.load(&source)),
                Err(e) => eprintln!("cannot read '{}': {}", path, e),
            },
            None => eprintln!("usage: load <file>"),
        },
        Some("turn") => {
            let granted = match words.next() {
                Some(amount) => match amount.parse() {
                    Ok(v) => v,
                    Err(_) => {
                        eprintln!("invalid budget '{}'", amount);
                        return true;
                    }
                },
                None => *budget,
            };
            report_turn(runner.turn(granted));
        }
        Some("budget") => match words.next().and_then(|w| w.parse().ok()) {
            Some(value) => *budget = value,
            None => println!("budget is {}", budget),
        },
        Some("seed") => match words.next().and_then(|w| w.parse().ok()) {
            Some(value) => {
                runner.set_seed(value);
                report_load(runner.reset());
            }
            None => eprintln!("usage: seed <n>"),
        },
        Some("reset") => report_load(runner.reset()),
        // Anything else is program source; load it directly.
        Some(_) => report_load(runner.load(line)),
        None => {}
    }
    true
}

fn report_load(result: Result<(), String>) {
    match result {
        Ok(()) => println!("program loaded"),
        Err(rendered) => eprintln!("{}", rendered),
    }
}

fn report_turn(report: TurnReport) {
    match report {
        TurnReport::NoProgram => eprintln!("no program loaded"),
        TurnReport::Suspended { lines, actions } => {
            for action in &actions {
                println!("{}", action);
            }
            for line in &lines {
                println!("print: {}", line);
            }
        }
        TurnReport::Finished { lines, actions } => {
            for action in &actions {
                println!("{}", action);
            }
            for line in &lines {
                println!("print: {}", line);
            }
            println!("program finished");
        }
        TurnReport::Crashed {
            lines,
            actions,
            fault,
        } => {
            for action in &actions {
                println!("{}", action);
            }
            for line in &lines {
                println!("print: {}", line);
            }
            eprintln!("program crashed\n{}", fault);
        }
    }
}

fn print_help() {
    println!(
        "\
Commands:
  load <file>     Compile a program and start it in a fresh arena
  turn [points]   Grant a turn budget and resume the program
  budget [n]      Show or set the default per-turn budget
  state           Show the arena and program status
  seed <n>        Reseed and restart the current program
  reset           Restart the current program
  quit            Leave the REPL

Anything else is treated as program source and loaded directly, e.g.:
  x := 0.0; while (x < 3.0) {{ move(); x := x + 1.0; }}"
    );
}
