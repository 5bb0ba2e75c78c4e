//! Interactive mode: with no file argument, read one statement at a time
//! from standard input.
//!
//! Each line is parsed and run as its own tiny program through
//! [`driver::run_source`], so a clause declared on one line is visible to
//! a query on the next — every line shares one knowledge base by being
//! accumulated into `history` and replayed, the simplest realization that
//! needs no engine API the batch driver doesn't already have. A handful
//! of `:`-prefixed meta-commands are handled by the reader itself rather
//! than the engine; syntax highlighting and other terminal-UI niceties
//! are out of scope, but these meta-commands are the thin slice of that
//! UI this crate still needs to *recognize*.

use std::io::{self, BufRead, Write};

use noetic_engine::StdoutSink;
use noetic_judge::{HttpJudge, JudgeConfig};

use crate::driver;

const HELP_TEXT: &str = "\
:help       show this message
:kb         print the accumulated program text
:kb_save    (not implemented in this build)
:kb_load    (not implemented in this build)
:clear      forget everything entered so far
:quit       exit";

/// Runs the read-eval-print loop against a judge built fresh from
/// `judge_config` for every line — each line gets its own [`Engine`]
/// (re-parsed from the accumulated history), so it needs its own judge
/// rather than one consumed by a single earlier run.
pub async fn run(judge_config: JudgeConfig) {
    let stdin = io::stdin();
    let mut history = String::new();

    loop {
        print!("?- ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);

        match line.trim() {
            ":quit" => break,
            ":help" => {
                println!("{HELP_TEXT}");
                continue;
            }
            ":kb" => {
                print!("{history}");
                continue;
            }
            ":clear" => {
                history.clear();
                continue;
            }
            ":kb_save" | ":kb_load" => {
                println!("{line}: not implemented in this build");
                continue;
            }
            "" => continue,
            _ => {}
        }

        let mut candidate = history.clone();
        candidate.push_str(line);
        candidate.push('\n');

        // A lex or parse error on this line leaves `history` — and
        // therefore every previously accepted statement — untouched.
        let judge = HttpJudge::new(judge_config.clone());
        match driver::run_source(&candidate, Box::new(judge), Box::new(StdoutSink)).await {
            Ok(()) => history = candidate,
            Err(e) => eprintln!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HELP_TEXT;

    #[test]
    fn help_text_lists_every_meta_command() {
        for cmd in [":help", ":kb", ":kb_save", ":kb_load", ":clear", ":quit"] {
            assert!(HELP_TEXT.contains(cmd), "missing {cmd}");
        }
    }
}
