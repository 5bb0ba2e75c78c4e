//! The driver: wires the lexer/parser to the resolution engine and
//! streams solutions to an output sink.
//!
//! Loads all declarations into the knowledge base in program order, then
//! streams every query's solutions as they are produced, in program
//! order.

use futures::StreamExt;

use noetic_base::Interner;
use noetic_engine::{Engine, OutputSink};
use noetic_judge::Judge;
use noetic_kb::KnowledgeBase;
use noetic_print::render_binding;
use noetic_term::{Declaration, Goals};

/// A lex or parse error, fatal to the whole program — exit code is
/// non-zero on lex/parse error; the lexer's own errors are folded into
/// [`noetic_syntax::ParseError`] by [`noetic_syntax::parse_program`]. A
/// [`noetic_engine::ResolutionError`] during a query is handled
/// separately — it aborts only that query and is reported through the
/// output sink rather than as a `DriverError`.
#[derive(Debug)]
pub struct DriverError(noetic_syntax::ParseError);

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DriverError {}

impl From<noetic_syntax::ParseError> for DriverError {
    fn from(e: noetic_syntax::ParseError) -> Self {
        DriverError(e)
    }
}

/// Parses `source`, loads every non-query declaration into a fresh
/// knowledge base (in program order), and runs every query in program
/// order against `judge`, writing output through `sink` — `print`,
/// `println`, and `nl` as well as the driver's own `Bindings:`/`True`/
/// `False` lines all land on the same stream.
///
/// Returns `Ok(())` on a clean parse regardless of whether individual
/// queries found solutions; query failure is ordinary control flow, not
/// a driver error.
pub async fn run_source(
    source: &str,
    judge: Box<dyn Judge>,
    sink: Box<dyn OutputSink>,
) -> Result<(), DriverError> {
    let mut interner = Interner::new();
    let program = noetic_syntax::parse_program(source, &mut interner)?;

    let mut kb = KnowledgeBase::new(&mut interner);
    let mut queries: Vec<Goals> = Vec::new();
    for decl in program.declarations {
        match decl {
            Declaration::Query(goals) => queries.push(goals),
            other => kb.load(other),
        }
    }

    let engine = Engine::new(kb, judge, interner).with_output(sink);
    for goals in queries {
        run_one_query(&engine, goals).await;
    }
    Ok(())
}

/// Runs a single query to exhaustion, printing `Bindings:` sections for
/// each solution and the `True`/`False` terminator, unless a
/// side-effecting built-in fired during evaluation.
async fn run_one_query(engine: &Engine, goals: Goals) {
    let free_vars = noetic_engine::free_variables(&goals);
    let mut stream = engine.run_query(goals);
    let mut had_solution = false;

    while let Some(result) = stream.next().await {
        match result {
            Ok(subst) => {
                had_solution = true;
                if !free_vars.is_empty() {
                    engine.output_mut().write("Bindings:");
                    engine.output_mut().newline();
                    let interner = engine.interner();
                    for var in &free_vars {
                        let resolved = noetic_term::resolve(
                            &noetic_term::Term::var(*var),
                            &subst,
                            engine.knowledge_base(),
                        );
                        let line = render_binding(interner.resolve(*var), &resolved, &interner);
                        engine.output_mut().write(&line);
                        engine.output_mut().newline();
                    }
                }
            }
            Err(e) => {
                log::warn!("query aborted: {e}");
                engine.output_mut().write(&format!("Error: {e}"));
                engine.output_mut().newline();
                return;
            }
        }
    }

    if !engine.had_side_effects() {
        engine
            .output_mut()
            .write(if had_solution { "True" } else { "False" });
        engine.output_mut().newline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noetic_engine::BufferSink;
    use noetic_judge::FakeJudge;

    async fn run(source: &str) -> String {
        let sink = BufferSink::new();
        run_source(source, Box::new(FakeJudge::new()), Box::new(sink.clone()))
            .await
            .unwrap();
        sink.contents().to_string()
    }

    #[tokio::test]
    async fn ground_query_with_a_solution_prints_true_with_no_bindings() {
        let out = run("man(socrates).\nmortal(X) :- man(X).\n? mortal(socrates).").await;
        assert_eq!(out, "True\n");
    }

    #[tokio::test]
    async fn query_with_no_matching_clause_prints_false() {
        let out = run("man(socrates).\n? man(plato).").await;
        assert_eq!(out, "False\n");
    }

    #[tokio::test]
    async fn free_variable_query_prints_bindings_then_true() {
        let out = run("color(red).\ncolor(green).\n? color(C).").await;
        assert_eq!(
            out,
            "Bindings:\nC = red\nBindings:\nC = green\nTrue\n"
        );
    }

    #[tokio::test]
    async fn side_effects_suppress_the_terminator() {
        let out = run("? println(\"hi\").").await;
        assert_eq!(out, "hi\n");
    }

    #[tokio::test]
    async fn lex_error_is_reported_and_stops_the_batch() {
        let sink = BufferSink::new();
        let result = run_source(
            "\"unterminated",
            Box::new(FakeJudge::new()),
            Box::new(sink),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn multiple_queries_run_in_program_order() {
        let out = run("p(1).\np(2).\n? p(1).\n? p(3).").await;
        assert_eq!(out, "True\nFalse\n");
    }
}
