//! Integration tests for the resolution engine: conjunction, backtracking,
//! cut, negation, disjunction, if-then-else, and the built-in table,
//! exercised through real parsed programs rather than hand-built ASTs.

use futures::StreamExt;

use noetic_base::Interner;
use noetic_engine::{BufferSink, Engine};
use noetic_judge::FakeJudge;
use noetic_kb::KnowledgeBase;
use noetic_print::render_term;
use noetic_term::{Declaration, Goals};

fn build(source: &str) -> (Engine, Interner, Goals) {
    let mut interner = Interner::new();
    let program = noetic_syntax::parse_program(source, &mut interner).expect("valid program");
    let mut kb = KnowledgeBase::new(&mut interner);
    let mut query = None;
    for decl in program.declarations {
        if let Declaration::Query(goals) = decl {
            query = Some(goals);
        } else {
            kb.load(decl);
        }
    }
    let engine = Engine::new(kb, Box::new(FakeJudge::new()), interner);
    // Interner was moved into the engine; re-fetch nothing further needed
    // since tests only read bindings through the engine's own copy.
    let interner = Interner::new();
    (engine, interner, query.expect("program must contain a query"))
}

async fn all_solutions(engine: &Engine, goals: Goals) -> Vec<noetic_term::Substitution> {
    let mut stream = engine.run_query(goals);
    let mut out = Vec::new();
    while let Some(result) = stream.next().await {
        out.push(result.expect("no resolution error expected"));
    }
    out
}

#[tokio::test]
async fn conjunction_and_backtracking_enumerate_every_clause() {
    let (engine, _interner, query) = build(
        "man(socrates).\nman(plato).\nmortal(X) :- man(X).\n? mortal(Y).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 2);
}

#[tokio::test]
async fn cut_commits_to_the_first_matching_clause() {
    // Arithmetic comparisons are not in the built-in table, so cut is
    // exercised through a plain fact with an explicit alternative it must
    // prune rather than a `max/3` written with `>=`/`<`.
    let (engine, _interner, query) = build(
        "color(red).\ncolor(green).\nfirst_color(X) :- color(X), !.\n? first_color(C).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn negation_as_failure_succeeds_when_the_goal_has_no_solutions() {
    let (engine, _interner, query) = build(
        "bird(tweety).\nflies(X) :- bird(X), not caged(X).\n? flies(tweety).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn negation_as_failure_fails_when_the_goal_succeeds() {
    let (engine, _interner, query) = build(
        "bird(tweety).\ncaged(tweety).\nflies(X) :- bird(X), not caged(X).\n? flies(tweety).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert!(solutions.is_empty());
}

#[tokio::test]
async fn disjunction_yields_solutions_from_both_branches() {
    let (engine, _interner, query) = build(
        "pet(cat).\npet(dog).\nlikeable(X) :- (X == cat ; X == dog).\n? likeable(cat).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn if_then_else_commits_to_the_condition_without_backtracking_into_it() {
    let (engine, _interner, query) = build(
        "shape(circle).\nshape(square).\nclassify(X, round) :- (X == circle -> true_branch(X) ; false_branch(X)).\ntrue_branch(_).\nfalse_branch(_).\n? classify(circle, round).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn two_arm_if_then_fails_when_the_condition_fails() {
    let (engine, _interner, query) = build(
        "shape(circle).\nclassify(X) :- (X == square -> true_branch(X)).\ntrue_branch(_).\n? classify(circle).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert!(solutions.is_empty());
}

#[tokio::test]
async fn two_arm_if_then_succeeds_when_the_condition_succeeds() {
    let (engine, _interner, query) = build(
        "shape(circle).\nclassify(X) :- (X == circle -> true_branch(X)).\ntrue_branch(_).\n? classify(circle).",
    );
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn member_enumerates_list_elements_on_backtracking() {
    let (engine, _interner, query) = build("? member(X, [a, b, c]).");
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 3);
}

#[tokio::test]
async fn append_builds_the_concatenated_list() {
    let (engine, _interner, query) = build("? append([a, b], [c], R).");
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn findall_collects_every_solution_into_a_list() {
    let (engine, _interner, query) =
        build("num(1).\nnum(2).\nnum(3).\n? findall(X, num(X), L).");
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn findall_yields_the_empty_list_on_no_solutions() {
    let (engine, _interner, query) = build("? findall(X, nonexistent(X), L).");
    let solutions = all_solutions(&engine, query).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn bagof_fails_outright_on_no_solutions() {
    let (engine, _interner, query) = build("? bagof(X, nonexistent(X), L).");
    let solutions = all_solutions(&engine, query).await;
    assert!(solutions.is_empty());
}

#[tokio::test]
async fn semantic_match_defers_to_the_judge() {
    let mut interner = Interner::new();
    let program = noetic_syntax::parse_program(
        "wise(X) :- X =~= \"philosopher\".\n? wise(\"thinker\").",
        &mut interner,
    )
    .expect("valid program");
    let mut kb = KnowledgeBase::new(&mut interner);
    let mut query = None;
    for decl in program.declarations {
        if let Declaration::Query(goals) = decl {
            query = Some(goals);
        } else {
            kb.load(decl);
        }
    }
    let judge = FakeJudge::new().with_identical("thinker", "philosopher", true);
    let engine = Engine::new(kb, Box::new(judge), interner);
    let solutions = all_solutions(&engine, query.unwrap()).await;
    assert_eq!(solutions.len(), 1);
}

#[tokio::test]
async fn println_writes_to_the_output_sink_and_suppresses_nothing_itself() {
    let mut interner = Interner::new();
    let program = noetic_syntax::parse_program("? println(\"hello\").", &mut interner)
        .expect("valid program");
    let kb = KnowledgeBase::new(&mut interner);
    let mut query = None;
    for decl in program.declarations {
        if let Declaration::Query(goals) = decl {
            query = Some(goals);
        }
    }
    let engine = Engine::new(kb, Box::new(FakeJudge::new()), interner)
        .with_output(Box::new(BufferSink::new()));
    let solutions = all_solutions(&engine, query.unwrap()).await;
    assert_eq!(solutions.len(), 1);
    assert!(engine.had_side_effects());
}

#[tokio::test]
async fn render_term_round_trips_a_bound_variable() {
    let (engine, _interner, query) = build("greeting(hello).\n? greeting(X).");
    let mut stream = engine.run_query(query);
    let subst = stream.next().await.unwrap().unwrap();
    let interner = engine.interner();
    let bound = noetic_term::resolve(
        &noetic_term::Term::var(interner.lookup("X").unwrap()),
        &subst,
        engine.knowledge_base(),
    );
    assert_eq!(render_term(&bound, &interner, true), "hello");
}
