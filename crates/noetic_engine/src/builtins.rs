//! The built-in predicate table.
//!
//! Dispatch keys on exact `(name, arity)`, with `print`/`println` as the
//! one wildcard-arity exception. A miss here is not an error: [`dispatch`]
//! returns `None` and `Engine::solve_call` falls through to ordinary
//! clause lookup, which yields zero solutions for an undefined predicate —
//! the same failure a missing user clause produces, with no special
//! "undefined predicate" error needed.

use async_stream::stream;
use futures::StreamExt;

use noetic_base::Symbol;
use noetic_term::{deref, resolve, unify, Term};

use crate::engine::{fresh_barrier, term_to_goal, term_to_text, Engine, SolutionStream};
use crate::error::ResolutionError;
use crate::io::{InputSource, OutputSink};

pub(crate) fn dispatch(
    engine: &Engine,
    name: Symbol,
    args: Vec<Term>,
    subst: noetic_term::Substitution,
) -> Option<SolutionStream<'_>> {
    let name_str = engine.interner().resolve(name).to_string();
    match name_str.as_str() {
        "print" => return Some(print_builtin(engine, args, subst, false)),
        "println" => return Some(print_builtin(engine, args, subst, true)),
        _ => {}
    }
    match (name_str.as_str(), args.len()) {
        ("nl", 0) => Some(print_builtin(engine, vec![], subst, true)),
        ("readln", 1) => Some(readln_builtin(engine, args, subst)),
        ("member", 2) => Some(member_builtin(engine, args, subst)),
        ("append", 3) => Some(append_builtin(engine, args, subst)),
        ("length", 2) => Some(length_builtin(engine, args, subst)),
        ("reverse", 2) => Some(reverse_builtin(engine, args, subst)),
        ("is_list", 1) => Some(is_list_builtin(engine, args, subst)),
        ("is_atom", 1) => Some(is_atom_builtin(engine, args, subst)),
        ("is_bound", 1) => Some(is_bound_builtin(engine, args, subst)),
        ("is_unbound", 1) => Some(is_unbound_builtin(engine, args, subst)),
        ("findall", 3) => Some(findall_builtin(engine, args, subst)),
        ("setof", 3) => Some(setof_builtin(engine, args, subst)),
        ("bagof", 3) => Some(bagof_builtin(engine, args, subst)),
        ("has_attr", 2) => Some(has_attr_builtin(engine, args, subst)),
        ("share_attr", 3) => Some(share_attr_builtin(engine, args, subst)),
        ("differentia", 3) => Some(differentia_builtin(engine, args, subst)),
        ("similar_attr", 3) => Some(similar_attr_builtin(engine, args, subst)),
        ("call", 1) => Some(call_builtin(engine, args, subst)),
        _ => None,
    }
}

/// `print/N`, `println/N`, `nl/0`: writes every argument's surface
/// form, unquoted, with no separator, then a newline if `newline`.
fn print_builtin(
    engine: &Engine,
    args: Vec<Term>,
    subst: noetic_term::Substitution,
    newline: bool,
) -> SolutionStream<'_> {
    Box::pin(stream! {
        let mut text = String::new();
        {
            let interner = engine.interner();
            for arg in &args {
                let resolved = resolve(arg, &subst, engine.knowledge_base());
                text.push_str(&noetic_print::render_term(&resolved, &interner, false));
            }
        }
        let mut out = engine.output_mut();
        out.write(&text);
        if newline {
            out.newline();
        }
        drop(out);
        engine.mark_side_effect();
        yield Ok(subst);
    })
}

/// `readln(X)`: `X` must be unbound. Reading past end of input
/// fails silently; anything else is a [`ResolutionError`].
fn readln_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let target = args[0].clone();
        let is_unbound = match &target {
            Term::Var { name, anonymous: false } => subst.get(*name).is_none(),
            _ => false,
        };
        if !is_unbound {
            yield Err(ResolutionError::new("readln/1 target must be an unbound variable"));
            return;
        }
        if let Some(line) = engine.input_mut().read_line() {
            engine.mark_side_effect();
            let bound = unify(&target, &Term::Str(line), &subst, engine.knowledge_base())
                .expect("an unbound variable always unifies");
            yield Ok(bound);
        }
    })
}

/// `member(X, L)`: one solution per element of `L`, in order. A
/// partial list (unresolved tail) only yields its known prefix.
fn member_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let x = args[0].clone();
        let list = resolve(&args[1], &subst, engine.knowledge_base());
        let items = list.as_proper_list().unwrap_or_else(|| match &list {
            Term::List { items, .. } => items.clone(),
            _ => Vec::new(),
        });
        for item in items {
            if let Some(s) = unify(&x, &item, &subst, engine.knowledge_base()) {
                yield Ok(s);
            }
        }
    })
}

/// `append(A, B, C)`: deterministic when `A` is ground, otherwise
/// enumerates every split of a ground `C` (classic reversible `append/3`).
fn append_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let a_arg = args[0].clone();
        let b_arg = args[1].clone();
        let c_arg = args[2].clone();
        let a = resolve(&a_arg, &subst, engine.knowledge_base());
        if let Some(items_a) = a.as_proper_list() {
            let combined = if items_a.is_empty() {
                b_arg.clone()
            } else {
                Term::List {
                    items: items_a,
                    tail: Some(Box::new(b_arg.clone())),
                }
            };
            if let Some(s) = unify(&c_arg, &combined, &subst, engine.knowledge_base()) {
                yield Ok(s);
            }
            return;
        }
        let c = resolve(&c_arg, &subst, engine.knowledge_base());
        if let Some(items_c) = c.as_proper_list() {
            for split in 0..=items_c.len() {
                let (prefix, suffix) = items_c.split_at(split);
                let a_candidate = Term::proper_list(prefix.to_vec());
                let b_candidate = Term::proper_list(suffix.to_vec());
                if let Some(s1) = unify(&a_arg, &a_candidate, &subst, engine.knowledge_base()) {
                    if let Some(s2) = unify(&b_arg, &b_candidate, &s1, engine.knowledge_base()) {
                        yield Ok(s2);
                    }
                }
            }
        }
    })
}

/// `length(L, N)`: `L` must already be a ground proper list.
fn length_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let list = resolve(&args[0], &subst, engine.knowledge_base());
        if let Some(items) = list.as_proper_list() {
            if let Some(s) = unify(&args[1], &Term::Number(items.len() as f64), &subst, engine.knowledge_base()) {
                yield Ok(s);
            }
        }
    })
}

/// `reverse(L, R)`: works in either direction, whichever side
/// resolves to a ground proper list first.
fn reverse_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let l = resolve(&args[0], &subst, engine.knowledge_base());
        if let Some(mut items) = l.as_proper_list() {
            items.reverse();
            if let Some(s) = unify(&args[1], &Term::proper_list(items), &subst, engine.knowledge_base()) {
                yield Ok(s);
            }
            return;
        }
        let r = resolve(&args[1], &subst, engine.knowledge_base());
        if let Some(mut items) = r.as_proper_list() {
            items.reverse();
            if let Some(s) = unify(&args[0], &Term::proper_list(items), &subst, engine.knowledge_base()) {
                yield Ok(s);
            }
        }
    })
}

fn is_list_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let t = deref(&args[0], &subst, engine.knowledge_base());
        if t.is_proper_list() {
            yield Ok(subst);
        }
    })
}

fn is_atom_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let t = deref(&args[0], &subst, engine.knowledge_base());
        if matches!(t, Term::Atom(_)) {
            yield Ok(subst);
        }
    })
}

fn is_bound_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let t = deref(&args[0], &subst, engine.knowledge_base());
        if !t.is_var() {
            yield Ok(subst);
        }
    })
}

fn is_unbound_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let t = deref(&args[0], &subst, engine.knowledge_base());
        if t.is_var() && !t.is_anonymous() {
            yield Ok(subst);
        }
    })
}

/// Runs `goal` (the second argument of `findall`/`setof`/`bagof`, written
/// in term syntax) to exhaustion, collecting `template` resolved against
/// each solution.
async fn collect_all(
    engine: &Engine,
    template: &Term,
    goal_term: &Term,
    subst: &noetic_term::Substitution,
) -> Result<Vec<Term>, ResolutionError> {
    let resolved_goal = resolve(goal_term, subst, engine.knowledge_base());
    let goal = term_to_goal(&resolved_goal)
        .ok_or_else(|| ResolutionError::new("findall/setof/bagof goal must be an atom or compound"))?;
    let mut stream = engine.solve_goals(vec![goal], subst.clone(), fresh_barrier());
    let mut out = Vec::new();
    while let Some(result) = stream.next().await {
        match result {
            Ok(s) => out.push(resolve(template, &s, engine.knowledge_base())),
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

fn dedup(items: Vec<Term>) -> Vec<Term> {
    let mut out: Vec<Term> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// `findall(Template, Goal, List)`: always succeeds, `List` is
/// `[]` when `Goal` has no solutions.
fn findall_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        match collect_all(engine, &args[0], &args[1], &subst).await {
            Ok(items) => {
                if let Some(s) = unify(&args[2], &Term::proper_list(items), &subst, engine.knowledge_base()) {
                    yield Ok(s);
                }
            }
            Err(e) => yield Err(e),
        }
    })
}

/// `bagof(Template, Goal, List)`: like `findall`, but fails
/// outright when `Goal` has no solutions.
fn bagof_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        match collect_all(engine, &args[0], &args[1], &subst).await {
            Ok(items) if items.is_empty() => {}
            Ok(items) => {
                if let Some(s) = unify(&args[2], &Term::proper_list(items), &subst, engine.knowledge_base()) {
                    yield Ok(s);
                }
            }
            Err(e) => yield Err(e),
        }
    })
}

/// `setof(Template, Goal, List)`: `bagof` with duplicates removed
/// (first occurrence kept, order otherwise preserved).
fn setof_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        match collect_all(engine, &args[0], &args[1], &subst).await {
            Ok(items) if items.is_empty() => {}
            Ok(items) => {
                let deduped = dedup(items);
                if let Some(s) = unify(&args[2], &Term::proper_list(deduped), &subst, engine.knowledge_base()) {
                    yield Ok(s);
                }
            }
            Err(e) => yield Err(e),
        }
    })
}

/// `has_attr(C, X)`: defers to the judge; a non-textual
/// argument simply fails rather than erroring, matching the judge's own
/// silent-failure contract.
fn has_attr_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let c = resolve(&args[0], &subst, engine.knowledge_base());
        let x = resolve(&args[1], &subst, engine.knowledge_base());
        let texts = {
            let interner = engine.interner();
            match (term_to_text(&c, &interner), term_to_text(&x, &interner)) {
                (Some(c), Some(x)) => Some((c, x)),
                _ => None,
            }
        };
        if let Some((c_text, x_text)) = texts {
            if engine.judge().has_attribute(&c_text, &x_text).await {
                yield Ok(subst);
            }
        }
    })
}

/// `share_attr(C, X, Y)`: defers to the judge.
fn share_attr_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let c = resolve(&args[0], &subst, engine.knowledge_base());
        let x = resolve(&args[1], &subst, engine.knowledge_base());
        let y = resolve(&args[2], &subst, engine.knowledge_base());
        let texts = {
            let interner = engine.interner();
            match (term_to_text(&c, &interner), term_to_text(&x, &interner), term_to_text(&y, &interner)) {
                (Some(c), Some(x), Some(y)) => Some((c, x, y)),
                _ => None,
            }
        };
        if let Some((c_text, x_text, y_text)) = texts {
            if engine.judge().share_attribute(&c_text, &x_text, &y_text).await {
                yield Ok(subst);
            }
        }
    })
}

/// `differentia(A, B, R)`: fails if the judge cannot answer
/// (an empty string), otherwise binds `R` to the judge's answer.
fn differentia_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let a = resolve(&args[0], &subst, engine.knowledge_base());
        let b = resolve(&args[1], &subst, engine.knowledge_base());
        let texts = {
            let interner = engine.interner();
            match (term_to_text(&a, &interner), term_to_text(&b, &interner)) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            }
        };
        let Some((a_text, b_text)) = texts else { return };
        let answer = engine.judge().differentia(&a_text, &b_text).await;
        if answer.is_empty() {
            return;
        }
        if let Some(s) = unify(&args[2], &Term::Str(answer), &subst, engine.knowledge_base()) {
            yield Ok(s);
        }
    })
}

/// `similar_attr(Axis, A, B)`: defers to the judge.
fn similar_attr_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let axis = resolve(&args[0], &subst, engine.knowledge_base());
        let a = resolve(&args[1], &subst, engine.knowledge_base());
        let b = resolve(&args[2], &subst, engine.knowledge_base());
        let texts = {
            let interner = engine.interner();
            match (term_to_text(&axis, &interner), term_to_text(&a, &interner), term_to_text(&b, &interner)) {
                (Some(axis), Some(a), Some(b)) => Some((axis, a, b)),
                _ => None,
            }
        };
        if let Some((axis_text, a_text, b_text)) = texts {
            if engine.judge().similar_along_axis(&axis_text, &a_text, &b_text).await {
                yield Ok(subst);
            }
        }
    })
}

/// `call(G)`: the one meta-call built-in, sharing `term_to_goal` with
/// `findall`/`setof`/`bagof`'s second argument.
fn call_builtin(engine: &Engine, args: Vec<Term>, subst: noetic_term::Substitution) -> SolutionStream<'_> {
    Box::pin(stream! {
        let resolved = resolve(&args[0], &subst, engine.knowledge_base());
        match term_to_goal(&resolved) {
            Some(goal) => {
                let mut inner = engine.solve_goals(vec![goal], subst, fresh_barrier());
                while let Some(r) = inner.next().await {
                    yield r;
                }
            }
            None => yield Err(ResolutionError::new("call/1 target must be an atom or compound")),
        }
    })
}
