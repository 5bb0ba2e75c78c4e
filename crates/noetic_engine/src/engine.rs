//! The resolution engine: a lazy asynchronous sequence of substitutions
//! for a goal sequence.
//!
//! Each `solve_*` method is an async tree-walk over the goal AST, but
//! instead of returning a single `Result` it returns a boxed `Stream` of
//! solutions, built with `async-stream` rather than a hand-rolled state
//! machine. That lets a conjunction pull one solution from its first goal,
//! lazily drive the rest of the conjunction against it, and backtrack into
//! the first goal for its next solution only once the rest is exhausted.
//!
//! Every `solve_*` method takes its goals/terms **by value**. Clause
//! bodies are already owned once renamed; taking everything else by value
//! too keeps every method signature free of a second lifetime tangled with
//! `&'a self`, at the cost of the occasional clone — a fair trade in an
//! interpreter where clause bodies are small.

use std::cell::{Cell, RefCell};
use std::pin::Pin;
use std::rc::Rc;

use async_stream::stream;
use futures::{Stream, StreamExt};
use log::debug;

use noetic_base::{Interner, Symbol};
use noetic_judge::Judge;
use noetic_kb::KnowledgeBase;
use noetic_term::{resolve, unify, EqOp, Goal, Goals, Renamer, Substitution, Term};

use crate::error::ResolutionError;
use crate::io::{InputSource, OutputSink, StdinSource, StdoutSink};

pub type Solution = Result<Substitution, ResolutionError>;
pub type SolutionStream<'a> = Pin<Box<dyn Stream<Item = Solution> + 'a>>;

/// Shared per-invocation cut flag. `Rc`/`Cell` rather than
/// `Arc`/`AtomicBool`: resolution is logically single-threaded, so there
/// is never a second thread to race with.
pub(crate) type CutBarrier = Rc<Cell<bool>>;

pub(crate) fn fresh_barrier() -> CutBarrier {
    Rc::new(Cell::new(false))
}

/// Converts a term written in goal position (the second argument of
/// `findall`/`setof`/`bagof`, or the argument of `call/1`) into a goal.
/// A meta-call target that is neither a compound nor an atom has no goal
/// form, and is the one case this returns `None` for.
pub(crate) fn term_to_goal(term: &Term) -> Option<Goal> {
    match term {
        Term::Atom(name) => Some(Goal::Call {
            name: *name,
            args: vec![],
        }),
        Term::Compound { functor, args } => Some(Goal::Call {
            name: *functor,
            args: args.clone(),
        }),
        _ => None,
    }
}

/// Renders a resolved term as plain text for judge payloads. Judge prompts
/// are built from plain strings, not term syntax.
pub(crate) fn term_to_text(term: &Term, interner: &Interner) -> Option<String> {
    match term {
        Term::Str(s) => Some(s.clone()),
        Term::Atom(sym) => Some(interner.resolve(*sym).to_string()),
        _ => None,
    }
}

/// Owns the knowledge base, the judge, and the mutable bookkeeping a query
/// needs (the interner, for fresh-variable renaming; a side-effect flag,
/// for the True/False terminator suppression rule) behind interior
/// mutability, so that a solution stream can borrow the engine immutably
/// for its entire lifetime while still renaming clauses and writing
/// output as it runs.
pub struct Engine {
    kb: KnowledgeBase,
    judge: Box<dyn Judge>,
    interner: RefCell<Interner>,
    renamer: RefCell<Renamer>,
    output: RefCell<Box<dyn OutputSink>>,
    input: RefCell<Box<dyn InputSource>>,
    side_effects: Cell<bool>,
}

impl Engine {
    pub fn new(kb: KnowledgeBase, judge: Box<dyn Judge>, interner: Interner) -> Self {
        Engine {
            kb,
            judge,
            interner: RefCell::new(interner),
            renamer: RefCell::new(Renamer::new()),
            output: RefCell::new(Box::new(StdoutSink)),
            input: RefCell::new(Box::new(StdinSource)),
            side_effects: Cell::new(false),
        }
    }

    pub fn with_output(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.output = RefCell::new(sink);
        self
    }

    pub fn with_input(mut self, source: Box<dyn InputSource>) -> Self {
        self.input = RefCell::new(source);
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn interner(&self) -> std::cell::Ref<'_, Interner> {
        self.interner.borrow()
    }

    pub(crate) fn judge(&self) -> &dyn Judge {
        self.judge.as_ref()
    }

    /// Direct access to the output sink, for a driver that wants its own
    /// text (query bindings, the `True`/`False` terminator) to land on the
    /// same stream as the `print`/`println`/`nl` built-ins.
    pub fn output_mut(&self) -> std::cell::RefMut<'_, Box<dyn OutputSink>> {
        self.output.borrow_mut()
    }

    pub(crate) fn input_mut(&self) -> std::cell::RefMut<'_, Box<dyn InputSource>> {
        self.input.borrow_mut()
    }

    pub(crate) fn mark_side_effect(&self) {
        self.side_effects.set(true);
    }

    /// Whether a built-in with observable side effects fired since the
    /// last [`Engine::run_query`] call. The driver uses this to suppress
    /// the `True`/`False` terminator it would otherwise print.
    pub fn had_side_effects(&self) -> bool {
        self.side_effects.get()
    }

    /// Runs one top-level query: resets the side-effect flag, then solves
    /// `goals` against the empty substitution under a fresh cut barrier.
    pub fn run_query(&self, goals: Goals) -> SolutionStream<'_> {
        self.side_effects.set(false);
        self.solve_goals(goals, Substitution::new(), fresh_barrier())
    }

    /// Conjunction: solves `goals` left to right, threading the
    /// substitution through. The empty conjunction yields once.
    pub(crate) fn solve_goals(&self, goals: Goals, subst: Substitution, cut: CutBarrier) -> SolutionStream<'_> {
        Box::pin(stream! {
            if goals.is_empty() {
                yield Ok(subst);
                return;
            }
            let mut rest = goals;
            let first = rest.remove(0);
            let mut first_stream = self.solve_goal(first, subst, cut.clone());
            while let Some(result) = first_stream.next().await {
                match result {
                    Ok(s1) => {
                        let mut rest_stream = self.solve_goals(rest.clone(), s1, cut.clone());
                        while let Some(r2) = rest_stream.next().await {
                            yield r2;
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
                if cut.get() {
                    break;
                }
            }
        })
    }

    fn solve_goal(&self, goal: Goal, subst: Substitution, cut: CutBarrier) -> SolutionStream<'_> {
        match goal {
            Goal::Call { name, args } => self.solve_call(name, args, subst),
            Goal::SemanticMatch { left, right } => self.solve_semantic_match(left, right, subst),
            Goal::Equality { op, left, right } => self.solve_equality(op, left, right, subst),
            Goal::Negation(goals) => self.solve_negation(goals, subst),
            Goal::Disjunction(left, right) => self.solve_disjunction(left, right, subst, cut),
            Goal::IfThenElse {
                cond,
                then_branch,
                else_branch,
            } => self.solve_if_then_else(cond, then_branch, else_branch, subst, cut),
            Goal::Cut => self.solve_cut(subst, cut),
        }
    }

    /// `p(t1, ..., tn)`: a built-in if `p/n` is in the table, otherwise
    /// clause resolution with a fresh cut barrier shared across every
    /// candidate clause.
    fn solve_call(&self, name: Symbol, args: Vec<Term>, subst: Substitution) -> SolutionStream<'_> {
        if let Some(builtin) = crate::builtins::dispatch(self, name, args.clone(), subst.clone()) {
            return builtin;
        }
        Box::pin(stream! {
            let cut = fresh_barrier();
            let clauses: Vec<noetic_term::Clause> =
                self.kb.clauses_for(name, args.len()).cloned().collect();
            debug!(
                "selecting clauses for {}/{}: {} candidate(s)",
                self.interner.borrow().resolve(name),
                args.len(),
                clauses.len()
            );
            for clause in clauses {
                let renamed = {
                    let mut renamer = self.renamer.borrow_mut();
                    let mut interner = self.interner.borrow_mut();
                    renamer.rename_clause(&clause, &mut interner)
                };
                let mut unified = Some(subst.clone());
                for (param, arg) in renamed.head.params.iter().zip(args.iter()) {
                    unified = match unified {
                        Some(s) => unify(param, arg, &s, &self.kb),
                        None => None,
                    };
                }
                if let Some(s1) = unified {
                    let mut body_stream = self.solve_goals(renamed.body, s1, cut.clone());
                    while let Some(r) = body_stream.next().await {
                        yield r;
                    }
                }
                if cut.get() {
                    break;
                }
            }
        })
    }

    /// `L =~= R`: ground L and R, ask the judge. A list on the left
    /// succeeds if any element matches R; the goal succeeds at most once
    /// either way.
    fn solve_semantic_match(&self, left: Term, right: Term, subst: Substitution) -> SolutionStream<'_> {
        Box::pin(stream! {
            let l = resolve(&left, &subst, &self.kb);
            let r = resolve(&right, &subst, &self.kb);
            let interner = self.interner.borrow();
            let right_text = match term_to_text(&r, &interner) {
                Some(t) => t,
                None => return,
            };
            let candidates: Vec<String> = match &l {
                Term::List { .. } => l
                    .as_proper_list()
                    .map(|items| items.iter().filter_map(|i| term_to_text(i, &interner)).collect())
                    .unwrap_or_default(),
                other => term_to_text(other, &interner).into_iter().collect(),
            };
            drop(interner);
            for candidate in candidates {
                debug!("dispatching to judge: {:?} =~= {:?}", candidate, right_text);
                if self.judge.conceptually_identical(&candidate, &right_text).await {
                    yield Ok(subst);
                    return;
                }
            }
        })
    }

    /// `L = R` / `L == R`.
    fn solve_equality(&self, op: EqOp, left: Term, right: Term, subst: Substitution) -> SolutionStream<'_> {
        Box::pin(stream! {
            match op {
                EqOp::Unifying => {
                    if let Some(s) = unify(&left, &right, &subst, &self.kb) {
                        yield Ok(s);
                    }
                }
                EqOp::Structural => {
                    let l = resolve(&left, &subst, &self.kb);
                    let r = resolve(&right, &subst, &self.kb);
                    if l == r {
                        yield Ok(subst);
                    }
                }
            }
        })
    }

    /// `not G`: G is solved under a fresh, isolated barrier — a cut
    /// inside G is local to G — and the substitution handed back is
    /// always the original, never one G extended.
    fn solve_negation(&self, goals: Goals, subst: Substitution) -> SolutionStream<'_> {
        Box::pin(stream! {
            let mut inner = self.solve_goals(goals, subst.clone(), fresh_barrier());
            match inner.next().await {
                Some(Ok(_)) => {}
                Some(Err(e)) => yield Err(e),
                None => yield Ok(subst),
            }
        })
    }

    /// `(A ; B)`: all of A's solutions, then all of B's. Both branches
    /// share the caller's cut barrier, so a cut firing in A also prunes B
    /// (cut is transparent through `;`).
    fn solve_disjunction(&self, left: Goals, right: Goals, subst: Substitution, cut: CutBarrier) -> SolutionStream<'_> {
        Box::pin(stream! {
            let mut left_stream = self.solve_goals(left, subst.clone(), cut.clone());
            while let Some(r) = left_stream.next().await {
                yield r;
            }
            if cut.get() {
                return;
            }
            let mut right_stream = self.solve_goals(right, subst, cut);
            while let Some(r) = right_stream.next().await {
                yield r;
            }
        })
    }

    /// `(Cond -> Then ; Else)`: Cond is solved under its own isolated
    /// barrier and committed to its first solution only (no backtracking
    /// into Cond); Then/Else inherit the caller's barrier, since a cut
    /// there is meant to affect the enclosing clause.
    ///
    /// `else_branch: None` is `(Cond -> Then)` with no `Else` written,
    /// which is `(Cond -> Then ; fail)`: if Cond has no solution, the
    /// whole goal fails rather than falling through to an empty,
    /// trivially true conjunction.
    fn solve_if_then_else(
        &self,
        cond: Goals,
        then_branch: Goals,
        else_branch: Option<Goals>,
        subst: Substitution,
        cut: CutBarrier,
    ) -> SolutionStream<'_> {
        Box::pin(stream! {
            let mut cond_stream = self.solve_goals(cond, subst.clone(), fresh_barrier());
            match cond_stream.next().await {
                Some(Ok(s1)) => {
                    drop(cond_stream);
                    debug!("if-then-else: condition satisfied, committing to then-branch");
                    let mut then_stream = self.solve_goals(then_branch, s1, cut);
                    while let Some(r) = then_stream.next().await {
                        yield r;
                    }
                }
                Some(Err(e)) => yield Err(e),
                None => {
                    drop(cond_stream);
                    match else_branch {
                        Some(else_branch) => {
                            debug!("if-then-else: condition failed, running else-branch");
                            let mut else_stream = self.solve_goals(else_branch, subst, cut);
                            while let Some(r) = else_stream.next().await {
                                yield r;
                            }
                        }
                        None => {
                            debug!("if-then-else: condition failed, no else-branch");
                        }
                    }
                }
            }
        })
    }

    /// `!`: yields once, and flips the barrier so the clause-iteration
    /// loop and any choice points to its left in the current conjunction
    /// stop offering alternatives.
    fn solve_cut(&self, subst: Substitution, cut: CutBarrier) -> SolutionStream<'_> {
        Box::pin(stream! {
            debug!("cut fired");
            cut.set(true);
            yield Ok(subst);
        })
    }
}

/// The distinct, non-anonymous variable symbols appearing in `goals`, in
/// order of first appearance. The driver uses this to print the set of
/// originally-free variables of a query alongside their final bound
/// values.
pub fn free_variables(goals: &Goals) -> Vec<Symbol> {
    let mut seen = Vec::new();
    for goal in goals {
        collect_goal_vars(goal, &mut seen);
    }
    seen
}

fn collect_goal_vars(goal: &Goal, seen: &mut Vec<Symbol>) {
    match goal {
        Goal::Call { args, .. } => args.iter().for_each(|t| collect_term_vars(t, seen)),
        Goal::SemanticMatch { left, right } => {
            collect_term_vars(left, seen);
            collect_term_vars(right, seen);
        }
        Goal::Equality { left, right, .. } => {
            collect_term_vars(left, seen);
            collect_term_vars(right, seen);
        }
        Goal::Negation(goals) => goals.iter().for_each(|g| collect_goal_vars(g, seen)),
        Goal::Disjunction(left, right) => {
            left.iter().for_each(|g| collect_goal_vars(g, seen));
            right.iter().for_each(|g| collect_goal_vars(g, seen));
        }
        Goal::IfThenElse {
            cond,
            then_branch,
            else_branch,
        } => {
            cond.iter().for_each(|g| collect_goal_vars(g, seen));
            then_branch.iter().for_each(|g| collect_goal_vars(g, seen));
            if let Some(else_branch) = else_branch {
                else_branch.iter().for_each(|g| collect_goal_vars(g, seen));
            }
        }
        Goal::Cut => {}
    }
}

fn collect_term_vars(term: &Term, seen: &mut Vec<Symbol>) {
    match term {
        Term::Var { name, anonymous: false } => {
            if !seen.contains(name) {
                seen.push(*name);
            }
        }
        Term::Compound { args, .. } => args.iter().for_each(|a| collect_term_vars(a, seen)),
        Term::List { items, tail } => {
            items.iter().for_each(|i| collect_term_vars(i, seen));
            if let Some(t) = tail {
                collect_term_vars(t, seen);
            }
        }
        _ => {}
    }
}
