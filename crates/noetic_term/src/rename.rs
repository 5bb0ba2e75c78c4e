//! Fresh-variable renaming for clause instantiation: each time a clause is
//! invoked, it gets a renamed copy so that two in-flight invocations never
//! share a binding.
//!
//! A counter-based allocator hands out a monotonically increasing id per
//! renamed variable, appended to its original name so the renamed form
//! stays readable in debug output.

use crate::goal::{Clause, Goal, Goals, PredicateHead};
use crate::term::Term;
use noetic_base::{Interner, Symbol};
use std::collections::HashMap;

/// Allocates fresh variable names, one counter per engine run.
pub struct Renamer {
    next_id: u64,
}

impl Renamer {
    pub fn new() -> Self {
        Renamer { next_id: 0 }
    }

    /// Renames every non-anonymous variable in `clause` to a symbol unique
    /// to this instantiation. Anonymous variables are left as-is: they
    /// never bind, so sharing their symbol across instantiations is
    /// harmless and avoids needless interning.
    pub fn rename_clause(&mut self, clause: &Clause, interner: &mut Interner) -> Clause {
        let mut map = HashMap::new();
        Clause {
            head: self.rename_head(&clause.head, interner, &mut map),
            body: self.rename_goals(&clause.body, interner, &mut map),
        }
    }

    fn fresh_name(&mut self, original: Symbol, interner: &mut Interner) -> Symbol {
        let id = self.next_id;
        self.next_id += 1;
        let base = interner.resolve(original).to_owned();
        interner.intern(&format!("{base}#{id}"))
    }

    fn rename_head(
        &mut self,
        head: &PredicateHead,
        interner: &mut Interner,
        map: &mut HashMap<Symbol, Symbol>,
    ) -> PredicateHead {
        PredicateHead {
            name: head.name,
            params: head
                .params
                .iter()
                .map(|t| self.rename_term(t, interner, map))
                .collect(),
        }
    }

    fn rename_goals(
        &mut self,
        goals: &Goals,
        interner: &mut Interner,
        map: &mut HashMap<Symbol, Symbol>,
    ) -> Goals {
        goals
            .iter()
            .map(|g| self.rename_goal(g, interner, map))
            .collect()
    }

    fn rename_goal(
        &mut self,
        goal: &Goal,
        interner: &mut Interner,
        map: &mut HashMap<Symbol, Symbol>,
    ) -> Goal {
        match goal {
            Goal::Call { name, args } => Goal::Call {
                name: *name,
                args: args.iter().map(|t| self.rename_term(t, interner, map)).collect(),
            },
            Goal::SemanticMatch { left, right } => Goal::SemanticMatch {
                left: self.rename_term(left, interner, map),
                right: self.rename_term(right, interner, map),
            },
            Goal::Equality { op, left, right } => Goal::Equality {
                op: *op,
                left: self.rename_term(left, interner, map),
                right: self.rename_term(right, interner, map),
            },
            Goal::Negation(goals) => Goal::Negation(self.rename_goals(goals, interner, map)),
            Goal::Disjunction(left, right) => Goal::Disjunction(
                self.rename_goals(left, interner, map),
                self.rename_goals(right, interner, map),
            ),
            Goal::IfThenElse {
                cond,
                then_branch,
                else_branch,
            } => Goal::IfThenElse {
                cond: self.rename_goals(cond, interner, map),
                then_branch: self.rename_goals(then_branch, interner, map),
                else_branch: else_branch
                    .as_ref()
                    .map(|goals| self.rename_goals(goals, interner, map)),
            },
            Goal::Cut => Goal::Cut,
        }
    }

    fn rename_term(
        &mut self,
        term: &Term,
        interner: &mut Interner,
        map: &mut HashMap<Symbol, Symbol>,
    ) -> Term {
        match term {
            Term::Var {
                name,
                anonymous: false,
            } => {
                let renamed = *map
                    .entry(*name)
                    .or_insert_with(|| self.fresh_name(*name, interner));
                Term::var(renamed)
            }
            Term::Var { anonymous: true, .. } => term.clone(),
            Term::Atom(_) | Term::Str(_) | Term::Number(_) | Term::Field { .. } => term.clone(),
            Term::List { items, tail } => Term::List {
                items: items.iter().map(|t| self.rename_term(t, interner, map)).collect(),
                tail: tail
                    .as_ref()
                    .map(|t| Box::new(self.rename_term(t, interner, map))),
            },
            Term::Compound { functor, args } => Term::Compound {
                functor: *functor,
                args: args.iter().map(|t| self.rename_term(t, interner, map)).collect(),
            },
        }
    }
}

impl Default for Renamer {
    fn default() -> Self {
        Self::new()
    }
}
