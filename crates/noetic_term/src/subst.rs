//! Substitution and unification.
//!
//! `Substitution` is a persistent value: [`Substitution::extended`] returns
//! a new mapping rather than mutating in place — a snapshot per branch,
//! simpler to reason about than a mutable trail, at the cost of a clone
//! per binding.

use crate::term::Term;
use noetic_base::Symbol;
use std::collections::HashMap;

/// Looks up the fields of a knowledge-base object for [`deref`].
///
/// Implemented by the knowledge base (`noetic-kb`); this crate has no
/// knowledge of concepts or entities, only of the deferred-lookup shape of
/// [`Term::Field`].
pub trait FieldSource {
    /// Resolves `object.field`. Returns `None` if `object` is not known or
    /// has no such field — the `Field` term is then left unresolved and
    /// stays a non-ground term that will not unify with ground data.
    fn resolve_field(&self, object: Symbol, field: Symbol) -> Option<Term>;
}

/// A `FieldSource` with no objects, for use where field access never
/// arises (unit tests of pure unification, for instance).
pub struct NoFields;

impl FieldSource for NoFields {
    fn resolve_field(&self, _object: Symbol, _field: Symbol) -> Option<Term> {
        None
    }
}

/// A mapping from variable names to terms.
///
/// Right-hand sides may themselves mention variables bound later; looking
/// a binding up always walks through [`deref`] rather than assuming a
/// single-step lookup is final.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    bindings: HashMap<Symbol, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: Symbol) -> Option<&Term> {
        self.bindings.get(&var)
    }

    /// Returns a new substitution extending `self` with `var ↦ term`. Does
    /// not check for conflicts; callers go through [`unify`], which
    /// performs the occurs-check before calling this.
    pub fn extended(&self, var: Symbol, term: Term) -> Substitution {
        let mut bindings = self.bindings.clone();
        bindings.insert(var, term);
        Substitution { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Dereferences a term through `subst`, resolving variable bindings and
/// `FieldAccess` lookups until reaching a bound non-variable term or an
/// unbound variable.
pub fn deref(term: &Term, subst: &Substitution, fields: &dyn FieldSource) -> Term {
    match term {
        Term::Var {
            name,
            anonymous: false,
        } => match subst.get(*name) {
            Some(bound) => deref(bound, subst, fields),
            None => term.clone(),
        },
        Term::Field { object, field } => match fields.resolve_field(*object, *field) {
            Some(resolved) => deref(&resolved, subst, fields),
            None => term.clone(),
        },
        _ => term.clone(),
    }
}

/// Checks whether `term` contains `var` under `subst` (the occurs-check).
/// Performed before every variable binding to keep the substitution
/// acyclic.
pub fn occurs(var: Symbol, term: &Term, subst: &Substitution, fields: &dyn FieldSource) -> bool {
    let term = deref(term, subst, fields);
    match &term {
        Term::Var {
            name,
            anonymous: false,
        } => *name == var,
        Term::Compound { args, .. } => args.iter().any(|a| occurs(var, a, subst, fields)),
        Term::List { items, tail } => {
            items.iter().any(|i| occurs(var, i, subst, fields))
                || tail
                    .as_ref()
                    .is_some_and(|t| occurs(var, t, subst, fields))
        }
        _ => false,
    }
}

/// Fully resolves `term`: dereferences variables and field accesses at
/// every level, not just the outermost one (unlike [`deref`], which stops
/// once it reaches a non-var, non-field shape). Needed wherever a term
/// must be reduced to ground data to leave the logic layer — structural
/// equality, judge payloads, `findall`/`setof`/`bagof` templates.
pub fn resolve(term: &Term, subst: &Substitution, fields: &dyn FieldSource) -> Term {
    let term = deref(term, subst, fields);
    match term {
        Term::Compound { functor, args } => Term::Compound {
            functor,
            args: args.iter().map(|a| resolve(a, subst, fields)).collect(),
        },
        Term::List { items, tail } => Term::List {
            items: items.iter().map(|i| resolve(i, subst, fields)).collect(),
            tail: tail.map(|t| Box::new(resolve(&t, subst, fields))),
        },
        other => other,
    }
}

fn bind(
    var: Symbol,
    term: Term,
    subst: &Substitution,
    fields: &dyn FieldSource,
) -> Option<Substitution> {
    if occurs(var, &term, subst, fields) {
        return None;
    }
    Some(subst.extended(var, term))
}

/// Unifies two terms under `subst`, returning the extended substitution on
/// success. Pure: never mutates `subst` in place.
pub fn unify(
    a: &Term,
    b: &Term,
    subst: &Substitution,
    fields: &dyn FieldSource,
) -> Option<Substitution> {
    let a = deref(a, subst, fields);
    let b = deref(b, subst, fields);

    if a.is_anonymous() || b.is_anonymous() {
        return Some(subst.clone());
    }

    match (&a, &b) {
        (Term::Var { name: n1, .. }, Term::Var { name: n2, .. }) if n1 == n2 => {
            Some(subst.clone())
        }
        (Term::Var { name, .. }, _) => bind(*name, b, subst, fields),
        (_, Term::Var { name, .. }) => bind(*name, a, subst, fields),
        (Term::Atom(x), Term::Atom(y)) => (x == y).then(|| subst.clone()),
        (Term::Str(x), Term::Str(y)) => (x == y).then(|| subst.clone()),
        (Term::Number(x), Term::Number(y)) => (x == y).then(|| subst.clone()),
        (Term::Compound { functor: f1, args: a1 }, Term::Compound { functor: f2, args: a2 }) => {
            if f1 != f2 || a1.len() != a2.len() {
                return None;
            }
            let mut s = subst.clone();
            for (x, y) in a1.iter().zip(a2.iter()) {
                s = unify(x, y, &s, fields)?;
            }
            Some(s)
        }
        (Term::List { .. }, Term::List { .. }) => unify_lists(&a, &b, subst, fields),
        (Term::Field { .. }, _) | (_, Term::Field { .. }) => {
            // Neither side resolved (resolve_field returned None for at
            // least one), so both remain opaque: only identical unresolved
            // accesses unify.
            (a == b).then(|| subst.clone())
        }
        _ => None,
    }
}

fn unify_lists(
    a: &Term,
    b: &Term,
    subst: &Substitution,
    fields: &dyn FieldSource,
) -> Option<Substitution> {
    let (items_a, tail_a) = match a {
        Term::List { items, tail } => (items.as_slice(), tail),
        _ => unreachable!("unify_lists called with non-list"),
    };
    let (items_b, tail_b) = match b {
        Term::List { items, tail } => (items.as_slice(), tail),
        _ => unreachable!("unify_lists called with non-list"),
    };
    unify_list_seq(items_a, tail_a, items_b, tail_b, subst, fields)
}

fn tail_or_empty(tail: &Option<Box<Term>>) -> Term {
    match tail {
        Some(t) => (**t).clone(),
        None => Term::proper_list(vec![]),
    }
}

fn unify_list_seq(
    items_a: &[Term],
    tail_a: &Option<Box<Term>>,
    items_b: &[Term],
    tail_b: &Option<Box<Term>>,
    subst: &Substitution,
    fields: &dyn FieldSource,
) -> Option<Substitution> {
    match (items_a.split_first(), items_b.split_first()) {
        (Some((ha, ra)), Some((hb, rb))) => {
            let s = unify(ha, hb, subst, fields)?;
            unify_list_seq(ra, tail_a, rb, tail_b, &s, fields)
        }
        (None, None) => unify(&tail_or_empty(tail_a), &tail_or_empty(tail_b), subst, fields),
        (None, Some(_)) => {
            let rest_b = Term::List {
                items: items_b.to_vec(),
                tail: tail_b.clone(),
            };
            unify(&tail_or_empty(tail_a), &rest_b, subst, fields)
        }
        (Some(_), None) => {
            let rest_a = Term::List {
                items: items_a.to_vec(),
                tail: tail_a.clone(),
            };
            unify(&rest_a, &tail_or_empty(tail_b), subst, fields)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noetic_base::Interner;

    fn interner() -> Interner {
        Interner::new()
    }

    #[test]
    fn unify_identical_atoms_succeeds() {
        let mut i = interner();
        let socrates = i.intern("socrates");
        let s = Substitution::new();
        let result = unify(&Term::Atom(socrates), &Term::Atom(socrates), &s, &NoFields);
        assert!(result.is_some());
    }

    #[test]
    fn unify_different_atoms_fails() {
        let mut i = interner();
        let a = i.intern("a");
        let b = i.intern("b");
        let s = Substitution::new();
        assert!(unify(&Term::Atom(a), &Term::Atom(b), &s, &NoFields).is_none());
    }

    #[test]
    fn unify_variable_binds_to_term() {
        let mut i = interner();
        let x = i.intern("X");
        let socrates = i.intern("socrates");
        let s = Substitution::new();
        let result = unify(&Term::var(x), &Term::Atom(socrates), &s, &NoFields).unwrap();
        assert_eq!(deref(&Term::var(x), &result, &NoFields), Term::Atom(socrates));
    }

    #[test]
    fn unify_is_symmetric() {
        let mut i = interner();
        let x = i.intern("X");
        let socrates = i.intern("socrates");
        let s = Substitution::new();
        let forward = unify(&Term::var(x), &Term::Atom(socrates), &s, &NoFields);
        let backward = unify(&Term::Atom(socrates), &Term::var(x), &s, &NoFields);
        assert_eq!(forward.is_some(), backward.is_some());
    }

    #[test]
    fn occurs_check_rejects_self_reference() {
        let mut i = interner();
        let x = i.intern("X");
        let f = i.intern("f");
        let s = Substitution::new();
        let cyclic = Term::Compound {
            functor: f,
            args: vec![Term::var(x)],
        };
        assert!(unify(&Term::var(x), &cyclic, &s, &NoFields).is_none());
    }

    #[test]
    fn anonymous_variable_unifies_with_anything_and_binds_nothing() {
        let mut i = interner();
        let anon = i.intern("_");
        let socrates = i.intern("socrates");
        let s = Substitution::new();
        let result = unify(&Term::anonymous(anon), &Term::Atom(socrates), &s, &NoFields).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn compound_arity_mismatch_fails() {
        let mut i = interner();
        let f = i.intern("f");
        let a = Term::Compound {
            functor: f,
            args: vec![Term::Number(1.0)],
        };
        let b = Term::Compound {
            functor: f,
            args: vec![Term::Number(1.0), Term::Number(2.0)],
        };
        let s = Substitution::new();
        assert!(unify(&a, &b, &s, &NoFields).is_none());
    }

    #[test]
    fn proper_lists_unify_elementwise() {
        let a = Term::proper_list(vec![Term::Number(1.0), Term::Number(2.0)]);
        let b = Term::proper_list(vec![Term::Number(1.0), Term::Number(2.0)]);
        let s = Substitution::new();
        assert!(unify(&a, &b, &s, &NoFields).is_some());
    }

    #[test]
    fn list_with_variable_tail_unifies_with_longer_list() {
        let mut i = interner();
        let rest = i.intern("Rest");
        let a = Term::List {
            items: vec![Term::Number(1.0)],
            tail: Some(Box::new(Term::var(rest))),
        };
        let b = Term::proper_list(vec![Term::Number(1.0), Term::Number(2.0), Term::Number(3.0)]);
        let s = Substitution::new();
        let result = unify(&a, &b, &s, &NoFields).unwrap();
        let bound = deref(&Term::var(rest), &result, &NoFields);
        assert_eq!(
            bound,
            Term::proper_list(vec![Term::Number(2.0), Term::Number(3.0)])
        );
    }

    #[test]
    fn resolve_walks_through_a_bound_variable_tail() {
        let mut i = interner();
        let rest = i.intern("Rest");
        let partial = Term::List {
            items: vec![Term::Number(1.0)],
            tail: Some(Box::new(Term::var(rest))),
        };
        let s = Substitution::new().extended(
            rest,
            Term::proper_list(vec![Term::Number(2.0)]),
        );
        assert_eq!(
            resolve(&partial, &s, &NoFields),
            Term::proper_list(vec![Term::Number(1.0), Term::Number(2.0)])
        );
    }

    #[test]
    fn deref_resolves_field_access_via_field_source() {
        struct OneField(Symbol, Symbol, Term);
        impl FieldSource for OneField {
            fn resolve_field(&self, object: Symbol, field: Symbol) -> Option<Term> {
                if object == self.0 && field == self.1 {
                    Some(self.2.clone())
                } else {
                    None
                }
            }
        }
        let mut i = interner();
        let obj = i.intern("SOCRATES");
        let field = i.intern("description");
        let source = OneField(obj, field, Term::Str("philosopher".into()));
        let s = Substitution::new();
        let resolved = deref(&Term::Field { object: obj, field }, &s, &source);
        assert_eq!(resolved, Term::Str("philosopher".into()));
    }

    #[test]
    fn unresolved_field_access_does_not_unify_with_ground_term() {
        let mut i = interner();
        let obj = i.intern("UNKNOWN");
        let field = i.intern("description");
        let s = Substitution::new();
        let result = unify(
            &Term::Field { object: obj, field },
            &Term::Str("anything".into()),
            &s,
            &NoFields,
        );
        assert!(result.is_none());
    }
}
