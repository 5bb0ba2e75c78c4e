//! The term model.
//!
//! A [`Term`] is a tagged variant over the handful of shapes that carry
//! data through unification and resolution: variables, atoms, strings,
//! numbers, lists, compounds, and deferred field lookups. Every case is a
//! value type — terms are cloned freely rather than shared through
//! reference counting.

use noetic_base::Symbol;
use std::fmt;

/// A logic term.
///
/// `FieldAccess` is kept as an explicit case (rather than resolved away by
/// the parser) because its meaning depends on the knowledge base at
/// dereference time, not at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A logic variable. Anonymous variables (`_`) are distinct from every
    /// other variable, including other anonymous ones, and are never bound.
    Var { name: Symbol, anonymous: bool },
    /// A symbolic constant.
    Atom(Symbol),
    /// A string literal. Atomic and ground, distinct from an atom.
    Str(String),
    /// A numeric literal, used only when a program contains arithmetic
    /// operators.
    Number(f64),
    /// A list. Proper if `tail` is `None`, improper if `tail` is `Some`
    /// of a variable or another list.
    List {
        items: Vec<Term>,
        tail: Option<Box<Term>>,
    },
    /// An ordered n-ary compound term.
    Compound { functor: Symbol, args: Vec<Term> },
    /// A deferred `object.field` lookup, resolved against the knowledge
    /// base on dereference.
    Field { object: Symbol, field: Symbol },
}

impl Term {
    /// Convenience constructor for a named (non-anonymous) variable.
    pub fn var(name: Symbol) -> Term {
        Term::Var {
            name,
            anonymous: false,
        }
    }

    /// Convenience constructor for the anonymous variable `_`.
    pub fn anonymous(name: Symbol) -> Term {
        Term::Var {
            name,
            anonymous: true,
        }
    }

    /// Convenience constructor for a proper list.
    pub fn proper_list(items: Vec<Term>) -> Term {
        Term::List { items, tail: None }
    }

    /// `true` if this term is a variable (named or anonymous).
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var { .. })
    }

    /// `true` if this term is the anonymous variable.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Term::Var { anonymous: true, .. })
    }

    /// `true` if this term is a proper list: no tail, or a tail that is
    /// itself (recursively) a proper list.
    pub fn is_proper_list(&self) -> bool {
        match self {
            Term::List { tail: None, .. } => true,
            Term::List {
                tail: Some(t), ..
            } => t.is_proper_list(),
            _ => false,
        }
    }

    /// Flattens a proper list into its elements. Returns `None` if this
    /// term is not a proper list (callers must deref/resolve first).
    pub fn as_proper_list(&self) -> Option<Vec<Term>> {
        let mut out = Vec::new();
        let mut cur = self;
        loop {
            match cur {
                Term::List { items, tail: None } => {
                    out.extend(items.iter().cloned());
                    return Some(out);
                }
                Term::List {
                    items,
                    tail: Some(t),
                } => {
                    out.extend(items.iter().cloned());
                    cur = t;
                }
                _ => return None,
            }
        }
    }
}

/// A `Display` impl for debugging and log messages only. It cannot resolve
/// symbols to their source names (that requires the `Interner`), so atoms,
/// variables, and functors print as their raw interned index. Surface-syntax
/// rendering for query results and `print`/`println` output goes through
/// `noetic_print`, which has interner access.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var { name, anonymous } => {
                if *anonymous {
                    write!(f, "_")
                } else {
                    write!(f, "${}", name.index())
                }
            }
            Term::Atom(s) => write!(f, "${}", s.index()),
            Term::Str(s) => write!(f, "{:?}", s),
            Term::Number(n) => write!(f, "{}", n),
            Term::List { items, tail } => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if let Some(t) = tail {
                    write!(f, " | {}", t)?;
                }
                write!(f, "]")
            }
            Term::Compound { functor, args } => {
                write!(f, "${}(", functor.index())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ")")
            }
            Term::Field { object, field } => {
                write!(f, "${}.${}", object.index(), field.index())
            }
        }
    }
}
