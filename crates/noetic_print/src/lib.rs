//! # noetic-print
//!
//! Converts a dereferenced [`Term`] to surface syntax: atoms bare, strings
//! quoted or raw depending on context, numbers as digits, lists with
//! `[a, b, c]`/`[a | T]` sugar, compounds `functor(a, b)`, variables by
//! name.
//!
//! A match over the term's cases builds a `String` directly, taking an
//! `Interner` because `noetic_term::Term`'s own `Display` is debug-only
//! (it has no interner access; see that crate's doc comment).

use noetic_base::Interner;
use noetic_term::Term;

/// Renders `term` to surface syntax.
///
/// `quote_strings` distinguishes two output contexts: `false` for
/// `print`/`println` output (raw printable form), `true` for reporting a
/// query's result bindings (quoted, so a string and an atom that happen
/// to print the same text stay visually distinct).
pub fn render_term(term: &Term, interner: &Interner, quote_strings: bool) -> String {
    let mut out = String::new();
    write_term(&mut out, term, interner, quote_strings);
    out
}

/// Renders one `name = value` binding line.
pub fn render_binding(name: &str, term: &Term, interner: &Interner) -> String {
    format!("{name} = {}", render_term(term, interner, true))
}

fn write_term(out: &mut String, term: &Term, interner: &Interner, quote_strings: bool) {
    match term {
        Term::Var { name, anonymous } => {
            if *anonymous {
                out.push('_');
            } else {
                out.push_str(interner.resolve(*name));
            }
        }
        Term::Atom(sym) => out.push_str(interner.resolve(*sym)),
        Term::Str(s) => {
            if quote_strings {
                out.push('"');
                out.push_str(&s.replace('\\', "\\\\").replace('"', "\\\""));
                out.push('"');
            } else {
                out.push_str(s);
            }
        }
        Term::Number(n) => out.push_str(&format_number(*n)),
        Term::List { items, tail } => write_list(out, items, tail, interner, quote_strings),
        Term::Compound { functor, args } => {
            out.push_str(interner.resolve(*functor));
            out.push('(');
            for (i, a) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_term(out, a, interner, quote_strings);
            }
            out.push(')');
        }
        Term::Field { object, field } => {
            out.push_str(interner.resolve(*object));
            out.push('.');
            out.push_str(interner.resolve(*field));
        }
    }
}

fn write_list(
    out: &mut String,
    items: &[Term],
    tail: &Option<Box<Term>>,
    interner: &Interner,
    quote_strings: bool,
) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_term(out, item, interner, quote_strings);
    }
    if let Some(t) = tail {
        out.push_str(" | ");
        write_term(out, t, interner, quote_strings);
    }
    out.push(']');
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noetic_term::Term;

    fn interner_with(names: &[&str]) -> (Interner, Vec<noetic_base::Symbol>) {
        let mut interner = Interner::new();
        let symbols = names.iter().map(|n| interner.intern(n)).collect();
        (interner, symbols)
    }

    #[test]
    fn atom_renders_bare() {
        let (interner, syms) = interner_with(&["socrates"]);
        assert_eq!(render_term(&Term::Atom(syms[0]), &interner, true), "socrates");
    }

    #[test]
    fn string_quotes_only_for_bindings() {
        let term = Term::Str("philosopher".to_string());
        let interner = Interner::new();
        assert_eq!(render_term(&term, &interner, true), "\"philosopher\"");
        assert_eq!(render_term(&term, &interner, false), "philosopher");
    }

    #[test]
    fn integral_number_has_no_trailing_decimal() {
        let interner = Interner::new();
        assert_eq!(render_term(&Term::Number(3.0), &interner, true), "3");
        assert_eq!(render_term(&Term::Number(3.5), &interner, true), "3.5");
    }

    #[test]
    fn proper_list_renders_with_commas() {
        let (interner, syms) = interner_with(&["red", "green", "blue"]);
        let list = Term::proper_list(syms.into_iter().map(Term::Atom).collect());
        assert_eq!(render_term(&list, &interner, true), "[red, green, blue]");
    }

    #[test]
    fn improper_list_renders_with_pipe_sugar() {
        let (interner, syms) = interner_with(&["a", "T"]);
        let list = Term::List {
            items: vec![Term::Atom(syms[0])],
            tail: Some(Box::new(Term::var(syms[1]))),
        };
        assert_eq!(render_term(&list, &interner, true), "[a | T]");
    }

    #[test]
    fn compound_renders_functor_and_args() {
        let (interner, syms) = interner_with(&["f", "a", "b"]);
        let term = Term::Compound {
            functor: syms[0],
            args: vec![Term::Atom(syms[1]), Term::Atom(syms[2])],
        };
        assert_eq!(render_term(&term, &interner, true), "f(a, b)");
    }

    #[test]
    fn binding_line_matches_expected_format() {
        let (interner, syms) = interner_with(&["X", "socrates"]);
        let line = render_binding(interner.resolve(syms[0]), &Term::Atom(syms[1]), &interner);
        assert_eq!(line, "X = socrates");
    }
}
