//! # noetic-kb
//!
//! The knowledge base: an indexed store of concepts, entities, clauses,
//! and global bindings, built during the declaration pass and read
//! (never mutated) during resolution.
//!
//! A `HashMap` keyed by [`Symbol`] gives O(1) lookup, with insertion
//! order tracked separately for deterministic enumeration.

use noetic_term::{Clause, ConceptDecl, Declaration, EntityDecl, FieldSource, Term};
use noetic_base::{Interner, Symbol};
use std::collections::HashMap;

/// Field-name symbols cached at construction time so [`FieldSource::resolve_field`]
/// never needs a mutable `Interner` to compare against them.
struct FieldNames {
    description: Symbol,
    genus: Symbol,
    attributes: Symbol,
    essentials: Symbol,
    concept: Symbol,
    concept_type: Symbol,
}

impl FieldNames {
    fn new(interner: &mut Interner) -> Self {
        FieldNames {
            description: interner.intern("description"),
            genus: interner.intern("genus"),
            attributes: interner.intern("attributes"),
            essentials: interner.intern("essentials"),
            concept: interner.intern("concept"),
            concept_type: interner.intern("conceptType"),
        }
    }
}

/// The program's knowledge base: concepts, entities, clauses, and global
/// bindings, indexed by name.
pub struct KnowledgeBase {
    concepts: HashMap<Symbol, ConceptDecl>,
    concept_order: Vec<Symbol>,
    entities: HashMap<Symbol, EntityDecl>,
    entity_order: Vec<Symbol>,
    clauses: Vec<Clause>,
    clause_index: HashMap<(Symbol, usize), Vec<usize>>,
    globals: HashMap<Symbol, Term>,
    field_names: FieldNames,
}

impl KnowledgeBase {
    pub fn new(interner: &mut Interner) -> Self {
        KnowledgeBase {
            concepts: HashMap::new(),
            concept_order: Vec::new(),
            entities: HashMap::new(),
            entity_order: Vec::new(),
            clauses: Vec::new(),
            clause_index: HashMap::new(),
            globals: HashMap::new(),
            field_names: FieldNames::new(interner),
        }
    }

    /// Loads one top-level declaration, in program order. `Declaration::Query`
    /// is the driver's concern, not the knowledge base's, and is ignored
    /// here.
    pub fn load(&mut self, decl: Declaration) {
        match decl {
            Declaration::Concept(c) => self.add_concept(c),
            Declaration::Entity(e) => self.add_entity(e),
            Declaration::Clause(c) => self.add_clause(c),
            Declaration::GlobalAssign { name, value } => {
                self.globals.insert(name, value);
            }
            Declaration::Query(_) => {}
        }
    }

    pub fn add_concept(&mut self, concept: ConceptDecl) {
        if !self.concepts.contains_key(&concept.name) {
            self.concept_order.push(concept.name);
        }
        self.concepts.insert(concept.name, concept);
    }

    pub fn add_entity(&mut self, entity: EntityDecl) {
        if !self.entities.contains_key(&entity.name) {
            self.entity_order.push(entity.name);
        }
        self.entities.insert(entity.name, entity);
    }

    pub fn add_clause(&mut self, clause: Clause) {
        let key = (clause.head.name, clause.head.arity());
        let index = self.clauses.len();
        self.clauses.push(clause);
        self.clause_index.entry(key).or_default().push(index);
    }

    pub fn concept(&self, name: Symbol) -> Option<&ConceptDecl> {
        self.concepts.get(&name)
    }

    pub fn entity(&self, name: Symbol) -> Option<&EntityDecl> {
        self.entities.get(&name)
    }

    pub fn global(&self, name: Symbol) -> Option<&Term> {
        self.globals.get(&name)
    }

    /// Clauses with a head of `name/arity`, in program order — the order
    /// clause resolution tries them in.
    pub fn clauses_for(&self, name: Symbol, arity: usize) -> impl Iterator<Item = &Clause> {
        self.clause_index
            .get(&(name, arity))
            .into_iter()
            .flatten()
            .map(move |&i| &self.clauses[i])
    }

    pub fn concepts_in_order(&self) -> impl Iterator<Item = &ConceptDecl> {
        self.concept_order.iter().map(move |n| &self.concepts[n])
    }

    pub fn entities_in_order(&self) -> impl Iterator<Item = &EntityDecl> {
        self.entity_order.iter().map(move |n| &self.entities[n])
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty() && self.entities.is_empty() && self.clauses.is_empty()
    }
}

impl FieldSource for KnowledgeBase {
    fn resolve_field(&self, object: Symbol, field: Symbol) -> Option<Term> {
        if let Some(entity) = self.entities.get(&object) {
            return self.resolve_entity_field(entity, field);
        }
        if let Some(concept) = self.concepts.get(&object) {
            return self.resolve_concept_field(concept, field);
        }
        None
    }
}

impl KnowledgeBase {
    fn resolve_entity_field(&self, entity: &EntityDecl, field: Symbol) -> Option<Term> {
        let f = &self.field_names;
        if field == f.description {
            return entity.description.clone().map(Term::Str);
        }
        if field == f.concept || field == f.concept_type {
            return Some(Term::Atom(entity.concept_type));
        }
        if field == f.attributes || field == f.essentials || field == f.genus {
            let concept = self.concepts.get(&entity.concept_type)?;
            return self.resolve_concept_field(concept, field);
        }
        entity
            .property(field)
            .map(|v| Term::Str(v.to_string()))
    }

    fn resolve_concept_field(&self, concept: &ConceptDecl, field: Symbol) -> Option<Term> {
        let f = &self.field_names;
        if field == f.description {
            return concept.description.clone().map(Term::Str);
        }
        if field == f.genus {
            return concept.genus.map(Term::Atom);
        }
        if field == f.attributes {
            return Some(string_list(&concept.attributes));
        }
        if field == f.essentials {
            return Some(string_list(&concept.essentials));
        }
        None
    }
}

fn string_list(items: &[String]) -> Term {
    Term::proper_list(items.iter().cloned().map(Term::Str).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (KnowledgeBase, Interner) {
        let mut interner = Interner::new();
        let kb = KnowledgeBase::new(&mut interner);
        (kb, interner)
    }

    #[test]
    fn clauses_for_preserves_program_order() {
        let (mut kb, mut interner) = setup();
        let p = interner.intern("p");
        for n in [1.0, 2.0, 3.0] {
            kb.add_clause(Clause {
                head: noetic_term::PredicateHead {
                    name: p,
                    params: vec![Term::Number(n)],
                },
                body: vec![],
            });
        }
        let values: Vec<_> = kb
            .clauses_for(p, 1)
            .map(|c| match &c.head.params[0] {
                Term::Number(n) => *n,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn clauses_for_filters_by_arity() {
        let (mut kb, mut interner) = setup();
        let p = interner.intern("p");
        kb.add_clause(Clause {
            head: noetic_term::PredicateHead { name: p, params: vec![] },
            body: vec![],
        });
        kb.add_clause(Clause {
            head: noetic_term::PredicateHead {
                name: p,
                params: vec![Term::Number(1.0)],
            },
            body: vec![],
        });
        assert_eq!(kb.clauses_for(p, 0).count(), 1);
        assert_eq!(kb.clauses_for(p, 1).count(), 1);
        assert_eq!(kb.clauses_for(p, 2).count(), 0);
    }

    #[test]
    fn entity_field_access_resolves_description() {
        let (mut kb, mut interner) = setup();
        let socrates = interner.intern("SOCRATES");
        let man = interner.intern("Man");
        let description_field = interner.intern("description");
        kb.add_entity(EntityDecl {
            name: socrates,
            concept_type: man,
            description: Some("philosopher".to_string()),
            properties: vec![],
        });
        let resolved = kb.resolve_field(socrates, description_field);
        assert_eq!(resolved, Some(Term::Str("philosopher".to_string())));
    }

    #[test]
    fn entity_falls_through_to_concept_for_attributes() {
        let (mut kb, mut interner) = setup();
        let socrates = interner.intern("SOCRATES");
        let man = interner.intern("Man");
        let attributes_field = interner.intern("attributes");
        kb.add_concept(ConceptDecl {
            name: man,
            genus: None,
            description: None,
            attributes: vec!["rational".to_string()],
            essentials: vec![],
        });
        kb.add_entity(EntityDecl {
            name: socrates,
            concept_type: man,
            description: None,
            properties: vec![],
        });
        let resolved = kb.resolve_field(socrates, attributes_field);
        assert_eq!(
            resolved,
            Some(Term::proper_list(vec![Term::Str("rational".to_string())]))
        );
    }

    #[test]
    fn unknown_object_resolves_to_none() {
        let (kb, mut interner) = setup();
        let unknown = interner.intern("UNKNOWN");
        let field = interner.intern("description");
        assert_eq!(kb.resolve_field(unknown, field), None);
    }

    #[test]
    fn entity_property_resolves_as_string() {
        let (mut kb, mut interner) = setup();
        let widget = interner.intern("WIDGET");
        let product = interner.intern("Product");
        let color = interner.intern("color");
        kb.add_entity(EntityDecl {
            name: widget,
            concept_type: product,
            description: None,
            properties: vec![(color, "red".to_string())],
        });
        assert_eq!(
            kb.resolve_field(widget, color),
            Some(Term::Str("red".to_string()))
        );
    }
}
