//! Token stream → program AST.
//!
//! Recursive descent with the goal grammar's precedence, lowest to
//! highest: disjunction (`;`), if-then (`->`), conjunction (`,`), atomic
//! goal. `->` and `;` share a production because `Cond -> Then ; Else` is
//! one unit: seeing `;` after an arrow supplies that arrow's `Else`
//! branch rather than building a generic disjunction. `Cond -> Then` with
//! no trailing `; Else` has no else branch at all (`None`), which is not
//! the same as an else branch that is an empty, trivially true
//! conjunction.

use crate::error::{ParseError, ParseResult};
use crate::token::{Token, TokenKind};
use noetic_base::{Interner, Span, Symbol};
use noetic_term::{Clause, ConceptDecl, Declaration, EntityDecl, EqOp, Goal, Goals, PredicateHead, Program, Term};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    interner: &'a mut Interner,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, interner: &'a mut Interner) -> Self {
        Parser {
            tokens,
            pos: 0,
            interner,
        }
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut program = Program::new();
        while self.peek_kind() != &TokenKind::Eof {
            program.declarations.push(self.parse_declaration()?);
        }
        Ok(program)
    }

    // -- token stream helpers -----------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek2_kind(&self) -> &TokenKind {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].kind
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.peek_kind() == &kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("{kind:?}")))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Symbol> {
        match self.peek_kind().clone() {
            TokenKind::Ident(sym) => {
                self.advance();
                Ok(sym)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_string(&mut self) -> ParseResult<String> {
        match self.peek_kind().clone() {
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(
            format!("expected {expected}, found {:?}", self.peek_kind()),
            self.span(),
        )
    }

    fn is_variable_name(&self, text: &str) -> bool {
        text.starts_with('_') || text.chars().next().is_some_and(|c| c.is_uppercase())
    }

    // -- declarations ---------------------------------------------------

    fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        match self.peek_kind() {
            TokenKind::Concept => self.parse_concept(),
            TokenKind::Entity => self.parse_entity(),
            TokenKind::Query => self.parse_query(),
            TokenKind::Ident(_) if self.peek2_kind() == &TokenKind::Eq => self.parse_global_assign(),
            _ => self.parse_clause(),
        }
    }

    fn parse_concept(&mut self) -> ParseResult<Declaration> {
        self.advance(); // `concept`
        let name = self.expect_ident()?;
        let genus = if self.eat(&TokenKind::Colon) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let mut description = None;
        let mut attributes = Vec::new();
        let mut essentials = Vec::new();
        while self.eat(&TokenKind::Comma) {
            match self.peek_kind() {
                TokenKind::Description => {
                    self.advance();
                    self.expect(TokenKind::Eq)?;
                    description = Some(self.expect_string()?);
                }
                TokenKind::Attributes => {
                    self.advance();
                    self.expect(TokenKind::Eq)?;
                    attributes = self.parse_string_list()?;
                }
                TokenKind::Essentials => {
                    self.advance();
                    self.expect(TokenKind::Eq)?;
                    essentials = self.parse_ident_or_string_list()?;
                }
                _ => return Err(self.unexpected("description, attributes, or essentials")),
            }
        }
        self.eat(&TokenKind::Period);
        Ok(Declaration::Concept(ConceptDecl {
            name,
            genus,
            description,
            attributes,
            essentials,
        }))
    }

    fn parse_entity(&mut self) -> ParseResult<Declaration> {
        self.advance(); // `entity`
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let concept_type = self.expect_ident()?;
        let mut description = None;
        let mut properties = Vec::new();
        while self.eat(&TokenKind::Comma) {
            if self.eat(&TokenKind::Description) {
                self.expect(TokenKind::Eq)?;
                description = Some(self.expect_string()?);
            } else {
                let key = self.expect_ident()?;
                self.expect(TokenKind::Eq)?;
                let value = self.expect_string()?;
                properties.push((key, value));
            }
        }
        self.eat(&TokenKind::Period);
        Ok(Declaration::Entity(EntityDecl {
            name,
            concept_type,
            description,
            properties,
        }))
    }

    fn parse_string_list(&mut self) -> ParseResult<Vec<String>> {
        self.expect(TokenKind::LBracket)?;
        let mut out = Vec::new();
        if !self.eat(&TokenKind::RBracket) {
            out.push(self.expect_string()?);
            while self.eat(&TokenKind::Comma) {
                out.push(self.expect_string()?);
            }
            self.expect(TokenKind::RBracket)?;
        }
        Ok(out)
    }

    fn parse_ident_or_string_list(&mut self) -> ParseResult<Vec<String>> {
        self.expect(TokenKind::LBracket)?;
        let mut out = Vec::new();
        if !self.eat(&TokenKind::RBracket) {
            out.push(self.parse_ident_or_string()?);
            while self.eat(&TokenKind::Comma) {
                out.push(self.parse_ident_or_string()?);
            }
            self.expect(TokenKind::RBracket)?;
        }
        Ok(out)
    }

    fn parse_ident_or_string(&mut self) -> ParseResult<String> {
        match self.peek_kind().clone() {
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(s)
            }
            TokenKind::Ident(sym) => {
                self.advance();
                Ok(self.interner.resolve(sym).to_owned())
            }
            _ => Err(self.unexpected("identifier or string literal")),
        }
    }

    fn parse_query(&mut self) -> ParseResult<Declaration> {
        self.advance(); // `?`
        let goals = self.parse_disjunction()?;
        self.eat(&TokenKind::Period);
        Ok(Declaration::Query(goals))
    }

    fn parse_global_assign(&mut self) -> ParseResult<Declaration> {
        let name = self.expect_ident()?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_term()?;
        self.eat(&TokenKind::Period);
        Ok(Declaration::GlobalAssign { name, value })
    }

    fn parse_clause(&mut self) -> ParseResult<Declaration> {
        let head = self.parse_predicate_head()?;
        let body = if self.eat(&TokenKind::Implies) {
            self.parse_disjunction()?
        } else {
            Vec::new()
        };
        self.eat(&TokenKind::Period);
        Ok(Declaration::Clause(Clause { head, body }))
    }

    fn parse_predicate_head(&mut self) -> ParseResult<PredicateHead> {
        let name = self.expect_ident()?;
        let params = if self.eat(&TokenKind::LParen) {
            self.parse_term_list_until(TokenKind::RParen)?
        } else {
            Vec::new()
        };
        Ok(PredicateHead { name, params })
    }

    fn parse_term_list_until(&mut self, end: TokenKind) -> ParseResult<Vec<Term>> {
        let mut out = Vec::new();
        if self.peek_kind() != &end {
            out.push(self.parse_term()?);
            while self.eat(&TokenKind::Comma) {
                out.push(self.parse_term()?);
            }
        }
        self.expect(end)?;
        Ok(out)
    }

    // -- goals ------------------------------------------------------------

    fn parse_disjunction(&mut self) -> ParseResult<Goals> {
        let unit = self.parse_arrow_unit()?;
        if self.eat(&TokenKind::Semicolon) {
            let rest = self.parse_disjunction()?;
            match unit {
                ArrowUnit::Arrow(cond, then_branch) => Ok(vec![Goal::IfThenElse {
                    cond,
                    then_branch,
                    else_branch: Some(rest),
                }]),
                ArrowUnit::Plain(left) => Ok(vec![Goal::Disjunction(left, rest)]),
            }
        } else {
            match unit {
                ArrowUnit::Arrow(cond, then_branch) => Ok(vec![Goal::IfThenElse {
                    cond,
                    then_branch,
                    else_branch: None,
                }]),
                ArrowUnit::Plain(goals) => Ok(goals),
            }
        }
    }

    fn parse_arrow_unit(&mut self) -> ParseResult<ArrowUnit> {
        let left = self.parse_conjunction()?;
        if self.eat(&TokenKind::Arrow) {
            let then_branch = self.parse_conjunction()?;
            Ok(ArrowUnit::Arrow(left, then_branch))
        } else {
            Ok(ArrowUnit::Plain(left))
        }
    }

    fn parse_conjunction(&mut self) -> ParseResult<Goals> {
        let mut goals = self.parse_atomic_goal()?;
        while self.eat(&TokenKind::Comma) {
            goals.extend(self.parse_atomic_goal()?);
        }
        Ok(goals)
    }

    fn parse_atomic_goal(&mut self) -> ParseResult<Goals> {
        match self.peek_kind() {
            TokenKind::Bang => {
                self.advance();
                Ok(vec![Goal::Cut])
            }
            TokenKind::Not => {
                self.advance();
                let inner = self.parse_atomic_goal()?;
                Ok(vec![Goal::Negation(inner)])
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_disjunction()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => {
                let term = self.parse_term()?;
                if let Some(op) = self.try_binary_goal_op() {
                    let rhs = self.parse_term()?;
                    Ok(vec![match op {
                        BinaryGoalOp::Eq(op) => Goal::Equality { op, left: term, right: rhs },
                        BinaryGoalOp::SemMatch => Goal::SemanticMatch { left: term, right: rhs },
                    }])
                } else {
                    match term {
                        Term::Compound { functor, args } => Ok(vec![Goal::Call { name: functor, args }]),
                        Term::Atom(name) => Ok(vec![Goal::Call { name, args: Vec::new() }]),
                        _ => Err(self.unexpected("predicate call or binary goal")),
                    }
                }
            }
        }
    }

    fn try_binary_goal_op(&mut self) -> Option<BinaryGoalOp> {
        let op = match self.peek_kind() {
            TokenKind::Eq => BinaryGoalOp::Eq(EqOp::Unifying),
            TokenKind::EqEq => BinaryGoalOp::Eq(EqOp::Structural),
            TokenKind::SemMatch => BinaryGoalOp::SemMatch,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    // -- terms --------------------------------------------------------

    fn parse_term(&mut self) -> ParseResult<Term> {
        match self.peek_kind().clone() {
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Term::Str(s))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Term::Number(n))
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_term()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(sym) => {
                self.advance();
                if self.eat(&TokenKind::LParen) {
                    let args = self.parse_term_list_until(TokenKind::RParen)?;
                    Ok(Term::Compound { functor: sym, args })
                } else if self.eat(&TokenKind::Dot) {
                    let field = self.expect_ident()?;
                    Ok(Term::Field { object: sym, field })
                } else {
                    let text = self.interner.resolve(sym);
                    if text == "_" {
                        Ok(Term::anonymous(sym))
                    } else if self.is_variable_name(text) {
                        Ok(Term::var(sym))
                    } else {
                        Ok(Term::Atom(sym))
                    }
                }
            }
            _ => Err(self.unexpected("term")),
        }
    }

    fn parse_list(&mut self) -> ParseResult<Term> {
        self.expect(TokenKind::LBracket)?;
        if self.eat(&TokenKind::RBracket) {
            return Ok(Term::proper_list(Vec::new()));
        }
        let mut items = vec![self.parse_term()?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_term()?);
        }
        let tail = if self.eat(&TokenKind::Pipe) {
            Some(Box::new(self.parse_term()?))
        } else {
            None
        };
        self.expect(TokenKind::RBracket)?;
        Ok(Term::List { items, tail })
    }
}

enum ArrowUnit {
    Plain(Goals),
    Arrow(Goals, Goals),
}

enum BinaryGoalOp {
    Eq(EqOp),
    SemMatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> (Program, Interner) {
        let mut interner = Interner::new();
        let tokens = Lexer::new(src).tokenize(&mut interner).unwrap();
        let program = {
            let mut parser = Parser::new(tokens, &mut interner);
            parser.parse_program().unwrap()
        };
        (program, interner)
    }

    #[test]
    fn parses_fact_and_rule() {
        let (program, _) = parse("man(socrates).\nmortal(X) :- man(X).");
        assert_eq!(program.declarations.len(), 2);
        match &program.declarations[0] {
            Declaration::Clause(c) => assert!(c.is_fact()),
            _ => panic!("expected clause"),
        }
        match &program.declarations[1] {
            Declaration::Clause(c) => assert_eq!(c.body.len(), 1),
            _ => panic!("expected clause"),
        }
    }

    #[test]
    fn parses_query() {
        let (program, _) = parse("? mortal(socrates).");
        match &program.declarations[0] {
            Declaration::Query(goals) => assert_eq!(goals.len(), 1),
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn variable_classification_follows_case() {
        let (program, _) = parse("p(X, y).");
        match &program.declarations[0] {
            Declaration::Clause(c) => match &c.head.params[0] {
                Term::Var { anonymous: false, .. } => {}
                other => panic!("expected variable, got {other:?}"),
            },
            _ => panic!("expected clause"),
        }
    }

    #[test]
    fn parses_entity_with_properties() {
        let (program, _) =
            parse(r#"entity SOCRATES : Man, description = "philosopher", era = "ancient"."#);
        match &program.declarations[0] {
            Declaration::Entity(e) => {
                assert_eq!(e.description.as_deref(), Some("philosopher"));
                assert_eq!(e.properties.len(), 1);
            }
            _ => panic!("expected entity"),
        }
    }

    #[test]
    fn parses_concept_with_attributes() {
        let (program, _) = parse(r#"concept Man : Animal, attributes = ["rational", "mortal"]."#);
        match &program.declarations[0] {
            Declaration::Concept(c) => {
                assert_eq!(c.genus.is_some(), true);
                assert_eq!(c.attributes, vec!["rational", "mortal"]);
            }
            _ => panic!("expected concept"),
        }
    }

    #[test]
    fn parses_field_access() {
        let (program, _) = parse("wise(E) :- E.description =~= \"thinker\".");
        match &program.declarations[0] {
            Declaration::Clause(c) => match &c.body[0] {
                Goal::SemanticMatch { left, .. } => {
                    assert!(matches!(left, Term::Field { .. }));
                }
                _ => panic!("expected semantic match"),
            },
            _ => panic!("expected clause"),
        }
    }

    #[test]
    fn parses_cut_and_disjunction() {
        let (program, _) = parse("max(X, Y, X) :- X == Y, !.");
        match &program.declarations[0] {
            Declaration::Clause(c) => {
                assert_eq!(c.body.len(), 2);
                assert_eq!(c.body[1], Goal::Cut);
            }
            _ => panic!("expected clause"),
        }
    }

    #[test]
    fn parses_if_then_else() {
        let (program, _) = parse("p(X) :- (q(X) -> r(X) ; s(X)).");
        match &program.declarations[0] {
            Declaration::Clause(c) => match &c.body[0] {
                Goal::IfThenElse { else_branch, .. } => assert!(else_branch.is_some()),
                other => panic!("expected if-then-else, got {other:?}"),
            },
            _ => panic!("expected clause"),
        }
    }

    #[test]
    fn parses_two_arm_if_then_with_no_else_branch() {
        let (program, _) = parse("p(X) :- (q(X) -> r(X)).");
        match &program.declarations[0] {
            Declaration::Clause(c) => match &c.body[0] {
                Goal::IfThenElse { else_branch, .. } => assert!(else_branch.is_none()),
                other => panic!("expected if-then-else, got {other:?}"),
            },
            _ => panic!("expected clause"),
        }
    }

    #[test]
    fn parses_list_with_tail() {
        let (program, _) = parse("p([H | T]).");
        match &program.declarations[0] {
            Declaration::Clause(c) => match &c.head.params[0] {
                Term::List { items, tail } => {
                    assert_eq!(items.len(), 1);
                    assert!(tail.is_some());
                }
                other => panic!("expected list, got {other:?}"),
            },
            _ => panic!("expected clause"),
        }
    }

    #[test]
    fn parses_global_assignment() {
        let (program, _) = parse(r#"threshold = 0.7."#);
        match &program.declarations[0] {
            Declaration::GlobalAssign { value, .. } => assert_eq!(*value, Term::Number(0.7)),
            _ => panic!("expected global assignment"),
        }
    }

    #[test]
    fn unexpected_token_is_a_parse_error() {
        let mut interner = Interner::new();
        let tokens = Lexer::new(") p(").tokenize(&mut interner).unwrap();
        let mut parser = Parser::new(tokens, &mut interner);
        assert!(parser.parse_program().is_err());
    }
}
