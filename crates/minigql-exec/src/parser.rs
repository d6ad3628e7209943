//! Recursive-descent parser producing a [`Document`].
//!
//! Supported grammar:
//!
//! ```text
//! document   := operation+
//! operation  := selection
//!             | ("query" | "mutation") NAME? variables? selection
//! variables  := "(" ("$" NAME ":" type ("=" value)?)+ ")"
//! selection  := "{" field+ "}"
//! field      := (NAME ":")? NAME arguments? selection?
//! arguments  := "(" (NAME ":" value)+ ")"
//! type       := NAME | "[" type "]" | type "!"
//! ```
//!
//! Selection sets, list and object literals, and list types may nest at most
//! [`MAX_DEPTH`] levels deep.

use minigql_schema::{RootKind, TypeRef};

use crate::ast::{Document, Field, InputValue, Operation, Pos, VariableDef};
use crate::error::{ExecError, ExecResult};
use crate::lexer::{Lexer, Token, TokenKind};

/// Deepest nesting the parser accepts.
pub const MAX_DEPTH: usize = 64;

/// Parse request text into a document.
pub fn parse(source: &str) -> ExecResult<Document> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser {
        tokens,
        index: 0,
        depth: 0,
    }
    .document()
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The lexer always ends the stream with Eof and `advance` never
        // moves past it.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    fn error_at(&self, pos: Pos, message: impl Into<String>) -> ExecError {
        ExecError::Parse {
            message: message.into(),
            line: pos.line,
            column: pos.column,
        }
    }

    fn unexpected(&self, expected: &str) -> ExecError {
        let token = self.peek();
        let found = match &token.kind {
            TokenKind::Punct(c) => format!("'{c}'"),
            TokenKind::Name(n) => format!("name {n:?}"),
            TokenKind::Int(i) => format!("integer {i}"),
            TokenKind::Float(f) => format!("float {f}"),
            TokenKind::Str(s) => format!("string {s:?}"),
            TokenKind::Eof => "end of document".to_string(),
        };
        self.error_at(token.pos, format!("expected {expected}, found {found}"))
    }

    fn is_punct(&self, c: char) -> bool {
        self.peek().kind == TokenKind::Punct(c)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.is_punct(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> ExecResult<Pos> {
        if self.is_punct(c) {
            Ok(self.advance().pos)
        } else {
            Err(self.unexpected(&format!("'{c}'")))
        }
    }

    fn expect_name(&mut self) -> ExecResult<String> {
        match &self.peek().kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("a name")),
        }
    }

    /// Run `inner` one nesting level deeper.
    fn nested<T>(&mut self, inner: impl FnOnce(&mut Self) -> ExecResult<T>) -> ExecResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at(self.peek().pos, "document nested too deeply"));
        }
        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    fn document(&mut self) -> ExecResult<Document> {
        let mut operations = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            operations.push(self.operation()?);
        }
        if operations.is_empty() {
            return Err(self.error_at(self.peek().pos, "document contains no operations"));
        }
        Ok(Document { operations })
    }

    fn operation(&mut self) -> ExecResult<Operation> {
        if self.is_punct('{') {
            return Ok(Operation {
                kind: RootKind::Query,
                name: None,
                variables: Vec::new(),
                selection: self.selection()?,
            });
        }
        let keyword = match &self.peek().kind {
            TokenKind::Name(name) => name.clone(),
            _ => return Err(self.unexpected("'{', \"query\" or \"mutation\"")),
        };
        let kind = match keyword.as_str() {
            "query" => RootKind::Query,
            "mutation" => RootKind::Mutation,
            other => return Err(ExecError::UnknownOperation(other.to_string())),
        };
        self.advance();
        let name = if matches!(self.peek().kind, TokenKind::Name(_)) {
            Some(self.expect_name()?)
        } else {
            None
        };
        let variables = if self.is_punct('(') {
            self.variable_defs()?
        } else {
            Vec::new()
        };
        Ok(Operation {
            kind,
            name,
            variables,
            selection: self.selection()?,
        })
    }

    fn variable_defs(&mut self) -> ExecResult<Vec<VariableDef>> {
        self.expect_punct('(')?;
        let mut defs = Vec::new();
        while !self.eat_punct(')') {
            self.expect_punct('$')?;
            let name = self.expect_name()?;
            self.expect_punct(':')?;
            let ty = self.type_ref()?;
            let default = if self.eat_punct('=') {
                Some(self.value(true)?)
            } else {
                None
            };
            defs.push(VariableDef { name, ty, default });
        }
        if defs.is_empty() {
            return Err(self.unexpected("a variable definition"));
        }
        Ok(defs)
    }

    fn type_ref(&mut self) -> ExecResult<TypeRef> {
        let base = if self.eat_punct('[') {
            let inner = self.nested(Self::type_ref)?;
            self.expect_punct(']')?;
            TypeRef::list(inner)
        } else {
            TypeRef::named(self.expect_name()?)
        };
        Ok(if self.eat_punct('!') {
            TypeRef::non_null(base)
        } else {
            base
        })
    }

    fn selection(&mut self) -> ExecResult<Vec<Field>> {
        self.nested(Self::selection_set)
    }

    fn selection_set(&mut self) -> ExecResult<Vec<Field>> {
        self.expect_punct('{')?;
        let mut fields = Vec::new();
        while !self.eat_punct('}') {
            if self.peek().kind == TokenKind::Eof {
                return Err(self.unexpected("'}'"));
            }
            fields.push(self.field()?);
        }
        if fields.is_empty() {
            return Err(self.unexpected("a field"));
        }
        Ok(fields)
    }

    fn field(&mut self) -> ExecResult<Field> {
        let first = self.expect_name()?;
        let (alias, name) = if self.eat_punct(':') {
            (Some(first), self.expect_name()?)
        } else {
            (None, first)
        };
        let arguments = if self.is_punct('(') {
            self.arguments()?
        } else {
            Vec::new()
        };
        let selection = if self.is_punct('{') {
            self.selection()?
        } else {
            Vec::new()
        };
        Ok(Field {
            alias,
            name,
            arguments,
            selection,
        })
    }

    fn arguments(&mut self) -> ExecResult<Vec<(String, InputValue)>> {
        self.expect_punct('(')?;
        let mut args: Vec<(String, InputValue)> = Vec::new();
        while !self.eat_punct(')') {
            let pos = self.peek().pos;
            let name = self.expect_name()?;
            if args.iter().any(|(n, _)| n == &name) {
                return Err(self.error_at(pos, format!("argument {name} given twice")));
            }
            self.expect_punct(':')?;
            args.push((name, self.value(false)?));
        }
        if args.is_empty() {
            return Err(self.unexpected("an argument"));
        }
        Ok(args)
    }

    /// Parse a value. `constant` forbids variable references.
    fn value(&mut self, constant: bool) -> ExecResult<InputValue> {
        let token = self.peek().clone();
        let value = match token.kind {
            TokenKind::Punct('$') if !constant => {
                self.advance();
                return Ok(InputValue::Variable(self.expect_name()?));
            }
            TokenKind::Punct('[') => return self.nested(|p| p.list_value(constant)),
            TokenKind::Punct('{') => return self.nested(|p| p.object_value(constant)),
            TokenKind::Int(i) => InputValue::Int(i),
            TokenKind::Float(f) => InputValue::Float(f),
            TokenKind::Str(s) => InputValue::String(s),
            TokenKind::Name(name) => match name.as_str() {
                "true" => InputValue::Boolean(true),
                "false" => InputValue::Boolean(false),
                "null" => InputValue::Null,
                _ => InputValue::Enum(name),
            },
            _ => return Err(self.unexpected("a value")),
        };
        self.advance();
        Ok(value)
    }

    fn list_value(&mut self, constant: bool) -> ExecResult<InputValue> {
        self.expect_punct('[')?;
        let mut items = Vec::new();
        while !self.eat_punct(']') {
            if self.peek().kind == TokenKind::Eof {
                return Err(self.unexpected("']'"));
            }
            items.push(self.value(constant)?);
        }
        Ok(InputValue::List(items))
    }

    fn object_value(&mut self, constant: bool) -> ExecResult<InputValue> {
        self.expect_punct('{')?;
        let mut entries = Vec::new();
        while !self.eat_punct('}') {
            let key = self.expect_name()?;
            self.expect_punct(':')?;
            entries.push((key, self.value(constant)?));
        }
        Ok(InputValue::Object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single(src: &str) -> Operation {
        let mut doc = parse(src).unwrap();
        assert_eq!(doc.operations.len(), 1);
        doc.operations.remove(0)
    }

    #[test]
    fn shorthand_query() {
        let op = single("{ list { id title comments { body } author { Name Tutorials } } }");
        assert_eq!(op.kind, RootKind::Query);
        assert_eq!(op.name, None);
        let list = &op.selection[0];
        assert_eq!(list.name, "list");
        let names: Vec<_> = list.selection.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "title", "comments", "author"]);
        assert_eq!(list.selection[3].selection.len(), 2);
    }

    #[test]
    fn mutation_with_arguments() {
        let op = single(r#"mutation { create(title: "Hello World") { title } }"#);
        assert_eq!(op.kind, RootKind::Mutation);
        assert_eq!(
            op.selection[0].arguments,
            vec![("title".to_string(), InputValue::String("Hello World".into()))]
        );
    }

    #[test]
    fn named_query_with_variables() {
        let op =
            single("query Tut($id: Int! = 1, $tags: [String]) { tutorial(id: $id) { title } }");
        assert_eq!(op.name.as_deref(), Some("Tut"));
        assert_eq!(op.variables.len(), 2);
        assert_eq!(op.variables[0].ty.to_string(), "Int!");
        assert_eq!(op.variables[0].default, Some(InputValue::Int(1)));
        assert_eq!(op.variables[1].ty.to_string(), "[String]");
        assert_eq!(
            op.selection[0].arguments[0].1,
            InputValue::Variable("id".into())
        );
    }

    #[test]
    fn aliases() {
        let op = single("{ first: tutorial(id: 1) { title } second: tutorial(id: 2) { title } }");
        assert_eq!(op.selection[0].response_key(), "first");
        assert_eq!(op.selection[1].response_key(), "second");
        assert_eq!(op.selection[1].name, "tutorial");
    }

    #[test]
    fn literal_kinds() {
        let op = single("{ f(a: null, b: true, c: 1.5, d: RED, e: [1, 2], g: {x: 1}) }");
        let values: Vec<_> = op.selection[0].arguments.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(
            values,
            vec![
                InputValue::Null,
                InputValue::Boolean(true),
                InputValue::Float(1.5),
                InputValue::Enum("RED".into()),
                InputValue::List(vec![InputValue::Int(1), InputValue::Int(2)]),
                InputValue::Object(vec![("x".into(), InputValue::Int(1))]),
            ]
        );
    }

    #[test]
    fn multiple_operations() {
        let doc = parse("query A { list { id } } query B { list { title } }").unwrap();
        assert_eq!(doc.operations.len(), 2);
        assert_eq!(doc.operations[1].name.as_deref(), Some("B"));
    }

    #[test]
    fn unbalanced_braces() {
        let err = parse("{ list { id }").unwrap_err();
        assert!(matches!(err, ExecError::Parse { .. }));
        assert!(err.to_string().contains("end of document"));
        assert!(parse("{ list { id } } }").is_err());
    }

    #[test]
    fn empty_inputs() {
        assert!(parse("").is_err());
        assert!(parse("{ }").is_err());
        assert!(parse("{ f() }").is_err());
    }

    #[test]
    fn unknown_keyword_is_unknown_operation() {
        assert_eq!(
            parse("subscription { list { id } }").unwrap_err(),
            ExecError::UnknownOperation("subscription".into())
        );
    }

    #[test]
    fn variables_not_allowed_in_defaults() {
        assert!(parse("query ($a: Int = $b) { f(x: $a) }").is_err());
    }

    #[test]
    fn duplicate_argument() {
        assert!(parse("{ tutorial(id: 1, id: 2) { id } }").is_err());
    }

    fn parse_on_small_stack(src: String) -> ExecResult<Document> {
        std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || parse(&src))
            .unwrap()
            .join()
            .unwrap()
    }

    fn assert_too_deep(result: ExecResult<Document>) {
        match result {
            Err(ExecError::Parse { message, .. }) => {
                assert_eq!(message, "document nested too deeply")
            }
            other => panic!("expected a nesting error, got {other:?}"),
        }
    }

    #[test]
    fn deeply_nested_selections_are_rejected() {
        assert_too_deep(parse_on_small_stack("{ a ".repeat(100_000)));
    }

    #[test]
    fn deeply_nested_literals_are_rejected() {
        let lists = format!("{{ f(a: {}) }}", "[".repeat(100_000));
        assert_too_deep(parse_on_small_stack(lists));
        let objects = format!("{{ f(a: {}) }}", "{x: ".repeat(100_000));
        assert_too_deep(parse_on_small_stack(objects));
    }

    #[test]
    fn deeply_nested_variable_types_are_rejected() {
        let src = format!("query ($v: {}Int) {{ f }}", "[".repeat(100_000));
        assert_too_deep(parse_on_small_stack(src));
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let depth = MAX_DEPTH - 1;
        let src = format!("{{ f(a: {}1{}) }}", "[".repeat(depth), "]".repeat(depth));
        assert!(parse(&src).is_ok());

        let src = format!("{}leaf{}", "{ a ".repeat(MAX_DEPTH), " }".repeat(MAX_DEPTH));
        assert!(parse(&src).is_ok());
        let src = format!("{}leaf{}", "{ a ".repeat(MAX_DEPTH + 1), " }".repeat(MAX_DEPTH + 1));
        assert_too_deep(parse(&src));
    }

    proptest! {
        #[test]
        fn never_panics(src in "\\PC{0,64}") {
            let _ = parse(&src);
        }

        #[test]
        fn never_panics_on_graphql_alphabet(src in "[{}():!$=\\[\\] a-z0-9\"\\\\#,\\n.-]{0,64}") {
            let _ = parse(&src);
        }
    }
}
