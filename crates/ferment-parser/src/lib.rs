pub mod parser;

pub use parser::{Parser, MAX_NESTING, MAX_OPERATORS};

use ferment_lexer::Lexer;
use ferment_syntax::ast::Program;
use ferment_syntax::error::{Error, Result};

/// Parses an in-memory source string, returning the tree and every recorded
/// parse error.
pub fn parse_source(src: &str) -> Result<(Program, Vec<Error>)> {
    let mut parser = Parser::new(Lexer::from_source(src))?;
    let program = parser.parse_program()?;
    Ok((program, parser.into_errors()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferment_syntax::ast::*;
    use ferment_syntax::token::Position;
    use std::io::{self, BufReader, Read};

    fn parse_expr_str(input: &str) -> Expr {
        let mut parser = Parser::new(Lexer::from_source(input)).expect("Lexing should succeed");
        let expr = parser.parse_expression().expect("Reading should succeed");
        assert!(parser.errors().is_empty(), "unexpected errors: {:?}", parser.errors());
        expr.expect("Parsing should produce an expression")
    }

    fn parse_program_str(input: &str) -> (Program, Vec<Error>) {
        parse_source(input).expect("Reading should succeed")
    }

    fn parse_ok(input: &str) -> Program {
        let (program, errors) = parse_program_str(input);
        assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", input, errors);
        program
    }

    fn messages(errors: &[Error]) -> Vec<&str> {
        errors.iter().map(|e| e.msg.as_str()).collect()
    }

    #[test]
    fn test_let_and_return_program() {
        let program = parse_ok("postavi x = 5; vrati x;");
        assert_eq!(program.statements.len(), 2);

        match &program.statements[0] {
            Stmt::Let(s) => {
                assert_eq!(s.name.name, "x");
                assert!(matches!(&s.value, Expr::IntegerLiteral(lit) if lit.text == "5"));
            }
            other => panic!("Expected Let, got {:?}", other),
        }
        match &program.statements[1] {
            Stmt::Return(s) => {
                assert!(matches!(&s.value, Expr::Identifier(id) if id.name == "x"));
            }
            other => panic!("Expected Return, got {:?}", other),
        }
    }

    #[test]
    fn test_print_statement() {
        let program = parse_ok("ispisi \"zdravo\";");
        assert_eq!(program.statements.len(), 1);
        if let Stmt::Print(s) = &program.statements[0] {
            assert!(matches!(&s.value, Expr::StringLiteral(lit) if lit.text == "zdravo"));
        } else {
            panic!("Expected Print");
        }
    }

    #[test]
    fn test_if_with_alternative() {
        let program = parse_ok("ako (x > y) { ispisi x; } inace { ispisi y; }");
        assert_eq!(program.statements.len(), 1);
        if let Stmt::If(s) = &program.statements[0] {
            assert_eq!(s.condition.to_string(), "(x > y)");
            assert_eq!(s.consequence.statements.len(), 1);
            let alt = s.alternative.as_ref().expect("Expected alternative");
            assert_eq!(alt.statements.len(), 1);
            assert!(matches!(&alt.statements[0], Stmt::Print(p) if p.value.to_string() == "y"));
        } else {
            panic!("Expected If");
        }
    }

    #[test]
    fn test_if_without_alternative() {
        let program = parse_ok("ako (x) { vrati 1; } ispisi 2;");
        assert_eq!(program.statements.len(), 2);
        if let Stmt::If(s) = &program.statements[0] {
            assert!(s.alternative.is_none());
            assert_eq!(s.consequence.statements.len(), 1);
        } else {
            panic!("Expected If");
        }
        assert!(matches!(&program.statements[1], Stmt::Print(_)));
    }

    #[test]
    fn test_while_statement() {
        let program = parse_ok("dok i < 10 { postavi i = i + 1; }");
        if let Stmt::While(s) = &program.statements[0] {
            assert_eq!(s.condition.to_string(), "(i < 10)");
            assert_eq!(s.body.statements.len(), 1);
        } else {
            panic!("Expected While");
        }

        let parenthesized = parse_ok("dok (i < 10) { }");
        if let Stmt::While(s) = &parenthesized.statements[0] {
            assert_eq!(s.condition.to_string(), "(i < 10)");
            assert!(s.body.statements.is_empty());
        } else {
            panic!("Expected While");
        }
    }

    #[test]
    fn test_nested_blocks() {
        let src = "
            dok i < 10 {
                ako (i > 5) {
                    ispisi i;
                } inace {
                    postavi i = i + 1;
                }
                ispisi \"dalje\";
            }
        ";
        let program = parse_ok(src);
        assert_eq!(program.statements.len(), 1);
        let Stmt::While(w) = &program.statements[0] else {
            panic!("Expected While");
        };
        assert_eq!(w.body.statements.len(), 2);
        let Stmt::If(i) = &w.body.statements[0] else {
            panic!("Expected If");
        };
        assert!(matches!(&i.consequence.statements[0], Stmt::Print(_)));
        let alt = i.alternative.as_ref().expect("Expected alternative");
        assert!(matches!(&alt.statements[0], Stmt::Let(l) if l.value.to_string() == "(i + 1)"));
    }

    #[test]
    fn test_semicolons_are_optional() {
        let with = parse_ok("postavi x = 1; vrati x; ispisi x;");
        let without = parse_ok("postavi x = 1 vrati x ispisi x");
        assert_eq!(with.statements.len(), 3);
        assert_eq!(with.to_string(), without.to_string());
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse_expr_str("a + b - c").to_string(), "((a + b) - c)");
        assert_eq!(parse_expr_str("a - b - c - d").to_string(), "(((a - b) - c) - d)");
    }

    #[test]
    fn test_no_precedence_between_operators() {
        assert_eq!(parse_expr_str("a + b * c").to_string(), "((a + b) * c)");
        assert_eq!(parse_expr_str("1 < 2 + 3").to_string(), "((1 < 2) + 3)");

        let Expr::Infix(top) = parse_expr_str("a + b * c") else {
            panic!("Expected Infix");
        };
        assert_eq!(top.operator, InfixOperator::Multiply);
        assert!(
            matches!(*top.left, Expr::Infix(ref inner) if inner.operator == InfixOperator::Add)
        );
    }

    #[test]
    fn test_parentheses_change_grouping() {
        assert_eq!(parse_expr_str("a * (b + c)").to_string(), "(a * (b + c))");
        assert_eq!(parse_expr_str("a * b + c").to_string(), "((a * b) + c)");
        assert_eq!(parse_expr_str("(a)").to_string(), "a");
        // A leading group is already what the flat grammar builds.
        assert_eq!(
            parse_expr_str("(a + b) * c").to_string(),
            parse_expr_str("a + b * c").to_string()
        );
    }

    #[test]
    fn test_equality_is_not_an_infix_operator() {
        let (program, errors) = parse_program_str("ispisi a == b;");
        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(&program.statements[0], Stmt::Print(p) if p.value.to_string() == "a"));
    }

    #[test]
    fn test_missing_identifier_drops_statement() {
        let (program, errors) = parse_program_str("postavi = 5;");
        assert!(program.statements.is_empty());
        assert_eq!(messages(&errors), vec!["expected identifier after 'postavi'"]);
        assert_eq!(errors[0].position(), Some(Position::new(1, 9)));
    }

    #[test]
    fn test_parsing_continues_after_errors() {
        let (program, errors) = parse_program_str("postavi = 5; ispisi y;");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(&program.statements[0], Stmt::Print(_)));
    }

    #[test]
    fn test_statement_errors() {
        let cases = [
            ("postavi x 5", "expected '=' after identifier"),
            ("ako x { }", "expected '(' after 'ako'"),
            ("ako (x { }", "expected ')' after condition"),
            ("ako (x) y", "expected '{' after condition"),
            ("ako (x) { } inace y", "expected '{' after 'inace'"),
            ("dok x y", "expected '{' after condition"),
            ("vrati ;", "expected expression, found ';'"),
            ("ispisi", "expected expression, found end of input"),
            ("postavi x = 1 +", "expected expression, found end of input"),
        ];
        for (src, expected) in cases {
            let (program, errors) = parse_program_str(src);
            assert!(program.statements.is_empty(), "statement kept for {:?}", src);
            assert_eq!(
                errors.first().map(|e| e.msg.as_str()),
                Some(expected),
                "for {:?}",
                src
            );
        }
    }

    #[test]
    fn test_unclosed_parenthesis_keeps_expression() {
        let (program, errors) = parse_program_str("ispisi (a + b;");
        assert_eq!(messages(&errors), vec!["expected closing ')'"]);
        assert_eq!(errors[0].position(), Some(Position::new(1, 14)));
        assert_eq!(program.statements.len(), 1);
        let Stmt::Print(print) = &program.statements[0] else {
            panic!("Expected Print");
        };
        assert_eq!(print.value.to_string(), "(a + b)");
    }

    #[test]
    fn test_unclosed_block_is_reported() {
        let (program, errors) = parse_program_str("dok x { ispisi x;");
        assert_eq!(messages(&errors), vec!["expected '}' to close block"]);
        assert_eq!(errors[0].position(), Some(Position::new(1, 7)));
        let Stmt::While(w) = &program.statements[0] else {
            panic!("Expected While");
        };
        assert_eq!(w.body.statements.len(), 1);
    }

    #[test]
    fn test_each_unclosed_block_points_at_its_brace() {
        let (program, errors) = parse_program_str("dok x { dok y { dok z {");
        assert_eq!(program.statements.len(), 1);
        let positions: Vec<_> = errors.iter().filter_map(|e| e.position()).collect();
        assert_eq!(
            positions,
            vec![Position::new(1, 23), Position::new(1, 15), Position::new(1, 7)]
        );
        assert!(errors.iter().all(|e| e.msg == "expected '}' to close block"));
    }

    #[test]
    fn test_deeply_nested_parentheses_are_reported() {
        let src = format!("ispisi {}a{}; ispisi b;", "(".repeat(10_000), ")".repeat(10_000));
        let (program, errors) = parse_program_str(&src);
        assert_eq!(messages(&errors), vec!["expression nested too deeply"]);
        // "ispisi " is 7 columns; the first group past the limit opens here.
        assert_eq!(errors[0].position(), Some(Position::new(1, 7 + MAX_NESTING + 1)));
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(&program.statements[0], Stmt::Print(p) if p.value.to_string() == "b"));
    }

    #[test]
    fn test_nesting_up_to_the_limit_is_accepted() {
        let depth = MAX_NESTING;
        let src = format!("ispisi {}a + b{}", "(".repeat(depth), ")".repeat(depth));
        let program = parse_ok(&src);
        assert_eq!(program.to_string(), "ispisi (a + b);\n");
    }

    #[test]
    fn test_deeply_nested_blocks_are_reported() {
        let src = "dok x { ".repeat(10_000);
        let (program, errors) = parse_program_str(&src);
        assert_eq!(program.statements.len(), 1);
        assert_eq!(errors[0].msg, "block nested too deeply");
        // Every block that did open is reported unclosed, outermost last.
        assert_eq!(errors.len(), 1 + MAX_NESTING);
        assert_eq!(errors.last().and_then(|e| e.position()), Some(Position::new(1, 7)));
    }

    #[test]
    fn test_too_deep_block_is_skipped_whole() {
        let inner = format!("{}ispisi skriven;{}", "dok x { ".repeat(200), "}".repeat(200));
        let src = format!("{} ispisi vidljiv;", inner);
        let (program, errors) = parse_program_str(&src);
        assert_eq!(messages(&errors), vec!["block nested too deeply"]);
        assert_eq!(program.statements.len(), 2);
        assert!(!program.to_string().contains("skriven"));
        let Stmt::Print(print) = &program.statements[1] else {
            panic!("Expected Print");
        };
        assert_eq!(print.value.to_string(), "vidljiv");
    }

    #[test]
    fn test_long_operator_chains() {
        let fits = format!("ispisi a{}", " + a".repeat(MAX_OPERATORS));
        let program = parse_ok(&fits);
        assert_eq!(program.to_string().matches('+').count(), MAX_OPERATORS);
        drop(program);

        let src = format!("ispisi a{}; ispisi b;", " + a".repeat(20_000));
        let (program, errors) = parse_program_str(&src);
        assert_eq!(messages(&errors), vec!["expression has too many operators"]);
        // The k-th `+` sits at column 4k + 6.
        assert_eq!(errors[0].position(), Some(Position::new(1, 4 * (MAX_OPERATORS + 1) + 6)));
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(&program.statements[0], Stmt::Print(p) if p.value.to_string() == "b"));
    }

    #[test]
    fn test_operator_budget_is_per_statement() {
        let line = format!("ispisi a{};\n", " + a".repeat(MAX_OPERATORS));
        let (program, errors) = parse_program_str(&line.repeat(3));
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_unrecognized_tokens_are_skipped() {
        let program = parse_ok("x; funkcija 1 ispisi 2;");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(&program.statements[0], Stmt::Print(_)));
    }

    #[test]
    fn test_illegal_tokens_are_reported() {
        let (program, errors) = parse_program_str("@ ispisi 1; \"otvoren");
        assert_eq!(
            messages(&errors),
            vec!["illegal character '@'", "unterminated string literal"]
        );
        assert_eq!(program.statements.len(), 1);

        let (_, errors) = parse_program_str("postavi x = #;");
        assert_eq!(messages(&errors), vec!["expected expression, found '#'"]);
    }

    #[test]
    fn test_nodes_keep_their_positions() {
        let program = parse_ok("ispisi 1;\n  vrati x + 2;");
        assert_eq!(program.statements[0].position(), Position::new(1, 1));
        let Stmt::Return(ret) = &program.statements[1] else {
            panic!("Expected Return");
        };
        assert_eq!(ret.token.pos, Position::new(2, 3));
        let Expr::Infix(infix) = &ret.value else {
            panic!("Expected Infix");
        };
        assert_eq!(infix.token.lexeme, "+");
        assert_eq!(infix.token.pos, Position::new(2, 11));
        assert_eq!(infix.left.position(), Position::new(2, 9));
        assert_eq!(program.token_literal(), "ispisi");
    }

    #[test]
    fn test_rendered_program_parses_back() {
        let src = "postavi x = (1 + 2) * 3\nako (x > 5) { ispisi \"veliko\" } inace { dok x < 5 { postavi x = x + 1 } }\nvrati x";
        let first = parse_ok(src);
        let rendered = first.to_string();
        let second = parse_ok(&rendered);
        assert_eq!(second.to_string(), rendered);
        assert_eq!(second.statements.len(), 3);
    }

    #[test]
    fn test_empty_program() {
        let program = parse_ok("   ");
        assert!(program.statements.is_empty());
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "connection reset"))
        }
    }

    #[test]
    fn test_reader_failure_aborts_parsing() {
        let reader = BufReader::new((&b"postavi x = 1; "[..]).chain(BrokenReader));
        let mut parser = Parser::new(Lexer::new(reader)).expect("first tokens are readable");
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.msg, "failed to read source: connection reset");
    }
}
