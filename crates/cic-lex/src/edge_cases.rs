//! Cross-cutting lexer edge cases.

use cic_util::Symbol;

use crate::token::Token;
use crate::Lexer;

fn lex_tokens(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new("test.ci", source);
    let mut tokens = Vec::new();
    loop {
        lexer.next_token().expect("lex error");
        if lexer.current == Token::Eof {
            return tokens;
        }
        tokens.push(lexer.current);
    }
}

#[test]
fn test_adjacent_operators_longest_match() {
    // Maximal munch: `a+++b` is `a ++ + b`.
    assert_eq!(
        lex_tokens("a+++b"),
        vec![
            Token::Ident(Symbol::intern("a")),
            Token::Increment,
            Token::Plus,
            Token::Ident(Symbol::intern("b")),
        ]
    );
}

#[test]
fn test_keyword_prefix_identifiers() {
    // Identifiers that merely start with a keyword stay identifiers.
    assert_eq!(
        lex_tokens("className forx breakpoint"),
        vec![
            Token::Ident(Symbol::intern("className")),
            Token::Ident(Symbol::intern("forx")),
            Token::Ident(Symbol::intern("breakpoint")),
        ]
    );
}

#[test]
fn test_method_header_token_sequence() {
    assert_eq!(
        lex_tokens("public static int Main() throws"),
        vec![
            Token::Public,
            Token::Static,
            Token::Ident(Symbol::intern("int")),
            Token::Ident(Symbol::intern("Main")),
            Token::LParen,
            Token::RParen,
            Token::Throws,
        ]
    );
}

#[test]
fn test_empty_and_whitespace_only_input() {
    assert_eq!(lex_tokens(""), vec![]);
    assert_eq!(lex_tokens("  \t\r\n\n  "), vec![]);
    assert_eq!(lex_tokens("// only a comment"), vec![]);
}

#[test]
fn test_no_whitespace_between_tokens() {
    assert_eq!(
        lex_tokens("x=y<<2;"),
        vec![
            Token::Ident(Symbol::intern("x")),
            Token::Eq,
            Token::Ident(Symbol::intern("y")),
            Token::Shl,
            Token::Long(2),
            Token::Semicolon,
        ]
    );
}

#[test]
fn test_error_carries_filename_and_line() {
    let mut lexer = Lexer::new("input.ci", "ok\n  \u{7}");
    lexer.next_token().unwrap();
    let err = lexer.next_token().unwrap_err();
    assert_eq!(err.filename, "input.ci");
    assert_eq!(err.line, 2);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn identifiers_lex_to_one_ident(name in "[a-zA-Z_][a-zA-Z0-9_]{0,20}") {
            prop_assume!(crate::token::keyword_from_ident(&name).is_none());
            let tokens = lex_tokens(&name);
            prop_assert_eq!(tokens, vec![Token::Ident(Symbol::intern(&name))]);
        }

        #[test]
        fn decimal_literals_round_trip(value in 0i64..=i64::MAX) {
            let tokens = lex_tokens(&value.to_string());
            prop_assert_eq!(tokens, vec![Token::Long(value)]);
        }

        #[test]
        fn string_contents_round_trip(content in "[a-zA-Z0-9 .,;:!?_-]{0,40}") {
            let source = format!("\"{}\"", content);
            let tokens = lex_tokens(&source);
            prop_assert_eq!(tokens, vec![Token::String(Symbol::intern(&content))]);
        }
    }
}
