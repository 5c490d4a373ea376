use lalrpop_util::ParseError;
use log::trace;

use crate::{
    error::{Error, Result},
    grammar::ExprParser,
    language::Expr,
    lexer::{Lexer, LexicalError, Tok},
    options::SymbolTable,
};

/// An expression together with its variables in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub expr: Expr,
    pub variables: Vec<String>,
}

pub fn parse(input: &str, symbols: &SymbolTable) -> Result<Parsed> {
    let mut variables = Vec::new();
    let expr = ExprParser::new()
        .parse(&mut variables, Lexer::new(input, symbols))
        .map_err(|e| parse_error(input, e))?;
    trace!("parsed {input:?} as {expr} over {variables:?}");

    Ok(Parsed {
        expr: *expr,
        variables,
    })
}

fn char_position(input: &str, byte: usize) -> usize {
    input
        .char_indices()
        .take_while(|&(i, _)| i < byte)
        .count()
}

fn expected_list(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(", expected one of {}", expected.join(", "))
    }
}

fn parse_error(input: &str, e: ParseError<usize, Tok<'_>, LexicalError>) -> Error {
    let (byte, message) = match e {
        ParseError::InvalidToken { location } => (location, "invalid token".to_string()),
        ParseError::UnrecognizedEof { location, expected } => (
            location,
            format!("unexpected end of input{}", expected_list(&expected)),
        ),
        ParseError::UnrecognizedToken {
            token: (start, tok, _),
            expected,
        } => (
            start,
            format!("unexpected {tok}{}", expected_list(&expected)),
        ),
        ParseError::ExtraToken {
            token: (start, tok, _),
        } => (start, format!("unexpected {tok} after the expression")),
        ParseError::User {
            error: LexicalError::UnknownToken { start, text },
        } => (start, format!("unknown token `{text}`")),
    };

    Error::Parse {
        position: char_position(input, byte),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OptionKey, OptionStore};

    fn parse_default(input: &str) -> Result<Parsed> {
        parse(input, &SymbolTable::default())
    }

    fn shape(input: &str) -> String {
        parse_default(input).unwrap().expr.to_string()
    }

    #[test]
    fn precedence_from_not_down_to_equality() {
        assert_eq!(shape("not A and B"), "(¬A ∧ B)");
        assert_eq!(shape("A or B and C"), "(A ∨ (B ∧ C))");
        assert_eq!(shape("A xor B or C"), "((A ⊕ B) ∨ C)");
        assert_eq!(shape("A or B -> C"), "((A ∨ B) ⇒ C)");
        assert_eq!(shape("A -> B = C"), "((A ⇒ B) ⇔ C)");
        assert_eq!(shape("A and B xor C and D"), "((A ∧ B) ⊕ (C ∧ D))");
    }

    #[test]
    fn implication_is_right_associative() {
        assert_eq!(shape("A -> B -> C"), "(A ⇒ (B ⇒ C))");
    }

    #[test]
    fn parens_override_precedence() {
        assert_eq!(shape("(A or B) and C"), "((A ∨ B) ∧ C)");
        assert_eq!(shape("{A -> B} -> [C]"), "((A ⇒ B) ⇒ C)");
        assert_eq!(shape("!(A & false)"), "¬(A ∧ 0)");
    }

    #[test]
    fn variables_in_first_appearance_order() {
        let parsed = parse_default("b and (a or b) -> c and a").unwrap();
        assert_eq!(parsed.variables, ["b", "a", "c"]);
    }

    #[test]
    fn unmatched_parens() {
        assert!(matches!(
            parse_default("(A and B"),
            Err(Error::Parse { position: 8, .. })
        ));
        assert!(matches!(
            parse_default("A and B)"),
            Err(Error::Parse { position: 7, .. })
        ));
    }

    #[test]
    fn arity_mismatch() {
        assert!(matches!(
            parse_default("A and"),
            Err(Error::Parse { position: 5, .. })
        ));
        assert!(matches!(
            parse_default("A B"),
            Err(Error::Parse { position: 2, .. })
        ));
        assert!(matches!(parse_default(""), Err(Error::Parse { .. })));
    }

    #[test]
    fn position_counts_characters() {
        let err = parse_default("¬¬ a ∧ @").unwrap_err();
        assert_eq!(
            err,
            Error::Parse {
                position: 7,
                message: "unknown token `@`".into()
            }
        );
    }

    #[test]
    fn uses_the_configured_symbols() {
        let store = OptionStore::new();
        store.set(OptionKey::And, "&");
        let symbols = store.symbols();

        assert!(parse("A & B", &symbols).is_ok());
        assert!(matches!(
            parse("A and B", &symbols),
            Err(Error::Parse { position: 2, .. })
        ));
    }
}
