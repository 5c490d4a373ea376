use std::fmt::Display;

use crate::options::{OptionKey, SymbolTable};

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    True,
    False,
    Not,
    And,
    Xor,
    Or,
    Implication,
    Equality,
    LParen,
    RParen,
    Var(&'input str),
}

impl From<OptionKey> for Tok<'_> {
    fn from(key: OptionKey) -> Self {
        match key {
            OptionKey::LitTrue => Tok::True,
            OptionKey::LitFalse => Tok::False,
            OptionKey::Not => Tok::Not,
            OptionKey::And => Tok::And,
            OptionKey::Xor => Tok::Xor,
            OptionKey::Or => Tok::Or,
            OptionKey::Implication => Tok::Implication,
            OptionKey::Equality => Tok::Equality,
            OptionKey::LeftParen => Tok::LParen,
            OptionKey::RightParen => Tok::RParen,
        }
    }
}

impl Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::True => f.write_str("lit-true"),
            Tok::False => f.write_str("lit-false"),
            Tok::Not => f.write_str("not"),
            Tok::And => f.write_str("and"),
            Tok::Xor => f.write_str("xor"),
            Tok::Or => f.write_str("or"),
            Tok::Implication => f.write_str("implication"),
            Tok::Equality => f.write_str("equality"),
            Tok::LParen => f.write_str("left-paren"),
            Tok::RParen => f.write_str("right-paren"),
            Tok::Var(name) => write!(f, "variable `{name}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    /// Text that is neither a configured symbol nor a valid variable name.
    UnknownToken { start: usize, text: String },
}

fn is_var_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Splits an expression into tokens using a [`SymbolTable`].
///
/// Whitespace separates chunks. Inside a chunk symbols are found anywhere,
/// so `A&B` lexes as three tokens; whatever precedes the first symbol is a
/// variable name. Locations are byte offsets into the input.
pub struct Lexer<'input, 'sym> {
    input: &'input str,
    symbols: &'sym SymbolTable,
    pos: usize,
}

impl<'input, 'sym> Lexer<'input, 'sym> {
    pub fn new(input: &'input str, symbols: &'sym SymbolTable) -> Self {
        Self {
            input,
            symbols,
            pos: 0,
        }
    }
}

impl<'input> Iterator for Lexer<'input, '_> {
    type Item = Spanned<Tok<'input>, usize, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.input;
        let rest = &input[self.pos..];
        let start = self.pos + (rest.len() - rest.trim_start().len());
        let rest = &input[start..];
        if rest.is_empty() {
            self.pos = start;
            return None;
        }

        let chunk_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let chunk = &rest[..chunk_len];

        // first symbol in this chunk, if any
        let found = chunk
            .char_indices()
            .find_map(|(i, _)| self.symbols.match_prefix(&chunk[i..]).map(|m| (i, m)));

        let (tok, len) = match found {
            Some((0, (key, len))) => (Tok::from(key), len),
            Some((i, _)) => (Tok::Var(&chunk[..i]), i),
            None => (Tok::Var(chunk), chunk_len),
        };

        if let Tok::Var(name) = tok {
            if !name.chars().all(is_var_char) {
                self.pos = input.len();
                return Some(Err(LexicalError::UnknownToken {
                    start,
                    text: name.to_string(),
                }));
            }
        }

        self.pos = start + len;
        Some(Ok((start, tok, start + len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionStore;

    fn lex<'a>(input: &'a str, symbols: &SymbolTable) -> Vec<Tok<'a>> {
        Lexer::new(input, symbols)
            .map(|t| t.map(|(_, tok, _)| tok))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn splits_symbols_out_of_words() {
        let symbols = SymbolTable::default();
        assert_eq!(
            lex("(A&B)|!C", &symbols),
            [
                Tok::LParen,
                Tok::Var("A"),
                Tok::And,
                Tok::Var("B"),
                Tok::RParen,
                Tok::Or,
                Tok::Not,
                Tok::Var("C"),
            ]
        );
    }

    #[test]
    fn word_operators_ignore_case() {
        let symbols = SymbolTable::default();
        assert_eq!(
            lex("NOT p AnD TRUE", &symbols),
            [Tok::Not, Tok::Var("p"), Tok::And, Tok::True]
        );
    }

    #[test]
    fn unicode_symbols() {
        let symbols = SymbolTable::default();
        assert_eq!(
            lex("¬a ∧ b → c ≡ d ⊕ e", &symbols),
            [
                Tok::Not,
                Tok::Var("a"),
                Tok::And,
                Tok::Var("b"),
                Tok::Implication,
                Tok::Var("c"),
                Tok::Equality,
                Tok::Var("d"),
                Tok::Xor,
                Tok::Var("e"),
            ]
        );
    }

    #[test]
    fn reports_byte_spans() {
        let symbols = SymbolTable::default();
        let spans: Vec<_> = Lexer::new("  x -> y", &symbols)
            .map(|t| t.map(|(l, _, r)| (l, r)).unwrap())
            .collect();
        assert_eq!(spans, [(2, 3), (4, 6), (7, 8)]);
    }

    #[test]
    fn rejects_unknown_characters() {
        let store = OptionStore::new();
        let symbols = store.symbols();
        let err = Lexer::new("a @ b", &symbols)
            .find_map(Result::err)
            .unwrap();
        assert_eq!(
            err,
            LexicalError::UnknownToken {
                start: 2,
                text: "@".into()
            }
        );
    }

    #[test]
    fn empty_input_has_no_tokens() {
        let symbols = SymbolTable::default();
        assert_eq!(Lexer::new("   ", &symbols).count(), 0);
    }
}
