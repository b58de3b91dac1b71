//! Lexer turning a raw query string into a flat token stream.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A lexical unit of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    And,
    Or,
    Not,
    LParen,
    RParen,
    /// A double-quoted literal with its inner whitespace preserved.
    Phrase(String),
    /// A bare word.
    Term(String),
}

impl Token {
    /// Whether this token can begin an operand.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Term(_) | Token::Phrase(_) | Token::LParen | Token::Not
        )
    }

    /// Classify a bare word as an operator or a term.
    ///
    /// Operators are matched case-insensitively, and the symbolic spellings
    /// `&&`, `||` and `!` are accepted as well.
    fn from_word(word: String) -> Token {
        if word.eq_ignore_ascii_case("and") || word == "&&" {
            Token::And
        } else if word.eq_ignore_ascii_case("or") || word == "||" {
            Token::Or
        } else if word.eq_ignore_ascii_case("not") || word == "!" {
            Token::Not
        } else {
            Token::Term(word)
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Phrase(text) => write!(f, "\"{text}\""),
            Token::Term(text) => write!(f, "{text}"),
        }
    }
}

/// Split a query string into tokens.
///
/// Lexing never fails: an unterminated quote swallows the rest of the input
/// as the phrase text.
pub fn tokenize(query: &str) -> Vec<Token> {
    Lexer::new(query).collect()
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(query: &'a str) -> Self {
        Lexer {
            chars: query.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn read_phrase(&mut self) -> Token {
        // Opening quote already consumed.
        let mut phrase = String::new();
        for ch in self.chars.by_ref() {
            if ch == '"' {
                break;
            }
            phrase.push(ch);
        }
        Token::Phrase(phrase)
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"') {
                break;
            }
            word.push(ch);
            self.chars.next();
        }
        Token::from_word(word)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_whitespace();

        match *self.chars.peek()? {
            '(' => {
                self.chars.next();
                Some(Token::LParen)
            }
            ')' => {
                self.chars.next();
                Some(Token::RParen)
            }
            '"' => {
                self.chars.next();
                Some(self.read_phrase())
            }
            _ => Some(self.read_word()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(text: &str) -> Token {
        Token::Term(text.to_string())
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(tokenize("France Germany"), vec![term("France"), term("Germany")]);
    }

    #[test]
    fn test_operators_any_case() {
        assert_eq!(
            tokenize("a AND b or c Not d"),
            vec![
                term("a"),
                Token::And,
                term("b"),
                Token::Or,
                term("c"),
                Token::Not,
                term("d"),
            ]
        );
    }

    #[test]
    fn test_symbolic_operators() {
        assert_eq!(
            tokenize("a && b || ! c"),
            vec![term("a"), Token::And, term("b"), Token::Or, Token::Not, term("c")]
        );
    }

    #[test]
    fn test_operator_lookalikes_are_terms() {
        assert_eq!(tokenize("ANDREW oregon"), vec![term("ANDREW"), term("oregon")]);
    }

    #[test]
    fn test_parentheses_split_without_whitespace() {
        assert_eq!(
            tokenize("(BBC OR Sky)AND dinner"),
            vec![
                Token::LParen,
                term("BBC"),
                Token::Or,
                term("Sky"),
                Token::RParen,
                Token::And,
                term("dinner"),
            ]
        );
    }

    #[test]
    fn test_phrase_preserves_whitespace() {
        assert_eq!(
            tokenize("\"dinner  party\" wine"),
            vec![Token::Phrase("dinner  party".to_string()), term("wine")]
        );
    }

    #[test]
    fn test_unterminated_phrase_takes_rest() {
        assert_eq!(
            tokenize("gift \"big oil AND (gas"),
            vec![term("gift"), Token::Phrase("big oil AND (gas".to_string())]
        );
    }

    #[test]
    fn test_quote_ends_bare_word() {
        assert_eq!(
            tokenize("wine\"red\""),
            vec![term("wine"), Token::Phrase("red".to_string())]
        );
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }
}
