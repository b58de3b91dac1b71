//! Query parser for converting query strings into boolean expression trees.
//!
//! Supported syntax:
//! - Terms: `France`
//! - Phrases: `"dinner party"`
//! - Operators: `AND`, `OR`, `NOT` in any case, or `&&`, `||`, `!`
//! - Grouping: `(BBC OR Sky) AND dinner`
//! - Implicit AND: `France Germany` means `France AND Germany`
//!
//! Precedence from loosest to tightest is `OR`, `AND`, `NOT`, then
//! parenthesised groups and leaves. `NOT` applies to the single operand
//! that follows it.

use log::debug;
use thiserror::Error;

use crate::query::expr::Expr;
use crate::query::token::{Token, tokenize};

/// Default limit on nesting of groups, `NOT` and balanced operator chains.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Reasons a query string is rejected.
///
/// Unknown words are never an error; any word is a valid term.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A `(` was never closed.
    #[error("unbalanced parentheses: missing closing ')'")]
    UnbalancedOpen,

    /// A `)` appeared without a matching `(`.
    #[error("unbalanced parentheses: unexpected ')'")]
    UnbalancedClose,

    /// An operator is missing its left or right operand, e.g. `dinner AND`.
    #[error("operator {operator} is missing an operand")]
    MissingOperand { operator: &'static str },

    /// Nesting went deeper than the parser allows.
    #[error("query nesting exceeds the limit of {limit}")]
    TooDeep { limit: usize },
}

/// Boolean query parser.
#[derive(Debug, Clone)]
pub struct QueryParser {
    /// Maximum nesting of groups, negations and operator chains.
    max_depth: usize,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryParser {
    /// Create a parser with the default nesting limit.
    pub fn new() -> Self {
        QueryParser {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Get the maximum nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse a query string into an expression tree.
    ///
    /// An empty or whitespace-only query yields [`Expr::MatchAll`].
    pub fn parse(&self, query_str: &str) -> Result<Expr, SyntaxError> {
        let tokens = tokenize(query_str);
        if tokens.is_empty() {
            return Ok(Expr::MatchAll);
        }

        let expr = TokenParser::new(&tokens, self.max_depth).parse()?;
        debug!("Parsed query {query_str:?} as {expr}");
        Ok(expr)
    }
}

/// Builder for creating query parsers.
#[derive(Debug)]
pub struct QueryParserBuilder {
    max_depth: usize,
}

impl QueryParserBuilder {
    pub fn new() -> Self {
        QueryParserBuilder {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the query parser.
    pub fn build(self) -> QueryParser {
        QueryParser {
            max_depth: self.max_depth,
        }
    }
}

impl Default for QueryParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive-descent parser over a token slice.
struct TokenParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> TokenParser<'a> {
    fn new(tokens: &'a [Token], max_depth: usize) -> Self {
        TokenParser {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn parse(mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_or_expression()?;

        match self.peek() {
            None => Ok(expr),
            Some(Token::RParen) => Err(SyntaxError::UnbalancedClose),
            Some(token) => Err(SyntaxError::MissingOperand {
                operator: operator_name(token),
            }),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    /// Fail unless the next token can start an operand for `operator`.
    fn expect_operand(&self, operator: &'static str) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(token) if token.starts_operand() => Ok(()),
            _ => Err(SyntaxError::MissingOperand { operator }),
        }
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or_expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut operands = vec![self.parse_and_expression()?];

        while self.peek() == Some(&Token::Or) {
            self.advance();
            self.expect_operand("OR")?;
            operands.push(self.parse_and_expression()?);
        }

        self.fold(operands, Expr::or)
    }

    fn parse_and_expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut operands = vec![self.parse_not_expression()?];

        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.advance();
                    self.expect_operand("AND")?;
                }
                // Adjacent operands are an implicit AND.
                Some(token) if token.starts_operand() => {}
                _ => break,
            }

            operands.push(self.parse_not_expression()?);
        }

        self.fold(operands, Expr::and)
    }

    /// Combine the operands of one operator chain into a balanced tree.
    ///
    /// Operands are paired left to right level by level, so evaluation order
    /// is unchanged and the tree grows by `ceil(log2 n)` levels. That height
    /// counts toward the nesting limit.
    fn fold(
        &self,
        mut operands: Vec<Expr>,
        combine: fn(Expr, Expr) -> Expr,
    ) -> Result<Expr, SyntaxError> {
        let height = chain_height(operands.len());
        if self.depth + height > self.max_depth {
            return Err(SyntaxError::TooDeep {
                limit: self.max_depth,
            });
        }

        while operands.len() > 1 {
            let mut paired = Vec::with_capacity(operands.len().div_ceil(2));
            let mut iter = operands.into_iter();
            while let Some(left) = iter.next() {
                paired.push(match iter.next() {
                    Some(right) => combine(left, right),
                    None => left,
                });
            }
            operands = paired;
        }

        // Callers always pass at least one operand.
        Ok(operands.swap_remove(0))
    }

    fn parse_not_expression(&mut self) -> Result<Expr, SyntaxError> {
        if self.peek() != Some(&Token::Not) {
            return self.parse_primary();
        }

        self.advance();
        self.expect_operand("NOT")?;
        self.enter()?;
        let inner = self.parse_not_expression()?;
        self.leave();
        Ok(Expr::not(inner))
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.advance() {
            Some(Token::Term(text)) => Ok(Expr::term(text.as_str())),
            Some(Token::Phrase(text)) if text.is_empty() => Ok(Expr::MatchAll),
            Some(Token::Phrase(text)) => Ok(Expr::phrase(text.as_str())),
            Some(Token::LParen) => self.parse_group(),
            Some(Token::RParen) => Err(SyntaxError::UnbalancedClose),
            Some(token) => Err(SyntaxError::MissingOperand {
                operator: operator_name(token),
            }),
            None => Err(SyntaxError::UnbalancedOpen),
        }
    }

    fn parse_group(&mut self) -> Result<Expr, SyntaxError> {
        // Opening parenthesis already consumed.
        self.enter()?;

        let inner = match self.peek() {
            None => return Err(SyntaxError::UnbalancedOpen),
            Some(Token::RParen) => Expr::MatchAll,
            Some(_) => self.parse_or_expression()?,
        };

        match self.advance() {
            Some(Token::RParen) => {
                self.leave();
                Ok(inner)
            }
            _ => Err(SyntaxError::UnbalancedOpen),
        }
    }
}

/// Levels added by balancing a chain of `len` operands.
fn chain_height(len: usize) -> usize {
    if len <= 1 {
        0
    } else {
        (usize::BITS - (len - 1).leading_zeros()) as usize
    }
}

fn operator_name(token: &Token) -> &'static str {
    match token {
        Token::And => "AND",
        Token::Or => "OR",
        Token::Not => "NOT",
        Token::LParen => "(",
        Token::RParen => ")",
        Token::Phrase(_) | Token::Term(_) => "operand",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<Expr, SyntaxError> {
        QueryParser::new().parse(query)
    }

    fn term(text: &str) -> Expr {
        Expr::term(text)
    }

    #[test]
    fn test_query_parser_creation() {
        let parser = QueryParser::new();
        assert_eq!(parser.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_query_parser_builder() {
        let parser = QueryParserBuilder::new().max_depth(8).build();
        assert_eq!(parser.max_depth(), 8);
    }

    #[test]
    fn test_parse_simple_term() {
        assert_eq!(parse("shell").unwrap(), term("shell"));
    }

    #[test]
    fn test_parse_preserves_case() {
        assert_eq!(parse("UAE").unwrap(), term("UAE"));
        assert_eq!(parse("\"Financial Times\"").unwrap(), Expr::phrase("Financial Times"));
    }

    #[test]
    fn test_parse_empty_query() {
        assert_eq!(parse("").unwrap(), Expr::MatchAll);
        assert_eq!(parse("   ").unwrap(), Expr::MatchAll);
    }

    #[test]
    fn test_parse_boolean_and() {
        assert_eq!(
            parse("shell AND bp").unwrap(),
            Expr::and(term("shell"), term("bp"))
        );
    }

    #[test]
    fn test_parse_boolean_or() {
        assert_eq!(parse("shell or bp").unwrap(), Expr::or(term("shell"), term("bp")));
    }

    #[test]
    fn test_implicit_and() {
        assert_eq!(parse("France Germany").unwrap(), parse("France AND Germany").unwrap());
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            parse("a OR b AND c").unwrap(),
            Expr::or(term("a"), Expr::and(term("b"), term("c")))
        );
        assert_eq!(
            parse("a AND b OR c").unwrap(),
            Expr::or(Expr::and(term("a"), term("b")), term("c"))
        );
    }

    #[test]
    fn test_not_binds_to_single_operand() {
        assert_eq!(
            parse("NOT a AND b").unwrap(),
            Expr::and(Expr::not(term("a")), term("b"))
        );
    }

    #[test]
    fn test_infix_not_is_and_not() {
        assert_eq!(
            parse("shell NOT gas").unwrap(),
            Expr::and(term("shell"), Expr::not(term("gas")))
        );
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(parse("NOT NOT a").unwrap(), Expr::not(Expr::not(term("a"))));
    }

    #[test]
    fn test_chains_fold_into_balanced_tree() {
        assert_eq!(
            parse("a OR b OR c").unwrap(),
            Expr::or(Expr::or(term("a"), term("b")), term("c"))
        );
        assert_eq!(
            parse("a b c d").unwrap(),
            Expr::and(
                Expr::and(term("a"), term("b")),
                Expr::and(term("c"), term("d"))
            )
        );
    }

    #[test]
    fn test_chain_height() {
        assert_eq!(chain_height(1), 0);
        assert_eq!(chain_height(2), 1);
        assert_eq!(chain_height(3), 2);
        assert_eq!(chain_height(4), 2);
        assert_eq!(chain_height(5), 3);
        assert_eq!(chain_height(200_000), 18);
    }

    #[test]
    fn test_long_flat_chains_stay_shallow() {
        let implicit_and = parse(&"dinner ".repeat(200_000)).unwrap();
        assert_eq!(implicit_and.depth(), 19);

        let or_chain = parse(&("a OR ".repeat(20_000) + "a")).unwrap();
        assert_eq!(or_chain.depth(), 16);
        assert!(or_chain.to_string().starts_with("((((("));
    }

    #[test]
    fn test_chain_height_counts_toward_limit() {
        let parser = QueryParser::new().with_max_depth(3);
        assert!(parser.parse("a b c d e f g h").is_ok());
        assert_eq!(
            parser.parse("a b c d e f g h i"),
            Err(SyntaxError::TooDeep { limit: 3 })
        );
        assert_eq!(
            parser.parse("((a OR b OR c))"),
            Err(SyntaxError::TooDeep { limit: 3 })
        );
    }

    #[test]
    fn test_parenthesised_group() {
        assert_eq!(
            parse("(shell OR bp) AND energy").unwrap(),
            Expr::and(Expr::or(term("shell"), term("bp")), term("energy"))
        );
    }

    #[test]
    fn test_redundant_parentheses() {
        assert_eq!(parse("((a))").unwrap(), term("a"));
        assert_eq!(parse("((a OR b))").unwrap(), parse("a OR b").unwrap());
    }

    #[test]
    fn test_empty_group_and_phrase_match_all() {
        assert_eq!(parse("()").unwrap(), Expr::MatchAll);
        assert_eq!(parse("\"\"").unwrap(), Expr::MatchAll);
        assert_eq!(parse("a ()").unwrap(), Expr::and(term("a"), Expr::MatchAll));
    }

    #[test]
    fn test_unterminated_phrase_is_lenient() {
        assert_eq!(parse("\"dinner party").unwrap(), Expr::phrase("dinner party"));
    }

    #[test]
    fn test_dangling_operator() {
        assert_eq!(
            parse("dinner AND"),
            Err(SyntaxError::MissingOperand { operator: "AND" })
        );
        assert_eq!(
            parse("dinner OR"),
            Err(SyntaxError::MissingOperand { operator: "OR" })
        );
        assert_eq!(parse("NOT"), Err(SyntaxError::MissingOperand { operator: "NOT" }));
        assert_eq!(
            parse("a AND OR b"),
            Err(SyntaxError::MissingOperand { operator: "AND" })
        );
        assert_eq!(
            parse("(a OR) b"),
            Err(SyntaxError::MissingOperand { operator: "OR" })
        );
    }

    #[test]
    fn test_leading_operator() {
        assert_eq!(
            parse("AND dinner"),
            Err(SyntaxError::MissingOperand { operator: "AND" })
        );
        assert_eq!(
            parse("(OR a)"),
            Err(SyntaxError::MissingOperand { operator: "OR" })
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(parse("NOT (a AND b"), Err(SyntaxError::UnbalancedOpen));
        assert_eq!(parse("("), Err(SyntaxError::UnbalancedOpen));
        assert_eq!(parse("(a))"), Err(SyntaxError::UnbalancedClose));
        assert_eq!(parse(") a"), Err(SyntaxError::UnbalancedClose));
    }

    #[test]
    fn test_nesting_limit() {
        let parser = QueryParser::new().with_max_depth(3);
        assert!(parser.parse("(((a)))").is_ok());
        assert_eq!(
            parser.parse("((((a))))"),
            Err(SyntaxError::TooDeep { limit: 3 })
        );
        assert_eq!(
            parser.parse("NOT NOT NOT NOT a"),
            Err(SyntaxError::TooDeep { limit: 3 })
        );
    }

    #[test]
    fn test_deep_nesting_rejected_by_default() {
        let query = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            parse(&query),
            Err(SyntaxError::TooDeep {
                limit: DEFAULT_MAX_DEPTH
            })
        );
    }

    #[test]
    fn test_display_round_trip() {
        for query in [
            "(shell OR bp) AND (energy OR gas)",
            "NOT (a AND \"big oil\") b",
            "a OR b AND NOT c",
            "x ()",
        ] {
            let expr = parse(query).unwrap();
            assert_eq!(parse(&expr.to_string()).unwrap(), expr, "query: {query}");
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let query = "(UAE OR Qatar) \"state visit\" NOT dinner";
        assert_eq!(parse(query).unwrap(), parse(query).unwrap());
    }

    #[test]
    fn test_syntax_error_messages() {
        assert_eq!(
            SyntaxError::MissingOperand { operator: "AND" }.to_string(),
            "operator AND is missing an operand"
        );
        assert!(SyntaxError::UnbalancedOpen.to_string().contains("')'"));
    }
}
