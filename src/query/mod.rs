//! Boolean query language: lexing, parsing and evaluation.

pub mod expr;
pub mod matcher;
pub mod parser;
pub mod token;

pub use self::expr::Expr;
pub use self::matcher::{MatchMode, Matcher, evaluate};
pub use self::parser::{DEFAULT_MAX_DEPTH, QueryParser, QueryParserBuilder, SyntaxError};
pub use self::token::{Token, tokenize};

/// Parse a query string with the default parser settings.
pub fn parse(query: &str) -> Result<Expr, SyntaxError> {
    QueryParser::new().parse(query)
}
