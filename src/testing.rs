use crate::ast::Node;
use crate::parse;

/// Parses source text into a lowered script for unit tests.
pub(crate) fn parse_helper(name: &str, contents: &str) -> Node {
    parse::parse_source(name, contents).expect("error parsing")
}
