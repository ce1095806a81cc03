//! A backtracking recursive descent parser for a large subset of C++.
//!
//! Parsing never aborts on the first error: failed toplevel
//! definitions and statements are reported and skipped, up to the
//! error ceiling. The result is a parse tree plus the encoded types
//! and names attached to its declarator and name nodes.

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

use cxxfront_errors::Reporter;
use cxxfront_ptree::{NodeId, Ptree};
pub use cxxfront_tokenizer::RuleSet;

use crate::parser::Parser;

/// The outcome of parsing one translation unit.
pub struct Parse {
    pub ptree: Ptree,
    /// The list of toplevel definitions, `None` for an empty unit or
    /// when parsing gave up.
    pub unit: Option<NodeId>,
}

pub fn translation_unit(text: &str, rules: RuleSet, reporter: &mut dyn Reporter) -> Parse {
    let mut parser = Parser::new(text, rules, reporter);
    let unit = grammar::translation_unit(&mut parser);
    Parse { ptree: parser.into_ptree(), unit }
}
