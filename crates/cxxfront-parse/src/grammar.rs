//! Recursive descent over the token stream.
//!
//! Every rule returns `Option`: `None` is a parse failure and the
//! caller decides whether to fail too, rewind to a checkpoint, or
//! recover. Rules that can succeed without producing a node return
//! `Option<Option<NodeId>>`.

use cxxfront_encoding::EncodingBuf;
use cxxfront_ptree::{NodeId, NodeKind};
use cxxfront_tokenizer::TokenKind::*;

use crate::parser::Parser;

mod decls;
mod exprs;
mod names;
mod stmts;

fn list2(p: &mut Parser, a: Option<NodeId>, b: Option<NodeId>) -> NodeId {
    let tail = p.ptree.cons(b, None);
    p.ptree.cons(a, Some(tail))
}

fn list3(p: &mut Parser, a: Option<NodeId>, b: Option<NodeId>, c: Option<NodeId>) -> NodeId {
    let tail = list2(p, b, c);
    p.ptree.cons(a, Some(tail))
}

/// translation.unit : definition* EOF
///
/// A failed definition is reported and recovery skips to the next
/// `;`. Returns `None` once the error ceiling is hit.
pub(crate) fn translation_unit(p: &mut Parser) -> Option<NodeId> {
    let mut statements: Option<NodeId> = None;
    while !p.at(EOF) {
        if let Some(def) = definition(p) {
            statements = p.ptree.snoc(statements, Some(def));
        } else {
            if !p.mark_error() {
                return None;
            }
            p.skip_to(SEMICOLON);
            p.advance();
        }
    }
    // Trailing comments ride along on the last definition.
    if let Some(last) = p.ptree.last(statements) {
        let comments = p.wrap_comments();
        p.ptree.nconc(Some(last), comments);
    }
    statements
}

/*
  definition
  : null.declaration
  | typedef
  | template.decl
  | linkage.spec
  | namespace.spec
  | namespace.alias
  | using.declaration
  | extern.template.decl
  | declaration
*/
fn definition(p: &mut Parser) -> Option<NodeId> {
    let t = p.peek(0);
    let def = if t == SEMICOLON {
        null_declaration(p)
    } else if t == TYPEDEF_KW {
        decls::typedef_(p)
    } else if t == TEMPLATE_KW {
        decls::template_decl(p)
    } else if t == EXTERN_KW && p.peek(1) == STRING_LITERAL {
        decls::linkage_spec(p)
    } else if t == EXTERN_KW && p.peek(1) == TEMPLATE_KW {
        decls::extern_template_decl(p)
    } else if t == NAMESPACE_KW && p.peek(2) == EQ {
        decls::namespace_alias(p)
    } else if t == NAMESPACE_KW {
        decls::namespace_spec(p)
    } else if t == USING_KW {
        decls::using_(p)
    } else {
        let decl = decls::declaration(p)?;
        let comments = p.wrap_comments();
        p.set_declarator_comments(Some(decl), comments);
        return Some(decl);
    };
    p.discard_comments();
    def
}

pub(crate) fn null_declaration(p: &mut Parser) -> Option<NodeId> {
    let semicolon = p.take(SEMICOLON)?;
    let tail = p.ptree.list(&[None, Some(semicolon)]);
    Some(p.ptree.composite(NodeKind::DECLARATION, None, tail))
}

/*
  type.specifier
  : {cv.qualify} (integral.or.class.spec | name) {cv.qualify}
*/
pub(crate) fn type_specifier(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let cv_q = decls::opt_cv_qualify(p);
    let tspec = match decls::opt_integral_type_or_class_spec(p, encode)? {
        Some(tspec) => tspec,
        None => names::name(p, encode)?,
    };
    let cv_q2 = decls::opt_cv_qualify(p);
    let tspec = decls::merge_cv(p, cv_q, tspec, cv_q2);
    p.encode_cv(encode, cv_q, cv_q2);
    Some(tspec)
}

/// Whether the next token could start a type specifier.
pub(crate) fn is_type_specifier(p: &Parser) -> bool {
    let t = p.peek(0);
    t == IDENTIFIER
        || t == SCOPE
        || t == CONST_KW
        || t == VOLATILE_KW
        || t.is_integral_type()
        || t == CLASS_KW
        || t == STRUCT_KW
        || t == UNION_KW
        || t == ENUM_KW
}
