//! The statement grammar.

use cxxfront_encoding::EncodingBuf;
use cxxfront_ptree::{NodeId, NodeKind};
use cxxfront_tokenizer::TokenKind::*;

use crate::grammar::{decls, exprs, list2, list3, names};
use crate::parser::Parser;

/*
  condition
  : comma.expression
  | declarator.with.init

  Condition is used inside if, switch statements where a declarator can be
  used if it is initialised.
*/
fn condition(p: &mut Parser) -> Option<NodeId> {
    // Do the declarator first, otherwise "T*foo = blah" gets matched as a
    // multiplication inside an assignment expression.
    let checkpoint = p.mark();
    'decl: {
        let mut type_encode = EncodingBuf::new();
        let head = decls::opt_storage_spec(p);
        let cv_q = decls::opt_cv_qualify(p);
        let Some(integral) = decls::opt_integral_type_or_class_spec(p, &mut type_encode) else {
            break 'decl;
        };
        let type_name = match integral {
            Some(integral) => integral,
            None => match names::name(p, &mut type_encode) {
                Some(name) => name,
                None => break 'decl,
            },
        };
        let cv_q2 = decls::opt_cv_qualify(p);
        let type_name = decls::merge_cv(p, cv_q, type_name, cv_q2);
        p.encode_cv(&mut type_encode, cv_q, cv_q2);
        let Some(decl) = decls::declarator_with_init(p, &mut type_encode, true, false) else {
            break 'decl;
        };
        // must be the end of the condition, which sits in a () pair
        if !p.at(RIGHT_PAREN) {
            break 'decl;
        }
        let tail = list2(p, Some(type_name), Some(decl));
        return Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)));
    }
    p.reset(checkpoint);
    exprs::comma_expression(p)
}

/*
  compound.statement
  : '{' (statement)* '}'
*/
pub(crate) fn compound_statement(p: &mut Parser) -> Option<NodeId> {
    let open = p.take(LEFT_BRACE)?;
    let comments = p.wrap_comments();
    p.ptree.set_comments(open, comments);

    let mut sts: Option<NodeId> = None;
    while !p.at(RIGHT_BRACE) {
        match statement(p) {
            Some(st) => sts = p.ptree.snoc(sts, Some(st)),
            None => {
                if !p.mark_error() {
                    return None;
                }
                p.skip_to(RIGHT_BRACE);
                let close = p.take(RIGHT_BRACE).unwrap_or_else(|| p.bump_leaf());
                let tail = list2(p, None, Some(close));
                return Some(p.ptree.composite(NodeKind::BLOCK, Some(open), Some(tail)));
            }
        }
    }
    let close = p.bump_leaf();
    let comments = p.wrap_comments();
    p.ptree.set_comments(close, comments);
    let tail = list2(p, sts, Some(close));
    Some(p.ptree.composite(NodeKind::BLOCK, Some(open), Some(tail)))
}

/*
  statement
  : compound.statement
  | typedef
  | if.statement
  | switch.statement
  | while.statement
  | do.statement
  | for.statement
  | try.statement
  | BREAK ';'
  | CONTINUE ';'
  | RETURN { comma.expression } ';'
  | GOTO Identifier ';'
  | CASE expression ':' statement
  | DEFAULT ':' statement
  | Identifier ':' statement
  | expr.statement
*/
fn statement(p: &mut Parser) -> Option<NodeId> {
    // Take the comments up front; if the switch below fails it is a
    // parse error anyway.
    let comments = p.wrap_comments();

    let k = p.peek(0);
    let st = match k {
        LEFT_BRACE => compound_statement(p)?,
        USING_KW => decls::using_(p)?,
        TYPEDEF_KW => decls::typedef_(p)?,
        IF_KW => if_statement(p)?,
        SWITCH_KW => switch_statement(p)?,
        WHILE_KW => while_statement(p)?,
        DO_KW => do_statement(p)?,
        FOR_KW => for_statement(p)?,
        TRY_KW => try_statement(p)?,
        BREAK_KW | CONTINUE_KW => {
            let keyword = p.bump_leaf();
            let semicolon = p.take(SEMICOLON)?;
            let tail = p.ptree.cons(Some(semicolon), None);
            let kind = if k == BREAK_KW {
                NodeKind::BREAK_STATEMENT
            } else {
                NodeKind::CONTINUE_STATEMENT
            };
            p.ptree.composite(kind, Some(keyword), Some(tail))
        }
        RETURN_KW => {
            let keyword = p.bump_leaf();
            let tail = if p.at(SEMICOLON) {
                let semicolon = p.bump_leaf();
                p.ptree.cons(Some(semicolon), None)
            } else {
                let exp = exprs::comma_expression(p)?;
                let semicolon = p.take(SEMICOLON)?;
                list2(p, Some(exp), Some(semicolon))
            };
            p.ptree.composite(NodeKind::RETURN_STATEMENT, Some(keyword), Some(tail))
        }
        GOTO_KW => {
            let keyword = p.bump_leaf();
            let label = p.take(IDENTIFIER)?;
            let semicolon = p.take(SEMICOLON)?;
            let tail = list2(p, Some(label), Some(semicolon));
            p.ptree.composite(NodeKind::GOTO_STATEMENT, Some(keyword), Some(tail))
        }
        CASE_KW => {
            let keyword = p.bump_leaf();
            let exp = exprs::expression(p)?;
            let colon = p.take(COLON)?;
            let body = statement(p)?;
            let tail = list3(p, Some(exp), Some(colon), Some(body));
            p.ptree.composite(NodeKind::CASE_STATEMENT, Some(keyword), Some(tail))
        }
        DEFAULT_KW => {
            let keyword = p.bump_leaf();
            let colon = p.take(COLON)?;
            let body = statement(p)?;
            let tail = list2(p, Some(colon), Some(body));
            p.ptree.composite(NodeKind::DEFAULT_STATEMENT, Some(keyword), Some(tail))
        }
        IDENTIFIER if p.peek(1) == COLON => {
            // a label statement
            let label = p.bump_leaf();
            let colon = p.bump_leaf();
            let body = statement(p)?;
            let tail = list2(p, Some(colon), Some(body));
            return Some(p.ptree.composite(NodeKind::LABEL_STATEMENT, Some(label), Some(tail)));
        }
        _ => expr_statement(p)?,
    };

    // No parse error, attach the comments to whatever was returned.
    p.set_leaf_comments(Some(st), comments);
    Some(st)
}

/*
  if.statement
  : IF '(' declaration.statement ')' statement { ELSE statement }
  : IF '(' comma.expression ')' statement { ELSE statement }
*/
fn if_statement(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(IF_KW)?;
    let open = p.take(LEFT_PAREN)?;
    let exp = condition(p)?;
    let close = p.take(RIGHT_PAREN)?;
    let then = statement(p)?;
    let tail = p.ptree.list(&[Some(open), Some(exp), Some(close), Some(then)]);
    let mut st = p.ptree.composite(NodeKind::IF_STATEMENT, Some(keyword), tail);
    if p.at(ELSE_KW) {
        let else_kw = p.bump_leaf();
        let otherwise = statement(p)?;
        let tail = list2(p, Some(else_kw), Some(otherwise));
        st = p.ptree.nconc(Some(st), Some(tail))?;
    }
    Some(st)
}

/*
  switch.statement
  : SWITCH '(' comma.expression ')' statement
*/
fn switch_statement(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(SWITCH_KW)?;
    let open = p.take(LEFT_PAREN)?;
    let exp = condition(p)?;
    let close = p.take(RIGHT_PAREN)?;
    let body = statement(p)?;
    let tail = p.ptree.list(&[Some(open), Some(exp), Some(close), Some(body)]);
    Some(p.ptree.composite(NodeKind::SWITCH_STATEMENT, Some(keyword), tail))
}

/*
  while.statement
  : WHILE '(' comma.expression ')' statement
*/
fn while_statement(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(WHILE_KW)?;
    let open = p.take(LEFT_PAREN)?;
    let exp = exprs::comma_expression(p)?;
    let close = p.take(RIGHT_PAREN)?;
    let body = statement(p)?;
    let tail = p.ptree.list(&[Some(open), Some(exp), Some(close), Some(body)]);
    Some(p.ptree.composite(NodeKind::WHILE_STATEMENT, Some(keyword), tail))
}

/*
  do.statement
  : DO statement WHILE '(' comma.expression ')' ';'
*/
fn do_statement(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(DO_KW)?;
    let body = statement(p)?;
    let while_kw = p.take(WHILE_KW)?;
    let open = p.take(LEFT_PAREN)?;
    let exp = exprs::comma_expression(p)?;
    let close = p.take(RIGHT_PAREN)?;
    let semicolon = p.take(SEMICOLON)?;
    let tail = p.ptree.list(&[
        Some(body),
        Some(while_kw),
        Some(open),
        Some(exp),
        Some(close),
        Some(semicolon),
    ]);
    Some(p.ptree.composite(NodeKind::DO_STATEMENT, Some(keyword), tail))
}

/*
  for.statement
  : FOR '(' expr.statement {comma.expression} ';' {comma.expression} ')'
    statement
*/
fn for_statement(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(FOR_KW)?;
    let open = p.take(LEFT_PAREN)?;
    let init = expr_statement(p)?;
    let cond = if p.at(SEMICOLON) { None } else { Some(exprs::comma_expression(p)?) };
    let semicolon = p.take(SEMICOLON)?;
    let step = if p.at(RIGHT_PAREN) { None } else { Some(exprs::comma_expression(p)?) };
    let close = p.take(RIGHT_PAREN)?;
    let body = statement(p)?;
    let tail = p.ptree.list(&[
        Some(open),
        Some(init),
        cond,
        Some(semicolon),
        step,
        Some(close),
        Some(body),
    ]);
    Some(p.ptree.composite(NodeKind::FOR_STATEMENT, Some(keyword), tail))
}

/*
  try.statement
  : TRY compound.statement (exception.handler)+ ';'

  exception.handler
  : CATCH '(' (arg.declaration | Ellipsis) ')' compound.statement
*/
fn try_statement(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(TRY_KW)?;
    let body = compound_statement(p)?;
    let tail = p.ptree.cons(Some(body), None);
    let mut st = p.ptree.composite(NodeKind::TRY_STATEMENT, Some(keyword), Some(tail));

    loop {
        let catch = p.take(CATCH_KW)?;
        let open = p.take(LEFT_PAREN)?;
        let handler = if p.at(ELLIPSIS) {
            p.bump_leaf()
        } else {
            let mut encode = EncodingBuf::new();
            decls::arg_declaration(p, &mut encode)?
        };
        let close = p.take(RIGHT_PAREN)?;
        let body = compound_statement(p)?;
        let clause =
            p.ptree.list(&[Some(catch), Some(open), Some(handler), Some(close), Some(body)]);
        st = p.ptree.snoc(Some(st), clause)?;
        if !p.at(CATCH_KW) {
            return Some(st);
        }
    }
}

/*
  expr.statement
  : ';'
  | declaration.statement
  | comma.expression ';'
*/
fn expr_statement(p: &mut Parser) -> Option<NodeId> {
    if p.at(SEMICOLON) {
        let semicolon = p.bump_leaf();
        let tail = p.ptree.cons(Some(semicolon), None);
        return Some(p.ptree.composite(NodeKind::EXPR_STATEMENT, None, Some(tail)));
    }
    let checkpoint = p.mark();
    if let Some(decl) = declaration_statement(p) {
        return Some(decl);
    }
    p.reset(checkpoint);
    let exp = exprs::comma_expression(p)?;
    let semicolon = p.take(SEMICOLON)?;
    let tail = p.ptree.cons(Some(semicolon), None);
    Some(p.ptree.composite(NodeKind::EXPR_STATEMENT, Some(exp), Some(tail)))
}

/*
  declaration.statement
  : decl.head integral.or.class.spec {cv.qualify} {declarators} ';'
  | decl.head name {cv.qualify} declarators ';'
  | const.declaration

  decl.head
  : {storage.spec} {cv.qualify}

  const.declaration
  : cv.qualify {'*'} Identifier '=' expression {',' declarators} ';'
*/
fn declaration_statement(p: &mut Parser) -> Option<NodeId> {
    let storage_s = decls::opt_storage_spec(p);
    let cv_q = decls::opt_cv_qualify(p);
    let mut type_encode = EncodingBuf::new();
    let integral = decls::opt_integral_type_or_class_spec(p, &mut type_encode)?;

    let head = storage_s.map(|storage| p.ptree.cons(Some(storage), None));

    match integral {
        Some(integral) => integral_decl_statement(p, &mut type_encode, integral, cv_q, head),
        None => {
            type_encode.clear();
            let t = p.peek(0);
            if cv_q.is_some() && ((t == IDENTIFIER && p.peek(1) == EQ) || t == STAR) {
                decls::const_declaration(p, head, cv_q)
            } else {
                other_decl_statement(p, &mut type_encode, cv_q, head)
            }
        }
    }
}

/*
  integral.decl.statement
  : decl.head integral.or.class.spec {cv.qualify} {declarators} ';'
*/
fn integral_decl_statement(
    p: &mut Parser,
    type_encode: &mut EncodingBuf,
    integral: NodeId,
    cv_q: Option<NodeId>,
    head: Option<NodeId>,
) -> Option<NodeId> {
    let cv_q2 = decls::opt_cv_qualify(p);
    let integral = decls::merge_cv(p, cv_q, integral, cv_q2);
    p.encode_cv(type_encode, cv_q, cv_q2);
    if p.at(SEMICOLON) {
        let semicolon = p.bump_leaf();
        let tail = list2(p, Some(integral), Some(semicolon));
        return Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)));
    }
    let decl = decls::declarators(p, type_encode, false, true)?;
    let semicolon = p.take(SEMICOLON)?;
    let tail = list3(p, Some(integral), Some(decl), Some(semicolon));
    Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)))
}

/*
  other.decl.statement
  : decl.head name {cv.qualify} declarators ';'
*/
fn other_decl_statement(
    p: &mut Parser,
    type_encode: &mut EncodingBuf,
    cv_q: Option<NodeId>,
    head: Option<NodeId>,
) -> Option<NodeId> {
    // `a < b, c > d;` is a comma expression of relationals, not a
    // declaration with a template-id type. At statement scope the
    // template reading wins only when the angle brackets scan like an
    // argument list, as in expression contexts.
    if p.at(IDENTIFIER) && p.peek(1) == LESS {
        let checkpoint = p.mark();
        p.advance();
        let template = names::is_template_args(p);
        p.reset(checkpoint);
        if !template {
            return None;
        }
    }
    let type_name = names::name(p, type_encode)?;
    let cv_q2 = decls::opt_cv_qualify(p);
    let type_name = decls::merge_cv(p, cv_q, type_name, cv_q2);
    p.encode_cv(type_encode, cv_q, cv_q2);
    let decl = decls::declarators(p, type_encode, false, true)?;
    let semicolon = p.take(SEMICOLON)?;
    let tail = list3(p, Some(type_name), Some(decl), Some(semicolon));
    Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)))
}
