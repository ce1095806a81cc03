//! The expression grammar, one rule per precedence level.
//!
//! The `temp_args` flag threads down to the relational level: inside
//! template arguments a bare `>` closes the list instead of acting as
//! an operator.

use cxxfront_encoding::EncodingBuf;
use cxxfront_ptree::{NodeId, NodeKind};
use cxxfront_tokenizer::TokenKind::*;

use crate::grammar::{decls, is_type_specifier, list2, list3, names, type_specifier};
use crate::parser::Parser;

/*
  comma.expression
  : expression
  | comma.expression ',' expression
*/
pub(crate) fn comma_expression(p: &mut Parser) -> Option<NodeId> {
    let mut exp = expression(p)?;
    while p.at(COMMA) {
        let comma = p.bump_leaf();
        let right = expression(p)?;
        let tail = list2(p, Some(comma), Some(right));
        exp = p.ptree.composite(NodeKind::COMMA_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

/*
  expression
  : conditional.expr {(AssignOp | '=') expression}	right-to-left
*/
pub(crate) fn expression(p: &mut Parser) -> Option<NodeId> {
    let left = conditional_expr(p, false)?;
    if !matches!(p.peek(0), EQ | ASSIGN_OP) {
        return Some(left);
    }
    let op = p.bump_leaf();
    let right = expression(p)?;
    let tail = list2(p, Some(op), Some(right));
    Some(p.ptree.composite(NodeKind::ASSIGN_EXPR, Some(left), Some(tail)))
}

/*
  conditional.expr
  : logical.or.expr {'?' comma.expression ':' conditional.expr}
*/
pub(crate) fn conditional_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let cond = logical_or_expr(p, temp_args)?;
    if !p.at(QUESTION) {
        return Some(cond);
    }
    let question = p.bump_leaf();
    let then = comma_expression(p)?;
    let colon = p.take(COLON)?;
    let otherwise = conditional_expr(p, temp_args)?;
    let tail = p.ptree.list(&[Some(question), Some(then), Some(colon), Some(otherwise)]);
    Some(p.ptree.composite(NodeKind::COND_EXPR, Some(cond), tail))
}

fn logical_or_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let mut exp = logical_and_expr(p, temp_args)?;
    while p.at(LOG_OR_OP) {
        let op = p.bump_leaf();
        let right = logical_and_expr(p, temp_args)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

fn logical_and_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let mut exp = inclusive_or_expr(p, temp_args)?;
    while p.at(LOG_AND_OP) {
        let op = p.bump_leaf();
        let right = inclusive_or_expr(p, temp_args)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

fn inclusive_or_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let mut exp = exclusive_or_expr(p, temp_args)?;
    while p.at(PIPE) {
        let op = p.bump_leaf();
        let right = exclusive_or_expr(p, temp_args)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

fn exclusive_or_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let mut exp = and_expr(p, temp_args)?;
    while p.at(CARET) {
        let op = p.bump_leaf();
        let right = and_expr(p, temp_args)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

fn and_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let mut exp = equality_expr(p, temp_args)?;
    while p.at(AMP) {
        let op = p.bump_leaf();
        let right = equality_expr(p, temp_args)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

fn equality_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let mut exp = relational_expr(p, temp_args)?;
    while p.at(EQUAL_OP) {
        let op = p.bump_leaf();
        let right = relational_expr(p, temp_args)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

/*
  relational.expr
  : shift.expr
  | relational.expr (RelOp | '<' | '>') shift.expr
*/
fn relational_expr(p: &mut Parser, temp_args: bool) -> Option<NodeId> {
    let mut exp = shift_expr(p)?;
    loop {
        let t = p.peek(0);
        if !(t == REL_OP || t == LESS || (t == GREATER && !temp_args)) {
            break;
        }
        let op = p.bump_leaf();
        let right = shift_expr(p)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

fn shift_expr(p: &mut Parser) -> Option<NodeId> {
    let mut exp = additive_expr(p)?;
    while p.at(SHIFT_OP) {
        let op = p.bump_leaf();
        let right = additive_expr(p)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

pub(crate) fn additive_expr(p: &mut Parser) -> Option<NodeId> {
    let mut exp = multiply_expr(p)?;
    while matches!(p.peek(0), PLUS | MINUS) {
        let op = p.bump_leaf();
        let right = multiply_expr(p)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

fn multiply_expr(p: &mut Parser) -> Option<NodeId> {
    let mut exp = pm_expr(p)?;
    while matches!(p.peek(0), STAR | SLASH | PERCENT) {
        let op = p.bump_leaf();
        let right = pm_expr(p)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::INFIX_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

/*
  pm.expr	(pointer to member .*, ->*)
  : cast.expr
  | pm.expr PmOp cast.expr
*/
fn pm_expr(p: &mut Parser) -> Option<NodeId> {
    let mut exp = cast_expr(p)?;
    while p.at(PM_OP) {
        let op = p.bump_leaf();
        let right = cast_expr(p)?;
        let tail = list2(p, Some(op), Some(right));
        exp = p.ptree.composite(NodeKind::PM_EXPR, Some(exp), Some(tail));
    }
    Some(exp)
}

/*
  cast.expr
  : unary.expr
  | '(' type.name ')' cast.expr
*/
fn cast_expr(p: &mut Parser) -> Option<NodeId> {
    if !p.at(LEFT_PAREN) {
        return unary_expr(p);
    }
    let checkpoint = p.mark();
    let open = p.bump_leaf();
    if let Some(tname) = typename_untyped(p) {
        if p.at(RIGHT_PAREN) {
            let close = p.bump_leaf();
            if let Some(exp) = cast_expr(p) {
                let tail = list3(p, Some(tname), Some(close), Some(exp));
                return Some(p.ptree.composite(NodeKind::CAST_EXPR, Some(open), Some(tail)));
            }
        }
    }
    p.reset(checkpoint);
    unary_expr(p)
}

/*
  type.name : type.specifier cast.declarator
*/
pub(crate) fn typename_untyped(p: &mut Parser) -> Option<NodeId> {
    let mut type_encode = EncodingBuf::new();
    typename_(p, &mut type_encode)
}

pub(crate) fn typename_(p: &mut Parser, type_encode: &mut EncodingBuf) -> Option<NodeId> {
    let mut name_encode = EncodingBuf::new();
    let type_name = type_specifier(p, type_encode)?;
    let arg = decls::declarator(
        p,
        decls::DeclKind::Cast,
        type_encode,
        &mut name_encode,
        false,
        false,
    )?;
    Some(list2(p, Some(type_name), Some(arg)))
}

/*
  unary.expr
  : postfix.expr
  | ('*' | '&' | '+' | '-' | '!' | '~' | IncOp) cast.expr
  | sizeof.expr
  | allocate.expr
  | throw.expression
*/
fn unary_expr(p: &mut Parser) -> Option<NodeId> {
    let t = p.peek(0);
    if matches!(t, STAR | AMP | PLUS | MINUS | BANG | TILDE | INC_OP) {
        let op = p.bump_leaf();
        let right = cast_expr(p)?;
        let tail = p.ptree.cons(Some(right), None);
        return Some(p.ptree.composite(NodeKind::UNARY_EXPR, Some(op), Some(tail)));
    }
    match t {
        SIZEOF_KW => sizeof_expr(p),
        THROW_KW => throw_expr(p),
        _ if is_allocate_expr(p, t) => allocate_expr(p),
        _ => postfix_expr(p),
    }
}

/*
  throw.expression : THROW {expression}
*/
fn throw_expr(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(THROW_KW)?;
    let exp = if matches!(p.peek(0), COLON | SEMICOLON) { None } else { Some(expression(p)?) };
    let tail = p.ptree.cons(exp, None);
    Some(p.ptree.composite(NodeKind::THROW_EXPR, Some(keyword), Some(tail)))
}

/*
  sizeof.expr
  : SIZEOF unary.expr
  | SIZEOF '(' type.name ')'
*/
fn sizeof_expr(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(SIZEOF_KW)?;
    if p.at(LEFT_PAREN) {
        let checkpoint = p.mark();
        let open = p.bump_leaf();
        if let Some(tname) = typename_untyped(p) {
            if p.at(RIGHT_PAREN) {
                let close = p.bump_leaf();
                let tail = list3(p, Some(open), Some(tname), Some(close));
                return Some(p.ptree.composite(NodeKind::SIZEOF_EXPR, Some(keyword), Some(tail)));
            }
        }
        p.reset(checkpoint);
    }
    let unary = unary_expr(p)?;
    let tail = p.ptree.cons(Some(unary), None);
    Some(p.ptree.composite(NodeKind::SIZEOF_EXPR, Some(keyword), Some(tail)))
}

/*
  typeid.expr
  : TYPEID unary.expr
  | TYPEID '(' type.name ')'
*/
fn typeid_expr(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(TYPEID_KW)?;
    if p.at(LEFT_PAREN) {
        let checkpoint = p.mark();
        let open = p.bump_leaf();
        if let Some(tname) = typename_untyped(p) {
            if p.at(RIGHT_PAREN) {
                let close = p.bump_leaf();
                let tail = list3(p, Some(open), Some(tname), Some(close));
                return Some(p.ptree.composite(NodeKind::TYPEID_EXPR, Some(keyword), Some(tail)));
            }
        }
        p.reset(checkpoint);
    }
    let unary = unary_expr(p)?;
    let tail = p.ptree.cons(Some(unary), None);
    Some(p.ptree.composite(NodeKind::TYPEID_EXPR, Some(keyword), Some(tail)))
}

fn is_allocate_expr(p: &Parser, t: cxxfront_tokenizer::TokenKind) -> bool {
    let t = if t == SCOPE { p.peek(1) } else { t };
    matches!(t, NEW_KW | DELETE_KW)
}

/*
  allocate.expr
  : {Scope} NEW allocate.type
  | {Scope} DELETE {'[' ']'} cast.expr
*/
fn allocate_expr(p: &mut Parser) -> Option<NodeId> {
    let head = if p.at(SCOPE) { Some(p.bump_leaf()) } else { None };
    let token = p.advance();
    match token.kind {
        DELETE_KW => {
            let keyword = p.leaf(token);
            let mut exp = match head {
                None => p.ptree.composite(NodeKind::DELETE_EXPR, Some(keyword), None),
                Some(scope) => {
                    let tail = p.ptree.cons(Some(keyword), None);
                    p.ptree.composite(NodeKind::DELETE_EXPR, Some(scope), Some(tail))
                }
            };
            if p.at(LEFT_BRACKET) {
                let open = p.bump_leaf();
                exp = p.ptree.snoc(Some(exp), Some(open))?;
                let close = p.take(RIGHT_BRACKET)?;
                exp = p.ptree.snoc(Some(exp), Some(close))?;
            }
            let obj = cast_expr(p)?;
            p.ptree.snoc(Some(exp), Some(obj))
        }
        NEW_KW => {
            let keyword = p.leaf(token);
            let exp = match head {
                None => p.ptree.composite(NodeKind::NEW_EXPR, Some(keyword), None),
                Some(scope) => {
                    let tail = p.ptree.cons(Some(keyword), None);
                    p.ptree.composite(NodeKind::NEW_EXPR, Some(scope), Some(tail))
                }
            };
            let atype = allocate_type(p)?;
            p.ptree.nconc(Some(exp), atype)
        }
        _ => None,
    }
}

/*
  allocate.type
  : {'(' function.arguments ')'} type.specifier new.declarator
    {allocate.initializer}
  | {'(' function.arguments ')'} '(' type.name ')' {allocate.initializer}
*/
fn allocate_type(p: &mut Parser) -> Option<Option<NodeId>> {
    let mut atype: Option<NodeId>;
    if !p.at(LEFT_PAREN) {
        atype = Some(p.ptree.cons(None, None));
    } else {
        let open = p.bump_leaf();
        let checkpoint = p.mark();
        if let Some(tname) = typename_untyped(p) {
            if p.at(RIGHT_PAREN) {
                let close = p.bump_leaf();
                if !p.at(LEFT_PAREN) {
                    // `new (T)` with nothing following: T is the type,
                    // not a placement argument.
                    let parens = list3(p, Some(open), Some(tname), Some(close));
                    let atype = Some(list2(p, None, Some(parens)));
                    if !is_type_specifier(p) {
                        return Some(atype);
                    }
                } else if let Some(init) = allocate_initializer(p) {
                    let parens = list3(p, Some(open), Some(tname), Some(close));
                    let list = list2(p, None, Some(parens));
                    let atype = p.ptree.snoc(Some(list), Some(init));
                    if !p.at(LEFT_PAREN) {
                        return Some(atype);
                    }
                }
            }
        }
        // Whatever was read so far is really a placement argument
        // list.
        p.reset(checkpoint);
        let args = decls::function_arguments(p)?;
        let close = p.take(RIGHT_PAREN)?;
        let parens = list3(p, Some(open), args, Some(close));
        atype = Some(p.ptree.cons(Some(parens), None));
    }

    if p.at(LEFT_PAREN) {
        let open = p.bump_leaf();
        let tname = typename_untyped(p)?;
        let close = p.take(RIGHT_PAREN)?;
        let parens = list3(p, Some(open), Some(tname), Some(close));
        atype = p.ptree.snoc(atype, Some(parens));
    } else {
        let mut type_encode = EncodingBuf::new();
        let tname = type_specifier(p, &mut type_encode)?;
        let decl = new_declarator(p, &mut type_encode)?;
        let pair = list2(p, Some(tname), Some(decl));
        atype = p.ptree.snoc(atype, Some(pair));
    }

    if p.at(LEFT_PAREN) {
        let init = allocate_initializer(p)?;
        atype = p.ptree.snoc(atype, Some(init));
    }
    Some(atype)
}

/*
  new.declarator
  : empty
  | ptr.operator
  | {ptr.operator} ('[' comma.expression ']')+
*/
fn new_declarator(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let mut decl: Option<NodeId> = None;
    if !p.at(LEFT_BRACKET) {
        decl = decls::opt_ptr_operator(p, encode)?;
    }
    while p.at(LEFT_BRACKET) {
        let open = p.bump_leaf();
        let exp = comma_expression(p)?;
        let close = p.take(RIGHT_BRACKET)?;
        encode.array_unsized();
        let tail = list3(p, Some(open), Some(exp), Some(close));
        decl = p.ptree.nconc(decl, Some(tail));
    }
    let node = p.ptree.retag(NodeKind::DECLARATOR, decl);
    p.set_encoded_type(node, encode);
    Some(node)
}

/*
  allocate.initializer
  : '(' {initialize.expr (',' initialize.expr)* } ')'
*/
fn allocate_initializer(p: &mut Parser) -> Option<NodeId> {
    let open = p.take(LEFT_PAREN)?;
    if p.at(RIGHT_PAREN) {
        let close = p.bump_leaf();
        return Some(list3(p, Some(open), None, Some(close)));
    }
    let mut init: Option<NodeId> = None;
    loop {
        let exp = decls::initialize_expr(p)?;
        init = p.ptree.snoc(init, Some(exp));
        if !p.at(COMMA) {
            break;
        }
        let comma = p.bump_leaf();
        init = p.ptree.snoc(init, Some(comma));
    }
    let close = p.take(RIGHT_PAREN)?;
    Some(list3(p, Some(open), init, Some(close)))
}

/*
  postfix.exp
  : primary.exp
  | postfix.expr '[' comma.expression ']'
  | postfix.expr '(' function.arguments ')'
  | postfix.expr '.' var.name
  | postfix.expr ArrowOp var.name
  | postfix.expr IncOp

  Function-style casts are accepted as function calls.
*/
fn postfix_expr(p: &mut Parser) -> Option<NodeId> {
    let mut exp = primary_expr(p)?;
    loop {
        match p.peek(0) {
            LEFT_BRACKET => {
                let open = p.bump_leaf();
                let index = comma_expression(p)?;
                let close = p.take(RIGHT_BRACKET)?;
                let tail = list3(p, Some(open), Some(index), Some(close));
                exp = p.ptree.composite(NodeKind::ARRAY_EXPR, Some(exp), Some(tail));
            }
            LEFT_PAREN => {
                let open = p.bump_leaf();
                let args = decls::function_arguments(p)?;
                let close = p.take(RIGHT_PAREN)?;
                let tail = list3(p, Some(open), args, Some(close));
                exp = p.ptree.composite(NodeKind::FUNCALL_EXPR, Some(exp), Some(tail));
            }
            INC_OP => {
                let op = p.bump_leaf();
                let tail = p.ptree.cons(Some(op), None);
                exp = p.ptree.composite(NodeKind::POSTFIX_EXPR, Some(exp), Some(tail));
            }
            DOT | ARROW_OP => {
                let is_dot = p.at(DOT);
                let op = p.bump_leaf();
                let member = names::var_name(p)?;
                let tail = list2(p, Some(op), Some(member));
                let kind = if is_dot {
                    NodeKind::DOT_MEMBER_EXPR
                } else {
                    NodeKind::ARROW_MEMBER_EXPR
                };
                exp = p.ptree.composite(kind, Some(exp), Some(tail));
            }
            _ => return Some(exp),
        }
    }
}

/*
  primary.exp
  : Constant
  | CharConst
  | WideCharConst
  | StringL
  | WideStringL
  | THIS
  | var.name
  | '(' comma.expression ')'
  | integral.or.class.spec '(' function.arguments ')'
  | typeid '(' typething ')'
*/
fn primary_expr(p: &mut Parser) -> Option<NodeId> {
    match p.peek(0) {
        CONSTANT | CHAR_CONST | WIDE_CHAR_CONST | STRING_LITERAL | WIDE_STRING_LITERAL => {
            Some(p.bump_leaf())
        }
        THIS_KW => Some(p.bump_leaf()),
        TYPEID_KW => typeid_expr(p),
        LEFT_PAREN => {
            let open = p.bump_leaf();
            let exp = comma_expression(p)?;
            let close = p.take(RIGHT_PAREN)?;
            let tail = list2(p, Some(exp), Some(close));
            Some(p.ptree.composite(NodeKind::PAREN_EXPR, Some(open), Some(tail)))
        }
        _ => {
            let mut cast_type_encode = EncodingBuf::new();
            match decls::opt_integral_type_or_class_spec(p, &mut cast_type_encode)? {
                Some(spec) => {
                    // a function-style cast, e.g. int(c)
                    let open = p.take(LEFT_PAREN)?;
                    let args = decls::function_arguments(p)?;
                    let close = p.take(RIGHT_PAREN)?;
                    let tail = list3(p, Some(open), args, Some(close));
                    let cast =
                        p.ptree.composite(NodeKind::FSTYLE_CAST_EXPR, Some(spec), Some(tail));
                    p.set_encoded_type(cast, &cast_type_encode);
                    Some(cast)
                }
                None => names::var_name(p),
            }
        }
    }
}

/*
  typeof.expr : TYPEOF '(' expression ')'
*/
pub(crate) fn typeof_expr(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(TYPEOF_KW)?;
    let open = p.take(LEFT_PAREN)?;
    let exp = expression(p)?;
    let close = p.take(RIGHT_PAREN)?;
    let tail = list3(p, Some(open), Some(exp), Some(close));
    Some(p.ptree.composite(NodeKind::TYPEOF_EXPR, Some(keyword), Some(tail)))
}
