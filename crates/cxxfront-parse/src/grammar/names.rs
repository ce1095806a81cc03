//! Possibly qualified names, operator names and template argument
//! lists, together with the lookahead scans that decide whether a `<`
//! opens template arguments.

use cxxfront_encoding::EncodingBuf;
use cxxfront_ptree::{NodeId, NodeKind};
use cxxfront_tokenizer::TokenKind::{self, *};

use crate::grammar::{decls, exprs, list2, list3};
use crate::parser::Parser;

/// Wraps a compound name in a `NAME` node carrying its encoding. A
/// lone identifier stays a leaf.
pub(crate) fn name_node(p: &mut Parser, node: NodeId, encode: &EncodingBuf) -> NodeId {
    if p.ptree.is_leaf(node) {
        return node;
    }
    let name = p.ptree.retag(NodeKind::NAME, Some(node));
    p.set_encoded_name(name, encode);
    name
}

/// True when the parse sits on a closing angle bracket. A `>>` token
/// is split in place so the second half closes the enclosing list.
pub(crate) fn at_closing_angle(p: &mut Parser) -> bool {
    match p.peek(0) {
        GREATER => true,
        SHIFT_OP if p.token_text(p.look(0)) == ">>" => {
            p.stream.split_shift();
            true
        }
        _ => false,
    }
}

/*
  name
  : {'::'} name2 ('::' name2)*

  name2
  : Identifier {template.args}
  | '~' Identifier
  | OPERATOR operator.name {template.args}
*/
pub(crate) fn name(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let mut length = 0usize;
    let mut id: Option<NodeId> = None;
    if p.at(SCOPE) {
        let scope = p.bump_leaf();
        id = Some(p.ptree.cons(Some(scope), None));
        encode.global_scope();
        length += 1;
    } else if p.at(TYPEOF_KW) {
        // typeof(expr) stands in for a type we cannot resolve.
        encode.anonymous(p.next_anon());
        return exprs::typeof_expr(p);
    }
    loop {
        let mut token = p.advance();
        if token.kind == TEMPLATE_KW {
            // `a::template b<...>`: the keyword only disambiguates.
            token = p.advance();
        }
        match token.kind {
            IDENTIFIER => {
                let text = p.token_text(token);
                let mut n = p.leaf(token);
                if p.at(LESS) {
                    let mut args_encode = EncodingBuf::new();
                    let args = template_args(p, &mut args_encode)?;
                    encode.template_id(text, &args_encode);
                    length += 1;
                    n = list2(p, Some(n), Some(args));
                } else {
                    encode.simple_name(text);
                    length += 1;
                }
                if p.at(SCOPE) {
                    let scope = p.bump_leaf();
                    let pair = list2(p, Some(n), Some(scope));
                    id = p.ptree.nconc(id, Some(pair));
                } else {
                    id = match id {
                        Some(list) => p.ptree.snoc(Some(list), Some(n)),
                        None => Some(n),
                    };
                    if length > 1 && !encode.is_qualified() {
                        encode.qualified(length);
                    }
                    return id;
                }
            }
            TILDE => {
                if !p.at(IDENTIFIER) {
                    return None;
                }
                let class_token = p.advance();
                let class_text = p.token_text(class_token);
                let tilde = p.leaf(token);
                let class_name = p.leaf(class_token);
                let dt = list2(p, Some(tilde), Some(class_name));
                id = match id {
                    Some(_) => p.ptree.snoc(id, Some(dt)),
                    None => Some(dt),
                };
                encode.destructor(class_text);
                if length > 0 && !encode.is_qualified() {
                    encode.qualified(length + 1);
                }
                return id;
            }
            OPERATOR_KW => {
                let keyword = p.leaf(token);
                let op = operator_name(p, encode)?;
                let opf = if p.at(LESS) {
                    // A templated operator; its argument encoding is
                    // not folded into the name.
                    let mut args_encode = EncodingBuf::new();
                    let args = template_args(p, &mut args_encode)?;
                    list3(p, Some(keyword), Some(op), Some(args))
                } else {
                    list2(p, Some(keyword), Some(op))
                };
                id = match id {
                    Some(_) => p.ptree.snoc(id, Some(opf)),
                    None => Some(opf),
                };
                if length > 0 && !encode.is_qualified() {
                    encode.qualified(length + 1);
                }
                return id;
            }
            _ => return None,
        }
    }
}

/*
  operator.name
  : '+' | '-' | '*' | '/' | '%' | '^' | '&' | '|' | '~'
  | '!' | '=' | '<' | '>' | AssignOp | ShiftOp | EqualOp
  | RelOp | LogAndOp | LogOrOp | IncOp | ',' | PmOp | ArrowOp
  | NEW {'[' ']'}
  | DELETE {'[' ']'}
  | '(' ')'
  | '[' ']'
  | cast.operator.name
*/
pub(crate) fn operator_name(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let t = p.peek(0);
    if is_overloadable_op(t) {
        let token = p.advance();
        encode.simple_name(p.token_text(token));
        return Some(p.leaf(token));
    }
    match t {
        NEW_KW | DELETE_KW => {
            let keyword = p.bump_leaf();
            if !p.at(LEFT_BRACKET) {
                encode.simple_name(if t == NEW_KW { "new" } else { "delete" });
                return Some(keyword);
            }
            let open = p.bump_leaf();
            let close = p.take(RIGHT_BRACKET)?;
            encode.simple_name(if t == NEW_KW { "new[]" } else { "delete[]" });
            Some(list3(p, Some(keyword), Some(open), Some(close)))
        }
        LEFT_PAREN => {
            let open = p.bump_leaf();
            let close = p.take(RIGHT_PAREN)?;
            encode.simple_name("()");
            Some(list2(p, Some(open), Some(close)))
        }
        LEFT_BRACKET => {
            let open = p.bump_leaf();
            let close = p.take(RIGHT_BRACKET)?;
            encode.simple_name("[]");
            Some(list2(p, Some(open), Some(close)))
        }
        _ => cast_operator_name(p, encode),
    }
}

fn is_overloadable_op(t: TokenKind) -> bool {
    matches!(
        t,
        PLUS | MINUS
            | STAR
            | SLASH
            | PERCENT
            | CARET
            | AMP
            | PIPE
            | TILDE
            | BANG
            | EQ
            | LESS
            | GREATER
            | ASSIGN_OP
            | SHIFT_OP
            | EQUAL_OP
            | REL_OP
            | LOG_AND_OP
            | LOG_OR_OP
            | INC_OP
            | COMMA
            | PM_OP
            | ARROW_OP
    )
}

/*
  cast.operator.name
  : {cv.qualify} (integral.or.class.spec | name) {cv.qualify}
    {(ptr.operator)*}
*/
fn cast_operator_name(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let mut type_encode = EncodingBuf::new();
    let cv_q = decls::opt_cv_qualify(p);
    let type_name = match decls::opt_integral_type_or_class_spec(p, &mut type_encode)? {
        Some(type_name) => type_name,
        None => {
            type_encode.clear();
            name(p, &mut type_encode)?
        }
    };
    let cv_q2 = decls::opt_cv_qualify(p);
    let type_name = decls::merge_cv(p, cv_q, type_name, cv_q2);
    p.encode_cv(&mut type_encode, cv_q, cv_q2);
    let ptr = decls::opt_ptr_operator(p, &mut type_encode)?;
    encode.cast_operator(&type_encode);
    match ptr {
        None => Some(type_name),
        Some(ptr) => Some(list2(p, Some(type_name), Some(ptr))),
    }
}

/*
  ptr.to.member
  : {'::'} (identifier {template.args} '::')+ '*'
*/
pub(crate) fn ptr_to_member(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let mut pm_encode = EncodingBuf::new();
    let mut length = 0usize;
    let mut node: Option<NodeId> = None;
    if p.at(SCOPE) {
        let scope = p.bump_leaf();
        node = Some(p.ptree.cons(Some(scope), None));
        pm_encode.global_scope();
        length += 1;
    }
    loop {
        let token = p.advance();
        if token.kind != IDENTIFIER {
            return None;
        }
        let text = p.token_text(token);
        let mut n = p.leaf(token);
        if p.at(LESS) {
            let mut args_encode = EncodingBuf::new();
            let args = template_args(p, &mut args_encode)?;
            pm_encode.template_id(text, &args_encode);
            length += 1;
            n = list2(p, Some(n), Some(args));
        } else {
            pm_encode.simple_name(text);
            length += 1;
        }
        let scope = p.take(SCOPE)?;
        let pair = list2(p, Some(n), Some(scope));
        node = p.ptree.nconc(node, Some(pair));
        if p.at(STAR) {
            let star = p.bump_leaf();
            node = p.ptree.snoc(node, Some(star));
            break;
        }
    }
    encode.ptr_to_member(&pm_encode, length);
    node
}

/*
  template.args
  : '<' '>'
  | '<' template.argument {',' template.argument} '>'

  template.argument
  : type.name
  | conditional.expr
*/
pub(crate) fn template_args(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let open = p.take(LESS)?;
    if at_closing_angle(p) {
        let close = p.bump_leaf();
        return Some(list2(p, Some(open), Some(close)));
    }
    let mut args: Option<NodeId> = None;
    loop {
        let checkpoint = p.mark();
        let mut type_encode = EncodingBuf::new();
        // Prefer a type name; only an argument that does not stop at
        // `,` or `>` is re-parsed as an expression.
        let arg = match exprs::typename_(p, &mut type_encode) {
            Some(a) if p.at(COMMA) || at_closing_angle(p) => {
                encode.append_encoding(&type_encode);
                a
            }
            _ => {
                p.reset(checkpoint);
                let a = exprs::conditional_expr(p, true)?;
                encode.value_template_param();
                a
            }
        };
        args = p.ptree.snoc(args, Some(arg));
        if at_closing_angle(p) {
            let close = p.bump_leaf();
            return Some(list3(p, Some(open), args, Some(close)));
        }
        let comma = p.take(COMMA)?;
        args = p.ptree.snoc(args, Some(comma));
    }
}

/*
  var.name : {'::'} name2 ('::' name2)*

  name2
  : Identifier {template.args}
  | '~' Identifier
  | OPERATOR operator.name

  Template args are recognized only when the lookahead proves they are
  closed before the name ends.
*/
pub(crate) fn var_name(p: &mut Parser) -> Option<NodeId> {
    let mut encode = EncodingBuf::new();
    let core = var_name_core(p, &mut encode)?;
    Some(name_node(p, core, &encode))
}

fn var_name_core(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let mut length = 0usize;
    let mut node: Option<NodeId> = None;
    if p.at(SCOPE) {
        let scope = p.bump_leaf();
        node = Some(p.ptree.cons(Some(scope), None));
        encode.global_scope();
        length += 1;
    }
    loop {
        let mut token = p.advance();
        if token.kind == TEMPLATE_KW {
            token = p.advance();
        }
        match token.kind {
            IDENTIFIER => {
                let text = p.token_text(token);
                let mut n = p.leaf(token);
                if is_template_args(p) {
                    let mut args_encode = EncodingBuf::new();
                    let args = template_args(p, &mut args_encode)?;
                    encode.template_id(text, &args_encode);
                    length += 1;
                    n = list2(p, Some(n), Some(args));
                } else {
                    encode.simple_name(text);
                    length += 1;
                }
                if more_var_name(p) {
                    let scope = p.bump_leaf();
                    let pair = list2(p, Some(n), Some(scope));
                    node = p.ptree.nconc(node, Some(pair));
                } else {
                    node = match node {
                        Some(list) => p.ptree.snoc(Some(list), Some(n)),
                        None => Some(n),
                    };
                    if length > 1 && !encode.is_qualified() {
                        encode.qualified(length);
                    }
                    return node;
                }
            }
            TILDE => {
                if !p.at(IDENTIFIER) {
                    return None;
                }
                let class_token = p.advance();
                let class_text = p.token_text(class_token);
                let tilde = p.leaf(token);
                let class_name = p.leaf(class_token);
                let dt = list2(p, Some(tilde), Some(class_name));
                node = match node {
                    Some(_) => p.ptree.snoc(node, Some(dt)),
                    None => Some(dt),
                };
                encode.destructor(class_text);
                if length > 0 && !encode.is_qualified() {
                    encode.qualified(length + 1);
                }
                return node;
            }
            OPERATOR_KW => {
                let keyword = p.leaf(token);
                let op = operator_name(p, encode)?;
                let opf = list2(p, Some(keyword), Some(op));
                node = match node {
                    Some(_) => p.ptree.snoc(node, Some(opf)),
                    None => Some(opf),
                };
                if length > 0 && !encode.is_qualified() {
                    encode.qualified(length + 1);
                }
                return node;
            }
            _ => return None,
        }
    }
}

fn more_var_name(p: &Parser) -> bool {
    p.peek(0) == SCOPE
        && matches!(p.peek(1), IDENTIFIER | TILDE | OPERATOR_KW | TEMPLATE_KW)
}

/*
  template.args : '<' any* '>'

  template.args must be followed by '(', '::', ';', or ','
*/
pub(crate) fn is_template_args(p: &Parser) -> bool {
    let mut i = 0usize;
    if p.peek(i) != LESS {
        return false;
    }
    i += 1;
    let mut depth = 1i32;
    while depth > 0 {
        let u = p.look(i);
        i += 1;
        match u.kind {
            LESS => depth += 1,
            GREATER => depth -= 1,
            SHIFT_OP if p.token_text(u) == ">>" => depth -= 2,
            LEFT_PAREN => {
                let mut parens = 1i32;
                while parens > 0 {
                    match p.peek(i) {
                        LEFT_PAREN => parens += 1,
                        RIGHT_PAREN => parens -= 1,
                        EOF | SEMICOLON | RIGHT_BRACE => return false,
                        _ => {}
                    }
                    i += 1;
                }
            }
            EOF | SEMICOLON | RIGHT_BRACE => return false,
            _ => {}
        }
    }
    matches!(p.peek(i), SCOPE | LEFT_PAREN | SEMICOLON | COMMA)
}
