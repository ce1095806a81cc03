//! Declarations: typedefs, templates, namespaces, classes, enums and
//! the declarator machinery they all share.

use cxxfront_encoding::EncodingBuf;
use cxxfront_ptree::{NodeId, NodeKind};
use cxxfront_tokenizer::TokenKind::*;

use crate::grammar::{definition, exprs, list2, list3, names, null_declaration, stmts,
                     type_specifier};
use crate::parser::Parser;

/// What a declarator is parsed for. An argument declarator may omit
/// its name; a cast declarator must.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclKind {
    Declarator,
    Arg,
    Cast,
}

/// Joins leading and trailing cv qualifier lists around a type node.
pub(crate) fn merge_cv(
    p: &mut Parser,
    cv1: Option<NodeId>,
    node: NodeId,
    cv2: Option<NodeId>,
) -> NodeId {
    match (cv1, cv2) {
        (Some(cv1), None) => {
            let merged = p.ptree.snoc(Some(cv1), Some(node));
            merged.unwrap_or(node)
        }
        (Some(cv1), Some(cv2)) => {
            let tail = p.ptree.cons(Some(node), Some(cv2));
            let merged = p.ptree.nconc(Some(cv1), Some(tail));
            merged.unwrap_or(tail)
        }
        (None, Some(cv2)) => p.ptree.cons(Some(node), Some(cv2)),
        (None, None) => node,
    }
}

/*
  typedef
  : TYPEDEF type.specifier declarators ';'
*/
pub(crate) fn typedef_(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(TYPEDEF_KW)?;
    let mut type_encode = EncodingBuf::new();
    let type_name = type_specifier(p, &mut type_encode)?;
    let decl = declarators(p, &type_encode, true, false)?;
    let semicolon = p.take(SEMICOLON)?;
    let tail = list3(p, Some(type_name), Some(decl), Some(semicolon));
    Some(p.ptree.composite(NodeKind::TYPEDEF, Some(keyword), Some(tail)))
}

/*
  linkage.spec
  : EXTERN StringL definition
  | EXTERN StringL linkage.body
*/
pub(crate) fn linkage_spec(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(EXTERN_KW)?;
    let lang = p.take(STRING_LITERAL)?;
    let body = if p.at(LEFT_BRACE) { linkage_body(p)? } else { definition(p)? };
    let tail = list2(p, Some(lang), Some(body));
    Some(p.ptree.composite(NodeKind::LINKAGE_SPEC, Some(keyword), Some(tail)))
}

/*
  namespace.spec
  : NAMESPACE Identifier definition
  | NAMESPACE { Identifier } linkage.body
*/
pub(crate) fn namespace_spec(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(NAMESPACE_KW)?;
    let comments = p.wrap_comments();
    let name = if p.at(LEFT_BRACE) { None } else { Some(p.take(IDENTIFIER)?) };
    let body = if p.at(LEFT_BRACE) { linkage_body(p)? } else { definition(p)? };
    let tail = list2(p, name, Some(body));
    let spec = p.ptree.composite(NodeKind::NAMESPACE_SPEC, Some(keyword), Some(tail));
    p.ptree.set_comments(spec, comments);
    Some(spec)
}

/*
  namespace.alias : NAMESPACE Identifier '=' {'::'} Identifier ('::' Identifier)* ';'
*/
pub(crate) fn namespace_alias(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(NAMESPACE_KW)?;
    let alias = p.take(IDENTIFIER)?;
    let eq = p.take(EQ)?;

    let mut encode = EncodingBuf::new();
    let mut length = 0usize;
    let mut name: Option<NodeId> = None;
    if p.at(SCOPE) {
        let scope = p.bump_leaf();
        name = Some(p.ptree.cons(Some(scope), None));
        encode.global_scope();
        length += 1;
    }
    loop {
        let ident = p.take(IDENTIFIER)?;
        let text = p.ptree.leaf_text(ident, p.stream.source()).unwrap_or_default();
        encode.simple_name(text);
        length += 1;
        if p.at(SCOPE) {
            let scope = p.bump_leaf();
            let pair = list2(p, Some(ident), Some(scope));
            name = p.ptree.nconc(name, Some(pair));
        } else {
            name = match name {
                Some(list) => p.ptree.snoc(Some(list), Some(ident)),
                None => Some(ident),
            };
            if length > 1 && !encode.is_qualified() {
                encode.qualified(length);
            }
            break;
        }
    }

    let semicolon = p.take(SEMICOLON)?;
    let tail = p.ptree.list(&[Some(alias), Some(eq), name, Some(semicolon)]);
    Some(p.ptree.composite(NodeKind::NAMESPACE_ALIAS, Some(keyword), tail))
}

/*
  using.declaration
  : USING {NAMESPACE} name ';'
*/
pub(crate) fn using_(p: &mut Parser) -> Option<NodeId> {
    let keyword = p.take(USING_KW)?;
    let list = Some(p.ptree.cons(Some(keyword), None));
    let mut decl = Some(p.ptree.retag(NodeKind::USING, list));
    if p.at(NAMESPACE_KW) {
        let ns = p.bump_leaf();
        decl = p.ptree.snoc(decl, Some(ns));
    }
    let mut name_encode = EncodingBuf::new();
    let id = names::name(p, &mut name_encode)?;
    let id = if p.ptree.is_leaf(id) {
        let list = Some(p.ptree.cons(Some(id), None));
        let name = p.ptree.retag(NodeKind::NAME, list);
        p.set_encoded_name(name, &name_encode);
        name
    } else {
        names::name_node(p, id, &name_encode)
    };
    decl = p.ptree.snoc(decl, Some(id));
    let semicolon = p.take(SEMICOLON)?;
    p.ptree.snoc(decl, Some(semicolon))
}

/*
  linkage.body : '{' (definition)* '}'

  Also the body of a named or anonymous namespace.
*/
fn linkage_body(p: &mut Parser) -> Option<NodeId> {
    let open = p.take(LEFT_BRACE)?;
    let mut body: Option<NodeId> = None;
    while !p.at(RIGHT_BRACE) {
        match definition(p) {
            Some(def) => body = p.ptree.snoc(body, Some(def)),
            None => {
                if !p.mark_error() {
                    return None;
                }
                p.skip_to(RIGHT_BRACE);
                let close = p.take(RIGHT_BRACE).unwrap_or_else(|| p.bump_leaf());
                return Some(list3(p, Some(open), None, Some(close)));
            }
        }
    }
    let close = p.bump_leaf();
    let comments = p.wrap_comments();
    p.ptree.set_comments(close, comments);
    let list = list3(p, Some(open), body, Some(close));
    Some(p.ptree.retag(NodeKind::BRACE, Some(list)))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TemplateDeclKind {
    Decl,
    Instantiation,
    Specialization,
}

/*
  template.decl
  : TEMPLATE '<' temp.arg.list '>' declaration
  | TEMPLATE declaration
  | TEMPLATE '<' '>' declaration

  The second form is an explicit instantiation, the third a
  specialization.
*/
pub(crate) fn template_decl(p: &mut Parser) -> Option<NodeId> {
    let (tdecl, kind) = template_decl2(p)?;
    let body = declaration(p)?;
    match kind {
        TemplateDeclKind::Instantiation => {
            // The declaration must have the form [nil [class ...] ;].
            if p.ptree.length(Some(body)) != Some(3) {
                return None;
            }
            if p.ptree.first(Some(body)).is_some() {
                return None;
            }
            let class_spec = p.ptree.second(Some(body))?;
            if p.ptree.kind(class_spec) != NodeKind::CLASS_SPEC {
                return None;
            }
            let third = p.ptree.third(Some(body))?;
            if !p.ptree.leaf_is(third, p.stream.source(), ";") {
                return None;
            }
            let list = Some(p.ptree.cons(Some(class_spec), None));
            Some(p.ptree.retag(NodeKind::TEMPLATE_INSTANTIATION, list))
        }
        TemplateDeclKind::Decl | TemplateDeclKind::Specialization => {
            p.ptree.snoc(tdecl, Some(body))
        }
    }
}

fn template_decl2(p: &mut Parser) -> Option<(Option<NodeId>, TemplateDeclKind)> {
    let keyword = p.take(TEMPLATE_KW)?;
    if !p.at(LESS) {
        // An explicit instantiation; the keyword itself is dropped.
        return Some((None, TemplateDeclKind::Instantiation));
    }
    let open = p.bump_leaf();
    let args = template_arg_list(p)?;
    let close = p.take(GREATER)?;
    let tail = list3(p, Some(open), args, Some(close));
    let decl = p.ptree.composite(NodeKind::TEMPLATE_DECL, Some(keyword), Some(tail));

    // A nested `template <...>` before the declaration is skipped.
    while p.at(TEMPLATE_KW) {
        p.advance();
        if !p.at(LESS) {
            break;
        }
        p.advance();
        template_arg_list(p)?;
        p.take(GREATER)?;
    }

    let kind =
        if args.is_none() { TemplateDeclKind::Specialization } else { TemplateDeclKind::Decl };
    Some((Some(decl), kind))
}

/*
  temp.arg.list
  : empty
  | temp.arg.declaration (',' temp.arg.declaration)*
*/
fn template_arg_list(p: &mut Parser) -> Option<Option<NodeId>> {
    if p.at(GREATER) {
        return Some(None);
    }
    let first = template_arg_declaration(p)?;
    let mut args = Some(p.ptree.cons(Some(first), None));
    while p.at(COMMA) {
        let comma = p.bump_leaf();
        args = p.ptree.snoc(args, Some(comma));
        let arg = template_arg_declaration(p)?;
        args = p.ptree.snoc(args, Some(arg));
    }
    Some(args)
}

/*
  temp.arg.declaration
  : CLASS {Identifier} {'=' type.name}
  | type.specifier arg.declarator {'=' additive.expr}
  | template.decl2 CLASS Identifier {'=' type.name}
*/
fn template_arg_declaration(p: &mut Parser) -> Option<NodeId> {
    let t0 = p.peek(0);
    let t1 = p.peek(1);
    let t2 = p.peek(2);
    if t0 == CLASS_KW && t1 == IDENTIFIER && matches!(t2, EQ | GREATER | COMMA) {
        let keyword = p.bump_leaf();
        let name = p.bump_leaf();
        let decl = list2(p, Some(keyword), Some(name));
        if t2 == EQ {
            let eq = p.bump_leaf();
            let default_type = exprs::typename_untyped(p)?;
            let tail = list2(p, Some(eq), Some(default_type));
            return p.ptree.nconc(Some(decl), Some(tail));
        }
        Some(decl)
    } else if t0 == CLASS_KW && matches!(t1, EQ | GREATER | COMMA) {
        let keyword = p.bump_leaf();
        let mut decl = Some(p.ptree.cons(Some(keyword), None));
        if p.at(EQ) {
            let eq = p.bump_leaf();
            let default_type = exprs::typename_untyped(p)?;
            let tail = list2(p, Some(eq), Some(default_type));
            decl = p.ptree.nconc(decl, Some(tail));
        }
        decl
    } else if t0 == TEMPLATE_KW {
        let (tdecl, _) = template_decl2(p)?;
        let keyword = p.take(CLASS_KW)?;
        let name = p.take(IDENTIFIER)?;
        let name_list = Some(p.ptree.cons(Some(name), None));
        let cspec = p.ptree.composite(NodeKind::CLASS_SPEC, Some(keyword), name_list);
        let mut decl = p.ptree.snoc(tdecl, Some(cspec));
        if p.at(EQ) {
            let eq = p.bump_leaf();
            let default_type = exprs::typename_untyped(p)?;
            let tail = list2(p, Some(eq), Some(default_type));
            decl = p.ptree.nconc(decl, Some(tail));
        }
        decl
    } else {
        let mut type_encode = EncodingBuf::new();
        let mut name_encode = EncodingBuf::new();
        let type_name = type_specifier(p, &mut type_encode)?;
        let arg =
            declarator(p, DeclKind::Arg, &mut type_encode, &mut name_encode, true, false)?;
        let mut decl = Some(list2(p, Some(type_name), Some(arg)));
        if p.at(EQ) {
            let eq = p.bump_leaf();
            let exp = exprs::additive_expr(p)?;
            let tail = list2(p, Some(eq), Some(exp));
            decl = p.ptree.nconc(decl, Some(tail));
        }
        decl
    }
}

/*
  extern.template.decl : EXTERN TEMPLATE declaration
*/
pub(crate) fn extern_template_decl(p: &mut Parser) -> Option<NodeId> {
    let extern_kw = p.take(EXTERN_KW)?;
    let template_kw = p.take(TEMPLATE_KW)?;
    let body = declaration(p)?;
    let tail = list2(p, Some(template_kw), Some(body));
    Some(p.ptree.composite(NodeKind::EXTERN_TEMPLATE, Some(extern_kw), Some(tail)))
}

/*
  declaration
  : integral.declaration
  | const.declaration
  | other.declaration

  decl.head
  : {member.spec} {storage.spec} {member.spec} {cv.qualify}
*/
pub(crate) fn declaration(p: &mut Parser) -> Option<NodeId> {
    p.pending_comments = p.wrap_comments();

    let mem_s = opt_member_spec(p);
    let storage_s = opt_storage_spec(p);
    let mut head = mem_s;
    if let Some(storage) = storage_s {
        head = p.ptree.snoc(head, Some(storage));
    }
    if mem_s.is_none() {
        let late = opt_member_spec(p);
        head = p.ptree.nconc(head, late);
    }

    let cv_q = opt_cv_qualify(p);
    let mut type_encode = EncodingBuf::new();
    let integral = opt_integral_type_or_class_spec(p, &mut type_encode)?;

    let statement = match integral {
        Some(integral) => integral_declaration(p, &mut type_encode, head, integral, cv_q)?,
        None => {
            type_encode.clear();
            let t = p.peek(0);
            if cv_q.is_some() && ((t == IDENTIFIER && p.peek(1) == EQ) || t == STAR) {
                const_declaration(p, head, cv_q)?
            } else {
                other_declaration(p, &mut type_encode, mem_s, cv_q, head)?
            }
        }
    };
    let comments = p.pending_comments.take();
    p.ptree.set_comments(statement, comments);
    Some(statement)
}

/*
  integral.declaration
  : integral.decl.head declarators (';' | function.body)
  | integral.decl.head ';'
  | integral.decl.head ':' expression ';'
*/
fn integral_declaration(
    p: &mut Parser,
    type_encode: &mut EncodingBuf,
    head: Option<NodeId>,
    integral: NodeId,
    cv_q: Option<NodeId>,
) -> Option<NodeId> {
    let cv_q2 = opt_cv_qualify(p);
    let integral = merge_cv(p, cv_q, integral, cv_q2);
    p.encode_cv(type_encode, cv_q, cv_q2);
    match p.peek(0) {
        SEMICOLON => {
            let semicolon = p.bump_leaf();
            let tail = list2(p, Some(integral), Some(semicolon));
            Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)))
        }
        COLON => {
            // an anonymous bit field
            let colon = p.bump_leaf();
            let width = exprs::expression(p)?;
            let field = list2(p, Some(colon), Some(width));
            let decl = p.ptree.cons(Some(field), None);
            let semicolon = p.take(SEMICOLON)?;
            let tail = list3(p, Some(integral), Some(decl), Some(semicolon));
            Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)))
        }
        _ => {
            let decl = declarators(p, type_encode, true, false)?;
            if p.at(SEMICOLON) {
                let semicolon = p.bump_leaf();
                let tail = list3(p, Some(integral), Some(decl), Some(semicolon));
                Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)))
            } else {
                if p.ptree.length(Some(decl)) != Some(1) {
                    return None;
                }
                let declarator = p.ptree.head(decl);
                let body = stmts::compound_statement(p)?;
                let tail = list3(p, Some(integral), declarator, Some(body));
                Some(p.ptree.composite(NodeKind::FUNCTION_DEFINITION, head, Some(tail)))
            }
        }
    }
}

/*
  const.declaration
  : cv.qualify {'*'} Identifier '=' expression {',' declarators} ';'
*/
pub(crate) fn const_declaration(
    p: &mut Parser,
    head: Option<NodeId>,
    cv_q: Option<NodeId>,
) -> Option<NodeId> {
    let mut type_encode = EncodingBuf::new();
    type_encode.simple_const();
    let decl = declarators(p, &type_encode, false, false)?;
    let semicolon = p.take(SEMICOLON)?;
    let tail = list3(p, cv_q, Some(decl), Some(semicolon));
    Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)))
}

/*
  other.declaration
  : decl.head name {cv.qualify} declarators (';' | function.body)
  | decl.head name constructor.decl (';' | function.body)
  | FRIEND name ';'
*/
fn other_declaration(
    p: &mut Parser,
    type_encode: &mut EncodingBuf,
    mem_s: Option<NodeId>,
    cv_q: Option<NodeId>,
    head: Option<NodeId>,
) -> Option<NodeId> {
    let mut type_name = names::name(p, type_encode)?;
    let decl;
    if cv_q.is_none() && is_constructor_decl(p) {
        let mut ftype_encode = EncodingBuf::new();
        let ctor = constructor_decl(p, &mut ftype_encode)?;
        let declarator =
            p.ptree.composite(NodeKind::DECLARATOR, Some(type_name), Some(ctor));
        p.set_encoded_type(declarator, &ftype_encode);
        p.set_encoded_name(declarator, type_encode);
        decl = p.ptree.cons(Some(declarator), None);
        if p.at(SEMICOLON) {
            let semicolon = p.bump_leaf();
            let tail = list3(p, None, Some(decl), Some(semicolon));
            return Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)));
        }
        let body = stmts::compound_statement(p)?;
        let tail = list3(p, None, Some(declarator), Some(body));
        return Some(p.ptree.composite(NodeKind::FUNCTION_DEFINITION, head, Some(tail)));
    } else if mem_s.is_some() && p.at(SEMICOLON) {
        // FRIEND name ';'
        let is_friend = p.ptree.length(mem_s) == Some(1)
            && p
                .ptree
                .first(mem_s)
                .is_some_and(|f| p.ptree.leaf_is(f, p.stream.source(), "friend"));
        if !is_friend {
            return None;
        }
        let semicolon = p.bump_leaf();
        let tail = list2(p, Some(type_name), Some(semicolon));
        return Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)));
    } else {
        let cv_q2 = opt_cv_qualify(p);
        type_name = merge_cv(p, cv_q, type_name, cv_q2);
        p.encode_cv(type_encode, cv_q, cv_q2);
        decl = declarators(p, type_encode, false, false)?;
    }

    if p.at(SEMICOLON) {
        let semicolon = p.bump_leaf();
        let tail = list3(p, Some(type_name), Some(decl), Some(semicolon));
        Some(p.ptree.composite(NodeKind::DECLARATION, head, Some(tail)))
    } else {
        if p.ptree.length(Some(decl)) != Some(1) {
            return None;
        }
        let declarator = p.ptree.head(decl);
        let body = stmts::compound_statement(p)?;
        let tail = list3(p, Some(type_name), declarator, Some(body));
        Some(p.ptree.composite(NodeKind::FUNCTION_DEFINITION, head, Some(tail)))
    }
}

/*
  A declaration like `T (a);` is treated as a constructor declaration
  even when `a` is not a type name. Nobody declares a variable that
  way.
*/
fn is_constructor_decl(p: &Parser) -> bool {
    if p.peek(0) != LEFT_PAREN {
        return false;
    }
    match p.peek(1) {
        STAR | AMP | LEFT_PAREN => false,
        CONST_KW | VOLATILE_KW => true,
        _ => !is_ptr_to_member(p, 1),
    }
}

/*
  ptr.to.member : {'::'} (identifier {'<' any* '>'} '::')+ '*'
*/
pub(crate) fn is_ptr_to_member(p: &Parser, start: usize) -> bool {
    let mut i = start;
    let mut t0 = p.peek(i);
    i += 1;
    if t0 == SCOPE {
        t0 = p.peek(i);
        i += 1;
    }
    while t0 == IDENTIFIER {
        let mut t = p.peek(i);
        i += 1;
        if t == LESS {
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
            t = p.peek(i);
            i += 1;
        }
        if t != SCOPE {
            return false;
        }
        t0 = p.peek(i);
        i += 1;
        if t0 == STAR {
            return true;
        }
    }
    false
}

/*
  member.spec : (FRIEND | INLINE | VIRTUAL)+
*/
fn opt_member_spec(p: &mut Parser) -> Option<NodeId> {
    let mut spec: Option<NodeId> = None;
    while matches!(p.peek(0), FRIEND_KW | INLINE_KW | VIRTUAL_KW) {
        let keyword = p.bump_leaf();
        spec = p.ptree.snoc(spec, Some(keyword));
    }
    spec
}

/*
  storage.spec : STATIC | EXTERN | AUTO | REGISTER | MUTABLE
*/
pub(crate) fn opt_storage_spec(p: &mut Parser) -> Option<NodeId> {
    if matches!(p.peek(0), STATIC_KW | EXTERN_KW | AUTO_KW | REGISTER_KW | MUTABLE_KW) {
        Some(p.bump_leaf())
    } else {
        None
    }
}

/*
  cv.qualify : (CONST | VOLATILE)+
*/
pub(crate) fn opt_cv_qualify(p: &mut Parser) -> Option<NodeId> {
    let mut cv: Option<NodeId> = None;
    while matches!(p.peek(0), CONST_KW | VOLATILE_KW) {
        let keyword = p.bump_leaf();
        cv = p.ptree.snoc(cv, Some(keyword));
    }
    cv
}

/*
  integral.or.class.spec
  : (CHAR | WCHAR | INT | SHORT | LONG | SIGNED | UNSIGNED | FLOAT
     | DOUBLE | VOID | BOOLEAN)+
  | class.spec
  | enum.spec
*/
pub(crate) fn opt_integral_type_or_class_spec(
    p: &mut Parser,
    encode: &mut EncodingBuf,
) -> Option<Option<NodeId>> {
    let mut spec: Option<NodeId> = None;
    let mut type_code = b' ';
    let mut sign = b' ';
    loop {
        let t = p.peek(0);
        if !t.is_integral_type() {
            break;
        }
        match t {
            CHAR_KW => type_code = b'c',
            WCHAR_KW => type_code = b'w',
            BOOL_KW => type_code = b'b',
            // an __int64 is *not* an int but close enough
            INT_KW | INT64_KW => {
                if !matches!(type_code, b's' | b'l' | b'j' | b'r') {
                    type_code = b'i';
                }
            }
            SHORT_KW => type_code = b's',
            LONG_KW => {
                type_code = match type_code {
                    b'l' => b'j', // long long
                    b'd' => b'r', // long double
                    _ => b'l',
                };
            }
            SIGNED_KW => sign = b'S',
            UNSIGNED_KW => sign = b'U',
            FLOAT_KW => type_code = b'f',
            DOUBLE_KW => type_code = if type_code == b'l' { b'r' } else { b'd' },
            VOID_KW => type_code = b'v',
            _ => {}
        }
        let keyword = p.bump_leaf();
        spec = p.ptree.snoc(spec, Some(keyword));
    }
    if spec.is_some() {
        // `signed` alone means signed int; the prefix survives only
        // on char.
        if sign == b'S' && type_code != b'c' {
            sign = b' ';
        }
        if sign != b' ' {
            encode.sign_prefix(sign);
        }
        if type_code == b' ' {
            type_code = b'i';
        }
        encode.builtin(type_code);
        return Some(spec);
    }
    match p.peek(0) {
        CLASS_KW | STRUCT_KW | UNION_KW => Some(Some(class_spec(p, encode)?)),
        ENUM_KW => Some(Some(enum_spec(p, encode)?)),
        _ => Some(None),
    }
}

/*
  constructor.decl
  : '(' {arg.decl.list} ')' {cv.qualify} {throw.decl}
    {member.initializers} {'=' Constant}
*/
fn constructor_decl(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let open = p.take(LEFT_PAREN)?;
    let args = if p.at(RIGHT_PAREN) {
        encode.start_func_args();
        encode.void_type();
        encode.end_func_args();
        None
    } else {
        arg_decl_list(p, encode)?
    };
    let close = p.take(RIGHT_PAREN)?;
    let mut ctor = Some(list3(p, Some(open), args, Some(close)));
    let cv = opt_cv_qualify(p);
    if cv.is_some() {
        p.encode_cv(encode, cv, None);
        ctor = p.ptree.nconc(ctor, cv);
    }

    // A throw declaration is parsed but not kept.
    opt_throw_decl(p)?;

    if p.at(COLON) {
        let mi = member_initializers(p)?;
        ctor = p.ptree.snoc(ctor, Some(mi));
    }
    if p.at(EQ) {
        let eq = p.bump_leaf();
        let zero = p.take(CONSTANT)?;
        let tail = list2(p, Some(eq), Some(zero));
        ctor = p.ptree.nconc(ctor, Some(tail));
    }
    encode.no_return_type();
    ctor
}

/*
  throw.decl : THROW '(' (name {','})* {name} ')'
*/
pub(crate) fn opt_throw_decl(p: &mut Parser) -> Option<Option<NodeId>> {
    if !p.at(THROW_KW) {
        return Some(None);
    }
    let keyword = p.bump_leaf();
    let mut decl = Some(p.ptree.cons(Some(keyword), None));
    let open = p.take(LEFT_PAREN)?;
    decl = p.ptree.snoc(decl, Some(open));
    loop {
        match p.peek(0) {
            EOF => return None,
            RIGHT_PAREN => break,
            ELLIPSIS if p.rules.msvc => {
                // MSVC accepts `throw(...)`.
                let ellipsis = p.bump_leaf();
                decl = p.ptree.snoc(decl, Some(ellipsis));
            }
            _ => {
                let mut encode = EncodingBuf::new();
                let name = names::name(p, &mut encode)?;
                decl = p.ptree.snoc(decl, Some(name));
            }
        }
        if p.at(COMMA) {
            let comma = p.bump_leaf();
            decl = p.ptree.snoc(decl, Some(comma));
        } else {
            break;
        }
    }
    let close = p.take(RIGHT_PAREN)?;
    decl = p.ptree.snoc(decl, Some(close));
    Some(decl)
}

/*
  declarators : declarator.with.init (',' declarator.with.init)*
*/
pub(crate) fn declarators(
    p: &mut Parser,
    type_encode: &EncodingBuf,
    should_be_declarator: bool,
    is_statement: bool,
) -> Option<NodeId> {
    let mut decls: Option<NodeId> = None;
    loop {
        let comments = p.wrap_comments();
        let mut encode = type_encode.clone();
        let d = declarator_with_init(p, &mut encode, should_be_declarator, is_statement)?;
        if p.ptree.kind(d) == NodeKind::DECLARATOR {
            p.ptree.set_comments(d, comments);
        }
        decls = p.ptree.snoc(decls, Some(d));
        if p.at(COMMA) {
            let comma = p.bump_leaf();
            decls = p.ptree.snoc(decls, Some(comma));
        } else {
            return decls;
        }
    }
}

/*
  declarator.with.init
  : ':' expression
  | declarator {'=' initialize.expr | ':' expression}
*/
pub(crate) fn declarator_with_init(
    p: &mut Parser,
    type_encode: &mut EncodingBuf,
    should_be_declarator: bool,
    is_statement: bool,
) -> Option<NodeId> {
    if p.at(COLON) {
        // a bit field
        let colon = p.bump_leaf();
        let width = exprs::expression(p)?;
        return Some(list2(p, Some(colon), Some(width)));
    }
    let mut name_encode = EncodingBuf::new();
    let d = declarator(
        p,
        DeclKind::Declarator,
        type_encode,
        &mut name_encode,
        should_be_declarator,
        is_statement,
    )?;
    match p.peek(0) {
        EQ => {
            let eq = p.bump_leaf();
            let init = initialize_expr(p)?;
            let tail = list2(p, Some(eq), Some(init));
            p.ptree.nconc(Some(d), Some(tail))
        }
        COLON => {
            // a bit field
            let colon = p.bump_leaf();
            let width = exprs::expression(p)?;
            let tail = list2(p, Some(colon), Some(width));
            p.ptree.nconc(Some(d), Some(tail))
        }
        _ => Some(d),
    }
}

pub(crate) fn declarator(
    p: &mut Parser,
    kind: DeclKind,
    type_encode: &mut EncodingBuf,
    name_encode: &mut EncodingBuf,
    should_be_declarator: bool,
    is_statement: bool,
) -> Option<NodeId> {
    declarator2(p, kind, false, type_encode, name_encode, should_be_declarator, is_statement)?
}

/*
  declarator
  : (ptr.operator)* (name | '(' declarator ')')
	('[' comma.expression ']')* {func.args.or.init}

  func.args.or.init
  : '(' arg.decl.list.or.init ')' {cv.qualify} {throw.decl}
    {member.initializers}

  `(declarator)` is assumed to be followed by `(` or `[` so a function
  call F(x) is not taken for a type F with declarator x. The
  assumption is waived when should_be_declarator is set.

  An argument declaration list and a function-style initializer get
  different shapes:
      int f(char)  ==>  .. [f ( [[[char] nil]] )]
      Point f(1)   ==>  .. [f [( [1] )]]
*/
fn declarator2(
    p: &mut Parser,
    kind: DeclKind,
    recursive: bool,
    type_encode: &mut EncodingBuf,
    name_encode: &mut EncodingBuf,
    should_be_declarator: bool,
    is_statement: bool,
) -> Option<Option<NodeId>> {
    let mut recursive_encode = EncodingBuf::new();
    let mut recursive_decl = false;
    let mut d = opt_ptr_operator(p, type_encode)?;

    let checkpoint = p.mark();
    let t = p.peek(0);
    if t == LEFT_PAREN {
        let open = p.bump_leaf();
        match declarator2(p, kind, true, &mut recursive_encode, name_encode, true, false) {
            Some(inner) => {
                recursive_decl = true;
                if !p.at(RIGHT_PAREN) {
                    if kind != DeclKind::Cast {
                        return None;
                    }
                    p.reset(checkpoint);
                    name_encode.clear();
                } else {
                    let close = p.bump_leaf();
                    if !should_be_declarator && kind == DeclKind::Declarator && d.is_none() {
                        // refuse to read a function call F(x) as a declarator
                        if !matches!(p.peek(0), LEFT_BRACKET | LEFT_PAREN) {
                            return None;
                        }
                    }
                    let parens = list3(p, Some(open), inner, Some(close));
                    d = p.ptree.snoc(d, Some(parens));
                }
            }
            None => {
                // `f(int);` declares a function: when the nested
                // declarator fails but the parens open with a type
                // keyword, they are a parameter list, read below.
                if kind != DeclKind::Declarator || recursive {
                    return None;
                }
                p.reset(checkpoint);
                if !p.peek(1).is_integral_type()
                    && !matches!(p.peek(1), CONST_KW | VOLATILE_KW)
                {
                    return None;
                }
                name_encode.clear();
            }
        }
    } else if kind != DeclKind::Cast {
        let mut t = t;
        if t == INLINE_KW {
            // an inline specifier glued to the declarator is dropped
            p.advance();
            t = p.peek(0);
        }
        if kind == DeclKind::Declarator || t == IDENTIFIER || t == SCOPE {
            // an argument declarator may be abstract: "int (*)()"
            let id = names::name(p, name_encode)?;
            d = p.ptree.snoc(d, Some(id));
        }
    } else {
        name_encode.clear();
    }

    loop {
        match p.peek(0) {
            LEFT_PAREN => {
                // a function suffix
                let mut args_encode = EncodingBuf::new();
                let open = p.bump_leaf();
                let (args, is_args) = if p.at(RIGHT_PAREN) {
                    args_encode.start_func_args();
                    args_encode.void_type();
                    args_encode.end_func_args();
                    (None, true)
                } else {
                    arg_decl_list_or_init(p, &mut args_encode, is_statement)?
                };
                let close = p.take(RIGHT_PAREN)?;
                if is_args {
                    let tail = list3(p, Some(open), args, Some(close));
                    d = p.ptree.nconc(d, Some(tail));
                    let cv = opt_cv_qualify(p);
                    if cv.is_some() {
                        p.encode_cv(&mut args_encode, cv, None);
                        d = p.ptree.nconc(d, cv);
                    }
                } else {
                    let init = list3(p, Some(open), args, Some(close));
                    d = p.ptree.snoc(d, Some(init));
                }
                if !args_encode.is_empty() {
                    type_encode.function(&args_encode);
                }

                opt_throw_decl(p)?;

                if p.at(COLON) {
                    let mi = member_initializers(p)?;
                    d = p.ptree.snoc(d, Some(mi));
                }
                // "T f(int)(char)" is invalid
                break;
            }
            LEFT_BRACKET => {
                // an array suffix
                let open = p.bump_leaf();
                let expr =
                    if p.at(RIGHT_BRACKET) { None } else { Some(exprs::comma_expression(p)?) };
                let close = p.take(RIGHT_BRACKET)?;
                if let Some(expr) = expr {
                    match literal_array_size(p, expr) {
                        Some(size) => type_encode.array(size),
                        None => type_encode.array_unsized(),
                    }
                }
                let tail = list3(p, Some(open), expr, Some(close));
                d = p.ptree.nconc(d, Some(tail));
            }
            _ => break,
        }
    }

    if recursive_decl {
        type_encode.recursion(&recursive_encode);
    }
    if recursive {
        return Some(d);
    }
    let decl = p.ptree.retag(NodeKind::DECLARATOR, d);
    p.set_encoded_type(decl, type_encode);
    p.set_encoded_name(decl, name_encode);
    Some(Some(decl))
}

/// Array bounds are encoded only when they are literal integers; the
/// parser keeps no symbol table to fold anything else.
fn literal_array_size(p: &Parser, expr: NodeId) -> Option<u64> {
    if p.ptree.kind(expr) != NodeKind::LITERAL {
        return None;
    }
    let text = p.ptree.leaf_text(expr, p.stream.source())?;
    let digits = text.trim_end_matches(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8).ok()
    } else {
        digits.parse().ok()
    }
}

/*
  ptr.operator : (('*' | '&' | ptr.to.member) {cv.qualify})+
*/
pub(crate) fn opt_ptr_operator(
    p: &mut Parser,
    encode: &mut EncodingBuf,
) -> Option<Option<NodeId>> {
    let mut ptrs: Option<NodeId> = None;
    loop {
        let t = p.peek(0);
        if t != STAR && t != AMP && !is_ptr_to_member(p, 0) {
            break;
        }
        let op = if t == STAR || t == AMP {
            let token = p.advance();
            encode.ptr_operator(if t == STAR { '*' } else { '&' });
            p.leaf(token)
        } else {
            names::ptr_to_member(p, encode)?
        };
        ptrs = p.ptree.snoc(ptrs, Some(op));
        let cv = opt_cv_qualify(p);
        if cv.is_some() {
            ptrs = p.ptree.nconc(ptrs, cv);
            p.encode_cv(encode, cv, None);
        }
    }
    Some(ptrs)
}

/*
  member.initializers : ':' member.init (',' member.init)*
*/
fn member_initializers(p: &mut Parser) -> Option<NodeId> {
    let colon = p.take(COLON)?;
    let mut init = Some(p.ptree.cons(Some(colon), None));
    let m = member_init(p)?;
    init = p.ptree.snoc(init, Some(m));
    while p.at(COMMA) {
        let comma = p.bump_leaf();
        init = p.ptree.snoc(init, Some(comma));
        let m = member_init(p)?;
        init = p.ptree.snoc(init, Some(m));
    }
    init
}

/*
  member.init : name '(' function.arguments ')'
*/
fn member_init(p: &mut Parser) -> Option<NodeId> {
    let mut encode = EncodingBuf::new();
    let name = names::name(p, &mut encode)?;
    let name = names::name_node(p, name, &encode);
    let open = p.take(LEFT_PAREN)?;
    let args = function_arguments(p)?;
    let close = p.take(RIGHT_PAREN)?;
    let call = list3(p, Some(open), args, Some(close));
    Some(p.ptree.cons(Some(name), Some(call)))
}

/*
  arg.decl.list.or.init
  : arg.decl.list
  | function.arguments

  Declarations like `Point p(1, 3);` put function arguments where an
  argument declaration list would sit. When maybe_init is set the
  argument interpretation is tried first, so that `Point p(s, t);`
  reads s and t as variables rather than types.
*/
fn arg_decl_list_or_init(
    p: &mut Parser,
    encode: &mut EncodingBuf,
    maybe_init: bool,
) -> Option<(Option<NodeId>, bool)> {
    let checkpoint = p.mark();
    if maybe_init {
        if let Some(args) = function_arguments(p) {
            if p.at(RIGHT_PAREN) {
                encode.clear();
                return Some((args, false));
            }
        }
        p.reset(checkpoint);
        let args = arg_decl_list(p, encode)?;
        Some((args, true))
    } else {
        match arg_decl_list(p, encode) {
            Some(args) => Some((args, true)),
            None => {
                p.reset(checkpoint);
                encode.clear();
                let args = function_arguments(p)?;
                Some((args, false))
            }
        }
    }
}

/*
  arg.decl.list
  : empty
  | arg.declaration ( ',' arg.declaration )* {{ ',' } Ellipsis}
*/
fn arg_decl_list(p: &mut Parser, encode: &mut EncodingBuf) -> Option<Option<NodeId>> {
    encode.start_func_args();
    let mut list: Option<NodeId> = None;
    loop {
        match p.peek(0) {
            RIGHT_PAREN => {
                if list.is_none() {
                    encode.void_type();
                }
                break;
            }
            ELLIPSIS => {
                let ellipsis = p.bump_leaf();
                encode.ellipsis();
                list = p.ptree.snoc(list, Some(ellipsis));
                break;
            }
            _ => {
                let mut arg_encode = EncodingBuf::new();
                let d = arg_declaration(p, &mut arg_encode)?;
                encode.append_encoding(&arg_encode);
                list = p.ptree.snoc(list, Some(d));
                match p.peek(0) {
                    COMMA => {
                        let comma = p.bump_leaf();
                        list = p.ptree.snoc(list, Some(comma));
                    }
                    RIGHT_PAREN | ELLIPSIS => {}
                    _ => return None,
                }
            }
        }
    }
    encode.end_func_args();
    Some(list)
}

/*
  arg.declaration
  : {REGISTER} type.specifier arg.declarator {'=' initialize.expr}
*/
pub(crate) fn arg_declaration(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let header = if p.at(REGISTER_KW) { Some(p.bump_leaf()) } else { None };
    let type_name = type_specifier(p, encode)?;
    let mut name_encode = EncodingBuf::new();
    let arg = declarator(p, DeclKind::Arg, encode, &mut name_encode, true, false)?;
    let list = match header {
        Some(header) => list3(p, Some(header), Some(type_name), Some(arg)),
        None => list2(p, Some(type_name), Some(arg)),
    };
    let mut decl = p.ptree.retag(NodeKind::PARAMETER_DECLARATION, Some(list));
    if p.at(EQ) {
        let eq = p.bump_leaf();
        let default = initialize_expr(p)?;
        let tail = list2(p, Some(eq), Some(default));
        decl = p.ptree.nconc(Some(decl), Some(tail))?;
    }
    Some(decl)
}

/*
  initialize.expr
  : expression
  | '{' initialize.expr (',' initialize.expr)* {','} '}'
*/
pub(crate) fn initialize_expr(p: &mut Parser) -> Option<NodeId> {
    if !p.at(LEFT_BRACE) {
        return exprs::expression(p);
    }
    let open = p.bump_leaf();
    let mut elems: Option<NodeId> = None;
    while !p.at(RIGHT_BRACE) {
        let Some(e) = initialize_expr(p) else {
            if !p.mark_error() {
                return None;
            }
            p.skip_to(RIGHT_BRACE);
            let close = p.take(RIGHT_BRACE).unwrap_or_else(|| p.bump_leaf());
            return Some(list3(p, Some(open), None, Some(close)));
        };
        elems = p.ptree.snoc(elems, Some(e));
        match p.peek(0) {
            RIGHT_BRACE => break,
            COMMA => {
                let comma = p.bump_leaf();
                elems = p.ptree.snoc(elems, Some(comma));
            }
            _ => {
                if !p.mark_error() {
                    return None;
                }
                p.skip_to(RIGHT_BRACE);
                let close = p.take(RIGHT_BRACE).unwrap_or_else(|| p.bump_leaf());
                return Some(list3(p, Some(open), None, Some(close)));
            }
        }
    }
    let close = p.bump_leaf();
    let list = list3(p, Some(open), elems, Some(close));
    Some(p.ptree.retag(NodeKind::BRACE, Some(list)))
}

/*
  function.arguments : empty | expression (',' expression)*

  The next token after the arguments is expected to be ')'.
*/
pub(crate) fn function_arguments(p: &mut Parser) -> Option<Option<NodeId>> {
    let mut args: Option<NodeId> = None;
    if p.at(RIGHT_PAREN) {
        return Some(None);
    }
    loop {
        let exp = exprs::expression(p)?;
        args = p.ptree.snoc(args, Some(exp));
        if !p.at(COMMA) {
            return Some(args);
        }
        let comma = p.bump_leaf();
        args = p.ptree.snoc(args, Some(comma));
    }
}

/*
  enum.spec
  : ENUM Identifier
  | ENUM {Identifier} '{' {enum.body} '}'
*/
fn enum_spec(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    let keyword = p.take(ENUM_KW)?;
    let mut spec = Some(p.ptree.cons(Some(keyword), None));
    let spec_node = p.ptree.retag(NodeKind::ENUM_SPEC, spec);
    spec = Some(spec_node);
    if p.at(IDENTIFIER) {
        let name = p.advance();
        encode.simple_name(p.token_text(name));
        let name = p.leaf(name);
        p.set_encoded_name(spec_node, encode);
        spec = p.ptree.snoc(spec, Some(name));
        if !p.at(LEFT_BRACE) {
            return spec;
        }
    } else {
        encode.anonymous(p.next_anon());
        p.set_encoded_name(spec_node, encode);
        spec = p.ptree.snoc(spec, None);
    }
    let open = p.take(LEFT_BRACE)?;
    let body = if p.at(RIGHT_BRACE) { None } else { enum_body(p)? };
    let close = p.take(RIGHT_BRACE)?;
    let comments = p.wrap_comments();
    p.ptree.set_comments(close, comments);
    let brace = list3(p, Some(open), body, Some(close));
    let brace = p.ptree.retag(NodeKind::BRACE, Some(brace));
    p.ptree.snoc(spec, Some(brace))
}

/*
  enum.body
  : Identifier {'=' expression} (',' Identifier {'=' expression}) {','}
*/
fn enum_body(p: &mut Parser) -> Option<Option<NodeId>> {
    let mut body: Option<NodeId> = None;
    loop {
        if p.at(RIGHT_BRACE) {
            return Some(body);
        }
        let ident = p.take(IDENTIFIER)?;
        let comments = p.wrap_comments();
        p.ptree.set_comments(ident, comments);
        let name = if p.at(EQ) {
            let eq = p.bump_leaf();
            let Some(exp) = exprs::expression(p) else {
                if !p.mark_error() {
                    return None;
                }
                p.skip_to(RIGHT_BRACE);
                return Some(None);
            };
            list3(p, Some(ident), Some(eq), Some(exp))
        } else {
            ident
        };
        if p.at(COMMA) {
            let comma = p.bump_leaf();
            let pair = list2(p, Some(name), Some(comma));
            body = p.ptree.nconc(body, Some(pair));
        } else {
            return Some(p.ptree.snoc(body, Some(name)));
        }
    }
}

/*
  class.spec
  : class.key class.body
  | class.key name {class.body}
  | class.key name ':' base.specifiers class.body

  class.key : CLASS | STRUCT | UNION
*/
fn class_spec(p: &mut Parser, encode: &mut EncodingBuf) -> Option<NodeId> {
    if !matches!(p.peek(0), CLASS_KW | STRUCT_KW | UNION_KW) {
        return None;
    }
    let keyword = p.bump_leaf();
    let list = Some(p.ptree.cons(Some(keyword), None));
    let spec = p.ptree.retag(NodeKind::CLASS_SPEC, list);
    let comments = p.pending_comments.take();
    p.ptree.set_comments(spec, comments);
    let mut node = Some(spec);

    if p.at(LEFT_BRACE) {
        encode.anonymous(p.next_anon());
        let empty_name = list2(p, None, None);
        node = p.ptree.snoc(node, Some(empty_name));
    } else {
        let name = names::name(p, encode)?;
        node = p.ptree.snoc(node, Some(name));
        match p.peek(0) {
            COLON => {
                let bases = base_specifiers(p)?;
                node = p.ptree.snoc(node, Some(bases));
            }
            LEFT_BRACE => {
                node = p.ptree.snoc(node, None);
            }
            _ => {
                // an elaborated type specifier, `class.key name`
                p.set_encoded_name(spec, encode);
                return node;
            }
        }
    }
    p.set_encoded_name(spec, encode);

    let body = class_body(p)?;
    p.ptree.snoc(node, Some(body))
}

/*
  base.specifiers : ':' base.specifier (',' base.specifier)*

  base.specifier
  : {{VIRTUAL} (PUBLIC | PROTECTED | PRIVATE) {VIRTUAL}} name
*/
fn base_specifiers(p: &mut Parser) -> Option<NodeId> {
    let colon = p.take(COLON)?;
    let mut bases = Some(p.ptree.cons(Some(colon), None));
    loop {
        let mut super_: Option<NodeId> = None;
        if p.at(VIRTUAL_KW) {
            let keyword = p.bump_leaf();
            super_ = p.ptree.snoc(super_, Some(keyword));
        }
        if matches!(p.peek(0), PUBLIC_KW | PROTECTED_KW | PRIVATE_KW) {
            let access = p.bump_leaf();
            super_ = p.ptree.snoc(super_, Some(access));
        }
        if p.at(VIRTUAL_KW) {
            let keyword = p.bump_leaf();
            super_ = p.ptree.snoc(super_, Some(keyword));
        }
        let mut encode = EncodingBuf::new();
        let name = names::name(p, &mut encode)?;
        let name = names::name_node(p, name, &encode);
        super_ = p.ptree.snoc(super_, Some(name));
        bases = p.ptree.snoc(bases, super_);
        if !p.at(COMMA) {
            return bases;
        }
        let comma = p.bump_leaf();
        bases = p.ptree.snoc(bases, Some(comma));
    }
}

/*
  class.body : '{' (class.members)* '}'
*/
fn class_body(p: &mut Parser) -> Option<NodeId> {
    let open = p.take(LEFT_BRACE)?;
    let mut members: Option<NodeId> = None;
    while !p.at(RIGHT_BRACE) {
        let Some(member) = class_member(p) else {
            if !p.mark_error() {
                return None;
            }
            p.skip_to(RIGHT_BRACE);
            let close = p.take(RIGHT_BRACE).unwrap_or_else(|| p.bump_leaf());
            return Some(list3(p, Some(open), None, Some(close)));
        };
        p.discard_comments();
        members = p.ptree.snoc(members, Some(member));
    }
    let close = p.bump_leaf();
    let comments = p.wrap_comments();
    p.ptree.set_comments(close, comments);
    let list = list3(p, Some(open), members, Some(close));
    Some(p.ptree.retag(NodeKind::CLASS_BODY, Some(list)))
}

/*
  class.member
  : (PUBLIC | PROTECTED | PRIVATE) ':'
  | ';'
  | type.def
  | template.decl
  | using.declaration
  | declaration
  | access.decl
*/
fn class_member(p: &mut Parser) -> Option<NodeId> {
    match p.peek(0) {
        PUBLIC_KW | PROTECTED_KW | PRIVATE_KW => {
            let access = p.bump_leaf();
            let colon = p.take(COLON)?;
            let tail = p.ptree.cons(Some(colon), None);
            Some(p.ptree.composite(NodeKind::ACCESS_SPEC, Some(access), Some(tail)))
        }
        SEMICOLON => null_declaration(p),
        TYPEDEF_KW => typedef_(p),
        TEMPLATE_KW => template_decl(p),
        USING_KW => using_(p),
        _ => {
            let checkpoint = p.mark();
            if let Some(decl) = declaration(p) {
                let comments = p.wrap_comments();
                p.set_declarator_comments(Some(decl), comments);
                return Some(decl);
            }
            p.reset(checkpoint);
            access_decl(p)
        }
    }
}

/*
  access.decl : name ';'

  e.g. <qualified class>::<member name>;
*/
fn access_decl(p: &mut Parser) -> Option<NodeId> {
    let mut encode = EncodingBuf::new();
    let name = names::name(p, &mut encode)?;
    let name = names::name_node(p, name, &encode);
    let semicolon = p.take(SEMICOLON)?;
    let tail = p.ptree.cons(Some(semicolon), None);
    Some(p.ptree.composite(NodeKind::ACCESS_DECL, Some(name), Some(tail)))
}
