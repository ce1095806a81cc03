use cxxfront_errors::{Collector, MAX_ERRORS};
use cxxfront_ptree::{NodeId, NodeKind, Ptree};
use expect_test::{Expect, expect};

use crate::{Parse, RuleSet, translation_unit};

fn parse(text: &str) -> (Parse, Collector) {
    parse_with(text, RuleSet::strict())
}

fn parse_with(text: &str, rules: RuleSet) -> (Parse, Collector) {
    let mut collector = Collector::new();
    let parse = translation_unit(text, rules, &mut collector);
    (parse, collector)
}

fn check(text: &str, expect: Expect) {
    let (parse, collector) = parse(text);
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
    expect.assert_eq(&parse.ptree.display(parse.unit, text));
}

/// The sole declarator of the first toplevel declaration.
fn first_declarator(parse: &Parse) -> NodeId {
    let ptree = &parse.ptree;
    let decl = ptree.first(parse.unit).expect("no definitions");
    let declarators = ptree.nth(Some(decl), 2).expect("no declarator list");
    ptree.first(Some(declarators)).expect("empty declarator list")
}

fn encoded_type(ptree: &Ptree, id: NodeId) -> &[u8] {
    ptree.encoded_type(id).expect("no encoded type").bytes()
}

fn encoded_name(ptree: &Ptree, id: NodeId) -> &[u8] {
    ptree.encoded_name(id).expect("no encoded name").bytes()
}

#[test]
fn integral_declaration() {
    check("int a;", expect![[r#"[[nil [int] [[a]] ;]]"#]]);

    let (parse, _) = parse("int a;");
    let declarator = first_declarator(&parse);
    assert_eq!(parse.ptree.kind(declarator), NodeKind::DECLARATOR);
    assert_eq!(encoded_type(&parse.ptree, declarator), b"i");
    assert_eq!(encoded_name(&parse.ptree, declarator), b"\x81a");
}

#[test]
fn unsigned_long_long() {
    let (parse, collector) = parse("unsigned long long x;");
    assert_eq!(collector.error_count(), 0);
    let declarator = first_declarator(&parse);
    assert_eq!(encoded_type(&parse.ptree, declarator), b"Uj");
}

#[test]
fn function_prototype() {
    check("void f(int);", expect![[r#"[[nil [void] [[f ( [[[int] [nil]]] )]] ;]]"#]]);

    let (parse, _) = parse("void f(int);");
    let declarator = first_declarator(&parse);
    assert_eq!(encoded_type(&parse.ptree, declarator), b"Fi_v");
    assert_eq!(encoded_name(&parse.ptree, declarator), b"\x81f");
}

#[test]
fn nested_template_arguments() {
    // The `>>` closing two template argument lists splits in place.
    let (parse, collector) = parse("Foo<Bar<int>> x;");
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
    let declarator = first_declarator(&parse);
    assert_eq!(encoded_type(&parse.ptree, declarator), b"T\x83Foo\x87T\x83Bar\x81i");
    assert_eq!(encoded_name(&parse.ptree, declarator), b"\x81x");
}

#[test]
fn constructor_style_declaration() {
    // `T (a);` reads as a constructor declaration, not a variable.
    check("T (a);", expect![[r#"[[nil nil [[T ( [[a [nil]]] )]] ;]]"#]]);

    let (parse, _) = parse("T (a);");
    let declarator = first_declarator(&parse);
    assert_eq!(parse.ptree.kind(declarator), NodeKind::DECLARATOR);
    assert_eq!(encoded_name(&parse.ptree, declarator), b"\x81T");
}

#[test]
fn qualified_function_definition() {
    let text = "int X::f() { return 0; }";
    let (parse, collector) = parse(text);
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
    expect![[r#"[[nil [int] [[X :: f] ( nil )] [{ [[return 0 ;]] }]]]"#]]
        .assert_eq(&parse.ptree.display(parse.unit, text));

    let def = parse.ptree.first(parse.unit).expect("no definitions");
    assert_eq!(parse.ptree.kind(def), NodeKind::FUNCTION_DEFINITION);
    let declarator = parse.ptree.nth(Some(def), 2).expect("no declarator");
    assert_eq!(encoded_name(&parse.ptree, declarator), b"Q\x82\x81X\x81f");
    assert_eq!(encoded_type(&parse.ptree, declarator), b"Fv_i");
}

#[test]
fn operator_name() {
    let (parse, collector) = parse("int operator+(X a, X b);");
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
    let declarator = first_declarator(&parse);
    assert_eq!(encoded_name(&parse.ptree, declarator), b"\x81+");
}

#[test]
fn using_directive_consumes_semicolon() {
    check("using namespace std; int a;", expect![[r#"[[using namespace [std] ;] [nil [int] [[a]] ;]]"#]]);
}

#[test]
fn class_with_base_and_members() {
    check(
        "class X : public Base { public: int m; };",
        expect![[
            r#"[[nil [class X [: [public Base]] [{ [[public :] [nil [int] [[m]] ;]] }]] ;]]"#
        ]],
    );
}

#[test]
fn enum_with_values() {
    check("enum E { A, B = 2 };", expect![[r#"[[nil [enum E [{ [A , [B = 2]] }]] ;]]"#]]);

    let (parse, _) = parse("enum E { A, B = 2 };");
    let decl = parse.ptree.first(parse.unit).expect("no definitions");
    let spec = parse.ptree.second(Some(decl)).expect("no enum spec");
    assert_eq!(parse.ptree.kind(spec), NodeKind::ENUM_SPEC);
    assert_eq!(encoded_name(&parse.ptree, spec), b"\x81E");
}

#[test]
fn control_flow_statements() {
    check(
        "void f() { if (a < b) return; else x = 1; }",
        expect![[
            r#"[[nil [void] [f ( nil )] [{ [[if ( [a < b] ) [return ;] else [[x = 1] ;]]] }]]]"#
        ]],
    );
}

#[test]
fn relational_operators_in_comma_statement() {
    // `a < b, c > d;` could also be read as a declaration with the
    // template-id type `a<b,c>`; the relational reading wins.
    let text = "void g() { a < b, c > d; }";
    check(
        text,
        expect![[r#"[[nil [void] [g ( nil )] [{ [[[[a < b] , [c > d]] ;]] }]]]"#]],
    );

    let (parse, _) = parse(text);
    let def = parse.ptree.first(parse.unit);
    let body = parse.ptree.nth(def, 3);
    let statement = parse.ptree.first(parse.ptree.nth(body, 1));
    assert_eq!(parse.ptree.kind(statement.expect("no statement")), NodeKind::EXPR_STATEMENT);
}

#[test]
fn most_vexing_parse_prefers_declaration() {
    // `f(int);` declares a function taking int, it is not a call.
    let text = "void h() { f(int); }";
    check(
        text,
        expect![[r#"[[nil [void] [h ( nil )] [{ [[nil f [[( [[[int] [nil]]] )]] ;]] }]]]"#]],
    );

    let (parse, _) = parse(text);
    let def = parse.ptree.first(parse.unit);
    let body = parse.ptree.nth(def, 3);
    let statement = parse.ptree.first(parse.ptree.nth(body, 1));
    assert_eq!(parse.ptree.kind(statement.expect("no statement")), NodeKind::DECLARATION);
}

#[test]
fn constructor_definition_with_member_initializers() {
    let (parse, collector) = parse("X::X() : m(1), n(2) { }");
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
    let def = parse.ptree.first(parse.unit).expect("no definitions");
    assert_eq!(parse.ptree.kind(def), NodeKind::FUNCTION_DEFINITION);
}

#[test]
fn directives_are_skipped() {
    check("#include <x.h>\nint a;\n", expect![[r#"[[nil [int] [[a]] ;]]"#]]);
}

#[test]
fn loops_and_jumps() {
    let text = "void f() { for (i = 0; i < n; i++) { if (i == 3) continue; g(i); } }";
    let (_, collector) = parse(text);
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
}

#[test]
fn new_and_delete_expressions() {
    let text = "void f() { p = new int[10]; q = new X(1, 2); delete [] p; ::delete q; }";
    let (_, collector) = parse(text);
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
}

#[test]
fn function_style_cast() {
    let (_, collector) = parse("void f() { x = int(3); }");
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
}

#[test]
fn try_and_throw() {
    let text = "void f() { try { g(); } catch (E& e) { throw; } catch (...) { throw E(); } }";
    let (_, collector) = parse(text);
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
}

#[test]
fn typeof_requires_gnu_rules() {
    let (_, collector) = parse_with("typeof(x) y;", RuleSet::gnu());
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
}

#[test]
fn template_class_definition() {
    let (_, collector) = parse("template <class T> class Foo { T value; };");
    assert_eq!(collector.error_count(), 0, "diagnostics: {:#?}", collector.diagnostics());
}

#[test]
fn comment_attaches_to_declaration() {
    let text = "// note\nint a;\n";
    let (parse, collector) = parse(text);
    assert_eq!(collector.error_count(), 0);
    let decl = parse.ptree.first(parse.unit).expect("no definitions");
    let comments = parse.ptree.comments(decl).expect("comment lost");
    assert_eq!(parse.ptree.display(Some(comments), text), "[// note]");
}

#[test]
fn recovery_skips_to_semicolon() {
    let (parse, collector) = parse("@ @; int a;");
    assert_eq!(collector.error_count(), 1);
    assert!(collector.diagnostics()[0].message().contains("parse error"));
    // The good declaration after the bad one still parses.
    assert_eq!(parse.ptree.length(parse.unit), Some(1));
}

#[test]
fn encodings_are_deterministic() {
    let text = "const Foo<int>* X::f(char, ...);";
    let (a, _) = parse(text);
    let (b, _) = parse(text);
    let da = first_declarator(&a);
    let db = first_declarator(&b);
    assert_eq!(encoded_type(&a.ptree, da), encoded_type(&b.ptree, db));
    assert_eq!(encoded_name(&a.ptree, da), encoded_name(&b.ptree, db));
}

#[test]
fn error_ceiling_stops_the_parse() {
    let text = "@; ".repeat(MAX_ERRORS + 2);
    let (parse, collector) = parse(&text);
    assert_eq!(collector.error_count(), MAX_ERRORS);
    assert!(parse.unit.is_none());
}
