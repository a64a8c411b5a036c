// tests/lang_tests.rs

use im::HashMap;
use templex::{
    lang, ErrorKind, Evaluable, EvaluationContext, ParserContext, Template, Value,
};

fn vars() -> EvaluationContext {
    let json = r#"{
        "name": "Ada",
        "user": { "name": "Grace", "tags": ["admin", "ops"], "first name": "G" },
        "count": 3
    }"#;
    let vars: HashMap<String, Value> = serde_json::from_str(json).unwrap();
    EvaluationContext::with_vars(vars)
}

fn render(text: &str) -> String {
    lang::template_parser()
        .parse_template(text, &ParserContext::template())
        .unwrap()
        .value_as_string(&vars())
        .unwrap()
}

#[test]
fn test_render_variables_and_paths() {
    assert_eq!(render("Hello #{name}!"), "Hello Ada!");
    assert_eq!(render("#{user.name} is #{user.tags[0]}"), "Grace is admin");
    assert_eq!(render("#{user['first name']}."), "G.");
    assert_eq!(render("n=#{count}"), "n=3");
}

#[test]
fn test_render_literals() {
    assert_eq!(render("#{ 'a}b' }"), "a}b");
    assert_eq!(render("#{ (1, 'two', true) }"), "[1, two, true]");
    assert_eq!(render("[#{ (count) }]"), "[3]");
}

#[test]
fn test_nil_renders_as_empty_in_composites() {
    assert_eq!(render("a#{missing}b"), "ab");
    assert_eq!(render("a#{null}b"), "ab");
}

#[test]
fn test_single_expression_keeps_its_value() {
    let template = lang::template_parser()
        .parse_template("#{user.tags}", &ParserContext::template())
        .unwrap();
    assert!(matches!(template, Template::Expression(_)));
    assert_eq!(
        template.value(&vars()).unwrap(),
        Value::List(vec![Value::from("admin"), Value::from("ops")])
    );
}

#[test]
fn test_single_path_is_writable() {
    let template = lang::template_parser()
        .parse_template("#{user.name}", &ParserContext::template())
        .unwrap();
    let mut ctx = vars();
    assert!(template.is_writable(&ctx));
    template.set_value(&mut ctx, Value::from("Hopper")).unwrap();
    assert_eq!(render_with("#{user.name}", &ctx), "Hopper");
}

#[test]
fn test_composite_is_not_writable() {
    let template = lang::template_parser()
        .parse_template("x#{name}", &ParserContext::template())
        .unwrap();
    let mut ctx = vars();
    assert!(!template.is_writable(&ctx));
    let err = template.set_value(&mut ctx, Value::from("y")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotWritable { .. }));
}

#[test]
fn test_literal_is_not_writable() {
    let template = lang::template_parser()
        .parse_expression("'fixed'", None)
        .unwrap();
    assert!(!template.is_writable(&vars()));
}

#[test]
fn test_sub_parser_error_positions_are_template_relative() {
    let err = lang::template_parser()
        .parse_template("Hi #{ a. }", &ParserContext::template())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SubParser { .. }));
    let pos = err.offset().unwrap();
    assert!((7..=8).contains(&pos), "unexpected position {pos}");
}

#[test]
fn test_sub_parser_error_positions_count_characters() {
    let err = lang::template_parser()
        .parse_template("é #{ a. }", &ParserContext::template())
        .unwrap_err();
    let pos = err.offset().unwrap();
    assert!((6..=7).contains(&pos), "unexpected position {pos}");
    assert_eq!(err.span.start, pos + 1);
}

#[test]
fn test_raw_expression_parsing() {
    let template = lang::template_parser()
        .parse_expression("user.tags[1]", None)
        .unwrap();
    assert_eq!(template.value(&vars()).unwrap(), Value::from("ops"));

    let err = lang::template_parser().parse_expression("  ", None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::BlankExpression);
}

#[test]
fn test_evaluation_errors() {
    let template = lang::template_parser()
        .parse_expression("user.tags[5]", None)
        .unwrap();
    let err = template.value(&vars()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Evaluation { .. }));

    let template = lang::template_parser()
        .parse_expression("count.size", None)
        .unwrap();
    assert!(template.value(&vars()).is_err());
}

fn render_with(text: &str, ctx: &EvaluationContext) -> String {
    lang::template_parser()
        .parse_template(text, &ParserContext::template())
        .unwrap()
        .value_as_string(ctx)
        .unwrap()
}
