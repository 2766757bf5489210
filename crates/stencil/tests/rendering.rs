use std::fs;
use std::path::Path;

use serde_json::json;
use stencil::{TemplateEncoder, Value};
use tempfile::TempDir;

fn create_template_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn render(encoder: &TemplateEncoder, value: &Value) -> String {
    let mut out = Vec::new();
    encoder.write_value(value, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_dictionary_variables() {
    let dir = TempDir::new().unwrap();
    create_template_file(
        dir.path(),
        "dictionary.txt",
        "{a={{a}},b={{b}},c.d={{c.d}},e={{e}},f.g={{f.g}}",
    );

    let encoder = TemplateEncoder::new(dir.path().join("dictionary.txt"), "text/plain");
    let value = Value::from(json!({"a": "hello", "b": 42, "c": {"d": false}}));

    assert_eq!(render(&encoder, &value), "{a=hello,b=42,c.d=false,e=,f.g=");
}

#[test]
fn test_null_value_emits_nothing() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "dictionary.txt", "{{a}}");

    let encoder = TemplateEncoder::new(dir.path().join("dictionary.txt"), "text/plain");
    let mut out = Vec::new();
    encoder.write_value(&Value::Null, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_single_element_section() {
    let dir = TempDir::new().unwrap();
    create_template_file(
        dir.path(),
        "section.txt",
        "[{{#list}}{a={{a}},b={{b}},c={{c}}}{{/}}]",
    );

    let encoder = TemplateEncoder::new(dir.path().join("section.txt"), "text/plain");
    let value = Value::from(json!({"list": [{"a": "hello", "b": 1, "c": 2.0}]}));

    assert_eq!(render(&encoder, &value), "[{a=hello,b=1,c=2.0}]");
}

#[test]
fn test_multi_element_section() {
    let dir = TempDir::new().unwrap();
    create_template_file(
        dir.path(),
        "section.txt",
        "[{{#list}}{a={{a}},b={{b}},c={{c}}}{{/}}]",
    );

    let encoder = TemplateEncoder::new(dir.path().join("section.txt"), "text/plain");
    let value = Value::from(json!({
        "list": [
            {"a": "hello", "b": 1, "c": 2.0},
            {"a": "goodbye", "b": 2, "c": 4.0},
        ]
    }));

    assert_eq!(
        render(&encoder, &value),
        "[{a=hello,b=1,c=2.0}{a=goodbye,b=2,c=4.0}]"
    );
}

#[test]
fn test_empty_section() {
    let dir = TempDir::new().unwrap();
    create_template_file(
        dir.path(),
        "section.txt",
        "[{{#list}}{a={{a}},b={{b}},c={{c}}}{{/}}]",
    );

    let encoder = TemplateEncoder::new(dir.path().join("section.txt"), "text/plain");
    let value = Value::from(json!({"list": []}));

    assert_eq!(render(&encoder, &value), "[]");
}

#[test]
fn test_section_separator_over_root_sequence() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "joined.txt", "{{#.[,]}}{{.}}{{/}}");

    let encoder = TemplateEncoder::new(dir.path().join("joined.txt"), "text/plain");
    let value = Value::from(json!(["a", "b", "c"]));

    assert_eq!(render(&encoder, &value), "a,b,c");
}

#[test]
fn test_section_separator_by_name() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "joined.txt", "{{#list[,]}}{{.}}{{/}}");

    let encoder = TemplateEncoder::new(dir.path().join("joined.txt"), "text/plain");
    let value = Value::from(json!({"list": ["a", "b", "c"]}));

    assert_eq!(render(&encoder, &value), "a,b,c");
}

#[test]
fn test_primitive_section_elements() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "section.txt", "[{{#.}}({{.}}){{/}}]");

    let encoder = TemplateEncoder::new(dir.path().join("section.txt"), "text/plain");
    let value = Value::from(json!(["hello", 42, false]));

    assert_eq!(render(&encoder, &value), "[(hello)(42)(false)]");
}

#[test]
fn test_deeply_nested_sections() {
    let dir = TempDir::new().unwrap();
    create_template_file(
        dir.path(),
        "nested.txt",
        "[{{#.}}[{{#.}}[{{#.}}{{.}}{{/}}]{{/}}]{{/}}]",
    );

    let encoder = TemplateEncoder::new(dir.path().join("nested.txt"), "text/plain");

    assert_eq!(
        render(&encoder, &Value::from(json!([[["hello"]]]))),
        "[[[hello]]]"
    );
    assert_eq!(render(&encoder, &Value::from(json!([]))), "[]");
}

#[test]
fn test_comment() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "comment.txt", ">{{!ignore me}}<");

    let encoder = TemplateEncoder::new(dir.path().join("comment.txt"), "text/plain");
    assert_eq!(render(&encoder, &Value::from(json!({}))), "><");
}

#[test]
fn test_simple_include() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "master.txt", "({{>leaf.txt}})");
    create_template_file(dir.path(), "leaf.txt", "{{.}}");

    let encoder = TemplateEncoder::new(dir.path().join("master.txt"), "text/plain");
    assert_eq!(render(&encoder, &Value::from("hello")), "(hello)");
}

#[test]
fn test_include_twice_matches_inlined() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "master.txt", "({{>leaf.txt}})({{>leaf.txt}})");
    create_template_file(dir.path(), "inlined.txt", "({{.}})({{.}})");
    create_template_file(dir.path(), "leaf.txt", "{{.}}");

    let included = TemplateEncoder::new(dir.path().join("master.txt"), "text/plain");
    let inlined = TemplateEncoder::new(dir.path().join("inlined.txt"), "text/plain");

    let value = Value::from("hello");
    assert_eq!(render(&included, &value), render(&inlined, &value));
}

#[test]
fn test_include_inside_section() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "master.txt", "[{{#.}}{{>item.txt}}{{/}}]");
    create_template_file(dir.path(), "item.txt", "({{.}})");

    let encoder = TemplateEncoder::new(dir.path().join("master.txt"), "text/plain");
    let value = Value::from(json!(["a", "b", "c"]));

    assert_eq!(render(&encoder, &value), "[(a)(b)(c)]");
}

#[test]
fn test_self_including_template_terminates() {
    let dir = TempDir::new().unwrap();
    create_template_file(
        dir.path(),
        "recursion.txt",
        "[{{#.}}{{>recursion.txt}}{{/}}]",
    );

    let encoder = TemplateEncoder::new(dir.path().join("recursion.txt"), "text/plain");

    let value = Value::from(json!([
        [[], []],
        [[], [], []],
        [[]]
    ]));
    assert_eq!(render(&encoder, &value), "[[[][]][[][][]][[]]]");

    assert_eq!(render(&encoder, &Value::from(json!([]))), "[]");
}

#[test]
fn test_literal_template_preserved() {
    let dir = TempDir::new().unwrap();
    let text = "no markers here: 100% { literal } text\nsecond line";
    create_template_file(dir.path(), "literal.txt", text);

    let encoder = TemplateEncoder::new(dir.path().join("literal.txt"), "text/plain");
    assert_eq!(render(&encoder, &Value::from(json!({}))), text);
}

#[test]
fn test_html_escape_modifier() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "markup.txt", "{{v:^html}}");

    let encoder = TemplateEncoder::new(dir.path().join("markup.txt"), "text/plain");
    let value = Value::from(json!({"v": "a<b>c&d\"e"}));

    assert_eq!(render(&encoder, &value), "a&lt;b&gt;c&amp;d&quot;e");
}

#[test]
fn test_csv_escape_modifier() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "csv.txt", "{{.:^csv}}");

    let encoder = TemplateEncoder::new(dir.path().join("csv.txt"), "text/plain");
    assert_eq!(render(&encoder, &Value::from("a\"b\"c")), "a\"\"b\"\"c");
}

#[test]
fn test_float_format_modifier() {
    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "format.txt", "{{.:format=%.2f}}");

    let encoder = TemplateEncoder::new(dir.path().join("format.txt"), "text/plain");
    assert_eq!(render(&encoder, &Value::from(4.5)), "4.50");
}

#[test]
fn test_write_serializable() {
    #[derive(serde::Serialize)]
    struct Report {
        title: String,
        count: usize,
    }

    let dir = TempDir::new().unwrap();
    create_template_file(dir.path(), "report.txt", "{{title}} ({{count}})");

    let encoder = TemplateEncoder::new(dir.path().join("report.txt"), "text/plain");
    let mut out = Vec::new();
    encoder
        .write(
            &Report {
                title: "Inventory".into(),
                count: 3,
            },
            &mut out,
        )
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Inventory (3)");
}
