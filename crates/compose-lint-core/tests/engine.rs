//! Integration test: custom rules end-to-end through the public API.
//!
//! Trees come from the fixture builders and from a hand-driven
//! `TreeBuilder`, the way a parser adapter would produce them.

use compose_lint_core::fixture::{FileBuilder, FunctionBuilder, Param};
use compose_lint_core::tree::{FileData, FunctionData, NodeData, ParameterData};
use compose_lint_core::{
    ConfigError, Configuration, Emitter, FunctionRef, Hook, Hooks, Linter, MutationHandle,
    NodeKind, Rule, RuleError, RuleVisitor, SourceFile, TreeBuilder,
};

/// Requires an `Int` parameter to default to `0`; fixable.
struct IntDefault;

struct IntDefaultVisitor;

impl RuleVisitor for IntDefaultVisitor {
    fn visit_function(
        &mut self,
        function: &FunctionRef<'_>,
        emitter: &mut Emitter<'_>,
        mut fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        for parameter in function.parameters() {
            if parameter.type_name() != "Int" || parameter.has_default_value() {
                continue;
            }
            emitter.report(
                &parameter,
                format!("`{}` should default to 0.", parameter.name()),
                true,
            );
            if let Some(handle) = fix.as_deref_mut() {
                handle.set_default_value(&parameter, "0")?;
            }
        }
        Ok(())
    }
}

impl Rule for IntDefault {
    fn name(&self) -> &'static str {
        "test:int-default"
    }
    fn code(&self) -> &'static str {
        "T100"
    }
    fn hooks(&self) -> Hooks {
        Hooks::EMPTY.with(Hook::Function)
    }
    fn start_file(&self, _: &Configuration) -> Result<Box<dyn RuleVisitor>, ConfigError> {
        Ok(Box::new(IntDefaultVisitor))
    }
}

fn linter() -> Linter {
    Linter::builder()
        .rule(IntDefault)
        .build()
        .expect("linter should build")
}

fn sample() -> SourceFile {
    FileBuilder::new()
        .function(
            FunctionBuilder::new("pad")
                .param(Param::new("left", "Int"))
                .param(Param::new("right", "Int")),
        )
        .function(FunctionBuilder::new("label").param(Param::new("count", "Int")))
        .source("Sample.kt")
        .expect("fixture should render")
}

#[test]
fn violations_serialize_to_wire_format() {
    let report = linter().lint(&sample()).expect("lint should succeed");
    insta::assert_json_snapshot!(report.violations, @r###"
    [
      {
        "line": 1,
        "column": 9,
        "ruleId": "test:int-default",
        "message": "`left` should default to 0.",
        "autoFixed": false
      },
      {
        "line": 1,
        "column": 20,
        "ruleId": "test:int-default",
        "message": "`right` should default to 0.",
        "autoFixed": false
      },
      {
        "line": 3,
        "column": 11,
        "ruleId": "test:int-default",
        "message": "`count` should default to 0.",
        "autoFixed": false
      }
    ]
    "###);
}

#[test]
fn lint_is_deterministic_and_does_not_mutate() {
    let file = sample();
    let linter = linter();
    let first = linter.lint(&file).expect("first run");
    let second = linter.lint(&file).expect("second run");
    assert_eq!(first, second);
    assert_eq!(file, sample());
}

#[test]
fn fix_rewrites_source_and_reaches_fixed_point() {
    let linter = linter();
    let fixed = linter.lint_and_fix(sample()).expect("fix should succeed");
    assert_eq!(
        fixed.source,
        "fun pad(left: Int = 0, right: Int = 0) {\n}\nfun label(count: Int = 0) {\n}\n"
    );
    assert!(fixed.report.violations.iter().all(|v| v.auto_fixed));

    // Positions refer to the rewritten text.
    let columns: Vec<(usize, usize)> = fixed
        .report
        .violations
        .iter()
        .map(|v| (v.location.line, v.location.column))
        .collect();
    assert_eq!(columns, [(1, 9), (1, 24), (3, 11)]);

    let again = linter
        .lint_and_fix(SourceFile::new("Sample.kt", fixed.tree))
        .expect("second fix should succeed");
    assert!(again.report.violations.is_empty());
    assert_eq!(again.source, fixed.source);
}

#[test]
fn json_round_trip_uses_camel_case_keys() {
    let report = linter().lint(&sample()).expect("lint should succeed");
    let value = serde_json::to_value(&report.violations[0]).expect("serializes");
    let keys: Vec<&str> = value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, ["autoFixed", "column", "line", "message", "ruleId"]);
}

#[test]
fn tree_builder_output_is_linted_like_fixtures() {
    let mut builder = TreeBuilder::new();
    builder.start_node(NodeKind::File, NodeData::File(FileData::default()));
    builder.start_node(
        NodeKind::FunctionDeclaration,
        NodeData::Function(FunctionData {
            name: "f".into(),
            ..FunctionData::default()
        }),
    );
    for token in ["fun", " ", "f"] {
        builder.token(token);
    }
    builder.start_node(NodeKind::ParameterList, NodeData::None);
    builder.token("(");
    builder.start_node(
        NodeKind::Parameter,
        NodeData::Parameter(ParameterData {
            name: "n".into(),
            type_name: "Int".into(),
        }),
    );
    for token in ["n", ":", " ", "Int"] {
        builder.token(token);
    }
    builder.finish_node();
    builder.token(")");
    builder.finish_node();
    builder.finish_node();
    builder.token("\n");
    builder.finish_node();
    let tree = builder.finish().expect("balanced tree");

    let fixed = linter()
        .lint_and_fix(SourceFile::new("Built.kt", tree))
        .expect("fix should succeed");
    assert_eq!(fixed.source, "fun f(n: Int = 0)\n");
    assert_eq!(fixed.report.violations.len(), 1);
    assert!(fixed.report.violations[0].auto_fixed);
}
