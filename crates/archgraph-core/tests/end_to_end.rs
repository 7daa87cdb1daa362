//! Integration test: class-file bytes → Importer → graph → rules.
//!
//! Fixtures are assembled with `ClassFileBuilder`, so every test runs the
//! reader, the graph builder and the engines together.

use archgraph_core::graph::Anomaly;
use archgraph_core::predicate::{
    annotated_with, meta_annotated_with, named, reside_in, the_hierarchy_of_a_class_that,
};
use archgraph_core::testing::{AnnotationSpec, ClassFileBuilder, Insn, MethodSpec};
use archgraph_core::{
    detect_cycles, Artifact, BuildError, ClassGraph, Condition, ConditionRule, CycleRule, Element,
    ElementKind, Evaluator, ImportError, Importer, Severity, Slicing,
};

fn import(artifacts: Vec<Artifact>) -> ClassGraph {
    Importer::new().import(&artifacts).unwrap().graph
}

/// A class whose `run()` calls `go()` on each target; every class also
/// declares `go()` so calls resolve to members.
fn caller(name: &str, targets: &[&str]) -> Artifact {
    let file = format!("{}.java", name.rsplit('.').next().unwrap());
    let mut run = MethodSpec::new("run", "()V").insn(Insn::Line(12));
    for target in targets {
        run = run.insn(Insn::call(target, "go"));
    }
    let bytes = ClassFileBuilder::new(name)
        .source_file(file)
        .method(run.insn(Insn::Return))
        .method(MethodSpec::new("go", "()V").insn(Insn::Return))
        .build();
    Artifact::new(format!("{name}.class"), bytes)
}

fn layering_rule() -> ConditionRule {
    ConditionRule::new(
        "report-not-importer",
        ElementKind::Class,
        reside_in("..report..").unwrap(),
        Condition::not_depend_on(reside_in("..importer..").unwrap()),
    )
    .unwrap()
}

fn report_graph(with_call: bool) -> ClassGraph {
    let mut run = MethodSpec::new("run", "()V").insn(Insn::Line(12));
    if with_call {
        run = run.insn(Insn::call("importer.ImportService", "load"));
    }
    let service = ClassFileBuilder::new("report.ReportService")
        .source_file("ReportService.java")
        .method(run.insn(Insn::Return))
        .build();
    let importer = ClassFileBuilder::new("importer.ImportService")
        .source_file("ImportService.java")
        .method(MethodSpec::new("load", "()V").insn(Insn::Return))
        .build();
    import(vec![
        Artifact::new("ReportService.class", service),
        Artifact::new("ImportService.class", importer),
    ])
}

// ── Import ──

#[test]
fn independent_artifacts_yield_full_classes_only() {
    let artifacts: Vec<Artifact> = (0..5)
        .map(|i| {
            let name = format!("p{i}.C{i}");
            Artifact::new(name.clone(), ClassFileBuilder::new(name).no_super().build())
        })
        .collect();
    let graph = import(artifacts);
    assert_eq!(graph.full_count(), 5);
    assert_eq!(graph.stub_count(), 0);
}

#[test]
fn duplicate_class_names_fail_without_a_graph() {
    let artifacts = vec![caller("a.A", &[]), caller("a.A", &[])];
    let result = Importer::new().import(&artifacts);
    assert!(matches!(
        result,
        Err(ImportError::Build(BuildError::DuplicateClass { ref name })) if name == "a.A"
    ));
}

#[test]
fn malformed_artifacts_are_skipped_and_referenced_classes_become_stubs() {
    let artifacts = vec![
        caller("a.A", &["b.B"]),
        Artifact::new("b/B.class", vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00]),
    ];
    let import = Importer::new().import(&artifacts).unwrap();
    assert_eq!(import.skipped.len(), 1);
    assert!(import.graph.get("b.B").unwrap().is_stub());
}

// ── Predicates ──

#[test]
fn hierarchy_predicate_is_reflexive_and_covers_descendants() {
    let graph = import(vec![
        Artifact::new("Base", ClassFileBuilder::new("a.Base").build()),
        Artifact::new("X", ClassFileBuilder::new("a.X").extends("a.Base").build()),
        Artifact::new("Y", ClassFileBuilder::new("a.Y").extends("a.X").build()),
        Artifact::new("Z", ClassFileBuilder::new("a.Z").extends("a.Y").build()),
    ]);
    let hierarchy = the_hierarchy_of_a_class_that(named("a.X"));
    let test = |name: &str| hierarchy.test(&graph, Element::Class(graph.get(name).unwrap()));
    assert!(test("a.X"));
    assert!(test("a.Y"));
    assert!(test("a.Z"));
    assert!(!test("a.Base"));
}

#[test]
fn self_superclass_is_an_anomaly_not_a_hang() {
    let graph = import(vec![
        Artifact::new("A", ClassFileBuilder::new("a.A").extends("a.A").build()),
        Artifact::new("B", ClassFileBuilder::new("a.B").extends("a.A").build()),
    ]);
    let a = graph.resolve("a.A").unwrap();
    let b = graph.resolve("a.B").unwrap();
    assert!(graph.ancestors(a).is_empty());
    assert_eq!(graph.ancestors(b), vec![a]);
    assert!(graph.is_assignable_to(b, "a.A"));
    assert!(!graph.is_assignable_to(a, "java.lang.Object"));
    assert!(matches!(
        graph.anomalies(),
        [Anomaly::SelfReferentialHierarchy { class }] if class == "a.A"
    ));

    let hierarchy = the_hierarchy_of_a_class_that(named("a.Missing"));
    assert!(!hierarchy.test(&graph, Element::Class(graph.get("a.B").unwrap())));
}

#[test]
fn mutually_annotated_annotation_types_terminate() {
    const ANNOTATION_TYPE: u16 = 0x2601;
    let graph = import(vec![
        Artifact::new(
            "First",
            ClassFileBuilder::new("a.First")
                .access(ANNOTATION_TYPE)
                .implements("java.lang.annotation.Annotation")
                .annotation(AnnotationSpec::new("a.Second"))
                .build(),
        ),
        Artifact::new(
            "Second",
            ClassFileBuilder::new("a.Second")
                .access(ANNOTATION_TYPE)
                .implements("java.lang.annotation.Annotation")
                .annotation(AnnotationSpec::new("a.First"))
                .build(),
        ),
        Artifact::new(
            "Target",
            ClassFileBuilder::new("a.Target")
                .annotation(AnnotationSpec::new("a.First"))
                .build(),
        ),
    ]);
    assert_eq!(graph.full_count(), 3);
    // annotation types annotating each other is legal, not a hierarchy cycle
    assert!(graph.anomalies().is_empty());

    let target = Element::Class(graph.get("a.Target").unwrap());
    assert!(meta_annotated_with("a.Second").test(&graph, target));
    assert!(!annotated_with("a.Second").test(&graph, target));
    assert!(!meta_annotated_with("a.Missing").test(&graph, target));
    let first = Element::Class(graph.get("a.First").unwrap());
    assert!(meta_annotated_with("a.First").test(&graph, first));
}

// ── Conditions ──

#[test]
fn report_to_importer_call_is_one_violation() {
    let outcome = archgraph_core::ArchRule::evaluate(&layering_rule(), &report_graph(true));
    assert_eq!(outcome.violations.len(), 1);
    let violation = &outcome.violations[0];
    assert_eq!(violation.location.class, "report.ReportService");
    assert_eq!(
        violation.message,
        "Method <report.ReportService.run()> calls method <importer.ImportService.load()> in (ReportService.java:12)"
    );
}

#[test]
fn removing_the_call_removes_the_violation() {
    let outcome = archgraph_core::ArchRule::evaluate(&layering_rule(), &report_graph(false));
    assert!(outcome.passed());
    assert!(!outcome.is_empty_scope());
}

#[test]
fn empty_scope_is_distinguishable_from_a_pass() {
    let nothing = ConditionRule::new(
        "nothing-in-billing",
        ElementKind::Class,
        reside_in("..billing..").unwrap(),
        Condition::not_depend_on(reside_in("..importer..").unwrap()),
    )
    .unwrap();
    let report = Evaluator::builder()
        .rule(layering_rule())
        .rule(nothing)
        .build()
        .evaluate(&report_graph(false));

    assert!(!report.has_violations_at(Severity::Info));
    let empty: Vec<&str> = report
        .empty_scope_rules()
        .iter()
        .map(|o| o.rule.as_str())
        .collect();
    assert_eq!(empty, ["nothing-in-billing"]);
    assert!(!report.fails(Severity::Error, false));
    assert!(report.fails(Severity::Error, true));
}

// ── Cycles ──

#[test]
fn three_slice_cycle_is_reported_once_and_deterministically() {
    let artifacts = || {
        vec![
            caller("c.C", &["a.A"]),
            caller("a.A", &["b.B"]),
            caller("b.B", &["c.C"]),
        ]
    };
    let first = detect_cycles(&import(artifacts()), &Slicing::Package);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].slices, ["a", "b", "c"]);
    assert_eq!(first[0].path(), "a -> b -> c -> a");
    assert_eq!(first[0].hops[0].witness.target, "b.B.go()");

    for _ in 0..5 {
        assert_eq!(detect_cycles(&import(artifacts()), &Slicing::Package), first);
    }
}

#[test]
fn chain_without_back_edge_has_no_cycle() {
    let graph = import(vec![
        caller("a.A", &["b.B"]),
        caller("b.B", &["c.C"]),
        caller("c.C", &[]),
    ]);
    assert!(detect_cycles(&graph, &Slicing::Package).is_empty());

    let outcome = archgraph_core::ArchRule::evaluate(&CycleRule::new("acyclic", Slicing::Package), &graph);
    assert!(outcome.passed());
}
