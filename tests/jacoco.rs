mod common;

use covgate::detect::Format;
use covgate::metrics::{collect, CoverageSource, JacocoSource};
use covgate::model::Dimension;

#[test]
fn produce_from_file() {
    let (_dir, path) =
        common::write_report("jacoco.xml", include_bytes!("fixtures/sample_jacoco.xml"));

    let stats = JacocoSource.produce(&path).unwrap();

    assert_eq!(stats.format, Format::Jacoco);
    assert_eq!(stats.instruction_coverage, 30.0);
    assert_eq!(stats.branch_coverage, 75.0);
    assert_eq!(stats.line_coverage, 75.0);
    assert_eq!(stats.method_coverage, 80.0);
    assert_eq!(stats.class_coverage, 100.0);
    assert_eq!(stats.complexity, 10);
    assert_eq!(stats.lines_of_code, 20);
    assert_eq!(stats.complexity_density, "10/20");

    assert_eq!(
        stats.counter_summary(Dimension::Instruction),
        Some("30.00%(3/10)")
    );
    assert_eq!(stats.counter_summary(Dimension::Class), Some("100.00%(2/2)"));
}

#[test]
fn detected_from_doctype_report() {
    let (_dir, path) =
        common::write_report("report.xml", include_bytes!("fixtures/sample_jacoco.xml"));

    let stats = collect(&path, None).unwrap();
    assert_eq!(stats.format, Format::Jacoco);
}

#[test]
fn absent_counters_default_to_zero() {
    let (_dir, path) = common::write_report(
        "jacoco.xml",
        br#"<report name="partial"><counter type="LINE" missed="1" covered="3"/></report>"#,
    );

    let stats = JacocoSource.produce(&path).unwrap();

    assert_eq!(stats.line_coverage, 75.0);
    assert_eq!(stats.branch_coverage, 0.0);
    assert_eq!(stats.counter_summary(Dimension::Branch), Some("0%(0/0)"));
    assert_eq!(stats.complexity, 0);
}

#[test]
fn malformed_report_fails() {
    let (_dir, path) = common::write_report(
        "jacoco.xml",
        include_bytes!("fixtures/malformed_jacoco.xml"),
    );

    let err = JacocoSource.produce(&path).unwrap_err();
    assert!(err.is_format_error());
    assert!(err.to_string().contains("position"));
}
