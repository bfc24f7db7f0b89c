/// Parser for JaCoCo XML coverage reports.
///
/// JaCoCo XML structure:
///   <report name="...">
///     <sessioninfo id="..." start="..." dump="..."/>
///     <package name="com/example">
///       <class ...>
///         <method ...><counter .../></method>
///         <counter .../>
///       </class>
///       <sourcefile ...>...</sourcefile>
///       <counter type="LINE" missed="1" covered="5"/>
///     </package>
///     <counter type="INSTRUCTION" missed="2" covered="10"/>
///     <counter type="BRANCH" missed="1" covered="3"/>
///     ...
///   </report>
///
/// Only the report-level counters and each package's own counters are
/// kept. Class, method and sourcefile counters are already summed into
/// those by the report generator.
use quick_xml::events::{BytesStart, Event};

use super::{get_attr, parse_attr};
use crate::error::{CovgateError, Result};

/// Kind of a JaCoCo counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CounterType {
    Instruction,
    Branch,
    Line,
    Complexity,
    Method,
    Class,
    /// A type this crate does not know about; kept but never aggregated.
    Other(String),
}

impl CounterType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "INSTRUCTION" => CounterType::Instruction,
            "BRANCH" => CounterType::Branch,
            "LINE" => CounterType::Line,
            "COMPLEXITY" => CounterType::Complexity,
            "METHOD" => CounterType::Method,
            "CLASS" => CounterType::Class,
            other => CounterType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CounterType::Instruction => "INSTRUCTION",
            CounterType::Branch => "BRANCH",
            CounterType::Line => "LINE",
            CounterType::Complexity => "COMPLEXITY",
            CounterType::Method => "METHOD",
            CounterType::Class => "CLASS",
            CounterType::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub kind: CounterType,
    pub covered: u64,
    pub missed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JacocoPackage {
    pub name: String,
    pub counters: Vec<Counter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JacocoReport {
    pub name: Option<String>,
    /// Report-level totals, in document order.
    pub counters: Vec<Counter>,
    pub packages: Vec<JacocoPackage>,
}

/// Parse a JaCoCo XML document.
pub fn parse(input: &[u8]) -> Result<JacocoReport> {
    let mut xml = super::xml_reader(input);
    let mut buf = Vec::new();

    let mut depth: usize = 0;
    let mut report: Option<JacocoReport> = None;
    let mut root_closed = false;
    let mut current_package: Option<JacocoPackage> = None;

    loop {
        let event = xml.read_event_into(&mut buf);
        let is_start_event = matches!(&event, Ok(Event::Start(_)));
        match event {
            Err(e) => return Err(super::xml_err(e, &xml)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if depth == 0 && !root_closed {
                    if report.is_none() {
                        expect_root(e)?;
                        report = Some(JacocoReport {
                            name: get_attr(e, b"name")?,
                            ..Default::default()
                        });
                    }
                } else if !root_closed {
                    match (e.name().as_ref(), depth) {
                        (b"package", 1) => {
                            let package = JacocoPackage {
                                name: get_attr(e, b"name")?.unwrap_or_default(),
                                counters: Vec::new(),
                            };
                            if is_start_event {
                                current_package = Some(package);
                            } else if let Some(report) = report.as_mut() {
                                report.packages.push(package);
                            }
                        }
                        (b"counter", 1) => {
                            let counter = parse_counter(e)?;
                            if let Some(report) = report.as_mut() {
                                report.counters.push(counter);
                            }
                        }
                        (b"counter", 2) => {
                            let counter = parse_counter(e)?;
                            if let Some(package) = current_package.as_mut() {
                                package.counters.push(counter);
                            }
                        }
                        _ => {}
                    }
                }
                if is_start_event {
                    depth += 1;
                } else if depth == 0 && report.is_some() {
                    // Self-closing root: <report/>
                    root_closed = true;
                }
            }
            Ok(Event::End(ref e)) => {
                if depth == 0 {
                    return Err(CovgateError::ReportFormat(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                depth -= 1;
                match (e.name().as_ref(), depth) {
                    (b"package", 1) => {
                        if let (Some(package), Some(report)) =
                            (current_package.take(), report.as_mut())
                        {
                            report.packages.push(package);
                        }
                    }
                    (_, 0) => root_closed = true,
                    _ => {}
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(CovgateError::ReportFormat(
            "unexpected end of document".to_string(),
        ));
    }
    report.ok_or_else(|| CovgateError::ReportFormat("no <report> root element found".to_string()))
}

fn expect_root(e: &BytesStart) -> Result<()> {
    if e.name().as_ref() == b"report" {
        Ok(())
    } else {
        Err(CovgateError::ReportFormat(format!(
            "expected root element <report>, found <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        )))
    }
}

fn parse_counter(e: &BytesStart) -> Result<Counter> {
    Ok(Counter {
        kind: CounterType::from_tag(get_attr(e, b"type")?.unwrap_or_default().trim()),
        covered: parse_attr(e, b"covered")?.unwrap_or(0),
        missed: parse_attr(e, b"missed")?.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jacoco() {
        let input = include_bytes!("../../tests/fixtures/sample_jacoco.xml");
        let report = parse(input).unwrap();

        assert_eq!(report.name.as_deref(), Some("demo"));

        // Report-level counters only; class and method counters are skipped.
        assert_eq!(report.counters.len(), 6);
        assert_eq!(report.counters[0].kind, CounterType::Instruction);
        assert_eq!(report.counters[0].missed, 7);
        assert_eq!(report.counters[0].covered, 3);
        assert_eq!(report.counters[3].kind, CounterType::Complexity);

        assert_eq!(report.packages.len(), 1);
        assert_eq!(report.packages[0].name, "com/example");
        assert_eq!(report.packages[0].counters.len(), 6);
    }

    #[test]
    fn test_parse_jacoco_unknown_counter_preserved() {
        let input = br#"<report name="x">
  <counter type="LINE" missed="1" covered="4"/>
  <counter type="MUTATION" missed="2" covered="2"/>
</report>"#;
        let report = parse(input).unwrap();
        assert_eq!(report.counters.len(), 2);
        assert_eq!(
            report.counters[1].kind,
            CounterType::Other("MUTATION".to_string())
        );
        assert_eq!(report.counters[1].kind.as_str(), "MUTATION");
    }

    #[test]
    fn test_parse_jacoco_empty_report() {
        let report = parse(br#"<?xml version="1.0"?><report name="empty"/>"#).unwrap();
        assert!(report.counters.is_empty());
        assert!(report.packages.is_empty());
    }

    #[test]
    fn test_parse_jacoco_wrong_root() {
        let err = parse(b"<coverage><packages/></coverage>").unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("<report>"));
    }

    #[test]
    fn test_parse_jacoco_bad_counter_value() {
        let input = br#"<report><counter type="LINE" missed="-" covered="4"/></report>"#;
        assert!(parse(input).unwrap_err().is_format_error());
    }

    #[test]
    fn test_parse_jacoco_malformed() {
        let input = include_bytes!("../../tests/fixtures/malformed_jacoco.xml");
        let result = parse(input);
        assert!(result.is_err());
        let err_msg = format!("{}", result.unwrap_err());
        assert!(
            err_msg.contains("position"),
            "Error should contain position info: {err_msg}",
        );
    }
}
