/// Parser for Cobertura XML coverage reports.
///
/// Cobertura XML structure:
///   <coverage line-rate="..." branch-rate="...">
///     <sources><source>...</source></sources>
///     <packages>
///       <package name="..." line-rate="..." branch-rate="...">
///         <classes>
///           <class name="..." filename="..." complexity="...">
///             <methods>
///               <method name="..." signature="...">
///                 <lines><line number="..." hits="..."/></lines>
///               </method>
///             </methods>
///             <lines>
///               <line number="..." hits="..." branch="true|false"
///                     condition-coverage="50% (1/2)" />
///             </lines>
///           </class>
///         </classes>
///       </package>
///     </packages>
///   </coverage>
///
/// Only elements at exactly these positions are picked up; a `<line>` that
/// sits anywhere else (e.g. under `<conditions>`) is ignored. Decoding is
/// all-or-nothing: any malformed token or attribute fails the whole parse.
use quick_xml::events::{BytesStart, Event};

use super::{get_attr, parse_attr, parse_bool_attr};
use crate::error::{CovgateError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoberturaReport {
    pub packages: Vec<Package>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    pub name: String,
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Class {
    pub name: String,
    pub complexity: f64,
    pub lines: Vec<Line>,
    pub methods: Vec<Method>,
}

/// A method references a subset of its class's lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Method {
    pub name: String,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub number: u32,
    pub hits: u64,
    pub is_branch: bool,
    /// Raw `condition-coverage` text, e.g. `"50% (1/2)"`.
    pub condition_coverage: Option<String>,
}

const PACKAGE_PATH: &[&[u8]] = &[b"coverage", b"packages"];
const CLASS_PATH: &[&[u8]] = &[b"coverage", b"packages", b"package", b"classes"];
const CLASS_LINE_PATH: &[&[u8]] = &[
    b"coverage", b"packages", b"package", b"classes", b"class", b"lines",
];
const METHOD_PATH: &[&[u8]] = &[
    b"coverage", b"packages", b"package", b"classes", b"class", b"methods",
];
const METHOD_LINE_PATH: &[&[u8]] = &[
    b"coverage", b"packages", b"package", b"classes", b"class", b"methods", b"method",
    b"lines",
];

/// Parse a Cobertura XML document.
pub fn parse(input: &[u8]) -> Result<CoberturaReport> {
    let mut xml = super::xml_reader(input);
    let mut buf = Vec::new();
    let mut builder = TreeBuilder::default();

    loop {
        match xml.read_event_into(&mut buf) {
            Err(e) => return Err(super::xml_err(e, &xml)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) => {
                builder.open(e)?;
                builder.path.push(e.name().as_ref().to_vec());
            }
            Ok(Event::Empty(ref e)) => {
                builder.open(e)?;
                builder.close(e.name().as_ref());
            }
            Ok(Event::End(ref e)) => {
                if builder.path.pop().is_none() {
                    return Err(CovgateError::ReportFormat(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                builder.close(e.name().as_ref());
            }
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    path: Vec<Vec<u8>>,
    report: Option<CoberturaReport>,
    root_closed: bool,
    package: Option<Package>,
    class: Option<Class>,
    method: Option<Method>,
}

impl TreeBuilder {
    fn at(&self, expected: &[&[u8]]) -> bool {
        self.path.len() == expected.len()
            && self
                .path
                .iter()
                .zip(expected)
                .all(|(have, want)| have.as_slice() == *want)
    }

    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let name = e.name();
        let name = name.as_ref();

        if self.path.is_empty() {
            if self.report.is_some() || self.root_closed {
                // Trailing elements after the root are not part of the report.
                return Ok(());
            }
            if name != b"coverage" {
                return Err(CovgateError::ReportFormat(format!(
                    "expected root element <coverage>, found <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
            self.report = Some(CoberturaReport::default());
            return Ok(());
        }
        if self.root_closed {
            return Ok(());
        }

        match name {
            b"package" if self.at(PACKAGE_PATH) => {
                self.package = Some(Package {
                    name: get_attr(e, b"name")?.unwrap_or_default(),
                    classes: Vec::new(),
                });
            }
            b"class" if self.at(CLASS_PATH) => {
                self.class = Some(Class {
                    name: get_attr(e, b"name")?.unwrap_or_default(),
                    complexity: parse_attr::<f64>(e, b"complexity")?.unwrap_or(0.0),
                    lines: Vec::new(),
                    methods: Vec::new(),
                });
            }
            b"method" if self.at(METHOD_PATH) => {
                self.method = Some(Method {
                    name: get_attr(e, b"name")?.unwrap_or_default(),
                    lines: Vec::new(),
                });
            }
            b"line" if self.at(CLASS_LINE_PATH) => {
                let line = parse_line(e)?;
                if let Some(class) = self.class.as_mut() {
                    class.lines.push(line);
                }
            }
            b"line" if self.at(METHOD_LINE_PATH) => {
                let line = parse_line(e)?;
                if let Some(method) = self.method.as_mut() {
                    method.lines.push(line);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Called with `path` already pointing at the closed element's parent.
    fn close(&mut self, name: &[u8]) {
        match name {
            b"method" if self.at(METHOD_PATH) => {
                if let (Some(method), Some(class)) = (self.method.take(), self.class.as_mut()) {
                    class.methods.push(method);
                }
            }
            b"class" if self.at(CLASS_PATH) => {
                if let (Some(class), Some(package)) = (self.class.take(), self.package.as_mut()) {
                    package.classes.push(class);
                }
            }
            b"package" if self.at(PACKAGE_PATH) => {
                if let (Some(package), Some(report)) = (self.package.take(), self.report.as_mut())
                {
                    report.packages.push(package);
                }
            }
            b"coverage" if self.path.is_empty() => {
                self.root_closed = true;
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<CoberturaReport> {
        if let Some(open) = self.path.last() {
            return Err(CovgateError::ReportFormat(format!(
                "unexpected end of document inside <{}>",
                String::from_utf8_lossy(open)
            )));
        }
        self.report.ok_or_else(|| {
            CovgateError::ReportFormat("no <coverage> root element found".to_string())
        })
    }
}

fn parse_line(e: &BytesStart) -> Result<Line> {
    let condition_coverage = get_attr(e, b"condition-coverage")?.filter(|c| !c.is_empty());
    Ok(Line {
        number: parse_attr(e, b"number")?.unwrap_or(0),
        hits: parse_attr(e, b"hits")?.unwrap_or(0),
        is_branch: parse_bool_attr(e, b"branch")?,
        condition_coverage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cobertura() {
        let input = include_bytes!("../../tests/fixtures/sample_cobertura.xml");
        let report = parse(input).unwrap();

        assert_eq!(report.packages.len(), 2);

        let app = &report.packages[0];
        assert_eq!(app.name, "com.example.app");
        assert_eq!(app.classes.len(), 2);

        let main = &app.classes[0];
        assert_eq!(main.name, "com.example.app.Main");
        assert_eq!(main.complexity, 3.0);
        assert_eq!(main.lines.len(), 4);
        assert_eq!(main.lines[0].number, 1);
        assert_eq!(main.lines[0].hits, 1);
        assert_eq!(main.lines[2].hits, 0);

        // Branch line keeps its raw condition text
        let branch = &main.lines[1];
        assert!(branch.is_branch);
        assert_eq!(branch.condition_coverage.as_deref(), Some("50% (1/2)"));

        // Method lines are kept separately from class lines
        assert_eq!(main.methods.len(), 2);
        assert_eq!(main.methods[0].name, "main");
        assert_eq!(main.methods[0].lines.len(), 2);
        assert_eq!(main.methods[1].name, "unused");
        assert_eq!(main.methods[1].lines.len(), 1);

        let util = &report.packages[1];
        assert_eq!(util.classes.len(), 1);
        assert_eq!(util.classes[0].complexity, 2.5);
    }

    #[test]
    fn test_parse_cobertura_empty_elements() {
        let input = br#"<?xml version="1.0"?>
<coverage>
  <packages>
    <package name="empty"/>
    <package name="p"><classes><class name="C" complexity="1"/></classes></package>
  </packages>
</coverage>"#;
        let report = parse(input).unwrap();
        assert_eq!(report.packages.len(), 2);
        assert!(report.packages[0].classes.is_empty());
        assert_eq!(report.packages[1].classes.len(), 1);
        assert!(report.packages[1].classes[0].lines.is_empty());
    }

    #[test]
    fn test_parse_cobertura_ignores_misplaced_lines() {
        // <condition> children and stray <line> elements outside <lines>
        // do not contribute lines.
        let input = br#"<coverage><packages><package name="p"><classes>
  <class name="C">
    <line number="99" hits="1"/>
    <lines>
      <line number="1" hits="2" branch="true" condition-coverage="100% (2/2)">
        <conditions><condition number="0" type="jump" coverage="100%"/></conditions>
      </line>
    </lines>
  </class>
</classes></package></packages></coverage>"#;
        let report = parse(input).unwrap();
        let class = &report.packages[0].classes[0];
        assert_eq!(class.lines.len(), 1);
        assert_eq!(class.lines[0].number, 1);
        assert_eq!(class.lines[0].hits, 2);
    }

    #[test]
    fn test_parse_cobertura_wrong_root() {
        let input = br#"<report name="x"><counter type="LINE" missed="1" covered="1"/></report>"#;
        let err = parse(input).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("<coverage>"));
    }

    #[test]
    fn test_parse_cobertura_bad_hits() {
        let input = br#"<coverage><packages><package name="p"><classes><class name="C"><lines>
  <line number="1" hits="many"/>
</lines></class></classes></package></packages></coverage>"#;
        let err = parse(input).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_parse_cobertura_malformed() {
        let input = include_bytes!("../../tests/fixtures/malformed_cobertura.xml");
        let err = parse(input).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_parse_cobertura_truncated() {
        let input = br#"<coverage><packages><package name="p">"#;
        let err = parse(input).unwrap_err();
        assert!(err.to_string().contains("unexpected end of document"));
    }

    #[test]
    fn test_parse_cobertura_empty_input() {
        assert!(parse(b"").unwrap_err().is_format_error());
    }
}
