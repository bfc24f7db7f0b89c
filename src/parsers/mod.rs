pub mod cobertura;
pub mod jacoco;

use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::BytesStart;
use quick_xml::reader::Reader;

use crate::error::{CovgateError, Result};

/// Read a report document from disk.
pub fn read_report(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CovgateError::ReportRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Build a quick-xml reader configured the same way for every dialect.
pub(crate) fn xml_reader<R: BufRead>(input: R) -> Reader<R> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);
    reader
}

/// Wrap a tokenizer error with the byte offset it occurred at.
pub(crate) fn xml_err<R>(source: quick_xml::Error, reader: &Reader<R>) -> CovgateError {
    CovgateError::Xml {
        source,
        position: reader.buffer_position(),
    }
}

/// Look up an attribute by name, unescaping its value.
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            CovgateError::ReportFormat(format!(
                "bad attribute on <{}>: {err}",
                element_name(e)
            ))
        })?;
        if attr.key.as_ref() == name {
            let value = attr.unescape_value().map_err(|err| {
                CovgateError::ReportFormat(format!(
                    "bad value for '{}' on <{}>: {err}",
                    String::from_utf8_lossy(name),
                    element_name(e)
                ))
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Look up and parse a typed attribute. Missing and empty attributes both
/// yield `None`; anything else that fails to parse is a format error.
pub(crate) fn parse_attr<T: FromStr>(e: &BytesStart, name: &[u8]) -> Result<Option<T>> {
    match get_attr(e, name)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            CovgateError::ReportFormat(format!(
                "invalid value '{}' for '{}' on <{}>",
                raw,
                String::from_utf8_lossy(name),
                element_name(e)
            ))
        }),
    }
}

/// Parse an XML boolean attribute (`true`/`false`/`1`/`0`).
pub(crate) fn parse_bool_attr(e: &BytesStart, name: &[u8]) -> Result<bool> {
    match get_attr(e, name)?.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(CovgateError::ReportFormat(format!(
            "invalid boolean '{}' for '{}' on <{}>",
            v,
            String::from_utf8_lossy(name),
            element_name(e)
        ))),
    }
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(tag: &str) -> BytesStart<'_> {
        let name_len = tag.find(' ').unwrap_or(tag.len());
        BytesStart::from_content(tag, name_len)
    }

    #[test]
    fn test_get_attr() {
        let e = start(r#"line number="3" hits="0""#);
        assert_eq!(get_attr(&e, b"hits").unwrap().as_deref(), Some("0"));
        assert_eq!(get_attr(&e, b"branch").unwrap(), None);
    }

    #[test]
    fn test_parse_attr_empty_is_none() {
        let e = start(r#"line number="" hits="4""#);
        assert_eq!(parse_attr::<u64>(&e, b"number").unwrap(), None);
        assert_eq!(parse_attr::<u64>(&e, b"hits").unwrap(), Some(4));
    }

    #[test]
    fn test_parse_attr_invalid() {
        let e = start(r#"line hits="lots""#);
        let err = parse_attr::<u64>(&e, b"hits").unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_parse_bool_attr() {
        assert!(parse_bool_attr(&start(r#"line branch="true""#), b"branch").unwrap());
        assert!(parse_bool_attr(&start(r#"line branch="1""#), b"branch").unwrap());
        assert!(!parse_bool_attr(&start(r#"line branch="false""#), b"branch").unwrap());
        assert!(!parse_bool_attr(&start("line"), b"branch").unwrap());
        assert!(parse_bool_attr(&start(r#"line branch="maybe""#), b"branch").is_err());
    }

    #[test]
    fn test_read_report_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_report(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, CovgateError::ReportRead { .. }));
        assert!(!err.is_format_error());
    }
}
