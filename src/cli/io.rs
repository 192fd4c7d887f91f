//! JSON I/O handling for the CLI
//!
//! - Schema and values are read from files
//! - Session events: one JSON object per input line
//! - Responses: one JSON object per output line
//! - UTF-8 only

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use serde_json::Value;

use crate::validation::FormValues;

use super::errors::{CliError, CliResult};

/// Read a whole text file
pub fn read_text(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", path.display(), e)))
}

/// Read a values file: a JSON object mapping field ids to string values
pub fn read_values(path: &Path) -> CliResult<FormValues> {
    let content = read_text(path)?;
    parse_values(&content)
}

pub fn parse_values(content: &str) -> CliResult<FormValues> {
    serde_json::from_str(content).map_err(|e| {
        CliError::invalid_values(format!("values must be an object of strings: {}", e))
    })
}

/// Read line-delimited JSON events, skipping blank lines
pub fn read_events<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Value>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(
            serde_json::from_str(&line)
                .map_err(|e| CliError::invalid_request(format!("event is not JSON: {}", e))),
        ),
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Write a success response line
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write an error response line
pub fn write_error<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_values() {
        let values = parse_values(r#"{"name": "Ada", "email": ""}"#).unwrap();
        assert_eq!(values.get("name").map(String::as_str), Some("Ada"));
        assert_eq!(values.get("email").map(String::as_str), Some(""));
    }

    #[test]
    fn test_non_string_values_rejected() {
        let err = parse_values(r#"{"age": 42}"#).unwrap_err();
        assert_eq!(err.code_str(), "FORM_CLI_INVALID_VALUES");
    }

    #[test]
    fn test_read_events_skips_blank_lines() {
        let input = Cursor::new("{\"op\":\"submit\"}\n\n   \n{\"op\":\"snapshot\"}\n");
        let events: Vec<_> = read_events(input).collect::<CliResult<_>>().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["op"], "snapshot");
    }

    #[test]
    fn test_read_events_reports_bad_lines() {
        let input = Cursor::new("{oops\n{\"op\":\"submit\"}\n");
        let events: Vec<_> = read_events(input).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].as_ref().unwrap_err().code_str(),
            "FORM_CLI_INVALID_REQUEST"
        );
        assert!(events[1].is_ok());
    }

    #[test]
    fn test_response_lines() {
        let mut out = Vec::new();
        write_response(&mut out, serde_json::json!({"valid": true})).unwrap();
        write_error(&mut out, "E", "boom").unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[0]["data"]["valid"], true);
        assert_eq!(lines[1]["status"], "error");
        assert_eq!(lines[1]["code"], "E");
    }
}
