//! Core error types for family-tree processing
//!
//! Relationship problems in the input (dangling ids, cycles) are never
//! errors; they are reported as diagnostics by the layout stage. The
//! variants here cover the edges of the pipeline that can genuinely fail.

use thiserror::Error;

/// Core error types for family-tree processing
#[derive(Error, Debug)]
pub enum LineageError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Config error: {message}")]
    ConfigError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Export error: {source}")]
    ExportError {
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl LineageError {
    /// Create a new parse error
    pub fn parse_error(message: String, line: usize, column: usize) -> Self {
        Self::ParseError {
            message,
            line,
            column,
        }
    }

    /// Create a new config error
    pub fn config_error(message: String) -> Self {
        Self::ConfigError { message }
    }

    /// Create a new render error
    pub fn render_error(message: String) -> Self {
        Self::RenderError { message }
    }

    /// Wrap a failed write of exported output
    pub fn export_error(source: std::io::Error) -> Self {
        Self::ExportError { source }
    }
}

impl From<serde_json::Error> for LineageError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string(), err.line(), err.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let error = LineageError::parse_error("Invalid syntax".to_string(), 5, 10);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Parse error"));
        assert!(error_msg.contains("Invalid syntax"));
        assert!(error_msg.contains("line 5"));
        assert!(error_msg.contains("column 10"));
    }

    #[test]
    fn test_config_error() {
        let error = LineageError::config_error("bad spacing".to_string());
        assert!(error.to_string().contains("Config error: bad spacing"));
    }

    #[test]
    fn test_json_error_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("[\n  {").unwrap_err();
        let error: LineageError = err.into();
        match error {
            LineageError::ParseError { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_export_error_wraps_io() {
        use std::error::Error as _;
        use std::io;
        let error = LineageError::export_error(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert!(error.to_string().contains("Export error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: LineageError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
