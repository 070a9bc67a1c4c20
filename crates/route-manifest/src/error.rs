//! Error types for table construction and path generation
//!
//! Two families:
//! - [`BuildError`] and the errors it wraps are fatal at startup. A snapshot
//!   that produces one never yields a usable [`RouteTable`](crate::RouteTable).
//! - [`TemplateFillError`] is returned to whoever asked for a URL and is never
//!   papered over with a default value.

use std::path::PathBuf;

use thiserror::Error;

/// A manifest snapshot could not be turned into a route table
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("route `{route}` has an invalid match pattern `{pattern}`: {source}")]
    InvalidPattern {
        route: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("route `{route}` has invalid segments: {source}")]
    InvalidSegments {
        route: String,
        #[source]
        source: SegmentError,
    },

    #[error("route `{route}` nests redirect or fallback routes deeper than {limit} levels")]
    DepthExceeded { route: String, limit: usize },

    #[error("invalid i18n configuration: {0}")]
    I18n(String),

    #[error("failed to parse manifest snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("failed to read manifest snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Segment descriptors that cannot be compiled into a path template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("spread part `{0}` is not marked dynamic")]
    SpreadNotDynamic(String),

    #[error("spread part `{0}` is missing the `...` marker")]
    MissingSpreadMarker(String),

    #[error("parameter name `{0}` must be non-empty ASCII letters, digits or `_`")]
    InvalidParamName(String),

    #[error(transparent)]
    Template(#[from] TemplateSyntaxError),
}

/// Malformed path template source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateSyntaxError {
    #[error("dangling escape at end of template")]
    DanglingEscape,

    #[error("missing parameter name at index {0}")]
    MissingParamName(usize),

    #[error("unbalanced pattern group at index {0}")]
    UnbalancedGroup(usize),

    #[error("parameter `{0}` has an empty or capturing pattern group")]
    BadGroup(String),

    #[error("parameter `{name}` has an invalid pattern: {message}")]
    InvalidGroupPattern { name: String, message: String },

    #[error("unexpected `{ch}` at index {index}")]
    UnexpectedChar { ch: char, index: usize },
}

/// A generator was called with parameter values that cannot fill its template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateFillError {
    #[error("missing value for required parameter `{name}`")]
    MissingParam { name: String },

    #[error("value `{value}` for parameter `{name}` does not match `{pattern}`")]
    InvalidParam {
        name: String,
        value: String,
        pattern: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_error_messages() {
        let err = TemplateFillError::MissingParam { name: "lang".into() };
        assert_eq!(err.to_string(), "missing value for required parameter `lang`");

        let err = TemplateFillError::InvalidParam {
            name: "id".into(),
            value: "a/b".into(),
            pattern: "[^\\/#\\?]+?".into(),
        };
        assert!(err.to_string().contains("`a/b`"));
    }

    #[test]
    fn test_segment_error_wraps_template_error() {
        let err: SegmentError = TemplateSyntaxError::DanglingEscape.into();
        assert_eq!(err.to_string(), "dangling escape at end of template");
    }

    #[test]
    fn test_build_error_keeps_source() {
        use std::error::Error as _;

        let err = BuildError::InvalidSegments {
            route: "/[...slug]".into(),
            source: SegmentError::SpreadNotDynamic("...slug".into()),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("route `/[...slug]`"));
    }
}
