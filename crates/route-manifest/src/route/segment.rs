/// Path segment descriptors
///
/// A route is described as an ordered list of segments. Each segment is one
/// `/`-delimited path component made of one or more parts, so
/// `[slug].json` is a single segment with a dynamic part and a literal part.
use serde::{Deserialize, Serialize};

use crate::error::SegmentError;

/// Marker that prefixes the content of a spread part (`...slug`)
pub const SPREAD_MARKER: &str = "...";

/// One token within a path segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegmentPart {
    /// Literal text, or the parameter name for dynamic parts
    pub content: String,
    #[serde(default)]
    pub dynamic: bool,
    /// Catch-all over zero or more trailing components
    #[serde(default)]
    pub spread: bool,
}

/// One `/`-delimited path component
pub type RouteSegment = Vec<PathSegmentPart>;

/// Classified view of a [`PathSegmentPart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind<'a> {
    Literal(&'a str),
    Param(&'a str),
    /// Spread parameter, name without the `...` marker
    Spread(&'a str),
}

impl PathSegmentPart {
    pub fn literal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            dynamic: false,
            spread: false,
        }
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self {
            content: name.into(),
            dynamic: true,
            spread: false,
        }
    }

    /// Spread part for `name`; the `...` marker is added here
    pub fn spread(name: &str) -> Self {
        Self {
            content: format!("{SPREAD_MARKER}{name}"),
            dynamic: true,
            spread: true,
        }
    }

    /// Checks the part invariants and classifies it
    pub fn kind(&self) -> Result<PartKind<'_>, SegmentError> {
        match (self.dynamic, self.spread) {
            (false, true) => Err(SegmentError::SpreadNotDynamic(self.content.clone())),
            (true, true) => {
                let name = self
                    .content
                    .strip_prefix(SPREAD_MARKER)
                    .ok_or_else(|| SegmentError::MissingSpreadMarker(self.content.clone()))?;
                validate_param_name(name)?;
                Ok(PartKind::Spread(name))
            }
            (true, false) => {
                validate_param_name(&self.content)?;
                Ok(PartKind::Param(&self.content))
            }
            (false, false) => Ok(PartKind::Literal(&self.content)),
        }
    }
}

fn validate_param_name(name: &str) -> Result<(), SegmentError> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(SegmentError::InvalidParamName(name.to_string()))
    }
}
