/// Segment compiler
///
/// Turns route segment descriptors into a path template and wraps the parsed
/// template in a [`RouteGenerator`] that synthesizes concrete URLs.
///
/// # Template rules
///
/// - literal parts are NFC-normalized, `?`/`#` are percent-encoded, escaped
///   brackets (`%5B`/`%5D`) are restored, and template metacharacters are
///   backslash-escaped
/// - dynamic parts become `:name`
/// - spread parts become `:name(.*)?`, optional and allowed to span `/`
/// - every segment is prefixed with `/`; `always` adds a trailing `/`
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::params::Params;
use super::segment::{PartKind, PathSegmentPart, RouteSegment};
use super::template::PathTemplate;
use crate::error::{SegmentError, TemplateFillError};

/// Characters with a meaning in the template syntax
const TEMPLATE_SPECIAL: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\', ':',
];

/// Trailing slash policy of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSlash {
    Always,
    Never,
    #[default]
    Ignore,
}

/// Reverse path builder for one route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGenerator {
    template: PathTemplate,
}

impl RouteGenerator {
    /// Compiles segments into a generator
    ///
    /// # Examples
    ///
    /// ```
    /// use route_manifest::route::generator::{RouteGenerator, TrailingSlash};
    /// use route_manifest::route::segment::PathSegmentPart;
    ///
    /// let segments = vec![
    ///     vec![PathSegmentPart::literal("en")],
    ///     vec![PathSegmentPart::literal("about-us")],
    /// ];
    /// let generator = RouteGenerator::compile(&segments, TrailingSlash::Ignore).unwrap();
    /// assert_eq!(generator.generate(&Default::default()).unwrap(), "/en/about-us");
    /// ```
    pub fn compile(
        segments: &[RouteSegment],
        trailing_slash: TrailingSlash,
    ) -> Result<Self, SegmentError> {
        let source = compile_template(segments, trailing_slash)?;
        Ok(Self {
            template: PathTemplate::parse(&source)?,
        })
    }

    /// Builds a path from parameter values; an empty result becomes `/`
    pub fn generate(&self, params: &Params) -> Result<String, TemplateFillError> {
        let path = self.template.fill(params)?;
        if path.is_empty() {
            Ok("/".to_string())
        } else {
            Ok(path)
        }
    }

    /// The compiled template source
    pub fn template(&self) -> &str {
        self.template.source()
    }

    pub fn required_params(&self) -> impl Iterator<Item = &str> {
        self.template.required_params()
    }
}

/// Builds the template source for a list of segments
pub fn compile_template(
    segments: &[RouteSegment],
    trailing_slash: TrailingSlash,
) -> Result<String, SegmentError> {
    let mut template = segments
        .iter()
        .try_fold(String::new(), |mut template, segment| {
            template.push('/');
            for part in segment {
                template.push_str(&compile_part(part)?);
            }
            Ok::<_, SegmentError>(template)
        })?;

    if trailing_slash == TrailingSlash::Always && !segments.is_empty() {
        template.push('/');
    }

    Ok(template)
}

fn compile_part(part: &PathSegmentPart) -> Result<String, SegmentError> {
    Ok(match part.kind()? {
        PartKind::Literal(content) => escape_literal(content),
        PartKind::Param(name) => format!(":{name}"),
        PartKind::Spread(name) => format!(":{name}(.*)?"),
    })
}

fn escape_literal(content: &str) -> String {
    let encoded = content
        .nfc()
        .collect::<String>()
        .replace('?', "%3F")
        .replace('#', "%23")
        .replace("%5B", "[")
        .replace("%5D", "]");

    encoded
        .chars()
        .fold(String::with_capacity(encoded.len()), |mut out, c| {
            if TEMPLATE_SPECIAL.contains(&c) {
                out.push('\\');
            }
            out.push(c);
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::params::params_from;

    fn lit(content: &str) -> RouteSegment {
        vec![PathSegmentPart::literal(content)]
    }

    #[test]
    fn test_static_segments() {
        let segments = vec![lit("en"), lit("about-us")];
        let generator = RouteGenerator::compile(&segments, TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.template(), "/en/about-us");
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/en/about-us");
    }

    #[test]
    fn test_zero_segments_generate_root() {
        let generator = RouteGenerator::compile(&[], TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.template(), "");
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/");
    }

    #[test]
    fn test_zero_segments_ignore_always_policy() {
        let generator = RouteGenerator::compile(&[], TrailingSlash::Always).unwrap();
        assert_eq!(generator.template(), "");
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/");
    }

    #[test]
    fn test_trailing_slash_always() {
        let generator = RouteGenerator::compile(&[lit("es")], TrailingSlash::Always).unwrap();
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/es/");

        let generator = RouteGenerator::compile(&[lit("es")], TrailingSlash::Never).unwrap();
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/es");
    }

    #[test]
    fn test_spread_binds_stripped_name() {
        let segments = vec![
            lit("blog"),
            vec![PathSegmentPart {
                content: "...slug".into(),
                dynamic: true,
                spread: true,
            }],
        ];
        let generator = RouteGenerator::compile(&segments, TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.template(), "/blog/:slug(.*)?");
        assert_eq!(
            generator.generate(&params_from([("slug", "2024/hello")])).unwrap(),
            "/blog/2024/hello"
        );
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/blog");
    }

    #[test]
    fn test_lone_spread_generates_root() {
        let segments = vec![vec![PathSegmentPart::spread("path")]];
        let generator = RouteGenerator::compile(&segments, TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/");
        assert_eq!(generator.required_params().count(), 0);
    }

    #[test]
    fn test_required_dynamic_param() {
        let segments = vec![vec![PathSegmentPart::param("lang")], lit("blog")];
        let generator = RouteGenerator::compile(&segments, TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.generate(&params_from([("lang", "es")])).unwrap(), "/es/blog");
        assert_eq!(
            generator.generate(&Params::new()),
            Err(TemplateFillError::MissingParam { name: "lang".into() })
        );
    }

    #[test]
    fn test_mixed_parts_in_one_segment() {
        let segments = vec![vec![
            PathSegmentPart::param("name"),
            PathSegmentPart::literal(".json"),
        ]];
        let generator = RouteGenerator::compile(&segments, TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.template(), r"/:name\.json");
        assert_eq!(generator.generate(&params_from([("name", "feed")])).unwrap(), "/feed.json");
    }

    #[test]
    fn test_question_mark_is_percent_encoded() {
        let generator = RouteGenerator::compile(&[lit("faq?")], TrailingSlash::Ignore).unwrap();
        assert!(generator.template().contains("%3F"));
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/faq%3F");
    }

    #[test]
    fn test_hash_and_brackets() {
        let generator =
            RouteGenerator::compile(&[lit("c#"), lit("%5Bdraft%5D")], TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.template(), r"/c%23/\[draft\]");
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/c%23/[draft]");
    }

    #[test]
    fn test_metacharacters_escaped() {
        let generator =
            RouteGenerator::compile(&[lit("v1.2+(beta):x")], TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.template(), r"/v1\.2\+\(beta\)\:x");
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/v1.2+(beta):x");
    }

    #[test]
    fn test_literal_is_nfc_normalized() {
        // "e" followed by a combining acute accent
        let generator = RouteGenerator::compile(&[lit("cafe\u{301}")], TrailingSlash::Ignore).unwrap();
        assert_eq!(generator.generate(&Params::new()).unwrap(), "/caf\u{e9}");
    }

    #[test]
    fn test_invalid_part_is_rejected() {
        let segments = vec![vec![PathSegmentPart {
            content: "...slug".into(),
            dynamic: false,
            spread: true,
        }]];
        assert_eq!(
            RouteGenerator::compile(&segments, TrailingSlash::Ignore),
            Err(SegmentError::SpreadNotDynamic("...slug".into()))
        );
    }

    #[test]
    fn test_trailing_slash_serde() {
        let policy: TrailingSlash = serde_json::from_str("\"always\"").unwrap();
        assert_eq!(policy, TrailingSlash::Always);
        assert_eq!(TrailingSlash::default(), TrailingSlash::Ignore);
    }
}
