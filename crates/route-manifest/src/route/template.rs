/// Named-parameter path templates
///
/// A small template language for building paths from parameter values:
///
/// - `:name` inserts a parameter (name is ASCII letters, digits and `_`)
/// - `:name(pattern)` restricts the accepted value with a regular expression
/// - `:name?` makes the parameter optional
/// - `\x` emits `x` literally
///
/// An unescaped `/` or `.` directly before a parameter is that parameter's
/// prefix: it is only emitted when the parameter is. This is what lets an
/// omitted catch-all drop its leading slash.
///
/// Templates are only ever *filled*. Matching request paths is done with the
/// pre-computed route patterns, never with these templates.
use regex::{Regex, RegexBuilder};

use super::params::{ParamValue, Params};
use crate::error::{TemplateFillError, TemplateSyntaxError};

/// Accepted value for a parameter without an explicit pattern group
pub const DEFAULT_PARAM_PATTERN: &str = r"[^\/#\?]+?";

#[derive(Debug, Clone)]
enum Token {
    Literal(String),
    Param(ParamToken),
}

#[derive(Debug, Clone)]
struct ParamToken {
    name: String,
    prefix: String,
    pattern: String,
    optional: bool,
    validator: Regex,
}

/// A parsed path template ready to be filled
///
/// # Examples
///
/// ```
/// use route_manifest::route::params::params_from;
/// use route_manifest::route::template::PathTemplate;
///
/// let template = PathTemplate::parse("/blog/:slug(.*)?").unwrap();
/// assert_eq!(template.fill(&params_from([("slug", "a/b")])).unwrap(), "/blog/a/b");
/// assert_eq!(template.fill(&Default::default()).unwrap(), "/blog");
/// ```
#[derive(Debug, Clone)]
pub struct PathTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl PartialEq for PathTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathTemplate {}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl PathTemplate {
    /// Parses template source into tokens
    pub fn parse(source: &str) -> Result<Self, TemplateSyntaxError> {
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        let mut tokens = Vec::new();
        let mut literal = String::new();
        // Escaped characters never act as a parameter prefix
        let mut last_escaped = false;
        let mut i = 0;

        while i < chars.len() {
            let (index, ch) = chars[i];
            match ch {
                '\\' => {
                    let &(_, next) = chars
                        .get(i + 1)
                        .ok_or(TemplateSyntaxError::DanglingEscape)?;
                    literal.push(next);
                    last_escaped = true;
                    i += 2;
                }
                ':' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && is_name_char(chars[end].1) {
                        end += 1;
                    }
                    if end == start {
                        return Err(TemplateSyntaxError::MissingParamName(index));
                    }
                    let name: String = chars[start..end].iter().map(|&(_, c)| c).collect();
                    i = end;

                    let pattern = if char_at(&chars, i) == Some('(') {
                        let (pattern, next) = read_group(&chars, i, &name)?;
                        i = next;
                        pattern
                    } else {
                        DEFAULT_PARAM_PATTERN.to_string()
                    };

                    let optional = char_at(&chars, i) == Some('?');
                    if optional {
                        i += 1;
                    }

                    let prefix = if !last_escaped && (literal.ends_with('/') || literal.ends_with('.')) {
                        literal.pop().map(String::from).unwrap_or_default()
                    } else {
                        String::new()
                    };
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }

                    let validator = RegexBuilder::new(&format!("^(?:{pattern})$"))
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| TemplateSyntaxError::InvalidGroupPattern {
                            name: name.clone(),
                            message: e.to_string(),
                        })?;

                    tokens.push(Token::Param(ParamToken {
                        name,
                        prefix,
                        pattern,
                        optional,
                        validator,
                    }));
                    last_escaped = false;
                }
                '(' | ')' | '{' | '}' | '?' | '*' | '+' => {
                    return Err(TemplateSyntaxError::UnexpectedChar { ch, index });
                }
                _ => {
                    literal.push(ch);
                    last_escaped = false;
                    i += 1;
                }
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    /// Template source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of all parameters, in template order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Param(param) => Some(param.name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// Names of the parameters that must be supplied to [`fill`](Self::fill)
    pub fn required_params(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Param(param) if !param.optional => Some(param.name.as_str()),
            _ => None,
        })
    }

    /// Fills the template with parameter values
    ///
    /// Optional parameters without a value are skipped along with their
    /// prefix. Every supplied value must match its parameter's pattern.
    pub fn fill(&self, params: &Params) -> Result<String, TemplateFillError> {
        let mut path = String::new();

        for token in &self.tokens {
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Param(param) => {
                    match params.get(&param.name).and_then(ParamValue::to_path_value) {
                        Some(value) => {
                            if !param.validator.is_match(&value) {
                                return Err(TemplateFillError::InvalidParam {
                                    name: param.name.clone(),
                                    value,
                                    pattern: param.pattern.clone(),
                                });
                            }
                            path.push_str(&param.prefix);
                            path.push_str(&value);
                        }
                        None if param.optional => {}
                        None => {
                            return Err(TemplateFillError::MissingParam {
                                name: param.name.clone(),
                            });
                        }
                    }
                }
            }
        }

        Ok(path)
    }
}

fn char_at(chars: &[(usize, char)], i: usize) -> Option<char> {
    chars.get(i).map(|&(_, c)| c)
}

/// Reads a `( ... )` group starting at `open`, returning the inner pattern and
/// the position after the closing parenthesis
fn read_group(
    chars: &[(usize, char)],
    open: usize,
    name: &str,
) -> Result<(String, usize), TemplateSyntaxError> {
    let open_index = chars[open].0;
    let mut depth = 1;
    let mut pattern = String::new();
    let mut j = open + 1;

    while j < chars.len() {
        let c = chars[j].1;
        match c {
            '\\' => {
                let next = char_at(chars, j + 1)
                    .ok_or(TemplateSyntaxError::UnbalancedGroup(open_index))?;
                pattern.push('\\');
                pattern.push(next);
                j += 2;
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        pattern.push(c);
        j += 1;
    }

    if depth != 0 {
        return Err(TemplateSyntaxError::UnbalancedGroup(open_index));
    }
    if pattern.is_empty() || pattern.starts_with('?') {
        return Err(TemplateSyntaxError::BadGroup(name.to_string()));
    }

    Ok((pattern, j + 1))
}
