//! Route template compilation.
//!
//! Templates use `:name` placeholders in the style of `path-to-regexp`:
//!
//! - `/post/:id` captures one path segment
//! - `/post/:id?` makes the segment (and its leading `/`) optional
//! - `/files/:path*` and `/files/:path+` capture zero-or-more / one-or-more segments
//! - `/post/:id(\d+)` restricts the capture with a custom pattern
//!
//! A `:` that is not followed by a name character is literal, so absolute URLs
//! such as `https://host/app/:id` compile as expected.

use regex::Regex;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use crate::error::PatternError;

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage: `(name, value)` in declaration order.
///
/// Names are shared with the compiled pattern; a `None` value means an optional
/// parameter was absent from the matched path.
pub type ParamVec = SmallVec<[(Arc<str>, Option<String>); MAX_INLINE_PARAMS]>;

const DEFAULT_SEGMENT: &str = "[^/]+?";

/// Compilation switches, defaulting to `path-to-regexp` behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternOptions {
    /// Match literal text case-sensitively
    pub case_sensitive: bool,
    /// Disable the optional trailing slash
    pub strict: bool,
}

/// Parameters extracted from a matched path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamVec);

impl Params {
    /// An empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self(ParamVec::new())
    }

    /// Value of a parameter, `None` if undeclared or absent
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Whether the pattern declared a parameter with this name
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k.as_ref() == name)
    }

    /// Iterate `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a `HashMap` (allocates)
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, Option<String>> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl From<ParamVec> for Params {
    fn from(params: ParamVec) -> Self {
        Self(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Optional,
    ZeroOrMore,
    OneOrMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param {
        name: String,
        prefixed: bool,
        pattern: Option<String>,
        modifier: Option<Modifier>,
    },
}

/// A compiled route template
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    keys: Vec<Arc<str>>,
    /// Capture group index of each key, parallel to `keys`
    groups: Vec<usize>,
}

impl PathPattern {
    /// Compile a template into a matcher and its ordered parameter keys
    pub fn compile(template: &str, options: PatternOptions) -> Result<Self, PatternError> {
        let tokens = tokenize(template)?;

        let mut seen = HashSet::new();
        for token in &tokens {
            if let Token::Param { name, .. } = token {
                if !seen.insert(name.as_str()) {
                    return Err(PatternError::DuplicateParameter {
                        template: template.to_string(),
                        name: name.clone(),
                    });
                }
            }
        }

        let mut source = String::with_capacity(template.len() + 16);
        if !options.case_sensitive {
            source.push_str("(?i)");
        }
        source.push('^');

        let mut keys = Vec::with_capacity(seen.len());
        let last = tokens.len().saturating_sub(1);
        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::Literal(text) => {
                    let text = if !options.strict && i == last {
                        text.strip_suffix('/').unwrap_or(text)
                    } else {
                        text
                    };
                    source.push_str(&regex::escape(text));
                }
                Token::Param {
                    name,
                    prefixed,
                    pattern,
                    modifier,
                } => {
                    let segment = pattern.as_deref().unwrap_or(DEFAULT_SEGMENT);
                    let prefix = if *prefixed { "/" } else { "" };
                    let body = match modifier {
                        Some(Modifier::ZeroOrMore | Modifier::OneOrMore) => {
                            format!("(?:{segment})(?:{prefix}(?:{segment}))*")
                        }
                        _ => format!("(?:{segment})"),
                    };
                    let capture = format!("{prefix}(?P<p{}>{body})", keys.len());
                    match modifier {
                        Some(Modifier::Optional | Modifier::ZeroOrMore) => {
                            source.push_str(&format!("(?:{capture})?"));
                        }
                        _ => source.push_str(&capture),
                    }
                    keys.push(Arc::<str>::from(name.as_str()));
                }
            }
        }

        if !options.strict {
            source.push_str("/?");
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError::Regex {
            template: template.to_string(),
            message: e.to_string(),
        })?;

        let names: Vec<Option<&str>> = regex.capture_names().collect();
        let groups = (0..keys.len())
            .map(|idx| {
                let wanted = format!("p{idx}");
                names
                    .iter()
                    .position(|n| *n == Some(wanted.as_str()))
                    .unwrap_or(0)
            })
            .collect();

        Ok(Self {
            template: template.to_string(),
            regex,
            keys,
            groups,
        })
    }

    /// The template this pattern was compiled from
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in left-to-right order of appearance
    #[must_use]
    pub fn keys(&self) -> &[Arc<str>] {
        &self.keys
    }

    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Match a candidate path, extracting its parameters
    ///
    /// Captured values are percent-decoded; undecodable text is kept verbatim.
    #[must_use]
    pub fn captures(&self, candidate: &str) -> Option<Params> {
        let caps = self.regex.captures(candidate)?;
        let params = self
            .keys
            .iter()
            .zip(&self.groups)
            .map(|(key, group)| {
                let value = caps.get(*group).map(|m| decode(m.as_str()));
                (Arc::clone(key), value)
            })
            .collect::<ParamVec>();
        Some(Params(params))
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(template: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => literal.push(chars.next().unwrap_or('\\')),
            ':' if chars.peek().is_some_and(|n| is_name_char(*n) || *n == '(') => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !is_name_char(n) {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(PatternError::EmptyParameterName {
                        template: template.to_string(),
                    });
                }

                let pattern = if chars.peek() == Some(&'(') {
                    chars.next();
                    Some(read_group(&mut chars, template)?)
                } else {
                    None
                };

                let modifier = match chars.peek() {
                    Some('?') => Some(Modifier::Optional),
                    Some('*') => Some(Modifier::ZeroOrMore),
                    Some('+') => Some(Modifier::OneOrMore),
                    _ => None,
                };
                if modifier.is_some() {
                    chars.next();
                }

                let prefixed = literal.ends_with('/');
                if prefixed {
                    literal.pop();
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Param {
                    name,
                    prefixed,
                    pattern,
                    modifier,
                });
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Read a custom capture body up to its matching `)`, the opening `(` already consumed
fn read_group(chars: &mut Peekable<Chars<'_>>, template: &str) -> Result<String, PatternError> {
    let mut depth = 1usize;
    let mut body = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                body.push(c);
                if let Some(escaped) = chars.next() {
                    body.push(escaped);
                }
            }
            '(' => {
                depth += 1;
                body.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(body);
                }
                body.push(c);
            }
            _ => body.push(c),
        }
    }
    Err(PatternError::UnbalancedGroup {
        template: template.to_string(),
    })
}
