//! Version format templates
//!
//! A template mixes literal text with four placeholders:
//! - `%M` - major
//! - `%m` - minor
//! - `%p` - patch
//! - `%s` - special, rendered as `-<special>` or nothing when empty
//!
//! Templates are tokenized once and cached per template string, so rendering and
//! parsing never rescan text produced by an earlier substitution.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use regex::{Captures, Regex};
use tracing::debug;

use crate::version::error::VersionError;
use crate::version::semver::Version;

const NUMBER_PATTERN: &str = "[0-9]+";
const SPECIAL_PATTERN: &str = "[A-Za-z][0-9A-Za-z.]+";

static TEMPLATE_CACHE: LazyLock<Mutex<HashMap<String, Arc<Template>>>> =
    LazyLock::new(Default::default);

/// Placeholder kinds recognized inside a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Major,
    Minor,
    Patch,
    Special,
}

impl Placeholder {
    fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'M' => Some(Placeholder::Major),
            'm' => Some(Placeholder::Minor),
            'p' => Some(Placeholder::Patch),
            's' => Some(Placeholder::Special),
            _ => None,
        }
    }

    /// Returns the capture group name used by the compiled matcher
    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::Major => "major",
            Placeholder::Minor => "minor",
            Placeholder::Patch => "patch",
            Placeholder::Special => "special",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Placeholder::Special)
    }

    fn pattern(&self) -> String {
        match self {
            Placeholder::Special => format!("(?:-(?P<special>{SPECIAL_PATTERN}))?"),
            numeric => format!("(?P<{}>{NUMBER_PATTERN})", numeric.name()),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self {
            Placeholder::Major => "%M",
            Placeholder::Minor => "%m",
            Placeholder::Patch => "%p",
            Placeholder::Special => "%s",
        };
        f.write_str(marker)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug)]
struct Matchers {
    strict: Regex,
    lenient: Regex,
}

/// A compiled template: its token stream plus the matchers used for parsing
#[derive(Debug)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
    matchers: Result<Matchers, VersionError>,
}

impl Template {
    /// Compile a template, reusing a previously compiled one for the same string
    pub fn compile(source: &str) -> Arc<Template> {
        let mut cache = TEMPLATE_CACHE
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(template) = cache.get(source) {
            return Arc::clone(template);
        }

        debug!("Compiling version template {:?}", source);
        let template = Arc::new(Template::new(source));
        cache.insert(source.to_string(), Arc::clone(&template));
        template
    }

    fn new(source: &str) -> Self {
        let tokens = tokenize(source);
        let matchers = build_matchers(source, &tokens);
        Self {
            source: source.to_string(),
            tokens,
            matchers,
        }
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.tokens
            .iter()
            .any(|token| *token == Token::Placeholder(placeholder))
    }

    /// Render a version through this template
    pub fn format(&self, version: &Version) -> String {
        let mut rendered = String::with_capacity(self.source.len() + 8);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => rendered.push_str(text),
                Token::Placeholder(Placeholder::Major) => {
                    rendered.push_str(&version.major().to_string())
                }
                Token::Placeholder(Placeholder::Minor) => {
                    rendered.push_str(&version.minor().to_string())
                }
                Token::Placeholder(Placeholder::Patch) => {
                    rendered.push_str(&version.patch().to_string())
                }
                Token::Placeholder(Placeholder::Special) => {
                    if !version.special().is_empty() {
                        rendered.push('-');
                        rendered.push_str(version.special());
                    }
                }
            }
        }
        rendered
    }

    /// Match the template against `input`.
    ///
    /// The strict matcher, which requires every placeholder of the template, always runs
    /// first. Only when it finds nothing and `allow_missing` is set does the lenient
    /// matcher, which lets trailing numeric components be omitted, get a turn.
    pub fn captures<'h>(
        &self,
        input: &'h str,
        allow_missing: bool,
    ) -> Result<Option<Captures<'h>>, VersionError> {
        let matchers = self.matchers.as_ref().map_err(Clone::clone)?;
        let captures = matchers.strict.captures(input);
        if captures.is_some() || !allow_missing {
            return Ok(captures);
        }
        Ok(matchers.lenient.captures(input))
    }
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(placeholder) = chars.peek().copied().and_then(Placeholder::from_marker) {
                chars.next();
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Placeholder(placeholder));
                continue;
            }
        }
        literal.push(c);
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn build_matchers(source: &str, tokens: &[Token]) -> Result<Matchers, VersionError> {
    let mut seen = Vec::new();
    for token in tokens {
        if let Token::Placeholder(placeholder) = token {
            if seen.contains(placeholder) {
                return Err(VersionError::InvalidTemplate(format!(
                    "{placeholder} appears more than once in {source:?}"
                )));
            }
            seen.push(*placeholder);
        }
    }

    let compile = |pattern: String| {
        Regex::new(&pattern).map_err(|e| VersionError::InvalidTemplate(format!("{source:?}: {e}")))
    };

    Ok(Matchers {
        strict: compile(build_pattern(tokens, false))?,
        lenient: compile(build_pattern(tokens, true))?,
    })
}

/// Build the regex source for a token stream.
///
/// In lenient mode every numeric placeholder after the first one becomes optional together
/// with the literal directly in front of it. The optional groups nest, so `patch` can only
/// be captured when `minor` was, and all of them close right after the last numeric
/// placeholder.
fn build_pattern(tokens: &[Token], lenient: bool) -> String {
    let numeric: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| matches!(token, Token::Placeholder(p) if p.is_numeric()))
        .map(|(i, _)| i)
        .collect();

    let optional = |i: usize| lenient && numeric.first() != Some(&i) && numeric.contains(&i);
    let last_numeric = numeric.last().copied();

    let mut pattern = String::new();
    let mut open_groups = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(text) => {
                if optional(i + 1) {
                    pattern.push_str("(?:");
                    open_groups += 1;
                }
                pattern.push_str(&regex::escape(text));
            }
            Token::Placeholder(placeholder) => {
                let after_literal = i > 0 && matches!(tokens[i - 1], Token::Literal(_));
                if optional(i) && !after_literal {
                    pattern.push_str("(?:");
                    open_groups += 1;
                }
                pattern.push_str(&placeholder.pattern());
            }
        }

        if Some(i) == last_numeric {
            for _ in 0..open_groups {
                pattern.push_str(")?");
            }
            open_groups = 0;
        }
    }

    pattern
}
