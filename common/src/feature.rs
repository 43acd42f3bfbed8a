//! # Feature Tags
//!
//! A feature tag names a class of environment a host belongs to, e.g. `cloud`
//! or `azure`. Cases are marked with a [`FeatureExpr`] such as
//! `"cloud or metal"` and only run when the expression holds for the tags of
//! the current [`Environment`](crate::environment::Environment).
//!
//! Expression grammar (`and` binds tighter than `or`):
//!
//! ```text
//! expr   := term ("or" term)*
//! term   := factor ("and" factor)*
//! factor := "not" factor | "(" expr ")" | tag
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Cloud,
    Metal,
    Azure,
    Aws,
    Gcp,
    Ali,
    Openstack,
    Kvm,
    Vmware,
    /// Any tag reachr has no special knowledge of.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureParseError {
    #[error("empty feature expression")]
    Empty,
    #[error("invalid feature tag '{0}'")]
    InvalidTag(String),
    #[error("unexpected token '{found}' in feature expression")]
    UnexpectedToken { found: String },
    #[error("feature expression ended early, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
}

impl FromStr for Feature {
    type Err = FeatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        let valid = !tag.is_empty()
            && tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid || is_keyword(&tag) {
            return Err(FeatureParseError::InvalidTag(s.to_string()));
        }

        Ok(match tag.as_str() {
            "cloud" => Feature::Cloud,
            "metal" => Feature::Metal,
            "azure" => Feature::Azure,
            "aws" => Feature::Aws,
            "gcp" => Feature::Gcp,
            "ali" => Feature::Ali,
            "openstack" => Feature::Openstack,
            "kvm" => Feature::Kvm,
            "vmware" => Feature::Vmware,
            _ => Feature::Other(tag),
        })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Cloud => "cloud",
            Feature::Metal => "metal",
            Feature::Azure => "azure",
            Feature::Aws => "aws",
            Feature::Gcp => "gcp",
            Feature::Ali => "ali",
            Feature::Openstack => "openstack",
            Feature::Kvm => "kvm",
            Feature::Vmware => "vmware",
            Feature::Other(tag) => tag,
        };
        f.write_str(name)
    }
}

fn is_keyword(word: &str) -> bool {
    matches!(word, "and" | "or" | "not")
}

/// Boolean expression over feature tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureExpr {
    Tag(Feature),
    Not(Box<FeatureExpr>),
    And(Box<FeatureExpr>, Box<FeatureExpr>),
    Or(Box<FeatureExpr>, Box<FeatureExpr>),
}

impl FeatureExpr {
    pub fn matches(&self, features: &BTreeSet<Feature>) -> bool {
        match self {
            FeatureExpr::Tag(feature) => features.contains(feature),
            FeatureExpr::Not(inner) => !inner.matches(features),
            FeatureExpr::And(lhs, rhs) => lhs.matches(features) && rhs.matches(features),
            FeatureExpr::Or(lhs, rhs) => lhs.matches(features) || rhs.matches(features),
        }
    }
}

impl fmt::Display for FeatureExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureExpr::Tag(feature) => write!(f, "{feature}"),
            FeatureExpr::Not(inner) => match inner.as_ref() {
                FeatureExpr::Tag(_) | FeatureExpr::Not(_) => write!(f, "not {inner}"),
                _ => write!(f, "not ({inner})"),
            },
            FeatureExpr::And(lhs, rhs) => {
                write_operand(f, lhs)?;
                f.write_str(" and ")?;
                write_operand(f, rhs)
            }
            FeatureExpr::Or(lhs, rhs) => write!(f, "{lhs} or {rhs}"),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &FeatureExpr) -> fmt::Result {
    match expr {
        FeatureExpr::Or(..) => write!(f, "({expr})"),
        _ => write!(f, "{expr}"),
    }
}

impl FromStr for FeatureExpr {
    type Err = FeatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s);
        if tokens.is_empty() {
            return Err(FeatureParseError::Empty);
        }

        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.expr()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(FeatureParseError::UnexpectedToken {
                found: token.to_string(),
            }),
        }
    }
}

fn tokenize(s: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut word = String::new();

    for c in s.chars() {
        match c {
            '(' | ')' => {
                if !word.is_empty() {
                    tokens.push(std::mem::take(&mut word));
                }
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => {
                if !word.is_empty() {
                    tokens.push(std::mem::take(&mut word));
                }
            }
            c => word.push(c),
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self, expected: &'static str) -> Result<String, FeatureParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FeatureParseError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(token) if token.eq_ignore_ascii_case(keyword) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expr(&mut self) -> Result<FeatureExpr, FeatureParseError> {
        let mut lhs = self.term()?;
        while self.eat_keyword("or") {
            let rhs = self.term()?;
            lhs = FeatureExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<FeatureExpr, FeatureParseError> {
        let mut lhs = self.factor()?;
        while self.eat_keyword("and") {
            let rhs = self.factor()?;
            lhs = FeatureExpr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<FeatureExpr, FeatureParseError> {
        if self.eat_keyword("not") {
            return Ok(FeatureExpr::Not(Box::new(self.factor()?)));
        }

        let token = self.next("a feature tag")?;
        match token.as_str() {
            "(" => {
                let inner = self.expr()?;
                match self.next("')'")?.as_str() {
                    ")" => Ok(inner),
                    other => Err(FeatureParseError::UnexpectedToken {
                        found: other.to_string(),
                    }),
                }
            }
            ")" => Err(FeatureParseError::UnexpectedToken { found: token }),
            _ => Ok(FeatureExpr::Tag(token.parse()?)),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
