//! `{{ key }}` templates.
//!
//! A template is plain text with placeholders naming a [`Field`] by its
//! [`key`](Field::key), e.g. `const VERSION: &str = "{{ describe }}";`.
//! Whitespace inside the braces is optional. Everything outside placeholders
//! is copied through unchanged.

use std::fmt;
use thiserror::Error;

use crate::identity::{BuildIdentity, Field};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template error at byte {offset}: {kind}")]
pub struct TemplateError {
    pub offset: usize,
    pub kind: TemplateErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateErrorKind {
    /// `{{` without a matching `}}`
    Unterminated,
    UnknownKey(String),
}

impl fmt::Display for TemplateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateErrorKind::Unterminated => f.write_str("unterminated placeholder"),
            TemplateErrorKind::UnknownKey(key) => {
                let known: Vec<_> = Field::ALL.iter().map(|f| f.key()).collect();
                write!(f, "unknown key {key:?}, expected one of {}", known.join(", "))
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed template, validated up front so rendering cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                return Err(TemplateError {
                    offset: offset + open,
                    kind: TemplateErrorKind::Unterminated,
                });
            };

            let key = after_open[..close].trim();
            let field = Field::from_key(key).ok_or_else(|| TemplateError {
                offset: offset + open,
                kind: TemplateErrorKind::UnknownKey(key.to_string()),
            })?;
            segments.push(Segment::Field(field));

            let consumed = open + 2 + close + 2;
            rest = &rest[consumed..];
            offset += consumed;
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Ok(Self { segments })
    }

    /// Fields referenced by this template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(f) => Some(*f),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, identity: &BuildIdentity<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => out.push_str(&identity.get(*field).to_string()),
            }
        }
        out
    }
}
