//! Topic patterns.
//!
//! Topics are `/`-separated segments. A pattern segment `:name` matches any
//! single segment and captures it; a final `*` segment matches the remaining
//! segments, including none.

use std::collections::HashMap;

use crate::error::{BusError, BusResult};

const WILDCARD_SEGMENT: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest,
}

/// A parsed topic subscription pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl TopicPattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidTopic`] for empty patterns, empty segments,
    /// or a `*` that is not the last segment.
    pub fn parse(pattern: &str) -> BusResult<Self> {
        let parts = split(pattern)?;
        let last = parts.len().saturating_sub(1);
        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.into_iter().enumerate() {
            let segment = if part == WILDCARD_SEGMENT {
                if i != last {
                    return Err(invalid(pattern, "'*' is only allowed as the last segment"));
                }
                Segment::Rest
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(invalid(pattern, "parameter segment without a name"));
                }
                Segment::Param(name.to_string())
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }
        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a concrete topic, returning captured `:param` values on success.
    #[must_use]
    pub fn matches(&self, topic: &str) -> Option<HashMap<String, String>> {
        let mut params = HashMap::new();
        let mut parts = topic.split('/');
        for segment in &self.segments {
            match segment {
                Segment::Rest => return Some(params),
                Segment::Literal(expected) => {
                    if parts.next()? != expected {
                        return None;
                    }
                },
                Segment::Param(name) => {
                    params.insert(name.clone(), parts.next()?.to_string());
                },
            }
        }
        parts.next().is_none().then_some(params)
    }
}

/// Validate a concrete topic used for publishing.
///
/// # Errors
///
/// Returns [`BusError::InvalidTopic`] if the topic is empty, has empty
/// segments, or contains pattern syntax.
pub(crate) fn validate_topic(topic: &str) -> BusResult<()> {
    for part in split(topic)? {
        if part == WILDCARD_SEGMENT || part.starts_with(':') {
            return Err(invalid(topic, "wildcards are not allowed when publishing"));
        }
    }
    Ok(())
}

fn split(topic: &str) -> BusResult<Vec<&str>> {
    if topic.is_empty() {
        return Err(invalid(topic, "topic must not be empty"));
    }
    let parts: Vec<&str> = topic.split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(invalid(topic, "topic must not contain empty segments"));
    }
    Ok(parts)
}

fn invalid(topic: &str, reason: &str) -> BusError {
    BusError::InvalidTopic {
        topic: topic.to_string(),
        reason: reason.to_string(),
    }
}
