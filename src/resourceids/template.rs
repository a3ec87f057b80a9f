//! Resource ID Templates
//!
//! A [`ResourceIdType`] is a declarative, ordered list of segments. One
//! generic routine formats values into the canonical path and parses a path
//! back into values, so individual resource types never hand-roll either.

use super::error::{ParseError, TemplateError};
use super::segment::{Segment, SegmentKind};
use std::collections::HashSet;
use std::fmt;

/// The shape of one kind of resource ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdType {
    name: String,
    segments: Vec<Segment>,
}

impl ResourceIdType {
    /// Build an ID type from explicit segments
    pub fn new(name: &str, segments: Vec<Segment>) -> Result<Self, TemplateError> {
        let id_type = Self {
            name: name.to_string(),
            segments,
        };
        id_type.check()?;
        Ok(id_type)
    }

    /// Build an ID type from a template string such as
    /// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Example/widgets/{widgetName}`
    ///
    /// `{subscriptionId}`, `{resourceGroupName}` and `{scope}` are recognised
    /// by name, `{name:a|b}` declares a constant, and the literal following
    /// `providers` is the resource provider namespace.
    pub fn from_template(name: &str, template: &str) -> Result<Self, TemplateError> {
        let Some(body) = template.strip_prefix('/') else {
            return Err(TemplateError::MissingLeadingSlash {
                template: template.to_string(),
            });
        };

        let mut segments: Vec<Segment> = Vec::new();
        let mut static_names: HashSet<String> = HashSet::new();
        let mut previous: Option<&str> = None;

        for raw in body.split('/') {
            if raw.is_empty() {
                return Err(TemplateError::EmptySegment {
                    template: template.to_string(),
                });
            }

            let segment = if let Some(inner) = raw.strip_prefix('{') {
                let inner = inner
                    .strip_suffix('}')
                    .filter(|i| !i.is_empty() && !i.contains(['{', '}']))
                    .ok_or_else(|| TemplateError::MalformedPlaceholder {
                        template: template.to_string(),
                        segment: raw.to_string(),
                    })?;

                match inner.split_once(':') {
                    Some((name, values)) => {
                        let values: Vec<&str> = values.split('|').collect();
                        Segment::constant(name, &values)
                    }
                    None => match inner {
                        "subscriptionId" => Segment::subscription_id(inner),
                        "resourceGroupName" => Segment::resource_group(inner),
                        "scope" => Segment::scope(inner),
                        other => Segment::user_specified(other),
                    },
                }
            } else if raw.contains(['{', '}']) {
                return Err(TemplateError::MalformedPlaceholder {
                    template: template.to_string(),
                    segment: raw.to_string(),
                });
            } else {
                let name = unique_static_name(&mut static_names, raw);
                if previous == Some("providers") {
                    Segment::resource_provider(&name, raw)
                } else {
                    Segment::static_segment(&name, raw)
                }
            };

            previous = Some(raw);
            segments.push(segment);
        }

        Self::new(name, segments)
    }

    fn check(&self) -> Result<(), TemplateError> {
        let mut seen = HashSet::new();
        let mut scopes = 0;

        for segment in &self.segments {
            if !seen.insert(segment.name.as_str()) {
                return Err(TemplateError::DuplicateSegment {
                    template: self.template(),
                    name: segment.name.clone(),
                });
            }
            if segment.kind == SegmentKind::Scope {
                scopes += 1;
            }
        }

        if scopes > 1 {
            return Err(TemplateError::MultipleScopes {
                template: self.template(),
            });
        }

        Ok(())
    }

    /// Human readable name of the ID type, e.g. `SignalR`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Look up a segment by name
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    /// Names of the segments whose values the caller supplies
    pub fn value_segment_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.is_value())
            .map(|s| s.name.as_str())
            .collect()
    }

    /// The template string with placeholders
    pub fn template(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("/{}", s))
            .collect::<String>()
    }

    /// An example ID built from each segment's example value
    pub fn example(&self) -> String {
        let values: Vec<String> = self.segments.iter().map(|s| s.example.clone()).collect();
        self.render(&values)
    }

    /// Substitute values into the template in declaration order.
    ///
    /// `values` is aligned with [`Self::segments`]. No validation is performed.
    pub fn render(&self, values: &[String]) -> String {
        let mut out = String::new();
        for (segment, value) in self.segments.iter().zip(values) {
            out.push('/');
            if segment.kind == SegmentKind::Scope {
                out.push_str(value.trim_start_matches('/'));
            } else {
                out.push_str(value);
            }
        }
        out
    }

    /// Parse `input` into values aligned with [`Self::segments`].
    ///
    /// With `insensitively` set, literals match in any case and are
    /// normalised to their canonical spelling. Only use that for values the
    /// API itself returned, never to validate user input.
    pub fn parse_values(
        &self,
        input: &str,
        insensitively: bool,
    ) -> Result<Vec<String>, ParseError> {
        let tokens = tokenize(input);

        match self.segments.iter().position(|s| s.kind == SegmentKind::Scope) {
            None => self.parse_sequential(input, &tokens, insensitively),
            Some(scope_index) => self.parse_scoped(input, &tokens, scope_index, insensitively),
        }
    }

    fn parse_sequential(
        &self,
        input: &str,
        tokens: &[&str],
        insensitively: bool,
    ) -> Result<Vec<String>, ParseError> {
        let mut values = Vec::with_capacity(self.segments.len());

        for (position, segment) in self.segments.iter().enumerate() {
            let token = tokens.get(position).copied();
            match token.and_then(|t| segment.match_token(t, insensitively)) {
                Some(value) => values.push(value),
                None => return Err(self.mismatch(position, token, input, &values)),
            }
        }

        if tokens.len() > self.segments.len() {
            return Err(ParseError::SegmentCount {
                id_type: self.name.clone(),
                input: input.to_string(),
                expected: self.segments.len(),
                actual: tokens.len(),
                example: self.example(),
            });
        }

        Ok(values)
    }

    fn parse_scoped(
        &self,
        input: &str,
        tokens: &[&str],
        scope_index: usize,
        insensitively: bool,
    ) -> Result<Vec<String>, ParseError> {
        let prefix = &self.segments[..scope_index];
        let suffix = &self.segments[scope_index + 1..];
        let mut values = Vec::with_capacity(self.segments.len());

        for (position, segment) in prefix.iter().enumerate() {
            let token = tokens.get(position).copied();
            match token.and_then(|t| segment.match_token(t, insensitively)) {
                Some(value) => values.push(value),
                None => return Err(self.mismatch(position, token, input, &values)),
            }
        }

        let remaining = &tokens[prefix.len().min(tokens.len())..];
        if remaining.len() <= suffix.len() {
            return Err(self.mismatch(scope_index, None, input, &values));
        }

        let split = remaining.len() - suffix.len();
        values.push(format!("/{}", remaining[..split].join("/")));

        let mut suffix_values = Vec::with_capacity(suffix.len());
        for (offset, segment) in suffix.iter().enumerate() {
            let token = remaining[split + offset];
            match segment.match_token(token, insensitively) {
                Some(value) => suffix_values.push(value),
                None => {
                    // Prefer blaming a segment missing from the tail over a
                    // misaligned literal.
                    if let Some(missing) = locate_missing_suffix(remaining, suffix, insensitively) {
                        let position = scope_index + 1 + missing;
                        return Err(self.mismatch(position, None, input, &values));
                    }
                    values.extend(suffix_values);
                    let position = scope_index + 1 + offset;
                    return Err(self.mismatch(position, Some(token), input, &values));
                }
            }
        }

        values.extend(suffix_values);
        Ok(values)
    }

    fn mismatch(
        &self,
        position: usize,
        token: Option<&str>,
        input: &str,
        values: &[String],
    ) -> ParseError {
        let segment = &self.segments[position];

        if let (SegmentKind::Constant(allowed), Some(token)) = (&segment.kind, token) {
            if !token.is_empty() {
                return ParseError::InvalidConstant {
                    id_type: self.name.clone(),
                    segment: segment.name.clone(),
                    value: token.to_string(),
                    allowed: allowed.clone(),
                };
            }
        }

        let parsed = self
            .segments
            .iter()
            .zip(values)
            .filter(|(s, _)| s.is_value())
            .map(|(s, v)| (s.name.clone(), v.clone()))
            .collect();

        ParseError::SegmentNotSpecified {
            id_type: self.name.clone(),
            segment: segment.name.clone(),
            position,
            example: self.example(),
            input: input.to_string(),
            parsed,
        }
    }
}

impl fmt::Display for ResourceIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.template())
    }
}

/// Split a path into tokens, ignoring one leading `/`
fn tokenize(input: &str) -> Vec<&str> {
    let trimmed = input.strip_prefix('/').unwrap_or(input);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Find the suffix segment missing from the end of `tokens`.
///
/// Looks for the latest position where the suffix starts matching and runs
/// out of tokens before running out of segments.
fn locate_missing_suffix(
    tokens: &[&str],
    suffix: &[Segment],
    insensitively: bool,
) -> Option<usize> {
    for start in (1..tokens.len()).rev() {
        let tail = &tokens[start..];
        if tail.len() >= suffix.len() {
            continue;
        }
        let matched = tail
            .iter()
            .zip(suffix)
            .take_while(|(token, segment)| segment.match_token(token, insensitively).is_some())
            .count();
        if matched == tail.len() && matched > 0 {
            return Some(matched);
        }
    }
    None
}

/// `Microsoft.SignalRService` -> `staticMicrosoftSignalRService`, numbered on reuse
fn unique_static_name(taken: &mut HashSet<String>, literal: &str) -> String {
    let mut camel = String::with_capacity(literal.len());
    let mut upper = true;
    for c in literal.chars() {
        if c.is_ascii_alphanumeric() {
            if upper {
                camel.push(c.to_ascii_uppercase());
            } else {
                camel.push(c);
            }
            upper = false;
        } else {
            upper = true;
        }
    }

    let base = format!("static{}", camel);
    let mut name = base.clone();
    let mut counter = 2;
    while taken.contains(&name) {
        name = format!("{}{}", base, counter);
        counter += 1;
    }
    taken.insert(name.clone());
    name
}
