//! Resource ID errors

use thiserror::Error;

/// Error raised while parsing a resource ID against its template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A named segment was absent, empty or did not match its literal
    #[error(
        "parsing the {id_type} ID: the segment {segment:?} at position {position} was not specified\n\n\
         Expected an ID that matched:\n\n> {example}\n\n\
         However this value was provided:\n\n> {input}{}",
        describe_parsed(.parsed)
    )]
    SegmentNotSpecified {
        id_type: String,
        segment: String,
        position: usize,
        example: String,
        input: String,
        /// Values successfully parsed before the failure, in template order
        parsed: Vec<(String, String)>,
    },

    /// The input has more segments than the template
    #[error(
        "parsing the {id_type} ID: expected {expected} segments but {input:?} has {actual}\n\n\
         Expected an ID that matched:\n\n> {example}"
    )]
    SegmentCount {
        id_type: String,
        input: String,
        expected: usize,
        actual: usize,
        example: String,
    },

    /// A constant segment carried a value outside its allowed set
    #[error(
        "parsing the {id_type} ID: the segment {segment:?} had the value {value:?} but expected one of: {}",
        .allowed.join(", ")
    )]
    InvalidConstant {
        id_type: String,
        segment: String,
        value: String,
        allowed: Vec<String>,
    },
}

impl ParseError {
    /// Name of the segment the error refers to, when there is one
    pub fn segment(&self) -> Option<&str> {
        match self {
            Self::SegmentNotSpecified { segment, .. } | Self::InvalidConstant { segment, .. } => {
                Some(segment)
            }
            Self::SegmentCount { .. } => None,
        }
    }
}

fn describe_parsed(parsed: &[(String, String)]) -> String {
    if parsed.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = parsed
        .iter()
        .map(|(name, value)| format!("* Segment {:?}: {:?}", name, value))
        .collect();
    format!("\n\nThe parsed ID contained:\n\n{}", lines.join("\n"))
}

/// Error raised when an ID template itself is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template {template:?} must start with '/'")]
    MissingLeadingSlash { template: String },

    #[error("template {template:?} contains an empty segment")]
    EmptySegment { template: String },

    #[error("template {template:?} has an unterminated or misplaced brace in {segment:?}")]
    MalformedPlaceholder { template: String, segment: String },

    #[error("template {template:?} declares the segment {name:?} more than once")]
    DuplicateSegment { template: String, name: String },

    #[error("template {template:?} declares more than one scope segment")]
    MultipleScopes { template: String },
}
