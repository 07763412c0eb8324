//! Error types for reference loading.

use thiserror::Error;

/// Error type for parsing the opcode reference document.
///
/// Any of these aborts loading; a partially parsed catalog is never
/// published.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A hex byte string could not be parsed.
    #[error("invalid hex byte: {0:?}")]
    InvalidHexByte(String),

    /// A numeric attribute or element value could not be parsed.
    #[error("invalid {name} value: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    /// An enumerated string is not part of its closed vocabulary.
    #[error("unknown {kind} value: {value:?}")]
    UnknownEnum { kind: &'static str, value: String },

    /// A required child element is missing.
    #[error("missing <{0}> element")]
    MissingElement(&'static str),

    /// A required attribute is missing.
    #[error("missing {0} attribute")]
    MissingAttribute(&'static str),

    /// A child element that must be unique appeared more than once.
    #[error("more than one <{0}> element")]
    DuplicateElement(&'static str),

    /// An operand property was given both as an attribute and as a
    /// child element.
    #[error("operand {0} given both as attribute and as child element")]
    DoubleSpecified(&'static str),

    /// An operand element contains more than one text node.
    #[error("operand has more than one text node")]
    MultipleTextNodes,

    /// Inverted processor support range.
    #[error("processor range start {start} exceeds end {end}")]
    ProcessorRange { start: u32, end: u32 },
}

impl ReferenceError {
    /// Creates a new UnknownEnum error.
    pub fn unknown_enum(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownEnum {
            kind,
            value: value.into(),
        }
    }

    /// Creates a new InvalidValue error.
    pub fn invalid_value(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            value: value.into(),
        }
    }
}
