//! Typed field specifiers.
//!
//! Callers name database fields with a compact string: either a bare
//! `name`, or `type:name` where `type` is one of the scalar kinds in
//! [`FieldType`]. [`FieldSpec::parse`] is the single place this syntax is
//! interpreted; every statement generator works on parsed specs.
//!
//! ```
//! use oxide_admindb_core::{FieldSpec, FieldType};
//!
//! let id = FieldSpec::parse("integer:id", FieldType::Text).unwrap();
//! assert_eq!(id.name(), "id");
//! assert_eq!(id.field_type(), FieldType::Integer);
//!
//! let title = FieldSpec::parse("title", FieldType::Text).unwrap();
//! assert_eq!(title.field_type(), FieldType::Text);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .unwrap_or_else(|e| unreachable!("identifier pattern is valid: {e}"))
});

/// Returns whether `name` is a plain or dot-qualified SQL identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Validates a table name before it is interpolated into a statement.
pub fn check_identifier(name: &str) -> Result<&str> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// Scalar kinds a field can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 64-bit signed integer.
    Integer,
    /// Free text.
    Text,
    /// True/false flag.
    Boolean,
    /// Double precision float.
    Float,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without zone.
    Timestamp,
}

impl FieldType {
    /// All supported kinds, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Integer,
        Self::Text,
        Self::Boolean,
        Self::Float,
        Self::Date,
        Self::Time,
        Self::Timestamp,
    ];

    /// Returns the type token used in field specifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::field_spec(s, format!("unknown field type '{s}'")))
    }
}

/// A parsed `(name, type)` field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
}

impl FieldSpec {
    /// Creates a spec from an already separated name and type.
    pub fn new(name: &str, field_type: FieldType) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::field_spec(name, "empty field name"));
        }
        if !is_identifier(name) {
            return Err(Error::field_spec(name, "field name is not an identifier"));
        }
        Ok(Self {
            name: name.to_string(),
            field_type,
        })
    }

    /// Parses `name` or `type:name`, falling back to `default` when no type
    /// prefix is present.
    pub fn parse(spec: &str, default: FieldType) -> Result<Self> {
        let mut parts = spec.split(':');
        let (ty, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), None, None) => (default, name),
            (Some(ty), Some(name), None) => {
                let ty = ty
                    .parse::<FieldType>()
                    .map_err(|_| Error::field_spec(spec, format!("unknown field type '{ty}'")))?;
                (ty, name)
            }
            _ => return Err(Error::field_spec(spec, "more than one ':'")),
        };

        if name.is_empty() {
            return Err(Error::field_spec(spec, "empty field name"));
        }
        if !is_identifier(name) {
            return Err(Error::field_spec(spec, "field name is not an identifier"));
        }

        Ok(Self {
            name: name.to_string(),
            field_type: ty,
        })
    }

    /// Parses a list of specifiers with a shared default type.
    ///
    /// An empty list is rejected: every statement needs at least one field.
    pub fn parse_all<S: AsRef<str>>(specs: &[S], default: FieldType) -> Result<Vec<Self>> {
        if specs.is_empty() {
            return Err(Error::field_spec("", "empty field list"));
        }
        specs
            .iter()
            .map(|spec| Self::parse(spec.as_ref(), default))
            .collect()
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved field type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field_type, self.name)
    }
}
