use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Parses a dotted field path, panicking on invalid input. For statically
/// known paths only.
#[macro_export]
macro_rules! field {
    ($expr:expr) => {
        <$crate::field::Field as ::std::str::FromStr>::from_str($expr)
            .unwrap_or_else(|e| panic!("failed to parse field {:?}: {}", $expr, e))
    };
}

/// A dotted path into a nested document, e.g. `orders.date_placed`.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Field(Vec<String>);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("empty field path")]
    Empty,
    #[error("empty segment in field path '{0}'")]
    EmptySegment(String),
}

impl FromStr for Field {
    type Err = FieldParseError;

    fn from_str(field: &str) -> Result<Self, Self::Err> {
        if field.is_empty() {
            return Err(FieldParseError::Empty);
        }

        let mut segments = Vec::new();
        for part in field.split('.') {
            if part.is_empty() {
                return Err(FieldParseError::EmptySegment(field.to_string()));
            }
            segments.push(part.to_string());
        }

        Ok(Self(segments))
    }
}

impl Deref for Field {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();

        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
            for segment in iter {
                write!(f, ".{segment}")?;
            }
        }

        Ok(())
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Field>().map_err(serde::de::Error::custom)
    }
}
