// ── Tri-state attributes ──
//
// Every field of a resource state is an `Attr<T>`: the caller either left it
// unset (`Null`), asked the server to compute it (`Unknown`), or supplied a
// concrete value (`Known`). In state files `Null` is omitted, `Unknown` is
// written as `{"$unknown": true}` and `Known` is the plain value.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const UNKNOWN_MARKER: &str = "$unknown";

/// An optionally-present resource attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Attr<T> {
    /// Not declared by the caller.
    #[default]
    Null,
    /// Declared, value computed by the server after create/update.
    Unknown,
    Known(T),
}

impl<T> Attr<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrow the known value, treating `Unknown` like `Null`.
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Null | Self::Unknown => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Null | Self::Unknown => None,
        }
    }

    /// `Known(v)` for `Some(v)`, `Null` otherwise.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }

    /// Partial-reconciliation rule for a plain field: adopt the wire value
    /// only when the caller had declared the field.
    pub fn refresh(&mut self, wire: Option<T>) {
        if !self.is_null() {
            *self = Self::from_option(wire);
        }
    }

    /// Full-decode rule for identifiers: a known value is never replaced.
    pub fn adopt_unless_known(&mut self, wire: Option<T>) {
        if let (false, Some(v)) = (self.is_known(), wire) {
            *self = Self::Known(v);
        }
    }

    /// Fill an `Unknown` from a create/update response. Known and null
    /// values are left alone.
    pub fn resolve_unknown(&mut self, wire: Option<T>) {
        if self.is_unknown() {
            *self = Self::from_option(wire);
        }
    }
}

impl<T: Clone> Attr<T> {
    /// The value to send on the wire: `Unknown` is never sent.
    pub fn to_wire(&self) -> Option<T> {
        self.known().cloned()
    }
}

impl<T: fmt::Display> Attr<T> {
    /// String form used for key-tuple comparison; null and unknown compare
    /// as the empty string.
    pub fn key_str(&self) -> String {
        self.known().map(ToString::to_string).unwrap_or_default()
    }
}

impl<T> From<T> for Attr<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl From<&str> for Attr<String> {
    fn from(value: &str) -> Self {
        Self::Known(value.to_owned())
    }
}

impl<T: fmt::Display> fmt::Display for Attr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Unknown => f.write_str("(known after apply)"),
            Self::Known(v) => v.fmt(f),
        }
    }
}

// ── Serde ────────────────────────────────────────────────────────────

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Unknown => {
                let mut marker = serde_json::Map::new();
                marker.insert(UNKNOWN_MARKER.to_owned(), serde_json::Value::Bool(true));
                marker.serialize(serializer)
            }
            Self::Known(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Attr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Object(ref map)
                if map.len() == 1 && map.get(UNKNOWN_MARKER) == Some(&serde_json::Value::Bool(true)) =>
            {
                Ok(Self::Unknown)
            }
            other => serde_json::from_value(other)
                .map(Self::Known)
                .map_err(serde::de::Error::custom),
        }
    }
}

// ── Defaults ─────────────────────────────────────────────────────────

/// How a field with an implied server default is partially reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRule {
    /// Declared fields adopt the wire value, or the default when the wire
    /// omits it. Undeclared fields stay null.
    Converge,
    /// Declared fields adopt the wire value when present; otherwise the
    /// local value survives only if it already equals the default.
    NullUnlessDefault,
}

/// A field's implied server default and its reconciliation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefault<T> {
    pub value: T,
    pub rule: DefaultRule,
}

impl<T> FieldDefault<T> {
    pub const fn converge(value: T) -> Self {
        Self {
            value,
            rule: DefaultRule::Converge,
        }
    }

    pub const fn null_unless_default(value: T) -> Self {
        Self {
            value,
            rule: DefaultRule::NullUnlessDefault,
        }
    }
}

impl<T: Clone + PartialEq> FieldDefault<T> {
    /// Full decode: absent wire value becomes the default.
    pub fn decode(&self, wire: Option<T>) -> Attr<T> {
        Attr::Known(wire.unwrap_or_else(|| self.value.clone()))
    }

    /// Partial reconciliation of `local` against `wire`.
    pub fn refresh(&self, local: &mut Attr<T>, wire: Option<T>) {
        match self.rule {
            DefaultRule::Converge => {
                if !local.is_null() {
                    *local = self.decode(wire);
                }
            }
            DefaultRule::NullUnlessDefault => match wire {
                Some(v) if !local.is_null() => *local = Attr::Known(v),
                _ => {
                    if local.known() != Some(&self.value) {
                        *local = Attr::Null;
                    }
                }
            },
        }
    }
}
