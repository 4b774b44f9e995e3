//! Typed provider parameters and capability queries
//!
//! External callers control providers through named, typed parameters and
//! discover optional behavior through an enumerable capability set, instead
//! of a stringly "call by function name" escape hatch.

/// A typed parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// What a provider actually implements beyond the required contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderCaps {
    /// Reports progress for long-running work
    pub has_progress: bool,
    /// `modification_hash` is genuinely cheap (no geometry built)
    pub cheap_hash_probe: bool,
    /// May return partial results flagged `INCOMPLETE`
    pub long_running: bool,
}
