//! Directive parser — per-field relation annotations.
//!
//! Grammar: `mode[,relationKey[,idKey]]` with `mode` one of
//! `include`, `includes`, `hasone`, `hasmany` (matched case-exactly).
//!
//! | Mode | Tokens | Resolves from |
//! |------|--------|---------------|
//! | `include` | 2 | nested object `node[relationKey]` |
//! | `includes` | 2 | nested array `node[relationKey]` |
//! | `hasone` | 3 | `document[relationKey]` by `node[idKey]` |
//! | `hasmany` | 3 | `document[relationKey]` by each of `node[idKey]` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Directive parse failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("missing mode")]
    MissingMode,

    /// Not fatal unless strict modes are enabled; see `Options::strict_modes`.
    #[error("unrecognized mode '{0}'")]
    UnknownMode(String),

    #[error("mode '{mode}' requires a relation key")]
    MissingRelationKey { mode: Mode },

    #[error("mode '{mode}' requires an id key")]
    MissingIdKey { mode: Mode },
}

/// How a relation field is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Single object nested in the node.
    Include,
    /// Array of objects nested in the node.
    Includes,
    /// Single object sideloaded in a top-level array, referenced by id.
    HasOne,
    /// Objects sideloaded in a top-level array, referenced by an id array.
    HasMany,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Include => "include",
            Mode::Includes => "includes",
            Mode::HasOne => "hasone",
            Mode::HasMany => "hasmany",
        }
    }

    /// Sideloaded modes look up ids in the document rather than the node.
    pub fn is_sideloaded(&self) -> bool {
        matches!(self, Mode::HasOne | Mode::HasMany)
    }

    /// Modes that resolve into a sequence rather than a single reference.
    pub fn is_many(&self) -> bool {
        matches!(self, Mode::Includes | Mode::HasMany)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(Mode::Include),
            "includes" => Ok(Mode::Includes),
            "hasone" => Ok(Mode::HasOne),
            "hasmany" => Ok(Mode::HasMany),
            "" => Err(DirectiveError::MissingMode),
            other => Err(DirectiveError::UnknownMode(other.to_owned())),
        }
    }
}

/// A parsed relation directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub mode: Mode,
    /// Nested key (include modes) or top-level array key (sideloaded modes).
    pub relation_key: String,
    /// Node key holding the identifier(s). Only set for sideloaded modes.
    pub id_key: Option<String>,
}

impl Directive {
    /// Parse a raw annotation string.
    ///
    /// Tokens past the ones a mode needs are ignored. An unrecognized mode is
    /// reported as [`DirectiveError::UnknownMode`]; callers decide whether
    /// that skips the field or fails it.
    pub fn parse(raw: &str) -> Result<Self, DirectiveError> {
        let tokens: SmallVec<[&str; 3]> = raw.split(',').collect();
        let mode: Mode = tokens[0].parse()?;

        let relation_key = match tokens.get(1) {
            Some(key) if !key.is_empty() => (*key).to_owned(),
            _ => return Err(DirectiveError::MissingRelationKey { mode }),
        };

        let id_key = if mode.is_sideloaded() {
            match tokens.get(2) {
                Some(key) if !key.is_empty() => Some((*key).to_owned()),
                _ => return Err(DirectiveError::MissingIdKey { mode }),
            }
        } else {
            None
        };

        Ok(Self { mode, relation_key, id_key })
    }

    /// Id key for sideloaded modes, empty for include modes.
    pub fn id_key(&self) -> &str {
        self.id_key.as_deref().unwrap_or("")
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Directive::parse(s)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.mode, self.relation_key)?;
        if let Some(id_key) = &self.id_key {
            write!(f, ",{id_key}")?;
        }
        Ok(())
    }
}
