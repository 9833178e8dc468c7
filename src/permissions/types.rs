/*!
 * Permission Types
 * The validated permission model consumed by the directive compiler
 */

use crate::core::errors::{PolicyError, PolicyResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Ordinal trust tier selecting the ambient baseline.
///
/// Stored as a signed integer so the invalid sentinel (`-1`) round-trips
/// through serialization exactly like a real level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct TrustLevel(i8);

impl TrustLevel {
    /// Sentinel for an unresolved or rejected policy
    pub const INVALID: TrustLevel = TrustLevel(-1);
    pub const MAX: u8 = 3;

    /// Create a level, rejecting anything above [`TrustLevel::MAX`]
    pub fn new(level: u8) -> PolicyResult<Self> {
        if level > Self::MAX {
            return Err(PolicyError::invalid_level(level.to_string()));
        }
        Ok(TrustLevel(level as i8))
    }

    /// Parse the textual `Level` value of a declaration
    pub fn parse(raw: &str) -> PolicyResult<Self> {
        raw.trim()
            .parse::<u8>()
            .map_err(|_| PolicyError::invalid_level(raw))
            .and_then(|level| Self::new(level).map_err(|_| PolicyError::invalid_level(raw)))
    }

    /// The level, or `None` for the invalid sentinel
    #[inline]
    #[must_use]
    pub fn get(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }

    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.get().is_some()
    }
}

impl Default for TrustLevel {
    fn default() -> Self {
        Self::INVALID
    }
}

impl TryFrom<i8> for TrustLevel {
    type Error = PolicyError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::INVALID),
            0..=3 => Ok(TrustLevel(value)),
            other => Err(PolicyError::invalid_level(other.to_string())),
        }
    }
}

impl From<TrustLevel> for i8 {
    fn from(level: TrustLevel) -> Self {
        level.0
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access mode suffix of a file grant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    #[default]
    #[serde(rename = "ro")]
    ReadOnly,
    #[serde(rename = "rw")]
    ReadWrite,
}

impl AccessMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "ro",
            AccessMode::ReadWrite => "rw",
        }
    }

    /// Parse an exact `ro` / `rw` suffix
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ro" => Some(AccessMode::ReadOnly),
            "rw" => Some(AccessMode::ReadWrite),
            _ => None,
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized file grant: `<target>:<mode>`.
///
/// The mode is only split off when the text after the last `:` is exactly
/// `ro` or `rw`; anything else stays part of the target and the grant
/// defaults to read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FileGrant {
    target: String,
    mode: AccessMode,
}

impl FileGrant {
    pub fn new(target: impl Into<String>, mode: AccessMode) -> Self {
        Self {
            target: target.into(),
            mode,
        }
    }

    /// Normalize a raw grant token
    pub fn parse(token: &str) -> Self {
        match token.rsplit_once(':') {
            Some((target, suffix)) => match AccessMode::from_suffix(suffix) {
                Some(mode) => Self::new(target, mode),
                None => Self::new(token, AccessMode::ReadOnly),
            },
            None => Self::new(token, AccessMode::ReadOnly),
        }
    }

    /// Path or symbolic token, without the mode suffix
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }
}

impl fmt::Display for FileGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.target, self.mode)
    }
}

impl From<String> for FileGrant {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<FileGrant> for String {
    fn from(grant: FileGrant) -> Self {
        grant.to_string()
    }
}

/// Validated grant set for one launch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PermissionModel {
    pub level: TrustLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileGrant>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub devices: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sockets: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub share: BTreeSet<String>,
}

impl PermissionModel {
    #[must_use]
    pub fn new(level: TrustLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.files
            .extend(files.into_iter().map(|f| FileGrant::parse(f.as_ref())));
        self
    }

    #[must_use]
    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices.extend(devices.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_sockets<I, S>(mut self, sockets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sockets.extend(sockets.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_share<I, S>(mut self, share: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.share.extend(share.into_iter().map(Into::into));
        self
    }

    /// Whether any of the four grant sets is non-empty
    #[must_use]
    pub fn has_grants(&self) -> bool {
        !(self.files.is_empty()
            && self.devices.is_empty()
            && self.sockets.is_empty()
            && self.share.is_empty())
    }

    /// Check the model invariants.
    ///
    /// An empty grant set is reported before a bad level.
    pub fn validate(self) -> Result<Self, Rejection> {
        if !self.has_grants() {
            return Err(Rejection::new(self, PolicyError::EmptyGrantSet));
        }
        if !self.level.is_valid() {
            let err = PolicyError::invalid_level(self.level.to_string());
            return Err(Rejection::new(self, err));
        }
        Ok(self)
    }
}

/// A policy that failed validation.
///
/// Carries whatever grants were parsed so callers can report them, with the
/// level forced to [`TrustLevel::INVALID`] so the model cannot be compiled.
#[derive(Error, Debug, Clone)]
#[error("{error}")]
pub struct Rejection {
    pub model: PermissionModel,
    #[source]
    pub error: PolicyError,
}

impl Rejection {
    pub fn new(mut model: PermissionModel, error: PolicyError) -> Self {
        model.level = TrustLevel::INVALID;
        Self { model, error }
    }

    /// Rejection with nothing parsed
    pub fn empty(error: PolicyError) -> Self {
        Self::new(PermissionModel::default(), error)
    }
}

impl From<Rejection> for PolicyError {
    fn from(rejection: Rejection) -> Self {
        rejection.error
    }
}
