//! Plugin identifiers: the (name, version) pair naming one archive.
//!
//! Names are slash-separated (e.g. `github.com/acme/tool`) and map onto
//! nested directories under the cache root. Validation rejects anything that
//! would make two identifiers share a path or let a path escape the root.

use std::fmt;

/// Which half of the identifier failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    Name,
    Version,
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdField::Name => write!(f, "name"),
            IdField::Version => write!(f, "version"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid plugin {field} {value:?}: {reason}")]
pub struct InvalidPluginId {
    pub field: IdField,
    pub value: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginId {
    name: String,
    version: String,
}

impl PluginId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, InvalidPluginId> {
        let name = name.into();
        let version = version.into();
        check_name(&name)?;
        check_version(&version)?;
        Ok(Self { name, version })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The `/`-separated segments of the name, in order.
    pub fn name_segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('/')
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

fn invalid(field: IdField, value: &str, reason: &'static str) -> InvalidPluginId {
    InvalidPluginId {
        field,
        value: value.to_string(),
        reason,
    }
}

fn check_segment(field: IdField, whole: &str, segment: &str) -> Result<(), InvalidPluginId> {
    if segment.is_empty() {
        return Err(invalid(field, whole, "empty path segment"));
    }
    if segment == "." || segment == ".." {
        return Err(invalid(field, whole, "relative path segment"));
    }
    if segment.contains('\\') || segment.contains('\0') {
        return Err(invalid(field, whole, "backslash or NUL"));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), InvalidPluginId> {
    if name.is_empty() {
        return Err(invalid(IdField::Name, name, "must not be empty"));
    }
    for segment in name.split('/') {
        check_segment(IdField::Name, name, segment)?;
    }
    Ok(())
}

fn check_version(version: &str) -> Result<(), InvalidPluginId> {
    if version.is_empty() {
        return Err(invalid(IdField::Version, version, "must not be empty"));
    }
    if version.contains('/') {
        return Err(invalid(IdField::Version, version, "must not contain '/'"));
    }
    check_segment(IdField::Version, version, version)
}
