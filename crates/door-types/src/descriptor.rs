//! Type descriptors and their versioned dependencies.

use std::fmt;

use door_core::Archetype;

/// A versioned requirement on another type.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dependency {
    /// Name of the required type (case-insensitive).
    pub name:        String,
    pub min_version: u32,
    pub max_version: u32,
}

impl Dependency {
    pub fn new(name: impl Into<String>, min_version: u32, max_version: u32) -> Self {
        Self { name: name.into(), min_version, max_version }
    }

    /// `true` if `version` lies inside the inclusive `[min, max]` range.
    #[inline]
    pub fn accepts(&self, version: u32) -> bool {
        (self.min_version..=self.max_version).contains(&version)
    }

    pub(crate) fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Everything needed to register a door type.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescriptor {
    /// Display name, unique case-insensitively.
    pub name:         String,
    pub version:      u32,
    pub archetype:    Archetype,
    pub dependencies: Vec<Dependency>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, version: u32, archetype: Archetype) -> Self {
        Self { name: name.into(), version, archetype, dependencies: Vec::new() }
    }

    /// Built-in descriptor for an archetype, named after it, at version 1.
    pub fn builtin(archetype: Archetype) -> Self {
        Self::new(archetype.name(), 1, archetype)
    }

    pub fn with_dependency(mut self, name: impl Into<String>, min_version: u32, max_version: u32) -> Self {
        self.dependencies.push(Dependency::new(name, min_version, max_version));
        self
    }

    /// Lower-cased name used as the lookup key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} ({})", self.name, self.version, self.archetype)
    }
}
