//! CSV type-descriptor loader.
//!
//! # CSV format
//!
//! One row per dependency.  A type without dependencies has a single row
//! with the three dependency columns left empty; a type with several
//! dependencies repeats its name, version and archetype on every row.
//!
//! ```csv
//! name,version,archetype,dependency,min_version,max_version
//! BigDoor,1,BigDoor,,,
//! Portcullis,2,SlidingDoor,BigDoor,1,3
//! Portcullis,2,SlidingDoor,Drawbridge,1,1
//! ```
//!
//! `archetype` is matched case-insensitively against the archetype names
//! (`BigDoor`, `Drawbridge`, `SlidingDoor`, `RevolvingDoor`, `GarageDoor`,
//! `Flag`, `Clock`).  Descriptors are returned in order of first appearance.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use door_core::Archetype;

use crate::descriptor::{Dependency, TypeDescriptor};
use crate::{RegistrationError, RegistrationResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DescriptorRecord {
    name:        String,
    version:     u32,
    archetype:   String,
    dependency:  Option<String>,
    min_version: Option<u32>,
    max_version: Option<u32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load type descriptors from a CSV file.
pub fn load_descriptors_csv(path: &Path) -> RegistrationResult<Vec<TypeDescriptor>> {
    let file = std::fs::File::open(path).map_err(|e| RegistrationError::Io(e.to_string()))?;
    load_descriptors_reader(file)
}

/// Like [`load_descriptors_csv`] but accepts any `Read` source.
pub fn load_descriptors_reader<R: Read>(reader: R) -> RegistrationResult<Vec<TypeDescriptor>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut descriptors: Vec<TypeDescriptor> = Vec::new();
    let mut position: FxHashMap<String, usize> = FxHashMap::default();

    for result in csv_reader.deserialize::<DescriptorRecord>() {
        let row = result.map_err(|e| RegistrationError::Parse(e.to_string()))?;

        let archetype = Archetype::from_name(row.archetype.trim()).ok_or_else(|| {
            RegistrationError::Parse(format!("unknown archetype {:?} for type {:?}", row.archetype, row.name))
        })?;

        let key = row.name.to_lowercase();
        let i = match position.get(&key) {
            Some(&i) => {
                let existing = &descriptors[i];
                if existing.version != row.version || existing.archetype != archetype {
                    return Err(RegistrationError::Parse(format!(
                        "conflicting rows for type {:?}: version and archetype must match",
                        row.name
                    )));
                }
                i
            }
            None => {
                position.insert(key, descriptors.len());
                descriptors.push(TypeDescriptor::new(row.name.clone(), row.version, archetype));
                descriptors.len() - 1
            }
        };

        if let Some(dependency) = parse_dependency(&row)? {
            descriptors[i].dependencies.push(dependency);
        }
    }

    Ok(descriptors)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_dependency(row: &DescriptorRecord) -> RegistrationResult<Option<Dependency>> {
    let name = match row.dependency.as_deref().map(str::trim) {
        None | Some("") => return Ok(None),
        Some(name) => name,
    };
    match (row.min_version, row.max_version) {
        (Some(min), Some(max)) if min <= max => Ok(Some(Dependency::new(name, min, max))),
        (Some(min), Some(max)) => Err(RegistrationError::Parse(format!(
            "type {:?}: empty version range {min}..={max} for dependency {name:?}",
            row.name
        ))),
        _ => Err(RegistrationError::Parse(format!(
            "type {:?}: dependency {name:?} needs both min_version and max_version",
            row.name
        ))),
    }
}
