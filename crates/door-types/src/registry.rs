//! `TypeRegistry` — registered door types and dependency resolution.
//!
//! # Tables
//!
//! Three lookups are kept behind a single `RwLock`, so a reader never sees a
//! type that is present by id but missing by name (or vice versa):
//!
//! | Table            | Key                  | Value                          |
//! |------------------|----------------------|--------------------------------|
//! | `by_id`          | `TypeId`             | descriptor + enabled flag      |
//! | `by_name`        | lower-cased name     | `TypeId`                       |
//! | `enabled_sorted` | (position)           | enabled descriptors, by name   |
//!
//! # Batch resolution
//!
//! A batch may contain types that depend on each other in any order.  Each
//! entry moves through `NotChecked → Checking → Ok | NotOk`; a dependency that
//! is still `Checking` when it is reached again is part of a cycle and counts
//! as unavailable.  Once every status has settled, the `Ok` entries are
//! registered without being re-validated.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{error, info, warn};

use door_core::TypeId;

use crate::descriptor::TypeDescriptor;
use crate::{RegistrationError, RegistrationResult};

// ── Tables ────────────────────────────────────────────────────────────────────

struct TypeEntry {
    descriptor: Arc<TypeDescriptor>,
    enabled:    bool,
}

#[derive(Default)]
struct Tables {
    by_id:          FxHashMap<TypeId, TypeEntry>,
    by_name:        FxHashMap<String, TypeId>,
    enabled_sorted: Vec<Arc<TypeDescriptor>>,
    /// Last id handed out.  Ids start at 1 and are never reused.
    last_id:        u32,
}

fn sort_key(d: &TypeDescriptor) -> (String, &str) {
    (d.key(), d.name.as_str())
}

impl Tables {
    fn version_of(&self, key: &str) -> Option<u32> {
        let id = self.by_name.get(key)?;
        self.by_id.get(id).map(|e| e.descriptor.version)
    }

    fn insert_enabled(&mut self, descriptor: Arc<TypeDescriptor>) {
        let pos = self
            .enabled_sorted
            .partition_point(|d| sort_key(d) < sort_key(&descriptor));
        self.enabled_sorted.insert(pos, descriptor);
    }

    fn remove_enabled(&mut self, descriptor: &Arc<TypeDescriptor>) {
        self.enabled_sorted.retain(|d| !Arc::ptr_eq(d, descriptor));
    }

    /// Store an already validated descriptor.
    fn insert(&mut self, descriptor: TypeDescriptor, enabled: bool) -> TypeId {
        self.last_id += 1;
        let id = TypeId(self.last_id);
        let descriptor = Arc::new(descriptor);

        self.by_name.insert(descriptor.key(), id);
        if enabled {
            self.insert_enabled(Arc::clone(&descriptor));
        }
        info!(%id, descriptor = %descriptor, enabled, "registered door type");
        self.by_id.insert(id, TypeEntry { descriptor, enabled });
        id
    }
}

// ── Batch resolution ──────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Debug)]
enum CheckStatus {
    NotChecked,
    Checking,
    Ok,
    NotOk(RegistrationError),
}

struct BatchResolver<'a> {
    tables: &'a Tables,
    batch:  &'a [TypeDescriptor],
    /// Lower-cased name → position of the first batch entry with that name.
    index:  FxHashMap<String, usize>,
    status: Vec<CheckStatus>,
}

impl<'a> BatchResolver<'a> {
    fn new(tables: &'a Tables, batch: &'a [TypeDescriptor]) -> Self {
        let mut index = FxHashMap::default();
        let mut status = Vec::with_capacity(batch.len());

        // Names already registered, or repeated within the batch, can never
        // be registered again.
        for (i, desc) in batch.iter().enumerate() {
            let key = desc.key();
            if tables.by_name.contains_key(&key) || index.contains_key(&key) {
                status.push(CheckStatus::NotOk(RegistrationError::AlreadyRegistered(desc.name.clone())));
            } else {
                index.insert(key, i);
                status.push(CheckStatus::NotChecked);
            }
        }
        BatchResolver { tables, batch, index, status }
    }

    /// Settle every entry's status.  `Ok(())` marks an entry that may be
    /// registered.
    fn resolve_all(mut self) -> Vec<RegistrationResult<()>> {
        for i in 0..self.batch.len() {
            self.resolve(i);
        }
        self.status
            .into_iter()
            .map(|status| match status {
                CheckStatus::NotOk(e) => Err(e),
                _ => Ok(()),
            })
            .collect()
    }

    /// `true` if entry `i` has all its dependencies met.
    fn resolve(&mut self, i: usize) -> bool {
        match &self.status[i] {
            CheckStatus::Ok => return true,
            CheckStatus::NotOk(_) | CheckStatus::Checking => return false,
            CheckStatus::NotChecked => {}
        }

        self.status[i] = CheckStatus::Checking;
        let (ok, status) = match self.check_dependencies(i) {
            Ok(()) => (true, CheckStatus::Ok),
            Err(e) => (false, CheckStatus::NotOk(e)),
        };
        self.status[i] = status;
        ok
    }

    fn check_dependencies(&mut self, i: usize) -> RegistrationResult<()> {
        let batch = self.batch;
        let desc = &batch[i];

        for dep in &desc.dependencies {
            let key = dep.key();
            let version = match self.tables.version_of(&key) {
                Some(v) => Some(v),
                None => match self.index.get(&key).copied() {
                    Some(j) if self.resolve(j) => Some(batch[j].version),
                    _ => None,
                },
            };

            let Some(version) = version else {
                return Err(RegistrationError::DependencyUnavailable {
                    type_name:  desc.name.clone(),
                    dependency: dep.name.clone(),
                });
            };
            if !dep.accepts(version) {
                return Err(RegistrationError::DependencyVersionUnsupported {
                    type_name:   desc.name.clone(),
                    dependency:  dep.name.clone(),
                    found:       version,
                    min_version: dep.min_version,
                    max_version: dep.max_version,
                });
            }
        }
        Ok(())
    }
}

// ── TypeRegistry ──────────────────────────────────────────────────────────────

/// Registry of door types, explicitly constructed and shared by reference.
#[derive(Default)]
pub struct TypeRegistry {
    tables: RwLock<Tables>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one type.  Its dependencies must already be registered.
    pub fn register(&self, descriptor: TypeDescriptor, enabled: bool) -> RegistrationResult<TypeId> {
        let mut tables = self.tables.write();

        let result = BatchResolver::new(&tables, std::slice::from_ref(&descriptor))
            .resolve_all()
            .pop()
            .unwrap_or(Ok(()));

        match result {
            Ok(()) => Ok(tables.insert(descriptor, enabled)),
            Err(e) => {
                error!(type_name = %descriptor.name, error = %e, "failed to register door type");
                Err(e)
            }
        }
    }

    /// Register a batch of types that may depend on each other.
    ///
    /// Results are returned in input order; successful types are enabled.
    pub fn register_batch(&self, descriptors: Vec<TypeDescriptor>) -> Vec<RegistrationResult<TypeId>> {
        let mut tables = self.tables.write();

        let outcomes = BatchResolver::new(&tables, &descriptors).resolve_all();

        descriptors
            .into_iter()
            .zip(outcomes)
            .map(|(descriptor, outcome)| match outcome {
                Ok(()) => Ok(tables.insert(descriptor, true)),
                Err(e) => {
                    error!(type_name = %descriptor.name, error = %e, "failed to register door type");
                    Err(e)
                }
            })
            .collect()
    }

    /// Remove a type from every table.  Returns its descriptor if it was
    /// registered.
    pub fn unregister(&self, id: TypeId) -> Option<Arc<TypeDescriptor>> {
        let mut tables = self.tables.write();
        let Some(entry) = tables.by_id.remove(&id) else {
            warn!(%id, "trying to unregister a door type that isn't registered");
            return None;
        };
        tables.by_name.remove(&entry.descriptor.key());
        tables.remove_enabled(&entry.descriptor);
        info!(%id, descriptor = %entry.descriptor, "unregistered door type");
        Some(entry.descriptor)
    }

    /// Enable or disable a registered type.  Returns `false` if `id` is unknown.
    pub fn set_enabled(&self, id: TypeId, enabled: bool) -> bool {
        let mut tables = self.tables.write();
        let Some(entry) = tables.by_id.get_mut(&id) else {
            return false;
        };
        if entry.enabled == enabled {
            return true;
        }
        entry.enabled = enabled;
        let descriptor = Arc::clone(&entry.descriptor);
        if enabled {
            tables.insert_enabled(descriptor);
        } else {
            tables.remove_enabled(&descriptor);
        }
        true
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Enabled types ordered by name.
    pub fn enabled_types_sorted(&self) -> Vec<Arc<TypeDescriptor>> {
        self.tables.read().enabled_sorted.clone()
    }

    pub fn is_registered(&self, id: TypeId) -> bool {
        self.tables.read().by_id.contains_key(&id)
    }

    pub fn is_enabled(&self, id: TypeId) -> bool {
        self.tables.read().by_id.get(&id).is_some_and(|e| e.enabled)
    }

    pub fn get_by_id(&self, id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.tables.read().by_id.get(&id).map(|e| Arc::clone(&e.descriptor))
    }

    /// Case-insensitive lookup.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        let tables = self.tables.read();
        let id = tables.by_name.get(&name.to_lowercase())?;
        tables.by_id.get(id).map(|e| Arc::clone(&e.descriptor))
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.tables.read().by_name.get(&name.to_lowercase()).copied()
    }

    /// Every registered type, ordered by id.
    pub fn registered_types(&self) -> Vec<(TypeId, Arc<TypeDescriptor>)> {
        let tables = self.tables.read();
        let mut types: Vec<_> = tables
            .by_id
            .iter()
            .map(|(id, e)| (*id, Arc::clone(&e.descriptor)))
            .collect();
        types.sort_by_key(|(id, _)| *id);
        types
    }

    pub fn len(&self) -> usize {
        self.tables.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
