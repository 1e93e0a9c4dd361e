//! Unit tests for door-types.

#[cfg(test)]
mod helpers {
    use door_core::Archetype;

    use crate::TypeDescriptor;

    pub fn ty(name: &str, version: u32) -> TypeDescriptor {
        TypeDescriptor::new(name, version, Archetype::BigDoor)
    }
}

// ── Single registration ───────────────────────────────────────────────────────

#[cfg(test)]
mod register {
    use door_core::TypeId;

    use super::helpers::ty;
    use crate::{RegistrationError, TypeRegistry};

    #[test]
    fn ids_start_at_one() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.register(ty("A", 1), true).unwrap(), TypeId(1));
        assert_eq!(reg.register(ty("B", 1), true).unwrap(), TypeId(2));
    }

    #[test]
    fn unknown_dependency_is_unavailable() {
        let reg = TypeRegistry::new();
        let err = reg.register(ty("A", 1).with_dependency("B", 1, 2), true).unwrap_err();
        assert!(matches!(err, RegistrationError::DependencyUnavailable { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn dependency_version_out_of_range() {
        let reg = TypeRegistry::new();
        reg.register(ty("B", 1), true).unwrap();
        let err = reg.register(ty("A", 1).with_dependency("b", 2, 3), true).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DependencyVersionUnsupported {
                type_name:   "A".into(),
                dependency:  "b".into(),
                found:       1,
                min_version: 2,
                max_version: 3,
            }
        );
    }

    #[test]
    fn satisfied_dependency_registers() {
        let reg = TypeRegistry::new();
        reg.register(ty("B", 2), true).unwrap();
        assert!(reg.register(ty("A", 1).with_dependency("B", 1, 2), true).is_ok());
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let reg = TypeRegistry::new();
        reg.register(ty("Gate", 1), true).unwrap();
        let err = reg.register(ty("GATE", 2), true).unwrap_err();
        assert_eq!(err, RegistrationError::AlreadyRegistered("GATE".into()));
    }
}

// ── Batch resolution ──────────────────────────────────────────────────────────

#[cfg(test)]
mod batch {
    use super::helpers::ty;
    use crate::{RegistrationError, TypeRegistry};

    #[test]
    fn siblings_resolve_regardless_of_order() {
        let reg = TypeRegistry::new();
        let results = reg.register_batch(vec![ty("A", 1).with_dependency("B", 1, 2), ty("B", 1)]);
        assert!(results.iter().all(Result::is_ok));
        assert!(reg.get_by_name("a").is_some());
        assert!(reg.get_by_name("b").is_some());
    }

    #[test]
    fn unsupported_version_fails_only_the_dependent() {
        let reg = TypeRegistry::new();
        let results = reg.register_batch(vec![ty("A", 1).with_dependency("B", 2, 3), ty("B", 1)]);
        assert!(matches!(results[0], Err(RegistrationError::DependencyVersionUnsupported { .. })));
        assert!(results[1].is_ok());
        assert!(reg.get_by_name("A").is_none());
        assert!(reg.get_by_name("B").is_some());
    }

    #[test]
    fn cycle_fails_both() {
        let reg = TypeRegistry::new();
        let results = reg.register_batch(vec![
            ty("A", 1).with_dependency("B", 1, 1),
            ty("B", 1).with_dependency("A", 1, 1),
        ]);
        assert!(results.iter().all(|r| matches!(r, Err(RegistrationError::DependencyUnavailable { .. }))));
        assert!(reg.is_empty());
    }

    #[test]
    fn self_dependency_fails() {
        let reg = TypeRegistry::new();
        let results = reg.register_batch(vec![ty("A", 1).with_dependency("A", 1, 1)]);
        assert!(results[0].is_err());
    }

    #[test]
    fn failure_propagates_down_a_chain() {
        let reg = TypeRegistry::new();
        // C → B → missing.  A is independent.
        let results = reg.register_batch(vec![
            ty("C", 1).with_dependency("B", 1, 1),
            ty("B", 1).with_dependency("Missing", 1, 1),
            ty("A", 1),
        ]);
        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn already_registered_dependency_is_used() {
        let reg = TypeRegistry::new();
        reg.register(ty("Base", 3), true).unwrap();
        let results = reg.register_batch(vec![ty("Ext", 1).with_dependency("base", 2, 4)]);
        assert!(results[0].is_ok());
    }

    #[test]
    fn duplicate_within_batch() {
        let reg = TypeRegistry::new();
        let results = reg.register_batch(vec![ty("A", 1), ty("a", 2)]);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(RegistrationError::AlreadyRegistered("a".into())));
    }
}

// ── Tables & queries ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tables {
    use door_core::TypeId;

    use super::helpers::ty;
    use crate::TypeRegistry;

    fn names(reg: &TypeRegistry) -> Vec<String> {
        reg.enabled_types_sorted().iter().map(|d| d.name.clone()).collect()
    }

    #[test]
    fn enabled_list_stays_sorted() {
        let reg = TypeRegistry::new();
        reg.register(ty("Gamma", 1), true).unwrap();
        reg.register(ty("alpha", 1), true).unwrap();
        reg.register(ty("Beta", 1), true).unwrap();
        reg.register(ty("Hidden", 1), false).unwrap();
        assert_eq!(names(&reg), ["alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn set_enabled_toggles_visibility_only() {
        let reg = TypeRegistry::new();
        let id = reg.register(ty("A", 1), true).unwrap();
        assert!(reg.set_enabled(id, false));
        assert!(!reg.is_enabled(id));
        assert!(reg.is_registered(id));
        assert!(names(&reg).is_empty());

        assert!(reg.set_enabled(id, true));
        assert!(reg.set_enabled(id, true));
        assert_eq!(names(&reg), ["A"]);
        assert!(!reg.set_enabled(TypeId(99), true));
    }

    #[test]
    fn unregister_removes_from_every_table() {
        let reg = TypeRegistry::new();
        let id = reg.register(ty("A", 1), true).unwrap();
        assert!(reg.unregister(id).is_some());
        assert!(!reg.is_registered(id));
        assert!(reg.get_by_name("A").is_none());
        assert!(reg.id_of("a").is_none());
        assert!(names(&reg).is_empty());
        // Second call only warns.
        assert!(reg.unregister(id).is_none());
        // The name is free again.
        assert!(reg.register(ty("A", 2), true).is_ok());
    }

    #[test]
    fn lookups_agree() {
        let reg = TypeRegistry::new();
        let id = reg.register(ty("Drawbridge", 4), true).unwrap();
        assert_eq!(reg.id_of("DRAWBRIDGE"), Some(id));
        assert_eq!(reg.get_by_id(id).unwrap().version, 4);
        assert_eq!(reg.get_by_name("drawbridge").unwrap().version, 4);
        assert_eq!(reg.registered_types().len(), 1);
    }

    #[test]
    fn concurrent_registration_assigns_unique_ids() {
        let reg = TypeRegistry::new();
        std::thread::scope(|s| {
            for t in 0..4 {
                let reg = &reg;
                s.spawn(move || {
                    for i in 0..25 {
                        reg.register(ty(&format!("T{t}_{i}"), 1), true).unwrap();
                    }
                });
            }
        });
        let ids: Vec<_> = reg.registered_types().into_iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, (1..=100).collect::<Vec<_>>());
        assert_eq!(reg.enabled_types_sorted().len(), 100);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use door_core::Archetype;

    use crate::{load_descriptors_reader, TypeRegistry};

    const CSV: &str = "\
name,version,archetype,dependency,min_version,max_version
BigDoor,1,BigDoor,,,
Portcullis,2,slidingdoor,BigDoor,1,3
Portcullis,2,slidingdoor,Drawbridge,1,1
Drawbridge,1,Drawbridge,,,
";

    #[test]
    fn rows_group_into_descriptors() {
        let descs = load_descriptors_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(descs.len(), 3);
        assert_eq!(descs[1].name, "Portcullis");
        assert_eq!(descs[1].archetype, Archetype::Sliding);
        assert_eq!(descs[1].dependencies.len(), 2);
        assert!(descs[0].dependencies.is_empty());
    }

    #[test]
    fn loaded_batch_registers() {
        let descs = load_descriptors_reader(Cursor::new(CSV)).unwrap();
        let reg = TypeRegistry::new();
        assert!(reg.register_batch(descs).iter().all(Result::is_ok));
    }

    #[test]
    fn unknown_archetype_is_a_parse_error() {
        let csv = "name,version,archetype,dependency,min_version,max_version\nX,1,Windmill,,,\n";
        assert!(load_descriptors_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn half_specified_range_is_a_parse_error() {
        let csv = "name,version,archetype,dependency,min_version,max_version\nX,1,Flag,Y,1,\n";
        assert!(load_descriptors_reader(Cursor::new(csv)).is_err());
    }
}
