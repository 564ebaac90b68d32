use pantry_core::{
    Constraint, ConstraintId, ConstraintJournal, ConstraintKind, DomainModel, JournalError,
    NullJournal, Operands, Provenance,
};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::filter::SolutionFilter;
use crate::solve::Solver;
use crate::store::{ConstraintStore, Proposal};

fn sample_domain() -> DomainModel {
    DomainModel::builder()
        .person("Alice")
        .person("Bobby")
        .person("Cathy")
        .shop("Fruit", ["Apple", "Bread"])
        .shop("Grocery", ["Apple", "Bread"])
        .build()
        .unwrap()
}

fn custom(kind: ConstraintKind, domain: &DomainModel) -> Constraint {
    Constraint::new(kind, Provenance::Custom, domain).unwrap()
}

fn engine_with(constraints: Vec<Constraint>) -> Engine<NullJournal> {
    Engine::new(sample_domain(), constraints, NullJournal).unwrap()
}

/// Journal that records every call, for asserting store/record sync.
#[derive(Default)]
struct RecordingJournal {
    appended: Vec<ConstraintId>,
    removed: Vec<ConstraintId>,
    replaced: usize,
}

impl ConstraintJournal for RecordingJournal {
    fn append(&mut self, constraint: &Constraint) -> Result<(), JournalError> {
        self.appended.push(constraint.id());
        Ok(())
    }

    fn remove(&mut self, id: &ConstraintId) -> Result<(), JournalError> {
        self.removed.push(id.clone());
        Ok(())
    }

    fn replace_all(&mut self, _constraints: &[Constraint]) -> Result<(), JournalError> {
        self.replaced += 1;
        Ok(())
    }
}

/// Journal whose every operation fails.
struct BrokenJournal;

impl ConstraintJournal for BrokenJournal {
    fn append(&mut self, _: &Constraint) -> Result<(), JournalError> {
        Err(JournalError::new("disk full"))
    }

    fn remove(&mut self, _: &ConstraintId) -> Result<(), JournalError> {
        Err(JournalError::new("disk full"))
    }

    fn replace_all(&mut self, _: &[Constraint]) -> Result<(), JournalError> {
        Err(JournalError::new("disk full"))
    }
}

mod store_protocol {
    use super::*;

    #[test]
    fn test_add_without_conflict() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let mut store = ConstraintStore::new();
        let mut journal = RecordingJournal::default();

        let outcome = store
            .propose(
                custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain),
                &domain,
                &mut journal,
            )
            .unwrap();

        assert!(matches!(outcome, Proposal::Added(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(journal.appended.len(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_opposite_proposal_reports_conflict_without_mutation() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let existing = custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain);
        let mut store = ConstraintStore::with_constraints(vec![existing.clone()]).unwrap();
        let mut journal = NullJournal;

        let outcome = store
            .propose(
                custom(ConstraintKind::MustNotOrderFrom(bobby, fruit), &domain),
                &domain,
                &mut journal,
            )
            .unwrap();

        match outcome {
            Proposal::Conflict {
                existing: hit,
                candidate,
            } => {
                assert_eq!(hit, existing.id());
                assert_ne!(hit, candidate);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        // No mutation happened: store still holds only the original.
        assert_eq!(store.len(), 1);
        assert_eq!(store.version(), 0);
        assert!(store.has_pending());
    }

    #[test]
    fn test_confirm_replace_leaves_exactly_one() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let must = custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain);
        let must_not = custom(ConstraintKind::MustNotOrderFrom(bobby, fruit), &domain);
        let mut store = ConstraintStore::with_constraints(vec![must.clone()]).unwrap();
        let mut journal = NullJournal;

        store
            .propose(must_not.clone(), &domain, &mut journal)
            .unwrap();
        let added = store.confirm_replace(&mut journal).unwrap();

        assert_eq!(added, must_not.id());
        assert_eq!(store.len(), 1);
        assert!(store.get(&must.id()).is_none());
        assert!(store.get(&must_not.id()).is_some());
        assert!(!store.has_pending());
    }

    #[test]
    fn test_discard_leaves_original_unchanged() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let must = custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain);
        let mut store = ConstraintStore::with_constraints(vec![must.clone()]).unwrap();
        let mut journal = NullJournal;

        store
            .propose(
                custom(ConstraintKind::MustNotOrderFrom(bobby, fruit), &domain),
                &domain,
                &mut journal,
            )
            .unwrap();

        assert!(store.discard());
        assert!(!store.discard());
        assert_eq!(store.len(), 1);
        assert!(store.get(&must.id()).is_some());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_confirm_without_pending_fails() {
        let mut store = ConstraintStore::new();
        let mut journal = NullJournal;
        assert!(matches!(
            store.confirm_replace(&mut journal),
            Err(EngineError::NoPendingProposal)
        ));
    }

    #[test]
    fn test_new_proposal_evicts_parked_candidate() {
        let domain = sample_domain();
        let alice = domain.person("Alice").unwrap();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let mut store = ConstraintStore::with_constraints(vec![custom(
            ConstraintKind::MustOrderFrom(bobby, fruit),
            &domain,
        )])
        .unwrap();
        let mut journal = NullJournal;

        store
            .propose(
                custom(ConstraintKind::MustNotOrderFrom(bobby, fruit), &domain),
                &domain,
                &mut journal,
            )
            .unwrap();
        // An unrelated, clean proposal while a candidate is parked.
        let outcome = store
            .propose(
                custom(ConstraintKind::MustOrderFrom(alice, fruit), &domain),
                &domain,
                &mut journal,
            )
            .unwrap();

        assert!(matches!(outcome, Proposal::Added(_)));
        assert!(!store.has_pending());
        assert!(matches!(
            store.confirm_replace(&mut journal),
            Err(EngineError::NoPendingProposal)
        ));
    }

    #[test]
    fn test_remove_missing_id_fails() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let mut store = ConstraintStore::new();
        let mut journal = NullJournal;
        let id = ConstraintKind::MustOrderFrom(bobby, fruit).id();
        assert!(matches!(
            store.remove(&id, &mut journal),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_partitions_by_provenance() {
        let domain = sample_domain();
        let alice = domain.person("Alice").unwrap();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let default = Constraint::new(
            ConstraintKind::MustOrderFrom(bobby, fruit),
            Provenance::Default,
            &domain,
        )
        .unwrap();
        let mut store = ConstraintStore::with_constraints(vec![default]).unwrap();
        let mut journal = NullJournal;
        store
            .propose(
                custom(ConstraintKind::MustOrderFrom(alice, fruit), &domain),
                &domain,
                &mut journal,
            )
            .unwrap();

        assert_eq!(store.list(None).count(), 2);
        assert_eq!(store.list(Some(Provenance::Default)).count(), 1);
        assert_eq!(store.list(Some(Provenance::Custom)).count(), 1);
    }

    #[test]
    fn test_initial_duplicate_identities_rejected() {
        let domain = sample_domain();
        let alice = domain.person("Alice").unwrap();
        let bobby = domain.person("Bobby").unwrap();
        let a = custom(ConstraintKind::DifferentShop(alice, bobby), &domain);
        let b = custom(ConstraintKind::DifferentShop(bobby, alice), &domain);
        assert!(matches!(
            ConstraintStore::with_constraints(vec![a, b]),
            Err(EngineError::DuplicateIdentity(_))
        ));
    }

    #[test]
    fn test_journal_failure_surfaces_but_keeps_memory_state() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let mut store = ConstraintStore::new();
        let mut journal = BrokenJournal;

        let err = store
            .propose(
                custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain),
                &domain,
                &mut journal,
            )
            .unwrap_err();

        assert!(matches!(err, EngineError::Persistence(_)));
        // The in-memory set is authoritative for the session.
        assert_eq!(store.len(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_edit_annotation_touches_display_only() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let c = custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain);
        let id = c.id();
        let mut store = ConstraintStore::with_constraints(vec![c]).unwrap();
        let mut journal = RecordingJournal::default();

        store
            .edit_annotation(&id, Some("Shop(Bobby) = Fruit".into()), None, &mut journal)
            .unwrap();

        let edited = store.get(&id).unwrap();
        assert_eq!(edited.fol(), Some("Shop(Bobby) = Fruit"));
        assert_eq!(edited.pl(), None);
        assert_eq!(edited.id(), id);
        // Annotation edits never invalidate enumerated solutions.
        assert_eq!(store.version(), 0);
        assert_eq!(journal.replaced, 1);
    }
}

mod solving {
    use super::*;

    #[test]
    fn test_unconstrained_space_is_the_full_product() {
        let engine = engine_with(Vec::new());
        // 3 persons, 4 choices each.
        assert_eq!(engine.solve_all().len(), 64);
    }

    #[test]
    fn test_pinning_bobby_to_fruit() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let engine = engine_with(vec![custom(
            ConstraintKind::MustOrderFrom(bobby, fruit),
            &domain,
        )]);

        let solutions = engine.solve_all();
        // Bobby keeps his 2 item choices at the Fruit shop; Alice and Cathy
        // keep all 4 shop-item choices: 2 * 4 * 4.
        assert_eq!(solutions.len(), 32);
        assert!(solutions
            .iter()
            .all(|s| s.assignment().shop_of(bobby) == fruit));
    }

    #[test]
    fn test_unsatisfiable_set_yields_empty_not_error() {
        let domain = sample_domain();
        let fruit = domain.shop("Fruit").unwrap();
        let engine = engine_with(vec![custom(
            ConstraintKind::ShopCount(fruit, pantry_core::CountBound::AtLeast(7)),
            &domain,
        )]);
        assert!(engine.solve_all().is_empty());
    }

    #[test]
    fn test_solve_is_idempotent_and_ordered() {
        let domain = sample_domain();
        let alice = domain.person("Alice").unwrap();
        let bobby = domain.person("Bobby").unwrap();
        let engine = engine_with(vec![custom(
            ConstraintKind::DifferentItem(alice, bobby),
            &domain,
        )]);

        let first = engine.solve_all();
        let second = engine.solve_all();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lazy_iterator_matches_eager_result() {
        let domain = sample_domain();
        let alice = domain.person("Alice").unwrap();
        let bobby = domain.person("Bobby").unwrap();
        let engine = engine_with(vec![custom(
            ConstraintKind::SameShop(alice, bobby),
            &domain,
        )]);

        let eager = engine.solve_all();
        let lazy: Vec<_> = engine.solve_iter().collect();
        assert_eq!(eager, lazy);
    }

    #[test]
    fn test_solutions_are_stamped_with_store_version() {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let mut engine = engine_with(Vec::new());
        engine
            .propose_constraint(custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain))
            .unwrap();

        let version = engine.store().version();
        assert!(engine.solve_all().iter().all(|s| s.version() == version));
    }

    #[test]
    fn test_constraint_conjunction() {
        let domain = sample_domain();
        let alice = domain.person("Alice").unwrap();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let engine = engine_with(vec![
            custom(ConstraintKind::MustOrderFrom(bobby, fruit), &domain),
            custom(ConstraintKind::SameShop(alice, bobby), &domain),
            custom(ConstraintKind::DifferentItem(alice, bobby), &domain),
        ]);

        let solutions = engine.solve_all();
        // Both at Fruit, items differ: 2 orderings of (Apple, Bread), Cathy free.
        assert_eq!(solutions.len(), 2 * 4);
        for s in &solutions {
            let a = s.assignment();
            assert_eq!(a.shop_of(alice), fruit);
            assert_eq!(a.shop_of(bobby), fruit);
            assert_ne!(a.item_of(alice), a.item_of(bobby));
        }
    }
}

mod filtering {
    use super::*;

    fn pinned_bobby_solutions() -> (Engine<NullJournal>, Vec<crate::solve::Solution>) {
        let domain = sample_domain();
        let bobby = domain.person("Bobby").unwrap();
        let fruit = domain.shop("Fruit").unwrap();
        let engine = engine_with(vec![custom(
            ConstraintKind::MustOrderFrom(bobby, fruit),
            &domain,
        )]);
        let solutions = engine.solve_all();
        (engine, solutions)
    }

    #[test]
    fn test_skip_everything_is_identity() {
        let (_, solutions) = pinned_bobby_solutions();
        let filtered = SolutionFilter::new().apply(solutions.clone());
        assert_eq!(filtered, solutions);
    }

    #[test]
    fn test_filter_is_a_subset_operation() {
        let (engine, solutions) = pinned_bobby_solutions();
        let grocery = engine.domain().shop("Grocery").unwrap();
        let filtered = SolutionFilter::new()
            .shop(move |s| s == grocery)
            .apply(solutions.clone());
        assert!(filtered.iter().all(|s| solutions.contains(s)));
        assert!(filtered.len() <= solutions.len());
    }

    #[test]
    fn test_shop_axis_keeps_solutions_with_a_matching_choice() {
        let (engine, solutions) = pinned_bobby_solutions();
        let fruit = engine.domain().shop("Fruit").unwrap();
        // Bobby is pinned to Fruit, so every solution has a Fruit order.
        let filtered = SolutionFilter::new()
            .shop(move |s| s == fruit)
            .apply(solutions.clone());
        assert_eq!(filtered.len(), solutions.len());
    }

    #[test]
    fn test_predicates_combine_conjunctively() {
        let (engine, solutions) = pinned_bobby_solutions();
        let domain = engine.domain();
        let cathy = domain.person("Cathy").unwrap();
        let grocery = domain.shop("Grocery").unwrap();
        let apple = domain.item("Apple").unwrap();

        let filtered = SolutionFilter::new()
            .person(move |p| p == cathy)
            .shop(move |s| s == grocery)
            .item(move |i| i == apple)
            .apply(solutions.clone());

        // Exactly the solutions where Cathy herself takes Apple at Grocery.
        let expected: Vec<_> = solutions
            .iter()
            .filter(|s| {
                s.assignment().shop_of(cathy) == grocery
                    && s.assignment().item_of(cathy) == apple
            })
            .cloned()
            .collect();
        assert_eq!(filtered, expected);
        assert!(!filtered.is_empty());
    }

    #[test]
    fn test_filter_never_resolves() {
        let (engine, solutions) = pinned_bobby_solutions();
        let fruit = engine.domain().shop("Fruit").unwrap();
        let via_engine = engine.solve_filtered(&SolutionFilter::new().shop(move |s| s == fruit));
        // Same store version throughout: filtering reused the solved set.
        assert!(via_engine
            .iter()
            .all(|s| s.version() == engine.store().version()));
    }
}

mod facade {
    use super::*;

    #[test]
    fn test_template_proposal_end_to_end() {
        let mut engine = engine_with(Vec::new());
        let bobby = engine.person("Bobby").unwrap();
        let fruit = engine.shop("Fruit").unwrap();

        let ops = Operands {
            person: Some(bobby),
            shop: Some(fruit),
            ..Default::default()
        };
        let outcome = engine
            .propose_template("must_order", ops.clone(), Some("Shop(Bobby) = Fruit".into()), None)
            .unwrap();
        let id = match outcome {
            Proposal::Added(id) => id,
            other => panic!("expected Added, got {other:?}"),
        };
        assert_eq!(engine.store().get(&id).unwrap().fol(), Some("Shop(Bobby) = Fruit"));

        // The structural opposite now conflicts, referencing the existing id.
        let outcome = engine
            .propose_template("must_not_order", ops, None, None)
            .unwrap();
        match outcome {
            Proposal::Conflict { existing, .. } => assert_eq!(existing, id),
            other => panic!("expected Conflict, got {other:?}"),
        }
        assert!(engine.discard());
        assert_eq!(engine.list_constraints(None).len(), 1);
    }

    #[test]
    fn test_unknown_template_rejected_before_store() {
        let mut engine = engine_with(Vec::new());
        let err = engine
            .propose_template("grand_unified", Operands::default(), None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Constraint(pantry_core::ConstraintError::UnsupportedVariant(_))
        ));
        assert!(engine.list_constraints(None).is_empty());
    }

    #[test]
    fn test_unknown_names_resolve_to_errors() {
        let engine = engine_with(Vec::new());
        assert!(matches!(
            engine.person("Zelda"),
            Err(EngineError::UnknownName { entity: "person", .. })
        ));
        assert!(engine.shop("Bakery").is_err());
        assert!(engine.item("Durian").is_err());
    }

    #[test]
    fn test_solver_entry_points_agree() {
        let domain = sample_domain();
        let alice = domain.person("Alice").unwrap();
        let bobby = domain.person("Bobby").unwrap();
        let store = ConstraintStore::with_constraints(vec![custom(
            ConstraintKind::DifferentShop(alice, bobby),
            &domain,
        )])
        .unwrap();
        let eager = Solver::solve_all(&store, &domain);
        let lazy: Vec<_> = Solver::solve(&store, &domain).collect();
        assert_eq!(eager, lazy);
    }
}
