use navshell_core::db::open_db_in_memory;
use navshell_core::{
    GroupDimension, LinkOutcome, ModeCatalog, NavService, OrderOverrides, RawActivityEvent,
    RejectReason, SelectionTarget, SessionRepository, SqliteSessionRepository, TransitionOutcome,
    UnitRegistry,
};

fn service(conn: &rusqlite::Connection) -> NavService<SqliteSessionRepository<'_>> {
    NavService::new(
        UnitRegistry::load_baseline().expect("baseline registry should load"),
        ModeCatalog::baseline(),
        OrderOverrides::new(),
        SqliteSessionRepository::new(conn),
    )
}

fn mode_event(mode: &str, stamp: Option<i64>) -> RawActivityEvent {
    RawActivityEvent::new(SelectionTarget::Mode(mode.to_string()), stamp)
}

#[test]
fn rerender_batches_neither_mutate_nor_persist() {
    let conn = open_db_in_memory().expect("in-memory store");
    let mut service = service(&conn);
    let before = service.current_selection().clone();

    let batch = vec![
        mode_event("by_work_package", None),
        mode_event("by_category", None),
    ];
    assert_eq!(service.apply_activity(&batch), None);
    assert_eq!(service.current_selection(), &before);

    // A discarded batch is not a committed transition: nothing is written.
    assert_eq!(
        SqliteSessionRepository::new(&conn)
            .load()
            .expect("load should succeed"),
        None
    );
}

#[test]
fn mode_click_commits_and_persists() {
    let conn = open_db_in_memory().expect("in-memory store");
    let mut service = service(&conn);

    let outcome = service.apply_activity(&[mode_event("by_category", Some(100))]);
    assert_eq!(outcome, Some(TransitionOutcome::Applied));
    assert_eq!(service.current_mode(), "by_category");
    assert_eq!(service.current_mode_label(), "Per Category");

    let record = SqliteSessionRepository::new(&conn)
        .load()
        .expect("load should succeed")
        .expect("committed transition should persist");
    assert_eq!(record.mode, "by_category");
}

#[test]
fn disabled_mode_click_is_rejected_without_commit() {
    let conn = open_db_in_memory().expect("in-memory store");
    let mut service = service(&conn);

    let outcome = service.apply_activity(&[mode_event("favorites", Some(100))]);
    assert_eq!(
        outcome,
        Some(TransitionOutcome::Rejected(RejectReason::ModeDisabled(
            "favorites".to_string()
        )))
    );
    assert_eq!(service.current_mode(), "by_work_package");
}

#[test]
fn group_click_lands_on_first_resolved_unit() {
    let conn = open_db_in_memory().expect("in-memory store");
    let mut service = service(&conn);

    service.apply_activity(&[RawActivityEvent::new(
        SelectionTarget::Group(GroupDimension::WorkPackage, "wp4".to_string()),
        Some(10),
    )]);

    // wp4's lowest-ordered unit is the operational monitoring panel.
    assert_eq!(
        service.current_selection().selected_unit,
        Some("svc-hvdc-operational-monitoring".to_string())
    );
    assert!(service.visible_unit("svc-hvdc-operational-monitoring"));
    assert!(!service.visible_unit("svc-diagnostics"));
}

#[test]
fn empty_group_click_clears_unit_selection() {
    use navshell_core::{Group, GroupCatalog, UnitManifest};

    let catalog = GroupCatalog {
        workpackages: vec![
            Group {
                id: "wp4".to_string(),
                label: "WP4".to_string(),
            },
            Group {
                id: "wp7".to_string(),
                label: "WP7 - not yet integrated".to_string(),
            },
        ],
        categories: vec![],
    };
    let manifests = vec![UnitManifest {
        id: "svc-only".to_string(),
        label: "Only Service".to_string(),
        workpackages: vec!["wp4".to_string()],
        categories: vec![],
        order: Some(1),
        version: None,
        owner: None,
        status: None,
    }];
    let conn = open_db_in_memory().expect("in-memory store");
    let mut service = NavService::new(
        UnitRegistry::load(catalog, manifests).expect("registry load"),
        ModeCatalog::baseline(),
        OrderOverrides::new(),
        SqliteSessionRepository::new(&conn),
    );

    service.apply_activity(&[RawActivityEvent::new(
        SelectionTarget::Group(GroupDimension::WorkPackage, "wp4".to_string()),
        Some(10),
    )]);
    assert_eq!(
        service.current_selection().selected_unit,
        Some("svc-only".to_string())
    );

    // Moving to a group with no integrated tools leaves the empty-state
    // surface in control: no unit stays selected.
    service.apply_activity(&[RawActivityEvent::new(
        SelectionTarget::Group(GroupDimension::WorkPackage, "wp7".to_string()),
        Some(20),
    )]);
    assert_eq!(service.current_selection().selected_unit, None);
}

#[test]
fn effective_order_is_stable_for_render_surfaces() {
    let conn = open_db_in_memory().expect("in-memory store");
    let service = service(&conn);

    let wp4 = service.effective_order(GroupDimension::WorkPackage, Some(&"wp4".to_string()));
    assert_eq!(
        wp4,
        [
            "svc-hvdc-operational-monitoring",
            "svc-diagnostics",
            "svc-hvdc-data-timeline",
        ]
    );
    let again = service.effective_order(GroupDimension::WorkPackage, Some(&"wp4".to_string()));
    assert_eq!(wp4, again);
}

#[test]
fn later_batches_take_precedence_over_earlier_ones() {
    let conn = open_db_in_memory().expect("in-memory store");
    let mut service = service(&conn);

    // First render cycle: the category click wins inside its batch.
    service.apply_activity(&[
        mode_event("by_category", Some(200)),
        mode_event("by_work_package", Some(150)),
    ]);
    assert_eq!(service.current_mode(), "by_category");

    // Next cycle arrives later and overrides, even with a smaller stamp.
    service.apply_activity(&[mode_event("by_work_package", Some(10))]);
    assert_eq!(service.current_mode(), "by_work_package");
}

#[test]
fn open_unit_uses_the_same_transition_path() {
    let conn = open_db_in_memory().expect("in-memory store");
    let mut service = service(&conn);

    let outcome = service.open_unit("svc-asset-degradation");
    assert_eq!(
        outcome,
        LinkOutcome::Opened {
            unit_id: "svc-asset-degradation".to_string(),
            switched_group: Some("wp5".to_string()),
        }
    );
    let record = SqliteSessionRepository::new(&conn)
        .load()
        .expect("load should succeed")
        .expect("opened link should persist");
    assert_eq!(record.selected_unit, Some("svc-asset-degradation".to_string()));

    // Unknown targets stay inert and unpersisted beyond the previous record.
    let before = service.current_selection().clone();
    service.open_unit("svc-nope");
    assert_eq!(service.current_selection(), &before);
}

#[test]
fn suggestions_are_additive_and_case_insensitive() {
    let conn = open_db_in_memory().expect("in-memory store");
    let service = service(&conn);

    assert_eq!(service.suggest_modes("  CATEGORY "), ["by_category"]);
    assert_eq!(
        service.suggest_units("timeline"),
        ["svc-hvdc-data-timeline"]
    );
    assert!(service.suggest_modes("").is_empty());
    assert!(service.suggest_units("   ").is_empty());
}

#[test]
fn mode_label_falls_back_for_unknown_ids() {
    let conn = open_db_in_memory().expect("in-memory store");
    let service = service(&conn);
    assert_eq!(service.modes().mode_label("by_hunch"), "Not configured");
}
