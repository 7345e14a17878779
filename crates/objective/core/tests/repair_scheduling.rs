use objective_core::{
    CharacterId, Idle, ObjectiveManager, RepairFacet, RepairScan, RepairTarget, ScanState,
    SchedulerConfig, Target, TargetId, TargetIndex, WorldTargets,
};

const ALICE: CharacterId = CharacterId(1);
const BOB: CharacterId = CharacterId(2);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn generator(condition: f32) -> Target {
    Target::new(TargetId(10), "Generator", condition).with_facet(
        RepairFacet::new("Coils", 50.0)
            .with_skill("electrical")
            .with_item("screwdriver"),
    )
}

fn scan_targets(manager: &ObjectiveManager, scan: objective_core::ObjectiveHandle) -> Vec<TargetId> {
    manager
        .objective(scan)
        .expect("scan is live")
        .children()
        .iter()
        .filter_map(|child| child.downcast_ref::<RepairTarget>())
        .map(RepairTarget::target)
        .collect()
}

#[test]
fn one_damaged_target_yields_exactly_one_repair() {
    init_tracing();
    let mut world = WorldTargets::new(vec![generator(40.0)]);
    let mut manager = ObjectiveManager::new(ALICE, SchedulerConfig::uncached().with_repair_rate(1.0));
    let scan = manager.add_objective(RepairScan::new());

    manager.update(0.1, &mut world);
    assert_eq!(scan_targets(&manager, scan), vec![TargetId(10)]);

    manager.update(0.1, &mut world);
    assert_eq!(scan_targets(&manager, scan), vec![TargetId(10)]);
}

#[test]
fn scan_drives_repair_to_completion_and_goes_idle() {
    init_tracing();
    let mut world = WorldTargets::new(vec![generator(40.0)]);
    let mut manager = ObjectiveManager::new(ALICE, SchedulerConfig::uncached().with_repair_rate(20.0));
    let scan = manager.add_objective(RepairScan::new());
    manager.add_objective(Idle::new());

    for _ in 0..4 {
        assert_eq!(manager.update(1.0, &mut world), Some(scan));
    }

    let generator = world.get(TargetId(10)).unwrap();
    assert_eq!(generator.condition, Target::FULL_CONDITION);
    assert!(generator.facets[0].is_fixed);
    assert_eq!(generator.claimed_by, None);

    let node = manager.objective(scan).unwrap();
    assert!(node.children().is_empty());
    assert_eq!(node.downcast_ref::<RepairScan>().unwrap().state(), ScanState::Idle);
    assert!(!node.is_completed());
}

#[test]
fn summary_exposes_current_repair_requirements() {
    init_tracing();
    let mut world = WorldTargets::new(vec![generator(10.0)]);
    let mut manager = ObjectiveManager::new(ALICE, SchedulerConfig::uncached().with_repair_rate(1.0));
    let scan = manager.add_objective(RepairScan::new());

    manager.update(0.1, &mut world);
    let summary = manager.describe(scan);
    assert_eq!(summary.label, "Repair damaged targets");
    assert_eq!(summary.required_skills, vec!["electrical".to_string()]);
    assert_eq!(summary.required_items, vec!["screwdriver".to_string()]);
    assert_eq!(summary.pending_children, 1);
}

#[test]
fn characters_split_work_through_claims() {
    init_tracing();
    let config = SchedulerConfig::uncached().with_repair_rate(1.0);
    let mut world = WorldTargets::new(vec![
        generator(30.0),
        Target::new(TargetId(11), "Pump", 20.0).with_facet(RepairFacet::new("Seals", 50.0)),
    ]);
    let mut alice = ObjectiveManager::new(ALICE, config.clone());
    let mut bob = ObjectiveManager::new(BOB, config);
    let alice_scan = alice.add_objective(RepairScan::new());
    let bob_scan = bob.add_objective(RepairScan::new());

    alice.update(0.1, &mut world);
    bob.update(0.1, &mut world);
    alice.update(0.1, &mut world);

    assert_eq!(world.get(TargetId(10)).unwrap().claimed_by, Some(ALICE));
    assert_eq!(world.get(TargetId(11)).unwrap().claimed_by, Some(BOB));
    // Alice queued the pump on her first scan, but Bob claimed it first.
    assert_eq!(scan_targets(&alice, alice_scan), vec![TargetId(10)]);
    assert_eq!(scan_targets(&bob, bob_scan), vec![TargetId(11)]);
}

#[test]
fn removing_the_scan_releases_claims_next_tick() {
    init_tracing();
    let mut world = WorldTargets::new(vec![generator(10.0)]);
    let mut manager = ObjectiveManager::new(ALICE, SchedulerConfig::uncached().with_repair_rate(1.0));
    let scan = manager.add_objective(RepairScan::new());
    manager.add_objective(Idle::new());

    manager.update(0.1, &mut world);
    assert_eq!(world.get(TargetId(10)).unwrap().claimed_by, Some(ALICE));

    manager.remove_objective(scan);
    manager.update(0.1, &mut world);
    assert_eq!(world.get(TargetId(10)).unwrap().claimed_by, None);
}

#[test]
fn released_retirees_free_claims_without_a_tick() {
    init_tracing();
    let mut world = WorldTargets::new(vec![generator(10.0)]);
    let mut manager = ObjectiveManager::new(ALICE, SchedulerConfig::uncached().with_repair_rate(1.0));
    let scan = manager.add_objective(RepairScan::new());

    manager.update(0.1, &mut world);
    assert_eq!(world.get(TargetId(10)).unwrap().claimed_by, Some(ALICE));

    manager.remove_objective(scan);
    assert_eq!(manager.release_retired(&mut world), 1);
    assert_eq!(world.get(TargetId(10)).unwrap().claimed_by, None);
    assert_eq!(manager.release_retired(&mut world), 0);
}

#[test]
fn vanished_target_drops_its_repair() {
    init_tracing();
    let mut world = WorldTargets::new(vec![generator(10.0)]);
    let mut manager = ObjectiveManager::new(ALICE, SchedulerConfig::uncached().with_repair_rate(1.0));
    let scan = manager.add_objective(RepairScan::new());

    manager.update(0.1, &mut world);
    world.remove(TargetId(10));
    manager.update(0.1, &mut world);

    assert!(scan_targets(&manager, scan).is_empty());
}

#[test]
fn teardown_releases_every_claim() {
    init_tracing();
    let mut world = WorldTargets::new(vec![generator(10.0)]);
    let mut manager = ObjectiveManager::new(ALICE, SchedulerConfig::uncached().with_repair_rate(1.0));
    manager.add_objective(RepairScan::new());

    manager.update(0.1, &mut world);
    manager.teardown(&mut world);

    assert!(manager.is_empty());
    assert_eq!(world.get(TargetId(10)).unwrap().claimed_by, None);
}
