use funnel_core::{CellCoord, Command, Outcome, ResourcePool, Side, UnitKind};
use funnel_system_side_selection::LEFT_LANE_WATCH;
use funnel_system_turn_controller::{
    passes,
    plans::{EXTRA_SHIELDS, LEFT_FUNNEL, RIGHT_FUNNEL, TURRET_LAYOUT},
    FunnelState, FunnelTransition, SidePolicy, TurnController, TurnReport, Tuning,
};
use funnel_world::{
    self as world, query, PlayerStats, TurnFrame, TurnPhase, UnitCatalog, UnitGroups, World,
};

const CONFIG: &str = r#"{"unitInformation": [
    {"shorthand": "FF", "cost1": 1, "upgrade": {"cost1": 1}},
    {"shorthand": "EF", "cost1": 4, "upgrade": {"cost1": 4}},
    {"shorthand": "DF", "cost1": 2, "upgrade": {"cost1": 4}},
    {"shorthand": "PI", "cost2": 1},
    {"shorthand": "EI", "cost2": 3},
    {"shorthand": "SI", "cost2": 1},
    {"shorthand": "RM"},
    {"shorthand": "UP"}
]}"#;

fn catalog() -> UnitCatalog {
    UnitCatalog::from_config_json(CONFIG).expect("catalog parses")
}

fn world_at(turn_number: u32, resources: ResourcePool, enemy: &[CellCoord]) -> World {
    let frame = TurnFrame {
        phase: TurnPhase::Deploy,
        turn_number,
        own: PlayerStats {
            health: 30.0,
            resources,
        },
        enemy: PlayerStats::default(),
        own_units: UnitGroups::default(),
        enemy_units: UnitGroups {
            structures: enemy
                .iter()
                .map(|&cell| (UnitKind::Turret, cell))
                .collect(),
            ..UnitGroups::default()
        },
    };
    World::from_frame(catalog(), &frame)
}

fn plan(controller: &mut TurnController, world: &World) -> (TurnReport, Vec<Command>) {
    let mut commands = Vec::new();
    let report = controller.on_turn(&query::turn_view(world), &mut commands);
    (report, commands)
}

fn resolve(world: &mut World, commands: &[Command]) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    for &command in commands {
        world::apply(world, command, &mut outcomes);
    }
    outcomes
}

fn removed_cells(commands: &[Command]) -> Vec<CellCoord> {
    commands
        .iter()
        .filter_map(|command| match *command {
            Command::Remove { cell } => Some(cell),
            _ => None,
        })
        .collect()
}

fn scouts_at(commands: &[Command], entry: CellCoord) -> usize {
    commands
        .iter()
        .filter(|command| {
            **command
                == Command::Spawn {
                    kind: UnitKind::Scout,
                    cell: entry,
                }
        })
        .count()
}

#[test]
fn turn_zero_lays_the_perimeter_without_funnel_commands() {
    let world = world_at(0, ResourcePool::new(40.0, 5.0), &[]);
    let mut controller = TurnController::default();
    let (report, commands) = plan(&mut controller, &world);

    let mut setup = Vec::new();
    passes::initial_setup(&mut setup);
    assert_eq!(setup.len(), 40);
    assert_eq!(&commands[..40], &setup[..], "turn zero must open with the setup batch");
    assert!(removed_cells(&commands).is_empty());
    assert!(commands.iter().all(|command| !matches!(
        command,
        Command::Spawn {
            kind: UnitKind::Scout | UnitKind::Demolisher | UnitKind::Interceptor,
            ..
        }
    )));
    assert_eq!(report.transition, None);
    assert_eq!(report.after, FunnelState::Closed);
}

#[test]
fn later_turns_skip_the_setup_corners() {
    let world = world_at(1, ResourcePool::new(40.0, 5.0), &[]);
    let mut controller = TurnController::default();
    let (_, commands) = plan(&mut controller, &world);
    assert!(!commands.contains(&Command::Spawn {
        kind: UnitKind::Turret,
        cell: LEFT_FUNNEL.gap[0],
    }));
}

#[test]
fn starved_mobile_pool_never_opens() {
    let mut controller = TurnController::default();
    for turn in 0..60 {
        let world = world_at(turn, ResourcePool::new(30.0, 15.0), &[]);
        let (report, commands) = plan(&mut controller, &world);
        assert_eq!(report.after, FunnelState::Closed, "turn {turn}");
        assert!(removed_cells(&commands).is_empty(), "turn {turn}");
    }
}

#[test]
fn cycle_fires_one_transition_per_turn() {
    let mut controller = TurnController::default();
    let expected = [
        (FunnelState::Closed, FunnelState::Open),
        (FunnelState::Open, FunnelState::PendingClose),
        (FunnelState::PendingClose, FunnelState::Closed),
        (FunnelState::Closed, FunnelState::Open),
        (FunnelState::Open, FunnelState::PendingClose),
        (FunnelState::PendingClose, FunnelState::Closed),
    ];

    for (turn, (before, after)) in (1..).zip(expected) {
        let world = world_at(turn, ResourcePool::new(30.0, 40.0), &[]);
        let (report, _) = plan(&mut controller, &world);
        assert_eq!((report.before, report.after), (before, after), "turn {turn}");
        assert!(report.transition.is_some(), "turn {turn}");
    }
}

#[test]
fn closing_turn_does_not_reopen() {
    let mut controller = TurnController::default();
    for turn in 1..=2 {
        let _ = plan(
            &mut controller,
            &world_at(turn, ResourcePool::new(0.0, 20.0), &[]),
        );
    }
    assert_eq!(controller.funnel_state(), FunnelState::PendingClose);

    let (report, commands) = plan(
        &mut controller,
        &world_at(3, ResourcePool::new(0.0, 50.0), &[]),
    );
    assert_eq!(report.transition, Some(FunnelTransition::Closed));
    assert!(removed_cells(&commands).is_empty());
}

#[test]
fn mobile_pool_reaching_threshold_opens_current_gap() {
    let mut controller = TurnController::default();

    let (report, commands) = plan(
        &mut controller,
        &world_at(5, ResourcePool::new(10.0, 15.0), &[]),
    );
    assert_eq!(report.after, FunnelState::Closed);
    assert!(removed_cells(&commands).is_empty());

    let (report, commands) = plan(
        &mut controller,
        &world_at(6, ResourcePool::new(10.0, 16.0), &[]),
    );
    assert_eq!(report.transition, Some(FunnelTransition::Opened));
    assert_eq!(report.after, FunnelState::Open);
    assert_eq!(report.side, Side::Left);
    assert_eq!(removed_cells(&commands), LEFT_FUNNEL.gap);
}

#[test]
fn defended_left_lane_opens_the_right_gap() {
    let mut controller = TurnController::default();
    let world = world_at(6, ResourcePool::new(10.0, 16.0), &LEFT_LANE_WATCH[..3]);
    let (report, commands) = plan(&mut controller, &world);

    assert_eq!(report.side, Side::Right);
    assert_eq!(report.density.left, 3);
    assert_eq!(removed_cells(&commands), RIGHT_FUNNEL.gap);
}

#[test]
fn attack_on_turn_fourteen_sends_thirteen_scouts_per_entry() {
    let mut controller = TurnController::default();
    let _ = plan(
        &mut controller,
        &world_at(13, ResourcePool::new(0.0, 16.0), &[]),
    );
    assert_eq!(controller.funnel_state(), FunnelState::Open);

    let (report, commands) = plan(
        &mut controller,
        &world_at(14, ResourcePool::new(0.0, 3.0), &[]),
    );
    assert_eq!(
        report.transition,
        Some(FunnelTransition::Attacked { per_entry: 13 })
    );
    assert_eq!(report.after, FunnelState::PendingClose);
    for entry in LEFT_FUNNEL.entries {
        assert_eq!(scouts_at(&commands, entry), 13, "entry {entry:?}");
    }
    let total_scouts = commands
        .iter()
        .filter(|command| matches!(command, Command::Spawn { kind: UnitKind::Scout, .. }))
        .count();
    assert_eq!(total_scouts, 26);
}

#[test]
fn open_gap_is_never_repaired_before_closing() {
    let mut controller = TurnController::default();
    let mut held_open_turns = 0;

    for turn in 1..=3 {
        let (report, commands) = plan(
            &mut controller,
            &world_at(turn, ResourcePool::new(50.0, 20.0), &[]),
        );
        let gap_spawns = commands
            .iter()
            .filter(|command| {
                matches!(command, Command::Spawn { kind: UnitKind::Turret, cell }
                    if LEFT_FUNNEL.gap.contains(cell))
            })
            .count();

        if report.after == FunnelState::Closed {
            assert_eq!(gap_spawns, 3, "closing turn rebuilds the gap");
        } else {
            held_open_turns += 1;
            assert_eq!(gap_spawns, 0, "turn {turn} must leave the gap open");
        }
    }
    assert_eq!(held_open_turns, 2);
}

#[test]
fn extra_shields_follow_turn_start_structure_pool() {
    let touches_extra = |commands: &[Command]| {
        commands
            .iter()
            .any(|command| EXTRA_SHIELDS.contains(&command.cell()))
    };

    let mut controller = TurnController::default();
    let (_, short) = plan(
        &mut controller,
        &world_at(4, ResourcePool::new(14.0, 0.0), &[]),
    );
    assert!(!touches_extra(&short[..]));

    let (_, funded) = plan(
        &mut controller,
        &world_at(5, ResourcePool::new(15.0, 0.0), &[]),
    );
    assert!(touches_extra(&funded[..]));
}

#[test]
fn passes_are_idempotent_on_a_finished_board() {
    let mut world = world_at(2, ResourcePool::new(10_000.0, 0.0), &[]);
    let mut controller = TurnController::default();

    let (_, first) = plan(&mut controller, &world);
    let outcomes = resolve(&mut world, &first);
    assert!(outcomes.iter().any(|outcome| !outcome.is_rejected()));
    let committed = query::pending_batch(&world).clone();

    let mut again = Vec::new();
    passes::repair(&[], &mut again);
    passes::upgrade(&[], &mut again);
    passes::put_shields(10_000.0, controller.tuning(), &mut again);
    let outcomes = resolve(&mut world, &again);

    assert!(
        outcomes.iter().all(Outcome::is_rejected),
        "second application must be a no-op"
    );
    assert_eq!(query::pending_batch(&world), &committed);
}

#[test]
fn reevaluate_policy_follows_side_flip_mid_cycle() {
    let mut controller = TurnController::default();
    let _ = plan(
        &mut controller,
        &world_at(7, ResourcePool::new(0.0, 16.0), &[]),
    );
    assert_eq!(controller.opened_on(), Some(Side::Left));

    let (report, commands) = plan(
        &mut controller,
        &world_at(8, ResourcePool::new(0.0, 0.0), &LEFT_LANE_WATCH[..2]),
    );
    assert_eq!(report.side, Side::Right);
    assert_eq!(scouts_at(&commands, RIGHT_FUNNEL.entries[0]), 12);
    assert_eq!(scouts_at(&commands, LEFT_FUNNEL.entries[0]), 0);
}

#[test]
fn freeze_policy_keeps_the_opened_side_until_closed() {
    let mut controller = TurnController::new(Tuning {
        side_policy: SidePolicy::FreezeWhileOpen,
        ..Tuning::default()
    });
    let flipped = &LEFT_LANE_WATCH[..2];

    let _ = plan(
        &mut controller,
        &world_at(7, ResourcePool::new(0.0, 16.0), &[]),
    );
    let (attack, commands) = plan(
        &mut controller,
        &world_at(8, ResourcePool::new(0.0, 0.0), flipped),
    );
    assert_eq!(attack.side, Side::Left);
    assert_eq!(attack.density.side(), Side::Right, "survey still runs");
    assert_eq!(scouts_at(&commands, LEFT_FUNNEL.entries[1]), 12);

    let (close, commands) = plan(
        &mut controller,
        &world_at(9, ResourcePool::new(0.0, 0.0), flipped),
    );
    assert_eq!(close.side, Side::Left);
    assert!(commands.contains(&Command::Spawn {
        kind: UnitKind::Turret,
        cell: LEFT_FUNNEL.gap[2],
    }));
    assert_eq!(controller.opened_on(), None);

    let (next, _) = plan(
        &mut controller,
        &world_at(10, ResourcePool::new(0.0, 0.0), flipped),
    );
    assert_eq!(next.side, Side::Right, "freeze ends once the gap is sealed");
}

#[test]
fn initial_layout_is_built_on_the_board() {
    let mut world = world_at(0, ResourcePool::new(10_000.0, 0.0), &[]);
    let mut controller = TurnController::default();
    let (_, commands) = plan(&mut controller, &world);
    let _ = resolve(&mut world, &commands);

    for cell in TURRET_LAYOUT {
        assert!(query::contains_stationary_unit(&world, cell), "{cell:?}");
    }
    assert!(query::contains_stationary_unit(&world, LEFT_FUNNEL.gap[0]));
    assert!(query::contains_stationary_unit(&world, RIGHT_FUNNEL.gap[0]));
}
