use super::*;
use crate::action::{AbilityKind, ActionCommand, CommandError};
use crate::controller::{Archetype, ControlSpec, EnemySpec};
use crate::effect::{EffectAction, EffectCondition, EffectSpec, EffectTarget, EffectTiming};
use crate::state::{
    DamagePattern, Lane, MaskKind, MaskLocation, StatusKind, StatusSpec, UnitTemplate,
};

const P0: UnitId = UnitId(0);

fn template(
    name: &str,
    lane: Lane,
    health: u32,
    attack: i32,
    control: ControlSpec,
) -> UnitTemplate {
    UnitTemplate {
        name: name.to_owned(),
        lane,
        max_health: health,
        starting_health: None,
        base_attack: attack,
        base_defense: 0,
        starting_mask: None,
        control,
    }
}

fn hero(health: u32, attack: i32) -> UnitTemplate {
    template("hero", Lane::Middle, health, attack, ControlSpec::Player)
}

fn grunt(health: u32, attack: i32) -> UnitTemplate {
    template(
        "grunt",
        Lane::Middle,
        health,
        attack,
        ControlSpec::Enemy(EnemySpec::default()),
    )
}

fn mask(name: &str, durability: u32, effects: Vec<EffectSpec>) -> MaskTemplate {
    MaskTemplate {
        name: name.to_owned(),
        kind: MaskKind::Defensive,
        pattern: DamagePattern::SingleTarget,
        switch_cost: 1,
        attack_bonus: 0,
        max_durability: durability,
        effects,
    }
}

fn effect(timing: EffectTiming, action: EffectAction) -> EffectSpec {
    EffectSpec {
        timing,
        action,
        condition: None,
    }
}

fn start(players: Vec<UnitTemplate>, enemies: Vec<UnitTemplate>) -> BattleEngine {
    start_with(BattleConfig::default(), players, enemies)
}

fn start_with(
    config: BattleConfig,
    players: Vec<UnitTemplate>,
    enemies: Vec<UnitTemplate>,
) -> BattleEngine {
    let mut engine = BattleEngine::new(config);
    engine
        .initialize_battle(players, enemies)
        .expect("fresh engine initializes");
    engine
}

fn attack(engine: &mut BattleEngine, attacker: UnitId, target: UnitId) {
    let pattern = engine.state().attack_pattern(attacker);
    engine
        .confirm_action(ActionCommand::attack(attacker, target, pattern))
        .expect("attack is valid");
    engine.run_pending();
}

fn count(engine: &BattleEngine, pred: impl Fn(&BattleEvent) -> bool) -> usize {
    engine.journal().iter().filter(|e| pred(*e)).count()
}

fn health(engine: &BattleEngine, unit: UnitId) -> u32 {
    engine.state().unit(unit).map_or(0, |u| u.current_health)
}

#[test]
fn initialize_opens_the_first_player_round() {
    let engine = start(vec![hero(10, 3)], vec![grunt(10, 2)]);

    assert_eq!(engine.phase(), BattlePhase::RoundActive(Team::Player));
    assert_eq!(engine.round(), 1);
    assert!(matches!(engine.journal()[0], BattleEvent::BattleStarted { .. }));
    assert_eq!(
        count(&engine, |e| matches!(e, BattleEvent::RoundStarted { team: Team::Player, round: 1 })),
        1
    );
    assert_eq!(
        count(&engine, |e| matches!(e, BattleEvent::InputRequested { unit } if *unit == P0)),
        1
    );
    assert_eq!(engine.awaiting_input(), vec![P0]);
}

#[test]
fn initialize_while_active_is_rejected() {
    let mut engine = start(vec![hero(10, 3)], vec![grunt(10, 2)]);
    let before = engine.state().units.len();

    let result = engine.initialize_battle(vec![hero(5, 1)], vec![grunt(5, 1)]);

    assert_eq!(result, Err(EngineError::AlreadyActive));
    assert_eq!(engine.state().units.len(), before);

    engine.reset();
    assert_eq!(engine.phase(), BattlePhase::Idle);
    assert!(engine.initialize_battle(vec![hero(5, 1)], vec![grunt(5, 1)]).is_ok());
}

#[test]
fn attack_resolves_in_three_steps_and_spends_the_allowance() {
    let mut engine = start(vec![hero(10, 3)], vec![grunt(10, 2)]);
    let enemy = UnitId(1);
    let command = ActionCommand::attack(P0, enemy, DamagePattern::SingleTarget);

    assert_eq!(engine.confirm_action(command), Ok(ConfirmOutcome::Started));
    assert_eq!(engine.state().available(P0, ResourceKind::Attack), 0);

    let labels: Vec<_> = engine.run_pending().iter().map(|r| r.hint.label).collect();
    assert_eq!(labels, ["approach", "strike", "retreat"]);
    assert_eq!(health(&engine, enemy), 7);
    assert!(engine.is_idle());

    let second = engine.confirm_action(command);
    assert!(matches!(
        second,
        Err(CommandError::InsufficientResources { .. })
    ));
    assert_eq!(health(&engine, enemy), 7);
}

#[test]
fn commands_confirmed_mid_resolution_wait_their_turn() {
    let mut engine = start(
        vec![hero(10, 2), template("second", Lane::Up, 10, 2, ControlSpec::Player)],
        vec![grunt(20, 1)],
    );
    let enemy = UnitId(2);

    let first = ActionCommand::attack(P0, enemy, DamagePattern::SingleTarget);
    let second = ActionCommand::attack(UnitId(1), enemy, DamagePattern::SingleTarget);
    assert_eq!(engine.confirm_action(first), Ok(ConfirmOutcome::Started));
    engine.step();
    assert_eq!(engine.confirm_action(second), Ok(ConfirmOutcome::Queued));
    assert_eq!(health(&engine, enemy), 20);

    engine.run_pending();

    assert_eq!(health(&engine, enemy), 16);
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::ActionResolved { .. })), 2);
}

#[test]
fn health_stays_within_bounds() {
    let mut engine = start(vec![hero(10, 3)], vec![grunt(10, 2)]);
    let enemy = UnitId(1);

    engine.apply_health_change(enemy, -4);
    let healed = engine.apply_health_change(enemy, 50);
    assert_eq!(healed.health_delta, 4);
    assert_eq!(health(&engine, enemy), 10);

    let change = engine.apply_health_change(enemy, -25);
    assert_eq!(change.health_delta, -10);
    assert!(change.died);
    assert_eq!(health(&engine, enemy), 0);

    let after_death = engine.apply_health_change(enemy, 5);
    assert_eq!(after_death, HealthChange::default());
    assert_eq!(health(&engine, enemy), 0);
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::UnitDied { .. })), 1);
}

#[test]
fn masked_hit_breaks_the_mask_once_and_overflows_into_health() {
    let mut guarded = grunt(10, 1);
    guarded.starting_mask = Some(mask(
        "shell",
        5,
        vec![effect(
            EffectTiming::OnDestroy,
            EffectAction::Damage {
                target: EffectTarget::Enemies,
                amount: 1,
            },
        )],
    ));
    let mut engine = start(vec![hero(20, 8)], vec![guarded]);
    let enemy = UnitId(1);

    attack(&mut engine, P0, enemy);

    assert_eq!(health(&engine, enemy), 7);
    let shell = engine.state().mask(MaskId(0)).expect("mask exists");
    assert_eq!(shell.current_durability, 0);
    assert_eq!(shell.location, MaskLocation::Discard);
    assert_eq!(engine.state().unit(enemy).and_then(|u| u.mask), None);
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::MaskDestroyed { .. })), 1);
    // OnDestroy hit the hero exactly once.
    assert_eq!(health(&engine, P0), 19);
}

#[test]
fn masked_damage_never_exceeds_the_overflow() {
    for (durability, damage) in [(5u32, 3i32), (5, 5), (2, 9), (0, 4)] {
        let mut guarded = grunt(50, 1);
        guarded.starting_mask = Some(mask("shell", durability, Vec::new()));
        let mut engine = start(vec![hero(10, 1)], vec![guarded]);
        let enemy = UnitId(1);

        engine.apply_health_change(enemy, -damage);

        let lost = 50 - health(&engine, enemy) as i32;
        assert!(lost <= (damage - durability as i32).max(0));
    }
}

#[test]
fn dead_units_never_act_or_get_targeted() {
    let mut fallen = hero(10, 3);
    fallen.starting_health = Some(0);
    let mut corpse = grunt(10, 1);
    corpse.starting_health = Some(0);
    let mut engine = start(vec![hero(10, 3), fallen], vec![grunt(10, 1), corpse]);

    let from_dead = ActionCommand::attack(UnitId(1), UnitId(2), DamagePattern::SingleTarget);
    assert_eq!(
        engine.confirm_action(from_dead),
        Err(CommandError::InitiatorDead { unit: UnitId(1) })
    );

    let at_dead = ActionCommand::attack(P0, UnitId(3), DamagePattern::SingleTarget);
    assert_eq!(
        engine.confirm_action(at_dead),
        Err(CommandError::TargetDead { unit: UnitId(3) })
    );
    assert_eq!(engine.state().available(P0, ResourceKind::Attack), 1);
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::ActionRejected { .. })), 2);
}

#[test]
fn status_round_trip_restores_attack() {
    let mut engine = start(vec![hero(10, 3)], vec![grunt(10, 2)]);

    assert!(engine.apply_status_to(P0, StatusSpec::attack_up(2, 2)));
    assert_eq!(engine.state().total_attack(P0), 5);

    assert!(engine.remove_status_from(P0, StatusKind::AttackUp));
    assert_eq!(engine.state().total_attack(P0), 3);
    assert_eq!(engine.state().unit(P0).map(|u| u.attack_modifier), Some(0));
}

#[test]
fn statuses_expire_at_the_owner_round_end() {
    let mut engine = start(vec![hero(10, 3)], vec![grunt(10, 0)]);
    engine.apply_status_to(P0, StatusSpec::attack_up(2, 1));

    engine.player_end_turn().expect("player round");

    assert!(!engine.state().unit(P0).is_some_and(|u| u.statuses.has(StatusKind::AttackUp)));
    assert_eq!(engine.state().total_attack(P0), 3);
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::StatusRemoved { .. })), 1);
}

#[test]
fn stunned_units_cannot_act() {
    let mut engine = start(vec![hero(10, 3)], vec![grunt(10, 2)]);
    engine.apply_status_to(P0, StatusSpec::stun(1));

    let command = ActionCommand::attack(P0, UnitId(1), DamagePattern::SingleTarget);
    assert_eq!(
        engine.confirm_action(command),
        Err(CommandError::Stunned { unit: P0 })
    );
}

#[test]
fn ending_a_round_switches_teams_when_both_survive() {
    let mut engine = start(vec![hero(10, 3)], vec![grunt(10, 2)]);
    engine.drain_events();

    engine.player_end_turn().expect("player round");

    assert_eq!(engine.phase(), BattlePhase::RoundActive(Team::Enemy));
    assert_eq!(
        count(&engine, |e| matches!(
            e,
            BattleEvent::TeamSwitched { from: Team::Player, to: Team::Enemy }
        )),
        1
    );
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::BattleOver { .. })), 0);
    assert_eq!(
        count(&engine, |e| matches!(e, BattleEvent::EnemyActionPreview { .. })),
        1
    );
}

#[test]
fn eliminating_the_last_enemy_ends_the_battle_once() {
    let mut engine = start(vec![hero(10, 9)], vec![grunt(5, 2)]);

    attack(&mut engine, P0, UnitId(1));
    engine.end_round();

    assert_eq!(
        engine.phase(),
        BattlePhase::BattleOver {
            winner: Team::Player
        }
    );
    assert_eq!(
        count(&engine, |e| matches!(
            e,
            BattleEvent::BattleOver {
                winner_is_player: true,
                ..
            }
        )),
        1
    );
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::TeamSwitched { .. })), 0);
    assert!(!engine.state().roster.contains(&UnitId(1)));
    assert_eq!(
        engine.player_end_turn(),
        Err(EngineError::NotActive)
    );
}

#[test]
fn round_cap_decides_on_remaining_health() {
    let config = BattleConfig {
        max_rounds: 2,
        ..BattleConfig::default()
    };
    let mut engine = start_with(config, vec![hero(10, 0)], vec![grunt(5, 0)]);

    engine.player_end_turn().expect("player round");
    engine.run_enemy_round();

    assert_eq!(engine.phase(), BattlePhase::BattleOver { winner: Team::Player });
}

#[test]
fn switching_masks_unequips_before_equipping() {
    let outgoing = mask(
        "old",
        4,
        vec![effect(
            EffectTiming::OnDestroy,
            EffectAction::Heal {
                target: EffectTarget::Wielder,
                amount: 1,
            },
        )],
    );
    let incoming = mask(
        "new",
        6,
        vec![effect(
            EffectTiming::OnEquip,
            EffectAction::ApplyStatus {
                target: EffectTarget::Wielder,
                status: StatusSpec::attack_up(2, 2),
            },
        )],
    );
    let mut wearer = hero(10, 3);
    wearer.starting_health = Some(5);
    wearer.starting_mask = Some(outgoing);

    let mut engine = BattleEngine::new(BattleConfig::default());
    engine.set_deck(Team::Player, vec![incoming]);
    engine
        .initialize_battle(vec![wearer], vec![grunt(10, 1)])
        .expect("initializes");
    engine.drain_events();

    let new_mask = engine.state().deck(Team::Player).expect("deck").hand()[0];
    engine
        .confirm_action(ActionCommand::switch_mask(P0, new_mask, 1))
        .expect("switch is valid");
    engine.run_pending();

    let events = engine.journal();
    let position = |pred: &dyn Fn(&BattleEvent) -> bool| events.iter().position(|e| pred(e));
    let healed = position(&|e| matches!(e, BattleEvent::UnitHealthChanged { delta: 1, .. }));
    let unequipped = position(&|e| {
        matches!(e, BattleEvent::MaskUnequipped { mask: MaskId(0), .. })
    });
    let equipped = position(&|e| {
        matches!(e, BattleEvent::MaskEquipped { mask, .. } if *mask == new_mask)
    });
    let buffed = position(&|e| {
        matches!(e, BattleEvent::StatusApplied { kind: StatusKind::AttackUp, .. })
    });

    assert!(healed.is_some() && buffed.is_some());
    assert!(healed < unequipped);
    assert!(unequipped < equipped);
    assert!(equipped < buffed);
    assert_eq!(engine.state().unit(P0).and_then(|u| u.mask), Some(new_mask));
    assert_eq!(engine.state().total_attack(P0), 5);
    assert_eq!(
        engine.state().pools.get(Team::Player).get(ResourceKind::ActionPoint),
        2
    );
}

#[test]
fn deck_reshuffles_discards_when_the_pile_runs_out() {
    let config = BattleConfig {
        draw_cost: 0,
        opening_hand: 0,
        ..BattleConfig::default()
    };
    let mut engine = BattleEngine::new(config);
    engine.set_deck(
        Team::Player,
        vec![mask("a", 1, Vec::new()), mask("b", 1, Vec::new()), mask("c", 1, Vec::new())],
    );
    engine
        .initialize_battle(vec![hero(10, 1)], vec![grunt(10, 1)])
        .expect("initializes");

    let mut drawn = Vec::new();
    for _ in 0..3 {
        drawn.push(engine.draw_mask(Team::Player).expect("draw").expect("mask"));
    }
    assert_eq!(engine.draw_mask(Team::Player), Ok(None));

    engine.discard_mask(Team::Player, drawn[1]).expect("in hand");
    assert_eq!(engine.draw_mask(Team::Player), Ok(Some(drawn[1])));
    assert_eq!(
        count(&engine, |e| matches!(e, BattleEvent::DeckReshuffled { count: 1, .. })),
        1
    );
    assert_eq!(
        engine.state().mask(drawn[1]).map(|m| m.location),
        Some(MaskLocation::Hand)
    );
}

#[test]
fn drawing_costs_action_points_and_respects_the_hand_limit() {
    let config = BattleConfig {
        opening_hand: 0,
        hand_limit: 1,
        ..BattleConfig::default()
    };
    let mut engine = BattleEngine::new(config);
    engine.set_deck(Team::Player, vec![mask("a", 1, Vec::new()), mask("b", 1, Vec::new())]);
    engine
        .initialize_battle(vec![hero(10, 1)], vec![grunt(10, 1)])
        .expect("initializes");

    assert!(engine.draw_mask(Team::Player).expect("draw").is_some());
    assert_eq!(
        engine.state().pools.get(Team::Player).get(ResourceKind::ActionPoint),
        2
    );
    assert!(matches!(
        engine.draw_mask(Team::Player),
        Err(EngineError::Deck(_))
    ));
    assert_eq!(
        engine.draw_mask(Team::Enemy),
        Err(EngineError::NotActiveTeam { team: Team::Enemy })
    );
}

#[test]
fn tank_charges_then_releases_a_boosted_attack() {
    let tank = template(
        "tank",
        Lane::Middle,
        40,
        3,
        ControlSpec::Enemy(EnemySpec {
            archetype: Archetype::Tank {
                charge_time: 1,
                charge_chance: 100,
                multiplier_pct: 200,
            },
            ..EnemySpec::default()
        }),
    );
    let mut engine = start(vec![hero(30, 0)], vec![tank]);
    let tank = UnitId(1);
    let memory = |engine: &BattleEngine| {
        engine
            .state()
            .controller(tank)
            .and_then(|c| c.brain())
            .map(|b| b.memory.charge)
    };

    engine.player_end_turn().expect("player round");
    engine.run_enemy_round();
    assert_eq!(memory(&engine), Some(1));
    assert_eq!(health(&engine, P0), 30);
    assert_eq!(
        count(&engine, |e| matches!(
            e,
            BattleEvent::AbilityUsed { ability: AbilityKind::Charge, .. }
        )),
        1
    );

    engine.player_end_turn().expect("player round");
    let decision = engine.enemy_decision(tank).expect("tank acts");
    assert!(matches!(
        decision.command.kind,
        crate::action::ActionKind::Attack(payload) if payload.multiplier_pct == 200
    ));
    engine.run_enemy_round();

    assert_eq!(health(&engine, P0), 24);
    assert_eq!(memory(&engine), Some(0));
}

#[test]
fn round_start_resets_the_attack_allowance() {
    let mut wearer = hero(10, 1);
    wearer.starting_mask = Some(mask(
        "frenzy",
        3,
        vec![effect(
            EffectTiming::OnActivate,
            EffectAction::GrantAttacks { amount: 2 },
        )],
    ));
    let mut engine = start(vec![wearer], vec![grunt(30, 0)]);

    engine
        .confirm_action(ActionCommand::activate_mask(P0, MaskId(0), 1))
        .expect("activation is valid");
    engine.run_pending();
    assert_eq!(engine.state().available(P0, ResourceKind::Attack), 3);

    let again = engine.confirm_action(ActionCommand::activate_mask(P0, MaskId(0), 1));
    assert_eq!(again, Err(CommandError::ActivationSpent { mask: MaskId(0) }));

    engine.player_end_turn().expect("player round");
    engine.run_enemy_round();

    assert_eq!(engine.phase(), BattlePhase::RoundActive(Team::Player));
    assert_eq!(engine.state().available(P0, ResourceKind::Attack), 1);
    assert_eq!(
        engine.state().pools.get(Team::Player).get(ResourceKind::ActionPoint),
        3
    );
}

#[test]
fn every_second_attack_triggers_the_condition_effect() {
    let mut wearer = hero(10, 1);
    wearer.starting_mask = Some(mask(
        "rhythm",
        3,
        vec![EffectSpec {
            timing: EffectTiming::OnCondition,
            action: EffectAction::ApplyStatus {
                target: EffectTarget::Wielder,
                status: StatusSpec::rage(1, 3, 5),
            },
            condition: Some(EffectCondition::EveryNthAttack { n: 2 }),
        }],
    ));
    let config = BattleConfig {
        base_attack_allowance: 3,
        ..BattleConfig::default()
    };
    let mut engine = start_with(config, vec![wearer], vec![grunt(30, 0)]);
    let enemy = UnitId(1);

    attack(&mut engine, P0, enemy);
    assert!(!engine.state().unit(P0).is_some_and(|u| u.statuses.has(StatusKind::Rage)));

    attack(&mut engine, P0, enemy);
    assert!(engine.state().unit(P0).is_some_and(|u| u.statuses.has(StatusKind::Rage)));

    attack(&mut engine, P0, enemy);
    assert_eq!(
        count(&engine, |e| matches!(e, BattleEvent::StatusApplied { kind: StatusKind::Rage, .. })),
        1
    );
}

#[test]
fn area_and_splash_patterns_pick_their_victims() {
    let lanes = || {
        vec![
            template("up", Lane::Up, 10, 0, ControlSpec::Enemy(EnemySpec::default())),
            template("mid", Lane::Middle, 10, 0, ControlSpec::Enemy(EnemySpec::default())),
            template("low", Lane::Bottom, 10, 0, ControlSpec::Enemy(EnemySpec::default())),
        ]
    };

    let mut engine = start(vec![hero(10, 4)], lanes());
    engine
        .confirm_action(ActionCommand::attack(P0, UnitId(1), DamagePattern::AoE))
        .expect("valid");
    engine.run_pending();
    assert_eq!(
        [health(&engine, UnitId(1)), health(&engine, UnitId(2)), health(&engine, UnitId(3))],
        [6, 6, 6]
    );

    let mut engine = start(vec![hero(10, 4)], lanes());
    engine
        .confirm_action(ActionCommand::attack(P0, UnitId(1), DamagePattern::Splash))
        .expect("valid");
    engine.run_pending();
    assert_eq!(
        [health(&engine, UnitId(1)), health(&engine, UnitId(2)), health(&engine, UnitId(3))],
        [6, 6, 10]
    );
}

#[test]
fn poison_can_end_the_battle_at_round_start() {
    let mut engine = start(vec![hero(10, 0)], vec![grunt(2, 0)]);
    engine.player_end_turn().expect("player round");
    engine.apply_status_to(UnitId(1), StatusSpec::poison(5, 3));
    engine.run_enemy_round();

    // The enemy's own round already ran, so the poison ticks next enemy round.
    engine.player_end_turn().expect("player round");

    assert_eq!(engine.phase(), BattlePhase::BattleOver { winner: Team::Player });
    assert_eq!(count(&engine, |e| matches!(e, BattleEvent::BattleOver { .. })), 1);
}

#[test]
fn observers_see_events_until_unsubscribed() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(0usize));
    let mut engine = BattleEngine::new(BattleConfig::default());
    let sink = Arc::clone(&seen);
    let id = engine.subscribe(move |_| *sink.lock().expect("lock") += 1);

    engine
        .initialize_battle(vec![hero(10, 1)], vec![grunt(10, 1)])
        .expect("initializes");
    let after_init = *seen.lock().expect("lock");
    assert_eq!(after_init, engine.journal().len());

    assert!(engine.unsubscribe(id));
    engine.player_end_turn().expect("player round");
    assert_eq!(*seen.lock().expect("lock"), after_init);
}

#[test]
fn same_seed_replays_the_same_battle() {
    let run = || {
        let config = BattleConfig::default().with_seed(42);
        let mut engine = BattleEngine::new(config);
        engine.set_deck(
            Team::Player,
            (0..6).map(|i| mask(&format!("m{i}"), 2, Vec::new())).collect(),
        );
        engine
            .initialize_battle(vec![hero(30, 2)], vec![grunt(30, 2), grunt(30, 2)])
            .expect("initializes");
        for _ in 0..3 {
            engine.player_end_turn().expect("player round");
            engine.run_enemy_round();
        }
        engine.drain_events()
    };

    assert_eq!(run(), run());
}

fn enemy(name: &str, health: u32, attack: i32, archetype: Archetype) -> UnitTemplate {
    template(
        name,
        Lane::Middle,
        health,
        attack,
        ControlSpec::Enemy(EnemySpec {
            archetype,
            ..EnemySpec::default()
        }),
    )
}

fn has_status(engine: &BattleEngine, unit: UnitId, kind: StatusKind) -> bool {
    engine
        .state()
        .unit(unit)
        .is_some_and(|u| u.statuses.has(kind))
}

fn support_cooldown(engine: &BattleEngine, unit: UnitId) -> Option<u32> {
    engine
        .state()
        .controller(unit)
        .and_then(|c| c.brain())
        .map(|b| b.memory.support_cooldown)
}

fn ability_uses(engine: &BattleEngine, pred: impl Fn(&AbilityKind) -> bool) -> usize {
    count(engine, |e| {
        matches!(e, BattleEvent::AbilityUsed { ability, .. } if pred(ability))
    })
}

#[test]
fn stun_interrupts_a_charge_in_progress() {
    let tank = enemy(
        "tank",
        40,
        3,
        Archetype::Tank {
            charge_time: 2,
            charge_chance: 100,
            multiplier_pct: 200,
        },
    );
    let mut engine = start(vec![hero(30, 0)], vec![tank]);
    let tank = UnitId(1);
    let charge = |engine: &BattleEngine| {
        engine
            .state()
            .controller(tank)
            .and_then(|c| c.brain())
            .map(|b| b.memory.charge)
    };

    engine.player_end_turn().expect("player round");
    engine.run_enemy_round();
    assert_eq!(charge(&engine), Some(1));

    assert!(engine.apply_status_to(tank, StatusSpec::stun(1)));
    assert_eq!(charge(&engine), Some(0));
    assert!(engine.enemy_decision(tank).is_none());
    assert_eq!(health(&engine, P0), 30);
}

#[test]
fn buffer_buffs_every_ally_then_waits_out_its_cooldown() {
    let buffer = enemy(
        "buffer",
        20,
        1,
        Archetype::Buffer {
            chance: 100,
            status: StatusSpec::attack_up(2, 5),
            cooldown: 2,
        },
    );
    let mut engine = start(vec![hero(40, 0)], vec![buffer, grunt(20, 1)]);
    let buffer = UnitId(1);
    let ally = UnitId(2);
    let buffs = |engine: &BattleEngine| {
        ability_uses(engine, |a| matches!(a, AbilityKind::BuffAllies { .. }))
    };

    engine.player_end_turn().expect("player round");
    engine.run_enemy_round();
    assert_eq!(buffs(&engine), 1);
    assert!(has_status(&engine, buffer, StatusKind::AttackUp));
    assert!(has_status(&engine, ally, StatusKind::AttackUp));
    assert!(!has_status(&engine, P0, StatusKind::AttackUp));
    assert_eq!(support_cooldown(&engine, buffer), Some(2));

    // One tick left on the cooldown: the buffer attacks instead.
    engine.player_end_turn().expect("player round");
    assert_eq!(support_cooldown(&engine, buffer), Some(1));
    let decision = engine.enemy_decision(buffer).expect("buffer acts");
    assert!(matches!(
        decision.command.kind,
        crate::action::ActionKind::Attack(_)
    ));
    engine.run_enemy_round();
    assert_eq!(buffs(&engine), 1);

    engine.player_end_turn().expect("player round");
    assert_eq!(support_cooldown(&engine, buffer), Some(0));
    engine.run_enemy_round();
    assert_eq!(buffs(&engine), 2);
}

#[test]
fn healer_only_heals_once_an_ally_drops_below_the_threshold() {
    let healer = || {
        enemy(
            "healer",
            20,
            2,
            Archetype::Healer {
                chance: 100,
                amount: 5,
                threshold_pct: 50,
                cooldown: 0,
            },
        )
    };
    let heals = |engine: &BattleEngine| {
        ability_uses(engine, |a| matches!(a, AbilityKind::HealAllies { .. }))
    };

    let mut healthy = start(vec![hero(30, 0)], vec![healer(), grunt(20, 0)]);
    healthy.player_end_turn().expect("player round");
    healthy.run_enemy_round();
    assert_eq!(heals(&healthy), 0);
    assert_eq!(health(&healthy, P0), 28);

    let wounded = UnitTemplate {
        starting_health: Some(5),
        ..grunt(20, 0)
    };
    let mut engine = start(vec![hero(30, 0)], vec![healer(), wounded]);
    engine.player_end_turn().expect("player round");
    engine.run_enemy_round();
    assert_eq!(heals(&engine), 1);
    assert_eq!(health(&engine, UnitId(2)), 10);
    assert_eq!(health(&engine, UnitId(1)), 20);
    assert_eq!(health(&engine, P0), 30);
}

#[test]
fn debuffer_hits_the_policy_target() {
    let debuffer = enemy(
        "hexer",
        20,
        1,
        Archetype::Debuffer {
            chance: 100,
            status: StatusSpec::attack_down(2, 3),
            cooldown: 1,
        },
    );
    let sturdy = hero(30, 0);
    let frail = UnitTemplate {
        starting_health: Some(8),
        ..hero(30, 0)
    };
    let mut engine = start(vec![sturdy, frail], vec![debuffer]);
    let frail = UnitId(1);

    engine.player_end_turn().expect("player round");
    engine.run_enemy_round();

    assert_eq!(
        ability_uses(&engine, |a| matches!(a, AbilityKind::DebuffTarget { .. })),
        1
    );
    assert!(has_status(&engine, frail, StatusKind::AttackDown));
    assert!(!has_status(&engine, P0, StatusKind::AttackDown));
    assert!(!has_status(&engine, UnitId(2), StatusKind::AttackDown));
}

#[test]
fn drained_events_do_not_come_back() {
    let mut engine = start(vec![hero(30, 0)], vec![grunt(30, 1)]);

    let opening = engine.drain_events();
    assert!(matches!(opening.first(), Some(BattleEvent::BattleStarted { .. })));
    assert!(engine.journal().is_empty());

    engine.player_end_turn().expect("player round");
    let next = engine.drain_events();
    assert!(next.iter().any(|e| matches!(e, BattleEvent::RoundEnded { .. })));
    assert!(!next.iter().any(|e| matches!(e, BattleEvent::BattleStarted { .. })));
    assert!(engine.drain_events().is_empty());
}

#[test]
fn killed_units_are_reported_once_through_drain_removed() {
    let mut engine = start(vec![hero(10, 9)], vec![grunt(5, 2), grunt(30, 2)]);
    let fallen = UnitId(1);

    attack(&mut engine, P0, fallen);
    engine.player_end_turn().expect("player round");

    assert_eq!(engine.drain_removed(), vec![fallen]);
    assert!(engine.drain_removed().is_empty());

    engine.run_enemy_round();
    assert!(engine.drain_removed().is_empty());
    assert!(!engine.state().roster.contains(&fallen));
}
