//! End-to-end tests driving battles through the async runtime.

use battle_core::{
    ActionCommand, BattleConfig, BattleEvent, BattlePhase, ControlSpec, DamagePattern, EngineError,
    EnemySpec, Lane, MaskKind, MaskTemplate, ResourceKind, StepTimings, Team, UnitId,
    UnitTemplate,
};
use battle_runtime::{
    AutoPlayerProvider, BattleRuntime, EnemyAiProvider, ProviderKind, RuntimeConfig,
    RuntimeError, ScriptedProvider, Topic,
};

const HERO: UnitId = UnitId(0);
const GRUNT: UnitId = UnitId(1);

fn unit(name: &str, health: u32, attack: i32, control: ControlSpec) -> UnitTemplate {
    UnitTemplate {
        name: name.to_owned(),
        lane: Lane::Middle,
        max_health: health,
        starting_health: None,
        base_attack: attack,
        base_defense: 0,
        starting_mask: None,
        control,
    }
}

fn hero(health: u32, attack: i32) -> UnitTemplate {
    unit("hero", health, attack, ControlSpec::Player)
}

fn grunt(health: u32, attack: i32) -> UnitTemplate {
    unit("grunt", health, attack, ControlSpec::Enemy(EnemySpec::default()))
}

fn plain_mask(name: &str) -> MaskTemplate {
    MaskTemplate {
        name: name.to_owned(),
        kind: MaskKind::Offensive,
        pattern: DamagePattern::SingleTarget,
        switch_cost: 1,
        attack_bonus: 2,
        max_durability: 5,
        effects: Vec::new(),
    }
}

#[tokio::test]
async fn auto_battle_runs_to_a_winner() {
    let runtime = BattleRuntime::builder()
        .units(vec![hero(30, 10)], vec![grunt(10, 2)])
        .player_provider(AutoPlayerProvider)
        .enemy_provider(EnemyAiProvider::new())
        .build()
        .await
        .unwrap();

    let outcome = runtime.run().await.unwrap();

    assert_eq!(outcome.winner, Team::Player);
    assert_eq!(outcome.rounds, 1);
    assert_eq!(
        outcome.snapshot.phase,
        BattlePhase::BattleOver {
            winner: Team::Player
        }
    );
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rounds_alternate_until_the_enemy_falls() {
    let runtime = BattleRuntime::builder()
        .units(vec![hero(30, 5)], vec![grunt(12, 3)])
        .player_provider(AutoPlayerProvider)
        .enemy_provider(EnemyAiProvider::new())
        .build()
        .await
        .unwrap();

    let outcome = runtime.run().await.unwrap();

    // 5 damage per player round: the grunt falls on the third.
    assert_eq!(outcome.winner, Team::Player);
    assert_eq!(outcome.rounds, 5);
    let hero = outcome.snapshot.unit(HERO).unwrap();
    assert_eq!(hero.current_health, 30 - 2 * 3);
}

#[tokio::test]
async fn playing_before_start_is_an_error() {
    let runtime = BattleRuntime::builder()
        .units(vec![hero(10, 1)], vec![grunt(10, 1)])
        .player_provider(AutoPlayerProvider)
        .build()
        .await
        .unwrap();

    let error = runtime.play_round().await.unwrap_err();
    assert!(matches!(error, RuntimeError::NotStarted));
}

#[tokio::test]
async fn missing_enemy_provider_surfaces_on_the_enemy_round() {
    let runtime = BattleRuntime::builder()
        .units(vec![hero(30, 5)], vec![grunt(50, 1)])
        .player_provider(AutoPlayerProvider)
        .build()
        .await
        .unwrap();
    runtime.start().await.unwrap();

    assert_eq!(runtime.play_round().await.unwrap(), None);

    let error = runtime.play_round().await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::ProviderNotSet {
            kind: ProviderKind::Enemy
        }
    ));
}

#[tokio::test]
async fn scripted_commands_play_in_order() {
    let script = ScriptedProvider::new([ActionCommand::attack(
        HERO,
        GRUNT,
        DamagePattern::SingleTarget,
    )]);
    let runtime = BattleRuntime::builder()
        .units(vec![hero(30, 5)], vec![grunt(20, 1)])
        .player_provider(script)
        .enemy_provider(EnemyAiProvider::new())
        .build()
        .await
        .unwrap();
    runtime.start().await.unwrap();

    runtime.play_round().await.unwrap();

    let snapshot = runtime.handle().snapshot().await.unwrap();
    assert_eq!(snapshot.unit(GRUNT).unwrap().current_health, 15);
    assert_eq!(snapshot.phase, BattlePhase::RoundActive(Team::Enemy));
}

#[tokio::test]
async fn rejected_commands_do_not_stall_the_round() {
    // Attacking a teammate is invalid; the round still ends normally.
    let script = ScriptedProvider::new([ActionCommand::attack(
        HERO,
        HERO,
        DamagePattern::SingleTarget,
    )]);
    let runtime = BattleRuntime::builder()
        .units(vec![hero(30, 5)], vec![grunt(20, 1)])
        .player_provider(script)
        .enemy_provider(EnemyAiProvider::new())
        .build()
        .await
        .unwrap();
    let mut actions = runtime.subscribe(Topic::Action);
    runtime.start().await.unwrap();

    runtime.play_round().await.unwrap();

    let state = runtime.handle().query_state().await.unwrap();
    assert_eq!(state.active_team(), Some(Team::Enemy));
    assert_eq!(state.unit(HERO).unwrap().current_health, 30);

    let mut rejected = false;
    while let Ok(event) = actions.try_recv() {
        rejected |= matches!(event, BattleEvent::ActionRejected { .. });
    }
    assert!(rejected);
}

#[tokio::test]
async fn round_topic_sees_the_whole_battle() {
    let runtime = BattleRuntime::builder()
        .units(vec![hero(30, 10)], vec![grunt(10, 2)])
        .player_provider(AutoPlayerProvider)
        .enemy_provider(EnemyAiProvider::new())
        .build()
        .await
        .unwrap();
    let mut rounds = runtime.subscribe(Topic::Round);

    runtime.run().await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rounds.try_recv() {
        events.push(event);
    }
    assert!(matches!(
        events.first(),
        Some(BattleEvent::BattleStarted { .. })
    ));
    assert_eq!(
        events.last(),
        Some(&BattleEvent::BattleOver {
            winner: Team::Player,
            winner_is_player: true
        })
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, BattleEvent::BattleOver { .. }))
            .count(),
        1
    );
}

#[tokio::test]
async fn drawing_through_the_handle_spends_action_points() {
    let config = BattleConfig {
        opening_hand: 0,
        ..BattleConfig::default()
    };
    let runtime = BattleRuntime::builder()
        .battle_config(config)
        .deck(Team::Player, vec![plain_mask("a"), plain_mask("b")])
        .units(vec![hero(30, 5)], vec![grunt(20, 1)])
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    runtime.start().await.unwrap();

    let drawn = handle.draw_mask(Team::Player).await.unwrap();
    assert!(drawn.is_some());

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.deck(Team::Player).unwrap().hand().len(), 1);
    assert_eq!(
        state.pools.get(Team::Player).get(ResourceKind::ActionPoint),
        BattleConfig::DEFAULT_ACTION_POINT_MAX - BattleConfig::DEFAULT_DRAW_COST
    );

    let error = handle.draw_mask(Team::Enemy).await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Engine(EngineError::NotActiveTeam { team: Team::Enemy })
    ));
}

#[tokio::test]
async fn paced_steps_still_resolve_every_command() {
    let config = BattleConfig {
        step_timings: StepTimings {
            move_ms: 1,
            strike_ms: 1,
            mask_ms: 1,
            ability_ms: 1,
        },
        ..BattleConfig::default()
    };
    let runtime = BattleRuntime::builder()
        .config(RuntimeConfig {
            pace_steps: true,
            ..RuntimeConfig::default()
        })
        .battle_config(config)
        .units(vec![hero(30, 10)], vec![grunt(10, 2)])
        .player_provider(AutoPlayerProvider)
        .enemy_provider(EnemyAiProvider::new())
        .build()
        .await
        .unwrap();

    let outcome = runtime.run().await.unwrap();
    assert_eq!(outcome.winner, Team::Player);
}

#[tokio::test]
async fn embedded_encounters_finish() {
    for id in ["skirmish", "ogre_den", "war_band"] {
        let setup = battle_content::embedded::battle(id).unwrap();
        let runtime = BattleRuntime::builder()
            .setup(setup)
            .player_provider(AutoPlayerProvider)
            .enemy_provider(EnemyAiProvider::new())
            .build()
            .await
            .unwrap();

        let outcome = runtime.run().await.unwrap();
        assert!(outcome.rounds >= 1, "{id} never played a round");
        assert!(outcome.snapshot.phase.is_over());
        runtime.shutdown().await.unwrap();
    }
}

#[tokio::test]
async fn shutdown_closes_every_handle() {
    let runtime = BattleRuntime::builder()
        .units(vec![hero(10, 1)], vec![grunt(10, 1)])
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    drop(handle);

    runtime.shutdown().await.unwrap();
}
