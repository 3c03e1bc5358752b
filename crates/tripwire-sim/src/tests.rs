//! Tests for the session engine: occupancy, cooldowns, teleports, authority and weapons.

use glam::Vec3;

use tripwire_core::commands::HostCommand;
use tripwire_core::components::{ExternalForces, Health, HeldWeapon};
use tripwire_core::config::*;
use tripwire_core::enums::*;
use tripwire_core::events::PresentationEvent;
use tripwire_core::net::NetMessage;
use tripwire_core::types::{HazardId, NetId, Transform, ZoneId};
use tripwire_core::TripwireError;

use crate::engine::{SessionConfig, SessionEngine, TickOutput};
use crate::nav::FlatFloor;

// ---- Helpers ----

fn authority() -> SessionEngine {
    SessionEngine::new(SessionConfig::default())
}

fn client() -> SessionEngine {
    SessionEngine::new(SessionConfig::default().with_role(PeerRole::Client))
}

fn damage(config: DamageConfig) -> ZoneSpec {
    ZoneSpec {
        transform: Transform::default(),
        effect: ZoneEffectConfig::Damage(config),
    }
}

fn teleport_at(position: Vec3, config: TeleportConfig) -> ZoneSpec {
    ZoneSpec {
        transform: Transform::at(position),
        effect: ZoneEffectConfig::Teleport(config),
    }
}

fn spawn(engine: &mut SessionEngine, id: u32, kind: OccupantKind, hp: i32) -> NetId {
    engine
        .spawn_occupant(OccupantSpec {
            id: NetId(id),
            kind,
            transform: Transform::at(Vec3::new(0.0, 0.0, 1.0)),
            hp,
            weapon: None,
        })
        .unwrap();
    NetId(id)
}

fn player(engine: &mut SessionEngine, id: u32, hp: i32) -> NetId {
    spawn(engine, id, OccupantKind::Player, hp)
}

fn enemy(engine: &mut SessionEngine, id: u32, hp: i32) -> NetId {
    spawn(engine, id, OccupantKind::Enemy, hp)
}

fn armed(engine: &mut SessionEngine, id: u32, weapon: WeaponConfig) -> NetId {
    engine
        .spawn_occupant(OccupantSpec {
            id: NetId(id),
            kind: OccupantKind::Player,
            transform: Transform::default(),
            hp: 100,
            weapon: Some(weapon),
        })
        .unwrap();
    NetId(id)
}

fn run(engine: &mut SessionEngine, ticks: usize) -> Vec<TickOutput> {
    (0..ticks).map(|_| engine.tick()).collect()
}

fn hp(engine: &SessionEngine, id: NetId) -> i32 {
    let entity = engine.entity(id).unwrap();
    engine.world().get::<&Health>(entity).unwrap().hp
}

/// Ticks at which `id` took zone damage.
fn damage_ticks(outputs: &[TickOutput], id: NetId) -> Vec<u64> {
    outputs
        .iter()
        .flat_map(|out| {
            out.presentation.iter().filter_map(move |e| match e {
                PresentationEvent::OccupantDamaged {
                    zone: Some(_),
                    occupant,
                    ..
                } if *occupant == id => Some(out.time.tick),
                _ => None,
            })
        })
        .collect()
}

fn enter(zone: ZoneId, occupant: NetId) -> HostCommand {
    HostCommand::ZoneEnter { zone, occupant }
}

fn exit(zone: ZoneId, occupant: NetId) -> HostCommand {
    HostCommand::ZoneExit { zone, occupant }
}

fn one_damage() -> DamageConfig {
    DamageConfig {
        damage_to_players: 1,
        damage_to_enemies: 1,
        ..Default::default()
    }
}

// ---- Occupancy ----

#[test]
fn test_double_enter_single_task() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_commands([enter(zone, p), enter(zone, p)]);
    engine.tick();
    engine.queue_command(enter(zone, p));
    engine.tick();

    assert_eq!(engine.active_tasks_for(zone, p), 1);
    assert_eq!(engine.snapshot().active_tasks, 1);
}

#[test]
fn test_exit_stops_recurring_damage() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(zone, p));
    let mut outputs = run(&mut engine, 27);
    engine.queue_command(exit(zone, p));
    outputs.extend(run(&mut engine, 10));

    // 0.25 s interval at 60 Hz lands on ticks 0 and 15; tick 30 follows the exit.
    assert_eq!(damage_ticks(&outputs, p), vec![0, 15]);
    assert_eq!(hp(&engine, p), 98);
    assert_eq!(engine.active_tasks_for(zone, p), 0);
    assert!(engine.snapshot().zones[0].occupants.is_empty());
}

#[test]
fn test_reenter_after_exit_restarts_immediately() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(zone, p));
    let mut outputs = run(&mut engine, 5);
    engine.queue_commands([exit(zone, p), enter(zone, p)]);
    outputs.extend(run(&mut engine, 1));

    assert_eq!(damage_ticks(&outputs, p), vec![0, 5]);
    assert_eq!(engine.active_tasks_for(zone, p), 1);
}

#[test]
fn test_local_zone_occupants_independent() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let a = player(&mut engine, 1, 100);
    let b = player(&mut engine, 2, 100);

    engine.queue_commands([enter(zone, a), enter(zone, b)]);
    let outputs = run(&mut engine, 16);

    assert_eq!(damage_ticks(&outputs, a), vec![0, 15]);
    assert_eq!(damage_ticks(&outputs, b), vec![0, 15]);
}

#[test]
fn test_zone_ignores_enemies_unless_configured() {
    let mut engine = authority();
    let players_only = engine.add_zone(damage(one_damage())).unwrap();
    let both = engine
        .add_zone(damage(DamageConfig {
            trigger_for_enemies: true,
            ..one_damage()
        }))
        .unwrap();
    let e = enemy(&mut engine, 1, 10);

    engine.queue_commands([enter(players_only, e), enter(both, e)]);
    run(&mut engine, 1);

    assert_eq!(engine.active_tasks_for(players_only, e), 0);
    assert_eq!(engine.active_tasks_for(both, e), 1);
    assert_eq!(hp(&engine, e), 9);
}

#[test]
fn test_unknown_ids_are_no_ops() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    engine.queue_commands([
        enter(ZoneId(9), NetId(1)),
        enter(zone, NetId(42)),
        exit(zone, NetId(42)),
        HostCommand::Despawn { occupant: NetId(42) },
    ]);
    let out = engine.tick();
    assert!(out.presentation.is_empty());
    assert_eq!(engine.snapshot().active_tasks, 0);
}

// ---- Damage ----

#[test]
fn test_player_pushed_along_zone_forward() {
    let mut engine = authority();
    let zone = engine
        .add_zone(damage(DamageConfig {
            force_magnitude_after_damage: 2.0,
            ..one_damage()
        }))
        .unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(zone, p));
    engine.tick();

    let entity = engine.entity(p).unwrap();
    let forces = engine.world().get::<&ExternalForces>(entity).unwrap().0;
    assert!((forces - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
}

#[test]
fn test_player_death_records_cause_and_ends_tasks() {
    let mut engine = authority();
    let config = DamageConfig {
        cause_of_death: CauseOfDeath::Burning,
        death_animation: DeathAnimation::Burnt,
        death_prefab_for_player: Some(DeathPrefab {
            name: "Ashes".into(),
            networked: false,
        }),
        ..one_damage()
    };
    let first = engine.add_zone(damage(config.clone())).unwrap();
    let second = engine.add_zone(damage(config)).unwrap();
    let p = player(&mut engine, 1, 2);

    engine.queue_commands([enter(first, p), enter(second, p)]);
    let outputs = run(&mut engine, 40);

    let entity = engine.entity(p).unwrap();
    let health = *engine.world().get::<&Health>(entity).unwrap();
    assert!(health.dead);
    assert_eq!(health.cause, Some(CauseOfDeath::Burning));
    assert_eq!(health.death_animation, Some(DeathAnimation::Burnt));
    assert_eq!(engine.snapshot().active_tasks, 0);
    assert_eq!(engine.stats().deaths, 1);

    let artifacts: Vec<_> = outputs
        .iter()
        .flat_map(|o| &o.presentation)
        .filter(|e| matches!(e, PresentationEvent::SpawnDeathArtifact(a) if a.prefab == "Ashes" && a.for_player))
        .collect();
    assert_eq!(artifacts.len(), 1);
}

#[test]
fn test_damage_clip_uses_closest_source() {
    let mut engine = authority();
    let zone = engine
        .add_zone(damage(DamageConfig {
            damage_clips: vec!["sizzle".into()],
            sound_attracts_dogs: true,
            damage_audio_sources: vec![
                AudioSourceSpec {
                    position: Vec3::new(-20.0, 0.0, 0.0),
                    ..Default::default()
                },
                AudioSourceSpec {
                    position: Vec3::new(1.0, 0.0, 1.0),
                    ..Default::default()
                },
            ],
            ..one_damage()
        }))
        .unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(zone, p));
    let out = engine.tick();

    let clip = out.presentation.iter().find_map(|e| match e {
        PresentationEvent::PlayClip { position, clip, .. } => Some((*position, clip.clone())),
        _ => None,
    });
    assert_eq!(clip, Some((Vec3::new(1.0, 0.0, 1.0), "sizzle".to_string())));
    assert!(out
        .presentation
        .iter()
        .any(|e| matches!(e, PresentationEvent::AudibleNoise { .. })));
}

// ---- Shared cooldown ----

#[test]
fn test_shared_cooldown_blocks_second_zone() {
    let mut engine = authority();
    let shared = DamageConfig {
        shared_cooldown: true,
        interval_for_players: 1.0,
        ..one_damage()
    };
    let a = engine.add_zone(damage(shared.clone())).unwrap();
    let b = engine.add_zone(damage(shared)).unwrap();
    let p1 = player(&mut engine, 1, 100);
    let p2 = player(&mut engine, 2, 100);

    let mut outputs = Vec::new();
    engine.queue_command(enter(a, p1));
    for tick in 0..=70u64 {
        match tick {
            1 => engine.queue_command(exit(a, p1)),
            30 => engine.queue_command(enter(b, p2)),
            _ => {}
        }
        outputs.push(engine.tick());
    }

    assert_eq!(damage_ticks(&outputs, p1), vec![0]);
    assert_eq!(damage_ticks(&outputs, p2), vec![60]);
    assert_eq!(engine.shared_cooldown().last_fired(), Some(60));
}

#[test]
fn test_local_zones_do_not_share() {
    let mut engine = authority();
    let a = engine.add_zone(damage(one_damage())).unwrap();
    let b = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_commands([enter(a, p), enter(b, p)]);
    let outputs = run(&mut engine, 1);

    assert_eq!(damage_ticks(&outputs, p), vec![0, 0]);
    assert_eq!(engine.shared_cooldown().last_fired(), None);
}

// ---- Zone lifetime ----

#[test]
fn test_zone_disables_after_duration() {
    let mut engine = authority();
    let zone = engine
        .add_zone(damage(DamageConfig {
            damage_duration: 0.5,
            ..one_damage()
        }))
        .unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(zone, p));
    let outputs = run(&mut engine, 45);

    assert_eq!(damage_ticks(&outputs, p), vec![0, 15]);
    let snapshot = engine.snapshot();
    assert!(!snapshot.zones[0].enabled);
    assert_eq!(snapshot.active_tasks, 0);

    engine.queue_commands([
        HostCommand::SetZoneEnabled { zone, enabled: true },
        enter(zone, p),
    ]);
    let out = engine.tick();
    assert_eq!(damage_ticks(&[out], p), vec![45]);
    assert!(engine.snapshot().zones[0].enabled);
}

#[test]
fn test_disable_cancels_all_occupants() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let a = player(&mut engine, 1, 100);
    let b = player(&mut engine, 2, 100);

    engine.queue_commands([enter(zone, a), enter(zone, b)]);
    engine.tick();
    engine.queue_command(HostCommand::SetZoneEnabled { zone, enabled: false });
    let outputs = run(&mut engine, 30);

    assert!(damage_ticks(&outputs, a).is_empty());
    assert!(damage_ticks(&outputs, b).is_empty());
    assert_eq!(engine.snapshot().active_tasks, 0);

    // Enter while disabled is ignored.
    engine.queue_command(enter(zone, a));
    engine.tick();
    assert_eq!(engine.active_tasks_for(zone, a), 0);
}

// ---- Stale occupants ----

#[test]
fn test_despawned_occupant_task_ends_without_touching_others() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let gone = player(&mut engine, 1, 100);
    let stays = player(&mut engine, 2, 100);

    engine.queue_commands([enter(zone, gone), enter(zone, stays)]);
    engine.tick();
    engine.queue_command(HostCommand::Despawn { occupant: gone });
    let outputs = run(&mut engine, 16);

    assert_eq!(damage_ticks(&outputs, stays), vec![15]);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.active_tasks, 1);
    assert_eq!(snapshot.zones[0].occupants, vec![stays]);
    assert_eq!(snapshot.occupants.len(), 1);
}

// ---- Teleport ----

fn linked_teleporter(engine: &mut SessionEngine, config: TeleportConfig, targets: &[Vec3]) -> ZoneId {
    let first_target = 1;
    let ids = (0..targets.len() as u32).map(|i| ZoneId(first_target + i)).collect();
    let source = engine
        .add_zone(teleport_at(
            Vec3::ZERO,
            TeleportConfig {
                targets: ids,
                trigger_for_players: true,
                ..config
            },
        ))
        .unwrap();
    for &position in targets {
        engine
            .add_zone(teleport_at(position, TeleportConfig::default()))
            .unwrap();
    }
    engine.check_links().unwrap();
    source
}

fn teleport_destinations(outputs: &[TickOutput]) -> Vec<Vec3> {
    outputs
        .iter()
        .flat_map(|o| &o.presentation)
        .filter_map(|e| match e {
            PresentationEvent::Teleported { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn test_teleport_lands_in_front_of_target() {
    let mut engine = authority();
    let zone = linked_teleporter(&mut engine, TeleportConfig::default(), &[Vec3::new(10.0, 0.0, 0.0)]);
    let p = player(&mut engine, 1, 100);

    engine.queue_command(HostCommand::Interact { zone, occupant: p });
    engine.tick();

    let entity = engine.entity(p).unwrap();
    let position = engine.world().get::<&Transform>(entity).unwrap().position;
    assert!((position - Vec3::new(10.0, 0.0, 1.0)).length() < 1e-5);
}

#[test]
fn test_teleport_sequence_reproducible() {
    let targets = [
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(-10.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 30.0),
    ];
    let record = |seed: u64| {
        let mut engine = SessionEngine::new(SessionConfig::default().with_level_seed(Some(seed)));
        let zone = linked_teleporter(&mut engine, TeleportConfig::default(), &targets);
        let p = player(&mut engine, 1, 100);
        let mut outputs = Vec::new();
        for _ in 0..50 {
            engine.queue_command(HostCommand::Interact { zone, occupant: p });
            outputs.push(engine.tick());
        }
        teleport_destinations(&outputs)
    };

    let a = record(777);
    let b = record(777);
    assert_eq!(a.len(), 50);
    assert_eq!(a, b);
    let distinct = targets
        .iter()
        .filter(|t| a.iter().any(|d| d.distance(**t) < 2.0))
        .count();
    assert!(distinct > 1, "all teleports chose one target");
}

#[test]
fn test_teleport_fixed_destination_ignores_offset() {
    let mut engine = authority();
    let fixed = Vec3::new(3.0, 4.0, 5.0);
    let zone = linked_teleporter(
        &mut engine,
        TeleportConfig {
            fixed_destination: Some(fixed),
            force_magnitude: 9.0,
            ..Default::default()
        },
        &[Vec3::new(10.0, 0.0, 0.0)],
    );
    let p = player(&mut engine, 1, 100);

    engine.queue_command(HostCommand::Interact { zone, occupant: p });
    let out = engine.tick();
    assert_eq!(teleport_destinations(&[out]), vec![fixed]);
}

#[test]
fn test_teleport_without_targets_is_no_op() {
    let mut engine = authority();
    let zone = engine
        .add_zone(teleport_at(
            Vec3::ZERO,
            TeleportConfig {
                trigger_for_players: true,
                ..Default::default()
            },
        ))
        .unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(zone, p));
    let out = engine.tick();
    assert!(teleport_destinations(&[out]).is_empty());
    assert_eq!(engine.stats().effects_applied, 0);
}

#[test]
fn test_teleport_cooldown_gates_repeat_use() {
    let mut engine = authority();
    let zone = linked_teleporter(
        &mut engine,
        TeleportConfig {
            cooldown_secs: 1.0,
            ..Default::default()
        },
        &[Vec3::new(10.0, 0.0, 0.0)],
    );
    let p = player(&mut engine, 1, 100);

    let mut outputs = Vec::new();
    for _ in 0..61 {
        engine.queue_command(HostCommand::Interact { zone, occupant: p });
        outputs.push(engine.tick());
    }
    let ticks: Vec<u64> = outputs
        .iter()
        .filter(|o| !teleport_destinations(std::slice::from_ref(*o)).is_empty())
        .map(|o| o.time.tick)
        .collect();
    assert_eq!(ticks, vec![0, 60]);
}

#[test]
fn test_enemy_teleport_snaps_to_nav_mesh() {
    let mut engine = SessionEngine::new(SessionConfig::default()).with_nav_mesh(FlatFloor { height: 3.0 });
    let zone = linked_teleporter(
        &mut engine,
        TeleportConfig {
            trigger_for_enemies: true,
            ..Default::default()
        },
        &[Vec3::new(10.0, 0.0, 0.0)],
    );
    let e = enemy(&mut engine, 1, 10);

    engine.queue_command(enter(zone, e));
    engine.tick();

    let entity = engine.entity(e).unwrap();
    let position = engine.world().get::<&Transform>(entity).unwrap().position;
    assert!((position - Vec3::new(10.0, 3.0, 1.0)).length() < 1e-5);
}

#[test]
fn test_enemy_teleport_reaches_every_target() {
    let mut engine = authority();
    let zone = linked_teleporter(
        &mut engine,
        TeleportConfig {
            trigger_for_enemies: true,
            clips: Vec::new(),
            ..Default::default()
        },
        &[
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::new(30.0, 0.0, 0.0),
        ],
    );
    let e = enemy(&mut engine, 1, 10);

    let mut outputs = Vec::new();
    for _ in 0..40 {
        engine.queue_command(enter(zone, e));
        outputs.push(engine.tick());
        engine.queue_command(exit(zone, e));
        outputs.push(engine.tick());
    }

    let destinations = teleport_destinations(&outputs);
    assert_eq!(destinations.len(), 40);
    for x in [10.0, 20.0, 30.0] {
        assert!(destinations.iter().any(|to| (to.x - x).abs() < 1e-5));
    }
}

#[test]
fn test_interact_is_for_players_only() {
    let mut engine = authority();
    let zone = linked_teleporter(
        &mut engine,
        TeleportConfig {
            trigger_for_enemies: true,
            ..Default::default()
        },
        &[Vec3::new(10.0, 0.0, 0.0)],
    );
    let e = enemy(&mut engine, 1, 10);

    engine.queue_command(HostCommand::Interact { zone, occupant: e });
    let out = engine.tick();
    assert!(teleport_destinations(&[out]).is_empty());
}

// ---- Authority ----

#[test]
fn test_client_sends_intent_and_mutates_nothing() {
    let mut engine = client();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(zone, p));
    let out = engine.tick();

    assert_eq!(
        out.outbox,
        vec![NetMessage::Intent {
            zone,
            occupant: p,
            effect: EffectKind::Damage,
        }]
    );
    assert_eq!(hp(&engine, p), 100);
    assert_eq!(engine.stats().intents_sent, 1);
}

#[test]
fn test_authority_commits_intent() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);

    engine.receive(NetMessage::Intent {
        zone,
        occupant: p,
        effect: EffectKind::Damage,
    });
    let out = engine.tick();

    assert_eq!(hp(&engine, p), 99);
    assert_eq!(
        out.outbox,
        vec![NetMessage::Commit {
            zone,
            occupant: p,
            effect: EffectKind::Damage,
            tick: 0,
        }]
    );
}

#[test]
fn test_client_applies_commit() {
    let mut engine = client();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);

    engine.receive(NetMessage::Commit {
        zone,
        occupant: p,
        effect: EffectKind::Damage,
        tick: 0,
    });
    engine.tick();

    assert_eq!(hp(&engine, p), 99);
    assert_eq!(engine.stats().commits_received, 1);
}

#[test]
fn test_wrong_side_messages_rejected() {
    let mut auth = authority();
    let mut peer = client();
    for engine in [&mut auth, &mut peer] {
        engine.add_zone(damage(one_damage())).unwrap();
        player(engine, 1, 100);
    }

    auth.receive(NetMessage::Commit {
        zone: ZoneId(0),
        occupant: NetId(1),
        effect: EffectKind::Damage,
        tick: 0,
    });
    peer.receive(NetMessage::Intent {
        zone: ZoneId(0),
        occupant: NetId(1),
        effect: EffectKind::Damage,
    });
    auth.receive(NetMessage::Intent {
        zone: ZoneId(5),
        occupant: NetId(1),
        effect: EffectKind::Damage,
    });
    auth.receive(NetMessage::Intent {
        zone: ZoneId(0),
        occupant: NetId(1),
        effect: EffectKind::Teleport,
    });
    let auth_out = auth.tick();
    let peer_out = peer.tick();

    assert_eq!(auth.stats().rejected_messages, 3);
    assert_eq!(peer.stats().rejected_messages, 1);
    assert!(auth_out.outbox.is_empty());
    assert!(peer_out.outbox.is_empty());
    assert_eq!(hp(&auth, NetId(1)), 100);
    assert_eq!(hp(&peer, NetId(1)), 100);
}

#[test]
fn test_client_ignores_enemy_enter() {
    let mut engine = client();
    let zone = engine
        .add_zone(damage(DamageConfig {
            trigger_for_enemies: true,
            ..one_damage()
        }))
        .unwrap();
    let e = enemy(&mut engine, 1, 10);

    engine.queue_command(enter(zone, e));
    let out = engine.tick();
    assert!(out.outbox.is_empty());
    assert_eq!(engine.active_tasks_for(zone, e), 0);
}

#[test]
fn test_networked_artifact_only_on_authority() {
    let config = DamageConfig {
        damage_to_players: 5,
        death_prefab_for_player: Some(DeathPrefab {
            name: "Corpse".into(),
            networked: true,
        }),
        ..Default::default()
    };
    let mut auth = authority();
    let mut peer = client();
    for engine in [&mut auth, &mut peer] {
        engine.add_zone(damage(config.clone())).unwrap();
        player(engine, 1, 5);
    }

    auth.queue_command(enter(ZoneId(0), NetId(1)));
    let auth_out = auth.tick();
    for message in auth_out.outbox.iter().cloned() {
        peer.receive(message);
    }
    let peer_out = peer.tick();

    let artifact = |out: &TickOutput| {
        out.presentation
            .iter()
            .any(|e| matches!(e, PresentationEvent::SpawnDeathArtifact(_)))
    };
    assert!(artifact(&auth_out));
    assert!(!artifact(&peer_out));
    assert!(peer_out
        .presentation
        .iter()
        .any(|e| matches!(e, PresentationEvent::OccupantKilled { .. })));
    assert_eq!(hp(&peer, NetId(1)), 0);
}

#[test]
fn test_shared_intent_denied_while_cooling_down() {
    let mut engine = authority();
    let zone = engine
        .add_zone(damage(DamageConfig {
            shared_cooldown: true,
            interval_for_players: 1.0,
            ..one_damage()
        }))
        .unwrap();
    let p = player(&mut engine, 1, 100);
    let intent = NetMessage::Intent {
        zone,
        occupant: p,
        effect: EffectKind::Damage,
    };

    engine.receive(intent.clone());
    engine.receive(intent);
    let out = engine.tick();

    assert_eq!(out.outbox.len(), 1);
    assert_eq!(engine.stats().rejected_messages, 1);
    assert_eq!(hp(&engine, p), 99);
}

#[test]
fn test_intents_rate_limited_per_residency() {
    let mut engine = authority();
    let zone = engine.add_zone(damage(one_damage())).unwrap();
    let p = player(&mut engine, 1, 100);
    let intent = NetMessage::Intent {
        zone,
        occupant: p,
        effect: EffectKind::Damage,
    };

    for _ in 0..50 {
        engine.receive(intent.clone());
    }
    let out = engine.tick();
    assert_eq!(out.outbox.len(), 1);
    assert_eq!(hp(&engine, p), 99);
    assert_eq!(engine.stats().rejected_messages, 49);

    // 0.25 s interval: the next intent is honoured from tick 15.
    run(&mut engine, 13);
    engine.receive(intent.clone());
    engine.tick();
    assert_eq!(hp(&engine, p), 99);
    engine.receive(intent);
    let out = engine.tick();
    assert_eq!(out.outbox.len(), 1);
    assert_eq!(hp(&engine, p), 98);
}

#[test]
fn test_dead_end_teleport_leaves_shared_clock_untouched() {
    let mut engine = authority();
    let teleporter = engine
        .add_zone(teleport_at(
            Vec3::ZERO,
            TeleportConfig {
                trigger_for_players: true,
                shared_cooldown: true,
                cooldown_secs: 1.0,
                ..Default::default()
            },
        ))
        .unwrap();
    let burner = engine
        .add_zone(damage(DamageConfig {
            shared_cooldown: true,
            interval_for_players: 1.0,
            ..one_damage()
        }))
        .unwrap();
    let p = player(&mut engine, 1, 100);

    engine.queue_command(enter(teleporter, p));
    let mut outputs = run(&mut engine, 1);
    assert_eq!(engine.shared_cooldown().last_fired(), None);
    assert_eq!(engine.stats().effects_applied, 0);

    engine.queue_command(enter(burner, p));
    outputs.extend(run(&mut engine, 1));
    assert_eq!(damage_ticks(&outputs, p), vec![1]);
}

#[test]
fn test_dead_end_teleport_intent_rejected_without_cooldown() {
    let mut engine = authority();
    let teleporter = engine
        .add_zone(teleport_at(
            Vec3::ZERO,
            TeleportConfig {
                trigger_for_players: true,
                shared_cooldown: true,
                cooldown_secs: 1.0,
                ..Default::default()
            },
        ))
        .unwrap();
    let p = player(&mut engine, 1, 100);

    engine.receive(NetMessage::Intent {
        zone: teleporter,
        occupant: p,
        effect: EffectKind::Teleport,
    });
    let out = engine.tick();
    assert!(out.outbox.is_empty());
    assert_eq!(engine.stats().rejected_messages, 1);
    assert_eq!(engine.shared_cooldown().last_fired(), None);
}

// ---- Weapons ----

#[test]
fn test_guaranteed_crit_doubles_once() {
    let mut engine = authority();
    let w = armed(
        &mut engine,
        1,
        WeaponConfig {
            hit_force: 2,
            crit_possible: true,
            crit_chance: 100.0,
            ..Default::default()
        },
    );
    let e = enemy(&mut engine, 2, 10);

    engine.queue_command(HostCommand::Swing {
        wielder: w,
        targets: vec![e],
        tip: Vec3::ZERO,
    });
    let out = engine.tick();

    assert_eq!(hp(&engine, e), 6);
    let entity = engine.entity(w).unwrap();
    assert_eq!(engine.world().get::<&HeldWeapon>(entity).unwrap().hit_force, 2);
    assert!(matches!(out.outbox[..], [NetMessage::SwingCommit { .. }]));
}

#[test]
fn test_fractional_force_carries_over() {
    let mut engine = authority();
    let w = armed(
        &mut engine,
        1,
        WeaponConfig {
            fractional_hit_force: Some(0.5),
            ..Default::default()
        },
    );
    let e = enemy(&mut engine, 2, 10);

    for _ in 0..4 {
        engine.queue_command(HostCommand::Swing {
            wielder: w,
            targets: vec![e],
            tip: Vec3::ZERO,
        });
    }
    engine.tick();
    assert_eq!(hp(&engine, e), 8);
}

#[test]
fn test_tree_breaking_weapon_reports_tip() {
    let mut engine = authority();
    let w = armed(
        &mut engine,
        1,
        WeaponConfig {
            can_break_trees: true,
            ..Default::default()
        },
    );
    let tip = Vec3::new(1.0, 2.0, 3.0);
    engine.queue_command(HostCommand::Swing {
        wielder: w,
        targets: vec![],
        tip,
    });
    let out = engine.tick();
    assert!(out.presentation.contains(&PresentationEvent::DestroyTree { position: tip }));
}

#[test]
fn test_swing_kill_counts_death() {
    let mut engine = authority();
    let w = armed(&mut engine, 1, WeaponConfig::default());
    let e = enemy(&mut engine, 2, 1);

    engine.queue_command(HostCommand::Swing {
        wielder: w,
        targets: vec![e, NetId(99)],
        tip: Vec3::ZERO,
    });
    engine.tick();
    assert_eq!(engine.stats().deaths, 1);
    assert!(engine.snapshot().occupants.iter().any(|o| o.id == e && o.dead));
}

// ---- Lightning ----

#[test]
fn test_lightning_strikes_on_enable() {
    let mut engine = authority();
    let hazard = engine
        .add_lightning(Transform::default(), LightningConfig::default())
        .unwrap();
    let out = engine.tick();
    assert_eq!(engine.stats().lightning_strikes, 1);
    assert!(matches!(out.presentation[..], [PresentationEvent::LightningStrike { volume, .. }] if volume > 0.0));

    engine.queue_commands([
        HostCommand::SetHazardEnabled { hazard, enabled: false },
        HostCommand::SetHazardEnabled { hazard, enabled: true },
        HostCommand::SetListenerIndoors { indoors: true },
    ]);
    let out = engine.tick();
    assert!(matches!(out.presentation[..], [PresentationEvent::LightningStrike { volume, .. }] if volume == 0.0));
    assert_eq!(engine.snapshot().hazards[0].id, HazardId(0));
}

#[test]
fn test_hazard_spawn_respects_denial_points() {
    let mut engine = authority();
    engine.set_spawn_denial_points(vec![SpawnDenialPoint {
        name: "ShipSpot".into(),
        position: Vec3::ZERO,
        local_scale: Vec3::ONE,
    }]);
    assert!(!engine.hazard_spawn_allowed(Vec3::new(5.0, 0.0, 0.0), 1.0));
    assert!(engine.hazard_spawn_allowed(Vec3::new(8.0, 0.0, 0.0), 1.0));
}

// ---- Setup errors ----

#[test]
fn test_setup_errors() {
    let mut engine = authority();
    let bad = damage(DamageConfig {
        interval_for_players: -1.0,
        ..Default::default()
    });
    assert!(matches!(engine.add_zone(bad), Err(TripwireError::InvalidConfig { .. })));

    player(&mut engine, 1, 100);
    let duplicate = engine.spawn_occupant(OccupantSpec {
        id: NetId(1),
        kind: OccupantKind::Enemy,
        transform: Transform::default(),
        hp: 1,
        weapon: None,
    });
    assert!(matches!(duplicate, Err(TripwireError::DuplicateOccupant(NetId(1)))));

    engine
        .add_zone(teleport_at(
            Vec3::ZERO,
            TeleportConfig {
                targets: vec![ZoneId(7)],
                ..Default::default()
            },
        ))
        .unwrap();
    assert!(matches!(
        engine.check_links(),
        Err(TripwireError::UnknownTeleportTarget { target: ZoneId(7), .. })
    ));
}

// ---- Session lifecycle ----

#[test]
fn test_end_session_releases_everything() {
    let mut engine = authority();
    let zone = engine
        .add_zone(damage(DamageConfig {
            shared_cooldown: true,
            ..one_damage()
        }))
        .unwrap();
    let p = player(&mut engine, 1, 100);
    engine.queue_command(enter(zone, p));
    engine.tick();
    assert_eq!(engine.shared_cooldown().last_fired(), Some(0));

    engine.end_session();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.active_tasks, 0);
    assert!(snapshot.zones[0].occupants.is_empty());
    assert_eq!(snapshot.shared_cooldown_last_fired, None);
    assert!(damage_ticks(&run(&mut engine, 30), p).is_empty());
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let build = || {
        let mut engine = authority();
        engine
            .add_zone(damage(DamageConfig {
                damage_clips: vec!["a".into(), "b".into(), "c".into()],
                damage_audio_sources: vec![AudioSourceSpec::default()],
                ..one_damage()
            }))
            .unwrap();
        engine
            .add_lightning(Transform::default(), LightningConfig::default())
            .unwrap();
        let p = player(&mut engine, 1, 1000);
        engine.queue_command(enter(ZoneId(0), p));
        engine
    };
    let mut engine_a = build();
    let mut engine_b = build();

    for _ in 0..600 {
        let out_a = engine_a.tick();
        let out_b = engine_b.tick();
        assert_eq!(out_a, out_b, "Tick output diverged with same seed");

        let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}
