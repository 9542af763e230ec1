//! End-to-end flows through the battle engine.

use battle_core::{
    BattleConfig, BattleEngine, BattleEnv, BattleEvent, BattleMode, BattleResult, BattleSetup,
    BattleState, Controller, CpuArchetype, Magnitude, MoveDefinition, MoveSelection, MoveType,
    Participant, ParticipantId, Phase, Role, ScriptedDefeat, SequenceRng, StaticMoveOracle,
    StatusEffectKind, StatusEffectTemplate,
};

const HERO: ParticipantId = ParticipantId::PLAYER;
const ALLY: ParticipantId = ParticipantId(1);
const OGRE: ParticipantId = ParticipantId(2);

fn catalog() -> StaticMoveOracle {
    StaticMoveOracle::new()
        .with(
            MoveDefinition::new("strike", "Strike", MoveType::Attack)
                .with_damage(Magnitude::Fixed(20)),
        )
        .with(MoveDefinition::new("tap", "Tap", MoveType::Attack).with_damage(Magnitude::Fixed(1)))
        .with(
            MoveDefinition::new("quick_tap", "Quick Tap", MoveType::Attack)
                .with_damage(Magnitude::Fixed(1))
                .with_priority(1),
        )
        .with(
            MoveDefinition::new("scorch", "Scorch", MoveType::Utility).with_effect(
                StatusEffectTemplate::new(StatusEffectKind::Burn, 3)
                    .with_damage(5)
                    .with_chance(100),
            ),
        )
        .with(MoveDefinition::new("wait", "Wait", MoveType::Support))
}

fn hero() -> Participant {
    Participant::new(HERO, "Hero", Role::Player, Controller::Local)
        .with_health(80, 80)
        .with_speed(50)
}

fn ogre(health: u32, shield: u32) -> Participant {
    Participant::new(OGRE, "Ogre", Role::Opponent, Controller::Cpu(CpuArchetype::Boss))
        .with_health(health, health)
        .with_shield(shield, 20)
        .with_speed(10)
}

fn select(engine: &mut BattleEngine<'_>, env: &BattleEnv<'_>, selection: MoveSelection) {
    engine
        .execute(env, &BattleEvent::Select(selection), &mut SequenceRng::zeros())
        .unwrap();
}

#[test]
fn base_twenty_strike_finishes_a_fifteen_health_target() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);
    let mut state = BattleState::new(BattleSetup::new(1, HERO, vec![hero(), ogre(15, 0)])).unwrap();
    let mut engine = BattleEngine::new(&mut state);

    select(&mut engine, &env, MoveSelection::new(HERO, "strike", OGRE));
    engine
        .execute(&env, &BattleEvent::Execute, &mut battle_core::PcgRng::new(77))
        .unwrap();

    assert_eq!(state.participant(OGRE).unwrap().health.current, 0);
    assert_eq!(state.phase, Phase::Victory);
}

#[test]
fn burn_ticks_at_the_start_of_each_owner_turn() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);
    let mut state = BattleState::new(BattleSetup::new(1, HERO, vec![hero(), ogre(50, 3)])).unwrap();
    let mut rng = SequenceRng::zeros();

    let mut engine = BattleEngine::new(&mut state);
    select(&mut engine, &env, MoveSelection::new(HERO, "scorch", OGRE));
    engine.execute(&env, &BattleEvent::Execute, &mut rng).unwrap();

    let mut observed = Vec::new();
    for round in 0..3 {
        let step = engine
            .execute(
                &env,
                &BattleEvent::OpponentAct(MoveSelection::new(OGRE, "wait", OGRE)),
                &mut rng,
            )
            .unwrap();
        assert!(!step.resolved[0].skipped);
        let ogre = engine.state().participant(OGRE).unwrap();
        observed.push((
            ogre.shield.current,
            ogre.health.current,
            ogre.status.iter().next().map(|e| e.remaining),
        ));
        if round < 2 {
            select(&mut engine, &env, MoveSelection::new(HERO, "wait", HERO));
            engine.execute(&env, &BattleEvent::Execute, &mut rng).unwrap();
        }
    }

    assert_eq!(
        observed,
        vec![(0, 48, Some(2)), (0, 43, Some(1)), (0, 38, None)]
    );
    assert!(
        state
            .log
            .entries()
            .iter()
            .any(|line| line == "Ogre's burn wore off.")
    );
}

fn skirmish() -> BattleState {
    let ally = Participant::new(ALLY, "Squire", Role::Ally, Controller::Peer)
        .with_health(40, 40)
        .with_speed(30);
    BattleState::new(BattleSetup::new(5, HERO, vec![hero(), ally, ogre(30, 0)])).unwrap()
}

#[test]
fn skirmish_orders_by_speed_and_priority() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);
    let mut state = skirmish();
    assert_eq!(state.mode, BattleMode::Skirmish);
    let mut engine = BattleEngine::new(&mut state);

    select(&mut engine, &env, MoveSelection::new(HERO, "tap", OGRE));
    assert_eq!(engine.state().phase, Phase::Selection);
    select(&mut engine, &env, MoveSelection::new(OGRE, "quick_tap", HERO));
    select(&mut engine, &env, MoveSelection::new(ALLY, "tap", OGRE));

    let order: Vec<_> = engine
        .state()
        .round
        .order
        .iter()
        .map(|turn| turn.participant)
        .collect();
    assert_eq!(order, vec![OGRE, HERO, ALLY]);
    assert_eq!(engine.state().phase, Phase::Execution);

    for _ in 0..3 {
        engine
            .execute(&env, &BattleEvent::Execute, &mut SequenceRng::zeros())
            .unwrap();
    }
    assert_eq!(state.phase, Phase::Selection);
    assert_eq!(state.turn, 2);
    assert!(state.round.selections.is_empty());
    assert_eq!(state.participant(OGRE).unwrap().health.current, 28);
    assert_eq!(state.participant(HERO).unwrap().health.current, 79);
}

#[test]
fn skirmish_rejects_a_second_selection() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);
    let mut state = skirmish();
    let mut engine = BattleEngine::new(&mut state);

    select(&mut engine, &env, MoveSelection::new(HERO, "tap", OGRE));
    let err = engine
        .execute(
            &env,
            &BattleEvent::Select(MoveSelection::new(HERO, "strike", OGRE)),
            &mut SequenceRng::zeros(),
        )
        .unwrap_err();
    assert_eq!(err, battle_core::EngineError::DuplicateSelection { id: HERO });
}

#[test]
fn later_actors_see_earlier_outcomes() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);
    let mut state = skirmish();
    state.participant_mut(OGRE).unwrap().health.set(10);
    let mut engine = BattleEngine::new(&mut state);

    select(&mut engine, &env, MoveSelection::new(HERO, "strike", OGRE));
    select(&mut engine, &env, MoveSelection::new(ALLY, "tap", OGRE));
    select(&mut engine, &env, MoveSelection::new(OGRE, "tap", HERO));

    let step = engine
        .execute(&env, &BattleEvent::Execute, &mut SequenceRng::zeros())
        .unwrap();
    assert_eq!(step.resolved[0].actor, HERO);
    let outcome = step.outcome.unwrap();
    assert_eq!(outcome.result, BattleResult::Victory);
    assert_eq!(state.phase, Phase::Victory);
    assert_eq!(state.participant(HERO).unwrap().health.current, 80);
}

#[test]
fn scripted_defeat_hands_off_to_a_cutscene() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);
    let setup = BattleSetup::new(5, HERO, vec![hero(), ogre(100, 0)]).with_scripted_defeat(
        ScriptedDefeat {
            target: OGRE,
            threshold_percent: 90,
        },
    );
    let mut state = BattleState::new(setup).unwrap();
    let mut engine = BattleEngine::new(&mut state);

    select(&mut engine, &env, MoveSelection::new(HERO, "strike", OGRE));
    let step = engine
        .execute(&env, &BattleEvent::Execute, &mut SequenceRng::zeros())
        .unwrap();
    assert_eq!(step.cutscene, Some(OGRE));
    assert_eq!(engine.state().phase, Phase::Cutscene);

    let err = engine
        .execute(&env, &BattleEvent::Execute, &mut SequenceRng::zeros())
        .unwrap_err();
    assert!(matches!(err, battle_core::EngineError::UnexpectedEvent { .. }));

    let step = engine
        .execute(
            &env,
            &BattleEvent::ResolveCutscene { victory: true },
            &mut SequenceRng::zeros(),
        )
        .unwrap();
    let outcome = step.outcome.unwrap();
    assert_eq!(outcome.result, BattleResult::Victory);
    assert_eq!(outcome.rewards.resource, 84);
}

#[test]
fn peer_resolution_replays_on_the_other_client() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);

    let rival = || {
        Participant::new(OGRE, "Rival", Role::Opponent, Controller::Peer)
            .with_health(60, 60)
            .with_shield(5, 20)
    };
    let mirrored_hero = Participant::new(HERO, "Hero", Role::Opponent, Controller::Peer)
        .with_health(80, 80)
        .with_speed(50);
    let mirrored_rival = Participant::new(OGRE, "Rival", Role::Player, Controller::Local)
        .with_health(60, 60)
        .with_shield(5, 20);

    let mut ours = BattleState::new(BattleSetup::new(3, HERO, vec![hero(), rival()])).unwrap();
    let mut theirs =
        BattleState::new(BattleSetup::new(3, OGRE, vec![mirrored_hero, mirrored_rival])).unwrap();
    assert_eq!(ours.phase, Phase::Selection);
    assert_eq!(theirs.phase, Phase::OpponentTurn);

    // Our move, resolved locally and replayed on the peer.
    let mut engine = BattleEngine::new(&mut ours);
    select(&mut engine, &env, MoveSelection::new(HERO, "strike", OGRE));
    let step = engine
        .execute(&env, &BattleEvent::Execute, &mut SequenceRng::zeros())
        .unwrap();
    let resolved = step.resolved[0].clone();

    let mut peer = BattleEngine::new(&mut theirs);
    peer.execute(&env, &BattleEvent::ApplyRemote(resolved), &mut SequenceRng::zeros())
        .unwrap();

    // Their reply, resolved on their client and replayed on ours.
    select(&mut peer, &env, MoveSelection::new(OGRE, "scorch", HERO));
    let peer_step = peer
        .execute(&env, &BattleEvent::Execute, &mut SequenceRng::zeros())
        .unwrap();
    let peer_resolved = peer_step.resolved[0].clone();

    engine
        .execute(&env, &BattleEvent::ApplyRemote(peer_resolved), &mut SequenceRng::zeros())
        .unwrap();

    let ours_rival = ours.participant(OGRE).unwrap();
    let theirs_rival = theirs.participant(OGRE).unwrap();
    assert_eq!(ours_rival.health, theirs_rival.health);
    assert_eq!(ours_rival.shield.current, 0);
    assert_eq!(theirs_rival.shield.current, 0);
    assert_eq!(
        ours.participant(HERO).unwrap().status,
        theirs.participant(HERO).unwrap().status
    );
    assert!(ours.participant(HERO).unwrap().status.has(StatusEffectKind::Burn));
    assert_eq!(ours.phase, Phase::Selection);
    assert_eq!(theirs.phase, Phase::OpponentTurn);
    assert!(ours.log.entries().iter().any(|line| line == "Rival uses Scorch on Hero!"));
}

#[test]
fn peer_duel_clients_agree_on_turn_numbers() {
    let oracle = catalog();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&oracle, &config);

    let rival = |role: Role, controller: Controller| {
        Participant::new(OGRE, "Rival", role, controller).with_health(30, 30)
    };
    let hero_as = |role: Role, controller: Controller| {
        Participant::new(HERO, "Hero", role, controller).with_health(80, 80)
    };
    let mut ours = BattleState::new(BattleSetup::new(
        9,
        HERO,
        vec![
            hero_as(Role::Player, Controller::Local),
            rival(Role::Opponent, Controller::Peer),
        ],
    ))
    .unwrap();
    let mut theirs = BattleState::new(BattleSetup::new(
        9,
        OGRE,
        vec![
            hero_as(Role::Opponent, Controller::Peer),
            rival(Role::Player, Controller::Local),
        ],
    ))
    .unwrap();
    assert!(!ours.peer_leads());
    assert!(theirs.peer_leads());

    let mut rng = SequenceRng::zeros();
    for round in 1..=5 {
        let mut engine = BattleEngine::new(&mut ours);
        select(&mut engine, &env, MoveSelection::new(HERO, "strike", OGRE));
        let lead = engine.execute(&env, &BattleEvent::Execute, &mut rng).unwrap();
        assert_eq!(lead.resolved[0].turn, round);

        BattleEngine::new(&mut theirs)
            .execute(&env, &BattleEvent::ApplyRemote(lead.resolved[0].clone()), &mut rng)
            .unwrap();
        if ours.outcome.is_some() {
            break;
        }
        assert_eq!(theirs.turn, round);

        let mut engine = BattleEngine::new(&mut theirs);
        select(&mut engine, &env, MoveSelection::new(OGRE, "tap", HERO));
        let reply = engine.execute(&env, &BattleEvent::Execute, &mut rng).unwrap();
        assert_eq!(reply.resolved[0].turn, round);

        BattleEngine::new(&mut ours)
            .execute(&env, &BattleEvent::ApplyRemote(reply.resolved[0].clone()), &mut rng)
            .unwrap();
        assert_eq!(ours.turn, theirs.turn);
    }

    let won = ours.outcome.unwrap();
    let lost = theirs.outcome.unwrap();
    assert_eq!(won.result, BattleResult::Victory);
    assert_eq!(lost.result, BattleResult::Defeat);
    assert_eq!(won.rewards.turns, lost.rewards.turns);
}
