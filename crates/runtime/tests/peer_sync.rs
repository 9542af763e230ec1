//! Two clients sharing one battle through a move-exchange channel.

use std::sync::Arc;
use std::time::Duration;

use battle_core::{
    BattleConfig, BattleMode, BattleResult, BattleSetup, Controller, CpuArchetype, Magnitude,
    MoveDefinition, MoveSelection, MoveType, Participant, ParticipantId, Phase, Role,
};
use battle_runtime::{
    FileMoveExchange, InMemoryMoveExchange, MoveCatalog, MoveExchange, MovePayload,
    OracleManager, ProviderKind, RoundId, Runtime, RuntimeConfig, RuntimeError,
    ScriptedMoveProvider,
};

const HERO: ParticipantId = ParticipantId(0);
const RIVAL: ParticipantId = ParticipantId(1);

fn oracles() -> OracleManager {
    let moves = vec![
        MoveDefinition::new("strike", "Strike", MoveType::Attack).with_damage(Magnitude::Fixed(20)),
    ];
    OracleManager::new(Arc::new(MoveCatalog::new(moves)), BattleConfig::default())
}

fn fast_polling() -> RuntimeConfig {
    RuntimeConfig {
        poll_interval: Duration::from_millis(5),
        ..RuntimeConfig::default()
    }
}

/// The same duel seen from `local`'s side.
fn setup(local: ParticipantId) -> BattleSetup {
    let side = |id: ParticipantId, name: &str, health: u32| {
        let (role, controller) = if id == local {
            (Role::Player, Controller::Local)
        } else {
            (Role::Opponent, Controller::Peer)
        };
        Participant::new(id, name, role, controller)
            .with_health(health, health)
            .with_moves(["strike"])
    };
    BattleSetup::new(42, local, vec![side(HERO, "Hero", 60), side(RIVAL, "Rival", 30)])
}

fn strikes(actor: ParticipantId, target: ParticipantId) -> ScriptedMoveProvider {
    ScriptedMoveProvider::new(
        ProviderKind::Local,
        (0..5).map(|_| MoveSelection::new(actor, "strike", target)),
    )
}

async fn client(local: ParticipantId, exchange: Arc<dyn MoveExchange>) -> Runtime {
    let target = if local == HERO { RIVAL } else { HERO };
    Runtime::builder()
        .config(fast_polling())
        .setup(setup(local))
        .oracles(oracles())
        .local_provider(strikes(local, target))
        .exchange(exchange, RoundId::new("duel-42"))
        .build()
        .await
        .expect("client should build")
}

#[tokio::test]
async fn peer_duel_converges_on_both_clients() {
    let exchange = InMemoryMoveExchange::new();
    exchange.fail_next_polls(3);
    let shared: Arc<dyn MoveExchange> = Arc::new(exchange.clone());

    let mut hero = client(HERO, shared.clone()).await;
    let mut rival = client(RIVAL, shared).await;
    assert_eq!(rival.handle().query_state().await.unwrap().phase, Phase::OpponentTurn);

    let (hero_outcome, rival_outcome) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(hero.run(), rival.run())
    })
    .await
    .expect("duel should finish");

    assert_eq!(hero_outcome.unwrap().result, BattleResult::Victory);
    assert_eq!(rival_outcome.unwrap().result, BattleResult::Defeat);

    let ours = hero.handle().query_state().await.unwrap();
    let theirs = rival.handle().query_state().await.unwrap();
    for id in [HERO, RIVAL] {
        assert_eq!(
            ours.participant(id).unwrap().health,
            theirs.participant(id).unwrap().health
        );
    }
    // Identical action narration; only the settlement line differs.
    let (ours_log, theirs_log) = (ours.log.entries(), theirs.log.entries());
    assert_eq!(ours_log.len(), theirs_log.len());
    assert_eq!(ours_log[..ours_log.len() - 1], theirs_log[..theirs_log.len() - 1]);

    // Each published move is consumed by the other side only.
    let records = exchange.records();
    assert!(!records.is_empty());
    for record in records {
        let observer = if record.actor == HERO { RIVAL } else { HERO };
        assert!(record.is_processed_by(observer), "{} left unprocessed", record.id);
    }
}

#[tokio::test]
async fn escape_releases_a_client_waiting_on_its_peer() {
    let exchange: Arc<dyn MoveExchange> = Arc::new(InMemoryMoveExchange::new());
    let mut rival = client(RIVAL, exchange).await;
    let handle = rival.handle();

    let (outcome, _) = tokio::join!(rival.run(), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.escape().await
    });

    let outcome = outcome.unwrap();
    assert_eq!(outcome.result, BattleResult::Escape);
    assert_eq!(handle.query_state().await.unwrap().phase, Phase::Escaped);
}

#[tokio::test]
async fn peer_duel_over_the_file_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let exchange: Arc<dyn MoveExchange> =
        Arc::new(FileMoveExchange::open(dir.path()).await.unwrap());

    let mut hero = client(HERO, exchange.clone()).await;
    let mut rival = client(RIVAL, exchange).await;

    let (hero_outcome, rival_outcome) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(hero.run(), rival.run())
    })
    .await
    .expect("duel should finish");

    assert_eq!(hero_outcome.unwrap().result, BattleResult::Victory);
    assert_eq!(rival_outcome.unwrap().result, BattleResult::Defeat);
}

#[tokio::test]
async fn peer_participants_need_an_exchange() {
    let result = Runtime::builder()
        .setup(setup(HERO))
        .oracles(oracles())
        .build()
        .await;

    assert!(matches!(
        result,
        Err(RuntimeError::MissingExchange { participant: RIVAL })
    ));
}

const ANN: ParticipantId = ParticipantId(0);
const BOB: ParticipantId = ParticipantId(1);
const OGRE: ParticipantId = ParticipantId(2);

/// Two humans against a CPU, seen from `local`'s side.
fn skirmish_setup(local: ParticipantId) -> BattleSetup {
    let human = |id: ParticipantId, name: &str, speed: u32| {
        let (role, controller) = if id == local {
            (Role::Player, Controller::Local)
        } else {
            (Role::Ally, Controller::Peer)
        };
        Participant::new(id, name, role, controller)
            .with_health(50, 50)
            .with_speed(speed)
            .with_moves(["strike"])
    };
    let ogre = Participant::new(
        OGRE,
        "Ogre",
        Role::Opponent,
        Controller::Cpu(CpuArchetype::Aggressor),
    )
    .with_health(90, 90)
    .with_speed(30)
    .with_moves(["strike"]);
    BattleSetup::new(17, local, vec![human(ANN, "Ann", 40), human(BOB, "Bob", 20), ogre])
}

async fn skirmish_client(local: ParticipantId, exchange: Arc<dyn MoveExchange>) -> Runtime {
    Runtime::builder()
        .config(fast_polling())
        .setup(skirmish_setup(local))
        .oracles(oracles())
        .local_provider(ScriptedMoveProvider::new(
            ProviderKind::Local,
            (0..10).map(|_| MoveSelection::new(local, "strike", OGRE)),
        ))
        .exchange(exchange, RoundId::new("skirmish-17"))
        .build()
        .await
        .expect("client should build")
}

#[tokio::test]
async fn peer_skirmish_converges_on_both_clients() {
    let exchange = InMemoryMoveExchange::new();
    exchange.fail_next_polls(2);
    let shared: Arc<dyn MoveExchange> = Arc::new(exchange.clone());

    let mut ann = skirmish_client(ANN, shared.clone()).await;
    let mut bob = skirmish_client(BOB, shared).await;
    assert_eq!(ann.handle().query_state().await.unwrap().mode, BattleMode::Skirmish);

    let (ann_outcome, bob_outcome) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(ann.run(), bob.run())
    })
    .await
    .expect("skirmish should finish");

    let (ann_outcome, bob_outcome) = (ann_outcome.unwrap(), bob_outcome.unwrap());
    assert_eq!(ann_outcome.result, BattleResult::Victory);
    assert_eq!(bob_outcome.result, ann_outcome.result);
    assert_eq!(bob_outcome.rewards.turns, ann_outcome.rewards.turns);

    let ours = ann.handle().query_state().await.unwrap();
    let theirs = bob.handle().query_state().await.unwrap();
    assert_eq!(ours.turn, theirs.turn);
    for id in [ANN, BOB, OGRE] {
        let (a, b) = (ours.participant(id).unwrap(), theirs.participant(id).unwrap());
        assert_eq!(a.health, b.health, "health of {id} diverged");
        assert_eq!(a.shield, b.shield, "shield of {id} diverged");
    }
    assert_eq!(ours.log.entries(), theirs.log.entries());

    // Only selections travel in a skirmish; each is consumed by the other human.
    for record in exchange.records() {
        assert!(matches!(record.payload, MovePayload::Selection { .. }));
        let observer = if record.actor == ANN { BOB } else { ANN };
        assert!(record.is_processed_by(observer), "{} left unprocessed", record.id);
    }
}
