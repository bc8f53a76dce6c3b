use monkeybet_engine::cards::{Card, Color};
use monkeybet_engine::engine::{Engine, TableSetup};
use monkeybet_engine::errors::GameError;
use monkeybet_engine::events::GameEvent;
use monkeybet_engine::player::PlayerType::{Bot, Human};
use monkeybet_engine::player::{GameMode, PlayerAction};
use monkeybet_engine::turn::Phase;

/// Picks the first legal action for whoever holds the turn.
fn first_legal(eng: &Engine) -> PlayerAction {
    let p = eng.current_player();
    match eng.phase() {
        Phase::InitialBet | Phase::Bet => {
            let target = eng
                .targets()
                .iter()
                .find(|t| t.accepts_bet())
                .map(|t| t.color)
                .unwrap_or(Color::Orange);
            PlayerAction::Bet { target }
        }
        Phase::Card => {
            if eng.hand(p).is_some_and(|h| !h.is_empty()) {
                PlayerAction::Play { card_index: 0 }
            } else {
                PlayerAction::Pass
            }
        }
    }
}

#[test]
fn hands_are_dealt_exactly_once() {
    let mut eng = Engine::new(Some(77));
    eng.start_game(GameMode::Three);

    let mut dealt = 0;
    for _ in 0..3 {
        let events = eng.submit_bet(Color::Blue).expect("opening bet");
        dealt += events
            .iter()
            .filter(|e| matches!(e, GameEvent::HandsDealt { .. }))
            .count();
    }
    assert_eq!(dealt, 1);
    assert_eq!(eng.turn().initial_bets_placed, 3);
    assert_eq!(eng.deck_remaining(), 33);

    let events = eng.submit_bet(Color::Red).expect("bet phase bet");
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::HandsDealt { .. })));
    assert_eq!(eng.deck_remaining(), 33);
    assert_eq!(eng.phase(), Phase::Card);
}

#[test]
fn initial_bets_rotate_the_turn() {
    let mut eng = Engine::new(Some(11));
    eng.start_game(GameMode::Three);
    let first = eng.current_player();
    eng.submit_bet(Color::Red).expect("bet");
    assert_eq!(eng.current_player(), (first + 1) % 3);
    assert_eq!(eng.phase(), Phase::InitialBet);
    assert!(eng.players().iter().all(|p| p.hand().is_empty()));
}

#[test]
fn illegal_actions_leave_state_untouched() {
    let mut eng = Engine::new(Some(8));
    eng.start_game(GameMode::Three);
    let before = eng.snapshot();

    assert!(matches!(
        eng.submit_card(0),
        Err(GameError::WrongPhase {
            phase: Phase::InitialBet
        })
    ));
    assert_eq!(eng.submit_pass(), Err(GameError::WrongPhase { phase: Phase::InitialBet }));
    assert_eq!(eng.snapshot(), before);
}

#[test]
fn betting_on_a_full_target_is_refused() {
    let mut setup = TableSetup::new([Human, Human, Human]);
    setup.phase = Phase::Bet;
    setup.targets[4].bets = vec![0, 1, 2, 0];
    setup.hands[0] = vec![Card::numbered(Color::Red, 1)];
    let mut eng = Engine::from_setup(setup, Some(1));
    let before = eng.snapshot();

    assert_eq!(
        eng.submit_bet(Color::Red),
        Err(GameError::TargetFull(Color::Red))
    );
    assert_eq!(eng.snapshot(), before);
}

#[test]
fn empty_handed_player_passes_in_card_phase() {
    let mut setup = TableSetup::new([Human, Human, Human]);
    setup.hands[1] = vec![Card::numbered(Color::Red, 1)];
    setup.deck = vec![Card::numbered(Color::Blue, 2)];
    let mut eng = Engine::from_setup(setup, Some(1));

    let events = eng.submit_pass().expect("pass");
    assert_eq!(events[0], GameEvent::Passed { player: 0 });
    assert_eq!(eng.current_player(), 1);
    assert_eq!(eng.phase(), Phase::Bet);
}

#[test]
fn bot_turns_run_through_tokens() {
    let mut eng = Engine::new(Some(5));
    eng.start_session([Bot, Bot, Bot]);
    let token = eng.pending_bot_turn().expect("bot to move");
    assert_eq!(token.player, eng.current_player());
    assert_eq!(token.phase, Phase::InitialBet);

    eng.run_bot_turn(token, PlayerAction::Bet { target: Color::Purple })
        .expect("bot bet");
    let next = eng.pending_bot_turn().expect("next bot");
    assert_ne!(next, token);
}

#[test]
fn reset_to_menu_clears_the_session() {
    let mut eng = Engine::new(Some(5));
    eng.start_game(GameMode::Single);
    let token = eng.pending_bot_turn();
    eng.reset_to_menu();

    assert!(!eng.is_started());
    assert!(eng.players().is_empty());
    assert!(eng.pending_bot_turn().is_none());
    if let Some(token) = token {
        assert_eq!(
            eng.run_bot_turn(token, PlayerAction::Pass),
            Err(GameError::StaleBotTurn)
        );
    }
}

#[test]
fn seeded_games_always_finish() {
    for seed in 0..40u64 {
        let mut eng = Engine::new(Some(seed));
        eng.start_session([Bot, Bot, Bot]);
        let mut steps = 0;
        while !eng.is_game_over() {
            let token = eng.pending_bot_turn().expect("bot to move");
            let action = first_legal(&eng);
            eng.run_bot_turn(token, action).expect("legal action");
            steps += 1;
            assert!(steps < 1_000, "seed {seed} did not terminate");
        }
        let result = eng.winner().expect("result");
        assert_eq!(result.scores().len(), 3);
        let p = eng.current_player();
        assert_eq!(eng.handle_pass(p), Err(GameError::GameOver));
    }
}
