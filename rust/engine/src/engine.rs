use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::cards::{Card, Color};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::events::{eliminated_banner, GameEvent};
use crate::player::{
    GameMode, Player, PlayerAction, PlayerId, PlayerType, CARDS_PER_PLAYER, PLAYER_COUNT,
    PLAYER_LABELS,
};
use crate::round::{
    evaluate_round, process_elimination, reset_numbers, surviving_stakes, terminal_state,
    RoundOutcome, Terminal,
};
use crate::rules::{place_bet, play_card, validate_action, ValidatedAction};
use crate::snapshot::GameSnapshot;
use crate::target::{all_targets, Target};
use crate::turn::{next_player, phase_after_play, Phase, TurnState};

/// Pause before a scheduled bot move. Pacing only; nothing depends on it.
pub const BOT_THINK_DELAY: Duration = Duration::from_millis(1000);

const DEFAULT_SEED: u64 = 0xB4_4A_4A_5A;

/// Final standing of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameResult {
    Winner {
        player: PlayerId,
        score: i32,
        scores: Vec<i32>,
    },
    /// Several players share the highest total
    Tie {
        players: Vec<PlayerId>,
        score: i32,
        scores: Vec<i32>,
    },
    /// Card supply ran dry before enough monkeys were eliminated
    Stalemate { scores: Vec<i32> },
}

impl GameResult {
    /// Ranks per-player totals of bets on surviving targets.
    pub fn from_totals(scores: Vec<i32>) -> Self {
        let best = scores.iter().copied().max().unwrap_or(0);
        let leaders: Vec<PlayerId> = scores
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == best)
            .map(|(p, _)| p)
            .collect();
        match leaders.as_slice() {
            [player] => GameResult::Winner {
                player: *player,
                score: best,
                scores,
            },
            _ => GameResult::Tie {
                players: leaders,
                score: best,
                scores,
            },
        }
    }

    pub fn is_tie(&self) -> bool {
        !matches!(self, GameResult::Winner { .. })
    }

    pub fn winners(&self) -> Vec<PlayerId> {
        match self {
            GameResult::Winner { player, .. } => vec![*player],
            GameResult::Tie { players, .. } => players.clone(),
            GameResult::Stalemate { .. } => Vec::new(),
        }
    }

    pub fn scores(&self) -> &[i32] {
        match self {
            GameResult::Winner { scores, .. }
            | GameResult::Tie { scores, .. }
            | GameResult::Stalemate { scores } => scores,
        }
    }

    pub fn announcement(&self) -> String {
        match self {
            GameResult::Winner { player, score, .. } => {
                format!("{} wins with {} points!", label(*player), score)
            }
            GameResult::Tie { players, score, .. } => {
                let names: Vec<&str> = players.iter().map(|&p| label(p)).collect();
                format!("Tie between {} with {} points!", names.join(" and "), score)
            }
            GameResult::Stalemate { .. } => "Stale Bananas! Game ends in a tie!".to_string(),
        }
    }
}

fn label(player: PlayerId) -> &'static str {
    PLAYER_LABELS.get(player).copied().unwrap_or("Player")
}

/// Token for a scheduled bot move. Only valid while nothing has changed
/// since it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotTurn {
    pub generation: u64,
    pub turn_seq: u64,
    pub player: PlayerId,
    pub phase: Phase,
}

/// A scripted mid-game table, used to resume or stage specific positions.
#[derive(Debug, Clone)]
pub struct TableSetup {
    pub player_types: [PlayerType; PLAYER_COUNT],
    pub hands: [Vec<Card>; PLAYER_COUNT],
    pub deck: Vec<Card>,
    pub targets: Vec<Target>,
    pub scores: [i32; PLAYER_COUNT],
    pub current_player: PlayerId,
    pub phase: Phase,
    pub round: u32,
}

impl TableSetup {
    /// Empty hands and pool, six fresh targets, card phase for player 0.
    pub fn new(player_types: [PlayerType; PLAYER_COUNT]) -> Self {
        Self {
            player_types,
            hands: Default::default(),
            deck: Vec::new(),
            targets: all_targets(),
            scores: [0; PLAYER_COUNT],
            current_player: 0,
            phase: Phase::Card,
            round: 1,
        }
    }
}

/// Game session controller: owns the pool, the roster, the targets and the
/// scores of one game, and applies every action as a single atomic step.
///
/// # Examples
///
/// ```
/// use monkeybet_engine::cards::Color;
/// use monkeybet_engine::engine::Engine;
/// use monkeybet_engine::player::GameMode;
/// use monkeybet_engine::turn::Phase;
///
/// let mut engine = Engine::new(Some(7));
/// engine.start_game(GameMode::Three);
///
/// // everyone places one opening bet, then hands are dealt
/// for _ in 0..3 {
///     engine.submit_bet(Color::Orange).expect("opening bet");
/// }
/// assert_eq!(engine.phase(), Phase::Bet);
/// assert!(engine.players().iter().all(|p| p.hand().len() == 5));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    seed: u64,
    rng: ChaCha20Rng,
    deck: Deck,
    players: Vec<Player>,
    targets: Vec<Target>,
    scores: Vec<i32>,
    round: u32,
    turn: TurnState,
    started: bool,
    result: Option<GameResult>,
    /// Bumped whenever a session starts or ends; invalidates bot tokens
    generation: u64,
    message: Option<String>,
}

impl Engine {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(DEFAULT_SEED);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let deck = Deck::new_with_seed(rng.random());
        Self {
            seed,
            rng,
            deck,
            players: Vec::new(),
            targets: all_targets(),
            scores: Vec::new(),
            round: 1,
            turn: TurnState::new(0),
            started: false,
            result: None,
            generation: 0,
            message: None,
        }
    }

    /// Builds a running game from a scripted table. Terminal conditions are
    /// evaluated on the first committed action, not here.
    pub fn from_setup(setup: TableSetup, seed: Option<u64>) -> Self {
        let mut engine = Self::new(seed);
        engine.players = setup
            .player_types
            .iter()
            .zip(setup.hands)
            .enumerate()
            .map(|(id, (&kind, hand))| {
                let mut p = Player::new(id, kind);
                p.set_hand(hand);
                p
            })
            .collect();
        engine.deck = Deck::from_cards(setup.deck);
        engine.targets = setup.targets;
        engine.scores = setup.scores.to_vec();
        engine.round = setup.round.max(1);
        engine.turn = TurnState::new(setup.current_player % PLAYER_COUNT);
        engine.turn.phase = setup.phase;
        if setup.phase != Phase::InitialBet {
            engine.turn.initial_bets_placed = PLAYER_COUNT;
        }
        engine.started = true;
        engine.generation = 1;
        engine
    }

    /// Starts a fresh game for the given roster: new targets, zero scores,
    /// a reshuffled 48-card pool and a random starting player.
    pub fn start_session(&mut self, player_types: [PlayerType; PLAYER_COUNT]) -> Vec<GameEvent> {
        self.generation += 1;
        self.players = player_types
            .iter()
            .enumerate()
            .map(|(id, &kind)| Player::new(id, kind))
            .collect();
        self.targets = all_targets();
        self.scores = vec![0; PLAYER_COUNT];
        self.round = 1;
        self.deck.shuffle();
        let first = self.rng.random_range(0..PLAYER_COUNT);
        self.turn = TurnState::new(first);
        self.started = true;
        self.result = None;
        self.message = None;
        debug!(generation = self.generation, first_player = first, "session started");
        vec![
            GameEvent::SessionStarted {
                first_player: first,
            },
            GameEvent::PhaseChanged {
                player: first,
                phase: Phase::InitialBet,
            },
        ]
    }

    pub fn start_game(&mut self, mode: GameMode) -> Vec<GameEvent> {
        self.start_session(mode.player_types())
    }

    /// Abandons the current game. Pending bot tokens become stale.
    pub fn reset_to_menu(&mut self) {
        self.generation += 1;
        self.players.clear();
        self.targets = all_targets();
        self.scores.clear();
        self.round = 1;
        self.turn = TurnState::new(0);
        self.started = false;
        self.result = None;
        self.message = None;
        debug!(generation = self.generation, "returned to menu");
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
    pub fn target(&self, color: Color) -> Option<&Target> {
        self.targets.iter().find(|t| t.color == color)
    }
    pub fn scores(&self) -> &[i32] {
        &self.scores
    }
    pub fn round(&self) -> u32 {
        self.round
    }
    pub fn phase(&self) -> Phase {
        self.turn.phase
    }
    pub fn current_player(&self) -> PlayerId {
        self.turn.current_player
    }
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }
    pub fn generation(&self) -> u64 {
        self.generation
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
    pub fn hand(&self, player: PlayerId) -> Option<&[Card]> {
        self.players.get(player).map(Player::hand)
    }
    /// Latest banner (tie, elimination, game over).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Final result once the game is over.
    pub fn winner(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// Per-player bets on surviving targets; equals `scores` at all times.
    pub fn standings(&self) -> Vec<i32> {
        surviving_stakes(&self.targets, self.players.len())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Human input surface: a bet by whoever holds the turn.
    pub fn submit_bet(&mut self, target: Color) -> Result<Vec<GameEvent>, GameError> {
        self.submit_action(self.turn.current_player, PlayerAction::Bet { target })
    }

    /// Human input surface: plays the turn holder's card at `card_index`.
    pub fn submit_card(&mut self, card_index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.submit_action(self.turn.current_player, PlayerAction::Play { card_index })
    }

    pub fn submit_pass(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.submit_action(self.turn.current_player, PlayerAction::Pass)
    }

    /// Applies an action on behalf of a human seat; bot seats only move
    /// through [`Engine::run_bot_turn`].
    pub fn submit_action(
        &mut self,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.players.get(player).is_some_and(Player::is_bot) {
            return Err(GameError::BotSeat(player));
        }
        self.apply_action(player, action)
    }

    pub fn handle_bet(
        &mut self,
        player: PlayerId,
        target: Color,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.apply_action(player, PlayerAction::Bet { target })
    }

    pub fn handle_play(
        &mut self,
        player: PlayerId,
        card_index: usize,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.apply_action(player, PlayerAction::Play { card_index })
    }

    pub fn handle_pass(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.apply_action(player, PlayerAction::Pass)
    }

    /// Validates and commits one action, including the phase change and any
    /// elimination or game end it causes. On error nothing changes.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.guard(player)?;
        let validated = validate_action(
            self.turn.phase,
            &self.targets,
            self.players[player].hand(),
            action,
        )?;

        let mut events = Vec::new();
        match validated {
            ValidatedAction::Bet(color) => self.commit_bet(player, color, &mut events)?,
            ValidatedAction::Play { index, .. } => {
                let outcome = play_card(
                    &mut self.targets,
                    &mut self.deck,
                    self.players[player].hand_mut(),
                    index,
                )?;
                debug!(player, card = ?outcome.card, target = ?outcome.target, "card played");
                events.push(GameEvent::CardPlayed {
                    player,
                    card: outcome.card,
                    target: outcome.target,
                    replacement: outcome.replacement,
                });
                self.end_turn(&mut events);
            }
            ValidatedAction::Pass => {
                debug!(player, "passed");
                events.push(GameEvent::Passed { player });
                self.end_turn(&mut events);
            }
        }
        self.turn.turn_seq += 1;
        self.settle(&mut events);
        Ok(events)
    }

    /// The bot move due now, if the turn holder is a bot.
    pub fn pending_bot_turn(&self) -> Option<BotTurn> {
        if !self.started || self.result.is_some() {
            return None;
        }
        let player = self.turn.current_player;
        self.players
            .get(player)
            .filter(|p| p.is_bot())
            .map(|_| BotTurn {
                generation: self.generation,
                turn_seq: self.turn.turn_seq,
                player,
                phase: self.turn.phase,
            })
    }

    /// Commits a scheduled bot move, unless the session moved on since the
    /// token was issued.
    pub fn run_bot_turn(
        &mut self,
        token: BotTurn,
        action: PlayerAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.pending_bot_turn() != Some(token) {
            debug!(?token, "dropping stale bot turn");
            return Err(GameError::StaleBotTurn);
        }
        self.apply_action(token.player, action)
    }

    fn guard(&self, player: PlayerId) -> Result<(), GameError> {
        if !self.started {
            return Err(GameError::NotStarted);
        }
        if self.result.is_some() {
            return Err(GameError::GameOver);
        }
        if player != self.turn.current_player {
            return Err(GameError::NotPlayersTurn {
                expected: self.turn.current_player,
                actual: player,
            });
        }
        Ok(())
    }

    fn commit_bet(
        &mut self,
        player: PlayerId,
        color: Color,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        place_bet(&mut self.targets, &mut self.scores, player, color)?;
        debug!(player, target = %color, "bet placed");
        events.push(GameEvent::BetPlaced {
            player,
            target: color,
            score: self.scores[player],
        });

        match self.turn.phase {
            Phase::InitialBet => {
                self.turn.initial_bets_placed += 1;
                if self.turn.initial_bets_placed == PLAYER_COUNT {
                    self.deal_hands(events);
                    self.turn.phase = Phase::Bet;
                }
                self.turn.current_player = next_player(self.turn.current_player, &self.players);
            }
            Phase::Bet => self.turn.phase = Phase::Card,
            Phase::Card => {}
        }
        events.push(GameEvent::PhaseChanged {
            player: self.turn.current_player,
            phase: self.turn.phase,
        });
        Ok(())
    }

    fn deal_hands(&mut self, events: &mut Vec<GameEvent>) {
        for p in self.players.iter_mut() {
            p.set_hand(self.deck.draw_hand(CARDS_PER_PLAYER));
        }
        let hand_sizes: Vec<usize> = self.players.iter().map(|p| p.hand().len()).collect();
        debug!(?hand_sizes, remaining = self.deck.remaining(), "hands dealt");
        events.push(GameEvent::HandsDealt { hand_sizes });
    }

    fn end_turn(&mut self, events: &mut Vec<GameEvent>) {
        self.turn.current_player = next_player(self.turn.current_player, &self.players);
        self.turn.phase = phase_after_play(&self.targets);
        events.push(GameEvent::PhaseChanged {
            player: self.turn.current_player,
            phase: self.turn.phase,
        });
    }

    /// Resolves everything the last action made due: exhaustion, the
    /// one-target-per-player end, and eliminations or ties.
    fn settle(&mut self, events: &mut Vec<GameEvent>) {
        while self.result.is_none() {
            match terminal_state(&self.deck, &self.targets, &self.players) {
                Some(Terminal::Exhausted) => {
                    self.finish(
                        GameResult::Stalemate {
                            scores: self.scores.clone(),
                        },
                        events,
                    );
                    return;
                }
                Some(Terminal::TargetsPerPlayer) => {
                    self.finish(GameResult::from_totals(self.standings()), events);
                    return;
                }
                None => {}
            }

            match evaluate_round(&self.targets) {
                None => return,
                Some(RoundOutcome::Tied { colors, number }) => {
                    debug!(?colors, number, round = self.round, "tied round");
                    reset_numbers(&mut self.targets);
                    events.push(GameEvent::RoundTied { colors, number });
                    self.message = Some("Tie detected, no elimination.".to_string());
                    return;
                }
                Some(RoundOutcome::Eliminated { color, number }) => {
                    let elimination = process_elimination(
                        color,
                        &mut self.targets,
                        &mut self.scores,
                        &mut self.deck,
                        &mut self.players,
                    );
                    debug!(
                        target = %color,
                        number,
                        reversed = elimination.reversed_bets.len(),
                        destroyed = elimination.cards_destroyed,
                        "target eliminated"
                    );
                    events.push(GameEvent::Eliminated {
                        target: color,
                        reversed_bets: elimination.reversed_bets,
                    });

                    let active = self.targets.iter().filter(|t| t.is_active()).count();
                    if active <= PLAYER_COUNT {
                        self.finish(GameResult::from_totals(self.standings()), events);
                        return;
                    }

                    self.round += 1;
                    self.message = Some(eliminated_banner(color, self.round));
                    events.push(GameEvent::RoundStarted { round: self.round });

                    let phase = phase_after_play(&self.targets);
                    if phase != self.turn.phase {
                        self.turn.phase = phase;
                        events.push(GameEvent::PhaseChanged {
                            player: self.turn.current_player,
                            phase,
                        });
                    }
                }
            }
        }
    }

    fn finish(&mut self, result: GameResult, events: &mut Vec<GameEvent>) {
        debug!(?result, round = self.round, "game over");
        self.message = Some(result.announcement());
        events.push(GameEvent::GameOver {
            result: result.clone(),
        });
        self.result = Some(result);
    }
}
