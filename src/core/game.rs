//! Turn-based state machine for one quote-guessing round.
//!
//! `step` is a pure reducer: it takes the current [`GameState`] and a
//! [`GameEvent`] and returns the next state together with the [`Effect`]s the
//! caller has to carry out (network requests, user notices). Results of those
//! effects come back in as new events.

use crate::domain::model::{Hint, HintTier, Quote};
use chrono::{DateTime, Utc};
use thiserror::Error;

pub const MAX_GUESSES: u8 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessRejection {
    #[error("type a guess first")]
    Empty,

    #[error("no game in progress")]
    NotInProgress,

    #[error("still waiting for the previous request")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// 正在等待回應的請求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Verifying { guess: String },
    Hint(HintTier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub quote: Quote,
    pub remaining: u8,
    pub hints: Vec<Hint>,
    pub started_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new(quote: Quote, started_at: DateTime<Utc>) -> Self {
        Self {
            quote,
            remaining: MAX_GUESSES,
            hints: Vec::new(),
            started_at,
        }
    }

    /// 拿到名言之後經過的時間，時鐘倒退時為零
    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.started_at).max(chrono::Duration::zero())
    }

    pub fn has_hint(&self, tier: HintTier) -> bool {
        self.hints.iter().any(|h| h.tier == tier)
    }

    pub fn hint_tiers(&self) -> Vec<HintTier> {
        self.hints.iter().map(|h| h.tier).collect()
    }

    /// 下一個該揭露但尚未揭露的提示；提示永遠是 ORDER 的前綴
    pub fn next_due_hint(&self) -> Option<HintTier> {
        HintTier::ORDER
            .get(self.hints.len())
            .copied()
            .filter(|tier| self.remaining > 0 && self.remaining <= tier.threshold())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    Idle,
    /// `fallback` 是請求失敗時要回復的狀態
    AwaitingQuote { fallback: Box<GameState> },
    InProgress {
        session: GameSession,
        pending: Option<Pending>,
    },
    Finished {
        session: GameSession,
        outcome: Outcome,
    },
}

impl Default for GameState {
    fn default() -> Self {
        GameState::Idle
    }
}

impl GameState {
    pub fn session(&self) -> Option<&GameSession> {
        match self {
            GameState::InProgress { session, .. } | GameState::Finished { session, .. } => {
                Some(session)
            }
            GameState::Idle | GameState::AwaitingQuote { .. } => None,
        }
    }

    pub fn remaining(&self) -> Option<u8> {
        self.session().map(|s| s.remaining)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GameState::Finished { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    /// 是否可以送出猜測（對應畫面上的輸入框是否啟用）
    pub fn accepts_guess(&self) -> bool {
        matches!(self, GameState::InProgress { pending: None, .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameState::Idle => "idle",
            GameState::AwaitingQuote { .. } => "awaiting_quote",
            GameState::InProgress { .. } => "in_progress",
            GameState::Finished { .. } => "finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    NewGame,
    QuoteLoaded { quote: Quote, at: DateTime<Utc> },
    QuoteFailed { reason: String },
    Guess(String),
    Verdict { correct: bool },
    VerifyFailed { reason: String },
    HintLoaded { tier: HintTier, text: String },
    HintFailed { tier: HintTier, reason: String },
}

/// 給使用者看的訊息
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    QuoteShown(Quote),
    Rejected(GuessRejection),
    WrongGuess { remaining: u8 },
    HintRevealed(Hint),
    Won { author: String },
    Lost { author: String },
    AuthorImage { author: String, image: crate::domain::model::AuthorImage },
    Failure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchQuote,
    VerifyGuess { answer: String, author: String },
    FetchHint {
        tier: HintTier,
        author: String,
        bio_link: String,
    },
    ResolveImage { author: String },
    Notify(Notice),
}

fn reject(state: GameState, rejection: GuessRejection) -> (GameState, Vec<Effect>) {
    tracing::debug!("Guess rejected in state {}: {}", state.name(), rejection);
    (state, vec![Effect::Notify(Notice::Rejected(rejection))])
}

fn hint_request(session: &GameSession, tier: HintTier) -> Effect {
    Effect::FetchHint {
        tier,
        author: session.quote.author.clone(),
        bio_link: session.quote.bio_link.clone(),
    }
}

/// 在目前狀態套用一個事件
pub fn step(state: GameState, event: GameEvent) -> (GameState, Vec<Effect>) {
    match (state, event) {
        (state @ (GameState::Idle | GameState::Finished { .. }), GameEvent::NewGame)
        | (state @ GameState::InProgress { pending: None, .. }, GameEvent::NewGame) => (
            GameState::AwaitingQuote {
                fallback: Box::new(state),
            },
            vec![Effect::FetchQuote],
        ),
        (state @ GameState::AwaitingQuote { .. }, GameEvent::NewGame) => (state, Vec::new()),
        (state @ GameState::InProgress { .. }, GameEvent::NewGame) => {
            reject(state, GuessRejection::Busy)
        }

        (GameState::AwaitingQuote { .. }, GameEvent::QuoteLoaded { quote, at }) => {
            let session = GameSession::new(quote.clone(), at);
            (
                GameState::InProgress {
                    session,
                    pending: None,
                },
                vec![Effect::Notify(Notice::QuoteShown(quote))],
            )
        }
        (GameState::AwaitingQuote { fallback }, GameEvent::QuoteFailed { reason }) => {
            (*fallback, vec![Effect::Notify(Notice::Failure(reason))])
        }

        (GameState::InProgress { session, pending: None }, GameEvent::Guess(input)) => {
            let guess = input.trim();
            if guess.is_empty() {
                return reject(
                    GameState::InProgress {
                        session,
                        pending: None,
                    },
                    GuessRejection::Empty,
                );
            }
            let effect = Effect::VerifyGuess {
                answer: guess.to_string(),
                author: session.quote.author.clone(),
            };
            (
                GameState::InProgress {
                    session,
                    pending: Some(Pending::Verifying {
                        guess: guess.to_string(),
                    }),
                },
                vec![effect],
            )
        }
        (state @ GameState::InProgress { .. }, GameEvent::Guess(_)) => {
            reject(state, GuessRejection::Busy)
        }
        (state, GameEvent::Guess(_)) => reject(state, GuessRejection::NotInProgress),

        (
            GameState::InProgress {
                session,
                pending: Some(Pending::Verifying { .. }),
            },
            GameEvent::Verdict { correct: true },
        ) => {
            let author = session.quote.author.clone();
            (
                GameState::Finished {
                    session,
                    outcome: Outcome::Won,
                },
                vec![
                    Effect::Notify(Notice::Won {
                        author: author.clone(),
                    }),
                    Effect::ResolveImage { author },
                ],
            )
        }
        (
            GameState::InProgress {
                mut session,
                pending: Some(Pending::Verifying { .. }),
            },
            GameEvent::Verdict { correct: false },
        ) => {
            session.remaining = session.remaining.saturating_sub(1);
            let remaining = session.remaining;
            let mut effects = vec![Effect::Notify(Notice::WrongGuess { remaining })];

            if remaining == 0 {
                let author = session.quote.author.clone();
                effects.push(Effect::Notify(Notice::Lost {
                    author: author.clone(),
                }));
                effects.push(Effect::ResolveImage { author });
                return (
                    GameState::Finished {
                        session,
                        outcome: Outcome::Lost,
                    },
                    effects,
                );
            }

            let pending = match session.next_due_hint() {
                Some(tier) => {
                    effects.push(hint_request(&session, tier));
                    Some(Pending::Hint(tier))
                }
                None => None,
            };
            (GameState::InProgress { session, pending }, effects)
        }
        (
            GameState::InProgress {
                session,
                pending: Some(Pending::Verifying { .. }),
            },
            GameEvent::VerifyFailed { reason },
        ) => (
            GameState::InProgress {
                session,
                pending: None,
            },
            vec![Effect::Notify(Notice::Failure(reason))],
        ),

        (
            GameState::InProgress {
                mut session,
                pending: Some(Pending::Hint(expected)),
            },
            GameEvent::HintLoaded { tier, text },
        ) if tier == expected && !session.has_hint(tier) => {
            let hint = Hint { tier, text };
            session.hints.push(hint.clone());
            let mut effects = vec![Effect::Notify(Notice::HintRevealed(hint))];

            // 先前失敗的提示在這裡補上，之後再拿較新的層級
            let pending = match session.next_due_hint() {
                Some(next) => {
                    effects.push(hint_request(&session, next));
                    Some(Pending::Hint(next))
                }
                None => None,
            };
            (GameState::InProgress { session, pending }, effects)
        }
        (
            GameState::InProgress {
                session,
                pending: Some(Pending::Hint(expected)),
            },
            GameEvent::HintFailed { tier, reason },
        ) if tier == expected => (
            GameState::InProgress {
                session,
                pending: None,
            },
            vec![Effect::Notify(Notice::Failure(reason))],
        ),

        // 過期或重複的回應一律忽略
        (state, event) => {
            tracing::debug!("Ignoring {:?} in state {}", event, state.name());
            (state, Vec::new())
        }
    }
}
