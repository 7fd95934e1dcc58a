use crate::core::avatar::ImageResolver;
use crate::core::game::{step, Effect, GameEvent, GameState, Notice};
use crate::core::{ImageProbe, LoadSummary, QuoteService};
use crate::utils::error::Result;
use chrono::Utc;
use std::collections::VecDeque;

/// 名言猜謎控制器：持有遊戲狀態，執行狀態機產生的請求並把結果送回狀態機
pub struct GameController<S: QuoteService, P: ImageProbe> {
    service: S,
    images: ImageResolver<P>,
    state: GameState,
}

impl<S: QuoteService, P: ImageProbe> GameController<S, P> {
    pub fn new(service: S, images: ImageResolver<P>) -> Self {
        Self {
            service,
            images,
            state: GameState::Idle,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn load_quotes(&self) -> Result<LoadSummary> {
        let summary = self.service.load_quotes().await?;
        tracing::info!("📚 {} ({} quotes)", summary.message, summary.count);
        Ok(summary)
    }

    pub async fn new_game(&mut self) -> Vec<Notice> {
        self.dispatch(GameEvent::NewGame).await
    }

    pub async fn guess(&mut self, input: &str) -> Vec<Notice> {
        self.dispatch(GameEvent::Guess(input.to_string())).await
    }

    /// 套用事件並依序執行所有後續請求，直到狀態機不再要求任何動作
    pub async fn dispatch(&mut self, event: GameEvent) -> Vec<Notice> {
        let mut notices = Vec::new();
        let mut events = VecDeque::from([event]);

        while let Some(event) = events.pop_front() {
            let state = std::mem::take(&mut self.state);
            let from = state.name();
            let (next, effects) = step(state, event);
            if from != next.name() {
                tracing::debug!("Game state {} -> {}", from, next.name());
            }
            self.state = next;

            for effect in effects {
                match effect {
                    Effect::Notify(notice) => notices.push(notice),
                    Effect::ResolveImage { author } => {
                        let image = self.images.resolve(&self.service, &author).await;
                        notices.push(Notice::AuthorImage { author, image });
                    }
                    other => {
                        if let Some(reply) = self.perform(other).await {
                            events.push_back(reply);
                        }
                    }
                }
            }
        }

        notices
    }

    async fn perform(&self, effect: Effect) -> Option<GameEvent> {
        let event = match effect {
            Effect::FetchQuote => match self.service.new_game().await {
                Ok(quote) => GameEvent::QuoteLoaded {
                    quote,
                    at: Utc::now(),
                },
                Err(e) => {
                    tracing::warn!("New game request failed: {}", e);
                    GameEvent::QuoteFailed {
                        reason: e.user_friendly_message(),
                    }
                }
            },
            Effect::VerifyGuess { answer, author } => {
                match self.service.check_answer(&answer, &author).await {
                    Ok(correct) => GameEvent::Verdict { correct },
                    Err(e) => {
                        tracing::warn!("Answer check failed: {}", e);
                        GameEvent::VerifyFailed {
                            reason: e.user_friendly_message(),
                        }
                    }
                }
            }
            Effect::FetchHint {
                tier,
                author,
                bio_link,
            } => match self.service.get_hint(tier, &author, &bio_link).await {
                Ok(text) => GameEvent::HintLoaded { tier, text },
                Err(e) => {
                    tracing::warn!("Hint {} request failed: {}", tier, e);
                    GameEvent::HintFailed {
                        tier,
                        reason: e.user_friendly_message(),
                    }
                }
            },
            Effect::Notify(_) | Effect::ResolveImage { .. } => return None,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::avatar::DEFAULT_AVATAR_TEMPLATE;
    use crate::core::game::{GuessRejection, Outcome};
    use crate::domain::model::{AuthorImage, HintTier, Quote};
    use crate::utils::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// 腳本化的服務：依序回傳預先排好的判定結果
    struct ScriptedService {
        verdicts: Mutex<VecDeque<Result<bool>>>,
        quote_fails: bool,
        checks: AtomicUsize,
        hint_requests: Mutex<Vec<HintTier>>,
    }

    impl ScriptedService {
        fn new(verdicts: Vec<Result<bool>>) -> Self {
            Self {
                verdicts: Mutex::new(verdicts.into()),
                quote_fails: false,
                checks: AtomicUsize::new(0),
                hint_requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QuoteService for ScriptedService {
        async fn load_quotes(&self) -> Result<LoadSummary> {
            Ok(LoadSummary {
                message: "Loaded".to_string(),
                count: 3,
            })
        }

        async fn new_game(&self) -> Result<Quote> {
            if self.quote_fails {
                return Err(AppError::ServiceError {
                    endpoint: "/api/new-game".to_string(),
                    message: "No quotes available".to_string(),
                });
            }
            Ok(Quote {
                text: "Q".to_string(),
                author: "Ada Lovelace".to_string(),
                bio_link: "/author/Ada-Lovelace".to_string(),
            })
        }

        async fn check_answer(&self, _answer: &str, _author: &str) -> Result<bool> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.verdicts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(false))
        }

        async fn get_hint(&self, tier: HintTier, _author: &str, bio_link: &str) -> Result<String> {
            assert_eq!(bio_link, "/author/Ada-Lovelace");
            self.hint_requests.lock().unwrap().push(tier);
            Ok(format!("{} hint", tier))
        }

        async fn get_image(&self, _author: &str) -> Result<String> {
            Ok("https://img.example/ada.jpg".to_string())
        }
    }

    struct AlwaysLoads;

    #[async_trait]
    impl ImageProbe for AlwaysLoads {
        async fn probe(&self, _url: &str) -> Result<()> {
            Ok(())
        }
    }

    fn controller(service: ScriptedService) -> GameController<ScriptedService, AlwaysLoads> {
        GameController::new(
            service,
            ImageResolver::new(AlwaysLoads, Duration::from_secs(1), DEFAULT_AVATAR_TEMPLATE),
        )
    }

    #[tokio::test]
    async fn test_walkthrough_to_loss() {
        let mut game = controller(ScriptedService::new(vec![]));
        let notices = game.new_game().await;
        assert!(matches!(notices.as_slice(), [Notice::QuoteShown(_)]));
        assert_eq!(game.state().remaining(), Some(4));

        for expected in [3u8, 2, 1] {
            let notices = game.guess("wrong").await;
            assert_eq!(notices[0], Notice::WrongGuess { remaining: expected });
            assert!(matches!(notices[1], Notice::HintRevealed(_)));
        }

        let notices = game.guess("wrong").await;
        assert_eq!(
            notices,
            vec![
                Notice::WrongGuess { remaining: 0 },
                Notice::Lost {
                    author: "Ada Lovelace".to_string()
                },
                Notice::AuthorImage {
                    author: "Ada Lovelace".to_string(),
                    image: AuthorImage::Remote("https://img.example/ada.jpg".to_string()),
                },
            ]
        );
        assert_eq!(game.state().outcome(), Some(Outcome::Lost));
        assert_eq!(
            *game.service.hint_requests.lock().unwrap(),
            vec![HintTier::Birth, HintTier::FirstName, HintTier::LastName]
        );
    }

    #[tokio::test]
    async fn test_empty_guess_never_reaches_the_service() {
        let mut game = controller(ScriptedService::new(vec![]));
        game.new_game().await;
        let notices = game.guess("").await;
        assert_eq!(notices, vec![Notice::Rejected(GuessRejection::Empty)]);
        assert_eq!(game.service.checks.load(Ordering::SeqCst), 0);
        assert_eq!(game.state().remaining(), Some(4));
    }

    #[tokio::test]
    async fn test_verification_error_keeps_counter() {
        let service = ScriptedService::new(vec![
            Err(AppError::HttpStatusError {
                endpoint: "/api/check-answer".to_string(),
                status: 500,
            }),
            Ok(true),
        ]);
        let mut game = controller(service);
        game.new_game().await;

        let notices = game.guess("Ada").await;
        assert!(matches!(notices.as_slice(), [Notice::Failure(_)]));
        assert_eq!(game.state().remaining(), Some(4));
        assert!(game.state().accepts_guess());

        let notices = game.guess("Ada Lovelace").await;
        assert!(notices.contains(&Notice::Won {
            author: "Ada Lovelace".to_string()
        }));
        assert_eq!(game.state().remaining(), Some(4));
    }

    #[tokio::test]
    async fn test_quote_failure_stays_idle() {
        let mut service = ScriptedService::new(vec![]);
        service.quote_fails = true;
        let mut game = controller(service);

        let notices = game.new_game().await;
        assert_eq!(
            notices,
            vec![Notice::Failure("No quotes available".to_string())]
        );
        assert_eq!(*game.state(), GameState::Idle);
    }

    #[tokio::test]
    async fn test_play_again_replaces_session() {
        let mut game = controller(ScriptedService::new(vec![Ok(false), Ok(true)]));
        game.new_game().await;
        game.guess("wrong").await;
        game.guess("Ada Lovelace").await;
        assert_eq!(game.state().outcome(), Some(Outcome::Won));
        assert_eq!(game.state().remaining(), Some(3));

        game.new_game().await;
        assert_eq!(game.state().remaining(), Some(4));
        assert!(game.state().session().unwrap().hints.is_empty());
    }

    #[tokio::test]
    async fn test_load_quotes_passes_summary_through() {
        let game = controller(ScriptedService::new(vec![]));
        let summary = game.load_quotes().await.unwrap();
        assert_eq!(summary.count, 3);
    }
}
