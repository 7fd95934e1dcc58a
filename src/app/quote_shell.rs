use crate::core::controller::GameController;
use crate::core::game::{GameState, Notice, MAX_GUESSES};
use crate::core::{AuthorImage, HintTier, ImageProbe, QuoteService};
use crate::utils::error::Result;
use chrono::Utc;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    NewGame,
    Guess(String),
    Help,
    Quit,
}

/// 不是指令的輸入一律當成猜測；空白行是空的猜測
pub fn parse_play_command(line: &str) -> PlayCommand {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "new" | "again" | "play again" => return PlayCommand::NewGame,
        "help" | "?" => return PlayCommand::Help,
        "quit" | "exit" => return PlayCommand::Quit,
        _ => {}
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) if word.eq_ignore_ascii_case("guess") => {
            PlayCommand::Guess(rest.trim().to_string())
        }
        _ if trimmed.eq_ignore_ascii_case("guess") => PlayCommand::Guess(String::new()),
        _ => PlayCommand::Guess(trimmed.to_string()),
    }
}

fn hint_label(tier: HintTier) -> &'static str {
    match tier {
        HintTier::Birth => "born",
        HintTier::FirstName => "first name",
        HintTier::LastName => "last name",
    }
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::QuoteShown(quote) => format!(
            "\n“{}”\nWho said it? You have {} guesses.",
            quote.text, MAX_GUESSES
        ),
        Notice::Rejected(rejection) => format!("⚠️  {}", rejection),
        Notice::WrongGuess { remaining: 0 } => "✗ Not quite. No guesses left.".to_string(),
        Notice::WrongGuess { remaining: 1 } => "✗ Not quite. 1 guess left.".to_string(),
        Notice::WrongGuess { remaining } => {
            format!("✗ Not quite. {} guesses left.", remaining)
        }
        Notice::HintRevealed(hint) => format!("💡 Hint ({}): {}", hint_label(hint.tier), hint.text),
        Notice::Won { author } => format!("🎉 Correct! It was {}.", author),
        Notice::Lost { author } => format!("The author was {}.", author),
        Notice::AuthorImage { image, .. } => match image {
            AuthorImage::Remote(_) => format!("🖼  {}", image.url()),
            AuthorImage::Initials(_) => format!("🖼  {} (initials avatar)", image.url()),
        },
        Notice::Failure(message) => format!("❌ {}", message),
    }
}

pub fn render_round_time(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds();
    if secs >= 60 {
        format!("⏱  Round took {}m {}s.", secs / 60, secs % 60)
    } else {
        format!("⏱  Round took {}s.", secs)
    }
}

const HELP: &str = "type your guess (or 'guess <name>'), 'again' for a new quote, 'quit' to leave";

/// 互動式猜謎；一開始自動開新局
pub async fn run_play_shell<S, P, R, W>(
    controller: &mut GameController<S, P>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    S: QuoteService,
    P: ImageProbe,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", HELP)?;
    let notices = controller.new_game().await;
    print_notices(controller.state(), &notices, out)?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let notices = match parse_play_command(&line) {
            PlayCommand::NewGame => controller.new_game().await,
            PlayCommand::Guess(guess) => controller.guess(&guess).await,
            PlayCommand::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            PlayCommand::Quit => break,
        };
        print_notices(controller.state(), &notices, out)?;
    }
    Ok(())
}

fn print_notices<W: Write>(state: &GameState, notices: &[Notice], out: &mut W) -> Result<()> {
    for notice in notices {
        writeln!(out, "{}", render_notice(notice))?;
    }
    match state {
        GameState::Finished { session, .. } => {
            // 只在這一輪剛結束時顯示
            if notices
                .iter()
                .any(|n| matches!(n, Notice::Won { .. } | Notice::Lost { .. }))
            {
                writeln!(out, "{}", render_round_time(session.elapsed(Utc::now())))?;
            }
            writeln!(out, "Type 'again' to play another round.")?
        }
        GameState::Idle => writeln!(out, "Type 'new' to try again.")?,
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::GuessRejection;
    use crate::core::Hint;

    #[test]
    fn test_parse_play_command() {
        assert_eq!(parse_play_command("again"), PlayCommand::NewGame);
        assert_eq!(parse_play_command(" Play Again "), PlayCommand::NewGame);
        assert_eq!(
            parse_play_command("guess  Ada Lovelace"),
            PlayCommand::Guess("Ada Lovelace".to_string())
        );
        assert_eq!(parse_play_command("guess"), PlayCommand::Guess(String::new()));
        assert_eq!(parse_play_command(""), PlayCommand::Guess(String::new()));
        assert_eq!(
            parse_play_command("Oscar Wilde"),
            PlayCommand::Guess("Oscar Wilde".to_string())
        );
        assert_eq!(parse_play_command("quit"), PlayCommand::Quit);
    }

    #[test]
    fn test_render_notice() {
        assert_eq!(
            render_notice(&Notice::WrongGuess { remaining: 1 }),
            "✗ Not quite. 1 guess left."
        );
        assert_eq!(
            render_notice(&Notice::HintRevealed(Hint {
                tier: HintTier::FirstName,
                text: "Ada".to_string()
            })),
            "💡 Hint (first name): Ada"
        );
        assert_eq!(
            render_notice(&Notice::Rejected(GuessRejection::Empty)),
            "⚠️  type a guess first"
        );
        assert!(render_notice(&Notice::AuthorImage {
            author: "Ada Lovelace".to_string(),
            image: AuthorImage::Initials("https://x/AL".to_string()),
        })
        .ends_with("(initials avatar)"));
        assert_eq!(
            render_notice(&Notice::AuthorImage {
                author: "Ada Lovelace".to_string(),
                image: AuthorImage::Remote("https://img/ada.jpg".to_string()),
            }),
            "🖼  https://img/ada.jpg"
        );
    }

    #[test]
    fn test_render_round_time() {
        assert_eq!(
            render_round_time(chrono::Duration::seconds(9)),
            "⏱  Round took 9s."
        );
        assert_eq!(
            render_round_time(chrono::Duration::seconds(75)),
            "⏱  Round took 1m 15s."
        );
    }
}
