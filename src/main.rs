use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chess_rules::config::AppConfig;
use chess_rules::engine::{Game, MoveInput, Square};

fn main() -> ExitCode {
    let config = AppConfig::from_env();

    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .init();

    let mut game = match config.start_fen.as_deref() {
        Some(fen) => match Game::from_fen(fen) {
            Ok(game) => game,
            Err(e) => {
                eprintln!("Cannot start from CHESS_START_FEN: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Game::new(),
    };

    tracing::info!(
        "chess-rules v{} ready, {} to move",
        env!("CARGO_PKG_VERSION"),
        game.side_to_move()
    );

    match run(&mut game, &config, io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("I/O error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    game: &mut Game,
    config: &AppConfig,
    input: impl BufRead,
    mut out: impl Write,
) -> io::Result<()> {
    if config.show_board {
        writeln!(out, "{}", game.board())?;
    }
    for line in input.lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("quit" | "exit"), _) => break,
            (Some("fen"), _) => writeln!(out, "{}", game.to_fen())?,
            (Some("board"), _) => writeln!(out, "{}", game.board())?,
            (Some("history"), _) => writeln!(out, "{}", game.san_history().join(" "))?,
            (Some("moves"), Some(sq)) => match sq.parse::<Square>() {
                Ok(sq) => {
                    let mut targets: Vec<String> = game
                        .legal_moves_from(sq)
                        .iter()
                        .map(|m| m.to_string())
                        .collect();
                    targets.sort();
                    writeln!(out, "{}", targets.join(" "))?;
                }
                Err(e) => writeln!(out, "error: {e}")?,
            },
            (Some(word), _) => match word.parse::<MoveInput>() {
                Ok(mv) => match game.attempt_move(mv.from, mv.to, mv.promotion) {
                    Ok(status) => {
                        let san = game.san_history().last().cloned().unwrap_or_default();
                        writeln!(out, "{san} ({status})")?;
                        if config.show_board {
                            writeln!(out, "{}", game.board())?;
                        }
                    }
                    Err(e) => writeln!(out, "illegal: {e}")?,
                },
                Err(e) => writeln!(out, "error: {e}")?,
            },
        }
    }
    Ok(())
}
