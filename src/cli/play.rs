//! Play command implementation.

use super::bot::ExpansionBot;
use super::output::{JsonBoard, JsonMatchResult, format_text, standings};
use super::{CliError, OutputFormat};
use crowns::game::army_totals;
use crowns::{Color, Match, MatchConfig, ViewUpdate};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Options of the play command.
#[derive(Debug)]
pub(crate) struct PlayOptions {
    pub(crate) players: u8,
    pub(crate) ticks: u32,
    pub(crate) tick_ms: Option<u64>,
    pub(crate) seed: Option<u64>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) format: OutputFormat,
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the match cannot start.
pub(crate) fn execute(options: &PlayOptions) -> Result<(), CliError> {
    let mut config = match &options.config {
        Some(path) => MatchConfig::from_json_file(path)?,
        None => MatchConfig::default(),
    };
    if let Some(tick_ms) = options.tick_ms {
        config.tick_period_ms = tick_ms;
    }
    let seed = options.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    config.validate()?;

    let game = Arc::new(Match::new(config));
    let mut bots = Vec::with_capacity(usize::from(options.players));
    for index in 0..options.players {
        let (tx, rx) = crossbeam_channel::unbounded::<ViewUpdate>();
        let color = game.register_player(format!("bot-{}", index + 1), tx)?;
        let mut bot = ExpansionBot::new(color, seed.wrapping_add(u64::from(index) + 1));
        let game = Arc::clone(&game);

        let handle = thread::Builder::new()
            .name(format!("bot-{color}"))
            .spawn(move || {
                // Ends when the match drops this player's sender.
                for update in rx {
                    let Some(mv) = bot.choose(&update.view) else {
                        continue;
                    };
                    if let Err(err) = game.submit_move(bot.color(), mv) {
                        debug!(color = %bot.color(), %err, "bot move rejected");
                    }
                }
            })?;
        bots.push(handle);
    }

    info!(seed, players = options.players, ticks = options.ticks, "starting match");
    game.start()?;

    let period = config.tick_period();
    while game.with_state(|state| state.tick_count()) < options.ticks {
        thread::sleep(period);
    }

    let (ticks, board, names) = game.with_state(|state| {
        let names: Vec<(Color, String)> = state
            .players()
            .iter()
            .map(|p| (p.color, p.name.clone()))
            .collect();
        (state.tick_count(), state.board().cloned(), names)
    });
    game.end();
    for handle in bots {
        if handle.join().is_err() {
            return Err(CliError::new("bot thread panicked"));
        }
    }

    let board = board.ok_or_else(|| CliError::new("match produced no board"))?;
    let totals = army_totals(names.iter().map(|(color, _)| *color), &board);
    let standings = standings(&board, &names, &totals);

    match options.format {
        OutputFormat::Text => print!("{}", format_text(seed, ticks, &standings, &board)),
        OutputFormat::Json => {
            let output = JsonMatchResult {
                seed,
                ticks,
                players: standings,
                board: JsonBoard::from_board(&board),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
