//! Generate command implementation.

use super::output::{JsonBoard, JsonCrown, JsonGenerated};
use super::{CliError, OutputFormat};
use crowns::game::{BoardParams, PALETTE, generate_board};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if the board cannot be generated.
pub(crate) fn execute(
    seed: Option<u64>,
    size: u16,
    players: u8,
    format: OutputFormat,
) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let params = BoardParams {
        size,
        ..BoardParams::default()
    };
    let colors = PALETTE
        .get(..usize::from(players))
        .ok_or_else(|| CliError::new(format!("cannot place {players} crowns")))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let board = generate_board(&mut rng, &params, colors)?;

    match format {
        OutputFormat::Text => {
            println!("Board (seed: {seed}, size: {size})");
            for &color in colors {
                if let Some(pos) = board.crown_of(color) {
                    println!("  {color:<8} crown at {pos}");
                }
            }
            println!();
            print!("{board}");
        }
        OutputFormat::Json => {
            let crowns = colors
                .iter()
                .filter_map(|&color| {
                    board.crown_of(color).map(|pos| JsonCrown {
                        color,
                        row: pos.row,
                        column: pos.column,
                    })
                })
                .collect();
            let output = JsonGenerated {
                seed,
                crowns,
                board: JsonBoard::from_board(&board),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
