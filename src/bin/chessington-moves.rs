// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{anyhow, Context};
use chessington::{
    core::{Move, Piece, Player, Square, SquareSet},
    movegen, Board, PieceId, Position,
};
use serde::Serialize;
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Lists the squares chess pieces may move to.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN piece placement (or a full FEN record) of the position to inspect.
    #[structopt(name = "PLACEMENT")]
    placement: String,

    /// Square of a single piece to inspect, e.g. "e2". If omitted, every move for --player is listed.
    #[structopt(name = "SQUARE")]
    square: Option<Square>,

    /// Side whose moves are listed when no square is given.
    #[structopt(long, default_value = "white")]
    player: Player,

    /// Print results as JSON instead of plain text.
    #[structopt(long)]
    json: bool,
}

#[derive(Serialize)]
struct PieceReport {
    id: PieceId,
    piece: Piece,
    square: Square,
    moves: SquareSet,
}

#[derive(Serialize)]
struct SideReport {
    player: Player,
    moves: Vec<Move>,
}

/// Reads log directives from `var`, showing warnings and above when it is unset.
fn log_filter(var: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(var)
        .from_env_lossy()
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter("CHESSINGTON_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let ops = Options::from_args();
    let pos = Position::from_placement(&ops.placement)
        .with_context(|| format!("invalid placement {:?}", ops.placement))?;

    match ops.square {
        Some(square) => {
            let id = pos
                .piece_id_at(square)
                .ok_or_else(|| anyhow!("no piece on {}", square))?;
            let piece = pos
                .piece_at(square)
                .ok_or_else(|| anyhow!("no piece on {}", square))?;
            let moves = movegen::available_moves(id, &pos)?;
            if ops.json {
                let report = PieceReport {
                    id,
                    piece,
                    square,
                    moves,
                };
                println!("{}", serde_json::to_string(&report)?);
            } else {
                for target in moves {
                    println!("{}{}", square, target);
                }
            }
        }
        None => {
            let mut moves = Vec::new();
            movegen::generate_moves(ops.player, &pos, &mut moves);
            if ops.json {
                let report = SideReport {
                    player: ops.player,
                    moves,
                };
                println!("{}", serde_json::to_string(&report)?);
            } else {
                for mov in moves {
                    println!("{}", mov.as_uci());
                }
            }
        }
    }

    Ok(())
}
