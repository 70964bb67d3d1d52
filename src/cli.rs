/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::{Parser, Subcommand, ValueEnum};

use crate::{Color, Square};

/// Parser for a single line of console input.
///
/// Subcommand names are matched case-sensitively by clap, so the input
/// layer lowercases the command word before handing a line to this parser;
/// argument values (moves, squares, modes) are case-insensitive on their
/// own.
#[derive(Debug, Parser)]
#[command(multicall = true, about, long_about = None, rename_all = "lower")]
pub struct Cli {
    #[command(subcommand)]
    pub command: EngineCommand,
}

/// A command to be sent to the engine.
#[derive(Debug, Clone, Subcommand)]
#[command(about = "Send a command to the engine")]
pub enum EngineCommand {
    /// Print a visual representation of the current board state.
    #[command(aliases = ["d", "show"])]
    Display,

    /// Play the provided move, in coordinate notation (e.g. `e2e4`, `a7a8q`).
    ///
    /// A bare move such as `e2e4` also works without the `move` prefix.
    #[command(alias = "m", name = "move")]
    PlayMove { mv: String },

    /// Let the engine choose and play a move for the side to move.
    Go,

    /// Show all legal moves in the current position.
    ///
    /// If `square` is provided, only moves from that square are shown.
    Moves { square: Option<Square> },

    /// Print the material evaluation of the current position.
    Eval,

    /// Select which side(s) the engine plays.
    Mode {
        #[arg(ignore_case = true)]
        mode: Mode,
    },

    /// Set the engine's search depth, in plies.
    Depth { depth: usize },

    /// Count the legal move paths from the current position to the given depth.
    Perft { depth: usize },

    /// Like `perft`, but with a per-move breakdown of the counts.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Restart from the initial position.
    Reset,

    /// Quit the program.
    #[command(alias = "exit")]
    Quit,
}

/// Which side(s) the engine plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Both sides are played manually (human vs human).
    #[default]
    Manual,

    /// The engine plays White.
    White,

    /// The engine plays Black.
    Black,

    /// The engine plays both sides; each `go` advances one ply.
    Auto,
}

impl Mode {
    /// Returns `true` if the engine should reply automatically after a
    /// manual move by `color`'s opponent.
    #[inline(always)]
    pub const fn replies_for(&self, color: Color) -> bool {
        match self {
            Self::Manual | Self::Auto => false,
            Self::White => color.is_white(),
            Self::Black => color.is_black(),
        }
    }
}
