/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation and the rules of chess: move generation, move
/// application, and terminal-state detection.
mod board;

/// Commands accepted by the engine, and how to parse them.
mod cli;

/// The interactive driver: turn sequencing and input handling.
mod engine;

/// Evaluation of chess positions.
mod eval;

/// Move ordering for the search.
mod movepicker;

/// Types for rating how good/bad a position is.
mod score;

/// Main engine logic; all search related code.
mod search;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use movepicker::*;
pub use score::*;
pub use search::*;
