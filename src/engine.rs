/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{self, Receiver, Sender},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use threadpool::ThreadPool;

use crate::{
    evaluate, parse_coordinate_move, Cli, EngineCommand, Game, Mode, Search, SearchConfig,
};

/// The interactive driver: owns the current game, sequences turns between
/// manual input and the search, and renders state between moves.
#[derive(Debug)]
pub struct Engine {
    /// The current state of the chess game.
    ///
    /// Modified whenever moves are played, and reset whenever the engine is
    /// told to start a new game.
    game: Game,

    /// Which side(s) the search plays.
    mode: Mode,

    /// Search configuration, notably the depth.
    config: SearchConfig,

    /// Threadpool for executing tasks in parallel.
    ///
    /// A thread is spawned for handling command-line input.
    pool: ThreadPool,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] at the starting position, in manual mode.
    pub fn new() -> Self {
        // Construct a channel for communication and threadpool for parallel tasks
        let (sender, receiver) = mpsc::channel();
        let pool = ThreadPool::with_name(
            format!("{} input thread(s)", env!("CARGO_PKG_NAME")),
            num_cpus::get(),
        );

        Self {
            game: Game::new(),
            mode: Mode::default(),
            config: SearchConfig::default(),
            pool,
            sender,
            receiver,
        }
    }

    /// Sends a command to the engine to be executed.
    pub fn send_command(&self, command: EngineCommand) -> Result<()> {
        self.sender.send(command)?;
        Ok(())
    }

    /// Runs the engine's main event loop, consuming it.
    pub fn run(mut self) -> Result<()> {
        let name = env!("CARGO_PKG_NAME");
        let version = env!("CARGO_PKG_VERSION");
        println!("{name} {version}");
        println!("Enter moves in coordinate notation (e2e4, a7a8q for promotion).");
        println!("Type 'help' for available commands.");

        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        self.pool.execute(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("{err}");
            }
        });

        self.render();

        while let Ok(cmd) = self.receiver.recv() {
            match cmd {
                EngineCommand::Display => self.render(),

                EngineCommand::PlayMove { mv } => self.play_manual_move(&mv),

                EngineCommand::Go => self.play_engine_move(),

                EngineCommand::Moves { square } => {
                    let list = self
                        .game
                        .legal_moves()
                        .iter()
                        .filter(|mv| square.map_or(true, |sq| mv.from() == sq))
                        .map(|mv| mv.to_string())
                        .collect::<Vec<_>>();

                    if list.is_empty() {
                        println!("(none)");
                    } else {
                        println!("{}", list.join(" "));
                    }
                }

                EngineCommand::Eval => {
                    println!("{:+} cp (positive favors White)", evaluate(self.game.state()))
                }

                EngineCommand::Mode { mode } => {
                    self.mode = mode;
                    println!("Mode set to {mode:?}.");
                    if mode == Mode::Auto {
                        println!("Use 'go' to advance one ply.");
                    } else if self.engine_owns_turn() {
                        self.play_engine_move();
                    }
                }

                EngineCommand::Depth { depth } => {
                    self.config = SearchConfig::new(depth);
                    println!("Search depth set to {}.", self.config.max_depth);
                }

                EngineCommand::Perft { depth } => {
                    let start = Instant::now();
                    let nodes = self.game.perft(depth);
                    let elapsed = start.elapsed();
                    println!("perft({depth}) = {nodes} ({elapsed:.2?})");
                }

                EngineCommand::Splitperft { depth } => {
                    let mut total = 0;
                    for &mv in self.game.legal_moves() {
                        let nodes = if depth <= 1 {
                            1
                        } else {
                            self.game.state().with_move_made(mv).perft(depth - 1)
                        };
                        total += nodes;
                        println!("{mv}: {nodes}");
                    }
                    println!("total: {total}");
                }

                EngineCommand::Reset => {
                    self.game.reset();
                    println!("Game reset.");
                    self.render();
                }

                // Exit the loop so the engine can quit
                EngineCommand::Quit => break,
            }
        }

        Ok(())
    }

    /// Plays a manually-entered move, then lets the engine reply if the
    /// current mode gives it the next turn.
    fn play_manual_move(&mut self, text: &str) {
        if let Err(err) = self.game.try_move_coordinate(text) {
            println!("{err}");
            return;
        }

        self.render();
        if self.announce_terminal() {
            return;
        }

        if self.mode.replies_for(self.game.state().side_to_move()) {
            self.play_engine_move();
        }
    }

    /// Asks the search for a move for the side to move, and plays it.
    fn play_engine_move(&mut self) {
        let side = self.game.state().side_to_move();
        let start = Instant::now();
        let result = Search::new(self.game.state(), self.config).start(side);
        let Some(mv) = result.bestmove else {
            // No legal moves: the position is already terminal.
            self.announce_terminal();
            return;
        };

        println!(
            "{} plays {mv} (score {}, {} nodes, {:.2?})",
            env!("CARGO_PKG_NAME"),
            result.score,
            result.nodes,
            start.elapsed()
        );
        self.game.make_move(mv);
        self.render();
        self.announce_terminal();
    }

    /// Returns `true` if the current mode assigns the side to move to the engine.
    fn engine_owns_turn(&self) -> bool {
        self.mode.replies_for(self.game.state().side_to_move())
    }

    /// Prints the board and whose turn it is.
    fn render(&self) {
        println!("\n{}", self.game);
        let side = self.game.state().side_to_move();
        if !self.game.is_checkmate() && !self.game.is_stalemate() && self.game.in_check(side) {
            println!("{side} is in check.");
        }
    }

    /// Reports checkmate or stalemate, returning `true` if the game is over.
    fn announce_terminal(&self) -> bool {
        if self.game.is_checkmate() {
            let winner = self.game.state().side_to_move().opponent();
            println!("Checkmate! {winner} wins.");
            true
        } else if self.game.is_stalemate() {
            println!("Stalemate. The game is drawn.");
            true
        } else {
            false
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads lines from stdin, parses them into [`EngineCommand`]s, and feeds
/// them to the engine over the channel.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(2048);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line of console input")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Quit)
                .context("Failed to send 'quit' command after receiving empty input")?;
            return Ok(());
        }

        // Trim whitespace and split args appropriately
        let Some(mut args) = shlex::split(&buffer) else {
            eprintln!("Invalid quoting in input: {buffer:?}");
            continue;
        };

        // Ignore empty lines
        if args.is_empty() {
            continue;
        }

        // Subcommand names are matched case-sensitively by clap; argument
        // values handle their own casing.
        args[0] = args[0].to_ascii_lowercase();

        // Attempt to parse the input, falling back to treating a lone token
        // like `e2e4` as a move.
        let cmd = match Cli::try_parse_from(&args) {
            Ok(cli) => cli.command,

            Err(err) => {
                if args.len() == 1 && parse_coordinate_move(&args[0]).is_ok() {
                    EngineCommand::PlayMove {
                        mv: args[0].clone(),
                    }
                } else {
                    // An invalid command should not kill the session.
                    eprintln!("{err}");
                    continue;
                }
            }
        };

        sender
            .send(cmd)
            .context("Failed to send command to engine")?;
    }
}
