//! Scripted in-process engine for session tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use uci::GuiCommand;

use crate::engine::{EngineSession, SessionOptions};

/// Every line the session sent, in order.
#[derive(Clone, Default)]
pub(crate) struct CommandLog(Arc<Mutex<Vec<String>>>);

impl CommandLog {
    pub(crate) fn commands(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Number of `go` commands issued for `fen`.
    pub(crate) fn searches_of(&self, fen: &str) -> usize {
        let position = format!("position fen {fen}");
        let commands = self.commands();
        commands
            .windows(2)
            .filter(|w| w[0] == position && w[1].starts_with("go"))
            .count()
    }

    pub(crate) fn search_count(&self) -> usize {
        self.commands().iter().filter(|c| c.starts_with("go")).count()
    }

    fn push(&self, line: String) {
        self.0.lock().unwrap().push(line);
    }
}

struct Script {
    info: Vec<String>,
    best_move: String,
}

/// Answers `uci`/`isready` and replays scripted `info` lines per FEN.
///
/// Unscripted positions get a single `cp 0` line at the requested depth.
/// A hanging engine never finishes a search until it receives `stop`.
#[derive(Default)]
pub(crate) struct FakeEngine {
    scripts: HashMap<String, Script>,
    hanging: bool,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(mut self, fen: &str, info: &[&str], best_move: &str) -> Self {
        self.scripts.insert(
            fen.to_string(),
            Script {
                info: info.iter().map(|s| s.to_string()).collect(),
                best_move: best_move.to_string(),
            },
        );
        self
    }

    pub(crate) fn hanging(mut self) -> Self {
        self.hanging = true;
        self
    }

    pub(crate) fn start(self) -> (EngineSession, CommandLog) {
        self.start_with(SessionOptions::default())
    }

    pub(crate) fn start_with(self, options: SessionOptions) -> (EngineSession, CommandLog) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (output_tx, output_rx) = mpsc::channel(64);
        let log = CommandLog::default();
        tokio::spawn(self.run(command_rx, output_tx, log.clone()));
        (
            EngineSession::from_channels(command_tx, output_rx, options),
            log,
        )
    }

    async fn run(
        self,
        mut commands: mpsc::Receiver<String>,
        output: mpsc::Sender<String>,
        log: CommandLog,
    ) {
        let mut fen = String::new();
        let mut searching = false;

        while let Some(line) = commands.recv().await {
            log.push(line.clone());
            let reply: Vec<String> = match GuiCommand::parse(&line) {
                Ok(GuiCommand::Uci) => vec!["id name FakeFish".into(), "uciok".into()],
                Ok(GuiCommand::IsReady) => vec!["readyok".into()],
                Ok(GuiCommand::Position { fen: f }) => {
                    fen = f;
                    Vec::new()
                }
                Ok(GuiCommand::Go { .. }) if self.hanging => {
                    searching = true;
                    Vec::new()
                }
                Ok(GuiCommand::Go { depth }) => match self.scripts.get(&fen) {
                    Some(script) => {
                        let mut reply = script.info.clone();
                        reply.push(format!("bestmove {}", script.best_move));
                        reply
                    }
                    None => vec![
                        format!("info depth {depth} multipv 1 score cp 0 pv a2a3"),
                        "bestmove a2a3".into(),
                    ],
                },
                Ok(GuiCommand::Stop) if searching => {
                    searching = false;
                    vec!["bestmove (none)".into()]
                }
                Ok(GuiCommand::Quit) => break,
                _ => Vec::new(),
            };

            for reply_line in reply {
                if output.send(reply_line).await.is_err() {
                    return;
                }
            }
        }
    }
}
