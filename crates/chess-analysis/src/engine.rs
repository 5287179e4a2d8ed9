//! Session with an external UCI engine.
//!
//! The session owns one engine reachable only through a pair of line
//! channels. [`EngineSession::spawn`] bridges a child process's stdin/stdout
//! to those channels; [`EngineSession::from_channels`] accepts any other
//! transport.
//!
//! ```text
//! Uninitialized -> Initializing -> Ready <-> Searching -> ShuttingDown -> Terminated
//! ```

use std::io;
use std::ops::RangeInclusive;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};
use uci::{EngineMessage, GuiCommand};

use crate::evaluation::PositionEvaluation;
use crate::lines::LineAccumulator;

/// Line count configured during [`EngineSession::initialize`].
pub const DEFAULT_MULTI_PV: u32 = 3;
pub const MULTI_PV_RANGE: RangeInclusive<u32> = 2..=6;
pub const SKILL_LEVEL_RANGE: RangeInclusive<u32> = 0..=20;

const CHANNEL_CAPACITY: usize = 100;
const EXIT_GRACE: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to start engine: {0}")]
    Spawn(#[from] io::Error),
    #[error("engine executable not found: {0}")]
    NotFound(String),
    #[error("engine is not ready (state: {0:?})")]
    NotReady(SessionState),
    #[error("invalid engine configuration: {0}")]
    Configuration(String),
    #[error("engine output stream closed")]
    Disconnected,
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Searching,
    ShuttingDown,
    Terminated,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Bound on every `uciok`/`readyok` wait.
    pub handshake_timeout: Duration,
    /// Extra `setoption` pairs applied once during initialization.
    pub init_options: Vec<(String, String)>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_secs(10),
            init_options: Vec::new(),
        }
    }
}

/// One engine instance. Searches take `&mut self`, so at most one is in
/// flight at a time.
pub struct EngineSession {
    commands: mpsc::Sender<String>,
    output: mpsc::Receiver<String>,
    child: Option<Child>,
    name: String,
    state: watch::Sender<SessionState>,
    multi_pv: u32,
    skill_level: Option<u32>,
    options: SessionOptions,
}

impl EngineSession {
    /// Launches `program` and connects to its stdin/stdout.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        program: &str,
        args: &[String],
        options: SessionOptions,
    ) -> Result<Self, EngineError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => EngineError::NotFound(program.to_string()),
                _ => EngineError::Spawn(e),
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("engine stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("engine stdout unavailable"))?;

        let (command_tx, mut command_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
        let (output_tx, output_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            while let Some(cmd) = command_rx.recv().await {
                if stdin.write_all(cmd.as_bytes()).await.is_err()
                    || stdin.write_all(b"\n").await.is_err()
                    || stdin.flush().await.is_err()
                {
                    break;
                }
            }
        });

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if output_tx.send(line).await.is_err() {
                    break;
                }
            }
        });

        debug!(program, "engine process started");
        let mut session = Self::from_channels(command_tx, output_rx, options);
        session.child = Some(child);
        Ok(session)
    }

    /// Builds a session over an existing transport: `commands` receives one
    /// protocol line per message, `output` yields the engine's lines.
    pub fn from_channels(
        commands: mpsc::Sender<String>,
        output: mpsc::Receiver<String>,
        options: SessionOptions,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            commands,
            output,
            child: None,
            name: String::from("Unknown Engine"),
            state,
            multi_pv: DEFAULT_MULTI_PV,
            skill_level: None,
            options,
        }
    }

    /// Engine identity from `id name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn multi_pv(&self) -> u32 {
        self.multi_pv
    }

    pub fn skill_level(&self) -> Option<u32> {
        self.skill_level
    }

    /// Handle that can stop a running search from another task.
    pub fn canceller(&self) -> SearchCanceller {
        SearchCanceller {
            commands: self.commands.clone(),
            state: self.state.subscribe(),
            timeout: self.options.handshake_timeout,
        }
    }

    /// Performs the UCI handshake and applies the default configuration.
    ///
    /// A no-op on a session that is already initialized.
    pub async fn initialize(&mut self) -> Result<(), EngineError> {
        match self.state() {
            SessionState::Uninitialized => {}
            SessionState::Ready | SessionState::Searching => return self.ready().await,
            other => return Err(EngineError::NotReady(other)),
        }

        self.set_state(SessionState::Initializing);
        match self.handshake().await {
            Ok(()) => {
                self.set_state(SessionState::Ready);
                info!(engine = %self.name, multi_pv = self.multi_pv, "engine ready");
                Ok(())
            }
            Err(e) => {
                if self.state() == SessionState::Initializing {
                    self.set_state(SessionState::Uninitialized);
                }
                Err(e)
            }
        }
    }

    async fn handshake(&mut self) -> Result<(), EngineError> {
        self.send(GuiCommand::Uci).await?;
        let name = timeout(self.options.handshake_timeout, self.read_identity())
            .await
            .map_err(|_| EngineError::Timeout("uciok"))??;
        if let Some(name) = name {
            self.name = name;
        }

        self.send(GuiCommand::set_option("MultiPV", DEFAULT_MULTI_PV))
            .await?;
        self.sync().await?;
        self.multi_pv = DEFAULT_MULTI_PV;

        if !self.options.init_options.is_empty() {
            for (name, value) in self.options.init_options.clone() {
                self.send(GuiCommand::set_option(name, value)).await?;
            }
            self.sync().await?;
        }
        Ok(())
    }

    async fn read_identity(&mut self) -> Result<Option<String>, EngineError> {
        let mut name = None;
        loop {
            let line = self.next_line().await?;
            match EngineMessage::parse(&line) {
                Some(EngineMessage::Id { name: Some(n), .. }) => name = Some(n),
                Some(EngineMessage::UciOk) => return Ok(name),
                _ => trace!(line = %line, "handshake output"),
            }
        }
    }

    /// Sets the number of candidate lines (2-6).
    pub async fn configure_lines(&mut self, lines: u32) -> Result<(), EngineError> {
        self.ensure_initialized()?;
        if !MULTI_PV_RANGE.contains(&lines) {
            return Err(EngineError::Configuration(format!(
                "MultiPV must be in {}..={}, got {}",
                MULTI_PV_RANGE.start(),
                MULTI_PV_RANGE.end(),
                lines
            )));
        }
        if lines == self.multi_pv {
            return Ok(());
        }

        self.ready().await?;
        self.send(GuiCommand::set_option("MultiPV", lines)).await?;
        self.sync().await?;
        self.multi_pv = lines;
        debug!(multi_pv = lines, "configured line count");
        Ok(())
    }

    /// Sets the engine's playing strength (0-20).
    pub async fn configure_strength(&mut self, level: u32) -> Result<(), EngineError> {
        self.ensure_initialized()?;
        if !SKILL_LEVEL_RANGE.contains(&level) {
            return Err(EngineError::Configuration(format!(
                "Skill Level must be in {}..={}, got {}",
                SKILL_LEVEL_RANGE.start(),
                SKILL_LEVEL_RANGE.end(),
                level
            )));
        }
        if self.skill_level == Some(level) {
            return Ok(());
        }

        self.ready().await?;
        self.send(GuiCommand::set_option("Skill Level", level))
            .await?;
        self.sync().await?;
        self.skill_level = Some(level);
        debug!(level, "configured skill level");
        Ok(())
    }

    /// Tells the engine that following searches belong to a new game.
    pub async fn new_game(&mut self) -> Result<(), EngineError> {
        self.ready().await?;
        self.send(GuiCommand::UciNewGame).await?;
        self.sync().await
    }

    /// Searches `fen` to `depth`.
    ///
    /// Every `info` line that changes a candidate line produces a snapshot
    /// passed to `on_partial`, in arrival order. Resolves on `bestmove`.
    pub async fn evaluate<F>(
        &mut self,
        fen: &str,
        depth: u32,
        mut on_partial: F,
    ) -> Result<PositionEvaluation, EngineError>
    where
        F: FnMut(&PositionEvaluation),
    {
        self.ready().await?;

        let white_to_move = fen.split_whitespace().nth(1) != Some("b");
        self.send(GuiCommand::position_fen(fen)).await?;
        self.send(GuiCommand::Go { depth }).await?;
        self.set_state(SessionState::Searching);

        let mut lines = LineAccumulator::new(white_to_move);
        loop {
            let line = self.next_line().await?;
            match EngineMessage::parse(&line) {
                Some(EngineMessage::Info(info)) => {
                    if lines.push(&info) {
                        on_partial(&lines.snapshot());
                    } else {
                        trace!(line = %line, "info line without usable score");
                    }
                }
                Some(EngineMessage::BestMove { mv, .. }) => {
                    lines.set_best_move(mv);
                    break;
                }
                _ => trace!(line = %line, "ignoring engine output"),
            }
        }

        self.set_state(SessionState::Ready);
        let evaluation = lines.finish();
        debug!(
            fen,
            depth = evaluation.depth(),
            lines = evaluation.lines.len(),
            "search finished"
        );
        Ok(evaluation)
    }

    /// Stops any running search and drains its output.
    ///
    /// The result of an abandoned search is discarded.
    pub async fn cancel(&mut self) -> Result<(), EngineError> {
        self.ensure_initialized()?;
        self.stop_search().await
    }

    /// Sends `quit` and releases the engine process.
    pub async fn shutdown(&mut self) {
        if self.state() == SessionState::Terminated {
            return;
        }
        self.set_state(SessionState::ShuttingDown);
        let _ = self.commands.send(GuiCommand::Quit.to_uci()).await;

        if let Some(mut child) = self.child.take() {
            if timeout(EXIT_GRACE, child.wait()).await.is_err() {
                warn!("engine did not exit after quit, killing it");
                let _ = child.kill().await;
            }
        }
        self.set_state(SessionState::Terminated);
        info!(engine = %self.name, "engine session terminated");
    }

    fn ensure_initialized(&self) -> Result<(), EngineError> {
        match self.state() {
            SessionState::Ready | SessionState::Searching => Ok(()),
            other => Err(EngineError::NotReady(other)),
        }
    }

    /// Brings the session to `Ready`, recovering a search left behind by a
    /// dropped future.
    async fn ready(&mut self) -> Result<(), EngineError> {
        match self.state() {
            SessionState::Ready => Ok(()),
            SessionState::Searching => {
                debug!("recovering from an abandoned search");
                self.stop_search().await
            }
            other => Err(EngineError::NotReady(other)),
        }
    }

    async fn stop_search(&mut self) -> Result<(), EngineError> {
        self.send(GuiCommand::Stop).await?;
        self.sync().await?;
        self.set_state(SessionState::Ready);
        Ok(())
    }

    /// `isready` round trip; anything before `readyok` is stale and dropped.
    async fn sync(&mut self) -> Result<(), EngineError> {
        self.send(GuiCommand::IsReady).await?;
        timeout(self.options.handshake_timeout, async {
            loop {
                let line = self.next_line().await?;
                if EngineMessage::parse(&line) == Some(EngineMessage::ReadyOk) {
                    return Ok::<(), EngineError>(());
                }
                trace!(line = %line, "draining engine output");
            }
        })
        .await
        .map_err(|_| EngineError::Timeout("readyok"))?
    }

    async fn send(&mut self, command: GuiCommand) -> Result<(), EngineError> {
        let line = command.to_uci();
        debug!(command = %line, "-> engine");
        if self.commands.send(line).await.is_err() {
            self.set_state(SessionState::Terminated);
            return Err(EngineError::Disconnected);
        }
        Ok(())
    }

    async fn next_line(&mut self) -> Result<String, EngineError> {
        match self.output.recv().await {
            Some(line) => Ok(line),
            None => {
                self.set_state(SessionState::Terminated);
                Err(EngineError::Disconnected)
            }
        }
    }

    fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if self.state() != SessionState::Terminated {
            let _ = self.commands.try_send(GuiCommand::Quit.to_uci());
        }
    }
}

/// Stops a session's running search from outside the session.
#[derive(Clone)]
pub struct SearchCanceller {
    commands: mpsc::Sender<String>,
    state: watch::Receiver<SessionState>,
    timeout: Duration,
}

impl SearchCanceller {
    /// Sends `stop` and waits until the session has left `Searching`.
    ///
    /// Returns immediately if no search is running. The session only leaves
    /// `Searching` while its `evaluate` future is being polled.
    pub async fn cancel(&self) -> Result<(), EngineError> {
        if *self.state.borrow() != SessionState::Searching {
            return Ok(());
        }
        self.commands
            .send(GuiCommand::Stop.to_uci())
            .await
            .map_err(|_| EngineError::Disconnected)?;

        let mut state = self.state.clone();
        timeout(self.timeout, state.wait_for(|s| *s != SessionState::Searching))
            .await
            .map_err(|_| EngineError::Timeout("search to stop"))?
            .map_err(|_| EngineError::Disconnected)?;
        Ok(())
    }
}
