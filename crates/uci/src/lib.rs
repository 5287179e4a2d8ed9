//! UCI (Universal Chess Interface) protocol types, seen from the GUI side.
//!
//! A review tool drives an engine by formatting [`GuiCommand`]s and parsing
//! the lines the engine writes back into [`EngineMessage`]s.
//!
//! # Commands sent to the engine
//!
//! - `uci` / `uciok` - Handshake, engine replies with `id` lines first
//! - `setoption name <id> value <x>` - Configure MultiPV, Skill Level, ...
//! - `isready` / `readyok` - Synchronization
//! - `ucinewgame` - Reset engine state between games
//! - `position fen <fen>` - Set position
//! - `go depth <d>` - Start search
//! - `stop` - Stop search
//! - `quit` - Exit engine

mod command;
mod info;

pub use command::GuiCommand;
pub use info::{Bound, EngineInfo, InfoBuilder, Score};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id { name: Option<String>, author: Option<String> },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Search finished. `mv` is `None` for `bestmove (none)`.
    BestMove { mv: Option<String>, ponder: Option<String> },
    /// Option declaration, only the name is kept.
    Option { name: String },
}

impl EngineMessage {
    /// Parse one line of engine output.
    ///
    /// Returns `None` for anything that isn't a known message; engines are
    /// free to print banners and debug chatter.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next()? {
            "uciok" => Some(EngineMessage::UciOk),
            "readyok" => Some(EngineMessage::ReadyOk),
            "info" => EngineInfo::parse(line).map(EngineMessage::Info),
            "id" => {
                let field = parts.next()?;
                let value = parts.collect::<Vec<_>>().join(" ");
                match field {
                    "name" => Some(EngineMessage::Id { name: Some(value), author: None }),
                    "author" => Some(EngineMessage::Id { name: None, author: Some(value) }),
                    _ => None,
                }
            }
            "bestmove" => {
                let mv = parts.next()?;
                let ponder = match (parts.next(), parts.next()) {
                    (Some("ponder"), Some(p)) => Some(p.to_string()),
                    _ => None,
                };
                let mv = match mv {
                    "(none)" | "0000" => None,
                    other => Some(other.to_string()),
                };
                Some(EngineMessage::BestMove { mv, ponder })
            }
            "option" => {
                // option name <words...> type <t> ...
                if parts.next()? != "name" {
                    return None;
                }
                let name: Vec<&str> = parts.take_while(|p| *p != "type").collect();
                if name.is_empty() {
                    return None;
                }
                Some(EngineMessage::Option { name: name.join(" ") })
            }
            _ => None,
        }
    }

    /// Format message for output.
    pub fn to_uci(&self) -> String {
        match self {
            EngineMessage::Id { name, author } => {
                let mut parts = Vec::new();
                if let Some(n) = name {
                    parts.push(format!("id name {}", n));
                }
                if let Some(a) = author {
                    parts.push(format!("id author {}", a));
                }
                parts.join("\n")
            }
            EngineMessage::UciOk => "uciok".to_string(),
            EngineMessage::ReadyOk => "readyok".to_string(),
            EngineMessage::Info(info) => info.to_uci(),
            EngineMessage::BestMove { mv, ponder } => {
                let mv = mv.as_deref().unwrap_or("(none)");
                match ponder {
                    Some(p) => format!("bestmove {} ponder {}", mv, p),
                    None => format!("bestmove {}", mv),
                }
            }
            EngineMessage::Option { name } => format!("option name {} type string", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_handshake_lines() {
        assert_eq!(EngineMessage::parse("uciok"), Some(EngineMessage::UciOk));
        assert_eq!(EngineMessage::parse("readyok\r\n"), Some(EngineMessage::ReadyOk));
        assert_eq!(
            EngineMessage::parse("id name Stockfish 16.1"),
            Some(EngineMessage::Id {
                name: Some("Stockfish 16.1".to_string()),
                author: None
            })
        );
    }

    #[test]
    fn parse_bestmove() {
        assert_eq!(
            EngineMessage::parse("bestmove e2e4 ponder e7e5"),
            Some(EngineMessage::BestMove {
                mv: Some("e2e4".to_string()),
                ponder: Some("e7e5".to_string())
            })
        );
        assert_eq!(
            EngineMessage::parse("bestmove (none)"),
            Some(EngineMessage::BestMove { mv: None, ponder: None })
        );
    }

    #[test]
    fn parse_option_name() {
        assert_eq!(
            EngineMessage::parse("option name Skill Level type spin default 20 min 0 max 20"),
            Some(EngineMessage::Option {
                name: "Skill Level".to_string()
            })
        );
    }

    #[test]
    fn unknown_lines_are_ignored() {
        assert_eq!(EngineMessage::parse(""), None);
        assert_eq!(EngineMessage::parse("Stockfish 16 by the Stockfish developers"), None);
        assert_eq!(EngineMessage::parse("bestmove"), None);
    }

    #[test]
    fn bestmove_round_trips_through_to_uci() {
        let msg = EngineMessage::BestMove {
            mv: Some("g1f3".to_string()),
            ponder: None,
        };
        assert_eq!(EngineMessage::parse(&msg.to_uci()), Some(msg));
    }
}
