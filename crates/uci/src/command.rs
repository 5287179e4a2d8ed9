//! Commands sent from GUI to engine.

use crate::UciError;

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set an engine option.
    SetOption { name: String, value: Option<String> },
    /// Next search belongs to a different game.
    UciNewGame,
    /// Set up the position to search.
    Position { fen: String },
    /// Search to a fixed depth.
    Go { depth: u32 },
    /// Stop calculating.
    Stop,
    /// Quit the engine.
    Quit,
}

impl GuiCommand {
    /// Shorthand for `setoption name <name> value <value>`.
    pub fn set_option(name: impl Into<String>, value: impl ToString) -> Self {
        GuiCommand::SetOption {
            name: name.into(),
            value: Some(value.to_string()),
        }
    }

    /// Shorthand for `position fen <fen>`.
    pub fn position_fen(fen: impl Into<String>) -> Self {
        GuiCommand::Position { fen: fen.into() }
    }

    /// Format as a single protocol line, without the trailing newline.
    pub fn to_uci(&self) -> String {
        match self {
            GuiCommand::Uci => "uci".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::SetOption { name, value } => match value {
                Some(v) => format!("setoption name {} value {}", name, v),
                None => format!("setoption name {}", name),
            },
            GuiCommand::UciNewGame => "ucinewgame".to_string(),
            GuiCommand::Position { fen } => format!("position fen {}", fen),
            GuiCommand::Go { depth } => format!("go depth {}", depth),
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::Quit => "quit".to_string(),
        }
    }

    /// Parse a command line as an engine would read it.
    pub fn parse(input: &str) -> Result<Self, UciError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        match parts.next().unwrap_or("") {
            "uci" => Ok(GuiCommand::Uci),
            "isready" => Ok(GuiCommand::IsReady),
            "ucinewgame" => Ok(GuiCommand::UciNewGame),
            "stop" => Ok(GuiCommand::Stop),
            "quit" => Ok(GuiCommand::Quit),
            "setoption" => Self::parse_setoption(parts),
            "position" => Self::parse_position(parts),
            "go" => Self::parse_go(parts),
            _ => Err(UciError::InvalidCommand(input.to_string())),
        }
    }

    fn parse_setoption<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        if parts.next() != Some("name") {
            return Err(UciError::InvalidCommand(
                "setoption without 'name'".to_string(),
            ));
        }

        // Option names may contain spaces ("Skill Level").
        let mut name = Vec::new();
        let mut value = Vec::new();
        let mut in_value = false;
        for part in parts {
            if !in_value && part == "value" {
                in_value = true;
            } else if in_value {
                value.push(part);
            } else {
                name.push(part);
            }
        }

        if name.is_empty() {
            return Err(UciError::InvalidCommand(
                "setoption with empty name".to_string(),
            ));
        }

        Ok(GuiCommand::SetOption {
            name: name.join(" "),
            value: in_value.then(|| value.join(" ")),
        })
    }

    fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        if parts.next() != Some("fen") {
            return Err(UciError::ParseError("Expected 'fen'".to_string()));
        }
        let fen: Vec<&str> = parts.collect();
        if fen.is_empty() {
            return Err(UciError::ParseError("Empty FEN".to_string()));
        }
        Ok(GuiCommand::Position { fen: fen.join(" ") })
    }

    fn parse_go<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        match (parts.next(), parts.next().and_then(|d| d.parse().ok())) {
            (Some("depth"), Some(depth)) => Ok(GuiCommand::Go { depth }),
            _ => Err(UciError::ParseError("Expected 'go depth <n>'".to_string())),
        }
    }
}
