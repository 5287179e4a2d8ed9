//! UCI info line types.

use serde::{Deserialize, Serialize};

/// Score in centipawns or mate distance, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawn score (100 = 1 pawn advantage).
    Cp(i32),
    /// Mate in N moves (positive = side to move mates, negative = gets mated).
    Mate(i32),
}

/// Marks a score as only a bound on the true value (aspiration window fail).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// Search information from engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineInfo {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// Selective search depth.
    pub seldepth: Option<u32>,
    /// Rank of this line when searching several (1 = best).
    pub multipv: Option<u32>,
    /// Score evaluation.
    pub score: Option<Score>,
    /// Set when the score is a `lowerbound`/`upperbound`.
    pub bound: Option<Bound>,
    /// Nodes searched.
    pub nodes: Option<u64>,
    /// Nodes per second.
    pub nps: Option<u64>,
    /// Time spent in milliseconds.
    pub time: Option<u64>,
    /// Principal variation (best line found).
    pub pv: Vec<String>,
    /// Arbitrary string info.
    pub string: Option<String>,
}

impl EngineInfo {
    /// Create a new empty info.
    pub fn new() -> Self {
        Self::default()
    }

    /// Format as UCI info string.
    pub fn to_uci(&self) -> String {
        let mut parts = vec!["info".to_string()];

        if let Some(d) = self.depth {
            parts.push(format!("depth {}", d));
        }
        if let Some(d) = self.seldepth {
            parts.push(format!("seldepth {}", d));
        }
        if let Some(k) = self.multipv {
            parts.push(format!("multipv {}", k));
        }
        if let Some(s) = self.score {
            match s {
                Score::Cp(cp) => parts.push(format!("score cp {}", cp)),
                Score::Mate(m) => parts.push(format!("score mate {}", m)),
            }
            match self.bound {
                Some(Bound::Lower) => parts.push("lowerbound".to_string()),
                Some(Bound::Upper) => parts.push("upperbound".to_string()),
                None => {}
            }
        }
        if let Some(n) = self.nodes {
            parts.push(format!("nodes {}", n));
        }
        if let Some(n) = self.nps {
            parts.push(format!("nps {}", n));
        }
        if let Some(t) = self.time {
            parts.push(format!("time {}", t));
        }
        if !self.pv.is_empty() {
            parts.push(format!("pv {}", self.pv.join(" ")));
        }
        if let Some(ref s) = self.string {
            parts.push(format!("string {}", s));
        }

        parts.join(" ")
    }

    /// Parse UCI info line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.first() != Some(&"info") {
            return None;
        }

        let mut info = EngineInfo::new();
        let mut i = 1; // Skip "info"

        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    i += 1;
                    if i < parts.len() {
                        info.depth = parts[i].parse().ok();
                    }
                }
                "seldepth" => {
                    i += 1;
                    if i < parts.len() {
                        info.seldepth = parts[i].parse().ok();
                    }
                }
                "multipv" => {
                    i += 1;
                    if i < parts.len() {
                        info.multipv = parts[i].parse().ok();
                    }
                }
                "score" => {
                    i += 1;
                    if i + 1 < parts.len() {
                        let value = parts[i + 1].parse().ok();
                        info.score = match (parts[i], value) {
                            ("cp", Some(cp)) => Some(Score::Cp(cp)),
                            ("mate", Some(m)) => Some(Score::Mate(m)),
                            _ => None,
                        };
                        i += 1;
                    }
                }
                "lowerbound" => info.bound = Some(Bound::Lower),
                "upperbound" => info.bound = Some(Bound::Upper),
                "nodes" => {
                    i += 1;
                    if i < parts.len() {
                        info.nodes = parts[i].parse().ok();
                    }
                }
                "nps" => {
                    i += 1;
                    if i < parts.len() {
                        info.nps = parts[i].parse().ok();
                    }
                }
                "time" => {
                    i += 1;
                    if i < parts.len() {
                        info.time = parts[i].parse().ok();
                    }
                }
                "pv" => {
                    i += 1;
                    // Collect all remaining moves until another keyword or end
                    while i < parts.len() && !is_info_keyword(parts[i]) {
                        info.pv.push(parts[i].to_string());
                        i += 1;
                    }
                    continue; // Don't increment i again
                }
                "string" => {
                    // Rest of line is the string
                    info.string = Some(parts[i + 1..].join(" "));
                    break;
                }
                _ => {}
            }
            i += 1;
        }

        Some(info)
    }
}

fn is_info_keyword(s: &str) -> bool {
    matches!(
        s,
        "depth"
            | "seldepth"
            | "multipv"
            | "score"
            | "nodes"
            | "nps"
            | "time"
            | "pv"
            | "currmove"
            | "currmovenumber"
            | "hashfull"
            | "tbhits"
            | "string"
    )
}

/// Builder for constructing EngineInfo.
#[derive(Default)]
pub struct InfoBuilder {
    info: EngineInfo,
}

impl InfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, d: u32) -> Self {
        self.info.depth = Some(d);
        self
    }

    pub fn multipv(mut self, k: u32) -> Self {
        self.info.multipv = Some(k);
        self
    }

    pub fn score_cp(mut self, cp: i32) -> Self {
        self.info.score = Some(Score::Cp(cp));
        self
    }

    pub fn score_mate(mut self, moves: i32) -> Self {
        self.info.score = Some(Score::Mate(moves));
        self
    }

    pub fn bound(mut self, bound: Bound) -> Self {
        self.info.bound = Some(bound);
        self
    }

    pub fn nodes(mut self, n: u64) -> Self {
        self.info.nodes = Some(n);
        self
    }

    pub fn pv<S: Into<String>>(mut self, moves: impl IntoIterator<Item = S>) -> Self {
        self.info.pv = moves.into_iter().map(Into::into).collect();
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        self.info.string = Some(s.to_string());
        self
    }

    pub fn build(self) -> EngineInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_to_uci() {
        let info = InfoBuilder::new()
            .depth(10)
            .multipv(2)
            .score_cp(35)
            .nodes(50000)
            .pv(["e2e4", "e7e5"])
            .build();

        let uci = info.to_uci();
        assert!(uci.contains("depth 10"));
        assert!(uci.contains("multipv 2"));
        assert!(uci.contains("score cp 35"));
        assert!(uci.contains("pv e2e4 e7e5"));
    }

    #[test]
    fn parse_stockfish_multipv_line() {
        let line = "info depth 18 seldepth 24 multipv 2 score cp -31 nodes 1212345 \
                    nps 1500000 hashfull 402 tbhits 0 time 808 pv e7e5 g1f3 b8c6";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.depth, Some(18));
        assert_eq!(info.seldepth, Some(24));
        assert_eq!(info.multipv, Some(2));
        assert_eq!(info.score, Some(Score::Cp(-31)));
        assert_eq!(info.bound, None);
        assert_eq!(info.time, Some(808));
        assert_eq!(info.pv, vec!["e7e5", "g1f3", "b8c6"]);
    }

    #[test]
    fn parse_mate_score() {
        let info = EngineInfo::parse("info depth 20 score mate -3 pv e2e4").unwrap();
        assert_eq!(info.score, Some(Score::Mate(-3)));
    }

    #[test]
    fn parse_bound_flag() {
        let info = EngineInfo::parse("info depth 9 score cp 41 upperbound nodes 10 pv d2d4").unwrap();
        assert_eq!(info.score, Some(Score::Cp(41)));
        assert_eq!(info.bound, Some(Bound::Upper));
        assert_eq!(info.nodes, Some(10));
    }

    #[test]
    fn parse_string_consumes_rest() {
        let info = EngineInfo::parse("info string NNUE evaluation using nn-b1a57edbea57.nnue").unwrap();
        assert_eq!(
            info.string.as_deref(),
            Some("NNUE evaluation using nn-b1a57edbea57.nnue")
        );
        assert_eq!(info.depth, None);
    }

    #[test]
    fn non_info_line_is_rejected() {
        assert!(EngineInfo::parse("information").is_none());
        assert!(EngineInfo::parse("bestmove e2e4").is_none());
    }
}
