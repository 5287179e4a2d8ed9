//! Plain-text output for reviews and single-position evaluations.

use std::io::{self, Write};

use chess_analysis::classification::first_mover;
use chess_analysis::win_probability::EvaluationBar;
use chess_analysis::{Color, GameEvaluation, MoveClassification, PlayerSummary, PositionEvaluation};

/// Writes one row per played move followed by the per-side summary.
pub fn write_review<W: Write>(
    out: &mut W,
    fens: &[String],
    moves: &[String],
    review: &GameEvaluation,
) -> io::Result<()> {
    let settings = &review.settings;
    writeln!(
        out,
        "Engine: {} (depth {}, {} lines)",
        settings.engine, settings.depth, settings.multi_pv
    )?;
    writeln!(out)?;
    writeln!(out, "{:>4}  {:<12}{:>7}  {:<12}Opening", "Ply", "Move", "Eval", "Class")?;

    for (i, mv) in moves.iter().enumerate() {
        let ply = i + 1;
        let Some(position) = review.positions.get(ply) else {
            break;
        };
        let eval = position
            .top_line()
            .map(|line| line.score.label())
            .unwrap_or_else(|| "?".to_string());
        let class = position
            .classification
            .map(MoveClassification::name)
            .unwrap_or("");
        writeln!(
            out,
            "{:>4}  {:<12}{:>7}  {:<12}{}",
            ply,
            move_label(&fens[i], ply, mv),
            eval,
            class,
            position.opening.as_deref().unwrap_or("")
        )?;
    }

    writeln!(out)?;
    write_summary(out, review, first_mover(fens))
}

/// Accuracy and classification counts for both sides.
pub fn write_summary<W: Write>(
    out: &mut W,
    review: &GameEvaluation,
    first: Color,
) -> io::Result<()> {
    let white = PlayerSummary::for_side(review, Color::White, first);
    let black = PlayerSummary::for_side(review, Color::Black, first);

    writeln!(out, "{:<12}{:>8}{:>8}", "", "White", "Black")?;
    writeln!(
        out,
        "{:<12}{:>8.1}{:>8.1}",
        "Accuracy", white.accuracy, black.accuracy
    )?;
    for tag in MoveClassification::ALL {
        writeln!(
            out,
            "{:<12}{:>8}{:>8}",
            tag.name(),
            white.count(tag),
            black.count(tag)
        )?;
    }
    Ok(())
}

/// Candidate lines of one evaluation, best first.
pub fn write_lines<W: Write>(out: &mut W, evaluation: &PositionEvaluation) -> io::Result<()> {
    for line in &evaluation.lines {
        writeln!(
            out,
            "{}. depth {:>2} {:>7}  {}",
            line.multi_pv,
            line.depth,
            line.score.label(),
            line.pv.join(" ")
        )?;
    }
    Ok(())
}

/// Final summary of a single-position evaluation.
pub fn write_position<W: Write>(out: &mut W, evaluation: &PositionEvaluation) -> io::Result<()> {
    if let Some(bar) = EvaluationBar::from_evaluation(evaluation) {
        writeln!(
            out,
            "White {:.1}% [{}]",
            bar.white_percentage, bar.label
        )?;
    }
    if let Some(best) = evaluation.suggested_move() {
        writeln!(out, "Best move: {best}")?;
    }
    write_lines(out, evaluation)
}

/// "1. e2e4" for White, "1... e7e5" for Black, numbered from the FEN the
/// move was played in.
fn move_label(fen_before: &str, ply: usize, mv: &str) -> String {
    let mut fields = fen_before.split_whitespace().skip(1);
    let black = fields.next() == Some("b");
    let number = fields
        .nth(3)
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(ply.div_ceil(2));
    if black {
        format!("{number}... {mv}")
    } else {
        format!("{number}. {mv}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analysis::{Accuracy, EngineSettings, EvaluationLine, Score};

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    const AFTER_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";

    fn position(cp: i32, class: Option<MoveClassification>) -> PositionEvaluation {
        PositionEvaluation {
            lines: vec![EvaluationLine {
                pv: vec!["g1f3".to_string()],
                depth: 14,
                multi_pv: 1,
                score: Score::Centipawns(cp),
            }],
            classification: class,
            ..PositionEvaluation::default()
        }
    }

    fn review() -> GameEvaluation {
        let mut after_e4 = position(35, Some(MoveClassification::Book));
        after_e4.opening = Some("King's Pawn Opening".to_string());
        GameEvaluation {
            positions: vec![
                position(20, None),
                after_e4,
                position(-250, Some(MoveClassification::Blunder)),
            ],
            accuracy: Accuracy {
                white: 100.0,
                black: 41.5,
            },
            settings: EngineSettings {
                engine: "FakeFish".to_string(),
                depth: 14,
                multi_pv: 3,
                timestamp: chrono::Utc::now(),
            },
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_review_table() {
        let fens = vec![START.to_string(), AFTER_E4.to_string(), AFTER_E5.to_string()];
        let moves = vec!["e2e4".to_string(), "e7e5".to_string()];
        let text = render(|out| write_review(out, &fens, &moves, &review()));

        assert!(text.starts_with("Engine: FakeFish (depth 14, 3 lines)"));
        let rows: Vec<&str> = text.lines().filter(|l| l.contains("e2e4") || l.contains("e7e5")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("1. e2e4"));
        assert!(rows[0].contains("+0.35"));
        assert!(rows[0].contains("Book"));
        assert!(rows[0].ends_with("King's Pawn Opening"));
        assert!(rows[1].contains("1... e7e5"));
        assert!(rows[1].contains("-2.50"));
        assert!(rows[1].contains("Blunder"));
    }

    #[test]
    fn test_summary_counts_each_side() {
        let text = render(|out| write_summary(out, &review(), Color::White));

        let accuracy = text.lines().find(|l| l.starts_with("Accuracy")).unwrap();
        assert!(accuracy.contains("100.0"));
        assert!(accuracy.contains("41.5"));
        let book = text.lines().find(|l| l.starts_with("Book")).unwrap();
        assert_eq!(book.split_whitespace().collect::<Vec<_>>(), vec!["Book", "1", "0"]);
        let missed = text.lines().find(|l| l.starts_with("Missed Win")).unwrap();
        assert!(missed.ends_with("0       0"));
        assert_eq!(text.lines().count(), 2 + MoveClassification::ALL.len());
    }

    #[test]
    fn test_position_output() {
        let mut evaluation = position(-120, None);
        evaluation.best_move = Some("g1f3".to_string());
        evaluation.lines.push(EvaluationLine {
            pv: vec!["d2d4".to_string(), "d7d5".to_string()],
            depth: 14,
            multi_pv: 2,
            score: Score::Mate(-3),
        });

        let text = render(|out| write_position(out, &evaluation));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("White "));
        assert!(lines[0].ends_with("[1.2]"));
        assert_eq!(lines[1], "Best move: g1f3");
        assert!(lines[2].starts_with("1. depth 14"));
        assert!(lines[3].contains("-M3"));
        assert!(lines[3].ends_with("d2d4 d7d5"));
    }

    #[test]
    fn test_move_label_numbering() {
        assert_eq!(move_label(START, 1, "e2e4"), "1. e2e4");
        assert_eq!(move_label(AFTER_E4, 2, "e7e5"), "1... e7e5");
        assert_eq!(move_label(AFTER_E5, 3, "g1f3"), "2. g1f3");
        assert_eq!(move_label("garbage", 5, "a2a3"), "3. a2a3");
    }
}
