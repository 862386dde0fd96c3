#![allow(clippy::module_name_repetitions)]

use std::{
    fmt::{self, Display},
    fs::File,
    io::{BufRead, BufReader},
    ops::AddAssign,
    path::Path,
    time::Instant,
};

use anyhow::{Context, bail};

use crate::chess::{board::Board, chessmove::Move, types::File as BoardFile};

/// The six standard perft positions, plus a queen-heavy stress position.
pub const BENCH_POSITIONS: [&str; 7] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    // 218-ish legal moves, most of them queen moves.
    "R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1",
];

pub fn perft(pos: &Board, depth: usize) -> u64 {
    #[cfg(debug_assertions)]
    if let Err(e) = pos.check_validity() {
        panic!("invalid position reached in perft: {e}\n{pos:X}");
    }

    if depth == 0 {
        return 1;
    }

    let ml = pos.legal_moves();
    if depth == 1 {
        return ml.len() as u64;
    }

    ml.iter().map(|&m| perft(&pos.make_move(m), depth - 1)).sum()
}

/// Leaf statistics in the usual perft-table layout. Every counter other
/// than `nodes` classifies the move that reached each leaf.
///
/// A check is *discovered* when the piece that just moved is not among the
/// checkers. A double check involving the moved piece is counted as a double
/// check only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub discovered_checks: u64,
    pub double_checks: u64,
    pub checkmates: u64,
}

impl AddAssign for PerftStats {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.discovered_checks += rhs.discovered_checks;
        self.double_checks += rhs.double_checks;
        self.checkmates += rhs.checkmates;
    }
}

impl PerftStats {
    fn record(&mut self, pos: &Board, m: Move, next: &Board) {
        self.nodes += 1;
        if pos.is_capture(m) {
            self.captures += 1;
        }
        if pos.is_ep(m) {
            self.en_passant += 1;
        }
        let castle = pos.is_castle(m);
        if castle {
            self.castles += 1;
        }
        if m.is_promo() {
            self.promotions += 1;
        }

        let Some(king) = next.king_sq(next.turn()) else {
            return;
        };
        let checkers = next.attackers(king, pos.turn());
        if checkers.is_empty() {
            return;
        }
        self.checks += 1;
        // the square the moving piece ends up on; for castling, the rook's.
        let landed = if castle {
            let file = if m.to().file() > m.from().file() { BoardFile::F } else { BoardFile::D };
            file.with(m.from().rank())
        } else {
            m.to()
        };
        if !checkers.contains(&landed) {
            self.discovered_checks += 1;
        }
        if checkers.len() > 1 {
            self.double_checks += 1;
        }
        if !next.has_legal_moves() {
            self.checkmates += 1;
        }
    }
}

impl Display for PerftStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:             {}", self.nodes)?;
        writeln!(f, "captures:          {}", self.captures)?;
        writeln!(f, "en passant:        {}", self.en_passant)?;
        writeln!(f, "castles:           {}", self.castles)?;
        writeln!(f, "promotions:        {}", self.promotions)?;
        writeln!(f, "checks:            {}", self.checks)?;
        writeln!(f, "discovered checks: {}", self.discovered_checks)?;
        writeln!(f, "double checks:     {}", self.double_checks)?;
        write!(f, "checkmates:        {}", self.checkmates)
    }
}

pub fn perft_stats(pos: &Board, depth: usize) -> PerftStats {
    let mut stats = PerftStats::default();
    if depth == 0 {
        stats.nodes = 1;
        return stats;
    }
    for &m in &pos.legal_moves() {
        let next = pos.make_move(m);
        if depth == 1 {
            stats.record(pos, m, &next);
        } else {
            stats += perft_stats(&next, depth - 1);
        }
    }
    stats
}

/// Node counts below each root move, in generation order.
pub fn divide(pos: &Board, depth: usize) -> Vec<(Move, u64)> {
    let depth = depth.max(1);
    pos.legal_moves().iter().map(|&m| (m, perft(&pos.make_move(m), depth - 1))).collect()
}

/// [`perft`] with the root moves split across `threads` scoped threads.
pub fn parallel_perft(pos: &Board, depth: usize, threads: usize) -> u64 {
    if depth < 2 || threads < 2 {
        return perft(pos, depth);
    }
    let ml = pos.legal_moves();
    if ml.is_empty() {
        return 0;
    }
    let chunk_size = ml.len().div_ceil(threads);
    std::thread::scope(|s| {
        let handles = ml
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move || chunk.iter().map(|&m| perft(&pos.make_move(m), depth - 1)).sum::<u64>())
            })
            .collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e))).sum()
    })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// One line of a perft EPD file: `<fen> ;D1 20 ;D2 400 ...`.
fn parse_suite_line(line: &str) -> anyhow::Result<(&str, Vec<(usize, u64)>)> {
    let mut parts = line.split(';');
    let fen = parts.next().map(str::trim).unwrap_or_default();
    let mut expectations = Vec::new();
    for depth_part in parts {
        let depth_part = depth_part.trim();
        let (d, nodes) = depth_part
            .split_once(' ')
            .with_context(|| format!("malformed depth entry \"{depth_part}\""))?;
        let d = d
            .strip_prefix('D')
            .with_context(|| format!("depth entry \"{d}\" does not start with 'D'"))?
            .parse::<usize>()
            .with_context(|| format!("bad depth in \"{depth_part}\""))?;
        let nodes = nodes.trim().parse::<u64>().with_context(|| format!("bad node count in \"{depth_part}\""))?;
        expectations.push((d, nodes));
    }
    Ok((fen, expectations))
}

/// Runs every position of a perft EPD file, skipping depths whose expected
/// node count exceeds `node_limit`.
pub fn gamut(path: &Path, node_limit: u64, threads: usize) -> anyhow::Result<SuiteReport> {
    println!("running perft on {}", path.display());
    let f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut report = SuiteReport::default();
    for line in BufReader::new(f).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (fen, expectations) = parse_suite_line(&line)?;
        let pos = Board::from_fen(fen).with_context(|| format!("bad FEN in suite: \"{fen}\""))?;
        for (d, nodes) in expectations {
            if nodes > node_limit {
                tracing::debug!(fen, depth = d, nodes, "over node limit");
                println!("Skipping...");
                report.skipped += 1;
                continue;
            }
            let perft_nodes = parallel_perft(&pos, d, threads);
            if perft_nodes == nodes {
                println!("PASS: fen {fen}, depth {d}");
                report.passed += 1;
            } else {
                println!("FAIL: fen {fen}, depth {d}: expected {nodes}, got {perft_nodes}");
                tracing::warn!(fen, depth = d, expected = nodes, got = perft_nodes, "perft mismatch");
                report.failed += 1;
            }
        }
    }
    tracing::info!(passed = report.passed, failed = report.failed, skipped = report.skipped, "suite finished");
    Ok(report)
}

/// Generates legal moves for every bench position `iterations` times and
/// returns the throughput in moves per second.
pub fn bench(iterations: usize) -> anyhow::Result<f64> {
    let positions = BENCH_POSITIONS
        .iter()
        .map(|fen| Board::from_fen(fen).with_context(|| format!("bad bench FEN \"{fen}\"")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if iterations == 0 {
        bail!("bench needs at least one iteration");
    }

    let start = Instant::now();
    let mut total_moves = 0u64;
    for _ in 0..iterations {
        for pos in &positions {
            total_moves += pos.legal_moves().len() as u64;
        }
    }
    let elapsed = start.elapsed().as_secs_f64();

    #[allow(clippy::cast_precision_loss)]
    let mps = total_moves as f64 / elapsed.max(f64::EPSILON);
    tracing::info!(total_moves, elapsed, "bench finished");
    println!("{total_moves} moves generated in {elapsed:.3}s ({mps:.0} moves/s)");
    Ok(mps)
}

/// The legal moves of `pos`, formatted one per line as `<san> <uci> <fen after>`.
pub fn describe_moves(pos: &Board) -> Vec<String> {
    pos.legal_moves()
        .iter()
        .filter_map(|&m| {
            let san = pos.san(m)?;
            Some(format!("{san} {} {}", pos.uci(m), pos.make_move(m)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde::Deserialize;

    use super::*;
    use crate::chess::{board::STARTING_FEN, types::Square};

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    const POSITION_6: &str = "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

    fn stats(nodes: u64, caps: u64, ep: u64, castles: u64, promos: u64, checks: u64, mates: u64) -> PerftStats {
        PerftStats {
            nodes,
            captures: caps,
            en_passant: ep,
            castles,
            promotions: promos,
            checks,
            checkmates: mates,
            ..PerftStats::default()
        }
    }

    /// Compares everything except the discovered/double check split.
    fn assert_stats(fen: &str, depth: usize, expected: PerftStats) {
        let pos = Board::from_fen(fen).unwrap();
        let got = perft_stats(&pos, depth);
        let got = PerftStats { discovered_checks: 0, double_checks: 0, ..got };
        assert_eq!(got, expected, "{fen} at depth {depth}");
    }

    #[test]
    fn perft_start_position() {
        let pos = Board::default();
        assert_eq!(perft(&pos, 0), 1);
        assert_eq!(perft(&pos, 1), 20, "got {}", {
            pos.legal_moves().iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        });
        assert_eq!(perft(&pos, 2), 400);
        assert_eq!(perft(&pos, 3), 8_902);
    }

    #[test]
    #[ignore = "slow in debug builds"]
    fn perft_start_position_deep() {
        let pos = Board::default();
        assert_eq!(perft(&pos, 4), 197_281);
        assert_eq!(perft(&pos, 5), 4_865_609);
    }

    #[test]
    fn perft_hard_position() {
        let pos = Board::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&pos, 1), 48, "got {}", {
            pos.legal_moves().iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        });
        assert_eq!(perft(&pos, 2), 2_039);
    }

    #[test]
    fn perft_other_standard_positions() {
        for (fen, counts) in [
            (POSITION_3, &[14, 191, 2_812][..]),
            (POSITION_4, &[6, 264, 9_467]),
            (POSITION_5, &[44, 1_486]),
            (POSITION_6, &[46, 2_079]),
        ] {
            let pos = Board::from_fen(fen).unwrap();
            for (depth, &nodes) in counts.iter().enumerate() {
                assert_eq!(perft(&pos, depth + 1), nodes, "{fen} at depth {}", depth + 1);
            }
        }
    }

    #[test]
    fn perft_mirrored_position_4() {
        let pos = Board::from_fen("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1").unwrap();
        assert_eq!(perft(&pos, 1), 6);
        assert_eq!(perft(&pos, 2), 264);
        assert_eq!(perft(&pos, 3), 9_467);
    }

    #[test]
    fn perft_krk() {
        let pos = Board::from_fen("8/8/8/8/8/8/1k6/R2K4 b - - 1 1").unwrap();
        assert_eq!(perft(&pos, 1), 3, "got {}", {
            pos.legal_moves().iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        });
    }

    #[test]
    fn stats_start_position() {
        assert_stats(STARTING_FEN, 1, stats(20, 0, 0, 0, 0, 0, 0));
        assert_stats(STARTING_FEN, 2, stats(400, 0, 0, 0, 0, 0, 0));
        assert_stats(STARTING_FEN, 3, stats(8_902, 34, 0, 0, 0, 12, 0));
    }

    #[test]
    #[ignore = "slow in debug builds"]
    fn stats_start_position_deep() {
        let got = perft_stats(&Board::default(), 4);
        assert_eq!(got.nodes, 197_281);
        assert_eq!(got.captures, 1_576);
        assert_eq!(got.checks, 469);
        assert_eq!(got.checkmates, 8);
        assert_eq!(got.discovered_checks, 0);
        assert_eq!(got.double_checks, 0);

        let got = perft_stats(&Board::default(), 5);
        let expected = PerftStats {
            nodes: 4_865_609,
            captures: 82_719,
            en_passant: 258,
            checks: 27_351,
            discovered_checks: 6,
            checkmates: 347,
            ..PerftStats::default()
        };
        assert_eq!(got, expected);
    }

    #[test]
    #[ignore = "takes minutes even in release builds"]
    fn stats_start_position_depth_6() {
        let got = perft_stats(&Board::default(), 6);
        let expected = PerftStats {
            nodes: 119_060_324,
            captures: 2_812_008,
            en_passant: 5_248,
            castles: 0,
            promotions: 0,
            checks: 809_099,
            discovered_checks: 329,
            double_checks: 46,
            checkmates: 10_828,
        };
        assert_eq!(got, expected);
    }

    #[test]
    fn stats_tricky_positions() {
        assert_stats(KIWIPETE, 1, stats(48, 8, 0, 2, 0, 0, 0));
        assert_stats(KIWIPETE, 2, stats(2_039, 351, 1, 91, 0, 3, 0));
        assert_stats(POSITION_3, 1, stats(14, 1, 0, 0, 0, 2, 0));
        assert_stats(POSITION_3, 2, stats(191, 14, 0, 0, 0, 10, 0));
        assert_stats(POSITION_4, 1, stats(6, 0, 0, 0, 0, 0, 0));
        assert_stats(POSITION_4, 2, stats(264, 87, 0, 6, 48, 10, 22));
    }

    #[test]
    fn discovered_and_double_checks_are_classified() {
        // the knight on e4 shields the black king from the e1 rook.
        let pos = Board::from_fen("4k3/8/8/8/4N3/8/8/4R1K1 w - - 0 1").unwrap();
        let got = perft_stats(&pos, 1);
        assert_eq!(got.nodes, 20);
        assert_eq!(got.checks, 8);
        // Nd6 and Nf6 also check with the knight itself
        assert_eq!(got.discovered_checks, 6);
        assert_eq!(got.double_checks, 2);
        assert_eq!(got.checkmates, 0);
    }

    #[test]
    fn castling_rook_check_is_direct() {
        // O-O puts the rook on f1, checking the king on f8.
        let pos = Board::from_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = Move::new(Square::E1, Square::H1);
        let mut got = PerftStats::default();
        got.record(&pos, castle, &pos.make_move(castle));
        assert_eq!(got.castles, 1);
        assert_eq!(got.checks, 1);
        assert_eq!(got.discovered_checks, 0);
    }

    #[test]
    fn checkmates_are_counted_at_the_leaves() {
        // back-rank mate in one: Ra8#.
        let pos = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let got = perft_stats(&pos, 1);
        assert_eq!(got.checkmates, 1);
        assert_eq!(got.checks, 1);
    }

    #[test]
    fn divide_sums_to_perft() {
        let pos = Board::from_fen(KIWIPETE).unwrap();
        let split = divide(&pos, 2);
        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|&(_, n)| n).sum::<u64>(), 2_039);
        assert!(split.iter().all(|&(m, _)| pos.is_legal(m)));
    }

    #[test]
    fn parallel_perft_agrees_with_serial() {
        let pos = Board::from_fen(POSITION_5).unwrap();
        for threads in [1, 2, 3, 8, 100] {
            assert_eq!(parallel_perft(&pos, 2, threads), 1_486, "{threads} threads");
        }
        let mated = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        assert_eq!(parallel_perft(&mated, 3, 4), 0);
    }

    #[test]
    fn suite_lines_are_parsed() {
        let (fen, exp) = parse_suite_line("4k3/8/8/8/8/8/8/4K3 w - - 0 1 ;D1 5 ;D2 25").unwrap();
        assert_eq!(fen, "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(exp, vec![(1, 5), (2, 25)]);
        assert!(parse_suite_line("4k3/8/8/8/8/8/8/4K3 w - - 0 1 ;X1 5").is_err());
        assert!(parse_suite_line("4k3/8/8/8/8/8/8/4K3 w - - 0 1 ;D1").is_err());
    }

    #[test]
    fn bundled_suite_passes_under_a_small_limit() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("epds/perftsuite.epd");
        let report = gamut(&path, 10_000, 2).unwrap();
        assert_eq!(report.failed, 0);
        assert!(report.passed > 0);
        assert!(report.skipped > 0);
    }

    #[test]
    fn bench_reports_throughput() {
        assert!(bench(1).unwrap() > 0.0);
        assert!(bench(0).is_err());
    }

    #[test]
    fn describe_moves_lists_every_legal_move() {
        let pos = Board::default();
        let lines = describe_moves(&pos);
        assert_eq!(lines.len(), 20);
        assert!(lines.contains(&"e4 e2e4 rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".to_string()));
        assert!(lines.contains(&"Nf3 g1f3 rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1".to_string()));
    }

    #[derive(Deserialize)]
    struct Fixture {
        description: String,
        #[serde(rename = "testCases")]
        test_cases: Vec<TestCase>,
    }

    #[derive(Deserialize)]
    struct TestCase {
        start: Start,
        expected: Vec<Expected>,
    }

    #[derive(Deserialize)]
    struct Start {
        fen: String,
        #[serde(default)]
        description: String,
    }

    #[derive(Deserialize)]
    struct Expected {
        #[serde(rename = "move")]
        san: String,
        fen: String,
    }

    #[test]
    fn fixture_positions_match_expected_successors() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let mut files = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "json"))
            .collect::<Vec<_>>();
        files.sort();
        assert!(!files.is_empty(), "no fixtures in {}", dir.display());

        for file in files {
            let text = std::fs::read_to_string(&file).unwrap();
            let fixture: Fixture = serde_json::from_str(&text).unwrap();
            for case in &fixture.test_cases {
                let ctx = format!("{} / {} ({})", fixture.description, case.start.description, case.start.fen);
                let pos = Board::from_fen(&case.start.fen).unwrap();
                assert_eq!(pos.to_string(), case.start.fen, "{ctx}");

                let expected_fens = case.expected.iter().map(|e| e.fen.as_str()).collect::<HashSet<_>>();
                let got_fens =
                    pos.legal_moves().iter().map(|&m| pos.make_move(m).to_string()).collect::<HashSet<_>>();
                let got_refs = got_fens.iter().map(String::as_str).collect::<HashSet<_>>();
                assert_eq!(got_refs, expected_fens, "{ctx}");

                let expected_sans =
                    case.expected.iter().map(|e| e.san.trim_end_matches('#')).collect::<HashSet<_>>();
                for &m in &pos.legal_moves() {
                    let san = pos.san(m).unwrap().to_string();
                    assert!(expected_sans.contains(san.trim_end_matches('#')), "{ctx}: unexpected SAN {san}");
                }

                for e in &case.expected {
                    let m = pos.parse_move(&e.san).unwrap();
                    assert_eq!(pos.make_move(m).to_string(), e.fen, "{ctx}: {}", e.san);
                }
            }
        }
    }
}
