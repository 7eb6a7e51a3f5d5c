//! Search experiments: time and node counts per depth on the opening position,
//! and alpha-beta scores of random mid-game boards across depths.
use std::io::Write;
use std::time::Instant;

use anyhow::ensure;
use clap::Args;
use connect4::{search_with_node_count, NodeCount, Player, Pruning, Score, StandardBoard};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub(crate) struct Config {
    /// Depths to time and count nodes at.
    #[arg(long, num_args = 1.., default_values_t = vec![1, 2, 3, 4, 5, 6, 7, 8])]
    pub(crate) depths: Vec<usize>,
    /// Depths to score the random test boards at.
    #[arg(long, num_args = 1.., default_values_t = vec![1, 2, 3, 4, 5, 6, 7, 8])]
    pub(crate) heatmap_depths: Vec<usize>,
    /// Number of random test boards.
    #[arg(long, default_value_t = 6)]
    pub(crate) boards: usize,
    #[arg(long, default_value_t = 1)]
    pub(crate) runs_per_depth: u32,
    #[arg(long, default_value_t = 1234)]
    pub(crate) seed: u64,
    /// Print comma-separated values instead of aligned tables.
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DepthSample {
    pub(crate) depth: usize,
    pub(crate) seconds: f64,
    pub(crate) nodes_alpha_beta: u64,
    pub(crate) nodes_no_pruning: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Experiment {
    pub(crate) samples: Vec<DepthSample>,
    pub(crate) heatmap_depths: Vec<usize>,
    /// One row per test board, one column per heatmap depth. Scores are from
    /// player one's perspective with player one to move.
    pub(crate) heatmap: Vec<Vec<Score>>,
}

/// Plays up to `moves` random moves, alternating from a random first player.
/// A move that would win is not kept and ends generation, so the result is
/// never decided.
pub(crate) fn random_board<R: Rng>(rng: &mut R, moves: usize) -> StandardBoard {
    let mut board = StandardBoard::new();
    let mut player = if rng.gen_bool(0.5) {
        Player::PlayerOne
    } else {
        Player::PlayerTwo
    };
    for _ in 0..moves {
        let legal: Vec<usize> = board.legal_columns().collect();
        let Some(&column) = legal.choose(rng) else {
            break;
        };
        let mut next = board;
        if next.play(column, player).is_err() || next.has_won(player) {
            break;
        }
        board = next;
        player = player.opponent();
    }
    board
}

/// `count` boards, each seeded from `seed + index` with 6 to 12 moves.
pub(crate) fn test_boards(count: usize, seed: u64) -> Vec<StandardBoard> {
    let mut lengths = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let moves = lengths.gen_range(6..=12);
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
            random_board(&mut rng, moves)
        })
        .collect()
}

/// Player one to move, scored from player one's side.
fn player_one_search(board: &StandardBoard, depth: usize, pruning: Pruning) -> NodeCount {
    search_with_node_count(board, depth, true, Player::PlayerOne, pruning)
}

pub(crate) fn run(config: &Config) -> anyhow::Result<Experiment> {
    ensure!(config.runs_per_depth > 0, "runs-per-depth must be positive");
    let root = StandardBoard::new();

    let mut samples = Vec::with_capacity(config.depths.len());
    for &depth in &config.depths {
        let mut seconds = 0.0;
        let mut nodes_alpha_beta = 0;
        let mut nodes_no_pruning = 0;
        for _ in 0..config.runs_per_depth {
            let start = Instant::now();
            let pruned = player_one_search(&root, depth, Pruning::AlphaBeta);
            seconds += start.elapsed().as_secs_f64();
            nodes_alpha_beta += pruned.nodes;
            nodes_no_pruning += player_one_search(&root, depth, Pruning::Disabled).nodes;
        }
        let runs = config.runs_per_depth;
        let sample = DepthSample {
            depth,
            seconds: seconds / f64::from(runs),
            nodes_alpha_beta: nodes_alpha_beta / u64::from(runs),
            nodes_no_pruning: nodes_no_pruning / u64::from(runs),
        };
        info!(
            depth,
            seconds = sample.seconds,
            nodes_alpha_beta = sample.nodes_alpha_beta,
            nodes_no_pruning = sample.nodes_no_pruning,
            "depth finished"
        );
        samples.push(sample);
    }

    let heatmap = test_boards(config.boards, config.seed)
        .iter()
        .map(|board| {
            config
                .heatmap_depths
                .iter()
                .map(|&depth| player_one_search(board, depth, Pruning::AlphaBeta).score)
                .collect()
        })
        .collect();

    Ok(Experiment {
        samples,
        heatmap_depths: config.heatmap_depths.clone(),
        heatmap,
    })
}

pub(crate) fn write_table<W: Write>(experiment: &Experiment, mut out: W) -> anyhow::Result<()> {
    writeln!(
        out,
        "{:>5} {:>12} {:>14} {:>14}",
        "depth", "seconds", "nodes_ab", "nodes_full"
    )?;
    for sample in &experiment.samples {
        writeln!(
            out,
            "{:>5} {:>12.6} {:>14} {:>14}",
            sample.depth, sample.seconds, sample.nodes_alpha_beta, sample.nodes_no_pruning
        )?;
    }

    writeln!(out, "\nBoard evaluation scores across depths (player one perspective)")?;
    write!(out, "{:>5}", "board")?;
    for depth in &experiment.heatmap_depths {
        write!(out, " {:>11}", format!("d{depth}"))?;
    }
    writeln!(out)?;
    for (index, row) in experiment.heatmap.iter().enumerate() {
        write!(out, "{:>5}", format!("B{index}"))?;
        for score in row {
            write!(out, " {score:>11}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub(crate) fn write_csv<W: Write>(experiment: &Experiment, mut out: W) -> anyhow::Result<()> {
    writeln!(out, "depth,seconds,nodes_ab,nodes_no_prune")?;
    for sample in &experiment.samples {
        writeln!(
            out,
            "{},{},{},{}",
            sample.depth, sample.seconds, sample.nodes_alpha_beta, sample.nodes_no_pruning
        )?;
    }
    writeln!(out)?;
    let header: Vec<String> = experiment
        .heatmap_depths
        .iter()
        .map(|depth| format!("d{depth}"))
        .collect();
    writeln!(out, "board,{}", header.join(","))?;
    for (index, row) in experiment.heatmap.iter().enumerate() {
        let scores: Vec<String> = row.iter().map(Score::to_string).collect();
        writeln!(out, "B{index},{}", scores.join(","))?;
    }
    Ok(())
}
