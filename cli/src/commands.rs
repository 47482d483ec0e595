//! Subcommand handlers

use std::fs;
use std::path::Path;

use abprune_engine::lifecycle::{check_answer, Session};
use abprune_engine::score::{ScoreRecord, ScoreSink, ScoreStats};
use abprune_engine::snapshot::{restore, serialize, TreeSnapshot};
use abprune_tree::{generate_seeded, survey, SurveyReport, TreeParams};
use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::args::{Cli, Commands, ProblemArgs};
use crate::config::Settings;
use crate::output;
use crate::render::render_tree;
use crate::store::JsonlScoreBook;

/// How a successfully executed command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// A check or survey found a wrong answer or a violated property
    Rejected,
}

pub fn execute_command(cli: &Cli) -> Result<Outcome> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match &cli.command {
        Commands::New { problem, output } => _new(&settings, problem, output.as_deref()),
        Commands::Solve { problem, json } => _solve(&settings, problem, *json),
        Commands::Check { file, record } => _check(&settings, file, *record),
        Commands::History { limit } => _history(&settings, *limit),
        Commands::Show { id } => _show(&settings, *id),
        Commands::Stats => _stats(&settings),
        Commands::Survey { problem, trees, json } => _survey(&settings, problem, *trees, *json),
    }
}

fn problem_params(settings: &Settings, problem: &ProblemArgs) -> (TreeParams, u64) {
    let params = problem.apply(settings.problem);
    let seed = problem.seed.unwrap_or_else(rand::random);
    (params, seed)
}

#[instrument(skip(settings))]
fn _new(settings: &Settings, problem: &ProblemArgs, out_path: Option<&Path>) -> Result<Outcome> {
    let (params, seed) = problem_params(settings, problem);
    let tree = generate_seeded(&params, seed).context("cannot generate problem")?;
    let json = serde_json::to_string_pretty(&serialize(&tree))?;
    info!(seed, nodes = tree.len(), "problem generated");

    match out_path {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("failed to write {}", path.display()))?;
            output::action("Created", &format!("{} (seed {})", path.display(), seed));
        }
        None => {
            output::info(&json);
            output::action("Seed", &seed);
        }
    }
    Ok(Outcome::Done)
}

#[instrument(skip(settings))]
fn _solve(settings: &Settings, problem: &ProblemArgs, json: bool) -> Result<Outcome> {
    let (params, seed) = problem_params(settings, problem);
    let tree = generate_seeded(&params, seed).context("cannot generate problem")?;
    let mut session = Session::new(tree);
    session.reveal_solution();

    if json {
        output::info(&serde_json::to_string_pretty(&serialize(session.tree()))?);
        return Ok(Outcome::Done);
    }

    let tree = session.tree();
    let solution = session.solution();
    output::header(&format!(
        "{} root, depth {}, branching {} (seed {})",
        tree.root_side().to_string().to_uppercase(),
        tree.depth(),
        tree.branching_factor(),
        seed
    ));
    output::info(&render_tree(tree));
    output::field("root value", &solution.root_value());
    output::field("visited", &format!("{} of {} nodes", solution.visited_count(), tree.len()));
    output::field("pruned edges", &solution.pruned_edges().count());
    Ok(Outcome::Done)
}

fn read_snapshot(path: &Path) -> Result<TreeSnapshot> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a tree snapshot", path.display()))
}

#[instrument(skip(settings))]
fn _check(settings: &Settings, file: &Path, record: bool) -> Result<Outcome> {
    let snapshot = read_snapshot(file)?;
    let tree = restore(&snapshot).with_context(|| format!("cannot load {}", file.display()))?;
    let verdict = check_answer(&tree);
    debug!(nodes_checked = verdict.nodes_checked, "answer checked");

    match &verdict.mismatch {
        None => output::success(&format!("Correct ({} nodes checked)", verdict.nodes_checked)),
        Some(mismatch) => output::failure(&format!("Incorrect: {}", mismatch)),
    }

    if record {
        let mut book = JsonlScoreBook::new(&settings.scores_path);
        let entry = ScoreRecord::new(&tree, &verdict);
        let score = entry.score;
        let id = book.record(entry)?;
        output::action("Recorded", &format!("attempt #{} with score {} in {}", id, score, book.path().display()));
    }

    Ok(if verdict.is_correct() { Outcome::Done } else { Outcome::Rejected })
}

#[instrument(skip(settings))]
fn _history(settings: &Settings, limit: usize) -> Result<Outcome> {
    let book = JsonlScoreBook::new(&settings.scores_path);
    let records = book.records()?;
    if records.is_empty() {
        output::info("No attempts recorded");
        return Ok(Outcome::Done);
    }

    output::header(&format!("Attempts ({} of {})", limit.min(records.len()), records.len()));
    for r in records.iter().take(limit) {
        let line = format!(
            "#{:<4} {}  {:<3} depth {} branching {}  {:>3}",
            r.id,
            r.created_at.format("%Y-%m-%d %H:%M:%S"),
            r.root_kind.to_string().to_uppercase(),
            r.depth,
            r.branching_factor,
            r.score
        );
        if r.is_correct {
            output::success(&line);
        } else {
            output::failure(&line);
        }
    }
    Ok(Outcome::Done)
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, id: u64) -> Result<Outcome> {
    let book = JsonlScoreBook::new(&settings.scores_path);
    let record = book
        .get(id)?
        .with_context(|| format!("no attempt #{} in {}", id, book.path().display()))?;
    let tree = restore(&record.tree).with_context(|| format!("attempt #{} holds a broken tree", id))?;

    output::header(&format!(
        "Attempt #{} on {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    output::info(&render_tree(&tree));
    output::field("score", &record.score);
    if record.is_correct {
        output::success("Correct");
    } else if let Some(mismatch) = check_answer(&tree).mismatch {
        output::failure(&format!("Incorrect: {}", mismatch));
    }
    Ok(Outcome::Done)
}

#[instrument(skip(settings))]
fn _stats(settings: &Settings) -> Result<Outcome> {
    let book = JsonlScoreBook::new(&settings.scores_path);
    let stats = ScoreStats::from_records(&book.records()?);

    output::header("Statistics");
    output::field("attempts", &stats.total_attempts);
    output::field("correct", &stats.correct_attempts);
    output::field("incorrect", &stats.incorrect_attempts);
    output::field("accuracy", &format!("{:.1}%", stats.accuracy));
    output::field("average score", &format!("{:.1}", stats.average_score));
    Ok(Outcome::Done)
}

#[instrument(skip(settings))]
fn _survey(settings: &Settings, problem: &ProblemArgs, trees: u64, json: bool) -> Result<Outcome> {
    let params = problem.apply(settings.problem);
    let start = problem.seed.unwrap_or(0);
    let end = start
        .checked_add(trees)
        .context("seed range overflows u64")?;
    let report = survey(&params, start..end).context("survey failed")?;

    if json {
        output::info(&serde_json::to_string_pretty(&report)?);
    } else {
        print_survey(&report, start..end);
    }
    Ok(if report.is_clean() { Outcome::Done } else { Outcome::Rejected })
}

fn print_survey(report: &SurveyReport, seeds: std::ops::Range<u64>) {
    output::header(&format!("Survey of seeds {}..{}", seeds.start, seeds.end));
    output::field("trees", &report.trees);
    output::field("nodes", &report.total_nodes);
    output::field("skipped", &format!("{:.1}%", report.skipped_ratio() * 100.0));
    output::field("pruned edges", &report.pruned_edges);
    output::field("throughput", &format!("{:.0} trees/s", report.trees_per_sec()));

    let failures = [
        ("value mismatch", &report.value_mismatches),
        ("open pruned subtree", &report.open_pruned_subtrees),
        ("reveal rejected", &report.reveal_rejections),
    ];
    if report.is_clean() {
        output::success("All properties hold");
    }
    for (what, seeds) in failures {
        if !seeds.is_empty() {
            output::failure(&format!("{} on {} seed(s): {:?}", what, seeds.len(), seeds));
        }
    }
}
