use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use diffwalk::comment_index::CommentIndex;
use diffwalk::config::{config_path_hint, load_config};
use diffwalk::diff::{FileSummary, build_model, infer_summaries, parse_numstat};
use diffwalk::model::{Comment, DiffModel, ReviewedFiles};
use diffwalk::nav::{Direction, NavContext, NavTarget, Navigator, ViewMode, scroll_target};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum OutputMode {
    /// One line per file plus totals
    #[value(name = "summary")]
    Summary,
    /// The whole diff model as JSON
    #[value(name = "json")]
    Json,
    /// Every change run with its scroll target
    #[value(name = "changes")]
    Changes,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum ViewArg {
    #[value(name = "inline")]
    Inline,
    #[value(name = "side-by-side")]
    SideBySide,
}

impl From<ViewArg> for ViewMode {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Inline => ViewMode::Inline,
            ViewArg::SideBySide => ViewMode::SideBySide,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "diffwalk",
    version,
    about = "Builds a reviewable model from git diff output and walks its changes."
)]
struct Cli {
    /// Diff file to read; `-` or nothing reads stdin
    diff: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputMode::Summary)]
    output: OutputMode,
    /// `git diff --numstat` output for the same diff
    #[arg(long, value_name = "FILE")]
    numstat: Option<PathBuf>,
    /// JSON list of comments
    #[arg(long, value_name = "FILE")]
    comments: Option<PathBuf>,
    /// Path of a file already reviewed; may be repeated
    #[arg(long = "reviewed", value_name = "PATH")]
    reviewed: Vec<String>,
    /// Overrides the configured view mode
    #[arg(long, value_enum)]
    view: Option<ViewArg>,
}

impl Cli {
    fn diff_path(&self) -> Option<&Path> {
        self.diff.as_deref().filter(|path| *path != Path::new("-"))
    }
}

fn read_diff(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read diff from {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read diff from stdin")?;
            Ok(text)
        }
    }
}

fn read_summaries(path: Option<&Path>, raw_diff: &str) -> Result<Vec<FileSummary>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read numstat from {}", path.display()))?;
            Ok(parse_numstat(&text)?)
        }
        None => Ok(infer_summaries(raw_diff)),
    }
}

fn read_comments(path: Option<&Path>) -> Result<Vec<Comment>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read comments from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid comments in {}", path.display()))
}

fn print_summary(model: &DiffModel, comments: &CommentIndex, reviewed: &ReviewedFiles) {
    if model.is_empty {
        println!("No changes");
        return;
    }

    for file in &model.files {
        let detail = if file.is_binary {
            "binary".to_string()
        } else {
            format!("{} chunks", file.chunks.len())
        };
        let mark = if reviewed.is_reviewed(&file.path) { "✓" } else { " " };
        println!(
            "{mark} {} +{:<4} -{:<4} {} ({detail})",
            file.status.as_char(),
            file.additions,
            file.deletions,
            file.display_path()
        );
    }

    let (additions, deletions) = model.total_counts();
    println!(
        "{} files changed, {additions} insertions(+), {deletions} deletions(-), {} comments",
        model.files.len(),
        comments.comment_count()
    );
    if !reviewed.is_empty() {
        println!("{} of {} files reviewed", reviewed.len(), model.files.len());
    }
}

/// Walk every change run once, printing the element ids a renderer would scroll to
fn print_changes(ctx: &NavContext<'_>) {
    let mut navigator = Navigator::new();

    let Some(first) = navigator
        .navigate(ctx, Direction::Next, &NavTarget::Chunk)
        .position
    else {
        println!("No changes");
        return;
    };

    let mut position = first;
    loop {
        let path = ctx.file(&position).map(|f| f.path.as_str()).unwrap_or_default();
        let line = ctx.line(&position).map(|l| l.content.as_str()).unwrap_or_default();
        println!(
            "{} {path}: {}",
            scroll_target(&position, ctx.view_mode),
            line.trim()
        );

        match navigator
            .navigate(ctx, Direction::Next, &NavTarget::Chunk)
            .position
        {
            Some(next) if next != first => position = next,
            _ => break,
        }
    }
}

fn configured_view_mode() -> ViewMode {
    match load_config() {
        Ok(outcome) => {
            for warning in &outcome.warnings {
                eprintln!("{warning} ({})", config_path_hint());
            }
            outcome.config.map(|c| c.view_mode()).unwrap_or_default()
        }
        Err(err) => {
            log::warn!("Failed to load config: {err:#}");
            ViewMode::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let view_mode = cli
        .view
        .map(ViewMode::from)
        .unwrap_or_else(configured_view_mode);

    let raw_diff = read_diff(cli.diff_path())?;
    let summaries = read_summaries(cli.numstat.as_deref(), &raw_diff)?;
    let comments = read_comments(cli.comments.as_deref())?;
    let reviewed: ReviewedFiles = cli.reviewed.iter().cloned().collect();

    let model = build_model(&raw_diff, &summaries);
    let index = CommentIndex::build(&comments);
    log::debug!(
        "built {} files from {} summaries, {} comment anchors",
        model.files.len(),
        summaries.len(),
        index.len()
    );

    match cli.output {
        OutputMode::Summary => print_summary(&model, &index, &reviewed),
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputMode::Changes => {
            print_changes(&NavContext::new(&model.files, &index, &reviewed, view_mode))
        }
    }

    Ok(())
}
