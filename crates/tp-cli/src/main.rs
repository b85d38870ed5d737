use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use thiserror::Error;
use tracing::info;

use tp_common::extraction::candidate_label;
use tp_common::logging;
use tp_common::matching::pipeline::{MatchEngine, MatchError, ViewFilter};
use tp_common::vocabulary::SkillVocabulary;
use tp_common::{Candidate, JobPosting};

mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tp-match", about = "Batch resume vs job-description matching")]
struct Cli {
    /// Job description text file
    #[arg(long, env = "TP_JOB_DESCRIPTION")]
    job_description: PathBuf,

    /// Job title used in logs and exports
    #[arg(long, env = "TP_JOB_TITLE")]
    job_title: Option<String>,

    /// Resume text files, one candidate per file
    #[arg(required = true)]
    resumes: Vec<PathBuf>,

    /// Comma separated required skills (knockout rules)
    #[arg(long, env = "TP_REQUIRED_SKILLS", default_value = "")]
    required_skills: String,

    /// Newline separated skill vocabulary file (default: built-in vocabulary)
    #[arg(long, env = "TP_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    /// Minimum score to display, inclusive (0-100)
    #[arg(long, env = "TP_MIN_SCORE", default_value_t = 0)]
    min_score: u8,

    /// Keep only candidates whose matched skills contain this term
    #[arg(long, env = "TP_SKILL_FILTER")]
    skill_filter: Option<String>,

    /// Output format
    #[arg(long, env = "TP_FORMAT", default_value = "table", value_enum)]
    format: OutputFormat,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// ファイルをプレーンテキストとして読む（UTF-8 以外は lossy 変換）。
/// DOCX/PDF 等のデコードは外部コラボレータの責務。
fn read_text(path: &Path) -> Result<String, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_stem_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_vocabulary(path: Option<&Path>) -> Result<SkillVocabulary, CliError> {
    match path {
        None => Ok(SkillVocabulary::builtin()),
        Some(path) => {
            let text = read_text(path)?;
            Ok(SkillVocabulary::new(text.lines()))
        }
    }
}

fn parse_required_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn run() -> Result<(), CliError> {
    dotenv().ok();
    logging::init_tracing_subscriber("tp-match");
    logging::install_tracing_panic_hook("tp-match");

    let cli = Cli::parse();

    let job = JobPosting {
        title: cli.job_title.clone(),
        text: read_text(&cli.job_description)?,
    };

    let mut candidates = Vec::with_capacity(cli.resumes.len());
    for path in &cli.resumes {
        let text = read_text(path)?;
        let id = candidate_label(&text, &file_stem_label(path));
        candidates.push(Candidate::new(id, text));
    }

    let vocabulary = load_vocabulary(cli.vocabulary.as_deref())?;
    let required_skills = parse_required_skills(&cli.required_skills);

    info!(
        resumes = candidates.len(),
        vocabulary_terms = vocabulary.len(),
        required_skills = required_skills.len(),
        "starting batch run"
    );

    let engine = MatchEngine::new(vocabulary, &required_skills);
    let batch = engine.rank(&job, &candidates)?;

    let filter = ViewFilter {
        min_score: cli.min_score,
        skill_contains: cli.skill_filter.clone(),
    };
    let view = batch.view(&filter);

    match cli.format {
        OutputFormat::Table => print!("{}", render::render_table(&view)),
        OutputFormat::Tsv => print!("{}", render::render_tsv(&view)),
        OutputFormat::Json => {
            let report =
                render::JsonReport::new(&batch, view, cli.min_score, cli.skill_filter.as_deref());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        tracing::error!(error = %err, "tp-match failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_skills_csv() {
        assert_eq!(
            parse_required_skills(" python , sql ,,excel "),
            ["python", "sql", "excel"]
        );
        assert!(parse_required_skills("").is_empty());
    }

    #[test]
    fn file_stem_label_strips_extension() {
        assert_eq!(file_stem_label(Path::new("/tmp/jane_doe.txt")), "jane_doe");
    }

    #[test]
    fn cli_args_parse_with_defaults() {
        let cli = Cli::try_parse_from([
            "tp-match",
            "--job-description",
            "jd.txt",
            "resume_a.txt",
            "resume_b.txt",
        ])
        .unwrap();

        assert_eq!(cli.resumes.len(), 2);
        assert_eq!(cli.min_score, 0);
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.skill_filter.is_none());
    }
}
