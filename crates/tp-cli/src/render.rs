use serde::Serialize;
use tp_common::matching::pipeline::{MatchResult, RankedBatch};

/// 連結リストの区切り文字。正規化済みスキル語には現れない文字を使う
const SKILL_JOIN: &str = ";";

/// タブ区切りの 1 行にフィールドを収めるための空白正規化
fn sanitize_cell(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn knockout_cell(result: &MatchResult) -> &'static str {
    if result.knocked_out {
        "yes"
    } else {
        "no"
    }
}

/// 人間向けの整列済みテーブル
pub fn render_table(results: &[&MatchResult]) -> String {
    let id_width = results
        .iter()
        .map(|r| r.candidate_id.len())
        .chain(std::iter::once("Candidate".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<id_width$}  {:>5}  {:<9}  {:<8}  {:<17}  Skills\n",
        "Candidate", "Score", "Level", "Knockout", "Recommendation",
    ));

    for result in results {
        out.push_str(&format!(
            "{:<id_width$}  {:>5}  {:<9}  {:<8}  {:<17}  matched=[{}] missing=[{}]\n",
            sanitize_cell(&result.candidate_id),
            result.score,
            result.level.as_ref(),
            knockout_cell(result),
            result.recommendation.as_ref(),
            result.matched_skills.join(SKILL_JOIN),
            result.missing_skills.join(SKILL_JOIN),
        ));
    }

    out
}

/// 機械可読な TSV（ダウンストリームのエクスポート向け契約列）
pub fn render_tsv(results: &[&MatchResult]) -> String {
    let mut out = String::from(
        "Candidate\tScore\tLevel\tKnockout\tRecommendation\tMatchedSkills\tMissingSkills\n",
    );

    for result in results {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            sanitize_cell(&result.candidate_id),
            result.score,
            result.level.as_ref(),
            knockout_cell(result),
            result.recommendation.as_ref(),
            result.matched_skills.join(SKILL_JOIN),
            result.missing_skills.join(SKILL_JOIN),
        ));
    }

    out
}

/// JSON エクスポート（適用済みフィルタも記録する）
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub run_id: &'a str,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub job_skills: &'a [String],
    pub min_score: u8,
    pub skill_filter: Option<&'a str>,
    pub results: Vec<&'a MatchResult>,
}

impl<'a> JsonReport<'a> {
    pub fn new(
        batch: &'a RankedBatch,
        results: Vec<&'a MatchResult>,
        min_score: u8,
        skill_filter: Option<&'a str>,
    ) -> Self {
        Self {
            run_id: &batch.run_id,
            generated_at: batch.generated_at,
            job_skills: &batch.job_skills,
            min_score,
            skill_filter,
            results,
        }
    }
}
