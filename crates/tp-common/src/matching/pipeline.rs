use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    classify::{MatchLevel, Recommendation},
    ko_checks::evaluate_knockout,
    scoring::{similarity_score_with_config, ScoringConfig},
    skills::{extract_skills, partition_against},
};
use crate::{
    normalize::{normalize_text, text_fingerprint},
    run_id,
    vocabulary::SkillVocabulary,
    Candidate, JobPosting,
};

#[derive(Debug, Error)]
pub enum MatchError {
    /// 求人票本文が正規化後に空。前提条件違反としてバッチ自体を実行しない
    #[error("job description text is empty after normalization; supply a readable job description")]
    EmptyJobDescription,
}

/// マッチングエンジン設定
#[derive(Debug, Clone, Default)]
pub struct MatchEngineConfig {
    pub scoring: ScoringConfig,
}

/// 候補者 1 名分のマッチング結果。生成後は不変で、再実行は新しい値を作る。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    /// 類似度スコア（0〜100 の整数）
    pub score: u8,
    pub level: MatchLevel,
    /// 求人側スキルのうち候補者が持つもの（辞書順）
    pub matched_skills: Vec<String>,
    /// 求人側スキルのうち候補者に無いもの（辞書順）
    pub missing_skills: Vec<String>,
    pub knocked_out: bool,
    pub knockout_reason: Option<String>,
    pub recommendation: Recommendation,
    /// スコア 0 と「採点不能」を区別するためのタグ付き理由
    pub review_reasons: Vec<String>,
    /// 正規化済み履歴書本文の fingerprint（突き合わせ用）
    pub fingerprint: String,
}

/// バッチ 1 回分の結果（スコア降順、同点は入力順を維持）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedBatch {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    /// 求人票から抽出したスキル集合（辞書順）
    pub job_skills: Vec<String>,
    pub results: Vec<MatchResult>,
}

/// 表示用ビューフィルタ。results を変更せず部分列を返す
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    /// このスコア以上のみ残す（inclusive）
    pub min_score: u8,
    /// matched_skills のいずれかにこの語を部分文字列として含む結果のみ残す
    pub skill_contains: Option<String>,
}

impl RankedBatch {
    /// フィルタを適用した部分列ビュー。両フィルタは合成され、再計算も
    /// 並べ替えもしない。
    pub fn view(&self, filter: &ViewFilter) -> Vec<&MatchResult> {
        let needle = filter
            .skill_contains
            .as_deref()
            .map(normalize_text)
            .filter(|s| !s.is_empty());

        self.results
            .iter()
            .filter(|r| r.score >= filter.min_score)
            .filter(|r| match &needle {
                None => true,
                Some(n) => r.matched_skills.iter().any(|s| s.contains(n.as_str())),
            })
            .collect()
    }
}

pub struct MatchEngine {
    vocabulary: SkillVocabulary,
    required_skills: BTreeSet<String>,
    config: MatchEngineConfig,
}

impl MatchEngine {
    pub fn new<S: AsRef<str>>(vocabulary: SkillVocabulary, required_skills: &[S]) -> Self {
        Self::with_config(vocabulary, required_skills, MatchEngineConfig::default())
    }

    pub fn with_config<S: AsRef<str>>(
        vocabulary: SkillVocabulary,
        required_skills: &[S],
        config: MatchEngineConfig,
    ) -> Self {
        let required_skills = required_skills
            .iter()
            .map(|s| normalize_text(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            vocabulary,
            required_skills,
            config,
        }
    }

    /// 求人票 1 件 × 候補者複数のバッチ実行
    ///
    /// 候補者ごとに独立して採点するため、1 名の不備（空テキスト等）は
    /// バッチを中断しない。求人票が空の場合のみ前提条件違反で失敗する。
    pub fn rank(
        &self,
        job: &JobPosting,
        candidates: &[Candidate],
    ) -> Result<RankedBatch, MatchError> {
        if normalize_text(&job.text).is_empty() {
            return Err(MatchError::EmptyJobDescription);
        }

        let job_skills = extract_skills(&job.text, &self.vocabulary);

        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|candidate| self.evaluate_candidate(candidate, job, &job_skills))
            .collect();

        // sort_by は安定ソートなので同点は入力順のまま
        results.sort_by(|a, b| b.score.cmp(&a.score));

        info!(
            run_id = run_id::get(),
            job_title = job.title.as_deref().unwrap_or(""),
            candidates = results.len(),
            job_skills = job_skills.len(),
            "batch ranking complete"
        );

        Ok(RankedBatch {
            run_id: run_id::get().to_string(),
            generated_at: Utc::now(),
            job_skills: job_skills.into_iter().collect(),
            results,
        })
    }

    fn evaluate_candidate(
        &self,
        candidate: &Candidate,
        job: &JobPosting,
        job_skills: &BTreeSet<String>,
    ) -> MatchResult {
        let mut review_reasons = Vec::new();

        let normalized = normalize_text(&candidate.text);
        if normalized.is_empty() {
            warn!(candidate_id = %candidate.id, "resume text is empty after normalization");
            review_reasons.push(format!(
                "empty_resume_text: candidate {} decoded to empty text",
                candidate.id
            ));
        }

        let candidate_skills = extract_skills(&candidate.text, &self.vocabulary);
        let (matched_skills, missing_skills) = partition_against(job_skills, &candidate_skills);

        let score = if normalized.is_empty() {
            0
        } else {
            similarity_score_with_config(&candidate.text, &job.text, &self.config.scoring)
        };

        let ko = evaluate_knockout(&candidate_skills, &self.required_skills);
        let level = MatchLevel::from_score(score);
        let recommendation = Recommendation::decide(score, ko.knocked_out);

        debug!(
            candidate_id = %candidate.id,
            score,
            matched = matched_skills.len(),
            missing = missing_skills.len(),
            knocked_out = ko.knocked_out,
            "candidate evaluated"
        );

        MatchResult {
            candidate_id: candidate.id.clone(),
            score,
            level,
            matched_skills,
            missing_skills,
            knocked_out: ko.knocked_out,
            knockout_reason: ko.reason,
            recommendation,
            review_reasons,
            fingerprint: text_fingerprint(&candidate.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Analyst role. Must have Python, SQL and Excel. Reporting and data analysis daily.";

    fn vocab() -> SkillVocabulary {
        SkillVocabulary::new([
            "python",
            "sql",
            "excel",
            "reporting",
            "data analysis",
            "machine learning",
        ])
    }

    fn job() -> JobPosting {
        JobPosting::new(JD)
    }

    fn strong_candidate() -> Candidate {
        Candidate::new(
            "ana",
            "Senior analyst. Python, SQL, Excel, reporting and data analysis experience.",
        )
    }

    fn weak_candidate() -> Candidate {
        Candidate::new("ben", "Warehouse shift supervisor, forklift certified.")
    }

    #[test]
    fn empty_job_description_fails_fast() {
        let engine = MatchEngine::new(vocab(), &[] as &[&str]);
        let result = engine.rank(&JobPosting::new("  !!! "), &[strong_candidate()]);
        assert!(matches!(result, Err(MatchError::EmptyJobDescription)));
    }

    #[test]
    fn ranks_by_score_descending() {
        let engine = MatchEngine::new(vocab(), &[] as &[&str]);
        let batch = engine
            .rank(&job(), &[weak_candidate(), strong_candidate()])
            .unwrap();

        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.results[0].candidate_id, "ana");
        assert!(batch.results[0].score > batch.results[1].score);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let engine = MatchEngine::new(vocab(), &[] as &[&str]);
        let twin_a = Candidate::new("first", strong_candidate().text);
        let twin_b = Candidate::new("second", strong_candidate().text);

        let batch = engine.rank(&job(), &[twin_a, twin_b]).unwrap();

        assert_eq!(batch.results[0].score, batch.results[1].score);
        assert_eq!(batch.results[0].candidate_id, "first");
        assert_eq!(batch.results[1].candidate_id, "second");
    }

    #[test]
    fn matched_and_missing_partition_job_skills() {
        let engine = MatchEngine::new(vocab(), &[] as &[&str]);
        let batch = engine.rank(&job(), &[strong_candidate()]).unwrap();

        let result = &batch.results[0];
        let mut union: Vec<_> = result
            .matched_skills
            .iter()
            .chain(result.missing_skills.iter())
            .cloned()
            .collect();
        union.sort();

        assert_eq!(union, batch.job_skills);
        assert!(result
            .matched_skills
            .iter()
            .all(|s| !result.missing_skills.contains(s)));
    }

    #[test]
    fn knockout_forces_reject_regardless_of_score() {
        let engine = MatchEngine::new(vocab(), &["machine learning"]);
        let batch = engine.rank(&job(), &[strong_candidate()]).unwrap();

        let result = &batch.results[0];
        assert!(result.knocked_out);
        assert_eq!(result.recommendation, Recommendation::RejectKnockout);
        assert!(result
            .knockout_reason
            .as_deref()
            .unwrap()
            .contains("machine learning"));
        // ラベルはスコアのみから決まる
        assert_eq!(result.level, MatchLevel::from_score(result.score));
    }

    #[test]
    fn empty_candidate_is_included_not_fatal() {
        let engine = MatchEngine::new(vocab(), &[] as &[&str]);
        let batch = engine
            .rank(&job(), &[Candidate::new("blank", "   "), strong_candidate()])
            .unwrap();

        assert_eq!(batch.results.len(), 2);
        let blank = batch
            .results
            .iter()
            .find(|r| r.candidate_id == "blank")
            .unwrap();
        assert_eq!(blank.score, 0);
        assert!(blank.matched_skills.is_empty());
        assert!(blank
            .review_reasons
            .iter()
            .any(|r| r.starts_with("empty_resume_text:")));
    }

    #[test]
    fn view_filters_compose_without_mutation() {
        let engine = MatchEngine::new(vocab(), &[] as &[&str]);
        let batch = engine
            .rank(&job(), &[weak_candidate(), strong_candidate()])
            .unwrap();
        let before = batch.results.clone();

        let min_only = batch.view(&ViewFilter {
            min_score: batch.results[0].score,
            skill_contains: None,
        });
        assert_eq!(min_only.len(), 1);
        assert_eq!(min_only[0].candidate_id, "ana");

        let both = batch.view(&ViewFilter {
            min_score: 1,
            skill_contains: Some("SQL".into()),
        });
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].candidate_id, "ana");

        let none = batch.view(&ViewFilter {
            min_score: 1,
            skill_contains: Some("machine learning".into()),
        });
        assert!(none.is_empty());

        assert_eq!(batch.results, before);
    }

    #[test]
    fn match_result_serializes_with_snake_case_enums() {
        let engine = MatchEngine::new(vocab(), &["machine learning"]);
        let batch = engine.rank(&job(), &[weak_candidate()]).unwrap();

        let value = serde_json::to_value(&batch.results[0]).unwrap();
        assert_eq!(value["candidate_id"], "ben");
        assert_eq!(value["score"], 0);
        assert_eq!(value["level"], "weak");
        assert_eq!(value["recommendation"], "reject_knockout");
        assert_eq!(value["knocked_out"], true);
    }

    #[test]
    fn no_filter_sentinel_keeps_everything() {
        let engine = MatchEngine::new(vocab(), &[] as &[&str]);
        let batch = engine
            .rank(&job(), &[weak_candidate(), strong_candidate()])
            .unwrap();

        let all = batch.view(&ViewFilter::default());
        assert_eq!(all.len(), batch.results.len());

        let blank_filter = batch.view(&ViewFilter {
            min_score: 0,
            skill_contains: Some("   ".into()),
        });
        assert_eq!(blank_filter.len(), batch.results.len());
    }
}
