use std::collections::BTreeSet;

use crate::normalize::normalize_text;
use crate::vocabulary::SkillVocabulary;

/// 正規化済み本文に対する語彙の部分文字列一致でスキルを抽出する
///
/// 意図的に素朴な一致（トークン化・語幹処理・単語境界なし）。複合語は
/// 正規化後に空白 1 個で連続して現れる必要がある。"javascript" を含む
/// 本文は語彙の "java" にも一致するが、これは意図した挙動。
/// 戻り値は BTreeSet なので列挙順は常に辞書順。
pub fn extract_skills(text: &str, vocabulary: &SkillVocabulary) -> BTreeSet<String> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return BTreeSet::new();
    }

    vocabulary
        .terms()
        .iter()
        .filter(|term| normalized.contains(term.as_str()))
        .cloned()
        .collect()
}

/// 求人側スキルを matched / missing に分割する
///
/// 不変条件: matched ∪ missing == job_skills かつ matched ∩ missing == ∅。
/// どちらも辞書順の Vec で返す。
pub fn partition_against(
    job_skills: &BTreeSet<String>,
    candidate_skills: &BTreeSet<String>,
) -> (Vec<String>, Vec<String>) {
    let matched = job_skills
        .intersection(candidate_skills)
        .cloned()
        .collect();
    let missing = job_skills
        .difference(candidate_skills)
        .cloned()
        .collect();
    (matched, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> SkillVocabulary {
        SkillVocabulary::new(["java", "javascript", "python", "machine learning", "sql"])
    }

    #[test]
    fn extracts_terms_case_insensitively() {
        let skills = extract_skills("Built pipelines in PYTHON and SQL.", &vocab());
        assert!(skills.contains("python"));
        assert!(skills.contains("sql"));
        assert!(!skills.contains("java"));
    }

    #[test]
    fn multi_word_terms_must_be_contiguous() {
        let vocab = vocab();
        assert!(extract_skills("applied machine learning daily", &vocab).contains("machine learning"));
        assert!(!extract_skills("machine operators keep learning", &vocab).contains("machine learning"));
    }

    #[test]
    fn javascript_also_matches_java_by_design() {
        // 素朴な substring 一致の想定挙動。修正しないこと。
        let skills = extract_skills("5 years of JavaScript", &vocab());
        assert!(skills.contains("javascript"));
        assert!(skills.contains("java"));
    }

    #[test]
    fn empty_text_extracts_nothing() {
        assert!(extract_skills("", &vocab()).is_empty());
        assert!(extract_skills("!!!", &vocab()).is_empty());
    }

    #[test]
    fn iteration_order_is_lexicographic() {
        let skills = extract_skills("sql python java", &vocab());
        let listed: Vec<_> = skills.iter().cloned().collect();
        assert_eq!(listed, ["java", "python", "sql"]);
    }

    #[test]
    fn partition_covers_job_skills_exactly() {
        let job: BTreeSet<String> = ["python", "sql", "machine learning"]
            .into_iter()
            .map(String::from)
            .collect();
        let candidate: BTreeSet<String> = ["python", "java"].into_iter().map(String::from).collect();

        let (matched, missing) = partition_against(&job, &candidate);

        assert_eq!(matched, ["python"]);
        assert_eq!(missing, ["machine learning", "sql"]);

        let mut union: Vec<_> = matched.iter().chain(missing.iter()).cloned().collect();
        union.sort();
        let job_sorted: Vec<_> = job.iter().cloned().collect();
        assert_eq!(union, job_sorted);
    }
}
