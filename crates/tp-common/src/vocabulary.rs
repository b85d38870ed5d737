use std::collections::HashSet;

use crate::normalize::normalize_text;

/// 組み込みスキル語彙（小文字・単語または複合語）
///
/// NOTE: 採用チーム側の語彙ファイルで差し替え可能。README のスキル表と同期すること。
static DEFAULT_SKILL_TERMS: &[&str] = &[
    "python",
    "sql",
    "java",
    "javascript",
    "typescript",
    "react",
    "machine learning",
    "deep learning",
    "nlp",
    "statistics",
    "data analysis",
    "data engineering",
    "etl",
    "excel",
    "power bi",
    "tableau",
    "dashboarding",
    "reporting",
    "communication",
    "stakeholder",
    "project management",
    "leadership",
    "agile",
    "scrum",
    "cloud",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "git",
    "linux",
    "rest",
    "api",
    "testing",
    "automation",
];

/// スキル語彙（順序保持・正規化済み・重複なし）
///
/// 実行中は不変。抽出側はこの語彙の部分文字列一致のみを行う。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillVocabulary {
    terms: Vec<String>,
}

impl SkillVocabulary {
    /// 任意の語彙リストから構築する。各語は正規化し、空になった語と重複は
    /// 落とす（初出順を保持）。
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut normalized = Vec::new();

        for term in terms {
            let term = normalize_text(term.as_ref());
            if term.is_empty() {
                continue;
            }
            if seen.insert(term.clone()) {
                normalized.push(term);
            }
        }

        Self { terms: normalized }
    }

    /// 組み込みのデフォルト語彙
    pub fn builtin() -> Self {
        Self::new(DEFAULT_SKILL_TERMS.iter().copied())
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        let needle = normalize_text(term);
        self.terms.iter().any(|t| *t == needle)
    }
}
