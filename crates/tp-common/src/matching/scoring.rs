use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use super::stopwords::is_stop_word;
use crate::normalize::normalize_text;

/// スコアリング設定（環境変数で上書き可能）
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// 2文書コーパスで扱う最大語彙数。超過分は辞書順で決定的に切り詰める。
    pub max_tokens: usize,
    /// トークンの最小文字数（これ未満は捨てる）
    pub min_token_len: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_tokens: env_max_tokens(),
            min_token_len: 2,
        }
    }
}

fn env_max_tokens() -> usize {
    std::env::var("TP_MAX_TOKENS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20_000)
}

/// 履歴書×求人票の類似度スコア（0〜100 の整数）
///
/// 両本文を独立に正規化し、2文書コーパス上の TF-IDF ベクトルの
/// コサイン類似度を百分率に丸める。決定的かつ対称:
/// `similarity_score(a, b) == similarity_score(b, a)`。
/// どちらかがストップワード除去後に空ならゼロ除算ではなく 0 を返す。
pub fn similarity_score(resume_text: &str, jd_text: &str) -> u8 {
    similarity_score_with_config(resume_text, jd_text, &ScoringConfig::default())
}

pub fn similarity_score_with_config(resume_text: &str, jd_text: &str, config: &ScoringConfig) -> u8 {
    let resume_counts = token_counts(resume_text, config);
    let jd_counts = token_counts(jd_text, config);

    if resume_counts.is_empty() || jd_counts.is_empty() {
        return 0;
    }

    let vocabulary = corpus_vocabulary(&resume_counts, &jd_counts, config);
    let resume_vec = tfidf_vector(&vocabulary, &resume_counts, &jd_counts);
    let jd_vec = tfidf_vector(&vocabulary, &jd_counts, &resume_counts);

    let similarity = cosine_similarity(&resume_vec, &jd_vec);

    // 丸め誤差で 100 を僅かに超えるケースを防ぐ
    ((similarity * 100.0).round() as i64).clamp(0, 100) as u8
}

/// 正規化本文をトークン化し、ストップワード除去後の出現回数を数える
fn token_counts(text: &str, config: &ScoringConfig) -> HashMap<String, u32> {
    let normalized = normalize_text(text);
    let mut counts = HashMap::new();

    for token in normalized.split(|c: char| !c.is_ascii_alphanumeric()) {
        if token.len() < config.min_token_len || is_stop_word(token) {
            continue;
        }
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }

    counts
}

/// 2文書の語彙の和集合（辞書順）。max_tokens 超過分は切り詰める
fn corpus_vocabulary(
    a: &HashMap<String, u32>,
    b: &HashMap<String, u32>,
    config: &ScoringConfig,
) -> Vec<String> {
    let union: BTreeSet<&str> = a.keys().chain(b.keys()).map(String::as_str).collect();
    let total = union.len();

    if total > config.max_tokens {
        warn!(
            total,
            max_tokens = config.max_tokens,
            dropped = total - config.max_tokens,
            "corpus vocabulary exceeds cap; truncating lexicographically"
        );
    }

    union
        .into_iter()
        .take(config.max_tokens)
        .map(String::from)
        .collect()
}

/// TF-IDF ベクトル化。tf は出現回数、idf は 2 文書コーパスでの平滑化 idf
/// `ln((1 + n) / (1 + df)) + 1`（n = 2）。コサイン類似度はスケール不変の
/// ため L2 正規化は省略する。
fn tfidf_vector(
    vocabulary: &[String],
    own: &HashMap<String, u32>,
    other: &HashMap<String, u32>,
) -> Vec<f64> {
    vocabulary
        .iter()
        .map(|token| {
            let tf = own.get(token).copied().unwrap_or(0) as f64;
            if tf == 0.0 {
                return 0.0;
            }
            let df = 1 + u32::from(other.contains_key(token));
            let idf = ((1.0 + 2.0) / (1.0 + f64::from(df))).ln() + 1.0;
            tf * idf
        })
        .collect()
}

/// コサイン類似度（0.0〜1.0、ゼロベクトルは 0.0）
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
