use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

static RE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9+\-.@\s]").unwrap());

/// 本文の正規化（小文字化・記号除去・空白圧縮）
///
/// 変換の契約:
/// 1. NFKC 正規化して全角英数を半角に揃え、全体を小文字化する
/// 2. 英小文字・数字・空白・`+` `-` `.` `@` 以外の文字は空白 1 個に置換
/// 3. 連続する空白は 1 個に圧縮し、前後の空白を除去
/// 4. 入力が空なら空文字を返す（冪等・純粋関数）
pub fn normalize_text(text: &str) -> String {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    let replaced = RE_NOISE.replace_all(&folded, " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 正規化済み本文から SHA-256 で fingerprint を生成（先頭16文字）
///
/// ログ・エクスポートでの突き合わせ専用。マッチング結果には影響しない。
pub fn text_fingerprint(text: &str) -> String {
    let normalized = normalize_text(text);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let bytes = hasher.finalize();
    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(16);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            normalize_text("Senior Analyst, (Data & Reporting)!"),
            "senior analyst data reporting"
        );
    }

    #[test]
    fn keeps_plus_minus_dot_at() {
        assert_eq!(
            normalize_text("C++ dev, e-mail: jane.doe@example.com"),
            "c++ dev e-mail jane.doe@example.com"
        );
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize_text("  data \t analysis \n reporting  "), "data analysis reporting");
    }

    #[test]
    fn folds_fullwidth_input() {
        assert_eq!(normalize_text("Ｐｙｔｈｏｎ　ＳＱＬ"), "python sql");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("  \t\n "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_text("Data Analysis & Reporting!");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn fingerprint_ignores_formatting_noise() {
        let a = text_fingerprint("Data   Analysis, Reporting");
        let b = text_fingerprint("data analysis reporting");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn fingerprint_differs_for_different_texts() {
        assert_ne!(text_fingerprint("python"), text_fingerprint("sql"));
    }
}
