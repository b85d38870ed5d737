use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 履歴書本文から拾うプロフィール項目（ベストエフォート）
///
/// いずれもヒューリスティックなパターン一致で、固有表現抽出ではない。
/// 取れない項目は None のままにし、呼び出し側がフォールバックを決める。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<u32>,
}

lazy_static! {
    // メールアドレス（実用十分な RFC サブセット）
    static ref EMAIL_RE: Regex =
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap();
    // 電話番号: "+81 90-1234-5678" / "(415) 555-0100" など（行をまたがない）
    static ref PHONE_RE: Regex = Regex::new(r"\+?\d[\d ().\-]{5,18}\d").unwrap();
    // 経験年数: "7 years" / "7+ yrs of experience"
    static ref YEARS_RE: Regex = Regex::new(r"(?i)(\d{1,2})\s*\+?\s*(?:years?|yrs?)").unwrap();
    // 候補者名らしき行: 2〜4 語の Title Case、数字・記号なし
    static ref NAME_LINE_RE: Regex =
        Regex::new(r"^[A-Z][a-zA-Z'\-]+(?:\s+[A-Z][a-zA-Z'\-]+){1,3}$").unwrap();
}

/// 本文中の最初のメールアドレス
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// 本文中の最初の電話番号らしき並び（数字 7〜15 桁）
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .find(|candidate| {
            let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
            (7..=15).contains(&digits)
        })
}

/// "N years" パターンから経験年数を拾う。60 年超はノイズとして捨てる
pub fn extract_experience_years(text: &str) -> Option<u32> {
    YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .find(|years| *years <= 60)
}

/// 冒頭の数行から候補者名らしき Title Case 行を探す
///
/// メールアドレスや数字を含む行、見出し行（"Resume" 等）は飛ばす。
/// 見つからなければ None。ファイル名由来のラベル等へのフォールバックは
/// `candidate_label` を使う。
pub fn extract_candidate_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(5)
        .filter(|line| !line.contains('@') && !line.chars().any(|c| c.is_ascii_digit()))
        .filter(|line| {
            let lowered = line.to_lowercase();
            lowered != "resume" && lowered != "curriculum vitae" && lowered != "cv"
        })
        .find(|line| NAME_LINE_RE.is_match(line))
        .map(str::to_string)
}

/// 名前ヒューリスティックにフォールバックを合成した表示用ラベル
pub fn candidate_label(text: &str, fallback: &str) -> String {
    extract_candidate_name(text).unwrap_or_else(|| fallback.to_string())
}

/// プロフィール項目をまとめて抽出
pub fn extract_profile(text: &str) -> CandidateProfile {
    CandidateProfile {
        name: extract_candidate_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        experience_years: extract_experience_years(text),
    }
}
