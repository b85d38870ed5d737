use std::collections::BTreeSet;

/// 必須スキル判定の結果
#[derive(Debug, Clone, PartialEq)]
pub struct KnockoutResult {
    pub knocked_out: bool,
    /// 不足している必須スキル（辞書順）
    pub missing_required: Vec<String>,
    pub reason: Option<String>,
}

impl KnockoutResult {
    fn pass() -> Self {
        Self {
            knocked_out: false,
            missing_required: Vec::new(),
            reason: None,
        }
    }
}

/// 必須スキルのノックアウト判定
///
/// ルール未設定（required_skills が空）は合格扱い。1 つでも不足があれば
/// スコアに関係なく即 KO。部分一致率による閾値判定は行わない。
pub fn evaluate_knockout(
    candidate_skills: &BTreeSet<String>,
    required_skills: &BTreeSet<String>,
) -> KnockoutResult {
    if required_skills.is_empty() {
        return KnockoutResult::pass();
    }

    let missing: Vec<String> = required_skills
        .difference(candidate_skills)
        .cloned()
        .collect();

    if missing.is_empty() {
        return KnockoutResult::pass();
    }

    let reason = format!("required_skill_missing: {}", missing.join(", "));
    KnockoutResult {
        knocked_out: true,
        missing_required: missing,
        reason: Some(reason),
    }
}
