use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// スコア帯ごとのマッチ度ラベル
///
/// KO の有無に関係なくスコアのみから決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum MatchLevel {
    Excellent,
    Strong,
    Moderate,
    Weak,
}

impl MatchLevel {
    /// スコア帯: >=80 Excellent / 60-79 Strong / 40-59 Moderate / <40 Weak
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => MatchLevel::Excellent,
            60..=79 => MatchLevel::Strong,
            40..=59 => MatchLevel::Moderate,
            _ => MatchLevel::Weak,
        }
    }
}

/// 推薦アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Shortlist,
    #[strum(serialize = "Next Round")]
    NextRound,
    Hold,
    Reject,
    #[strum(serialize = "Reject (Knockout)")]
    RejectKnockout,
}

impl Recommendation {
    /// KO はスコアに優先する。KO でなければスコア帯に従う。
    pub fn decide(score: u8, knocked_out: bool) -> Self {
        if knocked_out {
            return Recommendation::RejectKnockout;
        }

        match MatchLevel::from_score(score) {
            MatchLevel::Excellent => Recommendation::Shortlist,
            MatchLevel::Strong => Recommendation::NextRound,
            MatchLevel::Moderate => Recommendation::Hold,
            MatchLevel::Weak => Recommendation::Reject,
        }
    }
}
