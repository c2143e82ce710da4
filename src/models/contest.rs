use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 奖励类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    /// 积分奖励（points_value 生效）
    Points,
    /// 优惠券奖励（coupon_code 缺省时在中奖时现场生成）
    Coupon,
}

/// 比赛玩法（仅展示用，抽取逻辑一致）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContestKind {
    Spin,
    Scratch,
    Flip,
}

/// 奖品配置
/// 概念说明:
/// - probability_value: 抽取权重（非负，允许小数），同一比赛内单位一致即可
/// - probability_out_of: 展示用分母，不参与抽取计算
/// - total_quantity: 可发出的总份数（NULL = 无限）
/// - claimed_quantity: 已发出份数（权威计数在上游台账）
/// - per_user_limit: 单用户上限（由上游台账执行，本服务只携带）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Prize {
    pub id: i64,
    pub title: String,
    pub display_name: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub reward_type: RewardType,
    #[serde(default)]
    pub points_value: Option<i64>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    pub probability_value: f64,
    #[serde(default = "default_probability_out_of")]
    pub probability_out_of: f64,
    #[serde(default)]
    pub total_quantity: Option<i64>,
    #[serde(default)]
    pub claimed_quantity: i64,
    #[serde(default)]
    pub per_user_limit: Option<i64>,
    pub active: bool,
}

fn default_probability_out_of() -> f64 {
    100.0
}

impl Prize {
    /// 是否可参与抽取：启用且（无限量或还有剩余）
    pub fn is_eligible(&self) -> bool {
        if !self.active {
            return false;
        }
        match self.total_quantity {
            None => true,
            Some(total) => self.claimed_quantity < total,
        }
    }

    /// 是否限量奖品
    pub fn is_limited(&self) -> bool {
        self.total_quantity.is_some()
    }
}

/// 比赛（奖品顺序即抽取遍历顺序，不得重排）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: ContestKind,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    /// 参与人数上限（上游执行）
    #[serde(default)]
    pub users_cap: Option<i64>,
    /// 解锁一次抽取所需的参与动作次数（上游执行）
    #[serde(default)]
    pub attempts_required: Option<i64>,
    pub active: bool,
    pub prizes: Vec<Prize>,
}

impl Contest {
    /// 当前时间是否处于投放窗口内且比赛启用
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if let Some(start) = self.start_at
            && now < start
        {
            return false;
        }
        if let Some(end) = self.end_at
            && now > end
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn prize(active: bool, total: Option<i64>, claimed: i64) -> Prize {
        Prize {
            id: 1,
            title: "Free Coffee".to_string(),
            display_name: "Free Coffee".to_string(),
            partner_name: None,
            description: None,
            reward_type: RewardType::Coupon,
            points_value: None,
            coupon_code: None,
            probability_value: 10.0,
            probability_out_of: 100.0,
            total_quantity: total,
            claimed_quantity: claimed,
            per_user_limit: None,
            active,
        }
    }

    #[test]
    fn test_eligibility() {
        // 启用 + 无限量
        assert!(prize(true, None, 999).is_eligible());
        // 启用 + 限量未发完
        assert!(prize(true, Some(10), 9).is_eligible());
        // 启用 + 限量已发完
        assert!(!prize(true, Some(10), 10).is_eligible());
        // 停用时无论库存如何都不可抽
        assert!(!prize(false, None, 0).is_eligible());
        assert!(!prize(false, Some(10), 0).is_eligible());
    }

    #[test]
    fn test_contest_window() {
        let now = Utc::now();
        let mut contest = Contest {
            id: 7,
            name: "Monsoon Spin".to_string(),
            description: None,
            kind: ContestKind::Spin,
            start_at: Some(now - Duration::hours(1)),
            end_at: Some(now + Duration::hours(1)),
            users_cap: None,
            attempts_required: None,
            active: true,
            prizes: vec![],
        };
        assert!(contest.is_live(now));

        contest.start_at = Some(now + Duration::minutes(5));
        assert!(!contest.is_live(now));

        contest.start_at = None;
        contest.end_at = Some(now - Duration::minutes(5));
        assert!(!contest.is_live(now));

        contest.end_at = None;
        contest.active = false;
        assert!(!contest.is_live(now));
    }
}
