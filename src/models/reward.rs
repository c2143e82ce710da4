use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Prize, RewardType};
use crate::utils::generate_coupon_code;

/// 奖励台账状态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    /// 已抽中（创建即此状态）
    Claimed,
    /// 已核销（仅上游台账会写回）
    Redeemed,
}

/// 一次中奖生成的台账记录。创建后不再修改，持久化归上游台账所有。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RewardRecord {
    pub id: Uuid,
    pub contest_id: i64,
    pub prize_id: i64,
    /// 奖品名称快照（奖品后续改名不影响历史记录）
    pub prize_title: String,
    pub reward_type: RewardType,
    #[serde(default)]
    pub points_value: Option<i64>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    pub status: RewardStatus,
    pub created_at: DateTime<Utc>,
}

impl RewardRecord {
    /// 以中奖奖品生成一条新记录。
    /// Coupon 类奖品没有预置券码时，用注入的随机源现场生成 12 位券码，
    /// 保证种子相同则券码相同。
    pub fn issue<R: Rng + ?Sized>(contest_id: i64, prize: &Prize, rng: &mut R) -> Self {
        let (points_value, coupon_code) = match prize.reward_type {
            RewardType::Points => (prize.points_value, None),
            RewardType::Coupon => (
                None,
                prize
                    .coupon_code
                    .clone()
                    .or_else(|| Some(generate_coupon_code(rng))),
            ),
        };

        RewardRecord {
            id: Uuid::new_v4(),
            contest_id,
            prize_id: prize.id,
            prize_title: prize.title.clone(),
            reward_type: prize.reward_type,
            points_value,
            coupon_code,
            status: RewardStatus::Claimed,
            created_at: Utc::now(),
        }
    }
}
