use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    Contest, ContestKind, PaginatedResponse, Prize, RewardRecord, RewardStatus, RewardType,
};

/// 奖励记录查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RewardRecordQuery {
    /// 页码（默认 1）
    pub page: Option<u32>,
    /// 每页数量（默认 20）
    pub per_page: Option<u32>,
}

/// 奖品展示信息（列表用，不泄露预置券码）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub title: String,
    pub display_name: String,
    pub partner_name: Option<String>,
    pub description: Option<String>,
    pub reward_type: RewardType,
    pub points_value: Option<i64>,
    /// 权重
    pub probability_value: f64,
    /// 展示分母
    pub probability_out_of: f64,
    pub total_quantity: Option<i64>,
    pub claimed_quantity: i64,
    pub active: bool,
}

impl From<Prize> for PrizeResponse {
    fn from(p: Prize) -> Self {
        PrizeResponse {
            id: p.id,
            title: p.title,
            display_name: p.display_name,
            partner_name: p.partner_name,
            description: p.description,
            reward_type: p.reward_type,
            points_value: p.points_value,
            probability_value: p.probability_value,
            probability_out_of: p.probability_out_of,
            total_quantity: p.total_quantity,
            claimed_quantity: p.claimed_quantity,
            active: p.active,
        }
    }
}

/// 比赛详情响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContestResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: ContestKind,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub users_cap: Option<i64>,
    pub attempts_required: Option<i64>,
    pub active: bool,
    pub prizes: Vec<PrizeResponse>,
}

impl From<Contest> for ContestResponse {
    fn from(c: Contest) -> Self {
        ContestResponse {
            id: c.id,
            name: c.name,
            description: c.description,
            kind: c.kind,
            start_at: c.start_at,
            end_at: c.end_at,
            users_cap: c.users_cap,
            attempts_required: c.attempts_required,
            active: c.active,
            prizes: c.prizes.into_iter().map(Into::into).collect(),
        }
    }
}

/// 抽中后返回给用户的奖品（隐藏配置字段）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WonPrize {
    pub id: i64,
    pub title: String,
    pub display_name: String,
    pub reward_type: RewardType,
}

impl From<&Prize> for WonPrize {
    fn from(p: &Prize) -> Self {
        WonPrize {
            id: p.id,
            title: p.title.clone(),
            display_name: p.display_name.clone(),
            reward_type: p.reward_type,
        }
    }
}

/// 奖励台账记录响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RewardRecordResponse {
    pub id: Uuid,
    pub contest_id: i64,
    pub prize_id: i64,
    pub prize_title: String,
    pub reward_type: RewardType,
    pub points_value: Option<i64>,
    pub coupon_code: Option<String>,
    pub status: RewardStatus,
    pub created_at: DateTime<Utc>,
}

impl From<RewardRecord> for RewardRecordResponse {
    fn from(r: RewardRecord) -> Self {
        RewardRecordResponse {
            id: r.id,
            contest_id: r.contest_id,
            prize_id: r.prize_id,
            prize_title: r.prize_title,
            reward_type: r.reward_type,
            points_value: r.points_value,
            coupon_code: r.coupon_code,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

/// 抽奖（Play）响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayResponse {
    /// 抽中的奖品
    pub prize: WonPrize,
    /// 生成并已提交台账的奖励记录
    pub reward: RewardRecordResponse,
}

/// 奖励记录分页响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RewardRecordPageResponse {
    pub data: Vec<RewardRecordResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl From<PaginatedResponse<RewardRecord>> for RewardRecordPageResponse {
    fn from(page: PaginatedResponse<RewardRecord>) -> Self {
        RewardRecordPageResponse {
            data: page.data.into_iter().map(Into::into).collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}
