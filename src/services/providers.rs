use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};
use crate::external::ContestApi;
use crate::models::{
    Contest, ContestKind, PaginatedResponse, PaginationParams, Prize, RewardRecord, RewardType,
};

/// 比赛数据来源。生产环境走上游 HTTP，本地联调走内存 fixture，
/// 由启动配置决定注入哪一个实现。
pub trait ContestProvider: Send + Sync {
    /// 拉取一场比赛的完整快照（含奖品与已发数量）
    fn fetch_contest(&self, contest_id: i64) -> BoxFuture<'_, AppResult<Contest>>;
}

/// 奖励台账。原子扣减库存、单用户上限等一致性约束都由台账一侧执行，
/// 本服务只提交快照抽取的结果。
pub trait RewardLedger: Send + Sync {
    /// 提交一条新生成的奖励记录
    fn submit_reward(&self, record: RewardRecord) -> BoxFuture<'_, AppResult<RewardRecord>>;

    /// 分页读取某场比赛的奖励记录（倒序）
    fn list_rewards(
        &self,
        contest_id: i64,
        params: PaginationParams,
    ) -> BoxFuture<'_, AppResult<PaginatedResponse<RewardRecord>>>;
}

// -----------------------------
// HTTP 实现（生产）
// -----------------------------

pub struct HttpContestProvider {
    api: Arc<ContestApi>,
}

impl HttpContestProvider {
    pub fn new(api: Arc<ContestApi>) -> Self {
        Self { api }
    }
}

impl ContestProvider for HttpContestProvider {
    fn fetch_contest(&self, contest_id: i64) -> BoxFuture<'_, AppResult<Contest>> {
        Box::pin(async move { self.api.fetch_contest(contest_id).await })
    }
}

pub struct HttpRewardLedger {
    api: Arc<ContestApi>,
}

impl HttpRewardLedger {
    pub fn new(api: Arc<ContestApi>) -> Self {
        Self { api }
    }
}

impl RewardLedger for HttpRewardLedger {
    fn submit_reward(&self, record: RewardRecord) -> BoxFuture<'_, AppResult<RewardRecord>> {
        Box::pin(async move { self.api.submit_reward(&record).await })
    }

    fn list_rewards(
        &self,
        contest_id: i64,
        params: PaginationParams,
    ) -> BoxFuture<'_, AppResult<PaginatedResponse<RewardRecord>>> {
        Box::pin(async move {
            self.api
                .list_rewards(contest_id, params.page.unwrap_or(1), params.get_limit())
                .await
        })
    }
}

// -----------------------------
// 内存实现（本地联调 / 测试）
// -----------------------------

/// 演示比赛的固定 ID
pub const DEMO_CONTEST_ID: i64 = 1;

pub struct FixtureContestProvider {
    contests: Vec<Contest>,
}

impl FixtureContestProvider {
    pub fn new(contests: Vec<Contest>) -> Self {
        Self { contests }
    }

    /// 内置一场可直接抽取的演示比赛
    pub fn demo() -> Self {
        let prizes = vec![
            Prize {
                id: 101,
                title: "100 Points".to_string(),
                display_name: "100 Loyalty Points".to_string(),
                partner_name: None,
                description: None,
                reward_type: RewardType::Points,
                points_value: Some(100),
                coupon_code: None,
                probability_value: 60.0,
                probability_out_of: 100.0,
                total_quantity: None,
                claimed_quantity: 0,
                per_user_limit: None,
                active: true,
            },
            Prize {
                id: 102,
                title: "500 Points".to_string(),
                display_name: "500 Loyalty Points".to_string(),
                partner_name: None,
                description: None,
                reward_type: RewardType::Points,
                points_value: Some(500),
                coupon_code: None,
                probability_value: 25.0,
                probability_out_of: 100.0,
                total_quantity: Some(50),
                claimed_quantity: 0,
                per_user_limit: None,
                active: true,
            },
            Prize {
                id: 103,
                title: "Free Coffee Coupon".to_string(),
                display_name: "Free Coffee".to_string(),
                partner_name: Some("Brew Bar".to_string()),
                description: Some("One free coffee at any outlet".to_string()),
                reward_type: RewardType::Coupon,
                points_value: None,
                coupon_code: Some("FREECOFFEE24".to_string()),
                probability_value: 10.0,
                probability_out_of: 100.0,
                total_quantity: Some(100),
                claimed_quantity: 0,
                per_user_limit: Some(2),
                active: true,
            },
            Prize {
                id: 104,
                title: "Spa Day Voucher".to_string(),
                display_name: "Spa Day".to_string(),
                partner_name: Some("Serenity Spa".to_string()),
                description: None,
                reward_type: RewardType::Coupon,
                points_value: None,
                coupon_code: None,
                probability_value: 5.0,
                probability_out_of: 100.0,
                total_quantity: Some(10),
                claimed_quantity: 0,
                per_user_limit: Some(1),
                active: true,
            },
        ];

        Self::new(vec![Contest {
            id: DEMO_CONTEST_ID,
            name: "Welcome Rewards Spin".to_string(),
            description: Some("Demo contest served from memory".to_string()),
            kind: ContestKind::Spin,
            start_at: None,
            end_at: None,
            users_cap: None,
            attempts_required: None,
            active: true,
            prizes,
        }])
    }
}

impl ContestProvider for FixtureContestProvider {
    fn fetch_contest(&self, contest_id: i64) -> BoxFuture<'_, AppResult<Contest>> {
        Box::pin(async move {
            self.contests
                .iter()
                .find(|c| c.id == contest_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Contest {contest_id} not found")))
        })
    }
}

/// 进程内台账。只存储提交的记录，不做任何库存扣减。
#[derive(Clone, Default)]
pub struct MemoryRewardLedger {
    records: Arc<Mutex<Vec<RewardRecord>>>,
}

impl MemoryRewardLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RewardLedger for MemoryRewardLedger {
    fn submit_reward(&self, record: RewardRecord) -> BoxFuture<'_, AppResult<RewardRecord>> {
        Box::pin(async move {
            let mut records = self.records.lock().expect("reward ledger mutex poisoned");
            records.push(record.clone());
            Ok(record)
        })
    }

    fn list_rewards(
        &self,
        contest_id: i64,
        params: PaginationParams,
    ) -> BoxFuture<'_, AppResult<PaginatedResponse<RewardRecord>>> {
        Box::pin(async move {
            let records = self.records.lock().expect("reward ledger mutex poisoned");
            let filtered: Vec<RewardRecord> = records
                .iter()
                .filter(|r| r.contest_id == contest_id)
                .cloned()
                .collect();
            let total = filtered.len() as i64;

            let offset = params.get_offset().max(0) as usize;
            let limit = params.get_limit().max(0) as usize;
            // 后提交的在前
            let data: Vec<RewardRecord> = filtered
                .into_iter()
                .rev()
                .skip(offset)
                .take(limit)
                .collect();

            Ok(PaginatedResponse::new(
                data,
                params.page.unwrap_or(1),
                params.page_size.unwrap_or(20),
                total,
            ))
        })
    }
}
