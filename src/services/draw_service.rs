use chrono::Utc;
use rand::Rng;
use std::sync::Arc;

use crate::error::{AppError, AppResult, DrawError};
use crate::models::{
    ContestResponse, PaginationParams, PlayResponse, Prize, PrizeResponse, RewardRecord,
    RewardRecordPageResponse, RewardRecordQuery, WonPrize,
};
use crate::services::{ContestProvider, RewardLedger};
use crate::utils::is_valid_coupon_code;

/// 一次抽取的结果：中奖奖品 + 新生成的奖励记录
#[derive(Clone, Debug)]
pub struct DrawOutcome {
    pub prize: Prize,
    pub reward: RewardRecord,
}

/// 按权重抽取一个奖品并生成奖励记录。
///
/// 逻辑:
/// 1. 过滤可抽取奖品（启用且未发完），为空报 NoEligiblePrizes
/// 2. 求权重和，<= 0 报 DegenerateWeights
/// 3. 从注入的随机源取 r ∈ [0, total)
/// 4. 按奖品列表原始顺序累减权重，第一个使 r <= 0 的奖品中奖；
///    浮点累减在末项可能残留正值，此时兜底取最后一个可抽取奖品
/// 5. 生成 RewardRecord（Coupon 类无预置券码时用同一随机源生成 12 位券码）
///
/// 纯计算：不修改 claimed_quantity，不做持久化，调用之间无共享状态。
pub fn select_weighted_prize<R: Rng + ?Sized>(
    contest_id: i64,
    prizes: &[Prize],
    rng: &mut R,
) -> Result<DrawOutcome, DrawError> {
    let eligible: Vec<&Prize> = prizes.iter().filter(|p| p.is_eligible()).collect();
    if eligible.is_empty() {
        return Err(DrawError::NoEligiblePrizes);
    }

    let total_weight: f64 = eligible.iter().map(|p| p.probability_value).sum();
    if total_weight <= 0.0 {
        return Err(DrawError::DegenerateWeights);
    }

    let mut r = rng.r#gen::<f64>() * total_weight;
    let mut winner = *eligible.last().expect("non-empty eligible list"); // fallback
    for &prize in &eligible {
        r -= prize.probability_value;
        if r <= 0.0 {
            winner = prize;
            break;
        }
    }

    let reward = RewardRecord::issue(contest_id, winner, rng);
    Ok(DrawOutcome {
        prize: winner.clone(),
        reward,
    })
}

/// 抽奖编排服务：比赛快照来自注入的 ContestProvider，
/// 奖励记录提交给注入的 RewardLedger。
#[derive(Clone)]
pub struct DrawService {
    provider: Arc<dyn ContestProvider>,
    ledger: Arc<dyn RewardLedger>,
}

impl DrawService {
    pub fn new(provider: Arc<dyn ContestProvider>, ledger: Arc<dyn RewardLedger>) -> Self {
        Self { provider, ledger }
    }

    /// 获取比赛详情
    pub async fn get_contest(&self, contest_id: i64) -> AppResult<ContestResponse> {
        let contest = self.provider.fetch_contest(contest_id).await?;
        Ok(contest.into())
    }

    /// 获取奖品列表（仅启用的）
    pub async fn list_prizes(&self, contest_id: i64) -> AppResult<Vec<PrizeResponse>> {
        let contest = self.provider.fetch_contest(contest_id).await?;
        Ok(contest
            .prizes
            .into_iter()
            .filter(|p| p.active)
            .map(Into::into)
            .collect())
    }

    /// 获取奖励记录（分页，倒序）
    pub async fn list_rewards(
        &self,
        contest_id: i64,
        query: &RewardRecordQuery,
    ) -> AppResult<RewardRecordPageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let page = self.ledger.list_rewards(contest_id, params).await?;
        Ok(page.into())
    }

    /// 抽奖 (Play)
    ///
    /// 逻辑:
    /// 1. 拉取比赛快照
    /// 2. 校验投放窗口与启用状态
    /// 3. 在进程内按权重抽取
    /// 4. 将奖励记录提交上游台账（扣减与上限由台账执行）
    /// 5. 返回奖品与奖励记录
    pub async fn play(&self, contest_id: i64) -> AppResult<PlayResponse> {
        let contest = self.provider.fetch_contest(contest_id).await?;

        if !contest.is_live(Utc::now()) {
            return Err(AppError::ValidationError(
                "Contest is not currently live".to_string(),
            ));
        }

        // 预置券码格式异常只告警，不拦截抽取
        for prize in &contest.prizes {
            if let Some(code) = &prize.coupon_code
                && !is_valid_coupon_code(code)
            {
                log::warn!("Prize {} carries a malformed coupon code", prize.id);
            }
        }

        let outcome = select_weighted_prize(contest.id, &contest.prizes, &mut rand::thread_rng())?;

        let stored = self.ledger.submit_reward(outcome.reward).await?;

        log::info!(
            "Contest {} draw: prize {} ({}) won, reward {}",
            contest.id,
            outcome.prize.id,
            outcome.prize.title,
            stored.id
        );

        Ok(PlayResponse {
            prize: WonPrize::from(&outcome.prize),
            reward: stored.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contest, ContestKind, RewardType};
    use crate::services::{DEMO_CONTEST_ID, FixtureContestProvider, MemoryRewardLedger};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use std::collections::HashMap;

    fn points_prize(id: i64, weight: f64) -> Prize {
        Prize {
            id,
            title: format!("Prize {id}"),
            display_name: format!("Prize {id}"),
            partner_name: None,
            description: None,
            reward_type: RewardType::Points,
            points_value: Some(50),
            coupon_code: None,
            probability_value: weight,
            probability_out_of: 100.0,
            total_quantity: None,
            claimed_quantity: 0,
            per_user_limit: None,
            active: true,
        }
    }

    /// 构造 gen::<f64>() 恰好返回 v 的随机源。
    /// rand 的 f64 标准采样取 u64 高 53 位作为尾数，这里反推回去。
    fn fixed_fraction(v: f64) -> StepRng {
        let mantissa = (v * (1u64 << 53) as f64) as u64;
        StepRng::new(mantissa << 11, 0)
    }

    #[test]
    fn test_two_prize_scenario() {
        // 权重 [8, 5]，r = 0.5 * 13 = 6.5：8 - 6.5 >= 0，第一个中
        let prizes = vec![points_prize(1, 8.0), points_prize(2, 5.0)];

        let outcome =
            select_weighted_prize(1, &prizes, &mut fixed_fraction(0.5)).expect("draw succeeds");
        assert_eq!(outcome.prize.id, 1);

        // r = 0.7 * 13 = 9.1：越过 8，落在第二个
        let outcome =
            select_weighted_prize(1, &prizes, &mut fixed_fraction(0.7)).expect("draw succeeds");
        assert_eq!(outcome.prize.id, 2);
    }

    #[test]
    fn test_always_returns_an_eligible_prize() {
        let prizes = vec![
            points_prize(1, 3.5),
            points_prize(2, 0.0),
            points_prize(3, 96.5),
        ];
        let ids: Vec<i64> = prizes.iter().map(|p| p.id).collect();

        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = select_weighted_prize(1, &prizes, &mut rng).expect("draw succeeds");
            assert!(ids.contains(&outcome.prize.id));
        }
    }

    #[test]
    fn test_frequency_matches_weights() {
        // 5 个奖品，权重和为 100，10 万次抽取后频率应收敛到权重占比（±2%）
        let weights = [50.0, 25.0, 12.5, 10.0, 2.5];
        let prizes: Vec<Prize> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| points_prize(i as i64 + 1, w))
            .collect();

        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<i64, u32> = HashMap::new();
        let n = 100_000;
        for _ in 0..n {
            let outcome = select_weighted_prize(1, &prizes, &mut rng).expect("draw succeeds");
            *counts.entry(outcome.prize.id).or_insert(0) += 1;
        }

        for (i, &w) in weights.iter().enumerate() {
            let expected = w / 100.0;
            let observed = *counts.get(&(i as i64 + 1)).unwrap_or(&0) as f64 / n as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "prize {} observed {observed} expected {expected}",
                i + 1
            );
        }
    }

    #[test]
    fn test_ineligible_prizes_never_win() {
        // 停用与发完的奖品即便权重压倒性也不可中
        let mut disabled = points_prize(1, 1_000_000_000.0);
        disabled.active = false;
        let mut exhausted = points_prize(2, 1_000_000_000.0);
        exhausted.total_quantity = Some(5);
        exhausted.claimed_quantity = 5;
        let prizes = vec![disabled, exhausted, points_prize(3, 1.0)];

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let outcome = select_weighted_prize(1, &prizes, &mut rng).expect("draw succeeds");
            assert_eq!(outcome.prize.id, 3);
        }
    }

    #[test]
    fn test_zero_weight_prize_never_wins() {
        let prizes = vec![points_prize(1, 0.0), points_prize(2, 1.0)];

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..10_000 {
            let outcome = select_weighted_prize(1, &prizes, &mut rng).expect("draw succeeds");
            assert_eq!(outcome.prize.id, 2);
        }
    }

    #[test]
    fn test_all_zero_weights_is_degenerate() {
        let prizes = vec![points_prize(1, 0.0), points_prize(2, 0.0)];
        let err = select_weighted_prize(1, &prizes, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, DrawError::DegenerateWeights);
    }

    #[test]
    fn test_no_eligible_prizes_errors() {
        let mut a = points_prize(1, 10.0);
        a.active = false;
        let mut b = points_prize(2, 10.0);
        b.total_quantity = Some(3);
        b.claimed_quantity = 3;

        let err =
            select_weighted_prize(1, &[a, b], &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, DrawError::NoEligiblePrizes);
    }

    #[test]
    fn test_upper_boundary_falls_to_last_prize() {
        // r 取到区间上沿附近时，累减应落到最后一个可抽取奖品
        let prizes = vec![
            points_prize(1, 1.0),
            points_prize(2, 1.0),
            points_prize(3, 1.0),
        ];
        let outcome = select_weighted_prize(1, &prizes, &mut fixed_fraction(0.9999999999999999))
            .expect("draw succeeds");
        assert_eq!(outcome.prize.id, 3);
    }

    #[test]
    fn test_coupon_synthesis_is_deterministic() {
        let mut prize = points_prize(11, 1.0);
        prize.reward_type = RewardType::Coupon;
        prize.points_value = None;

        let prizes = vec![prize];
        let a = select_weighted_prize(1, &prizes, &mut StdRng::seed_from_u64(2024))
            .expect("draw succeeds");
        let b = select_weighted_prize(1, &prizes, &mut StdRng::seed_from_u64(2024))
            .expect("draw succeeds");

        let code = a.reward.coupon_code.expect("synthesized code");
        assert_eq!(code.len(), 12);
        assert_eq!(Some(code), b.reward.coupon_code);
    }

    #[tokio::test]
    async fn test_play_round_trip_with_fixtures() {
        let provider = Arc::new(FixtureContestProvider::demo());
        let ledger = Arc::new(MemoryRewardLedger::new());
        let service = DrawService::new(provider, ledger);

        let contest = service.get_contest(DEMO_CONTEST_ID).await.unwrap();
        let play = service.play(DEMO_CONTEST_ID).await.unwrap();
        assert!(contest.prizes.iter().any(|p| p.id == play.prize.id));

        let page = service
            .list_rewards(
                DEMO_CONTEST_ID,
                &RewardRecordQuery {
                    page: None,
                    per_page: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, play.reward.id);
        assert_eq!(page.data[0].prize_id, play.prize.id);
    }

    #[tokio::test]
    async fn test_play_rejects_inactive_contest() {
        let contest = Contest {
            id: 5,
            name: "Expired".to_string(),
            description: None,
            kind: ContestKind::Scratch,
            start_at: None,
            end_at: Some(Utc::now() - chrono::Duration::days(1)),
            users_cap: None,
            attempts_required: None,
            active: true,
            prizes: vec![points_prize(1, 1.0)],
        };
        let service = DrawService::new(
            Arc::new(FixtureContestProvider::new(vec![contest])),
            Arc::new(MemoryRewardLedger::new()),
        );

        let err = service.play(5).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
