use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Contest, PaginatedResponse, RewardRecord};

/// 上游比赛服务的响应包裹
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// 上游比赛服务客户端。base_url / token 全部来自启动配置，
/// 请求构造不依赖任何全局状态。
pub struct ContestApi {
    client: Client,
    config: UpstreamConfig,
}

impl ContestApi {
    pub fn new(config: UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> AppResult<T> {
        let envelope: Envelope<T> = response.json().await?;
        if !envelope.success {
            return Err(AppError::ExternalApiError(format!(
                "{what} failed upstream: {}",
                envelope.message.unwrap_or_else(|| "no message".to_string())
            )));
        }
        envelope
            .data
            .ok_or_else(|| AppError::ExternalApiError(format!("{what} returned an empty payload")))
    }

    /// 拉取比赛快照（含奖品、已发数量）
    pub async fn fetch_contest(&self, contest_id: i64) -> AppResult<Contest> {
        let url = self.url(&format!("/contests/{contest_id}"));
        let response = self.authorize(self.client.get(&url)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Contest {contest_id} not found")));
        }

        Self::decode(response, "fetch contest").await
    }

    /// 提交奖励记录；上游在此处原子扣减库存并执行单用户上限
    pub async fn submit_reward(&self, record: &RewardRecord) -> AppResult<RewardRecord> {
        let url = self.url(&format!("/contests/{}/play", record.contest_id));
        let response = self
            .authorize(self.client.post(&url))
            .json(record)
            .send()
            .await?;

        Self::decode(response, "submit reward").await
    }

    /// 分页读取奖励记录
    pub async fn list_rewards(
        &self,
        contest_id: i64,
        page: i64,
        per_page: i64,
    ) -> AppResult<PaginatedResponse<RewardRecord>> {
        let url = self.url(&format!("/contests/{contest_id}/rewards"));
        let response = self
            .authorize(
                self.client
                    .get(&url)
                    .query(&[("page", page), ("per_page", per_page)]),
            )
            .send()
            .await?;

        Self::decode(response, "list rewards").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_trims_trailing_slash() {
        let api = ContestApi::new(UpstreamConfig {
            base_url: "https://contest.example.com/api/".to_string(),
            api_token: None,
            timeout_seconds: 10,
            use_fixtures: false,
        })
        .unwrap();

        assert_eq!(
            api.url("/contests/42"),
            "https://contest.example.com/api/contests/42"
        );
    }
}
