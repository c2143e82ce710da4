use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 上游比赛服务（奖品快照 + 奖励台账）的访问配置。
/// 所有请求构造都从这里取 base_url / token，不使用任何全局可变状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub base_url: String,
    /// Bearer token（可选，上游开放匿名读取时可不配）
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// true 时使用内存中的演示比赛数据，不访问任何上游
    #[serde(default)]
    pub use_fixtures: bool,
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    upstream: UpstreamConfig {
                        base_url: get_env("UPSTREAM_BASE_URL").unwrap_or_default(),
                        api_token: get_env("UPSTREAM_API_TOKEN"),
                        timeout_seconds: get_env_parse("UPSTREAM_TIMEOUT_SECONDS", 10u64),
                        use_fixtures: get_env_parse("USE_FIXTURES", false),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("UPSTREAM_BASE_URL") {
            config.upstream.base_url = v;
        }
        if let Ok(v) = env::var("UPSTREAM_API_TOKEN") {
            config.upstream.api_token = Some(v);
        }
        if let Ok(v) = env::var("UPSTREAM_TIMEOUT_SECONDS")
            && let Ok(n) = v.parse()
        {
            config.upstream.timeout_seconds = n;
        }
        if let Ok(v) = env::var("USE_FIXTURES")
            && let Ok(b) = v.parse()
        {
            config.upstream.use_fixtures = b;
        }

        // 非 fixture 模式必须有上游地址
        if !config.upstream.use_fixtures && config.upstream.base_url.is_empty() {
            return Err("缺少 upstream.base_url（或 UPSTREAM_BASE_URL 环境变量），\
                且未启用 use_fixtures"
                .into());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [upstream]
            base_url = "https://contest.example.com/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.upstream.base_url, "https://contest.example.com/api");
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert!(config.upstream.api_token.is_none());
        assert!(!config.upstream.use_fixtures);
    }

    #[test]
    fn test_fixture_mode_without_base_url() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [upstream]
            use_fixtures = true
            "#,
        )
        .unwrap();

        assert!(config.upstream.use_fixtures);
        assert!(config.upstream.base_url.is_empty());
    }
}
