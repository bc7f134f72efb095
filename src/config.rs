use std::env;

use structopt::StructOpt;

use crate::data::url_set::MAX_BATCH_URLS;

pub const DEFAULT_API_BASE: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// 백엔드 접속 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_batch: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_batch: MAX_BATCH_URLS,
            user_agent: format!("tiktok-comments/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// 공통 CLI 옵션. 지정하지 않으면 환경 변수, 그다음 기본값을 쓴다.
#[derive(StructOpt, Debug, Default, Clone)]
pub struct ConfigOpt {
    /// 백엔드 주소 (기본값: $COMMENTS_API_BASE 또는 http://localhost:5001)
    #[structopt(long, global = true)]
    pub api_base: Option<String>,

    /// 요청 타임아웃 (초)
    #[structopt(long, global = true)]
    pub timeout: Option<u64>,

    /// 배치 최대 URL 수 (10을 넘을 수 없음)
    #[structopt(long, global = true)]
    pub max_batch: Option<usize>,
}

impl ClientConfig {
    /// 기본값 → 환경 변수 → CLI 옵션 순서로 덮어씁니다.
    pub fn load(opt: &ConfigOpt) -> Self {
        Self::from_sources(opt, |key| env::var(key).ok())
    }

    fn from_sources(opt: &ConfigOpt, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = lookup("COMMENTS_API_BASE").filter(|s| !s.trim().is_empty()) {
            config.base_url = base.trim().to_string();
        }
        if let Some(timeout) = lookup("COMMENTS_API_TIMEOUT").and_then(|s| s.parse().ok()) {
            config.timeout_secs = timeout;
        }

        if let Some(base) = &opt.api_base {
            config.base_url = base.clone();
        }
        if let Some(timeout) = opt.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(max) = opt.max_batch {
            config.max_batch = max;
        }

        // 백엔드 프로토콜 상한
        config.max_batch = config.max_batch.clamp(1, MAX_BATCH_URLS);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = ClientConfig::from_sources(&ConfigOpt::default(), |_| None);
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.max_batch, 10);
    }

    #[test]
    fn test_cli_overrides_env() {
        let opt = ConfigOpt {
            api_base: Some("http://cli:1".to_string()),
            timeout: None,
            max_batch: Some(50),
        };
        let config = ClientConfig::from_sources(&opt, |key| match key {
            "COMMENTS_API_BASE" => Some("http://env:2".to_string()),
            "COMMENTS_API_TIMEOUT" => Some("5".to_string()),
            _ => None,
        });

        assert_eq!(config.base_url, "http://cli:1");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_batch, 10);
    }

    #[test]
    fn test_invalid_env_timeout_is_ignored() {
        let config = ClientConfig::from_sources(&ConfigOpt::default(), |key| {
            (key == "COMMENTS_API_TIMEOUT").then(|| "soon".to_string())
        });
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
