use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::models::{
    ErrorBody, FetchBatchRequest, FetchBatchResponse, FetchCommentsRequest, FetchCommentsResponse,
};
use crate::config::ClientConfig;
use crate::data::aggregator::{self, Aggregated};
use crate::data::models::VideoResult;
use crate::data::url_set;
use crate::error::RetrievalError;

const SINGLE_ENDPOINT: &str = "api/fetch-comments";
const BATCH_ENDPOINT: &str = "api/fetch-comments-batch";

/// ====== 댓글 조회 클라이언트 ======

/// 백엔드에 댓글 조회를 요청합니다. 재시도, 캐시, 순서 변경은 하지 않습니다.
#[derive(Debug, Clone)]
pub struct CommentClient {
    http: reqwest::Client,
    base: Url,
    max_batch: usize,
}

impl CommentClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RetrievalError> {
        // join이 마지막 경로를 덮어쓰지 않도록 끝에 '/'를 붙인다
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| {
            RetrievalError::Validation(format!("Invalid API base URL {}: {}", config.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base,
            max_batch: config.max_batch,
        })
    }

    pub fn max_batch(&self) -> usize {
        self.max_batch
    }

    fn endpoint(&self, path: &str) -> Result<Url, RetrievalError> {
        self.base.join(path).map_err(|e| {
            RetrievalError::Validation(format!("Invalid endpoint {}: {}", path, e))
        })
    }

    /// 단일 비디오 댓글 조회
    pub async fn fetch_one(&self, url: &str) -> Result<VideoResult, RetrievalError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(RetrievalError::Validation(
                "Enter a TikTok video URL".to_string(),
            ));
        }
        if !url_set::is_accepted(url) {
            return Err(RetrievalError::Validation(format!(
                "Cannot extract a video id from {}, check the URL format",
                url
            )));
        }

        let endpoint = self.endpoint(SINGLE_ENDPOINT)?;
        tracing::debug!(%endpoint, url, "fetching comments");

        let resp = self
            .http
            .post(endpoint)
            .json(&FetchCommentsRequest { url })
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        let parsed: FetchCommentsResponse = decode_response(SINGLE_ENDPOINT, status, &body)?;
        Ok(single_result(url, parsed))
    }

    /// 배치 댓글 조회. URL 목록 전체를 요청 한 번으로 보냅니다.
    pub async fn fetch_batch(&self, urls: &[String]) -> Result<Aggregated, RetrievalError> {
        url_set::check_batch_bounds(urls, self.max_batch)?;

        let endpoint = self.endpoint(BATCH_ENDPOINT)?;
        tracing::debug!(%endpoint, count = urls.len(), "fetching comments batch");

        let resp = self
            .http
            .post(endpoint)
            .json(&FetchBatchRequest { urls })
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        let parsed: FetchBatchResponse = decode_response(BATCH_ENDPOINT, status, &body)?;
        match_submitted(urls, aggregator::aggregate(parsed)?)
    }
}

/// 보낸 URL 하나당 결과가 정확히 하나 있어야 합니다.
fn match_submitted(
    urls: &[String],
    aggregated: Aggregated,
) -> Result<Aggregated, RetrievalError> {
    if aggregated.summary.total_videos != urls.len() {
        return Err(RetrievalError::Consistency {
            reported: urls.len(),
            received: aggregated.summary.total_videos,
        });
    }
    Ok(aggregated)
}

/// 단일 조회 응답을 VideoResult로 변환합니다.
fn single_result(url: &str, resp: FetchCommentsResponse) -> VideoResult {
    VideoResult {
        url: url.to_string(),
        video_id: Some(resp.video_id),
        success: true,
        error: None,
        total_comments: resp.total,
        comments: resp.comments,
    }
}

/// 상태 코드와 본문을 해석합니다.
/// 2xx가 아니면 Transport, 2xx인데 본문이 깨졌으면 Decode.
fn decode_response<T: DeserializeOwned>(
    endpoint: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<T, RetrievalError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
        tracing::debug!(endpoint, %status, %message, "backend returned an error");
        return Err(RetrievalError::Transport {
            status: Some(status.as_u16()),
            message,
        });
    }

    serde_json::from_str(body).map_err(|source| RetrievalError::Decode { endpoint, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 연결되지 않는 주소. 검증 오류는 요청 전에 나야 한다.
    fn offline_client() -> CommentClient {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..ClientConfig::default()
        };
        CommentClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = ClientConfig {
            base_url: "https://example.com/proxy".to_string(),
            ..ClientConfig::default()
        };
        let client = CommentClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(BATCH_ENDPOINT).unwrap().as_str(),
            "https://example.com/proxy/api/fetch-comments-batch"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            CommentClient::new(&config),
            Err(RetrievalError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_over_bound_is_rejected_before_request() {
        let urls: Vec<String> = (0..11)
            .map(|i| format!("https://www.tiktok.com/@a/video/{}", i))
            .collect();
        let err = offline_client().fetch_batch(&urls).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected_before_request() {
        let err = offline_client().fetch_batch(&[]).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_single_invalid_url_is_rejected_before_request() {
        let err = offline_client().fetch_one("notaurl").await.unwrap_err();
        assert!(matches!(err, RetrievalError::Validation(_)));

        let err = offline_client().fetch_one("   ").await.unwrap_err();
        assert!(matches!(err, RetrievalError::Validation(_)));
    }

    #[test]
    fn test_decode_error_body() {
        let err = decode_response::<FetchCommentsResponse>(
            SINGLE_ENDPOINT,
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success": false, "error": "HTTP 429"}"#,
        )
        .unwrap_err();

        match err {
            RetrievalError::Transport { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "HTTP 429");
            }
            e => panic!("Wrong error type: {:?}", e),
        }
    }

    #[test]
    fn test_decode_error_without_body() {
        let err = decode_response::<FetchBatchResponse>(
            BATCH_ENDPOINT,
            StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::Transport {
                status: Some(502),
                ..
            }
        ));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let err = decode_response::<FetchBatchResponse>(
            BATCH_ENDPOINT,
            StatusCode::OK,
            r#"{"videos": "nope"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RetrievalError::Decode { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_single_response() {
        let body = r#"{
            "success": true,
            "video_id": "7301",
            "total": 1,
            "comments": [{
                "text": "first",
                "author": {"nickname": "Lee"},
                "likes": 3,
                "reply_count": 0,
                "create_time": 1700000000
            }]
        }"#;
        let parsed: FetchCommentsResponse =
            decode_response(SINGLE_ENDPOINT, StatusCode::OK, body).unwrap();
        let result = single_result("https://www.tiktok.com/@a/video/7301", parsed);

        assert!(result.success);
        assert_eq!(result.video_id.as_deref(), Some("7301"));
        assert_eq!(result.total_comments, 1);
        assert_eq!(result.comments[0].author.nickname, "Lee");
    }

    #[test]
    fn test_decode_batch_with_partial_failure() {
        let body = r#"{
            "success": true,
            "total_videos": 2,
            "successful_videos": 1,
            "total_comments": 0,
            "videos": [
                {"url": "https://vm.tiktok.com/a", "success": true, "error": null,
                 "video_id": "a", "total_comments": 0, "comments": []},
                {"url": "https://vm.tiktok.com/b", "success": false,
                 "error": "HTTP 404", "video_id": null, "total_comments": 0, "comments": []}
            ]
        }"#;
        let parsed: FetchBatchResponse =
            decode_response(BATCH_ENDPOINT, StatusCode::OK, body).unwrap();
        let urls = vec![
            "https://vm.tiktok.com/a".to_string(),
            "https://vm.tiktok.com/b".to_string(),
        ];
        let aggregated = match_submitted(&urls, aggregator::aggregate(parsed).unwrap()).unwrap();

        assert_eq!(aggregated.summary.successful_videos, 1);
        assert_eq!(
            aggregated.summary.videos[1].error.as_deref(),
            Some("HTTP 404")
        );
    }

    #[test]
    fn test_batch_with_fewer_results_than_urls_fails() {
        let body = r#"{
            "success": true,
            "total_videos": 2,
            "successful_videos": 2,
            "total_comments": 0,
            "videos": [
                {"url": "https://vm.tiktok.com/a", "success": true, "video_id": "a",
                 "total_comments": 0, "comments": []},
                {"url": "https://vm.tiktok.com/b", "success": true, "video_id": "b",
                 "total_comments": 0, "comments": []}
            ]
        }"#;
        let urls: Vec<String> = ["a", "b", "c"]
            .iter()
            .map(|t| format!("https://vm.tiktok.com/{}", t))
            .collect();

        let parsed: FetchBatchResponse =
            decode_response(BATCH_ENDPOINT, StatusCode::OK, body).unwrap();
        let err = match_submitted(&urls, aggregator::aggregate(parsed).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::Consistency {
                reported: 3,
                received: 2
            }
        ));
    }
}
