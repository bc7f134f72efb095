use thiserror::Error;

/// 조회 파이프라인 오류.
///
/// 배치 안의 개별 실패(`VideoResult.success == false`)는 오류가 아니라 데이터로 다룬다.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// 요청을 보내기 전에 걸러지는 입력 오류 (빈 입력, 유효 URL 없음, 개수 초과)
    #[error("{0}")]
    Validation(String),

    /// 네트워크 실패 또는 2xx가 아닌 응답
    #[error("Request failed{}: {message}. Please try again.", http_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// 성공 응답의 본문을 해석할 수 없음
    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// 기대한 비디오 결과 수와 실제 받은 결과 수가 다름
    #[error("Expected {reported} video results but received {received}")]
    Consistency { reported: usize, received: usize },
}

fn http_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl RetrievalError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// 내보내기 오류. 보관 중인 결과에는 영향을 주지 않는다.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,

    #[error("Failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Nothing to copy")]
    NothingToCopy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_includes_status() {
        let err = RetrievalError::Transport {
            status: Some(500),
            message: "upstream timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed (HTTP 500): upstream timeout. Please try again."
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_is_not_retryable() {
        let err = RetrievalError::Validation("empty".to_string());
        assert_eq!(err.to_string(), "empty");
        assert!(!err.is_retryable());
    }
}
