use serde::{Deserialize, Serialize};

use crate::data::models::{Comment, VideoResult};

/// ====== HTTP 요청 구조체들 ======

#[derive(Debug, Serialize)]
pub struct FetchCommentsRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FetchBatchRequest<'a> {
    pub urls: &'a [String],
}

/// ====== HTTP 응답 구조체들 ======

/// 단일 조회 응답
#[derive(Debug, Deserialize)]
pub struct FetchCommentsResponse {
    pub comments: Vec<Comment>,
    pub total: u64,
    pub video_id: String,
}

/// 배치 조회 응답. 합계는 백엔드가 보고한 값 그대로이며 검증 전 상태다.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchBatchResponse {
    pub videos: Vec<VideoResult>,
    pub total_videos: usize,
    pub successful_videos: usize,
    pub total_comments: u64,
}

/// 2xx가 아닌 응답의 본문
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
