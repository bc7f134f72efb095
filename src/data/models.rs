use serde::{Deserialize, Serialize};

/// ====== 댓글 구조체 ======

/// 댓글 작성자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 아바타 이미지 URL (백엔드가 빈 문자열을 보내는 경우도 있음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// 댓글 한 개. 수신 이후에는 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub author: Author,
    pub likes: u64,
    pub reply_count: u64,
    /// unix 초
    pub create_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time_formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

/// ====== 비디오 결과 구조체 ======

/// URL 하나에 대한 조회 결과 (성공/실패 모두)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub url: String,
    #[serde(default)]
    pub video_id: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl VideoResult {
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("알 수 없는 오류")
    }
}

/// 배치 조회 요약. `videos`로부터 언제든 다시 계산할 수 있다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_videos: usize,
    pub successful_videos: usize,
    pub total_comments: u64,
    pub videos: Vec<VideoResult>,
}

impl BatchSummary {
    /// `videos`에서 합계를 다시 계산하여 요약을 만든다.
    pub fn from_videos(videos: Vec<VideoResult>) -> Self {
        let successful = videos.iter().filter(|v| v.success);
        let successful_videos = successful.clone().count();
        let total_comments = successful.map(|v| v.total_comments).sum();

        Self {
            total_videos: videos.len(),
            successful_videos,
            total_comments,
            videos,
        }
    }

    pub fn failed_videos(&self) -> impl Iterator<Item = &VideoResult> {
        self.videos.iter().filter(|v| !v.success)
    }

    /// 성공률 (0.0 ~ 1.0). 비디오가 없으면 0.
    pub fn success_rate(&self) -> f64 {
        if self.total_videos == 0 {
            return 0.0;
        }
        self.successful_videos as f64 / self.total_videos as f64
    }
}
