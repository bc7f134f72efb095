use std::fmt;

use crate::api::models::FetchBatchResponse;
use crate::data::models::BatchSummary;
use crate::error::RetrievalError;

/// 백엔드 보고 값과 재계산 값이 어긋날 때의 경고.
/// 어느 쪽이 맞는지는 판단하지 않고 그대로 알린다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateWarning {
    SuccessfulVideosMismatch { reported: usize, computed: usize },
    TotalCommentsMismatch { reported: u64, computed: u64 },
    /// 성공한 비디오의 total_comments와 실제 받은 댓글 수가 다름 (잘린 조회 등)
    CommentCountMismatch { url: String, reported: u64, received: usize },
    /// 실패한 비디오에 댓글이 들어 있어 비웠음
    FailedVideoHadComments { url: String, dropped: usize },
}

impl fmt::Display for AggregateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuccessfulVideosMismatch { reported, computed } => write!(
                f,
                "backend reported {} successful videos, counted {}",
                reported, computed
            ),
            Self::TotalCommentsMismatch { reported, computed } => write!(
                f,
                "backend reported {} comments in total, counted {}",
                reported, computed
            ),
            Self::CommentCountMismatch {
                url,
                reported,
                received,
            } => write!(
                f,
                "{}: total_comments is {} but {} comments were received",
                url, reported, received
            ),
            Self::FailedVideoHadComments { url, dropped } => {
                write!(f, "{}: dropped {} comments from a failed video", url, dropped)
            }
        }
    }
}

/// 집계 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregated {
    pub summary: BatchSummary,
    pub warnings: Vec<AggregateWarning>,
}

/// 배치 응답을 검증하고 요약으로 변환합니다.
///
/// 비디오 수가 보고된 `total_videos`와 다르면 프로토콜 불일치로 보고 실패합니다.
/// 나머지 합계는 `videos`에서 다시 계산하며, 어긋나면 경고로 남깁니다.
pub fn aggregate(response: FetchBatchResponse) -> Result<Aggregated, RetrievalError> {
    if response.videos.len() != response.total_videos {
        return Err(RetrievalError::Consistency {
            reported: response.total_videos,
            received: response.videos.len(),
        });
    }

    let mut warnings = Vec::new();
    let mut videos = response.videos;

    for video in &mut videos {
        if !video.success {
            video.video_id = None;
        }
        if !video.success && !video.comments.is_empty() {
            warnings.push(AggregateWarning::FailedVideoHadComments {
                url: video.url.clone(),
                dropped: video.comments.len(),
            });
            video.comments.clear();
        }

        if video.success && video.total_comments != video.comments.len() as u64 {
            warnings.push(AggregateWarning::CommentCountMismatch {
                url: video.url.clone(),
                reported: video.total_comments,
                received: video.comments.len(),
            });
        }
    }

    let summary = BatchSummary::from_videos(videos);

    if summary.successful_videos != response.successful_videos {
        warnings.push(AggregateWarning::SuccessfulVideosMismatch {
            reported: response.successful_videos,
            computed: summary.successful_videos,
        });
    }
    if summary.total_comments != response.total_comments {
        warnings.push(AggregateWarning::TotalCommentsMismatch {
            reported: response.total_comments,
            computed: summary.total_comments,
        });
    }

    for warning in &warnings {
        tracing::warn!(%warning, "batch totals disagree");
    }

    Ok(Aggregated { summary, warnings })
}
