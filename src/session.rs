use crate::data::aggregator::Aggregated;
use crate::data::models::{BatchSummary, Comment, VideoResult};
use crate::data::view::{self, SortKey};
use crate::error::RetrievalError;

/// 현재 보관 중인 조회 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSet {
    Single(VideoResult),
    Batch(BatchSummary),
}

/// 발급된 요청의 세대 번호
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

/// 응답 적용 결과
#[derive(Debug)]
pub enum Completion {
    Applied,
    /// 더 새로운 요청이나 clear 이후에 도착한 응답이라 버림
    Stale,
    /// 오류. 이전 결과는 그대로 남는다.
    Failed(RetrievalError),
}

/// 세션 상태. 조회 결과와 보기 설정을 소유하며 한 태스크에서만 다룬다.
#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    in_flight: Option<u64>,
    current: Option<ResultSet>,
    pub search: String,
    pub sort: SortKey,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 진행 중인 요청이 없을 때만 새 요청을 받습니다.
    pub fn try_begin(&mut self) -> Option<RequestTicket> {
        if self.is_busy() {
            return None;
        }
        Some(self.begin())
    }

    /// 새 세대를 발급합니다. 이전 세대의 응답은 이후 모두 버려집니다.
    pub fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        RequestTicket {
            generation: self.generation,
        }
    }

    /// 응답을 적용합니다. 최신 세대의 응답만 반영합니다.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ResultSet, RetrievalError>,
    ) -> Completion {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                latest = self.generation,
                "discarding superseded response"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                self.current = Some(result);
                Completion::Applied
            }
            Err(e) => Completion::Failed(e),
        }
    }

    /// 단일 조회 결과 적용 편의 함수
    pub fn complete_single(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<VideoResult, RetrievalError>,
    ) -> Completion {
        self.complete(ticket, outcome.map(ResultSet::Single))
    }

    /// 배치 조회 결과 적용 편의 함수
    pub fn complete_batch(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Aggregated, RetrievalError>,
    ) -> Completion {
        self.complete(ticket, outcome.map(|a| ResultSet::Batch(a.summary)))
    }

    /// 결과를 비우고, 진행 중인 요청이 있으면 그 응답도 무효화합니다.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.current = None;
        self.search.clear();
        self.sort = SortKey::default();
    }

    pub fn current(&self) -> Option<&ResultSet> {
        self.current.as_ref()
    }

    /// 보관 중인 모든 댓글 (배치면 성공한 비디오 순서대로 이어 붙임)
    pub fn comments(&self) -> Vec<Comment> {
        match &self.current {
            Some(ResultSet::Single(video)) => video.comments.clone(),
            Some(ResultSet::Batch(summary)) => summary
                .videos
                .iter()
                .filter(|v| v.success)
                .flat_map(|v| v.comments.iter().cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// 현재 검색어와 정렬로 다시 계산한 댓글 목록
    pub fn visible_comments(&self) -> Vec<Comment> {
        view::filter_and_sort(&self.comments(), &self.search, self.sort)
    }

    /// 단일 모드의 비디오 ID
    pub fn video_id(&self) -> Option<&str> {
        match &self.current {
            Some(ResultSet::Single(video)) => video.video_id.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::fixtures::{comment, failed, video};

    fn single(id: &str) -> VideoResult {
        video(
            &format!("https://www.tiktok.com/@a/video/{}", id),
            id,
            vec![comment("A", "alpha", 1, 10), comment("B", "beta", 5, 20)],
        )
    }

    #[test]
    fn test_applies_latest_response() {
        let mut session = Session::new();
        let ticket = session.try_begin().unwrap();
        assert!(session.is_busy());

        let completion = session.complete_single(ticket, Ok(single("1")));
        assert!(matches!(completion, Completion::Applied));
        assert!(!session.is_busy());
        assert_eq!(session.video_id(), Some("1"));
    }

    #[test]
    fn test_try_begin_refuses_while_in_flight() {
        let mut session = Session::new();
        let _ticket = session.try_begin().unwrap();
        assert!(session.try_begin().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = Session::new();
        let old = session.begin();
        let new = session.begin();

        assert!(matches!(
            session.complete_single(new, Ok(single("2"))),
            Completion::Applied
        ));
        assert!(matches!(
            session.complete_single(old, Ok(single("1"))),
            Completion::Stale
        ));
        assert_eq!(session.video_id(), Some("2"));
    }

    #[test]
    fn test_response_after_clear_is_discarded() {
        let mut session = Session::new();
        let ticket = session.begin();
        session.clear();

        assert!(matches!(
            session.complete_single(ticket, Ok(single("1"))),
            Completion::Stale
        ));
        assert!(session.current().is_none());
    }

    #[test]
    fn test_failure_keeps_previous_results() {
        let mut session = Session::new();
        let ticket = session.begin();
        session.complete_single(ticket, Ok(single("1")));

        let ticket = session.begin();
        let completion = session.complete_single(
            ticket,
            Err(RetrievalError::Transport {
                status: Some(500),
                message: "boom".to_string(),
            }),
        );

        assert!(matches!(completion, Completion::Failed(_)));
        assert!(!session.is_busy());
        assert_eq!(session.video_id(), Some("1"));
    }

    #[test]
    fn test_visible_comments_follow_view_state() {
        let mut session = Session::new();
        let ticket = session.begin();
        session.complete_single(ticket, Ok(single("1")));

        session.sort = SortKey::Likes;
        let nicknames: Vec<_> = session
            .visible_comments()
            .into_iter()
            .map(|c| c.author.nickname)
            .collect();
        assert_eq!(nicknames, vec!["B", "A"]);

        session.search = "alp".to_string();
        assert_eq!(session.visible_comments().len(), 1);
    }

    #[test]
    fn test_batch_comments_skip_failed_videos() {
        let mut session = Session::new();
        let ticket = session.begin();
        let summary = BatchSummary::from_videos(vec![
            single("1"),
            failed("https://vm.tiktok.com/x", "gone"),
            single("3"),
        ]);
        session.complete(ticket, Ok(ResultSet::Batch(summary)));

        assert_eq!(session.comments().len(), 4);
        assert_eq!(session.video_id(), None);
    }
}
