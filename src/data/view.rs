use std::fmt;
use std::str::FromStr;

use crate::data::models::Comment;
use crate::error::ClipboardError;

/// 댓글 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// 받은 순서 그대로
    #[default]
    Relevance,
    /// 좋아요 많은 순
    Likes,
    /// 최신순
    Time,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" | "default" => Ok(Self::Relevance),
            "likes" => Ok(Self::Likes),
            "time" | "latest" => Ok(Self::Time),
            other => Err(format!(
                "unknown sort key '{}' (relevance, likes, time)",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relevance => write!(f, "relevance"),
            Self::Likes => write!(f, "likes"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// 검색어로 거르고 정렬합니다.
/// 검색어는 댓글 본문 또는 작성자 닉네임에 대소문자 구분 없이 부분 일치하면 통과합니다.
/// 정렬은 안정 정렬이라 동점이면 원래 순서를 유지합니다.
pub fn filter_and_sort(comments: &[Comment], search: &str, sort: SortKey) -> Vec<Comment> {
    let term = search.trim().to_lowercase();

    let mut filtered: Vec<Comment> = comments
        .iter()
        .filter(|c| {
            term.is_empty()
                || c.text.to_lowercase().contains(&term)
                || c.author.nickname.to_lowercase().contains(&term)
        })
        .cloned()
        .collect();

    match sort {
        SortKey::Relevance => {}
        SortKey::Likes => filtered.sort_by(|a, b| b.likes.cmp(&a.likes)),
        SortKey::Time => filtered.sort_by(|a, b| b.create_time.cmp(&a.create_time)),
    }

    filtered
}

/// 클립보드용 텍스트. 댓글마다 `닉네임: 본문 👍 좋아요` 한 블록, 블록 사이는 빈 줄.
pub fn to_clipboard_text(comments: &[Comment]) -> Result<String, ClipboardError> {
    if comments.is_empty() {
        return Err(ClipboardError::NothingToCopy);
    }

    Ok(comments
        .iter()
        .map(|c| format!("{}: {} 👍 {}", c.author.nickname, c.text, c.likes))
        .collect::<Vec<_>>()
        .join("\n\n"))
}
