use std::fmt;

use crate::data::models::{Comment, VideoResult};

/// 전치 테이블의 고정 행 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Url,
    VideoId,
    CommentCount,
    Comments,
}

impl RowKind {
    pub const ALL: [RowKind; 5] = [
        RowKind::Title,
        RowKind::Url,
        RowKind::VideoId,
        RowKind::CommentCount,
        RowKind::Comments,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Url => "url",
            Self::VideoId => "video_id",
            Self::CommentCount => "comment_count",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 테이블의 한 열 (성공한 비디오 하나)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn<'a> {
    pub title: String,
    pub video: &'a VideoResult,
}

impl<'a> TableColumn<'a> {
    pub fn comments(&self) -> &'a [Comment] {
        &self.video.comments
    }

    /// 댓글 행을 제외한 행의 셀 텍스트
    pub fn cell(&self, row: RowKind) -> String {
        match row {
            RowKind::Title => self.title.clone(),
            RowKind::Url => self.video.url.clone(),
            RowKind::VideoId => self.video.video_id.clone().unwrap_or_default(),
            RowKind::CommentCount => self.video.total_comments.to_string(),
            RowKind::Comments => format!("{} comments", self.video.comments.len()),
        }
    }
}

/// 비디오 × 속성 전치 테이블 (비디오 하나가 열 하나)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTable<'a> {
    pub columns: Vec<TableColumn<'a>>,
    /// 실패해서 테이블에서 빠진 비디오 수
    pub excluded: usize,
}

impl VideoTable<'_> {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 가장 긴 댓글 목록의 길이 (댓글 행 수)
    pub fn max_comments(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.video.comments.len())
            .max()
            .unwrap_or(0)
    }
}

/// 성공한 비디오만 열로 만듭니다. 실패한 비디오는 빈 열로도 넣지 않습니다.
pub fn to_table(videos: &[VideoResult]) -> VideoTable<'_> {
    let columns = videos
        .iter()
        .filter(|v| v.success)
        .enumerate()
        .map(|(idx, video)| TableColumn {
            title: format!("Video {}", idx + 1),
            video,
        })
        .collect::<Vec<_>>();

    VideoTable {
        excluded: videos.len() - columns.len(),
        columns,
    }
}

/// 터미널 출력용. 행마다 라벨 한 칸 + 비디오별 한 칸.
pub fn render_table(table: &VideoTable<'_>, comment_preview: usize) -> String {
    const CELL_WIDTH: usize = 36;

    let fit = |text: &str| -> String {
        let mut out: String = text.chars().take(CELL_WIDTH).collect();
        let len = out.chars().count();
        out.extend(std::iter::repeat(' ').take(CELL_WIDTH - len));
        out
    };

    let mut lines = Vec::new();
    for row in RowKind::ALL {
        let mut line = format!("{:<14}", row.label());
        for column in &table.columns {
            line.push_str(" | ");
            line.push_str(&fit(&column.cell(row)));
        }
        lines.push(line.trim_end().to_string());
    }

    for idx in 0..table.max_comments().min(comment_preview) {
        let mut line = format!("{:<14}", format!("  #{}", idx + 1));
        for column in &table.columns {
            let text = column
                .comments()
                .get(idx)
                .map(|c| format!("{}: {}", c.author.nickname, c.text.replace('\n', " ")))
                .unwrap_or_default();
            line.push_str(" | ");
            line.push_str(&fit(&text));
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::fixtures::{comment, failed, video};
    use crate::data::models::BatchSummary;

    fn batch() -> Vec<VideoResult> {
        vec![
            video("https://www.tiktok.com/@a/video/1", "1", vec![comment("A", "a", 1, 1)]),
            failed("https://www.tiktok.com/@a/video/2", "private"),
            video(
                "https://www.tiktok.com/@a/video/3",
                "3",
                vec![comment("B", "b", 2, 2), comment("C", "c", 3, 3)],
            ),
        ]
    }

    #[test]
    fn test_failed_video_is_excluded() {
        let videos = batch();
        let summary = BatchSummary::from_videos(videos.clone());
        let table = to_table(&videos);

        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.excluded, 1);
        assert_eq!(summary.successful_videos, 2);
        assert_eq!(table.columns[1].cell(RowKind::VideoId), "3");
        assert_eq!(table.columns[1].cell(RowKind::Title), "Video 2");
        assert_eq!(table.max_comments(), 2);
    }

    #[test]
    fn test_cells_per_row_kind() {
        let videos = batch();
        let table = to_table(&videos);
        let column = &table.columns[0];

        assert_eq!(column.cell(RowKind::Url), "https://www.tiktok.com/@a/video/1");
        assert_eq!(column.cell(RowKind::CommentCount), "1");
        assert_eq!(column.cell(RowKind::Comments), "1 comments");
    }

    #[test]
    fn test_all_failed_gives_empty_table() {
        let videos = vec![failed("https://vm.tiktok.com/x", "gone")];
        let table = to_table(&videos);
        assert!(table.is_empty());
        assert_eq!(table.excluded, 1);
        assert_eq!(table.max_comments(), 0);
    }

    #[test]
    fn test_render_table_has_fixed_rows() {
        let videos = batch();
        let rendered = render_table(&to_table(&videos), 1);
        let labels: Vec<_> = rendered
            .lines()
            .map(|l| l.split(" | ").next().unwrap_or("").trim())
            .collect();
        assert_eq!(
            labels,
            vec!["title", "url", "video_id", "comment_count", "comments", "#1"]
        );
    }
}
