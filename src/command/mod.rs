pub mod batch;
pub mod fetch;
pub mod interactive;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};

use crate::data::aggregator::AggregateWarning;
use crate::data::export::{self, ExportFormat, ExportSource};
use crate::data::models::{BatchSummary, Comment};
use crate::data::table;
use crate::error::ExportError;
use crate::session::ResultSet;
use crate::utils;

/// 보관 중인 결과를 파일로 내보내고 경로를 돌려줍니다.
/// 배치 결과의 xlsx는 비디오별 열 묶음(전치) 형태로 씁니다.
pub fn export_result(
    result: &ResultSet,
    format: ExportFormat,
    out_dir: &Path,
    fallback_id: Option<&str>,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(out_dir)?;

    match result {
        ResultSet::Single(video) => {
            let video_id = video
                .video_id
                .as_deref()
                .or(fallback_id)
                .unwrap_or("unknown");
            let path = out_dir.join(export::export_file_name(video_id, format));
            let payload =
                export::to_export_payload(ExportSource::Comments(&video.comments), format)?;
            export::write_payload(&payload, &path)?;
            Ok(path)
        }
        ResultSet::Batch(summary) => {
            let path = out_dir.join(export::batch_file_name(Local::now().naive_local(), format));
            match format {
                ExportFormat::ExcelRows => {
                    export::write_batch_workbook(&summary.videos, &path)?;
                }
                ExportFormat::Json | ExportFormat::Csv => {
                    let payload =
                        export::to_export_payload(ExportSource::Videos(&summary.videos), format)?;
                    export::write_payload(&payload, &path)?;
                }
            }
            Ok(path)
        }
    }
}

/// 댓글 목록 출력 (최대 `limit`개)
pub fn print_comments(comments: &[Comment], limit: usize) {
    if comments.is_empty() {
        println!("(일치하는 댓글이 없습니다)");
        return;
    }

    let now = Utc::now().timestamp();
    for (idx, comment) in comments.iter().take(limit).enumerate() {
        let username = comment
            .author
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| format!(" (@{})", u))
            .unwrap_or_default();
        let mut meta = format!("👍 {}", utils::format_number(comment.likes));
        if comment.reply_count > 0 {
            meta.push_str(&format!(" · 답글 {}", utils::format_number(comment.reply_count)));
        }
        meta.push_str(&format!(
            " · {}",
            utils::format_relative_time(comment.create_time, now)
        ));

        let text = if comment.text.is_empty() {
            "(텍스트 없음)"
        } else {
            comment.text.as_str()
        };

        println!("{}. {}{} · {}", idx + 1, comment.author.nickname, username, meta);
        println!("   {}", text);
    }

    if comments.len() > limit {
        println!("... (총 {}개 중 {}개 표시)", comments.len(), limit);
    }
}

/// 배치 요약과 전치 테이블 출력
pub fn print_batch_summary(summary: &BatchSummary, preview: usize) {
    println!(
        "비디오 {}개 중 {}개 성공 ({:.0}%), 댓글 총 {}개",
        summary.total_videos,
        summary.successful_videos,
        summary.success_rate() * 100.0,
        utils::format_number(summary.total_comments)
    );

    let table = table::to_table(&summary.videos);
    if table.is_empty() {
        println!("(성공한 비디오가 없습니다)");
    } else {
        println!("{}", table::render_table(&table, preview));
    }

    if table.excluded > 0 {
        println!(
            "실패한 비디오 {}개는 표에서 제외되었습니다 ('failures'로 확인)",
            table.excluded
        );
    }
}

pub fn print_failures(summary: &BatchSummary) {
    let mut any = false;
    for video in summary.failed_videos() {
        any = true;
        println!("- {}: {}", video.url, video.error_message());
    }
    if !any {
        println!("(실패한 비디오가 없습니다)");
    }
}

pub fn print_warnings(warnings: &[AggregateWarning]) {
    for warning in warnings {
        utils::log(format!("경고: {}", warning));
    }
}
