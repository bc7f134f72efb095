use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use serde::Serialize;

use crate::data::models::{Comment, VideoResult};
use crate::data::table::{self, RowKind, VideoTable};
use crate::error::ExportError;

/// 평탄화된 행의 열 순서
pub const EXPORT_COLUMNS: [&str; 6] = [
    "author_nickname",
    "author_username",
    "text",
    "likes",
    "reply_count",
    "create_time",
];

/// 내보내기 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    ExcelRows,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::ExcelRows => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::ExcelRows),
            other => Err(format!("unknown export format '{}' (json, csv, xlsx)", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 내보낼 대상: 단일 비디오의 댓글 목록 또는 배치의 비디오 목록
#[derive(Debug, Clone, Copy)]
pub enum ExportSource<'a> {
    Comments(&'a [Comment]),
    Videos(&'a [VideoResult]),
}

impl ExportSource<'_> {
    fn is_empty(&self) -> bool {
        match self {
            Self::Comments(comments) => comments.is_empty(),
            Self::Videos(videos) => videos.is_empty(),
        }
    }

    fn comments(&self) -> Vec<&Comment> {
        match self {
            Self::Comments(comments) => comments.iter().collect(),
            Self::Videos(videos) => videos
                .iter()
                .filter(|v| v.success)
                .flat_map(|v| v.comments.iter())
                .collect(),
        }
    }
}

/// 작성자 필드를 펼친 한 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub author_nickname: String,
    pub author_username: String,
    pub text: String,
    pub likes: u64,
    pub reply_count: u64,
    pub create_time: i64,
}

impl From<&Comment> for ExportRow {
    fn from(comment: &Comment) -> Self {
        Self {
            author_nickname: comment.author.nickname.clone(),
            author_username: comment.author.username.clone().unwrap_or_default(),
            text: comment.text.clone(),
            likes: comment.likes,
            reply_count: comment.reply_count,
            create_time: comment.create_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportPayload {
    /// 원본 시퀀스를 그대로 직렬화한 JSON
    Json(String),
    Csv(String),
    ExcelRows(Vec<ExportRow>),
}

/// ====== 페이로드 생성 ======

pub fn to_export_payload(
    source: ExportSource<'_>,
    format: ExportFormat,
) -> Result<ExportPayload, ExportError> {
    if source.is_empty() {
        return Err(ExportError::Empty);
    }

    match format {
        ExportFormat::Json => {
            let json = match source {
                ExportSource::Comments(comments) => serde_json::to_string_pretty(comments)?,
                ExportSource::Videos(videos) => serde_json::to_string_pretty(videos)?,
            };
            Ok(ExportPayload::Json(json))
        }
        ExportFormat::Csv => {
            let rows = flatten(&source)?;
            Ok(ExportPayload::Csv(rows_to_csv(&rows)?))
        }
        ExportFormat::ExcelRows => Ok(ExportPayload::ExcelRows(flatten(&source)?)),
    }
}

/// 행 형식은 댓글이 하나도 없으면 내보내지 않는다 (모두 실패한 배치 포함)
fn flatten(source: &ExportSource<'_>) -> Result<Vec<ExportRow>, ExportError> {
    let rows: Vec<ExportRow> = source.comments().into_iter().map(ExportRow::from).collect();
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(rows)
}

fn rows_to_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    // 행이 없어도 헤더는 남긴다
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// ====== 파일 이름 ======

/// `tiktok_comments_<video_id>.<ext>`
pub fn export_file_name(video_id: &str, format: ExportFormat) -> String {
    format!("tiktok_comments_{}.{}", video_id, format.extension())
}

/// `tiktok_comments_batch_<YYYYmmdd_HHMMSS>.<ext>`
pub fn batch_file_name(now: NaiveDateTime, format: ExportFormat) -> String {
    format!(
        "tiktok_comments_batch_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// ====== 파일 쓰기 ======

/// 페이로드를 파일로 씁니다. CSV는 스프레드시트 호환을 위해 BOM을 붙입니다.
pub fn write_payload<P: AsRef<Path>>(payload: &ExportPayload, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    match payload {
        ExportPayload::Json(json) => fs::write(path, json)?,
        ExportPayload::Csv(csv) => fs::write(path, format!("\u{feff}{}", csv))?,
        ExportPayload::ExcelRows(rows) => write_rows_workbook(rows, path)?,
    }
    Ok(())
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x366092))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn info_format() -> Format {
    Format::new()
        .set_font_size(10)
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn body_format() -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Top)
        .set_text_wrap()
}

/// 평탄화된 행을 시트 하나에 씁니다.
fn write_rows_workbook(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let header = header_format();
    let body = body_format();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("TikTok Comments")?;

    for (col, name) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    sheet.set_column_width(2, 60)?;

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string_with_format(r, 0, row.author_nickname.as_str(), &body)?;
        sheet.write_string_with_format(r, 1, row.author_username.as_str(), &body)?;
        sheet.write_string_with_format(r, 2, row.text.as_str(), &body)?;
        sheet.write_number_with_format(r, 3, row.likes as f64, &body)?;
        sheet.write_number_with_format(r, 4, row.reply_count as f64, &body)?;
        sheet.write_number_with_format(r, 5, row.create_time as f64, &body)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// 비디오마다 4칸(작성자, 본문, 좋아요, 답글)
const COLUMNS_PER_VIDEO: u16 = 4;

/// 배치 결과를 전치 테이블 형태의 워크북으로 씁니다.
/// 성공한 비디오만 열 묶음이 되고, 댓글은 인덱스별로 한 행씩 나란히 놓입니다.
pub fn write_batch_workbook<P: AsRef<Path>>(
    videos: &[VideoResult],
    path: P,
) -> Result<VideoTable<'_>, ExportError> {
    let table = table::to_table(videos);
    if table.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("TikTok Comments Summary")?;
    fill_batch_sheet(sheet, &table)?;
    workbook.save(path.as_ref())?;

    Ok(table)
}

fn fill_batch_sheet(sheet: &mut Worksheet, table: &VideoTable<'_>) -> Result<(), ExportError> {
    let header = header_format();
    let info = info_format();
    let body = body_format();

    sheet.set_column_width(0, 20)?;

    // 0행: 비디오 제목
    sheet.write_string_with_format(0, 0, "Video", &header)?;
    // 1행: url / id / 댓글 수
    sheet.write_string_with_format(1, 0, "Video info", &info)?;
    sheet.set_row_height(1, 80)?;
    // 2행: 하위 열 제목
    sheet.write_string_with_format(2, 0, RowKind::Comments.label(), &header)?;

    for (idx, column) in table.columns.iter().enumerate() {
        let first = 1 + idx as u16 * COLUMNS_PER_VIDEO;
        let last = first + COLUMNS_PER_VIDEO - 1;

        sheet.merge_range(0, first, 0, last, &column.cell(RowKind::Title), &header)?;

        let info_text = [RowKind::Url, RowKind::VideoId, RowKind::CommentCount]
            .into_iter()
            .map(|row| format!("{}: {}", row.label(), column.cell(row)))
            .collect::<Vec<_>>()
            .join("\n");
        sheet.merge_range(1, first, 1, last, &info_text, &info)?;

        let sub_headers = ["author", "text", "likes", "replies"];
        for (offset, name) in sub_headers.iter().enumerate() {
            let col = first + offset as u16;
            sheet.write_string_with_format(
                2,
                col,
                format!("{}-{}", column.title, name),
                &header,
            )?;
        }
        sheet.set_column_width(first, 20)?;
        sheet.set_column_width(first + 1, 40)?;
        sheet.set_column_width(first + 2, 10)?;
        sheet.set_column_width(first + 3, 10)?;
    }

    for comment_idx in 0..table.max_comments() {
        let row = 3 + comment_idx as u32;
        sheet.write_string_with_format(row, 0, format!("Comment {}", comment_idx + 1), &body)?;

        for (idx, column) in table.columns.iter().enumerate() {
            let first = 1 + idx as u16 * COLUMNS_PER_VIDEO;
            match column.comments().get(comment_idx) {
                Some(comment) => {
                    sheet.write_string_with_format(
                        row,
                        first,
                        comment.author.nickname.as_str(),
                        &body,
                    )?;
                    sheet.write_string_with_format(row, first + 1, comment.text.as_str(), &body)?;
                    sheet.write_number_with_format(row, first + 2, comment.likes as f64, &body)?;
                    sheet.write_number_with_format(
                        row,
                        first + 3,
                        comment.reply_count as f64,
                        &body,
                    )?;
                }
                None => {
                    for offset in 0..COLUMNS_PER_VIDEO {
                        sheet.write_blank(row, first + offset, &body)?;
                    }
                }
            }
        }
    }

    sheet.set_freeze_panes(3, 0)?;
    Ok(())
}
