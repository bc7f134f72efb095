use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use structopt::StructOpt;

use crate::api::CommentClient;
use crate::data::export::ExportFormat;
use crate::data::url_set;
use crate::data::view::{self, SortKey};
use crate::session::{Completion, Session};
use crate::utils;

/// 단일 비디오 조회 옵션
#[derive(StructOpt, Debug)]
pub struct FetchOpt {
    /// TikTok 비디오 URL
    pub url: String,

    /// 본문 또는 닉네임 검색어
    #[structopt(long, default_value = "")]
    pub search: String,

    /// 정렬 기준 (relevance, likes, time)
    #[structopt(long, default_value = "relevance")]
    pub sort: SortKey,

    /// 출력할 최대 댓글 수
    #[structopt(long, default_value = "20")]
    pub limit: usize,

    /// 내보내기 형식 (json, csv, xlsx)
    #[structopt(long)]
    pub export: Option<ExportFormat>,

    /// 내보내기 폴더
    #[structopt(long, parse(from_os_str), default_value = ".")]
    pub out_dir: PathBuf,

    /// 보이는 댓글을 복사용 텍스트로 출력
    #[structopt(long)]
    pub copy: bool,

    /// 복사용 텍스트를 파일로 저장
    #[structopt(long, parse(from_os_str))]
    pub copy_to: Option<PathBuf>,
}

/// 단일 조회 모드 실행
pub async fn run_fetch(client: &CommentClient, opts: &FetchOpt) -> Result<()> {
    let mut session = Session::new();
    session.search = opts.search.clone();
    session.sort = opts.sort;

    utils::log(format!("댓글 조회 시작: {}", opts.url));
    let ticket = session.begin();
    let spinner = utils::create_spinner("댓글을 가져오는 중...");
    let outcome = client.fetch_one(&opts.url).await;
    spinner.finish_and_clear();

    match session.complete_single(ticket, outcome) {
        Completion::Applied => {}
        Completion::Stale => return Ok(()),
        Completion::Failed(e) => {
            return Err(e).with_context(|| format!("Failed to fetch comments for {}", opts.url))
        }
    }

    let total = session.comments().len();
    let visible = session.visible_comments();
    utils::log(format!(
        "비디오 {}: 댓글 {}개 (표시 {}개, 정렬: {})",
        session.video_id().unwrap_or("-"),
        utils::format_number(total as u64),
        visible.len(),
        session.sort
    ));
    super::print_comments(&visible, opts.limit);

    if let Some(format) = opts.export {
        if let Some(result) = session.current() {
            let fallback = url_set::extract_video_id(&opts.url);
            match super::export_result(result, format, &opts.out_dir, fallback.as_deref()) {
                Ok(path) => utils::log(format!("{} 파일로 내보냄: {:?}", format, path)),
                Err(e) => utils::log(format!("내보내기 실패: {}", e)),
            }
        }
    }

    if opts.copy || opts.copy_to.is_some() {
        match view::to_clipboard_text(&visible) {
            Ok(text) => match &opts.copy_to {
                Some(path) => {
                    fs::write(path, &text)
                        .with_context(|| format!("Failed to write copy text: {:?}", path))?;
                    utils::log(format!("복사용 텍스트 저장: {:?}", path));
                }
                None => {
                    println!("\n----- 복사용 텍스트 -----");
                    println!("{}", text);
                    println!("-------------------------");
                }
            },
            Err(e) => utils::log(format!("복사 실패: {}", e)),
        }
    }

    Ok(())
}
