use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use color_eyre::eyre::{Context, Result};
use structopt::StructOpt;

use crate::api::CommentClient;
use crate::data::export::ExportFormat;
use crate::data::url_set;
use crate::session::{Completion, ResultSet, Session};
use crate::utils;

/// 배치 조회 옵션
#[derive(StructOpt, Debug)]
pub struct BatchOpt {
    /// TikTok 비디오 URL들 (없으면 --file 또는 표준 입력에서 읽음)
    pub urls: Vec<String>,

    /// 한 줄에 URL 하나씩 적힌 파일
    #[structopt(long, parse(from_os_str))]
    pub file: Option<PathBuf>,

    /// 내보내기 형식 (json, csv, xlsx)
    #[structopt(long)]
    pub export: Option<ExportFormat>,

    /// 내보내기 폴더
    #[structopt(long, parse(from_os_str), default_value = ".")]
    pub out_dir: PathBuf,

    /// 실패한 비디오와 오류 메시지 출력
    #[structopt(long)]
    pub show_failures: bool,

    /// 표에 미리 보여줄 댓글 행 수
    #[structopt(long, default_value = "3")]
    pub preview: usize,
}

/// 입력 원문을 읽습니다. 인자 → 파일 → 표준 입력 순서.
fn read_raw_input(opts: &BatchOpt) -> Result<String> {
    if !opts.urls.is_empty() {
        return Ok(opts.urls.join("\n"));
    }

    if let Some(path) = &opts.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read url file: {:?}", path));
    }

    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("Failed to read urls from stdin")?;
    Ok(raw)
}

/// 배치 조회 모드 실행
pub async fn run_batch(client: &CommentClient, opts: &BatchOpt) -> Result<()> {
    let raw = read_raw_input(opts)?;
    let urls = url_set::parse_for_batch(&raw, client.max_batch())?;
    utils::log(format!("배치 조회 시작: 유효한 URL {}개", urls.len()));

    let mut session = Session::new();
    let ticket = session.begin();
    let spinner =
        utils::create_spinner(&format!("비디오 {}개의 댓글을 가져오는 중...", urls.len()));
    let outcome = client.fetch_batch(&urls).await;
    spinner.finish_and_clear();

    if let Ok(aggregated) = &outcome {
        super::print_warnings(&aggregated.warnings);
    }

    match session.complete_batch(ticket, outcome) {
        Completion::Applied => {}
        Completion::Stale => return Ok(()),
        Completion::Failed(e) => return Err(e).context("Batch fetch failed"),
    }

    let Some(result) = session.current() else {
        return Ok(());
    };

    if let ResultSet::Batch(summary) = result {
        super::print_batch_summary(summary, opts.preview);
        if opts.show_failures {
            super::print_failures(summary);
        }
    }

    if let Some(format) = opts.export {
        match super::export_result(result, format, &opts.out_dir, None) {
            Ok(path) => utils::log(format!("{} 파일로 내보냄: {:?}", format, path)),
            Err(e) => utils::log(format!("내보내기 실패: {}", e)),
        }
    }

    Ok(())
}
