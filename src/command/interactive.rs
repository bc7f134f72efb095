use std::io::{self, Write};
use std::path::PathBuf;

use color_eyre::eyre::Result;

use crate::api::CommentClient;
use crate::data::export::ExportFormat;
use crate::data::url_set;
use crate::data::view::{self, SortKey};
use crate::error::RetrievalError;
use crate::session::{Completion, ResultSet, Session};
use crate::utils;

/// 인터렉티브 모드 상태. 입력 중인 URL 원문과 세션을 함께 소유한다.
struct Repl<'a> {
    client: &'a CommentClient,
    session: Session,
    /// 배치 입력 원문. URL 목록은 편집될 때마다 여기서 다시 계산한다.
    raw_urls: String,
}

/// 인터렉티브 모드 실행
pub async fn run_interactive(client: &CommentClient) -> Result<()> {
    utils::log("인터렉티브 모드 시작");
    println!("TikTok 댓글 조회기 - 인터렉티브 모드");
    println!("도움말: 'help' 입력");
    println!("종료: 'exit' 또는 'quit' 입력\n");

    let mut repl = Repl {
        client,
        session: Session::new(),
        raw_urls: String::new(),
    };

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts[0].to_lowercase();
        let args = &parts[1..];

        match command.as_str() {
            "exit" | "quit" | "q" => {
                println!("종료합니다.");
                break;
            }
            "help" | "h" => print_help(),
            "add" | "a" => repl.add_urls(args),
            "urls" | "u" => repl.list_urls(),
            "fetch" | "f" => {
                if args.is_empty() {
                    println!("사용법: fetch <TikTok 비디오 URL>");
                    continue;
                }
                repl.fetch_single(args[0]).await;
            }
            "batch" | "b" => repl.fetch_batch().await,
            "search" | "s" => {
                repl.session.search = args.join(" ");
                repl.show(20);
            }
            "sort" => match args.first().map(|s| s.parse::<SortKey>()) {
                Some(Ok(key)) => {
                    repl.session.sort = key;
                    repl.show(20);
                }
                Some(Err(e)) => println!("오류: {}", e),
                None => println!("사용법: sort <relevance|likes|time>"),
            },
            "show" => {
                let limit = args.first().and_then(|s| s.parse().ok()).unwrap_or(20);
                repl.show(limit);
            }
            "table" | "t" => repl.table(),
            "failures" => match repl.session.current() {
                Some(ResultSet::Batch(summary)) => super::print_failures(summary),
                _ => println!("배치 결과가 없습니다."),
            },
            "copy" | "c" => match view::to_clipboard_text(&repl.session.visible_comments()) {
                Ok(text) => {
                    println!("----- 복사용 텍스트 -----");
                    println!("{}", text);
                    println!("-------------------------");
                }
                Err(e) => println!("복사 실패: {}", e),
            },
            "export" | "e" => {
                let Some(format) = args.first() else {
                    println!("사용법: export <json|csv|xlsx> [폴더]");
                    continue;
                };
                match format.parse::<ExportFormat>() {
                    Ok(format) => {
                        let out_dir = PathBuf::from(args.get(1).copied().unwrap_or("."));
                        repl.export(format, out_dir);
                    }
                    Err(e) => println!("오류: {}", e),
                }
            }
            "clear" => {
                repl.session.clear();
                repl.raw_urls.clear();
                println!("결과와 입력을 모두 지웠습니다.");
            }
            _ => {
                println!("알 수 없는 명령어: {}", command);
                println!("도움말: 'help' 입력");
            }
        }
        println!(); // 빈 줄 추가
    }

    Ok(())
}

impl Repl<'_> {
    fn add_urls(&mut self, args: &[&str]) {
        if args.is_empty() {
            println!("사용법: add <URL> [URL ...]");
            return;
        }
        for arg in args {
            self.raw_urls.push_str(arg);
            self.raw_urls.push('\n');
        }

        let count = url_set::count(&self.raw_urls);
        let max = self.client.max_batch();
        println!("유효한 URL: {}/{}개", count, max);
        if count > max {
            println!("최대 {}개까지 처리할 수 있습니다. 'clear' 후 다시 입력해주세요.", max);
        }
    }

    fn list_urls(&self) {
        let urls = url_set::parse(&self.raw_urls);
        if urls.is_empty() {
            println!("(입력된 유효한 URL이 없습니다)");
            return;
        }
        for (idx, url) in urls.iter().enumerate() {
            println!("{}. {}", idx + 1, url);
        }
    }

    async fn fetch_single(&mut self, url: &str) {
        let Some(ticket) = self.session.try_begin() else {
            println!("이미 진행 중인 요청이 있습니다.");
            return;
        };

        let spinner = utils::create_spinner("댓글을 가져오는 중...");
        let outcome = self.client.fetch_one(url).await;
        spinner.finish_and_clear();

        match self.session.complete_single(ticket, outcome) {
            Completion::Applied => {
                println!(
                    "비디오 {}: 댓글 {}개",
                    self.session.video_id().unwrap_or("-"),
                    utils::format_number(self.session.comments().len() as u64)
                );
                self.show(20);
            }
            Completion::Stale => {}
            Completion::Failed(e) => print_retrieval_error(&e),
        }
    }

    async fn fetch_batch(&mut self) {
        let urls = match url_set::parse_for_batch(&self.raw_urls, self.client.max_batch()) {
            Ok(urls) => urls,
            Err(e) => {
                println!("오류: {}", e);
                return;
            }
        };

        let Some(ticket) = self.session.try_begin() else {
            println!("이미 진행 중인 요청이 있습니다.");
            return;
        };

        let spinner =
            utils::create_spinner(&format!("비디오 {}개의 댓글을 가져오는 중...", urls.len()));
        let outcome = self.client.fetch_batch(&urls).await;
        spinner.finish_and_clear();

        if let Ok(aggregated) = &outcome {
            super::print_warnings(&aggregated.warnings);
        }

        match self.session.complete_batch(ticket, outcome) {
            Completion::Applied => self.table(),
            Completion::Stale => {}
            Completion::Failed(e) => print_retrieval_error(&e),
        }
    }

    fn show(&self, limit: usize) {
        if self.session.current().is_none() {
            println!("조회된 결과가 없습니다.");
            return;
        }
        let visible = self.session.visible_comments();
        println!(
            "검색어: '{}', 정렬: {} ({}개)",
            self.session.search,
            self.session.sort,
            visible.len()
        );
        super::print_comments(&visible, limit);
    }

    fn table(&self) {
        match self.session.current() {
            Some(ResultSet::Batch(summary)) => super::print_batch_summary(summary, 3),
            Some(ResultSet::Single(_)) => println!("표는 배치 결과에서만 볼 수 있습니다."),
            None => println!("조회된 결과가 없습니다."),
        }
    }

    fn export(&self, format: ExportFormat, out_dir: PathBuf) {
        let Some(result) = self.session.current() else {
            println!("내보낼 결과가 없습니다.");
            return;
        };

        match super::export_result(result, format, &out_dir, None) {
            Ok(path) => println!("{} 파일로 내보냄: {:?}", format, path),
            Err(e) => println!("내보내기 실패: {}", e),
        }
    }
}

fn print_retrieval_error(err: &RetrievalError) {
    println!("오류: {}", err);
    if err.is_retryable() {
        println!("잠시 후 다시 시도해주세요.");
    }
}

/// 도움말 출력
fn print_help() {
    println!("\n=== 사용 가능한 명령어 ===");
    println!("  add <URL...>           - 배치 입력에 URL 추가 (최대 10개)");
    println!("  urls                   - 현재 유효한 URL 목록");
    println!("  batch                  - 입력된 URL들을 한 번에 조회");
    println!("  fetch <URL>            - 비디오 하나의 댓글 조회");
    println!("  search [검색어]        - 본문/닉네임 검색 (비우면 전체)");
    println!("  sort <relevance|likes|time> - 정렬 기준 변경");
    println!("  show [n]               - 현재 댓글 목록 출력 (기본값: 20개)");
    println!("  table                  - 배치 결과 표 출력");
    println!("  failures               - 실패한 비디오와 오류 메시지");
    println!("  copy                   - 보이는 댓글을 복사용 텍스트로 출력");
    println!("  export <json|csv|xlsx> [폴더] - 결과 파일로 내보내기");
    println!("  clear                  - 결과와 입력 초기화");
    println!("  help                   - 이 도움말 출력");
    println!("  exit / quit            - 프로그램 종료");
    println!();
}
