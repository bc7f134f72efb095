use color_eyre::eyre::{Context, Result};
use mimalloc::MiMalloc;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use crate::api::CommentClient;
use crate::config::{ClientConfig, ConfigOpt};

mod api;
mod command;
mod config;
mod data;
mod error;
mod session;
mod utils;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// ====== CLI 구조체 ======

#[derive(StructOpt, Debug)]
#[structopt(name = "tiktok-comments", about = "TikTok 댓글 조회기")]
pub struct Opt {
    #[structopt(flatten)]
    pub config: ConfigOpt,

    #[structopt(subcommand)]
    pub mode: Mode,
}

#[derive(StructOpt, Debug)]
pub enum Mode {
    /// 비디오 하나의 댓글 조회
    #[structopt(name = "fetch")]
    Fetch(command::fetch::FetchOpt),

    /// 여러 비디오(최대 10개)의 댓글을 한 번에 조회
    #[structopt(name = "batch")]
    Batch(command::batch::BatchOpt),

    /// 인터렉티브 모드
    #[structopt(name = "interactive")]
    Interactive,
}

/// ====== 엔트리포인트 ======

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let opt = Opt::from_args();

    let config = ClientConfig::load(&opt.config);
    tracing::debug!(?config, "loaded client config");
    let client = CommentClient::new(&config)
        .with_context(|| format!("Failed to create client for {}", config.base_url))?;

    match opt.mode {
        Mode::Fetch(opts) => command::fetch::run_fetch(&client, &opts).await?,
        Mode::Batch(opts) => command::batch::run_batch(&client, &opts).await?,
        Mode::Interactive => command::interactive::run_interactive(&client).await?,
    }

    Ok(())
}

/// RUST_LOG가 없으면 경고 이상만 stderr로 출력
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
