use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

/// ====== 공통 로그 함수 (로컬 시간 기준) ======
pub fn log(msg: impl AsRef<str>) {
    let now = Local::now();
    println!("{} {}", now.format("%Y-%m-%d %H:%M:%S"), msg.as_ref());
}

/// ====== 공통 Spinner 생성 함수 ======
/// 응답을 기다리는 동안 돌아가는 스피너를 생성합니다.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// 천 단위 구분 기호를 넣습니다. 예: 1234567 -> "1,234,567"
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 현재 시각 기준 상대 시간. 예: "3시간 전"
pub fn format_relative_time(timestamp: i64, now: i64) -> String {
    let diff = now - timestamp;
    match diff {
        d if d < 60 => "방금 전".to_string(),
        d if d < 3600 => format!("{}분 전", d / 60),
        d if d < 86400 => format!("{}시간 전", d / 3600),
        d if d < 2_592_000 => format!("{}일 전", d / 86400),
        d if d < 31_536_000 => format!("{}개월 전", d / 2_592_000),
        d => format!("{}년 전", d / 31_536_000),
    }
}
