use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RetrievalError;

/// 배치 요청 한 번에 보낼 수 있는 최대 URL 수
pub const MAX_BATCH_URLS: usize = 10;

/// `*.tiktok.com/<...>/video/<digits>` 형식
static VIDEO_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:[\w-]+\.)*tiktok\.com/(?:[^\s/?#]+/)+video/(\d+)(?:[/?#]\S*)?$")
        .expect("Invalid video url regex")
});

/// `vm.tiktok.com/<token>` 또는 `vt.tiktok.com/<token>` 단축 링크
static SHORT_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:vm|vt)\.tiktok\.com/([\w-]+)/?(?:[?#]\S*)?$")
        .expect("Invalid short url regex")
});

/// URL이 허용 문법 중 하나에 맞는지 확인합니다.
pub fn is_accepted(url: &str) -> bool {
    VIDEO_URL_REGEX.is_match(url) || SHORT_URL_REGEX.is_match(url)
}

/// URL에서 비디오 ID(숫자) 또는 단축 링크 토큰을 추출합니다.
pub fn extract_video_id(url: &str) -> Option<String> {
    let caps = VIDEO_URL_REGEX
        .captures(url)
        .or_else(|| SHORT_URL_REGEX.captures(url))?;
    Some(caps.get(1)?.as_str().to_string())
}

/// 여러 줄 입력을 URL 목록으로 변환합니다.
/// 줄 단위로 자르고 공백 제거, 빈 줄과 허용되지 않는 줄은 버리고, 처음 나온 순서대로 중복을 제거합니다.
/// 개수 제한은 여기서 검사하지 않습니다.
pub fn parse(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && is_accepted(line))
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

/// 실시간 피드백용. 항상 `parse(raw).len()`과 같다.
pub fn count(raw: &str) -> usize {
    parse(raw).len()
}

/// 배치 제출 전 검증. 제한을 넘으면 자르지 않고 오류를 돌려줍니다.
pub fn parse_for_batch(raw: &str, max: usize) -> Result<Vec<String>, RetrievalError> {
    if raw.trim().is_empty() {
        return Err(RetrievalError::Validation(
            "Enter at least one TikTok video URL".to_string(),
        ));
    }

    let urls = parse(raw);
    check_batch_bounds(&urls, max)?;
    Ok(urls)
}

/// URL 목록이 1개 이상 `max`개 이하인지 확인합니다.
pub fn check_batch_bounds(urls: &[String], max: usize) -> Result<(), RetrievalError> {
    if urls.is_empty() {
        return Err(RetrievalError::Validation(
            "No valid TikTok video URL found".to_string(),
        ));
    }
    if urls.len() > max {
        return Err(RetrievalError::Validation(format!(
            "At most {} video URLs can be processed at once (got {})",
            max,
            urls.len()
        )));
    }
    Ok(())
}
