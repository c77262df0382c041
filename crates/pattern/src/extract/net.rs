//! 네트워크/경로 계열 추출기 — IP, URL, 도메인, 파일 경로, User-Agent

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::Cursor;
use crate::compile::Parser;
use crate::execute::ParseResult;

/// RFC 1035 제약
const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// User-Agent는 product/version 토큰으로 시작해야 합니다.
static USER_AGENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+.^_`|~-]+/\S+").expect("builtin user-agent regex must compile")
});

/// IPv4 / IPv6 주소를 검증하여 문자열로 기록합니다.
///
/// 후보는 endToken 경계까지의 슬라이스이며 `std::net::IpAddr` 파싱으로
/// 검증합니다. 검증 실패 시 커서는 움직이지 않습니다.
pub(crate) fn extract_ip(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let candidate = cursor.until(parser.end_token);
    if candidate.parse::<IpAddr>().is_err() {
        return false;
    }

    result.insert(parser.name.clone(), Value::String(candidate.to_owned()));
    cursor.advance(candidate.len());
    true
}

/// URL을 소비하여 문자열로 기록합니다.
///
/// 공백이 아닌 문자 런을 취해 `scheme://` 접두를 검증합니다.
pub(crate) fn extract_url(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let rest = cursor.rest();
    let len = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let candidate = &rest[..len];

    let Some(scheme_end) = candidate.find("://") else {
        return false;
    };
    let scheme = &candidate[..scheme_end];
    let valid_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme || candidate.len() == scheme_end + 3 {
        return false;
    }

    result.insert(parser.name.clone(), Value::String(candidate.to_owned()));
    cursor.advance(len);
    true
}

/// 도메인 이름을 소비하여 문자열로 기록합니다.
///
/// `[A-Za-z0-9.-]` 런을 취한 뒤 레이블 단위로 검증합니다.
pub(crate) fn extract_domain(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let rest = cursor.rest();
    let len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(*b, b'.' | b'-'))
        .count();
    let candidate = &rest[..len];

    if !is_valid_domain(candidate) {
        return false;
    }

    result.insert(parser.name.clone(), Value::String(candidate.to_owned()));
    cursor.advance(len);
    true
}

fn is_valid_domain(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > MAX_DOMAIN_LEN || !candidate.contains('.') {
        return false;
    }

    candidate.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

/// 파일 경로를 소비하여 문자열로 기록합니다.
///
/// endToken 경계까지 취하며, 경로 구분자(`/`, `\`) 또는 드라이브 문자
/// 접두가 하나는 있어야 합니다.
pub(crate) fn extract_filepath(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let candidate = cursor.until(parser.end_token);
    if candidate.is_empty() {
        return false;
    }

    let has_drive_prefix = candidate.len() >= 3
        && candidate.as_bytes()[0].is_ascii_alphabetic()
        && &candidate[1..3] == ":\\";
    if !candidate.contains('/') && !candidate.contains('\\') && !has_drive_prefix {
        return false;
    }

    result.insert(parser.name.clone(), Value::String(candidate.to_owned()));
    cursor.advance(candidate.len());
    true
}

/// User-Agent 문자열을 소비하여 문자열로 기록합니다.
///
/// User-Agent는 공백을 포함하므로 endToken 경계까지 취한 뒤
/// product/version 형태로 시작하는지 검증합니다.
pub(crate) fn extract_useragent(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let candidate = cursor.until(parser.end_token);
    if !USER_AGENT_RE.is_match(candidate) {
        return false;
    }

    result.insert(parser.name.clone(), Value::String(candidate.to_owned()));
    cursor.advance(candidate.len());
    true
}
