//! 타임스탬프 추출기 — chrono 기반 형식 검증

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::Cursor;
use crate::compile::Parser;
use crate::execute::ParseResult;

/// 지원하는 타임스탬프 형식 이름
const KNOWN_FORMATS: &[&str] = &["rfc3339", "rfc2822", "syslog", "apache", "iso-date"];

/// 형식 이름이 지원 목록에 있는지 확인합니다 (컴파일 시 옵션 검증용).
pub(crate) fn is_known_format(name: &str) -> bool {
    KNOWN_FORMATS.contains(&name)
}

/// endToken 경계까지의 슬라이스를 지정된 형식으로 검증하여
/// 문자열로 기록합니다. 형식이 지정되지 않으면 RFC 3339입니다.
pub(crate) fn extract_timestamp(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let candidate = cursor.until(parser.end_token);
    let format = parser.options.timestamp_format.as_deref().unwrap_or("rfc3339");

    let valid = match format {
        "rfc3339" => DateTime::parse_from_rfc3339(candidate).is_ok(),
        "rfc2822" => DateTime::parse_from_rfc2822(candidate).is_ok(),
        // BSD syslog 타임스탬프는 연도가 없으므로 현재 연도를 가정
        "syslog" => parse_syslog_timestamp(candidate),
        "apache" => DateTime::parse_from_str(candidate, "%d/%b/%Y:%H:%M:%S %z").is_ok(),
        "iso-date" => NaiveDate::parse_from_str(candidate, "%Y-%m-%d").is_ok(),
        _ => false,
    };

    if !valid {
        return false;
    }

    result.insert(parser.name.clone(), Value::String(candidate.to_owned()));
    cursor.advance(candidate.len());
    true
}

/// `MMM DD HH:MM:SS` 형식을 현재 연도로 보정하여 검증합니다.
fn parse_syslog_timestamp(candidate: &str) -> bool {
    let with_year = format!("{} {}", Utc::now().year(), candidate);
    NaiveDateTime::parse_from_str(&with_year, "%Y %b %d %H:%M:%S").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{ParserOptions, ParserType};
    use crate::expr::ExpressionKind;
    use serde_json::json;

    fn make_parser(format: Option<&str>, end_token: Option<char>) -> Parser {
        Parser {
            name: "ts".to_owned(),
            parser_type: ParserType::Timestamp,
            exp_kind: ExpressionKind::Capture,
            end_token,
            options: ParserOptions {
                timestamp_format: format.map(str::to_owned),
                ..ParserOptions::default()
            },
        }
    }

    #[test]
    fn known_formats() {
        assert!(is_known_format("rfc3339"));
        assert!(is_known_format("syslog"));
        assert!(!is_known_format("stardate"));
    }

    #[test]
    fn rfc3339_is_default() {
        let parser = make_parser(None, Some(' '));
        let mut cursor = Cursor::new("2024-01-15T12:00:00Z rest");
        let mut result = ParseResult::new();
        assert!(extract_timestamp(&mut cursor, &parser, &mut result));
        assert_eq!(result.get("ts"), Some(&json!("2024-01-15T12:00:00Z")));
        assert_eq!(cursor.rest(), " rest");
    }

    #[test]
    fn rfc3339_with_offset_and_fraction() {
        let parser = make_parser(None, None);
        let mut cursor = Cursor::new("2024-01-15T12:00:00.123+09:00");
        let mut result = ParseResult::new();
        assert!(extract_timestamp(&mut cursor, &parser, &mut result));
    }

    #[test]
    fn syslog_format() {
        let parser = make_parser(Some("syslog"), Some(' '));
        // endToken이 ' '이면 "Jan"에서 끊기므로 별도 경계 문자를 사용
        let parser = Parser {
            end_token: Some(','),
            ..parser
        };
        let mut cursor = Cursor::new("Jan 15 12:00:00,rest");
        let mut result = ParseResult::new();
        assert!(extract_timestamp(&mut cursor, &parser, &mut result));
        assert_eq!(result.get("ts"), Some(&json!("Jan 15 12:00:00")));
    }

    #[test]
    fn apache_format() {
        let parser = make_parser(Some("apache"), Some(']'));
        let mut cursor = Cursor::new("15/Jan/2024:12:00:00 +0900] rest");
        let mut result = ParseResult::new();
        assert!(extract_timestamp(&mut cursor, &parser, &mut result));
        assert_eq!(cursor.rest(), "] rest");
    }

    #[test]
    fn iso_date_format() {
        let parser = make_parser(Some("iso-date"), Some(' '));
        let mut cursor = Cursor::new("2024-01-15 rest");
        let mut result = ParseResult::new();
        assert!(extract_timestamp(&mut cursor, &parser, &mut result));
    }

    #[test]
    fn invalid_timestamp_fails_without_advancing() {
        let parser = make_parser(None, Some(' '));
        let mut cursor = Cursor::new("not-a-timestamp rest");
        let mut result = ParseResult::new();
        assert!(!extract_timestamp(&mut cursor, &parser, &mut result));
        assert_eq!(cursor.pos(), 0);
        assert!(result.is_empty());
    }

    #[test]
    fn out_of_range_date_fails() {
        let parser = make_parser(None, None);
        let mut cursor = Cursor::new("2024-13-99T99:99:99Z");
        let mut result = ParseResult::new();
        assert!(!extract_timestamp(&mut cursor, &parser, &mut result));
    }
}
