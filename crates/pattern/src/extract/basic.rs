//! 기본 추출기 — 리터럴, 경계 소비, 숫자, 인용 문자열, 불리언

use serde_json::Value;

use super::Cursor;
use crate::compile::Parser;
use crate::execute::ParseResult;

/// 입력이 리터럴 텍스트로 시작하면 그만큼 소비합니다. 결과 기록 없음.
pub(crate) fn extract_literal(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    _result: &mut ParseResult,
) -> bool {
    if cursor.rest().starts_with(&parser.name) {
        cursor.advance(parser.name.len());
        true
    } else {
        false
    }
}

/// endToken 앞까지(없으면 입력 끝까지) 소비하여 문자열로 기록합니다.
pub(crate) fn extract_any(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let text = cursor.until(parser.end_token);
    let len = text.len();
    result.insert(parser.name.clone(), Value::String(text.to_owned()));
    cursor.advance(len);
    true
}

/// 입력 끝까지 전부 소비하여 문자열로 기록합니다.
pub(crate) fn extract_to_end(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let text = cursor.rest();
    let len = text.len();
    result.insert(parser.name.clone(), Value::String(text.to_owned()));
    cursor.advance(len);
    true
}

/// 숫자를 소비하여 JSON 숫자로 기록합니다.
///
/// 기수 10: 부호, 정수부, 소수부, 지수부를 받으며 정수는 i64,
/// 그 외에는 f64로 기록합니다. 기수 16: 16진수 숫자 런을 받습니다.
pub(crate) fn extract_number(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let rest = cursor.rest();

    if parser.options.number_base == 16 {
        let len = rest
            .bytes()
            .take_while(u8::is_ascii_hexdigit)
            .count();
        if len == 0 {
            return false;
        }
        let Ok(value) = i64::from_str_radix(&rest[..len], 16) else {
            return false;
        };
        result.insert(parser.name.clone(), Value::from(value));
        cursor.advance(len);
        return true;
    }

    let bytes = rest.as_bytes();
    let mut idx = 0;
    if matches!(bytes.first(), Some(&b'-') | Some(&b'+')) {
        idx += 1;
    }

    let digits_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == digits_start {
        return false;
    }

    let mut is_float = false;
    if idx < bytes.len()
        && bytes[idx] == b'.'
        && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit)
    {
        is_float = true;
        idx += 1;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
    }

    if idx < bytes.len() && matches!(bytes[idx], b'e' | b'E') {
        let mut exp_idx = idx + 1;
        if matches!(bytes.get(exp_idx), Some(&b'-') | Some(&b'+')) {
            exp_idx += 1;
        }
        if bytes.get(exp_idx).is_some_and(u8::is_ascii_digit) {
            is_float = true;
            idx = exp_idx;
            while idx < bytes.len() && bytes[idx].is_ascii_digit() {
                idx += 1;
            }
        }
    }

    let text = &rest[..idx];
    let value = if is_float {
        match text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            Some(number) => Value::Number(number),
            None => return false,
        }
    } else {
        match text.parse::<i64>() {
            Ok(integer) => Value::from(integer),
            // i64 범위를 넘는 정수는 f64로 기록
            Err(_) => match text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Some(number) => Value::Number(number),
                None => return false,
            },
        }
    };

    result.insert(parser.name.clone(), value);
    cursor.advance(idx);
    true
}

/// 인용 문자열을 소비하여 이스케이프를 해제한 내용을 기록합니다.
///
/// 닫는 인용 부호가 없으면 커서를 움직이지 않고 실패합니다.
pub(crate) fn extract_quoted(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let quote = parser.options.quote;
    let rest = cursor.rest();
    let mut chars = rest.char_indices();

    if chars.next().map(|(_, c)| c) != Some(quote) {
        return false;
    }

    let mut content = String::new();
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            content.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            result.insert(parser.name.clone(), Value::String(content));
            cursor.advance(idx + quote.len_utf8());
            return true;
        } else {
            content.push(c);
        }
    }

    false
}

/// `true` / `false`를 소비하여 불리언으로 기록합니다.
pub(crate) fn extract_boolean(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let rest = cursor.rest();
    let (value, len) = if rest.starts_with("true") {
        (true, 4)
    } else if rest.starts_with("false") {
        (false, 5)
    } else {
        return false;
    };

    result.insert(parser.name.clone(), Value::Bool(value));
    cursor.advance(len);
    true
}
