//! 구조화 값 추출기 — 균형 잡힌 JSON 문서와 key=value 맵

use serde_json::{Map, Value};

use super::Cursor;
use crate::compile::Parser;
use crate::execute::ParseResult;

/// 균형 잡힌 JSON 문서를 소비하여 파싱된 값으로 기록합니다.
///
/// 현재 위치에서 `{` 또는 `[`로 시작해야 하며, 문자열과 이스케이프를
/// 존중하면서 괄호가 닫히는 지점까지를 문서로 취합니다.
pub(crate) fn extract_json(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let rest = cursor.rest();
    let Some(len) = balanced_json_len(rest) else {
        return false;
    };

    let Ok(value) = serde_json::from_str::<Value>(&rest[..len]) else {
        return false;
    };

    result.insert(parser.name.clone(), value);
    cursor.advance(len);
    true
}

/// `{...}` / `[...]` 블록의 바이트 길이를 구합니다.
///
/// 닫히지 않으면 `None`입니다.
fn balanced_json_len(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    match bytes.first() {
        Some(&b'{') | Some(&b'[') => {}
        _ => return None,
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' | b'[' if !in_string => depth += 1,
            b'}' | b']' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// key=value 쌍의 나열을 소비하여 JSON 객체로 기록합니다.
///
/// 엔트리 구분자와 키-값 구분자는 파서 옵션으로 결정됩니다
/// (기본: 공백과 `=`). endToken 경계 또는 쌍 형태가 깨지는 지점에서
/// 멈추며, 쌍이 하나도 없으면 실패합니다.
pub(crate) fn extract_map(
    cursor: &mut Cursor<'_>,
    parser: &Parser,
    result: &mut ParseResult,
) -> bool {
    let entry_sep = parser.options.map_entry_sep;
    let kv_sep = parser.options.map_kv_sep;
    // endToken이 엔트리 구분자와 같으면 경계가 모호하므로
    // 쌍 구조가 깨지는 지점이 끝을 결정합니다.
    let bounded = if parser.end_token == Some(entry_sep) {
        cursor.rest()
    } else {
        cursor.until(parser.end_token)
    };

    let mut entries = Map::new();
    let mut consumed = 0usize;

    for segment in bounded.split(entry_sep) {
        let Some(sep_idx) = segment.find(kv_sep) else {
            break;
        };
        let key = &segment[..sep_idx];
        let value = &segment[sep_idx + kv_sep.len_utf8()..];
        if key.is_empty() {
            break;
        }

        entries.insert(key.to_owned(), Value::String(value.to_owned()));

        // 엔트리와 그 뒤 구분자만큼 소비량을 누적
        consumed = match consumed {
            0 => segment.len(),
            already => already + entry_sep.len_utf8() + segment.len(),
        };
    }

    if entries.is_empty() {
        return false;
    }

    result.insert(parser.name.clone(), Value::Object(entries));
    cursor.advance(consumed);
    true
}
