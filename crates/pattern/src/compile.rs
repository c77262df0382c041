//! 표현식 목록을 파서 목록으로 컴파일
//!
//! 각 표현식은 [`Parser`] 레코드 하나에 대응합니다. 캡처 본문은
//! 슬래시로 분리되어 `[이름, 옵션...]`이 되고, 타입은 스키마 맵
//! (일반 캡처) 또는 임시 타입 표(`_` 캡처)에서 결정됩니다.

use crate::error::PatternError;
use crate::expr::{Expression, ExpressionKind};
use crate::extract::time;
use crate::schema::{SchemaMap, temp_parser_type};

/// 특정 파서 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserType {
    /// 리터럴 텍스트 매칭
    Literal,
    /// endToken 경계까지 소비
    Any,
    /// 입력 끝까지 소비
    ToEnd,
    /// IPv4 / IPv6 주소
    Ip,
    /// 타임스탬프
    Timestamp,
    /// URL
    Url,
    /// 균형 잡힌 JSON 문서
    Json,
    /// key=value 맵
    Map,
    /// 도메인 이름
    Domain,
    /// 파일 경로
    FilePath,
    /// User-Agent 문자열
    UserAgent,
    /// 정수 / 실수
    Number,
    /// 인용 문자열
    QuotedString,
    /// true / false
    Boolean,
}

/// 타입별 추가 설정
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    /// 타임스탬프 형식 이름 (기본: rfc3339)
    pub timestamp_format: Option<String>,
    /// 숫자 기수 (10 또는 16)
    pub number_base: u32,
    /// 인용 문자열의 인용 문자
    pub quote: char,
    /// 맵 엔트리 구분자
    pub map_entry_sep: char,
    /// 맵 키-값 구분자
    pub map_kv_sep: char,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            timestamp_format: None,
            number_base: 10,
            quote: '"',
            map_entry_sep: ' ',
            map_kv_sep: '=',
        }
    }
}

/// 컴파일된 단일 파서 레코드
///
/// `exp_kind`는 실행 시점에 선택/양자택일 의미론을 구현하는 데
/// 필요하므로 원본 표현식 종류를 그대로 보존합니다.
#[derive(Debug, Clone)]
pub struct Parser {
    /// 캡처 이름 (리터럴은 매칭할 텍스트)
    pub name: String,
    /// 추출기 타입
    pub parser_type: ParserType,
    /// 원본 표현식 종류
    pub exp_kind: ExpressionKind,
    /// 캡처 소비 경계 문자
    pub end_token: Option<char>,
    /// 타입별 설정
    pub options: ParserOptions,
}

/// 표현식 목록을 같은 길이, 같은 순서의 파서 목록으로 변환합니다.
pub(crate) fn build_parser_list(
    expressions: &[Expression<'_>],
    schema: &SchemaMap,
) -> Result<Vec<Parser>, PatternError> {
    let mut parsers = Vec::with_capacity(expressions.len());

    for expression in expressions {
        match expression.kind {
            ExpressionKind::Literal => parsers.push(Parser {
                name: unescape_literal(expression.text),
                parser_type: ParserType::Literal,
                exp_kind: ExpressionKind::Literal,
                end_token: expression.end_token,
                options: ParserOptions::default(),
            }),
            ExpressionKind::Capture
            | ExpressionKind::OptionalCapture
            | ExpressionKind::OrCapture => {
                parsers.push(parser_from_capture(expression, schema)?);
            }
        }
    }

    Ok(parsers)
}

/// 캡처 표현식 하나를 파서로 변환합니다.
///
/// 처리 형태: `<name>`, `<_>`, `<_name>`, `<_name/type>`,
/// `<name/opt1/opt2>`
fn parser_from_capture(
    expression: &Expression<'_>,
    schema: &SchemaMap,
) -> Result<Parser, PatternError> {
    let mut args = split_slash_separated(expression.text);
    let name = if args.is_empty() { "" } else { args.remove(0) };

    let mut parser_type = ParserType::Any;
    if name.starts_with('_') {
        // 임시 캡처: <_temp/type/...> 형태면 첫 옵션이 타입 지정.
        // 비임시 캡처와 옵션 위치를 맞추기 위해 타입 자리는 항상 소비합니다.
        if name.len() > 1 && !args.is_empty() {
            if let Some(explicit) = temp_parser_type(args[0]) {
                parser_type = explicit;
            }
            args.remove(0);
        }
    } else if let Some(mapped) = schema.get(name) {
        parser_type = mapped;
    } else {
        tracing::warn!(field = %name, "capture field not present in schema, defaulting to any");
    }

    let mut parser = Parser {
        name: name.to_owned(),
        parser_type,
        exp_kind: expression.kind,
        end_token: expression.end_token,
        options: ParserOptions::default(),
    };
    configure_options(&mut parser, &args)?;
    Ok(parser)
}

/// 슬래시로 구분된 캡처 본문을 조각 목록으로 나눕니다.
///
/// 중간의 빈 조각은 유지하고 마지막 빈 조각만 버립니다
/// (`"a//b"` -> `["a", "", "b"]`, `"a/"` -> `["a"]`).
fn split_slash_separated(text: &str) -> Vec<&str> {
    let mut pieces: Vec<&str> = text.split('/').collect();
    if pieces.last() == Some(&"") {
        pieces.pop();
    }
    pieces
}

/// 타입별 옵션 구성기
fn configure_options(parser: &mut Parser, args: &[&str]) -> Result<(), PatternError> {
    match parser.parser_type {
        ParserType::Timestamp => {
            if let Some(format) = args.first() {
                if !time::is_known_format(format) {
                    return Err(PatternError::InvalidOptions {
                        name: parser.name.clone(),
                        reason: format!("unknown timestamp format '{format}'"),
                    });
                }
                parser.options.timestamp_format = Some((*format).to_owned());
            }
        }
        ParserType::Number => {
            if let Some(base) = args.first() {
                parser.options.number_base = match *base {
                    "10" => 10,
                    "16" => 16,
                    other => {
                        return Err(PatternError::InvalidOptions {
                            name: parser.name.clone(),
                            reason: format!("unsupported number base '{other}'"),
                        });
                    }
                };
            }
        }
        ParserType::QuotedString => {
            if let Some(style) = args.first() {
                match *style {
                    "simple" => parser.options.quote = '\'',
                    other => {
                        return Err(PatternError::InvalidOptions {
                            name: parser.name.clone(),
                            reason: format!("unsupported quote style '{other}'"),
                        });
                    }
                }
            }
        }
        ParserType::Map => {
            if let Some(sep) = args.first() {
                parser.options.map_entry_sep = single_char_option(&parser.name, sep)?;
            }
            if let Some(sep) = args.get(1) {
                parser.options.map_kv_sep = single_char_option(&parser.name, sep)?;
            }
        }
        _ => {
            if !args.is_empty() {
                tracing::debug!(
                    parser = %parser.name,
                    options = ?args,
                    "ignoring extra parser options"
                );
            }
        }
    }
    Ok(())
}

fn single_char_option(name: &str, option: &str) -> Result<char, PatternError> {
    let mut chars = option.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(PatternError::InvalidOptions {
            name: name.to_owned(),
            reason: format!("separator option must be a single character, got '{option}'"),
        }),
    }
}

/// 리터럴 텍스트의 백슬래시 이스케이프를 해제합니다.
///
/// 표현식은 원본 패턴 슬라이스를 그대로 참조하므로, 입력과 비교할
/// 텍스트는 여기서 한 번만 해제합니다.
pub(crate) fn unescape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
