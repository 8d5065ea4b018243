use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;

use crate::{error::AppError, user::User};

/// Numeric value of a path parameter, `NaN` when it is not a number.
///
/// Surrounding whitespace is ignored, an empty string is `0`, `Infinity` is
/// accepted and `0x`/`0o`/`0b` prefixes select a radix.
pub fn to_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        return parse_radix(&trimmed[2..], radix);
    }

    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);

    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // f64::from_str also takes "inf" and "nan", which are not numbers here
    let decimal = unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && unsigned.contains(|c: char| c.is_ascii_digit())
        && unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));

    if !decimal {
        return f64::NAN;
    }

    trimmed.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }

    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(f64::NAN)
}

/// End index for taking the first `param` items out of `len`.
///
/// Fractions truncate, non-numbers take nothing, and negative counts drop
/// that many items from the end.
pub fn take_count(param: &str, len: usize) -> usize {
    let count = to_number(param);
    if count.is_nan() {
        return 0;
    }

    let count = count.trunc();
    let len_f = len as f64;

    if count >= 0.0 {
        count.min(len_f) as usize
    } else if -count >= len_f {
        0
    } else {
        len - (-count) as usize
    }
}

/// Request body as a user field map.
///
/// JSON bodies must be an object, form bodies become string fields, and a
/// body of any other type reads as an empty map.
///
/// Form bodies stay flat: `a[b]=c` is the single field `"a[b]"` rather than a
/// nested object, and a repeated key keeps only its last value instead of
/// becoming an array.
pub struct Payload(pub User);

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(request: &Request) -> BodyKind {
    let Some(content_type) = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::Form,
        other if other.starts_with("application/") && other.ends_with("+json") => BodyKind::Json,
        _ => BodyKind::Other,
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&request) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(request, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;

                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self(User::new()));
                }

                match serde_json::from_slice(&bytes) {
                    Ok(Value::Object(fields)) => Ok(Self(fields)),
                    Ok(_) => Err(AppError::Validation(
                        "request body must be a JSON object".to_string(),
                    )),
                    Err(e) => Err(AppError::Validation(e.to_string())),
                }
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;

                Ok(Self(
                    pairs
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect(),
                ))
            }
            BodyKind::Other => Ok(Self(User::new())),
        }
    }
}
