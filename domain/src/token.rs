//! Boundary representation of a reward token and its normalization.
//!
//! Clients submit either a bare string or a JSON object. Strings are further
//! inspected by shape: serialized objects, signed `CM1` envelopes and claim
//! links all normalize to the same [`Token`]. Normalization never panics;
//! every input yields a token or a [`MalformedTokenError`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use url::Url;

use crate::envelope::SignedEnvelope;
use crate::error::MalformedTokenError;

pub const MAX_CODE_LEN: usize = 1024;

const CODE_FIELDS: [&str; 2] = ["code", "token"];
const AMOUNT_FIELDS: [&str; 3] = ["issuedAmount", "issued_amount", "amount"];
const EXPIRY_FIELDS: [&str; 2] = ["expiry", "exp"];
const CLAIM_URL_PARAM: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenCode(String);

impl TokenCode {
    pub fn parse(raw: &str) -> Result<Self, MalformedTokenError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MalformedTokenError::Empty);
        }
        if trimmed.chars().count() > MAX_CODE_LEN {
            return Err(MalformedTokenError::TooLong { max: MAX_CODE_LEN });
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(MalformedTokenError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawToken {
    PlainCode(String),
    Structured(Map<String, Value>),
}

impl TryFrom<Value> for RawToken {
    type Error = MalformedTokenError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(code) => Ok(Self::PlainCode(code)),
            Value::Object(fields) => Ok(Self::Structured(fields)),
            Value::Null => Err(MalformedTokenError::UnsupportedShape("null")),
            Value::Bool(_) => Err(MalformedTokenError::UnsupportedShape("boolean")),
            Value::Number(_) => Err(MalformedTokenError::UnsupportedShape("number")),
            Value::Array(_) => Err(MalformedTokenError::UnsupportedShape("array")),
        }
    }
}

impl From<&str> for RawToken {
    fn from(code: &str) -> Self {
        Self::PlainCode(code.to_string())
    }
}

impl From<String> for RawToken {
    fn from(code: String) -> Self {
        Self::PlainCode(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    PlainCode,
    Structured,
    SignedEnvelope,
    ClaimUrl,
}

/// Canonical token. `declared_*` are whatever the client asserted; the
/// ledger entry for `code` stays authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub code: TokenCode,
    pub format: TokenFormat,
    pub declared_amount: Option<u64>,
    pub declared_expiry: Option<OffsetDateTime>,
    pub envelope: Option<SignedEnvelope>,
}

impl RawToken {
    pub fn normalize(self) -> Result<Token, MalformedTokenError> {
        match self {
            Self::PlainCode(input) => normalize_string(&input, true),
            Self::Structured(fields) => normalize_object(&fields),
        }
    }
}

pub fn normalize(value: Value) -> Result<Token, MalformedTokenError> {
    RawToken::try_from(value)?.normalize()
}

fn normalize_string(input: &str, allow_link: bool) -> Result<Token, MalformedTokenError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MalformedTokenError::Empty);
    }

    if trimmed.starts_with('{') {
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(fields)) => normalize_object(&fields),
            Ok(_) => Err(MalformedTokenError::Unparsable(
                "serialized token is not an object".to_string(),
            )),
            Err(e) => Err(MalformedTokenError::Unparsable(e.to_string())),
        };
    }

    if SignedEnvelope::looks_like(trimmed) {
        return normalize_envelope(trimmed);
    }

    if allow_link && (trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        let embedded = token_from_claim_url(trimmed)?;
        let mut token = normalize_string(&embedded, false)?;
        if token.format == TokenFormat::PlainCode {
            token.format = TokenFormat::ClaimUrl;
        }
        return Ok(token);
    }

    Ok(Token {
        code: TokenCode::parse(trimmed)?,
        format: TokenFormat::PlainCode,
        declared_amount: None,
        declared_expiry: None,
        envelope: None,
    })
}

fn normalize_envelope(raw: &str) -> Result<Token, MalformedTokenError> {
    let code = TokenCode::parse(raw)?;
    let envelope = SignedEnvelope::parse(code.as_str())?;
    let claims = envelope.claims()?;

    Ok(Token {
        code,
        format: TokenFormat::SignedEnvelope,
        declared_amount: Some(claims.amount),
        declared_expiry: claims.expires_at(),
        envelope: Some(envelope),
    })
}

fn token_from_claim_url(link: &str) -> Result<String, MalformedTokenError> {
    let url = Url::parse(link).map_err(|_| MalformedTokenError::InvalidClaimUrl)?;
    url.query_pairs()
        .find(|(key, _)| key == CLAIM_URL_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
        .ok_or(MalformedTokenError::InvalidClaimUrl)
}

fn normalize_object(fields: &Map<String, Value>) -> Result<Token, MalformedTokenError> {
    let code = match first_present(fields, &CODE_FIELDS) {
        Some(Value::String(code)) => code,
        Some(_) => return Err(MalformedTokenError::InvalidField { field: "code" }),
        None => return Err(MalformedTokenError::MissingCode),
    };

    let trimmed = code.trim();
    let mut token = if SignedEnvelope::looks_like(trimmed) {
        normalize_envelope(trimmed)?
    } else {
        Token {
            code: TokenCode::parse(trimmed)?,
            format: TokenFormat::Structured,
            declared_amount: None,
            declared_expiry: None,
            envelope: None,
        }
    };

    if let Some(amount) = declared_amount(fields)? {
        match token.declared_amount {
            Some(existing) if existing != amount => {
                return Err(MalformedTokenError::ConflictingAmount);
            }
            _ => token.declared_amount = Some(amount),
        }
    }

    if let Some(expiry) = declared_expiry(fields)? {
        token.declared_expiry = Some(expiry);
    }

    Ok(token)
}

fn first_present<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find(|value| !value.is_null())
}

fn declared_amount(fields: &Map<String, Value>) -> Result<Option<u64>, MalformedTokenError> {
    match first_present(fields, &AMOUNT_FIELDS) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .filter(|amount| *amount > 0)
            .map(Some)
            .ok_or(MalformedTokenError::InvalidField {
                field: "issuedAmount",
            }),
    }
}

fn declared_expiry(
    fields: &Map<String, Value>,
) -> Result<Option<OffsetDateTime>, MalformedTokenError> {
    let invalid = MalformedTokenError::InvalidField { field: "expiry" };
    match first_present(fields, &EXPIRY_FIELDS) {
        None => Ok(None),
        Some(Value::Number(seconds)) => seconds
            .as_i64()
            .and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok())
            .map(Some)
            .ok_or(invalid),
        Some(Value::String(text)) => OffsetDateTime::parse(text, &Rfc3339)
            .map(Some)
            .map_err(|_| invalid),
        Some(_) => Err(invalid),
    }
}
