use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::MalformedTokenError;

pub const ENVELOPE_PREFIX: &str = "CM1";

// Unpadded on encode, padding optional on decode.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Payload carried inside a `CM1` envelope. Field order is the wire order of
/// the compact JSON that gets signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeClaims {
    pub amount: u64,
    #[serde(default = "single_use")]
    pub one: u8,
    pub exp: i64,
    pub nonce: String,
    #[serde(default)]
    pub desc: String,
}

fn single_use() -> u8 {
    1
}

impl EnvelopeClaims {
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.exp).ok()
    }

    pub fn to_payload(&self) -> Result<Vec<u8>, MalformedTokenError> {
        serde_json::to_vec(self).map_err(|e| MalformedTokenError::Unparsable(e.to_string()))
    }
}

/// `CM1.<payload>.<signature>`, both parts base64url. The signature is
/// checked by whoever holds the secret; this type only splits and decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    raw: String,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl SignedEnvelope {
    pub fn looks_like(input: &str) -> bool {
        input
            .strip_prefix(ENVELOPE_PREFIX)
            .is_some_and(|rest| rest.starts_with('.'))
    }

    pub fn parse(raw: &str) -> Result<Self, MalformedTokenError> {
        let mut parts = raw.split('.');
        let (Some(prefix), Some(payload_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(MalformedTokenError::InvalidEnvelope(
                "expected three dot-separated parts",
            ));
        };

        if prefix != ENVELOPE_PREFIX {
            return Err(MalformedTokenError::InvalidEnvelope("unknown prefix"));
        }

        let payload = URL_SAFE_LENIENT
            .decode(payload_b64)
            .map_err(|_| MalformedTokenError::InvalidEnvelope("payload is not base64url"))?;
        let signature = URL_SAFE_LENIENT
            .decode(signature_b64)
            .map_err(|_| MalformedTokenError::InvalidEnvelope("signature is not base64url"))?;

        if payload.is_empty() || signature.is_empty() {
            return Err(MalformedTokenError::InvalidEnvelope("empty part"));
        }

        Ok(Self {
            raw: raw.to_string(),
            payload,
            signature,
        })
    }

    pub fn assemble(payload: &[u8], signature: &[u8]) -> String {
        format!(
            "{ENVELOPE_PREFIX}.{}.{}",
            URL_SAFE_LENIENT.encode(payload),
            URL_SAFE_LENIENT.encode(signature)
        )
    }

    pub fn claims(&self) -> Result<EnvelopeClaims, MalformedTokenError> {
        let claims: EnvelopeClaims = serde_json::from_slice(&self.payload)
            .map_err(|e| MalformedTokenError::Unparsable(e.to_string()))?;

        if claims.amount == 0 {
            return Err(MalformedTokenError::InvalidField { field: "amount" });
        }

        Ok(claims)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> EnvelopeClaims {
        EnvelopeClaims {
            amount: 500,
            one: 1,
            exp: 1_734_567_890,
            nonce: "ab12".to_string(),
            desc: "课堂表现奖励".to_string(),
        }
    }

    #[test]
    fn payload_is_compact_json_in_field_order() {
        let payload = sample_claims().to_payload().unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"{"amount":500,"one":1,"exp":1734567890,"nonce":"ab12","desc":"课堂表现奖励"}"#
        );
    }

    #[test]
    fn assembled_envelope_parses_back() {
        let payload = sample_claims().to_payload().unwrap();
        let raw = SignedEnvelope::assemble(&payload, b"sig-bytes");

        assert!(SignedEnvelope::looks_like(&raw));
        assert!(!raw.contains('='));

        let envelope = SignedEnvelope::parse(&raw).unwrap();
        assert_eq!(envelope.signature(), b"sig-bytes");
        assert_eq!(envelope.claims().unwrap(), sample_claims());
    }

    #[test]
    fn padded_parts_are_accepted() {
        let raw = format!(
            "CM1.{}.{}",
            base64::engine::general_purpose::URL_SAFE.encode(b"{\"amount\":5,\"exp\":1,\"nonce\":\"n\"}"),
            base64::engine::general_purpose::URL_SAFE.encode(b"s")
        );

        let envelope = SignedEnvelope::parse(&raw).unwrap();
        let claims = envelope.claims().unwrap();
        assert_eq!(claims.amount, 5);
        assert_eq!(claims.one, 1);
        assert_eq!(claims.desc, "");
    }

    #[test]
    fn rejects_wrong_part_count_and_prefix() {
        assert!(matches!(
            SignedEnvelope::parse("CM1.abc"),
            Err(MalformedTokenError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            SignedEnvelope::parse("CM1.a.b.c"),
            Err(MalformedTokenError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            SignedEnvelope::parse("CM2.YQ.YQ"),
            Err(MalformedTokenError::InvalidEnvelope(_))
        ));
        assert!(!SignedEnvelope::looks_like("CM1X"));
    }

    #[test]
    fn zero_amount_claims_are_rejected() {
        let payload = br#"{"amount":0,"one":1,"exp":1,"nonce":"n"}"#;
        let raw = SignedEnvelope::assemble(payload, b"s");
        let envelope = SignedEnvelope::parse(&raw).unwrap();

        assert_eq!(
            envelope.claims(),
            Err(MalformedTokenError::InvalidField { field: "amount" })
        );
    }
}
