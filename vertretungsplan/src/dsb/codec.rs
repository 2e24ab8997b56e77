//! Request encoding and response decoding for the `GetData` endpoint.
//!
//! Both directions use the same transport format: compact JSON, gzipped,
//! then base64 encoded.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::DsbError;
use super::types::{
    RESULT_CODE_OK, RequestBody, RequestData, RequestPayload, ResponseBody, ResponseEnvelope,
};

const APP_VERSION: &str = "2.5.9";
const LANGUAGE: &str = "de";
const OS_VERSION: &str = "28 8.0";
const DEVICE: &str = "SM-G930F";
const BUNDLE_ID: &str = "de.heinekingmedia.dsbmobile";

/// Format a local timestamp the way the mobile app does.
///
/// The timestamp is truncated to milliseconds and suffixed with `Z`. No UTC
/// conversion happens: the backend expects local wall-clock time with a
/// UTC label.
pub fn format_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

impl RequestPayload {
    /// Build the payload for one request. `AppId` is a fresh UUID every time.
    pub fn new(username: &str, password: &str, now: NaiveDateTime) -> Self {
        let timestamp = format_timestamp(now);
        Self {
            user_id: username.to_string(),
            user_pw: password.to_string(),
            app_version: APP_VERSION.to_string(),
            language: LANGUAGE.to_string(),
            os_version: OS_VERSION.to_string(),
            app_id: uuid::Uuid::new_v4().to_string(),
            device: DEVICE.to_string(),
            bundle_id: BUNDLE_ID.to_string(),
            date: timestamp.clone(),
            last_update: timestamp,
        }
    }
}

/// Serialize to compact JSON, gzip and base64 encode.
pub fn pack<T: Serialize>(value: &T) -> Result<String, DsbError> {
    let json = serde_json::to_vec(value).map_err(|e| DsbError::Json {
        message: e.to_string(),
        body: None,
    })?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| DsbError::Encode(format!("gzip compression failed: {e}")))?;
    let compressed = encoder
        .finish()
        .map_err(|e| DsbError::Encode(format!("gzip compression failed: {e}")))?;

    Ok(STANDARD.encode(compressed))
}

/// Reverse of [`pack`]: base64 decode, gunzip and parse JSON.
pub fn unpack<T: DeserializeOwned>(encoded: &str) -> Result<T, DsbError> {
    let compressed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| DsbError::Decode(format!("invalid base64: {e}")))?;

    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| DsbError::Decode(format!("invalid gzip data: {e}")))?;

    serde_json::from_slice(&json).map_err(|e| DsbError::json(e, &json))
}

/// Wrap an encoded payload in the outer request body.
pub fn encode_request(payload: &RequestPayload) -> Result<RequestBody, DsbError> {
    Ok(RequestBody {
        req: RequestData {
            data: pack(payload)?,
            data_type: 1,
        },
    })
}

/// Decode a raw `GetData` response and check its result code.
///
/// Fails with [`DsbError::Protocol`] carrying `ResultStatusInfo` when the
/// result code is not zero.
pub fn decode_response(raw: &[u8]) -> Result<ResponseEnvelope, DsbError> {
    let body: ResponseBody = serde_json::from_slice(raw).map_err(|e| DsbError::json(e, raw))?;
    let envelope: ResponseEnvelope = unpack(&body.d)?;

    if envelope.result_code != RESULT_CODE_OK {
        return Err(DsbError::Protocol(envelope.result_status_info));
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 10, 29)
            .unwrap()
            .and_hms_micro_opt(19, 20, 31, 875_466)
            .unwrap()
    }

    fn response_for(envelope: serde_json::Value) -> Vec<u8> {
        let d = pack(&envelope).unwrap();
        serde_json::to_vec(&serde_json::json!({ "d": d })).unwrap()
    }

    #[test]
    fn timestamp_truncates_to_millis() {
        assert_eq!(format_timestamp(sample_time()), "2019-10-29T19:20:31.875Z");
    }

    #[test]
    fn timestamp_keeps_zero_millis() {
        let t = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert_eq!(format_timestamp(t), "2026-01-05T06:00:00.000Z");
    }

    #[test]
    fn payload_fields() {
        let payload = RequestPayload::new("user", "pass", sample_time());

        assert_eq!(payload.user_id, "user");
        assert_eq!(payload.user_pw, "pass");
        assert_eq!(payload.language, "de");
        assert_eq!(payload.app_version, APP_VERSION);
        assert_eq!(payload.bundle_id, BUNDLE_ID);
        assert_eq!(payload.date, "2019-10-29T19:20:31.875Z");
        assert_eq!(payload.date, payload.last_update);
        assert!(uuid::Uuid::parse_str(&payload.app_id).is_ok());
    }

    #[test]
    fn app_id_is_fresh_per_payload() {
        let a = RequestPayload::new("user", "pass", sample_time());
        let b = RequestPayload::new("user", "pass", sample_time());
        assert_ne!(a.app_id, b.app_id);
    }

    #[test]
    fn encoded_request_unpacks_to_payload() {
        let payload = RequestPayload::new("user", "pass", sample_time());
        let body = encode_request(&payload).unwrap();

        assert_eq!(body.req.data_type, 1);
        let decoded: RequestPayload = unpack(&body.req.data).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn packed_json_is_compact() {
        let payload = RequestPayload::new("user", "pass", sample_time());

        let raw = STANDARD.decode(pack(&payload).unwrap()).unwrap();
        let mut text = String::new();
        GzDecoder::new(raw.as_slice()).read_to_string(&mut text).unwrap();

        assert_eq!(text, serde_json::to_string(&payload).unwrap());
        assert!(!text.contains(": "));
    }

    #[test]
    fn decode_success() {
        let raw = response_for(serde_json::json!({
            "Resultcode": 0,
            "ResultStatusInfo": "",
            "ResultMenuItems": [{"Title": "Inhalte", "Childs": []}]
        }));

        let envelope = decode_response(&raw).unwrap();
        assert_eq!(envelope.result_code, 0);
        assert_eq!(envelope.result_menu_items.len(), 1);
    }

    #[test]
    fn decode_rejects_bad_result_code() {
        let raw = response_for(serde_json::json!({
            "Resultcode": 1,
            "ResultStatusInfo": "Login fehlgeschlagen"
        }));

        match decode_response(&raw) {
            Err(DsbError::Protocol(message)) => assert_eq!(message, "Login fehlgeschlagen"),
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_non_json_body() {
        let result = decode_response(b"<html>maintenance</html>");
        assert!(matches!(result, Err(DsbError::Json { .. })));
    }

    #[test]
    fn decode_rejects_bad_base64() {
        let result = decode_response(br#"{"d": "not base64!!"}"#);
        assert!(matches!(result, Err(DsbError::Decode(_))));
    }

    #[test]
    fn decode_rejects_plain_base64() {
        let d = STANDARD.encode(b"{\"Resultcode\":0}");
        let raw = serde_json::to_vec(&serde_json::json!({ "d": d })).unwrap();
        assert!(matches!(decode_response(&raw), Err(DsbError::Decode(_))));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use proptest::prelude::*;

    fn any_time() -> impl Strategy<Value = NaiveDateTime> {
        (2000i32..2100, 1u32..=12, 1u32..=28, 0u32..86_400, 0u32..1_000_000).prop_map(
            |(y, m, d, secs, micros)| {
                let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
                let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, micros * 1_000)
                    .unwrap();
                date.and_time(time)
            },
        )
    }

    proptest! {
        /// Whatever credentials go in come back out of the encoded request
        #[test]
        fn request_roundtrip(user in "\\PC{0,40}", pw in "\\PC{0,40}", now in any_time()) {
            let payload = RequestPayload::new(&user, &pw, now);
            let body = encode_request(&payload).unwrap();
            let decoded: RequestPayload = unpack(&body.req.data).unwrap();
            prop_assert_eq!(decoded, payload);
        }

        /// Timestamps always have millisecond precision and a Z suffix
        #[test]
        fn timestamp_shape(now in any_time()) {
            let s = format_timestamp(now);
            prop_assert_eq!(s.len(), 24);
            prop_assert!(s.ends_with('Z'));
            prop_assert_eq!(&s[19..20], ".");
        }
    }
}
