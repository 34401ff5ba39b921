//! Decoding of framed object texts into records.

use crate::utils::error::DecodeError;

/// A decoded `intel_gpu_top` sample
pub type Record = serde_json::Value;

/// Decode one frame into a record
///
/// **Public** - second stage of the pipeline
///
/// # Errors
/// * `DecodeError::JsonError` - frame is not valid JSON; callers drop the frame
pub fn decode(frame: &str) -> Result<Record, DecodeError> {
    Ok(serde_json::from_str(frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_valid_frame() {
        let record = decode("{\"rc6\":{\"value\":93.2,\"unit\":\"%\"}}").unwrap();
        assert_eq!(record, json!({"rc6": {"value": 93.2, "unit": "%"}}));
    }

    #[test]
    fn test_decode_rejects_truncated_frame() {
        assert!(matches!(
            decode("{\"rc6\":{\"value\":}}"),
            Err(DecodeError::JsonError(_))
        ));
    }

    #[test]
    fn test_decode_rejects_replacement_garbage() {
        assert!(decode("{\u{fffd}}").is_err());
    }
}
