use serde::Deserialize;

use crate::LedState;

/// A state report sent by the device.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum InboundEvent {
    /// Echo of a state requested by an operator.
    #[serde(rename = "tg_change_state")]
    DeviceAck { state: LedState },
    /// The device changed state on its own, e.g. a physical button press.
    #[serde(rename = "esp32_change_state")]
    DeviceInitiated { state: LedState },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use serde_json::json;

    fn decode_value(value: serde_json::Value) -> serde_json::Result<InboundEvent> {
        decode(&serde_json::to_vec(&value).unwrap())
    }

    #[test]
    fn test_deserialization() {
        let event = decode(br#"{"type":"tg_change_state","state":"blue"}"#).unwrap();
        assert_eq!(
            event,
            InboundEvent::DeviceAck {
                state: LedState::Blue
            }
        );

        let event = decode_value(json!({
            "state": "error",
            "type": "esp32_change_state"
        }))
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::DeviceInitiated {
                state: LedState::Error
            }
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let event = decode_value(json!({
            "type": "esp32_change_state",
            "state": "off",
            "uptime": 1234
        }))
        .unwrap();

        assert_eq!(
            event,
            InboundEvent::DeviceInitiated {
                state: LedState::Off
            }
        );
    }

    #[test]
    fn test_unknown_type() {
        assert!(decode_value(json!({ "type": "reboot", "state": "off" })).is_err());
    }

    #[test]
    fn test_unknown_state() {
        assert!(decode_value(json!({ "type": "tg_change_state", "state": "green" })).is_err());
        assert!(decode_value(json!({ "type": "tg_change_state", "state": "RED" })).is_err());
    }

    #[test]
    fn test_missing_fields() {
        assert!(decode_value(json!({ "state": "red" })).is_err());
        assert!(decode_value(json!({ "type": "esp32_change_state" })).is_err());
    }

    #[test]
    fn test_not_json() {
        assert!(decode(b"red").is_err());
        assert!(decode(b"").is_err());
    }
}
