use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Hardware inventory as reported by the backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Servo {
    pub name: String,
    pub controller_id: String,
    pub channel: u32,
    pub min_angle: f64,
    pub max_angle: f64,
    pub min_pulse: u32,
    pub max_pulse: u32,
    #[serde(default)]
    pub description: String,
}

impl Servo {
    pub fn accepts(&self, angle: f64) -> bool {
        (self.min_angle..=self.max_angle).contains(&angle)
    }
}

/// PWM controller on the I2C bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub id: String,
    pub i2c_address: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFile {
    pub name: String,
    #[serde(default)]
    pub path: String,
}

/// `GET /servos` response, keyed by servo name.
pub type ServoMap = BTreeMap<String, Servo>;

/// `GET /controllers` response, keyed by controller id.
pub type ControllerMap = BTreeMap<String, Controller>;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveServoRequest {
    pub angle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayAudioRequest {
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn servo_map_deserializes_from_backend_shape() {
        let raw = r#"{
            "Pie Panel 1": {
                "name": "Pie Panel 1",
                "controller_id": "dome",
                "channel": 0,
                "min_angle": 0,
                "max_angle": 90,
                "min_pulse": 150,
                "max_pulse": 600,
                "description": "Front pie panel"
            }
        }"#;
        let servos: ServoMap = serde_json::from_str(raw).unwrap();
        let servo = &servos["Pie Panel 1"];
        assert_eq!(servo.controller_id, "dome");
        assert_eq!(servo.max_angle, 90.0);
        assert!(servo.accepts(45.0));
        assert!(!servo.accepts(91.0));
    }

    #[test]
    fn servo_description_is_optional() {
        let raw = r#"{"name":"x","controller_id":"body","channel":3,"min_angle":10,"max_angle":170,"min_pulse":100,"max_pulse":500}"#;
        let servo: Servo = serde_json::from_str(raw).unwrap();
        assert!(servo.description.is_empty());
    }

    #[test]
    fn controller_deserializes() {
        let raw = r#"{"dome":{"id":"dome","i2c_address":"0x40","frequency":50}}"#;
        let controllers: ControllerMap = serde_json::from_str(raw).unwrap();
        assert_eq!(controllers["dome"].i2c_address, "0x40");
        assert_eq!(controllers["dome"].frequency, 50);
    }
}
