use chrono::DateTime;
use sleeptrack_types::{AccelSample, HeartRateSample, SensorEvent};

use crate::CodecError;

/// A sensor event with its optional capture time in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    pub time_ms: Option<i64>,
    pub event: SensorEvent,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Hrm {
        t: Option<i64>,
        bpm: f64,
        confidence: u8,
    },
    Accel {
        t: Option<i64>,
        x: f64,
        y: f64,
        z: f64,
    },
}

/// Capture times must be representable as a UTC date.
fn checked_time(t: Option<i64>) -> Result<Option<i64>, CodecError> {
    match t {
        Some(ms) if DateTime::from_timestamp_millis(ms).is_none() => {
            Err(CodecError::InvalidTime(ms))
        }
        t => Ok(t),
    }
}

pub fn decode_event(line: &str) -> Result<TimedEvent, CodecError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CodecError::EmptyLine);
    }

    let event = match serde_json::from_str(line)? {
        WireEvent::Hrm { t, bpm, confidence } => TimedEvent {
            time_ms: checked_time(t)?,
            event: HeartRateSample::new(bpm, confidence).into(),
        },
        WireEvent::Accel { t, x, y, z } => TimedEvent {
            time_ms: checked_time(t)?,
            event: AccelSample::new(x, y, z).into(),
        },
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_heart_rate() {
        let event = decode_event(r#"{"type":"hrm","bpm":62,"confidence":90}"#).unwrap();
        assert_eq!(event.time_ms, None);
        assert_eq!(event.event, SensorEvent::HeartRate(HeartRateSample::new(62.0, 90)));
    }

    #[test]
    fn decodes_timed_accel() {
        let event =
            decode_event(r#"{"type":"accel","t":1700000000200,"x":0.01,"y":-0.02,"z":0.99}"#)
                .unwrap();
        assert_eq!(event.time_ms, Some(1_700_000_000_200));
        assert_eq!(
            event.event,
            SensorEvent::Accel(AccelSample::new(0.01, -0.02, 0.99))
        );
    }

    #[test]
    fn rejects_time_outside_calendar_range() {
        let line = format!(r#"{{"type":"accel","t":{},"x":0,"y":0,"z":1}}"#, i64::MAX - 10);
        assert!(matches!(
            decode_event(&line),
            Err(CodecError::InvalidTime(t)) if t == i64::MAX - 10
        ));

        let line = format!(r#"{{"type":"hrm","t":{},"bpm":60,"confidence":90}}"#, i64::MIN);
        assert!(matches!(decode_event(&line), Err(CodecError::InvalidTime(_))));
    }

    #[test]
    fn rejects_unknown_type() {
        let result = decode_event(r#"{"type":"baro","pressure":1013}"#);
        assert!(matches!(result, Err(CodecError::InvalidJson(_))));
    }

    #[test]
    fn rejects_confidence_out_of_range() {
        let result = decode_event(r#"{"type":"hrm","bpm":62,"confidence":300}"#);
        assert!(result.is_err());
    }
}
