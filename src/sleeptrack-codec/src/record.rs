use sleeptrack_types::{ClassificationRecord, Stage};

use crate::CodecError;

/// Compact wire form: `{"t":1700000000,"hr":54.2,"m":0.01,"phase":"light"}`.
#[derive(Debug, Serialize, Deserialize)]
struct WireRecord {
    t: i64,
    hr: f64,
    m: f64,
    phase: WirePhase,
}

/// Stored logs carry the stage index, the live stream carries the name.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum WirePhase {
    Name(String),
    Index(i16),
}

impl WirePhase {
    fn stage(self) -> Result<Stage, CodecError> {
        match self {
            WirePhase::Name(name) => name.parse().map_err(|_| CodecError::InvalidStage(name)),
            WirePhase::Index(index) => {
                Stage::try_from(index).map_err(|_| CodecError::InvalidStage(index.to_string()))
            }
        }
    }
}

/// Encodes one record as a newline-terminated line.
pub fn encode_record(record: &ClassificationRecord) -> Result<String, CodecError> {
    let wire = WireRecord {
        t: record.timestamp,
        hr: record.heart_rate,
        m: record.motion,
        phase: WirePhase::Name(record.stage.name().to_owned()),
    };
    let mut line = serde_json::to_string(&wire)?;
    line.push('\n');
    Ok(line)
}

pub fn decode_record(line: &str) -> Result<ClassificationRecord, CodecError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CodecError::EmptyLine);
    }

    let wire: WireRecord = serde_json::from_str(line)?;
    Ok(ClassificationRecord {
        timestamp: wire.t,
        heart_rate: wire.hr,
        motion: wire.m,
        stage: wire.phase.stage()?,
    })
}
