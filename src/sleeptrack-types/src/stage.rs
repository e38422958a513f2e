use std::{fmt, str::FromStr};

/// Sleep stage emitted by the classifier.
///
/// Declaration order is significant: it is the scan order used when scoring
/// candidates, so on equal scores the earlier stage wins.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Awake,
    Light,
    Rem,
    Deep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStage;

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Awake, Stage::Light, Stage::Rem, Stage::Deep];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Awake => "awake",
            Stage::Light => "light",
            Stage::Rem => "rem",
            Stage::Deep => "deep",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = InvalidStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "awake" => Ok(Self::Awake),
            "light" => Ok(Self::Light),
            "rem" => Ok(Self::Rem),
            "deep" => Ok(Self::Deep),
            _ => Err(InvalidStage),
        }
    }
}

impl From<Stage> for i16 {
    fn from(stage: Stage) -> Self {
        stage as i16
    }
}

impl TryFrom<i16> for Stage {
    type Error = InvalidStage;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(Self::from_index)
            .ok_or(InvalidStage)
    }
}

impl fmt::Display for InvalidStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid sleep stage")
    }
}

impl std::error::Error for InvalidStage {}
