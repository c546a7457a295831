use serde::{Deserialize, Serialize};
use std::fmt;

pub const BRADYCARDIA_BPM: f64 = 60.0;
pub const TACHYCARDIA_BPM: f64 = 100.0;
/// RR standard deviation (seconds) above which the rhythm is flagged as irregular.
pub const ARRHYTHMIA_VARIABILITY_S: f64 = 0.1;

/// Advisory message attached to a rhythm summary. Serializes as its message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Consultation {
    Bradycardia,
    Tachycardia,
    PossibleArrhythmia,
    Normal,
    InsufficientData,
}

impl Consultation {
    pub const ALL: [Consultation; 5] = [
        Consultation::Bradycardia,
        Consultation::Tachycardia,
        Consultation::PossibleArrhythmia,
        Consultation::Normal,
        Consultation::InsufficientData,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            Consultation::Bradycardia => {
                "Bradycardia detected (low heart rate). Consult a cardiologist."
            }
            Consultation::Tachycardia => {
                "Tachycardia detected (high heart rate). Consult a cardiologist."
            }
            Consultation::PossibleArrhythmia => {
                "Possible arrhythmia detected. Consult a cardiologist."
            }
            Consultation::Normal => "Normal ECG detected. Keep following a healthy lifestyle.",
            Consultation::InsufficientData => {
                "Insufficient R-peaks detected to assess rhythm. Check the recording and try again."
            }
        }
    }
}

impl fmt::Display for Consultation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<Consultation> for String {
    fn from(value: Consultation) -> Self {
        value.message().to_string()
    }
}

impl TryFrom<String> for Consultation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Consultation::ALL
            .into_iter()
            .find(|c| c.message() == value)
            .ok_or_else(|| format!("unknown consultation message: {}", value))
    }
}

/// Ordered threshold checks; the first matching rule wins.
///
/// A heart rate of 0 (no rhythm data) falls into the bradycardia rule here;
/// callers with fewer than two peaks should report
/// [`Consultation::InsufficientData`] instead of classifying.
pub fn classify(heart_rate: f64, hr_variability: f64) -> Consultation {
    if heart_rate < BRADYCARDIA_BPM {
        Consultation::Bradycardia
    } else if heart_rate > TACHYCARDIA_BPM {
        Consultation::Tachycardia
    } else if hr_variability > ARRHYTHMIA_VARIABILITY_S {
        Consultation::PossibleArrhythmia
    } else {
        Consultation::Normal
    }
}
