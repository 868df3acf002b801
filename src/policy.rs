//! Decision policy - turns the classifier score into a verdict and advice

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::CANCER_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Cancer")]
    Cancer,
    #[serde(rename = "Non-cancer")]
    NonCancer,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Cancer => "Cancer",
            Verdict::NonCancer => "Non-cancer",
        }
    }

    /// Advice shown alongside the verdict
    pub fn suggestion(&self) -> &'static str {
        match self {
            Verdict::Cancer => "Segera periksa ke dokter!",
            Verdict::NonCancer => "Penyakit kanker tidak terdeteksi.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cancer" => Ok(Verdict::Cancer),
            "Non-cancer" => Ok(Verdict::NonCancer),
            other => Err(format!("unknown verdict: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub result: Verdict,
    pub suggestion: &'static str,
}

/// Classify a probability. Only scores strictly above the threshold count as
/// cancer; NaN falls through to non-cancer.
pub fn decide(probability: f32) -> Decision {
    let result = if probability > CANCER_THRESHOLD {
        Verdict::Cancer
    } else {
        Verdict::NonCancer
    };

    Decision {
        result,
        suggestion: result.suggestion(),
    }
}
