use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend behaviour selector. The client only uses it to pick an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "RAG")]
    Rag,
    #[serde(rename = "Consensus")]
    Consensus,
}

pub const CONSENSUS_NOTICE: &str =
    "Consensus mode runs multiple agents in parallel and then aggregates responses. Please be patient.";

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Rag => "RAG",
            Mode::Consensus => "Consensus",
        }
    }

    /// Path appended to the backend route, if any.
    pub fn endpoint_suffix(self) -> Option<&'static str> {
        match self {
            Mode::Rag => None,
            Mode::Consensus => Some("consensus"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rag" => Ok(Mode::Rag),
            "consensus" => Ok(Mode::Consensus),
            other => Err(format!(
                "unknown mode '{other}' (expected 'rag' or 'consensus')"
            )),
        }
    }
}
