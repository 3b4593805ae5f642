use serde::{Deserialize, Serialize};

/// One (preference, exchange) pair from a DNS MX answer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Outcome of an MX lookup: records sorted ascending by preference, or none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MxStatus {
    Records(Vec<MxRecord>),
    NoRecords,
}

impl MxStatus {
    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Records(records) => records.as_slice(),
            Self::NoRecords => &[],
        }
    }

    /// The lowest-preference record, the host a probe should talk to first.
    pub fn preferred(&self) -> Option<&MxRecord> {
        self.records().first()
    }

    pub fn has_route(&self) -> bool {
        !self.records().is_empty()
    }
}
