use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDetails {
    pub name: &'static str,
}

pub static EXTRACTION: StageDetails = StageDetails {
    name: "Frame Extractor",
};

pub static RECOGNITION: StageDetails = StageDetails {
    name: "Text Recognizer",
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProcessStatus {
    Processing {
        id:         String,
        completion: ProcessCompletion,
    },
    Completed {
        id: String,
    },
    Failed {
        id:    String,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProcessCompletion {
    Indeterminate,
    Frames {
        completed: u64,
        total:     u64,
    },
}

/// Optional sink for progress events. A disconnected receiver is ignored.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<Sender<ProcessStatus>>,
}

impl ProgressSink {
    #[inline]
    pub fn new(tx: Sender<ProcessStatus>) -> Self {
        Self {
            tx: Some(tx),
        }
    }

    #[inline]
    pub fn send(&self, status: ProcessStatus) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(status);
        }
    }

    #[inline]
    pub fn processing(&self, stage: &StageDetails, completion: ProcessCompletion) {
        self.send(ProcessStatus::Processing {
            id: stage.name.to_owned(),
            completion,
        });
    }

    #[inline]
    pub fn completed(&self, stage: &StageDetails) {
        self.send(ProcessStatus::Completed {
            id: stage.name.to_owned(),
        });
    }

    #[inline]
    pub fn failed(&self, stage: &StageDetails, error: &str) {
        self.send(ProcessStatus::Failed {
            id:    stage.name.to_owned(),
            error: error.to_owned(),
        });
    }
}
