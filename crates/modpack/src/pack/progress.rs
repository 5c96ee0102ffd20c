//! Progress reporting for install operations
//!
//! Two independent channels: discrete step events (named step, index, count)
//! and byte-count events (bytes transferred vs. total when known). Callers
//! supply either, both, or neither.

use std::sync::Arc;

/// Pipeline stages reported through step events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Acquire,
    Extract,
    BaseInstall,
    Overrides,
    Assets,
}

impl std::fmt::Display for InstallStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallStage::Acquire => write!(f, "acquire"),
            InstallStage::Extract => write!(f, "extract"),
            InstallStage::BaseInstall => write!(f, "base-install"),
            InstallStage::Overrides => write!(f, "overrides"),
            InstallStage::Assets => write!(f, "assets"),
        }
    }
}

/// Discrete step events emitted as the pipeline advances
#[derive(Debug, Clone)]
pub enum StepEvent {
    StageStarted {
        stage: InstallStage,
        total: usize,
    },
    StepCompleted {
        stage: InstallStage,
        name: String,
        index: usize,
        total: usize,
    },
    StageFinished {
        stage: InstallStage,
    },
    Warning {
        stage: InstallStage,
        message: String,
    },
}

/// Byte-level progress for a single transfer
#[derive(Debug, Clone, Copy)]
pub struct ByteEvent {
    pub transferred: u64,
    /// Total size when the remote end reports one
    pub total: Option<u64>,
}

impl ByteEvent {
    /// Completion ratio in `[0, 1]` when the total is known
    pub fn ratio(&self) -> Option<f64> {
        self.total
            .filter(|total| *total > 0)
            .map(|total| self.transferred as f64 / total as f64)
    }
}

/// Callback for discrete step events
pub type StepCallback = Arc<dyn Fn(StepEvent) + Send + Sync>;

/// Callback for byte-count events
pub type ByteCallback = Arc<dyn Fn(ByteEvent) + Send + Sync>;

/// Caller-supplied progress sinks; both channels optional.
#[derive(Clone, Default)]
pub struct Progress {
    steps: Option<StepCallback>,
    bytes: Option<ByteCallback>,
}

impl Progress {
    /// Progress that reports nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_steps(mut self, callback: StepCallback) -> Self {
        self.steps = Some(callback);
        self
    }

    pub fn with_bytes(mut self, callback: ByteCallback) -> Self {
        self.bytes = Some(callback);
        self
    }

    pub fn step(&self, event: StepEvent) {
        if let Some(ref callback) = self.steps {
            callback(event);
        }
    }

    pub fn bytes(&self, transferred: u64, total: Option<u64>) {
        if let Some(ref callback) = self.bytes {
            callback(ByteEvent { transferred, total });
        }
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("steps", &self.steps.is_some())
            .field("bytes", &self.bytes.is_some())
            .finish()
    }
}
