//! Progress reporting for long-running providers
//!
//! Long-running work is represented by a best-effort partial result flagged
//! `INCOMPLETE`, not by a future; callers re-issue the request and can poll
//! these reports to show state in the meantime.

use meshforge_core::id::{ObjectId, ProviderId};

/// Where a provider's asynchronous computation stands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressState {
    /// No computation pending
    Idle,
    /// Computation underway, `fraction` in 0..=1
    Running { fraction: f32 },
    /// Finished; the next request returns a final result
    Done,
}

/// One provider's progress for one entity (or for the provider overall)
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub provider: ProviderId,
    /// The entity being computed, if the work is per-entity
    pub object: Option<ObjectId>,
    pub state: ProgressState,
    pub detail: Option<String>,
}

impl ProgressReport {
    pub fn new(provider: ProviderId, state: ProgressState) -> Self {
        Self {
            provider,
            object: None,
            state,
            detail: None,
        }
    }

    pub fn for_object(mut self, object: ObjectId) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ProgressState::Running { .. })
    }
}
