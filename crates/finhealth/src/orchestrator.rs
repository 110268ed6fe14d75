//! The analysis workflow and its state machine.
//!
//! ```text
//! Idle | Failed --submit--------> Submitting --ok--> Ready
//! Idle | Failed --connect_bank--> AwaitingSource --feed ok--> Submitting
//!                                 AwaitingSource | Submitting --error--> Failed
//! any --reset--> Idle
//! ```
//!
//! Only one request may be in flight. A second submission while one is
//! pending is rejected rather than racing it. `reset` bumps a generation
//! counter; a request that completes after a reset finds a newer generation
//! and leaves the state alone.

use crate::audit::AuditLogClient;
use crate::config::CompanyProfile;
use crate::error::ClientError;
use crate::model::{AiInsights, AnalysisRequest, AnalysisResult, SourceDocument};
use crate::normalize::normalize;
use crate::service::AnalysisService;
use crate::source::{SourceAdapter, SourceSelection};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
  Idle,
  AwaitingSource,
  Submitting,
  Ready { result: AnalysisResult, insights: AiInsights },
  Failed { reason: String },
}

impl WorkflowState {
  pub fn name(&self) -> &'static str {
    match self {
      WorkflowState::Idle => "idle",
      WorkflowState::AwaitingSource => "awaiting-source",
      WorkflowState::Submitting => "submitting",
      WorkflowState::Ready { .. } => "ready",
      WorkflowState::Failed { .. } => "failed",
    }
  }

  pub fn is_busy(&self) -> bool {
    matches!(self, WorkflowState::AwaitingSource | WorkflowState::Submitting)
  }
}

#[derive(Debug)]
struct Slot {
  state: WorkflowState,
  generation: u64,
}

/// A completed analysis: the raw result and its normalized narrative.
pub type Analysis = (AnalysisResult, AiInsights);

/// Owns the workflow state. Clones share it.
#[derive(Clone)]
pub struct RequestOrchestrator {
  service: Arc<dyn AnalysisService>,
  source: Arc<SourceAdapter>,
  audit: AuditLogClient,
  slot: Arc<Mutex<Slot>>,
  background: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl RequestOrchestrator {
  pub fn new(service: Arc<dyn AnalysisService>, audit: AuditLogClient) -> Self {
    Self {
      source: Arc::new(SourceAdapter::new(service.clone())),
      service,
      audit,
      slot: Arc::new(Mutex::new(Slot { state: WorkflowState::Idle, generation: 0 })),
      background: Arc::new(Mutex::new(Vec::new())),
    }
  }

  fn lock(&self) -> MutexGuard<'_, Slot> {
    self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  pub fn state(&self) -> WorkflowState {
    self.lock().state.clone()
  }

  pub fn audit(&self) -> &AuditLogClient {
    &self.audit
  }

  /// The result of the last completed analysis, if the workflow is Ready.
  pub fn current_result(&self) -> Option<AnalysisResult> {
    match &self.lock().state {
      WorkflowState::Ready { result, .. } => Some(result.clone()),
      _ => None,
    }
  }

  /// Start over. Anything still in flight is abandoned.
  pub fn reset(&self) {
    let mut slot = self.lock();
    slot.generation += 1;
    if slot.state.is_busy() {
      tracing::debug!(generation = slot.generation, "abandoning in-flight request");
    }
    slot.state = WorkflowState::Idle;
  }

  /// Enter a busy state, returning the generation that owns it.
  fn begin(&self, next: WorkflowState) -> Result<u64, ClientError> {
    let mut slot = self.lock();
    if slot.state.is_busy() {
      return Err(ClientError::SubmissionInProgress);
    }
    if matches!(slot.state, WorkflowState::Ready { .. }) {
      return Err(ClientError::ResultAlreadyLoaded);
    }

    tracing::debug!(from = slot.state.name(), to = next.name(), "workflow transition");
    slot.state = next;
    Ok(slot.generation)
  }

  /// Apply `next` only if no reset happened since `generation` began.
  fn commit(&self, generation: u64, next: WorkflowState) -> bool {
    let mut slot = self.lock();
    if slot.generation != generation {
      tracing::debug!(generation, current = slot.generation, "discarding stale completion");
      return false;
    }
    tracing::debug!(from = slot.state.name(), to = next.name(), "workflow transition");
    slot.state = next;
    true
  }

  fn fail(&self, generation: u64, error: ClientError) -> ClientError {
    let reason = error.user_message();
    if self.commit(generation, WorkflowState::Failed { reason }) {
      error
    } else {
      ClientError::Abandoned
    }
  }

  /// Submit a canonical request and wait for the normalized result.
  pub async fn submit(&self, request: AnalysisRequest) -> Result<Analysis, ClientError> {
    let generation = self.begin(WorkflowState::Submitting)?;
    self.complete_submission(generation, request).await
  }

  /// File mode: validate the upload, then submit it unchanged.
  pub async fn submit_file(
    &self,
    document: Option<SourceDocument>,
    profile: &CompanyProfile,
  ) -> Result<Analysis, ClientError> {
    let selection = SourceSelection::File(document);
    SourceAdapter::validate(&selection, profile)?;
    let request = self.source.to_canonical_request(selection, profile).await?;
    self.submit(request).await
  }

  /// Bank mode: fetch the simulated feed, synthesize a statement and submit it straight away.
  pub async fn connect_bank(
    &self,
    bank_name: &str,
    profile: &CompanyProfile,
  ) -> Result<Analysis, ClientError> {
    let selection = SourceSelection::Bank(bank_name.to_string());
    SourceAdapter::validate(&selection, profile)?;

    let generation = self.begin(WorkflowState::AwaitingSource)?;
    let request = match self.source.to_canonical_request(selection, profile).await {
      Ok(request) => request,
      Err(e) => return Err(self.fail(generation, e)),
    };

    if !self.commit(generation, WorkflowState::Submitting) {
      return Err(ClientError::Abandoned);
    }
    self.complete_submission(generation, request).await
  }

  /// Dispatch on the chosen input mode.
  pub async fn run(
    &self,
    selection: SourceSelection,
    profile: &CompanyProfile,
  ) -> Result<Analysis, ClientError> {
    tracing::debug!(mode = selection.mode(), "starting analysis");
    match selection {
      SourceSelection::File(document) => self.submit_file(document, profile).await,
      SourceSelection::Bank(bank) => self.connect_bank(&bank, profile).await,
    }
  }

  async fn complete_submission(
    &self,
    generation: u64,
    request: AnalysisRequest,
  ) -> Result<Analysis, ClientError> {
    let result = match self.service.analyze(&request).await {
      Ok(result) => result,
      Err(e) => return Err(self.fail(generation, e)),
    };

    let insights = normalize(&result);
    let ready = WorkflowState::Ready { result: result.clone(), insights: insights.clone() };
    if !self.commit(generation, ready) {
      return Err(ClientError::Abandoned);
    }

    self.refresh_audit_in_background();
    Ok((result, insights))
  }

  fn pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
    self.background.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  fn refresh_audit_in_background(&self) {
    let audit = self.audit.clone();
    let handle = tokio::spawn(async move {
      audit.refresh().await;
    });

    let mut pending = self.pending();
    pending.retain(|handle| !handle.is_finished());
    pending.push(handle);
  }

  /// Background audit refreshes still tracked for [`settle`](Self::settle).
  pub fn tracked_refreshes(&self) -> usize {
    self.pending().len()
  }

  /// Wait for background audit refreshes started so far.
  pub async fn settle(&self) {
    let handles: Vec<JoinHandle<()>> = self.pending().drain(..).collect();

    for handle in handles {
      if let Err(e) = handle.await {
        tracing::warn!(error = %e, "background audit refresh did not finish");
      }
    }
  }
}
