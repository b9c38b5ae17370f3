use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use chd_model::{Field, History, Measurement, PredictError, PredictionResult, RiskInput};
use chd_predictor::PredictorGateway;
use log::{debug, error, info, warn};

use crate::model::{FormSnapshot, Submission};

type Outcome = Result<PredictionResult, PredictError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Started,
    Blocked,
    AlreadyRunning,
}

/// Owns the form snapshot, the session history and the in-flight request.
/// The gateway runs on a worker thread; results come back through `poll`.
pub struct FormController {
    snapshot: FormSnapshot,
    history: History,
    gateway: Arc<dyn PredictorGateway>,
    pending: Option<(RiskInput, Receiver<Outcome>)>,
}

impl FormController {
    pub fn new(gateway: Arc<dyn PredictorGateway>) -> Self {
        Self {
            snapshot: FormSnapshot::default(),
            history: History::new(),
            gateway,
            pending: None,
        }
    }

    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn gateway_name(&self) -> &'static str {
        self.gateway.name()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_loading()
    }

    pub fn edit(&mut self, field: Field, raw: &str) {
        self.snapshot = self.snapshot.edited(field, raw);
    }

    pub fn cycle(&mut self, field: Field, forward: bool) {
        self.snapshot = self.snapshot.cycled(field, forward);
    }

    pub fn measure(&mut self, measurement: Measurement, raw: &str) {
        self.snapshot = self.snapshot.measured(measurement, raw);
    }

    pub fn submit(&mut self) -> SubmitStatus {
        match self.snapshot.submitted() {
            Submission::Rejected => {
                debug!("submit ignored: request already in flight");
                SubmitStatus::AlreadyRunning
            }
            Submission::Blocked(next) => {
                warn!("submit blocked by {} validation error(s)", next.errors.len());
                self.snapshot = next;
                SubmitStatus::Blocked
            }
            Submission::Accepted(next, input) => {
                self.snapshot = next;
                let (tx, rx) = mpsc::channel();
                let gateway = Arc::clone(&self.gateway);
                let request = input.clone();
                let spawned = thread::Builder::new()
                    .name("chd-predict".to_string())
                    .spawn(move || {
                        let _ = tx.send(gateway.predict(&request));
                    });
                match spawned {
                    Ok(_) => {
                        info!("prediction requested from {}", self.gateway.name());
                        self.pending = Some((input, rx));
                    }
                    Err(e) => {
                        error!("could not start prediction worker: {e}");
                        self.finish(input, Err(PredictError::Transport(e.to_string())));
                    }
                }
                SubmitStatus::Started
            }
        }
    }

    /// Collects a finished prediction, if any. Returns true when the
    /// snapshot changed.
    pub fn poll(&mut self) -> bool {
        let Some((_, rx)) = &self.pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(PredictError::Transport("prediction worker exited without an answer".into()))
            }
        };
        if let Some((input, _)) = self.pending.take() {
            self.finish(input, outcome);
        }
        true
    }

    fn finish(&mut self, input: RiskInput, outcome: Outcome) {
        match &outcome {
            Ok(result) => {
                let record = self.history.append(input, result.clone());
                info!(
                    "prediction #{} {} ({:.3})",
                    record.id,
                    result.classification.label(),
                    result.probability
                );
            }
            Err(e) => warn!("prediction failed: {e}"),
        }
        self.snapshot = self.snapshot.completed(outcome);
    }

    /// Returns false while a request is in flight.
    pub fn reset(&mut self) -> bool {
        match self.snapshot.reset() {
            Some(fresh) => {
                self.snapshot = fresh;
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        info!("clearing {} history record(s)", self.history.len());
        self.history.clear();
    }
}
