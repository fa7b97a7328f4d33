//! Background optimization runs.
//!
//! Each run executes on its own named thread and reports through an
//! unbounded channel: zero or more `Progress` messages, then exactly one
//! `Finished` or `Failed`.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use buildforge_core::{BuildForgeError, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::message::{BuildOutcome, OptimizeRequest, OptimizerMessage};
use crate::optimizer::BuildOptimizer;
use crate::termination::CancellationToken;

/// Starts optimization runs on background threads.
///
/// # Examples
///
/// ```
/// use buildforge_core::{InitialStats, Objective};
/// use buildforge_solver::{BuildOptimizer, FormulaRegistry, OptimizeRequest, OptimizerManager};
/// use buildforge_test::two_slot_atk_pool;
///
/// let manager = OptimizerManager::new(BuildOptimizer::new(FormulaRegistry::new()));
/// let request = OptimizeRequest::new(
///     two_slot_atk_pool(),
///     InitialStats::new("hutao"),
///     Objective::attribute("atk"),
/// );
///
/// let outcome = manager.start(request).unwrap().collect().unwrap();
/// assert_eq!(outcome.builds[0].value, 35.0);
/// ```
#[derive(Debug, Clone)]
pub struct OptimizerManager {
    optimizer: Arc<BuildOptimizer>,
}

impl OptimizerManager {
    pub fn new(optimizer: BuildOptimizer) -> Self {
        Self {
            optimizer: Arc::new(optimizer),
        }
    }

    pub fn optimizer(&self) -> &BuildOptimizer {
        &self.optimizer
    }

    /// Starts a run on a new thread.
    ///
    /// # Errors
    ///
    /// Returns [`BuildForgeError::Spawn`] if the thread cannot be created.
    /// Errors of the run itself arrive as [`OptimizerMessage::Failed`].
    pub fn start(&self, request: OptimizeRequest) -> Result<OptimizerHandle> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let optimizer = Arc::clone(&self.optimizer);
        let token = cancel.clone();

        let thread = thread::Builder::new()
            .name("buildforge-optimizer".to_string())
            .spawn(move || {
                if let Err(error) = optimizer.optimize_with_channel(&request, &sender, Some(&token))
                {
                    warn!(event = "optimize_failed", error = %error);
                    let _ = sender.send(OptimizerMessage::Failed {
                        reason: error.to_string(),
                    });
                }
            })?;

        info!(event = "optimizer_spawned");
        Ok(OptimizerHandle {
            receiver,
            cancel,
            thread: Some(thread),
        })
    }
}

/// Receiving end of a background run.
///
/// Dropping the handle does not stop the run; call
/// [`cancel`](Self::cancel) first.
#[derive(Debug)]
pub struct OptimizerHandle {
    receiver: mpsc::UnboundedReceiver<OptimizerMessage>,
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl OptimizerHandle {
    /// Requests the run to stop at its next progress check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Receives the next message, or `None` once the run has ended and
    /// every message was read.
    pub async fn recv(&mut self) -> Option<OptimizerMessage> {
        self.receiver.recv().await
    }

    /// Blocking form of [`recv`](Self::recv). Must not be called from
    /// inside an async runtime.
    pub fn blocking_recv(&mut self) -> Option<OptimizerMessage> {
        self.receiver.blocking_recv()
    }

    /// Waits for the terminal message, discarding progress.
    ///
    /// # Errors
    ///
    /// Returns [`BuildForgeError::Failed`] carrying the failure reason when
    /// the run failed, or when it ended without a terminal message.
    pub fn collect(mut self) -> Result<BuildOutcome> {
        let mut outcome = None;
        while let Some(message) = self.blocking_recv() {
            match message {
                OptimizerMessage::Progress(_) => {}
                OptimizerMessage::Finished(result) => outcome = Some(Ok(result)),
                OptimizerMessage::Failed { reason } => {
                    outcome = Some(Err(BuildForgeError::Failed(reason)))
                }
            }
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!(event = "optimizer_panicked");
            }
        }
        outcome.unwrap_or_else(|| {
            Err(BuildForgeError::Failed(
                "optimizer ended without a result".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildforge_core::{InitialStats, Objective};
    use buildforge_config::OptimizerConfig;
    use buildforge_test::two_slot_atk_pool;

    use crate::objective::FormulaRegistry;

    fn manager() -> OptimizerManager {
        OptimizerManager::new(BuildOptimizer::new(FormulaRegistry::new()).with_config(
            OptimizerConfig::default().with_progress_interval(1),
        ))
    }

    fn request() -> OptimizeRequest {
        OptimizeRequest::new(
            two_slot_atk_pool(),
            InitialStats::new("hutao"),
            Objective::attribute("atk"),
        )
    }

    #[test]
    fn test_messages_end_with_one_terminal() {
        let mut handle = manager().start(request()).unwrap();

        let mut messages = Vec::new();
        while let Some(message) = handle.blocking_recv() {
            messages.push(message);
        }

        assert!(messages.len() >= 2);
        assert!(matches!(messages.first(), Some(OptimizerMessage::Progress(_))));
        assert!(matches!(messages.last(), Some(OptimizerMessage::Finished(_))));
        assert_eq!(messages.iter().filter(|m| m.is_terminal()).count(), 1);
    }

    #[test]
    fn test_collect_returns_outcome() {
        let outcome = manager().start(request()).unwrap().collect().unwrap();

        let values: Vec<f64> = outcome.builds.iter().map(|b| b.value).collect();
        assert_eq!(values, vec![35.0, 25.0, 25.0, 15.0]);
    }

    #[test]
    fn test_invalid_request_fails() {
        let mut handle = manager().start(request().with_max_results(0)).unwrap();

        match handle.blocking_recv() {
            Some(OptimizerMessage::Failed { reason }) => assert!(reason.contains("max_results")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(handle.blocking_recv().is_none());
    }

    #[test]
    fn test_collect_surfaces_failure() {
        let result = manager().start(request().with_max_results(0)).unwrap().collect();
        assert!(matches!(
            result,
            Err(BuildForgeError::Failed(reason)) if reason.contains("max_results")
        ));
    }

    #[tokio::test]
    async fn test_async_recv() {
        let mut handle = manager().start(request()).unwrap();

        let mut last = None;
        while let Some(message) = handle.recv().await {
            last = Some(message);
        }
        assert!(matches!(last, Some(OptimizerMessage::Finished(_))));
    }
}
