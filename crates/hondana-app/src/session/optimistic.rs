use tokio::sync::watch;
use tracing::debug;

use super::{
    error::{ControllerError, Result},
    identity::Generation,
};

/// Lifecycle of optimistic local change
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationPhase<T> {
    #[default]
    Idle,
    /// Applied locally, store call in flight, `previous` is restored on failure
    Pending { previous: T },
    Reconciled,
    RolledBack,
}

impl<T> MutationPhase<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationPhase::Pending { .. })
    }
}

/// Controller state which supports optimistic changes
pub(crate) trait Optimistic {
    type Snapshot;

    fn phase_mut(&mut self) -> &mut MutationPhase<Self::Snapshot>;
    fn snapshot(&self) -> Self::Snapshot;
    fn restore(&mut self, snapshot: Self::Snapshot);
    fn set_error(&mut self, error: Option<String>);
}

/// Applies change locally and remembers previous value.
///
/// Fails with [`ControllerError::MutationPending`] when another change is not settled yet.
/// Returned change is rolled back when dropped unsettled, e.g. when caller's future is cancelled.
pub(crate) fn begin<'a, S: Optimistic>(
    state: &'a watch::Sender<S>,
    generation: &'a Generation,
    apply: impl FnOnce(&mut S),
) -> Result<PendingChange<'a, S>> {
    let started_at = generation.current();
    let mut started = false;
    state.send_if_modified(|s| {
        if s.phase_mut().is_pending() {
            return false;
        }
        let previous = s.snapshot();
        apply(s);
        *s.phase_mut() = MutationPhase::Pending { previous };
        s.set_error(None);
        started = true;
        true
    });
    if started {
        Ok(PendingChange {
            state,
            generation,
            started_at,
            settled: false,
        })
    } else {
        Err(ControllerError::MutationPending)
    }
}

/// Local change waiting for store result
pub(crate) struct PendingChange<'a, S: Optimistic> {
    state: &'a watch::Sender<S>,
    generation: &'a Generation,
    started_at: u64,
    settled: bool,
}

impl<S: Optimistic> PendingChange<'_, S> {
    /// Confirms or rolls back change according to store result.
    ///
    /// State reloaded meanwhile (newer generation) is left as is.
    pub(crate) fn settle<E: Into<ControllerError>>(
        mut self,
        result: std::result::Result<(), E>,
    ) -> Result<()> {
        self.settled = true;
        let result = result.map_err(Into::into);
        if !self.generation.is_current(self.started_at) {
            return result;
        }
        match result {
            Ok(()) => {
                self.state
                    .send_modify(|s| *s.phase_mut() = MutationPhase::Reconciled);
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                self.state.send_modify(|s| {
                    rollback(s);
                    s.set_error(Some(msg));
                });
                Err(e)
            }
        }
    }
}

impl<S: Optimistic> Drop for PendingChange<'_, S> {
    fn drop(&mut self) {
        if self.settled || !self.generation.is_current(self.started_at) {
            return;
        }
        debug!("Pending change cancelled, rolling back");
        self.state.send_if_modified(|s| {
            if s.phase_mut().is_pending() {
                rollback(s);
                true
            } else {
                false
            }
        });
    }
}

fn rollback<S: Optimistic>(s: &mut S) {
    let phase = std::mem::replace(s.phase_mut(), MutationPhase::RolledBack);
    if let MutationPhase::Pending { previous } = phase {
        s.restore(previous);
    }
}
