use std::sync::atomic::{AtomicU64, Ordering};

use hondana_types::IdentityWatch;
use tracing::debug;

/// Controller which (re)loads its state for current identity
pub trait Activate {
    async fn activate(&self);
}

impl<T: Activate> Activate for &T {
    async fn activate(&self) {
        (**self).activate().await
    }
}

/// Activates controller now and again on every identity change.
///
/// Activation still running when identity changes is dropped, together with its store call.
/// Returns when identity publisher is gone.
pub async fn follow_identity<A: Activate>(controller: &A, mut identity: IdentityWatch) {
    identity.borrow_and_update();
    loop {
        // closed channel disables the second branch, activation then runs to its end
        let restarted = tokio::select! {
            _ = controller.activate() => false,
            Ok(()) = identity.changed() => true,
        };
        if restarted {
            debug!("Identity changed during activation");
            continue;
        }
        if identity.changed().await.is_err() {
            debug!("Identity publisher closed");
            break;
        }
    }
}

pub(crate) fn current_uid(identity: &IdentityWatch) -> Option<String> {
    identity.borrow().as_ref().map(|user| user.uid.clone())
}

/// Activation counter, results fetched under older generation are discarded
#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        let current = self.current();
        if current != generation {
            debug!("Discarding result of generation {generation}, current is {current}");
        }
        current == generation
    }
}
