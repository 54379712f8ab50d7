//! Ordered delivery of presenter calls.
//!
//! Every presenter effect is spawned on its own task, so effects of two
//! actions reduced back to back may run in either order. The reducer takes a
//! [`Ticket`] while reducing; tickets are numbered in reduce order and the
//! queue hands their calls to the presenter strictly in that order, holding
//! back any that arrive early.
//!
//! A ticket dropped without being used releases its slot, so a discarded
//! effect never stalls later calls. A ticket held by an effect that is still
//! waiting on something else does stall them: take tickets only for effects
//! that present right away.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use todo_sync_core::presenter::Presenter;

type PresenterCalls = Box<dyn FnOnce(&dyn Presenter) + Send>;

struct Backlog {
    next: u64,
    // `None` marks a released slot
    waiting: BTreeMap<u64, Option<PresenterCalls>>,
}

struct Shared {
    presenter: Arc<dyn Presenter>,
    issued: AtomicU64,
    backlog: Mutex<Backlog>,
}

/// Presenter wrapper applying calls in ticket order
#[derive(Clone)]
pub struct PresentationQueue {
    shared: Arc<Shared>,
}

impl PresentationQueue {
    /// Queue in front of `presenter`
    #[must_use]
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self {
            shared: Arc::new(Shared {
                presenter,
                issued: AtomicU64::new(0),
                backlog: Mutex::new(Backlog {
                    next: 0,
                    waiting: BTreeMap::new(),
                }),
            }),
        }
    }

    /// Reserve the next slot
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        Ticket {
            seq: Some(self.shared.issued.fetch_add(1, Ordering::SeqCst)),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Calls held back behind an earlier, unfinished ticket
    #[must_use]
    pub fn backlog_len(&self) -> usize {
        self.shared.lock().waiting.len()
    }
}

impl std::fmt::Debug for PresentationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationQueue")
            .field("issued", &self.shared.issued.load(Ordering::SeqCst))
            .field("backlog", &self.backlog_len())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Backlog> {
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle(&self, seq: u64, calls: Option<PresenterCalls>) {
        let mut backlog = self.lock();
        if seq != backlog.next {
            tracing::trace!(seq, next = backlog.next, "Presenter call held back");
        }
        backlog.waiting.insert(seq, calls);

        loop {
            let next = backlog.next;
            let Some(calls) = backlog.waiting.remove(&next) else {
                break;
            };
            backlog.next += 1;
            if let Some(calls) = calls {
                calls(self.presenter.as_ref());
            }
        }
    }
}

/// A reserved slot in a [`PresentationQueue`]
pub struct Ticket {
    seq: Option<u64>,
    shared: Arc<Shared>,
}

impl Ticket {
    /// Run `calls` against the presenter once every earlier ticket is done
    pub fn present<F>(mut self, calls: F)
    where
        F: FnOnce(&dyn Presenter) + Send + 'static,
    {
        if let Some(seq) = self.seq.take() {
            self.shared.settle(seq, Some(Box::new(calls)));
        }
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if let Some(seq) = self.seq.take() {
            self.shared.settle(seq, None);
        }
    }
}
