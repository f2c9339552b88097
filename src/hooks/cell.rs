//! State cells, their pending-update queues, and the `SetState` handle.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::debug;

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// A queued state update: a literal replacement or a function of the prior value.
///
/// Functions are `Fn`, not `FnOnce`: a pass that folded them may be abandoned,
/// and the next pass folds the same queue again.
pub(crate) enum Update<T> {
    Replace(T),
    Apply(Rc<dyn Fn(&T) -> T>),
}

/// Pending updates for one cell, type-erased as `Update<T>`.
#[derive(Default)]
pub(crate) struct UpdateQueue {
    updates: Vec<Box<dyn Any>>,
}

impl UpdateQueue {
    pub(crate) fn len(&self) -> usize {
        self.updates.len()
    }

    /// Apply every queued update to `base`, in enqueue order.
    pub(crate) fn fold<T: Clone + 'static>(&self, base: T) -> T {
        self.updates
            .iter()
            .fold(base, |acc, update| match update.downcast_ref::<Update<T>>() {
                Some(Update::Replace(value)) => value.clone(),
                Some(Update::Apply(f)) => f(&acc),
                None => acc,
            })
    }

    fn push<T: 'static>(&mut self, update: Update<T>) {
        self.updates.push(Box::new(update));
    }

    /// Drop the first `count` updates.
    fn acknowledge(&mut self, count: usize) {
        let count = count.min(self.updates.len());
        self.updates.drain(..count);
    }
}

// ---------------------------------------------------------------------------
// StateCell
// ---------------------------------------------------------------------------

/// One persisted state slot of a component fiber.
///
/// The queue is shared with the same slot of the previous and next render,
/// so handles from any render feed the same slot.
pub(crate) struct StateCell {
    pub(crate) value: Rc<dyn Any>,
    pub(crate) queue: Rc<RefCell<UpdateQueue>>,
    /// How many queued updates were folded into `value` by this render.
    pub(crate) folded: usize,
}

impl StateCell {
    /// Remove the updates this render folded. Called once its tree commits.
    pub(crate) fn acknowledge(&self) {
        if self.folded > 0 {
            self.queue.borrow_mut().acknowledge(self.folded);
        }
    }
}

impl fmt::Debug for StateCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("pending", &self.queue.borrow().len())
            .field("folded", &self.folded)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RenderSignal
// ---------------------------------------------------------------------------

/// Shared flag between update handles and the engine.
///
/// Handles raise `requested`; the engine consumes it at its next unit
/// boundary and starts one pass, however many updates arrived.
#[derive(Debug, Default)]
pub(crate) struct RenderSignal {
    committed: Cell<bool>,
    requested: Cell<bool>,
}

impl RenderSignal {
    pub(crate) fn has_committed(&self) -> bool {
        self.committed.get()
    }

    pub(crate) fn mark_committed(&self) {
        self.committed.set(true);
    }

    pub(crate) fn request(&self) {
        self.requested.set(true);
    }

    pub(crate) fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Consume a pending request.
    pub(crate) fn take_request(&self) -> bool {
        self.requested.replace(false)
    }
}

// ---------------------------------------------------------------------------
// SetState
// ---------------------------------------------------------------------------

/// Update handle returned by [`Hooks::use_state`](super::Hooks::use_state).
///
/// May be called at any time, including from event listeners after the
/// render that produced it. Updates are queued on the cell and picked up by
/// the next render pass.
pub struct SetState<T> {
    queue: Rc<RefCell<UpdateQueue>>,
    signal: Rc<RenderSignal>,
    _marker: PhantomData<fn(T)>,
}

impl<T: 'static> SetState<T> {
    pub(crate) fn new(queue: Rc<RefCell<UpdateQueue>>, signal: Rc<RenderSignal>) -> Self {
        Self {
            queue,
            signal,
            _marker: PhantomData,
        }
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        self.enqueue(Update::Replace(value));
    }

    /// Derive the next value from the previous one.
    pub fn update(&self, f: impl Fn(&T) -> T + 'static) {
        self.enqueue(Update::Apply(Rc::new(f)));
    }

    fn enqueue(&self, update: Update<T>) {
        if !self.signal.has_committed() {
            debug!("state update ignored: nothing committed yet");
            return;
        }
        self.queue.borrow_mut().push(update);
        self.signal.request();
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
            signal: Rc::clone(&self.signal),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}
