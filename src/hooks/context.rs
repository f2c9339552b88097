//! The per-invocation hook context handed to component render functions.

use std::rc::Rc;

use tracing::warn;

use super::cell::{RenderSignal, SetState, StateCell};

/// Hook context for one component invocation.
///
/// Only the engine constructs a `Hooks`, so state calls are only possible
/// while a component renders. Cells are matched to the previous render of the
/// same fiber by call order; changing the order between renders is a bug in
/// the component. A slot whose type changed is reinitialised.
pub struct Hooks<'a> {
    previous: &'a [StateCell],
    cells: Vec<StateCell>,
    signal: &'a Rc<RenderSignal>,
    component: &'static str,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(
        previous: &'a [StateCell],
        signal: &'a Rc<RenderSignal>,
        component: &'static str,
    ) -> Self {
        Self {
            previous,
            cells: Vec::new(),
            signal,
            component,
        }
    }

    /// Allocate (first render) or reuse (later renders) the next state cell.
    ///
    /// Returns the current value, with every pending update applied, and a
    /// handle for queueing further updates.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, SetState<T>) {
        let index = self.cells.len();
        let (base, queue) = match self.previous.get(index) {
            Some(prev) => match prev.value.downcast_ref::<T>() {
                Some(value) => (value.clone(), Rc::clone(&prev.queue)),
                None => {
                    warn!(
                        component = self.component,
                        index, "state cell changed type between renders; reinitialising"
                    );
                    (initial, Rc::default())
                }
            },
            None => (initial, Rc::default()),
        };

        let (value, folded) = {
            let pending = queue.borrow();
            (pending.fold(base), pending.len())
        };

        self.cells.push(StateCell {
            value: Rc::new(value.clone()),
            queue: Rc::clone(&queue),
            folded,
        });
        (value, SetState::new(queue, Rc::clone(self.signal)))
    }

    /// Number of cells allocated so far in this invocation.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn finish(self) -> Vec<StateCell> {
        self.cells
    }
}
