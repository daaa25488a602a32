//! Step-completion callbacks.

use std::{
    any::Any,
    fmt,
    panic::{ self, AssertUnwindSafe },
};
use log::error;
use crate::propagator::Propagator;

/// A callback invoked with read-only access to the propagator after each
/// completed step.
pub type StepObserver = Box<dyn FnMut(&Propagator) + Send>;

/// Ordered list of [`StepObserver`]s.
///
/// Observers are called in registration order. A panicking observer is
/// logged and skipped; the remaining observers still run and the step that
/// triggered the notification still counts as successful.
#[derive(Default)]
pub struct Observers {
    list: Vec<StepObserver>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("len", &self.list.len()).finish()
    }
}

impl Observers {
    /// Append an observer.
    pub fn push<F>(&mut self, observer: F)
    where F: FnMut(&Propagator) + Send + 'static
    {
        self.list.push(Box::new(observer));
    }

    /// Return the number of registered observers.
    pub fn len(&self) -> usize { self.list.len() }

    /// Return `true` if no observers are registered.
    pub fn is_empty(&self) -> bool { self.list.is_empty() }

    /// Call every observer in order.
    pub fn notify(&mut self, state: &Propagator) {
        for (k, observer) in self.list.iter_mut().enumerate() {
            let res = panic::catch_unwind(AssertUnwindSafe(|| observer(state)));
            if let Err(payload) = res {
                error!(
                    "step observer {k} panicked at t = {}: {}",
                    state.current_time(),
                    panic_message(payload.as_ref()),
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload.downcast_ref::<&str>().copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
