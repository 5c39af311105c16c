//! Injected logging handle for the supervision components.
//!
//! Components never log through an implicit global: each one holds a
//! [`Diagnostics`] and runs its work inside [`Diagnostics::scope`], which makes
//! the wrapped `tracing` dispatcher the default for the duration of the call.

use tracing::dispatcher::{self, Dispatch};

#[derive(Clone, Debug)]
pub struct Diagnostics {
    dispatch: Dispatch,
}

impl Diagnostics {
    /// Capture whatever subscriber is the default at construction time.
    pub fn inherit() -> Self {
        Self {
            dispatch: dispatcher::get_default(|current| current.clone()),
        }
    }

    /// A handle that drops every event. Handy in tests.
    pub fn silent() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Route component events to a caller-supplied subscriber.
    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Run `f` with this handle's dispatcher as the thread default.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::inherit()
    }
}
