// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Keyed asynchronous loaders.
//!
//! A loader owns the `{data, loading, error}` state of one dataset whose
//! request depends on a key (usually the selected parent filter). Changing
//! the key starts exactly one fetch; clearing it resets the state without a
//! fetch. Every key change bumps a generation counter and cancels the
//! previous fetch, and a result only commits if its generation is still
//! current, so a slow response for an old key can never overwrite the state
//! of a newer one. A cancelled fetch reaches the same check as
//! `ClientError::Cancelled` and is discarded there.

use crate::cancel::CancellationToken;
use crate::error::ClientError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt::Debug;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// The observable state of a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loadable<T> {
    /// The last successfully loaded value for the current key.
    pub data: Option<T>,
    /// Whether a fetch for the current key is in flight.
    pub loading: bool,
    /// The message of the last failed fetch for the current key.
    pub error: Option<String>,
}

impl<T> Loadable<T> {
    /// No key, nothing loaded.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    /// A fetch is in flight.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    /// The fetch succeeded.
    #[must_use]
    pub const fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            loading: false,
            error: None,
        }
    }

    /// The fetch failed. Data is cleared so nothing stale is displayed.
    #[must_use]
    pub const fn failed(message: String) -> Self {
        Self {
            data: None,
            loading: false,
            error: Some(message),
        }
    }
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::idle()
    }
}

type FetchFn<K, T> = dyn Fn(K) -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync;

struct Control<K> {
    key: Option<K>,
    generation: u64,
    token: Option<CancellationToken>,
}

struct Shared<K, T> {
    name: &'static str,
    state: watch::Sender<Loadable<T>>,
    control: Mutex<Control<K>>,
}

impl<K, T> Shared<K, T> {
    fn lock_control(&self) -> MutexGuard<'_, Control<K>> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, generation: u64, outcome: Result<T, ClientError>) {
        let mut control: MutexGuard<'_, Control<K>> = self.lock_control();
        if control.generation != generation {
            debug!(
                loader = self.name,
                generation,
                current = control.generation,
                cancelled = matches!(&outcome, Err(err) if err.is_cancelled()),
                "Discarding stale response"
            );
            return;
        }
        control.token = None;
        match outcome {
            Ok(data) => {
                self.state.send_replace(Loadable::ready(data));
            }
            Err(err) => {
                debug!(loader = self.name, error = %err, "Fetch failed");
                self.state.send_replace(Loadable::failed(err.to_string()));
            }
        }
    }
}

/// A loader whose fetch is keyed by `K` and yields `T`.
///
/// Key changes spawn their fetch on the ambient tokio runtime, so
/// [`Loader::set_key`] and [`Loader::reload`] must be called from within
/// one. Dropping the loader cancels any fetch in flight.
pub struct Loader<K, T> {
    fetch: Arc<FetchFn<K, T>>,
    shared: Arc<Shared<K, T>>,
}

impl<K, T> Loader<K, T>
where
    K: Clone + PartialEq + Debug + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates an idle loader.
    ///
    /// `name` identifies the loader in logs.
    pub fn new<F, Fut>(name: &'static str, fetch: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let (state, _) = watch::channel(Loadable::idle());
        Self {
            fetch: Arc::new(move |key: K| fetch(key).boxed()),
            shared: Arc::new(Shared {
                name,
                state,
                control: Mutex::new(Control {
                    key: None,
                    generation: 0,
                    token: None,
                }),
            }),
        }
    }

    /// Points the loader at a new key.
    ///
    /// An unchanged key does nothing. `None` resets the state without a
    /// fetch. A new key starts one fetch. Returns whether the key changed.
    pub fn set_key(&self, key: Option<K>) -> bool {
        let mut control: MutexGuard<'_, Control<K>> = self.shared.lock_control();
        if control.key == key {
            return false;
        }
        control.key.clone_from(&key);
        self.start(&mut control, key);
        true
    }

    /// Fetches the current key again. Does nothing without a key.
    pub fn reload(&self) {
        let mut control: MutexGuard<'_, Control<K>> = self.shared.lock_control();
        let key: Option<K> = control.key.clone();
        if key.is_some() {
            self.start(&mut control, key);
        }
    }

    fn start(&self, control: &mut Control<K>, key: Option<K>) {
        control.generation += 1;
        if let Some(previous) = control.token.take() {
            previous.cancel();
        }

        let Some(key) = key else {
            debug!(loader = self.shared.name, "Key cleared");
            self.shared.state.send_replace(Loadable::idle());
            return;
        };

        let generation: u64 = control.generation;
        let token: CancellationToken = CancellationToken::new();
        control.token = Some(token.clone());
        self.shared.state.send_replace(Loadable::pending());
        debug!(loader = self.shared.name, ?key, generation, "Fetching");

        let fetch: BoxFuture<'static, Result<T, ClientError>> = (self.fetch)(key);
        let shared: Arc<Shared<K, T>> = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome: Result<T, ClientError> = token
                .run_until_cancelled(fetch)
                .await
                .unwrap_or(Err(ClientError::Cancelled));
            shared.commit(generation, outcome);
        });
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.shared.lock_control().generation
    }

    #[cfg(test)]
    pub(crate) fn commit(&self, generation: u64, outcome: Result<T, ClientError>) {
        self.shared.commit(generation, outcome);
    }

    /// The current key.
    #[must_use]
    pub fn key(&self) -> Option<K> {
        self.shared.lock_control().key.clone()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn state(&self) -> Loadable<T> {
        self.shared.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Loadable<T>> {
        self.shared.state.subscribe()
    }

    /// Waits until no fetch is in flight and returns the settled state.
    pub async fn settled(&self) -> Loadable<T> {
        let mut receiver: watch::Receiver<Loadable<T>> = self.subscribe();
        let settled: Option<Loadable<T>> = receiver
            .wait_for(|state| !state.loading)
            .await
            .ok()
            .map(|state| state.clone());
        settled.unwrap_or_else(|| self.state())
    }
}

impl<K, T> Drop for Loader<K, T> {
    fn drop(&mut self) {
        let mut control: MutexGuard<'_, Control<K>> = self.shared.lock_control();
        control.generation += 1;
        if let Some(token) = control.token.take() {
            token.cancel();
        }
    }
}

impl<K: Debug, T: Debug> Debug for Loader<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("name", &self.shared.name)
            .field("state", &*self.shared.state.borrow())
            .finish_non_exhaustive()
    }
}
