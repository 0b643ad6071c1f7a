//! Client-side handle over the identity provider.
//!
//! A gateway tracks one client's current session and notifies observers
//! whenever that session changes. It keeps no credentials beyond the tokens
//! of the current session.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::auth::provider::{AuthTokens, IdentityProvider, SignedIn};
use crate::auth::session::Session;
use crate::error::AuthError;

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct GatewayState {
    current: Option<SignedIn>,
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

fn lock(state: &Mutex<GatewayState>) -> MutexGuard<'_, GatewayState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct IdentityGateway {
    provider: Arc<IdentityProvider>,
    state: Arc<Mutex<GatewayState>>,
}

/// Handle returned by [`IdentityGateway::observe_auth_state`].
#[must_use = "dropping the subscription stops notifications"]
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<GatewayState>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state).listeners.remove(&self.id);
        }
    }
}

impl IdentityGateway {
    pub fn new(provider: Arc<IdentityProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(GatewayState::default())),
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        lock(&self.state).current.as_ref().map(|s| s.session.clone())
    }

    pub fn current_tokens(&self) -> Option<AuthTokens> {
        lock(&self.state).current.as_ref().map(|s| s.tokens.clone())
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let signed_in = self.provider.register(email, password).await?;
        let session = signed_in.session.clone();
        self.set_current(Some(signed_in));
        Ok(session)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let signed_in = self.provider.sign_in(email, password).await?;
        let session = signed_in.session.clone();
        self.set_current(Some(signed_in));
        Ok(session)
    }

    /// Revoke the current refresh token and clear the session. Signing out
    /// while signed out still notifies observers.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(tokens) = self.current_tokens() {
            self.provider.sign_out(&tokens.refresh_token).await?;
        }
        self.set_current(None);
        Ok(())
    }

    /// Call `callback` now with the current session and again after every
    /// sign-in or sign-out through this gateway.
    pub fn observe_auth_state<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(callback);
        let (id, current) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.insert(id, listener.clone());
            (id, state.current.as_ref().map(|s| s.session.clone()))
        };

        listener(current.as_ref());

        Subscription {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    fn set_current(&self, next: Option<SignedIn>) {
        let (session, listeners) = {
            let mut state = lock(&self.state);
            state.current = next;
            let session = state.current.as_ref().map(|s| s.session.clone());
            let listeners: Vec<Listener> = state.listeners.values().cloned().collect();
            (session, listeners)
        };

        // outside the lock, so callbacks may use the gateway
        for listener in &listeners {
            listener(session.as_ref());
        }
    }
}
