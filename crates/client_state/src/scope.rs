use std::{any::Any, sync::Arc};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::{
    api::{AuthApi, EventsApi},
    events::EventsStore,
    session::SessionStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("{accessor} must be used within an {provider}")]
    MissingProvider {
        accessor: &'static str,
        provider: &'static str,
    },
}

struct ScopeNode {
    parent: Option<UiScope>,
    provided: Option<Arc<dyn Any + Send + Sync>>,
}

#[derive(Clone)]
pub struct UiScope {
    node: Arc<ScopeNode>,
}

impl UiScope {
    pub fn root() -> Self {
        Self {
            node: Arc::new(ScopeNode {
                parent: None,
                provided: None,
            }),
        }
    }

    pub fn child(&self) -> Self {
        Self {
            node: Arc::new(ScopeNode {
                parent: Some(self.clone()),
                provided: None,
            }),
        }
    }

    /// Returns a child scope in which `value` is visible; the nearest provider wins.
    pub fn provide<T>(&self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self {
            node: Arc::new(ScopeNode {
                parent: Some(self.clone()),
                provided: Some(Arc::new(value)),
            }),
        }
    }

    pub fn lookup<T>(&self) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut scope = Some(self);
        while let Some(current) = scope {
            let provided = current.node.provided.as_deref();
            if let Some(value) = provided.and_then(|value| value.downcast_ref::<T>()) {
                return Some(value.clone());
            }
            scope = current.node.parent.as_ref();
        }
        None
    }
}

pub fn use_auth(scope: &UiScope) -> Result<SessionStore, ScopeError> {
    scope
        .lookup::<SessionStore>()
        .ok_or(ScopeError::MissingProvider {
            accessor: "use_auth",
            provider: "AuthProvider",
        })
}

pub fn use_events(scope: &UiScope) -> Result<EventsStore, ScopeError> {
    scope
        .lookup::<EventsStore>()
        .ok_or(ScopeError::MissingProvider {
            accessor: "use_events",
            provider: "EventsProvider",
        })
}

pub struct AuthProvider;

impl AuthProvider {
    pub fn mount(parent: &UiScope, api: Arc<dyn AuthApi>) -> MountedSession {
        let store = SessionStore::new(api);
        let scope = parent.provide(store.clone());
        let init = tokio::spawn({
            let store = store.clone();
            async move { store.restore_session().await }
        });

        MountedSession {
            scope,
            store,
            init: Some(init),
        }
    }
}

pub struct MountedSession {
    pub scope: UiScope,
    pub store: SessionStore,
    init: Option<JoinHandle<()>>,
}

impl MountedSession {
    pub async fn initialized(&mut self) {
        if let Some(init) = self.init.take() {
            if let Err(error) = init.await {
                warn!(%error, "session restore task did not complete");
            }
        }
    }

    pub fn unmount(mut self) {
        if let Some(init) = self.init.take() {
            init.abort();
        }
    }
}

pub struct EventsProvider;

impl EventsProvider {
    pub fn mount(parent: &UiScope, api: Arc<dyn EventsApi>) -> MountedEvents {
        let store = EventsStore::new(api);
        let scope = parent.provide(store.clone());
        MountedEvents { scope, store }
    }
}

pub struct MountedEvents {
    pub scope: UiScope,
    pub store: EventsStore,
}

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod tests;
