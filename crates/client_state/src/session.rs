use std::sync::Arc;

use serde::Serialize;
use shared::{
    domain::User,
    error::ApiException,
    protocol::{ForgotPasswordRequest, LoginCredentials, RegistrationData},
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    api::AuthApi,
    store::{Action, StateContainer},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(User),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub identity: Identity,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match &self.identity {
            Identity::Authenticated(user) => Some(user),
            Identity::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.identity, Identity::Authenticated(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    LoginStart,
    LoginSuccess(User),
    LoginFailure(String),
    RegisterStart,
    RegisterSuccess(User),
    RegisterFailure(String),
    Logout,
    ClearError,
    SetLoading(bool),
}

impl Action for SessionAction {
    fn name(&self) -> &'static str {
        match self {
            SessionAction::LoginStart => "login_start",
            SessionAction::LoginSuccess(_) => "login_success",
            SessionAction::LoginFailure(_) => "login_failure",
            SessionAction::RegisterStart => "register_start",
            SessionAction::RegisterSuccess(_) => "register_success",
            SessionAction::RegisterFailure(_) => "register_failure",
            SessionAction::Logout => "logout",
            SessionAction::ClearError => "clear_error",
            SessionAction::SetLoading(_) => "set_loading",
        }
    }
}

pub fn reduce(state: SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::LoginStart | SessionAction::RegisterStart => SessionState {
            is_loading: true,
            error: None,
            ..state
        },
        SessionAction::LoginSuccess(user) | SessionAction::RegisterSuccess(user) => SessionState {
            identity: Identity::Authenticated(user),
            is_loading: false,
            error: None,
        },
        SessionAction::LoginFailure(message) | SessionAction::RegisterFailure(message) => {
            SessionState {
                identity: Identity::Anonymous,
                is_loading: false,
                error: Some(message),
            }
        }
        SessionAction::Logout => SessionState {
            identity: Identity::Anonymous,
            error: None,
            ..state
        },
        SessionAction::ClearError => SessionState {
            error: None,
            ..state
        },
        SessionAction::SetLoading(is_loading) => SessionState { is_loading, ..state },
    }
}

#[derive(Clone)]
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    state: Arc<StateContainer<SessionState, SessionAction>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            api,
            state: Arc::new(StateContainer::new("session", reduce)),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, ApiException> {
        self.state.dispatch(SessionAction::LoginStart);
        match self.api.login(credentials).await {
            Ok(user) => {
                info!(user_id = %user.id, "signed in");
                self.state.dispatch(SessionAction::LoginSuccess(user.clone()));
                Ok(user)
            }
            Err(error) => {
                self.state
                    .dispatch(SessionAction::LoginFailure(error.message.clone()));
                Err(error)
            }
        }
    }

    pub async fn register(&self, data: &RegistrationData) -> Result<User, ApiException> {
        self.state.dispatch(SessionAction::RegisterStart);
        match self.api.register(data).await {
            Ok(user) => {
                info!(user_id = %user.id, "registered and signed in");
                self.state
                    .dispatch(SessionAction::RegisterSuccess(user.clone()));
                Ok(user)
            }
            Err(error) => {
                self.state
                    .dispatch(SessionAction::RegisterFailure(error.message.clone()));
                Err(error)
            }
        }
    }

    pub async fn logout(&self) {
        if let Err(error) = self.api.logout().await {
            warn!(%error, "logout request failed; clearing local session anyway");
        }
        self.state.dispatch(SessionAction::Logout);
        info!("signed out");
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiException> {
        self.state.dispatch(SessionAction::SetLoading(true));
        let _reset = self
            .state
            .dispatch_on_drop(SessionAction::SetLoading(false));

        self.api.forgot_password(request).await.inspect_err(|error| {
            self.state
                .dispatch(SessionAction::LoginFailure(error.message.clone()));
        })
    }

    pub fn clear_error(&self) {
        self.state.dispatch(SessionAction::ClearError);
    }

    pub async fn restore_session(&self) {
        self.state.dispatch(SessionAction::SetLoading(true));
        let _reset = self
            .state
            .dispatch_on_drop(SessionAction::SetLoading(false));

        match self.api.get_current_user().await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "restored existing session");
                self.state.dispatch(SessionAction::LoginSuccess(user));
            }
            Ok(None) => {}
            Err(error) => warn!(%error, "failed to restore existing session"),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
