use std::collections::HashMap;

use async_trait::async_trait;
use shared::{
    domain::{Event, EventId, User, UserId},
    error::ApiException,
    protocol::{
        EventFilters, EventPatch, ForgotPasswordRequest, LoginCredentials, NewEvent,
        RegistrationData,
    },
};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::api::{ApiResult, AuthApi, EventsApi};

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct BackendState {
    accounts: HashMap<String, Account>,
    signed_in: Option<UserId>,
    events: Vec<Event>,
    password_resets: Vec<String>,
}

impl BackendState {
    fn require_user(&self) -> ApiResult<UserId> {
        self.signed_in
            .clone()
            .ok_or_else(|| ApiException::unauthorized("Not authenticated"))
    }

    fn event_mut(&mut self, id: &EventId) -> ApiResult<&mut Event> {
        self.events
            .iter_mut()
            .find(|event| &event.id == id)
            .ok_or_else(|| ApiException::not_found("Event not found"))
    }

    fn owned_event_mut(&mut self, id: &EventId, user_id: &UserId) -> ApiResult<&mut Event> {
        let event = self.event_mut(id)?;
        if event.organizer_id.as_ref() != Some(user_id) {
            return Err(ApiException::forbidden(
                "Only the organizer can modify this event",
            ));
        }
        Ok(event)
    }
}

#[derive(Default)]
pub struct InMemoryBackend {
    state: RwLock<BackendState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<User> {
        let mut state = self.state.write().await;
        insert_account(&mut state, name, email, password)
    }

    pub async fn seed_event(&self, data: &NewEvent, organizer: Option<&UserId>) -> Event {
        let event = build_event(data, organizer.cloned());
        self.state.write().await.events.push(event.clone());
        event
    }

    pub async fn signed_in_user(&self) -> Option<UserId> {
        self.state.read().await.signed_in.clone()
    }

    pub async fn password_reset_requests(&self) -> Vec<String> {
        self.state.read().await.password_resets.clone()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn insert_account(
    state: &mut BackendState,
    name: &str,
    email: &str,
    password: &str,
) -> ApiResult<User> {
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ApiException::validation(
            "Name, email and password are required",
        ));
    }

    let key = normalize_email(email);
    if state.accounts.contains_key(&key) {
        return Err(ApiException::conflict("Email already registered"));
    }

    let user = User::new(Uuid::new_v4().to_string(), name.trim(), key.clone());
    state.accounts.insert(
        key,
        Account {
            user: user.clone(),
            password: password.to_string(),
        },
    );
    Ok(user)
}

fn build_event(data: &NewEvent, organizer_id: Option<UserId>) -> Event {
    Event {
        id: EventId(Uuid::new_v4().to_string()),
        title: data.title.trim().to_string(),
        description: data.description.clone(),
        location: data.location.clone(),
        category: data.category.clone(),
        starts_at: data.starts_at,
        organizer_id,
        attendees: Vec::new(),
        max_attendees: data.max_attendees,
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn get_current_user(&self) -> ApiResult<Option<User>> {
        let state = self.state.read().await;
        let user = state.signed_in.as_ref().and_then(|user_id| {
            state
                .accounts
                .values()
                .find(|account| &account.user.id == user_id)
                .map(|account| account.user.clone())
        });
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> ApiResult<User> {
        let mut state = self.state.write().await;
        let user = state
            .accounts
            .get(&normalize_email(&credentials.email))
            .filter(|account| account.password == credentials.password)
            .map(|account| account.user.clone())
            .ok_or_else(|| ApiException::unauthorized("Invalid email or password"))?;
        state.signed_in = Some(user.id.clone());
        Ok(user)
    }

    async fn register(&self, data: &RegistrationData) -> ApiResult<User> {
        let mut state = self.state.write().await;
        let user = insert_account(&mut state, &data.name, &data.email, &data.password)?;
        state.signed_in = Some(user.id.clone());
        Ok(user)
    }

    async fn logout(&self) -> ApiResult<()> {
        self.state.write().await.signed_in = None;
        Ok(())
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()> {
        let email = normalize_email(&request.email);
        if email.is_empty() {
            return Err(ApiException::validation("Email is required"));
        }
        debug!(%email, "recorded password reset request");
        self.state.write().await.password_resets.push(email);
        Ok(())
    }
}

#[async_trait]
impl EventsApi for InMemoryBackend {
    async fn get_events(&self, filters: Option<&EventFilters>) -> ApiResult<Vec<Event>> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .filter(|event| filters.map_or(true, |filters| filters.matches(event)))
            .cloned()
            .collect())
    }

    async fn get_my_events(&self) -> ApiResult<Vec<Event>> {
        let state = self.state.read().await;
        let user_id = state.require_user()?;
        Ok(state
            .events
            .iter()
            .filter(|event| {
                event.organizer_id.as_ref() == Some(&user_id) || event.has_attendee(&user_id)
            })
            .cloned()
            .collect())
    }

    async fn get_event(&self, id: &EventId) -> ApiResult<Option<Event>> {
        let state = self.state.read().await;
        Ok(state.events.iter().find(|event| &event.id == id).cloned())
    }

    async fn create_event(&self, data: &NewEvent) -> ApiResult<Event> {
        let mut state = self.state.write().await;
        let user_id = state.require_user()?;
        if data.title.trim().is_empty() {
            return Err(ApiException::validation("Title is required"));
        }
        let event = build_event(data, Some(user_id));
        state.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: &EventId, patch: &EventPatch) -> ApiResult<Event> {
        let mut state = self.state.write().await;
        let user_id = state.require_user()?;
        if patch
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(ApiException::validation("Title is required"));
        }
        let event = state.owned_event_mut(id, &user_id)?;
        patch.apply_to(event);
        Ok(event.clone())
    }

    async fn delete_event(&self, id: &EventId) -> ApiResult<()> {
        let mut state = self.state.write().await;
        let user_id = state.require_user()?;
        state.owned_event_mut(id, &user_id)?;
        state.events.retain(|event| &event.id != id);
        Ok(())
    }

    async fn join_event(&self, id: &EventId) -> ApiResult<()> {
        let mut state = self.state.write().await;
        let user_id = state.require_user()?;
        let event = state.event_mut(id)?;
        if event.has_attendee(&user_id) {
            return Err(ApiException::conflict("Already attending"));
        }
        if event.is_full() {
            return Err(ApiException::conflict("Event is full"));
        }
        event.attendees.push(user_id);
        Ok(())
    }

    async fn leave_event(&self, id: &EventId) -> ApiResult<()> {
        let mut state = self.state.write().await;
        let user_id = state.require_user()?;
        let event = state.event_mut(id)?;
        if !event.has_attendee(&user_id) {
            return Err(ApiException::validation("Not attending this event"));
        }
        event.attendees.retain(|attendee| attendee != &user_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod tests;
