use std::sync::Arc;

use serde::Serialize;
use shared::{
    domain::{Event, EventId},
    error::ApiException,
    protocol::{EventFilters, EventPatch, NewEvent},
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    api::EventsApi,
    store::{Action, StateContainer},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventsState {
    pub events: Vec<Event>,
    pub my_events: Vec<Event>,
    pub current_event: Option<Event>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub filters: EventFilters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventsAction {
    FetchEventsStart,
    FetchEventsSuccess(Vec<Event>),
    FetchEventsFailure(String),
    FetchMyEventsSuccess(Vec<Event>),
    SetCurrentEvent(Option<Event>),
    CreateEventSuccess(Event),
    UpdateEventSuccess(Event),
    DeleteEventSuccess(EventId),
    SetFilters(EventFilters),
    ClearError,
    SetLoading(bool),
}

impl Action for EventsAction {
    fn name(&self) -> &'static str {
        match self {
            EventsAction::FetchEventsStart => "fetch_events_start",
            EventsAction::FetchEventsSuccess(_) => "fetch_events_success",
            EventsAction::FetchEventsFailure(_) => "fetch_events_failure",
            EventsAction::FetchMyEventsSuccess(_) => "fetch_my_events_success",
            EventsAction::SetCurrentEvent(_) => "set_current_event",
            EventsAction::CreateEventSuccess(_) => "create_event_success",
            EventsAction::UpdateEventSuccess(_) => "update_event_success",
            EventsAction::DeleteEventSuccess(_) => "delete_event_success",
            EventsAction::SetFilters(_) => "set_filters",
            EventsAction::ClearError => "clear_error",
            EventsAction::SetLoading(_) => "set_loading",
        }
    }
}

pub fn reduce(state: EventsState, action: EventsAction) -> EventsState {
    match action {
        EventsAction::FetchEventsStart => EventsState {
            is_loading: true,
            error: None,
            ..state
        },
        EventsAction::FetchEventsSuccess(events) => EventsState {
            events,
            is_loading: false,
            error: None,
            ..state
        },
        EventsAction::FetchEventsFailure(message) => EventsState {
            is_loading: false,
            error: Some(message),
            ..state
        },
        EventsAction::FetchMyEventsSuccess(my_events) => EventsState { my_events, ..state },
        EventsAction::SetCurrentEvent(current_event) => EventsState {
            current_event,
            ..state
        },
        EventsAction::CreateEventSuccess(event) => {
            let mut state = state;
            state.events.push(event.clone());
            state.my_events.push(event);
            state
        }
        EventsAction::UpdateEventSuccess(event) => {
            let mut state = state;
            replace_by_id(&mut state.events, &event);
            replace_by_id(&mut state.my_events, &event);
            if state
                .current_event
                .as_ref()
                .is_some_and(|current| current.id == event.id)
            {
                state.current_event = Some(event);
            }
            state
        }
        EventsAction::DeleteEventSuccess(id) => {
            let mut state = state;
            state.events.retain(|event| event.id != id);
            state.my_events.retain(|event| event.id != id);
            if state
                .current_event
                .as_ref()
                .is_some_and(|current| current.id == id)
            {
                state.current_event = None;
            }
            state
        }
        EventsAction::SetFilters(filters) => EventsState { filters, ..state },
        EventsAction::ClearError => EventsState {
            error: None,
            ..state
        },
        EventsAction::SetLoading(is_loading) => EventsState { is_loading, ..state },
    }
}

fn replace_by_id(events: &mut [Event], updated: &Event) {
    for event in events.iter_mut().filter(|event| event.id == updated.id) {
        *event = updated.clone();
    }
}

#[derive(Clone)]
pub struct EventsStore {
    api: Arc<dyn EventsApi>,
    state: Arc<StateContainer<EventsState, EventsAction>>,
}

impl EventsStore {
    pub fn new(api: Arc<dyn EventsApi>) -> Self {
        Self {
            api,
            state: Arc::new(StateContainer::new("events", reduce)),
        }
    }

    pub fn snapshot(&self) -> EventsState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<EventsState> {
        self.state.subscribe()
    }

    pub async fn fetch_events(&self, filters: Option<EventFilters>) {
        self.state.dispatch(EventsAction::FetchEventsStart);
        match self.api.get_events(filters.as_ref()).await {
            Ok(events) => {
                debug!(count = events.len(), "fetched events");
                self.state.dispatch(EventsAction::FetchEventsSuccess(events));
            }
            Err(error) => self.fail(&error),
        }
    }

    pub async fn fetch_my_events(&self) {
        match self.api.get_my_events().await {
            Ok(events) => self.state.dispatch(EventsAction::FetchMyEventsSuccess(events)),
            Err(error) => warn!(%error, "failed to refresh my events"),
        }
    }

    pub async fn fetch_event(&self, id: &EventId) {
        self.state.dispatch(EventsAction::SetLoading(true));
        let _reset = self.state.dispatch_on_drop(EventsAction::SetLoading(false));

        match self.api.get_event(id).await {
            Ok(event) => self.state.dispatch(EventsAction::SetCurrentEvent(event)),
            Err(error) => self.fail(&error),
        }
    }

    pub async fn create_event(&self, data: &NewEvent) -> Result<Event, ApiException> {
        self.state.dispatch(EventsAction::SetLoading(true));
        let _reset = self.state.dispatch_on_drop(EventsAction::SetLoading(false));

        let event = self
            .api
            .create_event(data)
            .await
            .inspect_err(|error| self.fail(error))?;
        self.state
            .dispatch(EventsAction::CreateEventSuccess(event.clone()));
        Ok(event)
    }

    pub async fn update_event(
        &self,
        id: &EventId,
        patch: &EventPatch,
    ) -> Result<Event, ApiException> {
        self.state.dispatch(EventsAction::SetLoading(true));
        let _reset = self.state.dispatch_on_drop(EventsAction::SetLoading(false));

        let event = self
            .api
            .update_event(id, patch)
            .await
            .inspect_err(|error| self.fail(error))?;
        self.state
            .dispatch(EventsAction::UpdateEventSuccess(event.clone()));
        Ok(event)
    }

    pub async fn delete_event(&self, id: &EventId) -> Result<(), ApiException> {
        self.api
            .delete_event(id)
            .await
            .inspect_err(|error| self.fail(error))?;
        self.state
            .dispatch(EventsAction::DeleteEventSuccess(id.clone()));
        Ok(())
    }

    pub async fn join_event(&self, id: &EventId) -> Result<(), ApiException> {
        self.api
            .join_event(id)
            .await
            .inspect_err(|error| self.fail(error))?;
        self.refresh_current(id).await
    }

    pub async fn leave_event(&self, id: &EventId) -> Result<(), ApiException> {
        self.api
            .leave_event(id)
            .await
            .inspect_err(|error| self.fail(error))?;
        self.refresh_current(id).await
    }

    pub fn set_filters(&self, filters: EventFilters) {
        self.state.dispatch(EventsAction::SetFilters(filters));
    }

    pub fn clear_error(&self) {
        self.state.dispatch(EventsAction::ClearError);
    }

    async fn refresh_current(&self, id: &EventId) -> Result<(), ApiException> {
        let refreshed = self
            .api
            .get_event(id)
            .await
            .inspect_err(|error| self.fail(error))?;
        if let Some(event) = refreshed {
            self.state
                .dispatch(EventsAction::SetCurrentEvent(Some(event)));
        }
        Ok(())
    }

    fn fail(&self, error: &ApiException) {
        self.state
            .dispatch(EventsAction::FetchEventsFailure(error.message.clone()));
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
