use async_trait::async_trait;
use shared::{
    domain::{Event, EventId, User},
    error::ApiException,
    protocol::{
        EventFilters, EventPatch, ForgotPasswordRequest, LoginCredentials, NewEvent,
        RegistrationData,
    },
};

pub type ApiResult<T> = std::result::Result<T, ApiException>;

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn get_current_user(&self) -> ApiResult<Option<User>>;
    async fn login(&self, credentials: &LoginCredentials) -> ApiResult<User>;
    async fn register(&self, data: &RegistrationData) -> ApiResult<User>;
    async fn logout(&self) -> ApiResult<()>;
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()>;
}

#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn get_events(&self, filters: Option<&EventFilters>) -> ApiResult<Vec<Event>>;
    async fn get_my_events(&self) -> ApiResult<Vec<Event>>;
    async fn get_event(&self, id: &EventId) -> ApiResult<Option<Event>>;
    async fn create_event(&self, data: &NewEvent) -> ApiResult<Event>;
    async fn update_event(&self, id: &EventId, patch: &EventPatch) -> ApiResult<Event>;
    async fn delete_event(&self, id: &EventId) -> ApiResult<()>;
    async fn join_event(&self, id: &EventId) -> ApiResult<()>;
    async fn leave_event(&self, id: &EventId) -> ApiResult<()>;
}
