use super::*;
use shared::error::ErrorCode;

async fn backend_with_member() -> (InMemoryBackend, User) {
    let backend = InMemoryBackend::new();
    let user = backend
        .add_account("Ada", "Ada@Example.com", "secret")
        .await
        .expect("account");
    (backend, user)
}

async fn sign_in(backend: &InMemoryBackend) -> User {
    backend
        .login(&LoginCredentials::new("ada@example.com", "secret"))
        .await
        .expect("login")
}

#[tokio::test]
async fn login_checks_credentials_and_normalizes_email() {
    let (backend, user) = backend_with_member().await;

    let err = backend
        .login(&LoginCredentials::new("ada@example.com", "wrong"))
        .await
        .expect_err("bad password");
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message, "Invalid email or password");
    assert_eq!(backend.get_current_user().await.expect("current"), None);

    let signed_in = backend
        .login(&LoginCredentials::new("  ADA@example.com ", "secret"))
        .await
        .expect("login");
    assert_eq!(signed_in, user);
    assert_eq!(backend.get_current_user().await.expect("current"), Some(user));
}

#[tokio::test]
async fn register_rejects_duplicates_and_signs_in() {
    let (backend, _) = backend_with_member().await;
    let duplicate = RegistrationData {
        name: "Other".to_string(),
        email: "ada@example.com".to_string(),
        password: "pw".to_string(),
    };

    let err = backend.register(&duplicate).await.expect_err("duplicate");
    assert_eq!(err.code, ErrorCode::Conflict);

    let fresh = RegistrationData {
        email: "grace@example.com".to_string(),
        ..duplicate
    };
    let user = backend.register(&fresh).await.expect("register");
    assert_eq!(backend.signed_in_user().await, Some(user.id));

    let blank = RegistrationData {
        name: " ".to_string(),
        email: "x@example.com".to_string(),
        password: "pw".to_string(),
    };
    let err = backend.register(&blank).await.expect_err("blank name");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn logout_and_forgot_password() {
    let (backend, _) = backend_with_member().await;
    sign_in(&backend).await;

    backend.logout().await.expect("logout");
    assert_eq!(backend.signed_in_user().await, None);

    backend
        .forgot_password(&ForgotPasswordRequest {
            email: "Ada@Example.com".to_string(),
        })
        .await
        .expect("reset");
    let err = backend
        .forgot_password(&ForgotPasswordRequest {
            email: "  ".to_string(),
        })
        .await
        .expect_err("blank email");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(
        backend.password_reset_requests().await,
        vec!["ada@example.com".to_string()]
    );
}

#[tokio::test]
async fn mutations_require_a_session() {
    let (backend, _) = backend_with_member().await;

    let err = backend
        .create_event(&NewEvent::titled("Picnic"))
        .await
        .expect_err("anonymous create");
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message, "Not authenticated");

    let err = backend.get_my_events().await.expect_err("anonymous mine");
    assert_eq!(err.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn events_are_filtered_and_owned_by_creator() {
    let (backend, user) = backend_with_member().await;
    sign_in(&backend).await;
    let music = NewEvent {
        category: Some("Music".to_string()),
        ..NewEvent::titled("Jazz Night")
    };
    let created = backend.create_event(&music).await.expect("create");
    let other = backend
        .seed_event(&NewEvent::titled("Chess Club"), None)
        .await;

    assert_eq!(created.organizer_id, Some(user.id));
    assert_eq!(backend.get_events(None).await.expect("all").len(), 2);
    assert_eq!(
        backend
            .get_events(Some(&EventFilters::by_category("music")))
            .await
            .expect("filtered"),
        vec![created.clone()]
    );
    assert_eq!(
        backend.get_my_events().await.expect("mine"),
        vec![created.clone()]
    );
    assert_eq!(
        backend.get_event(&other.id).await.expect("lookup"),
        Some(other)
    );
    assert_eq!(
        backend
            .get_event(&EventId::from("missing"))
            .await
            .expect("lookup"),
        None
    );

    let err = backend
        .create_event(&NewEvent::titled("   "))
        .await
        .expect_err("blank title");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn only_the_organizer_can_update_or_delete() {
    let (backend, _) = backend_with_member().await;
    let foreign = backend
        .seed_event(&NewEvent::titled("Someone else's"), Some(&UserId::from("other")))
        .await;
    sign_in(&backend).await;
    let own = backend
        .create_event(&NewEvent::titled("Mine"))
        .await
        .expect("create");
    let patch = EventPatch {
        location: Some("Library".to_string()),
        ..EventPatch::default()
    };

    let err = backend
        .update_event(&foreign.id, &patch)
        .await
        .expect_err("foreign update");
    assert_eq!(err.code, ErrorCode::Forbidden);
    let err = backend
        .delete_event(&foreign.id)
        .await
        .expect_err("foreign delete");
    assert_eq!(err.code, ErrorCode::Forbidden);
    let err = backend
        .delete_event(&EventId::from("missing"))
        .await
        .expect_err("missing delete");
    assert_eq!(err.code, ErrorCode::NotFound);

    let updated = backend.update_event(&own.id, &patch).await.expect("update");
    assert_eq!(updated.location.as_deref(), Some("Library"));
    assert_eq!(updated.title, "Mine");

    backend.delete_event(&own.id).await.expect("delete");
    assert_eq!(backend.get_event(&own.id).await.expect("lookup"), None);
}

#[tokio::test]
async fn join_and_leave_track_attendance() {
    let (backend, user) = backend_with_member().await;
    let full = backend
        .seed_event(
            &NewEvent {
                max_attendees: Some(0),
                ..NewEvent::titled("Sold out")
            },
            None,
        )
        .await;
    let open = backend.seed_event(&NewEvent::titled("Open"), None).await;
    sign_in(&backend).await;

    backend.join_event(&open.id).await.expect("join");
    let err = backend.join_event(&open.id).await.expect_err("twice");
    assert_eq!(err.message, "Already attending");
    let err = backend.join_event(&full.id).await.expect_err("full");
    assert_eq!(err.message, "Event is full");

    let joined = backend
        .get_event(&open.id)
        .await
        .expect("lookup")
        .expect("present");
    assert!(joined.has_attendee(&user.id));
    assert_eq!(backend.get_my_events().await.expect("mine"), vec![joined]);

    backend.leave_event(&open.id).await.expect("leave");
    let err = backend.leave_event(&open.id).await.expect_err("not attending");
    assert_eq!(err.message, "Not attending this event");
    assert!(backend.get_my_events().await.expect("mine").is_empty());
}
