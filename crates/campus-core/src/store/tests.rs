use super::*;
use crate::model::{Event, Registration, RegistrationStatus, Role, User};
use chrono::{Duration, Utc};
use tempfile::TempDir;
use uuid::Uuid;

struct TestContext {
    store: CampusStore,
    _dir: TempDir,
}

async fn create_test_context() -> TestContext {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test_campus.db");
    let store = CampusStore::from_path(&path).await.unwrap();
    TestContext { store, _dir: dir }
}

fn sample_user(email: &str, role: Role) -> User {
    User::new(email, "salt$digest".to_string(), "Test User", role)
}

// Events reference their organizer via a foreign key, so every fixture
// event needs a real user row behind it.
async fn seed_organizer(ctx: &TestContext) -> User {
    let user = sample_user("organizer@campus.edu", Role::Organizer);
    ctx.store.create_user(&user).await.unwrap();
    user
}

fn sample_event(organizer: Uuid) -> Event {
    Event {
        id: Uuid::new_v4(),
        title: "Career Fair".to_string(),
        description: "Annual career fair".to_string(),
        date: Utc::now() + Duration::days(7),
        location: "Main Hall".to_string(),
        max_attendees: 100,
        organizer,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_create_and_get_user() {
    let ctx = create_test_context().await;

    let user = sample_user("alice@campus.edu", Role::Student);
    ctx.store.create_user(&user).await.unwrap();

    let retrieved = ctx.store.get_user(user.id).await.unwrap();
    assert_eq!(retrieved.email, "alice@campus.edu");
    assert_eq!(retrieved.role, Role::Student);
}

#[tokio::test]
async fn test_duplicate_email_rejected_case_insensitively() {
    let ctx = create_test_context().await;

    ctx.store
        .create_user(&sample_user("alice@campus.edu", Role::Student))
        .await
        .unwrap();

    let result = ctx
        .store
        .create_user(&sample_user("Alice@Campus.EDU", Role::Student))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_find_user_by_email_ignores_case() {
    let ctx = create_test_context().await;

    let user = sample_user("bob@campus.edu", Role::Organizer);
    ctx.store.create_user(&user).await.unwrap();

    let found = ctx
        .store
        .find_user_by_email("BOB@Campus.edu")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);

    assert!(ctx
        .store
        .find_user_by_email("nobody@campus.edu")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_event_crud() {
    let ctx = create_test_context().await;

    let organizer = sample_user("org@campus.edu", Role::Organizer);
    ctx.store.create_user(&organizer).await.unwrap();

    let mut event = sample_event(organizer.id);
    ctx.store.create_event(&event).await.unwrap();

    let retrieved = ctx.store.get_event(event.id).await.unwrap();
    assert_eq!(retrieved.title, "Career Fair");
    assert_eq!(retrieved.organizer, organizer.id);

    event.location = "Sports Center".to_string();
    event.max_attendees = 50;
    ctx.store.update_event(&event).await.unwrap();

    let retrieved = ctx.store.get_event(event.id).await.unwrap();
    assert_eq!(retrieved.location, "Sports Center");
    assert_eq!(retrieved.max_attendees, 50);

    ctx.store.delete_event(event.id).await.unwrap();
    assert!(matches!(
        ctx.store.get_event(event.id).await,
        Err(Error::NotFound("event"))
    ));
}

#[tokio::test]
async fn test_create_event_requires_existing_organizer() {
    let ctx = create_test_context().await;

    // No user row for this id; SQLite rejects the insert at the
    // organizer foreign key.
    let result = ctx.store.create_event(&sample_event(Uuid::new_v4())).await;
    assert!(matches!(result, Err(Error::Database(_))));
}

#[tokio::test]
async fn test_update_missing_event_is_not_found() {
    let ctx = create_test_context().await;
    let event = sample_event(Uuid::new_v4());
    assert!(matches!(
        ctx.store.update_event(&event).await,
        Err(Error::NotFound("event"))
    ));
}

#[tokio::test]
async fn test_list_events_in_creation_order() {
    let ctx = create_test_context().await;

    let organizer = sample_user("org@campus.edu", Role::Organizer);
    ctx.store.create_user(&organizer).await.unwrap();

    let mut first = sample_event(organizer.id);
    first.title = "First".to_string();
    first.created_at = Utc::now() - Duration::minutes(10);
    let mut second = sample_event(organizer.id);
    second.title = "Second".to_string();

    ctx.store.create_event(&first).await.unwrap();
    ctx.store.create_event(&second).await.unwrap();

    let events = ctx.store.list_events().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "First");
    assert_eq!(events[1].title, "Second");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let ctx = create_test_context().await;

    let organizer = seed_organizer(&ctx).await;
    let student = sample_user("student@campus.edu", Role::Student);
    ctx.store.create_user(&student).await.unwrap();
    let event = sample_event(organizer.id);
    ctx.store.create_event(&event).await.unwrap();

    ctx.store
        .insert_registration(&Registration::new(event.id, student.id))
        .await
        .unwrap();

    // Second insert for the same (event, user) pair loses to the constraint
    let result = ctx
        .store
        .insert_registration(&Registration::new(event.id, student.id))
        .await;
    assert!(matches!(result, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_approved_count_tracks_status() {
    let ctx = create_test_context().await;

    let organizer = seed_organizer(&ctx).await;
    let event = sample_event(organizer.id);
    ctx.store.create_event(&event).await.unwrap();

    let mut registrations = Vec::new();
    for i in 0..3 {
        let student = sample_user(&format!("s{}@campus.edu", i), Role::Student);
        ctx.store.create_user(&student).await.unwrap();
        let reg = Registration::new(event.id, student.id);
        ctx.store.insert_registration(&reg).await.unwrap();
        registrations.push(reg);
    }

    assert_eq!(ctx.store.approved_count(event.id).await.unwrap(), 0);

    ctx.store
        .set_registration_status(registrations[0].id, RegistrationStatus::Approved)
        .await
        .unwrap();
    ctx.store
        .set_registration_status(registrations[1].id, RegistrationStatus::Rejected)
        .await
        .unwrap();

    assert_eq!(ctx.store.approved_count(event.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_registrations_attaches_registrant() {
    let ctx = create_test_context().await;

    let organizer = seed_organizer(&ctx).await;
    let student = sample_user("carol@campus.edu", Role::Student);
    ctx.store.create_user(&student).await.unwrap();
    let event = sample_event(organizer.id);
    ctx.store.create_event(&event).await.unwrap();

    ctx.store
        .insert_registration(&Registration::new(event.id, student.id))
        .await
        .unwrap();

    let details = ctx.store.list_registrations(event.id).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].user.email, "carol@campus.edu");
    assert_eq!(details[0].registration.status, RegistrationStatus::Pending);
}

#[tokio::test]
async fn test_delete_registrations_for_event() {
    let ctx = create_test_context().await;

    let organizer = seed_organizer(&ctx).await;
    let student = sample_user("dave@campus.edu", Role::Student);
    ctx.store.create_user(&student).await.unwrap();
    let event = sample_event(organizer.id);
    ctx.store.create_event(&event).await.unwrap();
    ctx.store
        .insert_registration(&Registration::new(event.id, student.id))
        .await
        .unwrap();

    let removed = ctx
        .store
        .delete_registrations_for_event(event.id)
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert!(ctx
        .store
        .list_registrations(event.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_list_events_before_cutoff() {
    let ctx = create_test_context().await;

    let organizer = seed_organizer(&ctx).await;
    let mut stale = sample_event(organizer.id);
    stale.date = Utc::now() - Duration::days(2);
    let fresh = sample_event(organizer.id);

    ctx.store.create_event(&stale).await.unwrap();
    ctx.store.create_event(&fresh).await.unwrap();

    let cutoff = Utc::now() - Duration::days(1);
    let expired = ctx.store.list_events_before(cutoff).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].id, stale.id);
}
