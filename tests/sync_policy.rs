use noters_client::session::{CREATE_FAILED_MESSAGE, SubmitOutcome, UPDATE_FAILED_MESSAGE};
use noters_client::store::{FETCH_FAILED_MESSAGE, StoreState};
use noters_client::{
    ClientConfig, HttpNotesApi, NoteError, NoteId, NoteValidationError, NotesApp,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer) -> NotesApp {
    let api = HttpNotesApi::new(&ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    NotesApp::new(Box::new(api))
}

fn note_json(id: u64, title: &str, content: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "content": content,
        "createdAt": "2026-01-05T10:00:00Z"
    })
}

fn ids(app: &NotesApp) -> Vec<String> {
    app.store().notes().iter().map(|n| n.id.to_string()).collect()
}

async fn mount_list_once(server: &MockServer, notes: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(notes))
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_create_refetches_full_list() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([note_json(3, "Older", "<p>x</p>")])).await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .and(body_json(json!({"title": "Groceries", "content": "<p>milk, eggs</p>"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(note_json(4, "Groceries", "<p>milk, eggs</p>")),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_list_once(
        &server,
        json!([
            note_json(4, "Groceries", "<p>milk, eggs</p>"),
            note_json(3, "Older", "<p>x</p>"),
        ]),
    )
    .await;

    let mut app = app(&server);
    assert!(app.sync().await);
    assert_eq!(ids(&app), vec!["3"]);
    let counter = app.store().refresh_counter();

    app.set_title("Groceries");
    app.set_content("<p>milk, eggs</p>");
    let outcome = app.submit().await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Created(n) if n.id == NoteId::from(4)));
    assert_eq!(app.store().refresh_counter(), counter + 1);
    assert_eq!(ids(&app), vec!["4", "3"]);
    assert!(app.session().editing().is_none());
    assert_eq!(app.store().state(), &StoreState::Idle);
}

#[tokio::test]
async fn test_edit_puts_changes_and_resets_form() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([note_json(5, "Old", "<p>A</p>")])).await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/5"))
        .and(body_json(json!({"title": "New", "content": "<p>A</p>"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(5, "New", "<p>A</p>")))
        .expect(1)
        .mount(&server)
        .await;
    mount_list_once(&server, json!([note_json(5, "New", "<p>A</p>")])).await;

    let mut app = app(&server);
    app.sync().await;
    app.start_edit(&NoteId::from(5)).unwrap();
    app.set_title("New");
    let outcome = app.submit().await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Updated(_)));
    assert_eq!(app.store().refresh_counter(), 1);
    assert_eq!(app.session().title(), "");
    assert_eq!(app.session().content(), "");
    assert!(!app.session().is_edit_mode());
    assert_eq!(app.store().notes()[0].title, "New");
}

#[tokio::test]
async fn test_delete_removes_locally_without_refetch() {
    let server = MockServer::start().await;
    // exactly one GET: the initial load
    mount_list_once(
        &server,
        json!([note_json(5, "Keep", "<p>k</p>"), note_json(7, "Drop", "<p>d</p>")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app(&server);
    app.sync().await;
    app.delete(&NoteId::from(7)).await.unwrap();

    assert_eq!(ids(&app), vec!["5"]);
    assert_eq!(app.store().refresh_counter(), 0);
    assert!(!app.sync().await);
}

#[tokio::test]
async fn test_failed_delete_keeps_note() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([note_json(7, "Stay", "<p>s</p>")])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = app(&server);
    app.sync().await;
    let err = app.delete(&NoteId::from(7)).await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(ids(&app), vec!["7"]);
}

#[tokio::test]
async fn test_invalid_submission_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = app(&server);
    app.set_title("");
    app.set_content("<p><br></p>");
    let err = app.submit().await.unwrap_err();

    assert!(matches!(
        err,
        NoteError::Validation(NoteValidationError::TitleEmpty)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(app.store().refresh_counter(), 0);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_list() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([note_json(5, "Visible", "<p>v</p>")])).await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut app = app(&server);
    app.sync().await;
    app.reload().await;

    assert_eq!(
        app.store().state(),
        &StoreState::Error(FETCH_FAILED_MESSAGE.to_string())
    );
    assert_eq!(ids(&app), vec!["5"]);
}

#[tokio::test]
async fn test_failed_update_keeps_form_for_retry() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([note_json(5, "Old", "<p>A</p>")])).await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/5"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app(&server);
    app.sync().await;
    app.start_edit(&NoteId::from(5)).unwrap();
    app.set_title("New");
    let err = app.submit().await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(app.session().error(), Some(UPDATE_FAILED_MESSAGE));
    assert_eq!(app.session().title(), "New");
    assert!(app.session().is_edit_mode());
    assert_eq!(app.store().refresh_counter(), 0);
}

#[tokio::test]
async fn test_search_filters_loaded_notes() {
    let server = MockServer::start().await;
    mount_list_once(
        &server,
        json!([
            note_json(1, "Groceries", "<p>milk, eggs</p>"),
            note_json(2, "Work", "<p>Buy <b>MILK</b> for the office</p>"),
            note_json(3, "Ideas", "<p>robots</p>"),
        ]),
    )
    .await;

    let mut app = app(&server);
    app.sync().await;

    app.set_search("milk");
    let visible: Vec<String> = app.visible_notes().iter().map(|n| n.id.to_string()).collect();
    assert_eq!(visible, vec!["1", "2"]);

    app.clear_search();
    assert_eq!(app.visible_notes().len(), 3);
}

#[tokio::test]
async fn test_editing_unknown_note_fails() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([])).await;

    let mut app = app(&server);
    app.sync().await;
    assert!(matches!(
        app.start_edit(&NoteId::from(99)),
        Err(NoteError::Validation(NoteValidationError::NoteNotFound(_)))
    ));
}

#[tokio::test]
async fn test_delete_clears_stale_form_message() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([note_json(7, "Stay", "<p>s</p>")])).await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/7"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app(&server);
    app.sync().await;
    app.set_title("Draft");
    app.set_content("<p>d</p>");
    app.submit().await.unwrap_err();
    assert_eq!(app.session().error(), Some(CREATE_FAILED_MESSAGE));

    let err = app.delete(&NoteId::from(7)).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(app.session().error(), None);
    // the unsent draft is still there
    assert_eq!(app.session().title(), "Draft");
}

#[tokio::test]
async fn test_saved_note_with_failed_refetch() {
    let server = MockServer::start().await;
    mount_list_once(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(note_json(1, "T", "<p>c</p>")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut app = app(&server);
    app.sync().await;
    app.set_title("T");
    app.set_content("<p>c</p>");
    let outcome = app.submit().await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Created(_)));
    assert_eq!(app.store().error_message(), Some(FETCH_FAILED_MESSAGE));
    assert!(app.store().notes().is_empty());
}
