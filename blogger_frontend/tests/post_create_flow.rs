//! Drives the post-creation controller against a mock HTTP backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use blogger_frontend::api::{ApiClient, TransportError};
use blogger_frontend::config::FrontendConfig;
use blogger_frontend::controller::{
    DetachedOutcomes, FormServices, Phase, PostCreateController, SubmitOutcome, CREATE_FAILED_NOTICE,
    REDIRECT_DELAY, SUBMITTED_NOTICE,
};
use blogger_frontend::models::Post;
use blogger_frontend::notify::{NoticeKind, Notifier};
use blogger_frontend::route::{Navigator, Route};
use blogger_frontend::runtime::{Clock, Task, TaskRunner};
use httpmock::MockServer;
use serde_json::json;

/// Runs tasks on the calling thread so outcomes are queued before `poll`.
struct InlineRunner;

impl TaskRunner for InlineRunner {
    fn spawn(&self, task: Task) {
        task();
    }
}

#[derive(Clone, Default)]
struct Recorder {
    notices: Rc<RefCell<Vec<(NoticeKind, String)>>>,
    routes: Rc<RefCell<Vec<Route>>>,
}

impl Notifier for Recorder {
    fn show(&self, kind: NoticeKind, message: &str) {
        self.notices.borrow_mut().push((kind, message.to_string()));
    }
}

impl Navigator for Recorder {
    fn navigate(&self, route: Route) {
        self.routes.borrow_mut().push(route);
    }
}

/// Outcomes that outlived the form, recorded as success flags.
#[derive(Default)]
struct LateResults(Mutex<Vec<bool>>);

impl DetachedOutcomes for LateResults {
    fn post_created(&self, result: Result<Post, TransportError>) {
        self.0.lock().unwrap().push(result.is_ok());
    }
}

#[derive(Clone)]
struct ManualClock {
    start: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }
}

fn controller(
    server: &MockServer,
    recorder: &Recorder,
    clock: &ManualClock,
    late: &Arc<LateResults>,
) -> PostCreateController {
    let config = FrontendConfig::default()
        .with_api_url(&server.base_url())
        .expect("config");
    let api = Arc::new(ApiClient::new(&config).expect("client"));
    let mut controller = PostCreateController::new(FormServices {
        posts: api.clone(),
        categories: api,
        notifier: Box::new(recorder.clone()),
        navigator: Box::new(recorder.clone()),
        clock: Box::new(clock.clone()),
        runner: Box::new(InlineRunner),
        detached: late.clone(),
    });
    controller.poll();
    controller
}

fn mock_categories(server: &MockServer) {
    server.mock(|when, then| {
        when.method("GET").path("/v1/categories");
        then.status(200).json_body(json!([
            {"id": "cat-1", "name": "Rust"},
            {"id": "cat-2", "name": "Travel"}
        ]));
    });
}

fn fill(controller: &mut PostCreateController) {
    let form = controller.form_mut();
    form.set_title("My First Post");
    form.set_category_id("cat-1");
    form.set_content("Hello world");
}

#[test]
fn publishes_and_redirects_home() {
    let server = MockServer::start();
    mock_categories(&server);
    let create = server.mock(|when, then| {
        when.method("POST").path("/v1/posts").json_body(json!({
            "title": "My First Post",
            "content": "Hello world",
            "categoryId": "cat-1"
        }));
        then.status(201).json_body(json!({
            "id": "p-1",
            "title": "My First Post",
            "content": "Hello world",
            "categoryId": "cat-1"
        }));
    });

    let recorder = Recorder::default();
    let clock = ManualClock {
        start: Instant::now(),
        offset: Rc::new(Cell::new(Duration::ZERO)),
    };
    let late = Arc::new(LateResults::default());
    let mut controller = controller(&server, &recorder, &clock, &late);
    assert_eq!(controller.categories().len(), 2);

    fill(&mut controller);
    assert_eq!(controller.submit(), SubmitOutcome::Sent);
    controller.poll();

    create.assert();
    assert_eq!(controller.phase(), Phase::Succeeded);
    assert_eq!(
        controller.created_post().map(|p| p.id.as_str()),
        Some("p-1")
    );
    assert_eq!(
        recorder.notices.borrow().as_slice(),
        &[(NoticeKind::Success, SUBMITTED_NOTICE.to_string())]
    );

    clock.offset.set(REDIRECT_DELAY);
    controller.poll();
    assert_eq!(recorder.routes.borrow().as_slice(), &[Route::Home]);

    drop(controller);
    assert!(late.0.lock().unwrap().is_empty());
}

#[test]
fn server_error_keeps_the_form_open() {
    let server = MockServer::start();
    mock_categories(&server);
    let create = server.mock(|when, then| {
        when.method("POST").path("/v1/posts");
        then.status(500).body("database unavailable");
    });

    let recorder = Recorder::default();
    let clock = ManualClock {
        start: Instant::now(),
        offset: Rc::new(Cell::new(Duration::ZERO)),
    };
    let late = Arc::new(LateResults::default());
    let mut controller = controller(&server, &recorder, &clock, &late);
    fill(&mut controller);
    controller.submit();
    controller.poll();

    create.assert();
    assert!(!controller.is_submitting());
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(
        recorder.notices.borrow().as_slice(),
        &[(NoticeKind::Error, CREATE_FAILED_NOTICE.to_string())]
    );

    clock.offset.set(Duration::from_secs(5));
    controller.poll();
    assert!(recorder.routes.borrow().is_empty());
}
