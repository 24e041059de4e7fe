/// Activity view controller behavior against a scripted in-memory backend.
///
/// Covers filter derivation, tab/panel sync, table rendering for every
/// load outcome, start/stop notifications, and out-of-order load handling.
use std::cell::RefCell;
use std::collections::VecDeque;

use actmon::activity::{
    ActivityRecord, DataType, KeyboardRecord, MonitorToggles, MonitoringFilter, MouseRecord,
};
use actmon::api::{ActivityApi, ApiError, CommandAck, DataPayload};
use actmon::controller::{ActivityViewController, ControlOutcome, LoadTicket};
use actmon::notify::{Level, Locale, RecordingNotifier};
use actmon::view::{Row, TableBody};

// ---------------------------------------------------------------------------
// Scripted backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScriptedApi {
    start_replies: RefCell<VecDeque<Result<CommandAck, ApiError>>>,
    stop_replies: RefCell<VecDeque<Result<CommandAck, ApiError>>>,
    data_replies: RefCell<VecDeque<Result<DataPayload, ApiError>>>,
    start_filters: RefCell<Vec<MonitoringFilter>>,
    data_requests: RefCell<Vec<DataType>>,
}

impl ScriptedApi {
    fn with_data(self, reply: Result<DataPayload, ApiError>) -> Self {
        self.data_replies.borrow_mut().push_back(reply);
        self
    }

    fn with_start(self, reply: Result<CommandAck, ApiError>) -> Self {
        self.start_replies.borrow_mut().push_back(reply);
        self
    }

    fn with_stop(self, reply: Result<CommandAck, ApiError>) -> Self {
        self.stop_replies.borrow_mut().push_back(reply);
        self
    }
}

impl ActivityApi for ScriptedApi {
    fn start_monitoring(&self, filter: MonitoringFilter) -> Result<CommandAck, ApiError> {
        self.start_filters.borrow_mut().push(filter);
        self.start_replies
            .borrow_mut()
            .pop_front()
            .expect("unexpected start call")
    }

    fn stop_monitoring(&self) -> Result<CommandAck, ApiError> {
        self.stop_replies
            .borrow_mut()
            .pop_front()
            .expect("unexpected stop call")
    }

    fn monitoring_data(&self, data_type: DataType) -> Result<DataPayload, ApiError> {
        self.data_requests.borrow_mut().push(data_type);
        self.data_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(DataPayload::Empty))
    }
}

fn controller(api: ScriptedApi) -> ActivityViewController<ScriptedApi, RecordingNotifier> {
    ActivityViewController::new(api, RecordingNotifier::default(), Locale::En.messages())
}

fn keyboard(time: &str, key: &str, duration: &str) -> ActivityRecord {
    ActivityRecord::Keyboard(KeyboardRecord {
        time: time.into(),
        key: key.into(),
        duration: duration.into(),
    })
}

fn mouse(time: &str, action: &str, position: &str) -> ActivityRecord {
    ActivityRecord::Mouse(MouseRecord {
        time: time.into(),
        action: action.into(),
        position: position.into(),
    })
}

fn row(a: &str, b: &str, c: &str) -> Row {
    Row {
        cells: [a.into(), b.into(), c.into()],
    }
}

// ---------------------------------------------------------------------------
// Start / stop
// ---------------------------------------------------------------------------

#[test]
fn start_sends_filter_derived_from_toggles() {
    let cases = [
        ((true, false), MonitoringFilter::Mouse),
        ((false, true), MonitoringFilter::Keyboard),
        ((true, true), MonitoringFilter::All),
        ((false, false), MonitoringFilter::All),
    ];

    for ((m, k), expected) in cases {
        let mut c = controller(ScriptedApi::default().with_start(Ok(CommandAck::default())));
        c.start_monitoring(MonitorToggles::new(m, k));
        assert_eq!(*c.api().start_filters.borrow(), vec![expected], "toggles ({m}, {k})");
    }
}

#[test]
fn start_success_notifies_and_refreshes() {
    let api = ScriptedApi::default()
        .with_start(Ok(CommandAck::default()))
        .with_data(Ok(DataPayload::Records(vec![mouse("10:00", "click", "(5, 5)")])));
    let mut c = controller(api);

    let outcome = c.start_monitoring(MonitorToggles::new(true, false));

    assert_eq!(outcome, ControlOutcome::Refreshed);
    let note = c.notifier().last().unwrap();
    assert_eq!(note.level, Level::Info);
    assert_eq!(note.text, "Monitoring started");
    assert_eq!(*c.api().data_requests.borrow(), vec![DataType::Mouse]);
    assert_eq!(
        c.body(DataType::Mouse),
        &TableBody::Rows {
            rows: vec![row("10:00", "click", "(5, 5)")]
        }
    );
}

#[test]
fn start_failure_shows_server_message_without_refresh() {
    let api = ScriptedApi::default().with_start(Err(ApiError::application(Some(
        "already running".into(),
    ))));
    let mut c = controller(api);

    assert_eq!(
        c.start_monitoring(MonitorToggles::default()),
        ControlOutcome::Failed
    );
    assert_eq!(
        c.notifier().last().unwrap().text,
        "Failed to start monitoring: already running"
    );
    assert!(c.api().data_requests.borrow().is_empty());
}

#[test]
fn start_transport_failure_uses_generic_message() {
    let api = ScriptedApi::default().with_start(Err(ApiError::transport("refused")));
    let mut c = controller(api);

    c.start_monitoring(MonitorToggles::new(true, true));
    assert_eq!(
        c.notifier().last().unwrap().text,
        "An error occurred while starting monitoring"
    );
}

#[test]
fn stop_busy_reports_message_and_does_not_refresh() {
    let api = ScriptedApi::default().with_stop(Err(ApiError::application(Some("busy".into()))));
    let mut c = controller(api);

    assert_eq!(c.stop_monitoring(), ControlOutcome::Failed);
    let note = c.notifier().last().unwrap();
    assert_eq!(note.level, Level::Error);
    assert!(note.text.contains("busy"));
    assert!(c.api().data_requests.borrow().is_empty());
}

#[test]
fn stop_failure_without_message_says_unknown_error() {
    let api = ScriptedApi::default().with_stop(Err(ApiError::application(None)));
    let mut c = controller(api);

    c.stop_monitoring();
    assert_eq!(
        c.notifier().last().unwrap().text,
        "Failed to stop monitoring: unknown error"
    );
}

#[test]
fn stop_success_prefers_server_message() {
    let api = ScriptedApi::default()
        .with_stop(Ok(CommandAck {
            message: Some("stopped after 42 events".into()),
        }))
        .with_stop(Ok(CommandAck::default()));
    let mut c = controller(api);

    assert_eq!(c.stop_monitoring(), ControlOutcome::Refreshed);
    assert_eq!(c.notifier().last().unwrap().text, "stopped after 42 events");

    c.stop_monitoring();
    assert_eq!(c.notifier().last().unwrap().text, "Monitoring stopped");
    assert_eq!(c.api().data_requests.borrow().len(), 2);
}

#[test]
fn zh_locale_uses_chinese_messages() {
    let api = ScriptedApi::default().with_stop(Err(ApiError::transport("reset")));
    let mut c = ActivityViewController::new(api, RecordingNotifier::default(), Locale::Zh.messages());

    c.stop_monitoring();
    assert_eq!(c.notifier().last().unwrap().text, "停止监控时发生网络错误");
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[test]
fn select_tab_keeps_exactly_one_active_tab() {
    let mut c = controller(ScriptedApi::default());
    let sequence = [
        DataType::Keyboard,
        DataType::Keyboard,
        DataType::Mouse,
        DataType::Keyboard,
    ];

    for tab in sequence {
        c.select_tab(tab);
        let strip = c.tab_strip();
        assert_eq!(c.active_tab(), tab);
        assert_eq!(strip.active_buttons(), 1);
        assert_eq!(strip.visible_panels(), 1);
    }
}

#[test]
fn select_tab_updates_view_before_load_completes() {
    let mut c = controller(ScriptedApi::default());

    let ticket = c.select_tab(DataType::Keyboard);

    assert_eq!(c.active_tab(), DataType::Keyboard);
    assert_eq!(c.body(DataType::Keyboard), &TableBody::Pending);
    assert!(c.api().data_requests.borrow().is_empty());

    // A failing load leaves the tab selection intact.
    assert!(c.complete_load(ticket, Err(ApiError::transport("timeout"))));
    assert_eq!(c.active_tab(), DataType::Keyboard);
    assert_eq!(c.tab_strip().active_buttons(), 1);
}

#[test]
fn initial_tab_comes_from_builder() {
    let mut c = controller(ScriptedApi::default()).with_initial_tab(DataType::Keyboard);
    c.initialize();
    assert_eq!(*c.api().data_requests.borrow(), vec![DataType::Keyboard]);
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn keyboard_records_render_one_row_each() {
    let api = ScriptedApi::default().with_data(Ok(DataPayload::Records(vec![keyboard(
        "10:00", "A", "50ms",
    )])));
    let mut c = controller(api);

    c.load_activity_data(DataType::Keyboard);

    assert_eq!(
        c.body(DataType::Keyboard),
        &TableBody::Rows {
            rows: vec![row("10:00", "A", "50ms")]
        }
    );
}

#[test]
fn rows_preserve_response_order() {
    let records = vec![
        mouse("10:02", "scroll", "(0, 9)"),
        mouse("10:00", "click", "(1, 1)"),
        mouse("10:01", "move", "(4, 2)"),
    ];
    let api = ScriptedApi::default().with_data(Ok(DataPayload::Records(records)));
    let mut c = controller(api);

    c.load_activity_data(DataType::Mouse);

    let TableBody::Rows { rows } = c.body(DataType::Mouse) else {
        panic!("expected rows");
    };
    let times: Vec<_> = rows.iter().map(|r| r.cells[0].as_str()).collect();
    assert_eq!(times, ["10:02", "10:00", "10:01"]);
}

#[test]
fn every_non_data_outcome_renders_a_single_placeholder() {
    let cases = [
        (Ok(DataPayload::Empty), "no activity data"),
        (Ok(DataPayload::Records(Vec::new())), "no activity data"),
        (
            Ok(DataPayload::Error("monitoring not started".into())),
            "monitoring not started",
        ),
        (
            Err(ApiError::transport("connection refused")),
            "An error occurred while loading data",
        ),
    ];

    for (reply, text) in cases {
        let mut c = controller(ScriptedApi::default().with_data(reply));
        c.load_activity_data(DataType::Keyboard);
        let body = c.body(DataType::Keyboard);
        assert_eq!(body.row_count(), 1, "{text}");
        assert_eq!(body, &TableBody::placeholder(text));
    }
}

#[test]
fn each_load_replaces_previous_content() {
    let api = ScriptedApi::default()
        .with_data(Ok(DataPayload::Records(vec![
            keyboard("1", "a", "1ms"),
            keyboard("2", "b", "2ms"),
        ])))
        .with_data(Ok(DataPayload::Empty));
    let mut c = controller(api);

    c.load_activity_data(DataType::Keyboard);
    assert_eq!(c.body(DataType::Keyboard).row_count(), 2);

    c.load_activity_data(DataType::Keyboard);
    assert_eq!(
        c.body(DataType::Keyboard),
        &TableBody::placeholder("no activity data")
    );
}

#[test]
fn stale_response_cannot_overwrite_newer_one() {
    let mut c = controller(ScriptedApi::default());

    let first = c.select_tab(DataType::Mouse);
    let second = c.select_tab(DataType::Mouse);

    // Newer response arrives first.
    assert!(c.complete_load(
        second,
        Ok(DataPayload::Records(vec![mouse("10:05", "click", "(2, 2)")]))
    ));
    // Older one arrives late and is dropped.
    assert!(!c.complete_load(first, Ok(DataPayload::Empty)));

    assert_eq!(
        c.body(DataType::Mouse),
        &TableBody::Rows {
            rows: vec![row("10:05", "click", "(2, 2)")]
        }
    );
}

#[test]
fn loads_for_different_tabs_do_not_invalidate_each_other() {
    let mut c = controller(ScriptedApi::default());

    let mouse_ticket = c.select_tab(DataType::Mouse);
    let keyboard_ticket = c.select_tab(DataType::Keyboard);

    assert!(c.complete_load(keyboard_ticket, Ok(DataPayload::Empty)));
    assert!(c.complete_load(mouse_ticket, Ok(DataPayload::Empty)));
    assert_eq!(
        keyboard_ticket,
        LoadTicket {
            data_type: DataType::Keyboard,
            generation: 1
        }
    );
}
