// Integration tests for the rate-limited translator

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use keitai_organizer::translator::{
    Clock, HttpReply, SystemClock, Transport, Translate, Translator, TranslatorSettings,
};

#[derive(Clone)]
struct FakeClock {
    now: Rc<Cell<Instant>>,
    slept: Rc<RefCell<Vec<Duration>>>,
}

impl FakeClock {
    fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
            slept: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }

    fn total_slept(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
        self.advance(duration);
    }
}

#[derive(Clone, Default)]
struct FakeTransport {
    replies: Rc<RefCell<VecDeque<Result<HttpReply>>>>,
    requests: Rc<RefCell<Vec<Vec<(String, String)>>>>,
}

impl FakeTransport {
    fn reply(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(HttpReply {
            status,
            body: body.to_string(),
        }));
    }

    fn fail(&self, message: &str) {
        self.replies.borrow_mut().push_back(Err(anyhow::anyhow!(message.to_string())));
    }
}

impl Transport for FakeTransport {
    fn post_form(&self, fields: &[(&str, &str)]) -> Result<HttpReply> {
        self.requests.borrow_mut().push(
            fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        );
        self.replies.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(HttpReply {
                status: 200,
                body: r#"{"translations":[{"text":"Echo"}]}"#.to_string(),
            })
        })
    }
}

fn settings(interval: Duration) -> TranslatorSettings {
    TranslatorSettings {
        api_key: "test-key".to_string(),
        source_lang: "JA".to_string(),
        target_lang: "EN".to_string(),
        min_interval: interval,
    }
}

#[test]
fn test_successful_translation_sends_form_fields() {
    let transport = FakeTransport::default();
    transport.reply(200, r#"{"translations":[{"detected_source_language":"JA","text":"Game"}]}"#);
    let mut translator = Translator::with_clock(transport.clone(), settings(Duration::from_secs(1)), FakeClock::new());

    assert_eq!(translator.translate("ゲーム"), "Game");

    let requests = transport.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        vec![
            ("auth_key".to_string(), "test-key".to_string()),
            ("text".to_string(), "ゲーム".to_string()),
            ("source_lang".to_string(), "JA".to_string()),
            ("target_lang".to_string(), "EN".to_string()),
        ]
    );
}

#[test]
fn test_server_error_returns_original_text() {
    let transport = FakeTransport::default();
    transport.reply(500, "Internal Server Error");
    let mut translator = Translator::with_clock(transport, settings(Duration::from_secs(1)), FakeClock::new());

    assert_eq!(translator.translate("ゲーム"), "ゲーム");
}

#[test]
fn test_quota_exceeded_returns_original_text() {
    let transport = FakeTransport::default();
    transport.reply(456, r#"{"message":"Quota exceeded"}"#);
    let mut translator = Translator::with_clock(transport, settings(Duration::from_secs(1)), FakeClock::new());

    assert_eq!(translator.translate("パズル"), "パズル");
}

#[test]
fn test_transport_and_body_failures_return_original_text() {
    let transport = FakeTransport::default();
    transport.fail("connection refused");
    transport.reply(200, "not json");
    transport.reply(200, r#"{"translations":[]}"#);
    let mut translator = Translator::with_clock(transport, settings(Duration::from_secs(1)), FakeClock::new());

    assert_eq!(translator.translate("一"), "一");
    assert_eq!(translator.translate("二"), "二");
    assert_eq!(translator.translate("三"), "三");
}

#[test]
fn test_consecutive_calls_are_spaced_by_interval() {
    let clock = FakeClock::new();
    let mut translator = Translator::with_clock(FakeTransport::default(), settings(Duration::from_secs(1)), clock.clone());
    let start = clock.now();

    for _ in 0..4 {
        translator.translate("ゲーム");
    }

    // No wait before the first call, a full interval before each later one.
    assert_eq!(clock.slept.borrow().len(), 3);
    assert_eq!(clock.total_slept(), Duration::from_secs(3));
    assert!(clock.now() - start >= Duration::from_secs(3));
}

#[test]
fn test_time_already_elapsed_counts_toward_interval() {
    let clock = FakeClock::new();
    let mut translator = Translator::with_clock(FakeTransport::default(), settings(Duration::from_secs(1)), clock.clone());

    translator.translate("一");
    clock.advance(Duration::from_millis(400));
    translator.translate("二");
    assert_eq!(clock.total_slept(), Duration::from_millis(600));

    clock.advance(Duration::from_secs(5));
    translator.translate("三");
    assert_eq!(clock.total_slept(), Duration::from_millis(600));
}

#[test]
fn test_failed_calls_still_count_for_rate_limit() {
    let clock = FakeClock::new();
    let transport = FakeTransport::default();
    transport.reply(500, "");
    let mut translator = Translator::with_clock(transport, settings(Duration::from_secs(1)), clock.clone());

    translator.translate("一");
    translator.translate("二");
    assert_eq!(clock.total_slept(), Duration::from_secs(1));
}

#[test]
fn test_real_clock_enforces_interval() {
    let interval = Duration::from_millis(50);
    let mut translator = Translator::with_clock(FakeTransport::default(), settings(interval), SystemClock);

    let start = Instant::now();
    for _ in 0..3 {
        translator.translate("ゲーム");
    }
    assert!(start.elapsed() >= interval * 2);
}
