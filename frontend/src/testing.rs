//! Host-side stand-ins for the browser collaborators.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::analytics::{Analytics, AnalyticsError, AnalyticsSink, PageContext, Params};
use crate::attribution::{Attribution, CtaElement, TriggerMirror};
use crate::clock::Clock;
use crate::error::SiteError;
use crate::session::SessionFlags;
use crate::waitlist::{WaitlistPayload, WaitlistTransport, WaitlistView};

/// Ordered log shared by fakes that need to prove call order.
pub type Journal = Rc<RefCell<Vec<String>>>;

struct FakeNode {
    tag: String,
    id: RefCell<Option<String>>,
    classes: RefCell<Vec<String>>,
    text: RefCell<Option<String>>,
    value: RefCell<Option<String>>,
    parent: Option<FakeElement>,
}

/// Parent-linked element understanding `tag`, `#id` and `.class` selectors.
#[derive(Clone)]
pub struct FakeElement(Rc<FakeNode>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self::with_parent(tag, None)
    }

    fn with_parent(tag: &str, parent: Option<FakeElement>) -> Self {
        FakeElement(Rc::new(FakeNode {
            tag: tag.to_string(),
            id: RefCell::new(None),
            classes: RefCell::new(Vec::new()),
            text: RefCell::new(None),
            value: RefCell::new(None),
            parent,
        }))
    }

    pub fn child(&self, tag: &str) -> Self {
        Self::with_parent(tag, Some(self.clone()))
    }

    pub fn with_id(self, id: &str) -> Self {
        *self.0.id.borrow_mut() = Some(id.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.0.classes.borrow_mut().push(class.to_string());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        *self.0.text.borrow_mut() = Some(text.to_string());
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        *self.0.value.borrow_mut() = Some(value.to_string());
        self
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.0.id.borrow().as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.0.classes.borrow().iter().any(|c| c == class)
        } else {
            self.0.tag == selector
        }
    }
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl CtaElement for FakeElement {
    fn id(&self) -> Option<String> {
        self.0.id.borrow().clone().filter(|id| !id.is_empty())
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        let mut current = Some(self.clone());
        while let Some(el) = current {
            if el.matches(selector) {
                return Some(el);
            }
            current = el.0.parent.clone();
        }
        None
    }

    fn visible_text(&self) -> Option<String> {
        self.0.text.borrow().clone()
    }

    fn value(&self) -> Option<String> {
        self.0.value.borrow().clone()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<(String, Params)>>,
    attempts: Cell<usize>,
    unavailable: bool,
    journal: Option<Journal>,
}

impl RecordingSink {
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self { journal: Some(journal), ..Self::default() }
    }

    pub fn events(&self) -> Vec<(String, Params)> {
        self.events.borrow().clone()
    }

    pub fn named(&self, event: &str) -> Vec<Params> {
        self.events
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl AnalyticsSink for RecordingSink {
    fn report(&self, event: &str, params: &Params) -> Result<(), AnalyticsError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.unavailable {
            return Err(AnalyticsError::Unavailable);
        }
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(format!("event:{}", event));
        }
        self.events.borrow_mut().push((event.to_string(), params.clone()));
        Ok(())
    }
}

pub struct FixedPage;

impl FixedPage {
    pub const LOCATION: &'static str = "https://breba.app/#pricing";
    pub const TITLE: &'static str = "Breba";
}

impl PageContext for FixedPage {
    fn location(&self) -> String {
        Self::LOCATION.to_string()
    }

    fn title(&self) -> String {
        Self::TITLE.to_string()
    }
}

pub fn analytics_with(sink: Rc<RecordingSink>) -> Analytics {
    Analytics::new(sink, Rc::new(FixedPage))
}

#[derive(Default)]
pub struct MemoryFlags(RefCell<HashMap<String, String>>);

impl SessionFlags for MemoryFlags {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

#[derive(Default)]
pub struct ManualClock(Cell<i64>);

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        ManualClock(Cell::new(ms))
    }

    pub fn advance(&self, ms: i64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.get()
    }
}

#[derive(Default)]
pub struct MemoryMirror {
    value: RefCell<Option<Attribution>>,
    publishes: Cell<usize>,
}

impl MemoryMirror {
    pub fn holding(attribution: Attribution) -> Self {
        Self { value: RefCell::new(Some(attribution)), publishes: Cell::new(0) }
    }

    pub fn publishes(&self) -> usize {
        self.publishes.get()
    }
}

impl TriggerMirror for MemoryMirror {
    fn publish(&self, attribution: &Attribution) {
        self.publishes.set(self.publishes.get() + 1);
        *self.value.borrow_mut() = Some(attribution.clone());
    }

    fn load(&self) -> Option<Attribution> {
        self.value.borrow().clone()
    }
}

pub struct ScriptedTransport {
    fail_with: Option<String>,
    journal: Journal,
    sent: RefCell<Vec<WaitlistPayload>>,
}

impl ScriptedTransport {
    pub fn accepting(journal: Journal) -> Self {
        Self { fail_with: None, journal, sent: RefCell::new(Vec::new()) }
    }

    pub fn rejecting(journal: Journal, reason: &str) -> Self {
        Self { fail_with: Some(reason.to_string()), journal, sent: RefCell::new(Vec::new()) }
    }

    pub fn sent(&self) -> Vec<WaitlistPayload> {
        self.sent.borrow().clone()
    }
}

impl WaitlistTransport for ScriptedTransport {
    async fn send(&self, payload: &WaitlistPayload) -> Result<(), SiteError> {
        self.journal.borrow_mut().push("post".to_string());
        self.sent.borrow_mut().push(payload.clone());
        match &self.fail_with {
            Some(reason) => Err(SiteError::Network(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Records view calls into the shared journal as `view:<call>`.
pub struct RecordingView {
    journal: Journal,
}

impl RecordingView {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }

    fn note(&self, call: &str) {
        self.journal.borrow_mut().push(format!("view:{}", call));
    }
}

impl WaitlistView for RecordingView {
    fn show_busy(&self) {
        self.note("busy");
    }

    fn show_idle(&self) {
        self.note("idle");
    }

    fn show_success(&self) {
        self.note("success");
    }

    fn show_failure(&self, _error: &SiteError) {
        self.note("failure");
    }

    fn reset_form(&self) {
        self.note("reset");
    }

    fn schedule_close(&self, delay_ms: u32) {
        self.note(&format!("close_after:{}", delay_ms));
    }
}
