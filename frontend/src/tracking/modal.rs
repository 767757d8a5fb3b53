use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::analytics::{params_of, Analytics};
use crate::attribution::{LastTrigger, TriggerMirror};
use crate::clock::Clock;
use crate::config;

/// How the visitor dismissed the waitlist modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    CloseButton,
    BackdropClick,
    EscKey,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalClose {
    pub close_reason: CloseReason,
    /// `None` when the modal was never seen opening.
    pub time_open_ms: Option<i64>,
}

/// One open/close cycle. Reset on every open and after every close.
#[derive(Debug, Default)]
pub struct ModalSession {
    shown_at: Option<i64>,
    close_reason: CloseReason,
}

impl ModalSession {
    pub fn open(&mut self, now_ms: i64) {
        self.shown_at = Some(now_ms);
        self.close_reason = CloseReason::Unknown;
    }

    /// Last gesture before `hidden` wins.
    pub fn note_gesture(&mut self, reason: CloseReason) {
        self.close_reason = reason;
    }

    pub fn close(&mut self, now_ms: i64) -> ModalClose {
        let summary = ModalClose {
            close_reason: self.close_reason,
            time_open_ms: self.shown_at.map(|shown| (now_ms - shown).max(0)),
        };
        *self = ModalSession::default();
        summary
    }
}

/// Lifecycle analytics for the waitlist modal.
pub struct ModalTracker {
    session: RefCell<ModalSession>,
    analytics: Analytics,
    clock: Rc<dyn Clock>,
    last_trigger: LastTrigger,
    mirror: Rc<dyn TriggerMirror>,
}

impl ModalTracker {
    pub fn new(
        analytics: Analytics,
        clock: Rc<dyn Clock>,
        last_trigger: LastTrigger,
        mirror: Rc<dyn TriggerMirror>,
    ) -> Self {
        Self {
            session: RefCell::new(ModalSession::default()),
            analytics,
            clock,
            last_trigger,
            mirror,
        }
    }

    pub fn on_shown(&self) {
        self.last_trigger.refresh_from(self.mirror.load());
        self.session.borrow_mut().open(self.clock.now_ms());
        self.analytics
            .emit(config::EVENT_MODAL_OPEN, self.last_trigger.params());
    }

    pub fn on_close_button(&self) {
        self.session.borrow_mut().note_gesture(CloseReason::CloseButton);
    }

    /// Mousedown anywhere in the modal; only the backdrop itself counts.
    pub fn on_mousedown(&self, on_backdrop: bool) {
        if on_backdrop {
            self.session.borrow_mut().note_gesture(CloseReason::BackdropClick);
        }
    }

    pub fn on_keydown(&self, key: &str, modal_visible: bool) {
        if key == "Escape" && modal_visible {
            self.session.borrow_mut().note_gesture(CloseReason::EscKey);
        }
    }

    pub fn on_hidden(&self) {
        let summary = self.session.borrow_mut().close(self.clock.now_ms());
        let mut params = params_of(&summary);
        params.extend(self.last_trigger.params());
        self.analytics.emit(config::EVENT_MODAL_CLOSE, params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::{Attribution, CtaArea};
    use crate::testing::{analytics_with, ManualClock, MemoryMirror, RecordingSink};

    fn attribution(text: &str) -> Attribution {
        Attribution {
            cta_text: text.to_string(),
            cta_area: CtaArea::Pricing,
            cta_id: None,
            watched_demo_before: false,
            clicked_login_before: true,
            cta_idea: None,
        }
    }

    fn tracker(
        sink: &Rc<RecordingSink>,
        clock: &Rc<ManualClock>,
        last_trigger: &LastTrigger,
        mirror: MemoryMirror,
    ) -> ModalTracker {
        ModalTracker::new(
            analytics_with(sink.clone()),
            clock.clone(),
            last_trigger.clone(),
            Rc::new(mirror),
        )
    }

    #[test]
    fn escape_close_reports_reason_and_duration() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::at(1_700_000_000_000));
        let last = LastTrigger::default();
        last.replace(attribution("Start free"));
        let modal = tracker(&sink, &clock, &last, MemoryMirror::default());

        modal.on_shown();
        clock.advance(4_250);
        modal.on_keydown("Escape", true);
        modal.on_hidden();

        let closes = sink.named("waitlist_modal_close");
        assert_eq!(closes.len(), 1);
        assert_eq!(closes[0]["close_reason"], "esc_key");
        assert_eq!(closes[0]["time_open_ms"], 4_250);
        assert_eq!(closes[0]["cta_text"], "Start free");
        assert_eq!(closes[0]["cta_area"], "pricing");
    }

    #[test]
    fn hidden_without_shown_reports_unknown_and_null() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::at(5_000));
        let modal = tracker(&sink, &clock, &LastTrigger::default(), MemoryMirror::default());

        modal.on_hidden();

        let close = &sink.named("waitlist_modal_close")[0];
        assert_eq!(close["close_reason"], "unknown");
        assert!(close["time_open_ms"].is_null());
        assert!(close.get("cta_text").is_none());
    }

    #[test]
    fn escape_is_ignored_while_modal_is_not_visible() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::default());
        let modal = tracker(&sink, &clock, &LastTrigger::default(), MemoryMirror::default());

        modal.on_shown();
        modal.on_keydown("Escape", false);
        modal.on_keydown("Enter", true);
        modal.on_hidden();

        assert_eq!(sink.named("waitlist_modal_close")[0]["close_reason"], "unknown");
    }

    #[test]
    fn only_backdrop_mousedowns_count() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::default());
        let modal = tracker(&sink, &clock, &LastTrigger::default(), MemoryMirror::default());

        modal.on_shown();
        modal.on_mousedown(false);
        modal.on_hidden();
        modal.on_shown();
        modal.on_mousedown(true);
        modal.on_hidden();

        let closes = sink.named("waitlist_modal_close");
        assert_eq!(closes[0]["close_reason"], "unknown");
        assert_eq!(closes[1]["close_reason"], "backdrop_click");
    }

    #[test]
    fn last_gesture_before_hide_wins() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::default());
        let modal = tracker(&sink, &clock, &LastTrigger::default(), MemoryMirror::default());

        modal.on_shown();
        modal.on_keydown("Escape", true);
        modal.on_close_button();
        modal.on_hidden();

        assert_eq!(sink.named("waitlist_modal_close")[0]["close_reason"], "close_button");
    }

    #[test]
    fn reopening_resets_reason_and_keeps_attribution() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::at(10));
        let last = LastTrigger::default();
        last.replace(attribution("Try Beta"));
        let modal = tracker(&sink, &clock, &last, MemoryMirror::default());

        modal.on_shown();
        modal.on_close_button();
        modal.on_hidden();

        modal.on_shown();
        clock.advance(30);
        modal.on_hidden();

        let opens = sink.named("waitlist_modal_open");
        let closes = sink.named("waitlist_modal_close");
        assert_eq!(opens.len(), 2);
        assert_eq!(opens[1]["cta_text"], "Try Beta");
        assert_eq!(closes[1]["close_reason"], "unknown");
        assert_eq!(closes[1]["time_open_ms"], 30);
        assert_eq!(closes[1]["cta_text"], "Try Beta");
    }

    #[test]
    fn open_prefers_mirrored_trigger() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::default());
        let last = LastTrigger::default();
        last.replace(attribution("Local"));
        let modal = tracker(&sink, &clock, &last, MemoryMirror::holding(attribution("Mirrored")));

        modal.on_shown();

        assert_eq!(sink.named("waitlist_modal_open")[0]["cta_text"], "Mirrored");
        assert_eq!(last.current().unwrap().cta_text, "Mirrored");
    }

    #[test]
    fn open_without_any_trigger_has_only_page_info() {
        let sink = Rc::new(RecordingSink::default());
        let clock = Rc::new(ManualClock::default());
        let modal = tracker(&sink, &clock, &LastTrigger::default(), MemoryMirror::default());

        modal.on_shown();

        let open = &sink.named("waitlist_modal_open")[0];
        assert_eq!(open.len(), 2);
        assert!(open.contains_key("page_location"));
        assert!(open.contains_key("page_title"));
    }

    #[test]
    fn clock_going_backwards_never_reports_negative_time() {
        let mut session = ModalSession::default();
        session.open(2_000);
        let summary = session.close(1_500);
        assert_eq!(summary.time_open_ms, Some(0));
    }
}
