use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::analytics::{params_of, Analytics};
use crate::attribution::{resolve_label, Attribution, CtaElement, LastTrigger, TriggerMirror};
use crate::config;
use crate::session::SessionFlags;

/// Elements that already carry our listeners. Binding passes may run more
/// than once over the same page; each element is claimed exactly once.
pub struct BindingRegistry<K> {
    bound: RefCell<Vec<K>>,
}

impl<K> Default for BindingRegistry<K> {
    fn default() -> Self {
        Self { bound: RefCell::new(Vec::new()) }
    }
}

impl<K: PartialEq + Clone> BindingRegistry<K> {
    /// True the first time `key` is seen.
    pub fn claim(&self, key: &K) -> bool {
        let mut bound = self.bound.borrow_mut();
        if bound.contains(key) {
            return false;
        }
        bound.push(key.clone());
        true
    }

    /// Runs `bind` for every element not yet claimed; returns how many were new.
    pub fn bind_each<I, F>(&self, elements: I, mut bind: F) -> usize
    where
        I: IntoIterator<Item = K>,
        F: FnMut(&K),
    {
        let mut fresh = 0;
        for element in elements {
            if self.claim(&element) {
                bind(&element);
                fresh += 1;
            }
        }
        fresh
    }

    pub fn len(&self) -> usize {
        self.bound.borrow().len()
    }
}

#[derive(Serialize)]
struct ButtonClick<'a> {
    button_text: String,
    button_area: &'a str,
    /// Resolved `href` property; empty when the element has none.
    button_url: String,
}

/// Attribution for waitlist CTAs and the one-time clicks that feed the
/// session flags.
pub struct CtaTracker {
    analytics: Analytics,
    flags: Rc<dyn SessionFlags>,
    last_trigger: LastTrigger,
    mirror: Rc<dyn TriggerMirror>,
}

impl CtaTracker {
    pub fn new(
        analytics: Analytics,
        flags: Rc<dyn SessionFlags>,
        last_trigger: LastTrigger,
        mirror: Rc<dyn TriggerMirror>,
    ) -> Self {
        Self { analytics, flags, last_trigger, mirror }
    }

    /// A waitlist trigger was clicked. Does not open the modal.
    pub fn on_trigger_click<E: CtaElement>(&self, element: &E, idea: Option<&str>) -> Attribution {
        let attribution = Attribution::for_element(
            element,
            self.flags.watched_demo(),
            self.flags.clicked_login(),
            idea,
        );
        debug!("waitlist trigger in {} clicked", attribution.cta_area);

        self.last_trigger.replace(attribution.clone());
        self.mirror.publish(&attribution);
        self.analytics
            .emit(config::EVENT_TRY_BETA_CLICK, params_of(&attribution));
        attribution
    }

    pub fn on_watch_demo_click<E: CtaElement>(&self, button: &E, url: String) {
        self.analytics.emit(
            config::EVENT_WATCH_DEMO_CLICK,
            params_of(&ButtonClick {
                button_text: resolve_label(Some(button)),
                button_area: "hero",
                button_url: url,
            }),
        );
        self.flags.mark_watched_demo();
    }

    pub fn on_login_click<E: CtaElement>(&self, link: &E, url: String) {
        self.analytics.emit(
            config::EVENT_LOGIN_CLICK,
            params_of(&ButtonClick {
                button_text: resolve_label(Some(link)),
                button_area: "navbar",
                button_url: url,
            }),
        );
        self.flags.mark_clicked_login();
    }
}
