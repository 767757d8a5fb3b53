use gloo_timers::callback::Timeout;
use log::warn;
use web_sys::{Document, Element, HtmlFormElement};

use crate::config;
use crate::dom::bootstrap::hide_modal;
use crate::dom::element::{set_hidden, value_of};
use crate::error::SiteError;
use crate::waitlist::{WaitlistPayload, WaitlistView};

/// Reads the named controls; missing optional controls become empty strings.
pub fn read_payload(form: &HtmlFormElement) -> WaitlistPayload {
    let field = |name: &str| {
        form.elements()
            .named_item(name)
            .and_then(|control| value_of(&control))
            .unwrap_or_default()
    };

    WaitlistPayload {
        email: field("email"),
        alpha_access: field("alphaAccess"),
        private_cloud: field("privateCloud"),
        comments: field("comments"),
    }
}

/// The waitlist modal's form, alert box and submit button.
pub struct DomWaitlistView {
    form: HtmlFormElement,
    modal: Element,
    alert: Option<Element>,
    spinner: Option<Element>,
    submit_text: Option<Element>,
}

impl DomWaitlistView {
    pub fn new(document: &Document, form: HtmlFormElement, modal: Element) -> Self {
        Self {
            form,
            modal,
            alert: document.get_element_by_id(config::FORM_ALERT_ID),
            spinner: document.get_element_by_id(config::SUBMIT_SPINNER_ID),
            submit_text: document.get_element_by_id(config::SUBMIT_TEXT_ID),
        }
    }

    fn show_alert(&self, class: &str, message: &str) {
        if let Some(alert) = &self.alert {
            alert.set_class_name(class);
            alert.set_text_content(Some(message));
            set_hidden(alert, false);
        }
    }

    fn set_submit_text(&self, text: &str) {
        if let Some(label) = &self.submit_text {
            label.set_text_content(Some(text));
        }
    }
}

impl WaitlistView for DomWaitlistView {
    fn show_busy(&self) {
        if let Some(alert) = &self.alert {
            set_hidden(alert, true);
        }
        if let Some(spinner) = &self.spinner {
            set_hidden(spinner, false);
        }
        self.set_submit_text(config::SUBMIT_TEXT_BUSY);
    }

    fn show_idle(&self) {
        if let Some(spinner) = &self.spinner {
            set_hidden(spinner, true);
        }
        self.set_submit_text(config::SUBMIT_TEXT_IDLE);
    }

    fn show_success(&self) {
        self.show_alert(config::SUCCESS_ALERT_CLASS, config::SUCCESS_MESSAGE);
    }

    fn show_failure(&self, error: &SiteError) {
        self.show_alert(config::FAILURE_ALERT_CLASS, config::FAILURE_MESSAGE);
        gloo_console::error!("Submission failed", error.to_string());
    }

    fn reset_form(&self) {
        self.form.reset();
    }

    fn schedule_close(&self, delay_ms: u32) {
        let modal = self.modal.clone();
        let alert = self.alert.clone();
        Timeout::new(delay_ms, move || {
            if let Err(e) = hide_modal(&modal) {
                warn!("could not close waitlist modal: {}", e);
            }
            if let Some(alert) = alert {
                set_hidden(&alert, true);
            }
        })
        .forget();
    }
}
