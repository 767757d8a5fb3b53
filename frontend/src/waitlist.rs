use std::rc::Rc;

use gloo_net::http::Request;
use log::info;
use serde::Serialize;
use serde_json::Value;
use web_sys::RequestMode;

use crate::analytics::{Analytics, Params};
use crate::config;
use crate::error::SiteError;
use crate::session::{yes_no, SessionFlags};

/// Body posted to the collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistPayload {
    pub email: String,
    pub alpha_access: String,
    pub private_cloud: String,
    pub comments: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Recorded,
    Failed,
}

#[allow(async_fn_in_trait)]
pub trait WaitlistTransport {
    /// The response is opaque; `Ok` only means the request left the browser.
    async fn send(&self, payload: &WaitlistPayload) -> Result<(), SiteError>;
}

/// The parts of the modal the submission flow drives.
pub trait WaitlistView {
    fn show_busy(&self);
    fn show_idle(&self);
    fn show_success(&self);
    fn show_failure(&self, error: &SiteError);
    fn reset_form(&self);
    fn schedule_close(&self, delay_ms: u32);
}

pub struct SubmissionFlow {
    analytics: Analytics,
    flags: Rc<dyn SessionFlags>,
}

impl SubmissionFlow {
    pub fn new(analytics: Analytics, flags: Rc<dyn SessionFlags>) -> Self {
        Self { analytics, flags }
    }

    /// Intent to submit, whether or not the form turns out valid.
    pub fn on_submit_click(&self, button_text: String) {
        let mut params = Params::new();
        params.insert("button_text".into(), Value::String(button_text));
        params.insert("button_area".into(), config::WAITLIST_AREA.into());
        params.insert("watched_demo_before".into(), yes_no(self.flags.watched_demo()).into());
        params.insert("clicked_login_before".into(), yes_no(self.flags.clicked_login()).into());
        self.analytics.emit(config::EVENT_SUBMIT_CLICK, params);
    }

    /// Tracks the submit, then posts once. No retry: a failure leaves the
    /// modal open for the visitor to try again.
    pub async fn submit<T, V>(
        &self,
        payload: WaitlistPayload,
        transport: &T,
        view: &V,
    ) -> SubmitOutcome
    where
        T: WaitlistTransport,
        V: WaitlistView,
    {
        let mut params = Params::new();
        params.insert("source_area".into(), config::WAITLIST_AREA.into());
        params.insert("watched_demo_before".into(), yes_no(self.flags.watched_demo()).into());
        self.analytics.emit(config::EVENT_SUBMIT_COMPLETED, params);

        view.show_busy();
        let outcome = match transport.send(&payload).await {
            Ok(()) => {
                info!("waitlist submission sent");
                view.reset_form();
                view.show_success();
                view.schedule_close(config::AUTO_CLOSE_DELAY_MS);
                SubmitOutcome::Recorded
            }
            Err(err) => {
                view.show_failure(&err);
                SubmitOutcome::Failed
            }
        };
        view.show_idle();
        outcome
    }
}

/// `no-cors` POST; the endpoint does not send CORS headers.
pub struct FetchTransport {
    endpoint: String,
}

impl FetchTransport {
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: endpoint.to_string() }
    }
}

impl WaitlistTransport for FetchTransport {
    async fn send(&self, payload: &WaitlistPayload) -> Result<(), SiteError> {
        Request::post(&self.endpoint)
            .mode(RequestMode::NoCors)
            .json(payload)?
            .send()
            .await?;
        Ok(())
    }
}
