use std::rc::Rc;

use js_sys::{Function, Reflect};
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::window;

use crate::config;
use crate::error::describe_js;

pub type Params = Map<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("analytics reporter is not loaded")]
    Unavailable,
    #[error("analytics reporter rejected the event: {0}")]
    Rejected(String),
}

/// The page's global analytics reporter.
pub trait AnalyticsSink {
    fn report(&self, event: &str, params: &Params) -> Result<(), AnalyticsError>;
}

/// Where the visitor currently is; read fresh for every event.
pub trait PageContext {
    fn location(&self) -> String;
    fn title(&self) -> String;
}

#[derive(Clone)]
pub struct Analytics {
    sink: Rc<dyn AnalyticsSink>,
    page: Rc<dyn PageContext>,
}

impl Analytics {
    pub fn new(sink: Rc<dyn AnalyticsSink>, page: Rc<dyn PageContext>) -> Self {
        Self { sink, page }
    }

    /// Fire-and-forget. Page info is added last so callers cannot shadow it.
    /// A missing or failing reporter is logged and otherwise ignored.
    pub fn emit(&self, event: &str, mut params: Params) {
        params.insert("page_location".to_string(), Value::String(self.page.location()));
        params.insert("page_title".to_string(), Value::String(self.page.title()));

        match self.sink.report(event, &params) {
            Ok(()) => debug!("analytics event {}", event),
            Err(err) => debug!("analytics event {} skipped: {}", event, err),
        }
    }
}

/// Flattens a serializable record into event parameters. Non-object values
/// produce no parameters.
pub fn params_of<T: Serialize>(record: &T) -> Params {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Params::new(),
    }
}

/// Reports through `window.gtag("event", name, params)`.
pub struct GtagSink;

impl AnalyticsSink for GtagSink {
    fn report(&self, event: &str, params: &Params) -> Result<(), AnalyticsError> {
        let window = window().ok_or(AnalyticsError::Unavailable)?;
        let gtag = Reflect::get(&window, &JsValue::from_str(config::ANALYTICS_GLOBAL))
            .map_err(|_| AnalyticsError::Unavailable)?;
        let gtag = gtag
            .dyn_ref::<Function>()
            .ok_or(AnalyticsError::Unavailable)?;

        let payload = params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| AnalyticsError::Rejected(e.to_string()))?;

        gtag.call3(
            &JsValue::UNDEFINED,
            &JsValue::from_str("event"),
            &JsValue::from_str(event),
            &payload,
        )
        .map(|_| ())
        .map_err(|e| AnalyticsError::Rejected(describe_js(&e)))
    }
}

pub struct DocumentPage;

impl PageContext for DocumentPage {
    fn location(&self) -> String {
        window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn title(&self) -> String {
        window()
            .and_then(|w| w.document())
            .map(|d| d.title())
            .unwrap_or_default()
    }
}
