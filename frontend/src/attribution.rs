use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use js_sys::Reflect;
use log::debug;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::window;

use crate::analytics::{params_of, Params};
use crate::config;
use crate::error::describe_js;

pub const NO_TEXT: &str = "(no text)";

/// The slice of a DOM element the resolver needs.
pub trait CtaElement: Sized {
    /// Element id, `None` when empty.
    fn id(&self) -> Option<String>;
    /// Nearest inclusive ancestor matching a CSS selector.
    fn closest(&self, selector: &str) -> Option<Self>;
    fn visible_text(&self) -> Option<String>;
    /// Form value, for inputs and buttons that carry one.
    fn value(&self) -> Option<String>;
}

/// Which part of the page a CTA lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CtaArea {
    AiAppBuilder,
    Navbar,
    Hero,
    Pricing,
    /// Id of the nearest enclosing `<section>`.
    Section(String),
    Other,
    Unknown,
}

impl CtaArea {
    pub fn as_str(&self) -> &str {
        match self {
            CtaArea::AiAppBuilder => "ai_app_builder",
            CtaArea::Navbar => "navbar",
            CtaArea::Hero => "hero",
            CtaArea::Pricing => "pricing",
            CtaArea::Section(id) => id,
            CtaArea::Other => "other",
            CtaArea::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CtaArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CtaArea {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "ai_app_builder" => CtaArea::AiAppBuilder,
            "navbar" => CtaArea::Navbar,
            "hero" => CtaArea::Hero,
            "pricing" => CtaArea::Pricing,
            "other" => CtaArea::Other,
            "unknown" => CtaArea::Unknown,
            _ => CtaArea::Section(tag),
        }
    }
}

impl From<CtaArea> for String {
    fn from(area: CtaArea) -> Self {
        area.as_str().to_string()
    }
}

/// First match wins: build-app trigger, navbar, hero, pricing, then the
/// enclosing section's id.
pub fn resolve_area<E: CtaElement>(element: Option<&E>) -> CtaArea {
    let Some(el) = element else {
        return CtaArea::Unknown;
    };

    let build_app_selector = format!("#{}", config::BUILD_APP_BUTTON_ID);
    if el.id().as_deref() == Some(config::BUILD_APP_BUTTON_ID)
        || el.closest(&build_app_selector).is_some()
    {
        return CtaArea::AiAppBuilder;
    }
    if el.closest("nav").is_some() {
        return CtaArea::Navbar;
    }
    if el.closest(&format!("#{}", config::HERO_SECTION_ID)).is_some() {
        return CtaArea::Hero;
    }
    if el.closest(".pricing").is_some() {
        return CtaArea::Pricing;
    }

    el.closest("section")
        .and_then(|section| section.id())
        .map(CtaArea::Section)
        .unwrap_or(CtaArea::Other)
}

/// Trimmed visible text, else trimmed form value, else [`NO_TEXT`].
pub fn resolve_label<E: CtaElement>(element: Option<&E>) -> String {
    let non_empty = |s: Option<String>| {
        s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };

    element
        .and_then(|el| non_empty(el.visible_text()).or_else(|| non_empty(el.value())))
        .unwrap_or_else(|| NO_TEXT.to_string())
}

/// Which CTA opened the waitlist, plus what the visitor had done before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub cta_text: String,
    pub cta_area: CtaArea,
    pub cta_id: Option<String>,
    #[serde(with = "yes_no_flag")]
    pub watched_demo_before: bool,
    #[serde(with = "yes_no_flag")]
    pub clicked_login_before: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_idea: Option<String>,
}

impl Attribution {
    pub fn for_element<E: CtaElement>(
        element: &E,
        watched_demo: bool,
        clicked_login: bool,
        idea: Option<&str>,
    ) -> Self {
        Self {
            cta_text: resolve_label(Some(element)),
            cta_area: resolve_area(Some(element)),
            cta_id: element.id(),
            watched_demo_before: watched_demo,
            clicked_login_before: clicked_login,
            cta_idea: idea.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }
}

mod yes_no_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::session::yes_no;

    pub fn serialize<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(yes_no(*flag))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(String::deserialize(deserializer)? == "yes")
    }
}

/// The most recent waitlist attribution. Overwritten on every trigger click,
/// read (never cleared) when the modal opens or closes.
#[derive(Clone, Default)]
pub struct LastTrigger(Rc<RefCell<Option<Attribution>>>);

impl LastTrigger {
    pub fn replace(&self, attribution: Attribution) {
        *self.0.borrow_mut() = Some(attribution);
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<Attribution> {
        self.0.borrow().clone()
    }

    /// Prefers a value published by another script; keeps ours otherwise.
    pub fn refresh_from(&self, external: Option<Attribution>) {
        if let Some(external) = external {
            self.replace(external);
        }
    }

    /// Event parameters for the stored attribution; empty if none.
    pub fn params(&self) -> Params {
        self.0.borrow().as_ref().map(params_of).unwrap_or_default()
    }
}

/// Page-global copy of the last trigger shared with other scripts.
pub trait TriggerMirror {
    fn publish(&self, attribution: &Attribution);
    fn load(&self) -> Option<Attribution>;
}

/// Mirrors to `window.lastWaitlistTrigger`.
pub struct WindowMirror;

impl TriggerMirror for WindowMirror {
    fn publish(&self, attribution: &Attribution) {
        let Some(window) = window() else { return };
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let value = match attribution.serialize(&serializer) {
            Ok(value) => value,
            Err(e) => {
                debug!("could not mirror last trigger: {}", e);
                return;
            }
        };
        let key = JsValue::from_str(config::LAST_TRIGGER_GLOBAL);
        if let Err(e) = Reflect::set(&window, &key, &value) {
            debug!("could not mirror last trigger: {}", describe_js(&e));
        }
    }

    fn load(&self) -> Option<Attribution> {
        let window = window()?;
        let value = Reflect::get(&window, &JsValue::from_str(config::LAST_TRIGGER_GLOBAL)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        serde_wasm_bindgen::from_value(value).ok()
    }
}
