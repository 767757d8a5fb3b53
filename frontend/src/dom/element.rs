use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::attribution::CtaElement;

impl CtaElement for Element {
    fn id(&self) -> Option<String> {
        Some(Element::id(self)).filter(|id| !id.is_empty())
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        Element::closest(self, selector).ok().flatten()
    }

    fn visible_text(&self) -> Option<String> {
        self.dyn_ref::<HtmlElement>().map(HtmlElement::inner_text)
    }

    fn value(&self) -> Option<String> {
        value_of(self)
    }
}

/// `.value` of inputs, textareas, selects and radio groups alike.
pub fn value_of(target: &JsValue) -> Option<String> {
    Reflect::get(target, &JsValue::from_str("value"))
        .ok()
        .and_then(|v| v.as_string())
}

/// Resolved `.href` property: absolute for anchors, empty when absent.
pub fn href_of(target: &JsValue) -> String {
    Reflect::get(target, &JsValue::from_str("href"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn set_hidden(element: &Element, hidden: bool) {
    let classes = element.class_list();
    let _ = if hidden {
        classes.add_1(crate::config::HIDDEN_CLASS)
    } else {
        classes.remove_1(crate::config::HIDDEN_CLASS)
    };
}
