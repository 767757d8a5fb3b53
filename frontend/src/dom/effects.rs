//! Cosmetic behaviour: menus, FAQ, scrolling, animations. Nothing here
//! reports analytics.

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use js_sys::Array;
use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollToOptions,
};

use crate::config;
use crate::dom::element::{query, query_all};
use crate::dom::listen::listen;
use crate::error::{describe_js, SiteError};

const ACTIVE_CLASS: &str = "active";

pub fn wire_all(document: &Document) -> Result<(), SiteError> {
    wire_nav(document)?;
    wire_faq(document)?;
    wire_smooth_scroll(document)?;
    wire_scroll_animations(document)?;
    wire_parallax(document)?;
    wire_loaded_class(document)?;
    wire_card_hover(document)?;
    wire_copy_buttons(document)?;
    start_typing(document);
    Ok(())
}

/// Iframe source for a demo trigger.
pub fn demo_video_url(configured: Option<String>) -> String {
    configured
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| config::DEFAULT_DEMO_VIDEO_URL.to_string())
}

/// Accordion with at most one open item. Clicking the open item closes it.
pub fn next_open_item(open: Option<usize>, clicked: usize) -> Option<usize> {
    if open == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

/// Scroll position that leaves the section below the fixed navbar.
pub fn scroll_target(offset_top: i32) -> f64 {
    f64::from(offset_top) - config::NAVBAR_OFFSET_PX
}

pub fn parallax_offset(scroll_y: f64) -> f64 {
    scroll_y * config::PARALLAX_RATE
}

/// First `count` characters of `text`, on char boundaries.
pub fn typed_prefix(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// What a copy button puts on the clipboard: the text of the element just
/// before it. Only buttons labelled "Copy" take part, so a button showing its
/// "Copied!" feedback ignores clicks.
pub fn clipboard_text(button_text: &str, sibling_text: Option<String>) -> Option<String> {
    if button_text.contains(config::COPY_LABEL) {
        sibling_text
    } else {
        None
    }
}

fn html(element: &Element) -> Option<&HtmlElement> {
    element.dyn_ref::<HtmlElement>()
}

fn wire_nav(document: &Document) -> Result<(), SiteError> {
    let menu = query(document, config::NAV_MENU_SELECTOR);
    let actions = query(document, config::NAV_ACTIONS_SELECTOR);
    let panels: Vec<Element> = menu.into_iter().chain(actions).collect();
    if panels.is_empty() {
        return Ok(());
    }

    for link in query_all(document, config::NAV_LINK_SELECTOR) {
        let panels = panels.clone();
        listen(&link, "click", false, move |_| {
            for panel in &panels {
                let _ = panel.class_list().remove_1(ACTIVE_CLASS);
            }
        })?;
    }

    // only some page variants ship the hamburger button
    if let Some(hamburger) = query(document, config::HAMBURGER_SELECTOR) {
        listen(&hamburger, "click", false, move |_| {
            for panel in &panels {
                let _ = panel.class_list().toggle(ACTIVE_CLASS);
            }
        })?;
    }
    Ok(())
}

fn wire_faq(document: &Document) -> Result<(), SiteError> {
    let questions = query_all(document, config::FAQ_QUESTION_SELECTOR);

    for (index, question) in questions.iter().enumerate() {
        let all = questions.clone();
        listen(question, "click", false, move |_| {
            let open = all.iter().position(|q| {
                q.parent_element()
                    .map_or(false, |item| item.class_list().contains(ACTIVE_CLASS))
            });
            let next = next_open_item(open, index);
            for (i, q) in all.iter().enumerate() {
                set_faq_item(q, next == Some(i));
            }
        })?;
    }
    Ok(())
}

fn set_faq_item(question: &Element, open: bool) {
    let Some(item) = question.parent_element() else { return };
    let answer = item.query_selector(".faq-answer").ok().flatten();
    let icon = question.query_selector("i").ok().flatten();

    if let Some(answer) = answer.as_ref().and_then(html) {
        let style = answer.style();
        let _ = if open {
            style.set_property("max-height", &format!("{}px", answer.scroll_height()))
        } else {
            style.remove_property("max-height").map(|_| ())
        };
    }
    if let Some(icon) = icon.as_ref().and_then(html) {
        let angle = if open { "rotate(180deg)" } else { "rotate(0deg)" };
        let _ = icon.style().set_property("transform", angle);
    }
    let _ = if open {
        item.class_list().add_1(ACTIVE_CLASS)
    } else {
        item.class_list().remove_1(ACTIVE_CLASS)
    };
}

fn wire_smooth_scroll(document: &Document) -> Result<(), SiteError> {
    for link in query_all(document, config::ANCHOR_LINK_SELECTOR) {
        let doc = document.clone();
        let anchor = link.clone();
        listen(&link, "click", false, move |event| {
            event.prevent_default();
            let Some(href) = anchor.get_attribute("href") else { return };
            let Some(section) = query(&doc, &href) else { return };
            let Some(section) = html(&section) else { return };

            let options = ScrollToOptions::new();
            options.set_top(scroll_target(section.offset_top()));
            options.set_behavior(ScrollBehavior::Smooth);
            if let Some(window) = window() {
                window.scroll_to_with_scroll_to_options(&options);
            }
        })?;
    }
    Ok(())
}

fn wire_scroll_animations(document: &Document) -> Result<(), SiteError> {
    let cards = query_all(document, config::ANIMATED_CARD_SELECTOR);
    if cards.is_empty() {
        return Ok(());
    }

    let callback = Closure::wrap(Box::new(|entries: Array, _observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
            if entry.is_intersecting() {
                let _ = entry.target().class_list().add_1("animate-in");
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.1));
    options.set_root_margin("0px 0px -50px 0px");
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    for card in &cards {
        observer.observe(card);
    }
    callback.forget();
    debug!("observing {} cards", cards.len());
    Ok(())
}

fn wire_parallax(document: &Document) -> Result<(), SiteError> {
    let Some(window) = window() else { return Ok(()) };
    let doc = document.clone();
    let scrolled = window.clone();
    listen(&window, "scroll", false, move |_| {
        if query(&doc, config::HERO_SELECTOR).is_none() {
            return;
        }
        let Some(card) = query(&doc, config::FLOATING_CARD_SELECTOR) else { return };
        let Some(card) = html(&card) else { return };
        let offset = parallax_offset(scrolled.scroll_y().unwrap_or(0.0));
        let _ = card
            .style()
            .set_property("transform", &format!("translateY({}px)", offset));
    })
}

fn wire_loaded_class(document: &Document) -> Result<(), SiteError> {
    let mark_loaded = |doc: &Document| {
        if let Some(body) = doc.body() {
            let _ = body.class_list().add_1("loaded");
        }
    };

    // the wasm bundle may finish after the window load event
    if document.ready_state() == "complete" {
        mark_loaded(document);
        return Ok(());
    }
    let Some(window) = window() else { return Ok(()) };
    let doc = document.clone();
    listen(&window, "load", false, move |_| mark_loaded(&doc))
}

fn wire_card_hover(document: &Document) -> Result<(), SiteError> {
    for card in query_all(document, config::ANIMATED_CARD_SELECTOR) {
        for (event, transform) in [
            ("mouseenter", "translateY(-10px) scale(1.02)"),
            ("mouseleave", "translateY(0) scale(1)"),
        ] {
            let target = card.clone();
            listen(&card, event, false, move |_| {
                if let Some(card) = html(&target) {
                    let _ = card.style().set_property("transform", transform);
                }
            })?;
        }
    }
    Ok(())
}

fn wire_copy_buttons(document: &Document) -> Result<(), SiteError> {
    let Some(window) = window() else { return Ok(()) };

    for button in query_all(document, config::COPY_BUTTON_SELECTOR) {
        let label = button.text_content().unwrap_or_default();
        if !label.contains(config::COPY_LABEL) {
            continue;
        }

        let clipboard = window.navigator().clipboard();
        let target = button.clone();
        listen(&button, "click", false, move |_| {
            let sibling = target.previous_element_sibling().and_then(|s| s.text_content());
            let label = target.text_content().unwrap_or_default();
            let Some(text) = clipboard_text(&label, sibling) else { return };

            let written = JsFuture::from(clipboard.write_text(&text));
            let target = target.clone();
            spawn_local(async move {
                match written.await {
                    Ok(_) => show_copied(&target),
                    Err(e) => debug!("clipboard write refused: {}", describe_js(&e)),
                }
            });
        })?;
    }
    Ok(())
}

fn show_copied(button: &Element) {
    let Some(button) = html(button).cloned() else { return };
    let original = button.text_content();
    button.set_text_content(Some(config::COPIED_TEXT));
    let style = button.style();
    let _ = style.set_property("background", config::COPIED_BACKGROUND);
    let _ = style.set_property("color", config::COPIED_COLOR);

    Timeout::new(config::COPIED_FEEDBACK_MS, move || {
        button.set_text_content(original.as_deref());
        let style = button.style();
        let _ = style.remove_property("background");
        let _ = style.remove_property("color");
    })
    .forget();
}

/// Types the hero headline out, then swaps in the styled markup.
fn start_typing(document: &Document) {
    let (Some(typing), Some(ghost)) = (
        document.get_element_by_id(config::HERO_TYPING_ID),
        document.get_element_by_id(config::HERO_GHOST_ID),
    ) else {
        return;
    };
    let Ok(typing) = typing.dyn_into::<HtmlElement>() else { return };

    let text = ghost.text_content().unwrap_or_default().trim().to_string();
    typing.set_text_content(Some(""));
    let _ = typing
        .style()
        .set_property("border-right", "2px solid rgba(255,255,255,.9)");

    spawn_local(async move {
        TimeoutFuture::new(config::TYPING_START_DELAY_MS).await;
        let total = text.chars().count();
        for shown in 1..=total {
            typing.set_text_content(Some(typed_prefix(&text, shown)));
            TimeoutFuture::new(config::TYPING_STEP_MS).await;
        }
        let _ = typing.style().set_property("border-right", "none");
        typing.set_inner_html(&ghost.inner_html());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_url_defaults_when_unset_or_blank() {
        assert_eq!(demo_video_url(None), config::DEFAULT_DEMO_VIDEO_URL);
        assert_eq!(demo_video_url(Some(String::new())), config::DEFAULT_DEMO_VIDEO_URL);
        assert_eq!(
            demo_video_url(Some("https://www.youtube.com/embed/other".into())),
            "https://www.youtube.com/embed/other"
        );
    }

    #[test]
    fn accordion_keeps_one_item_open() {
        assert_eq!(next_open_item(None, 2), Some(2));
        assert_eq!(next_open_item(Some(2), 0), Some(0));
        assert_eq!(next_open_item(Some(2), 2), None);
    }

    #[test]
    fn scroll_clears_the_navbar() {
        assert_eq!(scroll_target(1_000), 920.0);
        assert_eq!(scroll_target(40), -40.0);
    }

    #[test]
    fn parallax_moves_against_scroll() {
        assert_eq!(parallax_offset(200.0), -100.0);
        assert_eq!(parallax_offset(0.0), 0.0);
    }

    #[test]
    fn only_copy_buttons_yield_clipboard_text() {
        let shared = "https://breba.app/s/abc123";
        let url = || Some(shared.to_string());

        assert_eq!(clipboard_text("Copy", url()).as_deref(), Some(shared));
        assert_eq!(clipboard_text(" Copy URL ", url()).as_deref(), Some(shared));
        assert_eq!(clipboard_text("Watch Demo", url()), None);
        assert_eq!(clipboard_text(config::COPIED_TEXT, url()), None);
        assert_eq!(clipboard_text("Copy", None), None);
    }

    #[test]
    fn typing_respects_char_boundaries() {
        let text = "Build apps ✨ fast";
        assert_eq!(typed_prefix(text, 0), "");
        assert_eq!(typed_prefix(text, 5), "Build");
        assert_eq!(typed_prefix(text, 12), "Build apps ✨");
        assert_eq!(typed_prefix(text, 100), text);
    }
}
