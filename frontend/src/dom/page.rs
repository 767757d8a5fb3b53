use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    window, Document, Element, HtmlElement, HtmlFormElement, HtmlTextAreaElement, KeyboardEvent,
};

use crate::analytics::{Analytics, DocumentPage, GtagSink};
use crate::attribution::{resolve_label, LastTrigger, WindowMirror};
use crate::clock::SystemClock;
use crate::config;
use crate::dom::bootstrap::{hide_modal, show_modal};
use crate::dom::effects;
use crate::dom::element::{href_of, query, query_all, value_of};
use crate::dom::form::{read_payload, DomWaitlistView};
use crate::dom::listen::listen;
use crate::error::SiteError;
use crate::session::BrowserSession;
use crate::tracking::{BindingRegistry, CtaTracker, ModalTracker};
use crate::waitlist::{FetchTransport, SubmissionFlow};

/// Everything the page handlers share.
struct Site {
    document: Document,
    cta: Rc<CtaTracker>,
    modal: Rc<ModalTracker>,
    submission: Rc<SubmissionFlow>,
    triggers: Rc<BindingRegistry<Element>>,
}

impl Site {
    fn new(document: Document) -> Self {
        let analytics = Analytics::new(Rc::new(GtagSink), Rc::new(DocumentPage));
        let flags = Rc::new(BrowserSession);
        let mirror = Rc::new(WindowMirror);
        let last_trigger = LastTrigger::default();

        Self {
            document,
            cta: Rc::new(CtaTracker::new(
                analytics.clone(),
                flags.clone(),
                last_trigger.clone(),
                mirror.clone(),
            )),
            modal: Rc::new(ModalTracker::new(
                analytics.clone(),
                Rc::new(SystemClock),
                last_trigger,
                mirror,
            )),
            submission: Rc::new(SubmissionFlow::new(analytics, flags)),
            triggers: Rc::new(BindingRegistry::default()),
        }
    }
}

/// Wires the page once the DOM is parsed.
pub fn start() {
    let Some(document) = window().and_then(|w| w.document()) else {
        warn!("no document, nothing to wire");
        return;
    };

    if document.ready_state() == "loading" {
        let target = document.clone();
        let result = listen(&target, "DOMContentLoaded", false, move |_| {
            wire(document.clone());
        });
        if let Err(e) = result {
            warn!("could not wait for DOMContentLoaded: {}", e);
        }
    } else {
        wire(document);
    }
}

fn wire(document: Document) {
    info!("Wiring page");
    let site = Site::new(document);

    let steps: [(&str, fn(&Site) -> Result<(), SiteError>); 7] = [
        ("waitlist triggers", wire_waitlist_triggers),
        ("engagement links", wire_engagement_links),
        ("waitlist modal", wire_waitlist_modal),
        ("waitlist form", wire_waitlist_form),
        ("build app idea", wire_build_app_idea),
        ("demo video", wire_demo_video),
        ("page effects", wire_effects),
    ];
    // one broken part of the page must not take the others down
    for (name, step) in steps {
        if let Err(e) = step(&site) {
            warn!("{} not wired: {}", name, e);
        }
    }
    info!("Page wired");
}

/// Safe to call again after markup changes; each trigger is bound once.
fn wire_waitlist_triggers(site: &Site) -> Result<(), SiteError> {
    let document = &site.document;
    let modal_el = document.get_element_by_id(config::WAITLIST_MODAL_ID);
    let mut failures = Vec::new();

    let fresh = site.triggers.bind_each(
        query_all(document, config::WAITLIST_TRIGGER_SELECTOR),
        |button| {
            let cta = site.cta.clone();
            let doc = document.clone();
            let clicked = button.clone();
            let tracked = listen(button, "click", true, move |_| {
                let idea = doc
                    .get_element_by_id(config::BUILD_APP_INPUT_ID)
                    .and_then(|input| value_of(&input));
                cta.on_trigger_click(&clicked, idea.as_deref());
            });

            let modal_el = modal_el.clone();
            let opener = listen(button, "click", false, move |_| match &modal_el {
                Some(modal_el) => {
                    if let Err(e) = show_modal(modal_el) {
                        warn!("could not open waitlist modal: {}", e);
                    }
                }
                None => warn!("waitlist trigger clicked but there is no modal"),
            });

            failures.extend(tracked.err());
            failures.extend(opener.err());
        },
    );

    info!("{} waitlist triggers bound ({} total)", fresh, site.triggers.len());
    match failures.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn wire_engagement_links(site: &Site) -> Result<(), SiteError> {
    let document = &site.document;

    match query(document, config::WATCH_DEMO_SELECTOR) {
        Some(demo) => {
            let cta = site.cta.clone();
            let button = demo.clone();
            listen(&demo, "click", true, move |_| {
                cta.on_watch_demo_click(&button, href_of(&button));
            })?;
        }
        None => warn!("no watch-demo button"),
    }

    match document.get_element_by_id(config::LOGIN_LINK_ID) {
        Some(login) => {
            let cta = site.cta.clone();
            let link = login.clone();
            listen(&login, "click", true, move |_| {
                cta.on_login_click(&link, href_of(&link));
            })?;
        }
        None => warn!("no login link"),
    }
    Ok(())
}

fn wire_waitlist_modal(site: &Site) -> Result<(), SiteError> {
    let document = &site.document;
    let modal_el = document
        .get_element_by_id(config::WAITLIST_MODAL_ID)
        .ok_or(SiteError::MissingElement(config::WAITLIST_MODAL_ID))?;

    let tracker = site.modal.clone();
    let email_owner = modal_el.clone();
    listen(&modal_el, config::MODAL_SHOWN_EVENT, false, move |_| {
        tracker.on_shown();
        let email = email_owner
            .query_selector(config::EMAIL_INPUT_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(email) = email {
            let _ = email.focus();
        }
    })?;

    if let Ok(Some(close_button)) = modal_el.query_selector(config::CLOSE_BUTTON_SELECTOR) {
        let tracker = site.modal.clone();
        listen(&close_button, "click", true, move |_| tracker.on_close_button())?;
    }

    let tracker = site.modal.clone();
    let backdrop = modal_el.clone();
    listen(&modal_el, "mousedown", true, move |event| {
        let on_backdrop = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map_or(false, |target| target == backdrop);
        tracker.on_mousedown(on_backdrop);
    })?;

    // Capture phase: Bootstrap drops the `show` class in its own Escape
    // handler. The closing itself is the separate listener below.
    let tracker = site.modal.clone();
    let visible = modal_el.clone();
    listen(document, "keydown", true, move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
            let shown = visible.class_list().contains(config::MODAL_VISIBLE_CLASS);
            tracker.on_keydown(&key, shown);
        }
    })?;

    let closing = modal_el.clone();
    listen(document, "keydown", false, move |event| {
        let is_escape = event
            .dyn_ref::<KeyboardEvent>()
            .map_or(false, |k| k.key() == "Escape");
        if is_escape && closing.class_list().contains(config::MODAL_VISIBLE_CLASS) {
            if let Err(e) = hide_modal(&closing) {
                warn!("could not close waitlist modal: {}", e);
            }
        }
    })?;

    let tracker = site.modal.clone();
    listen(&modal_el, config::MODAL_HIDDEN_EVENT, false, move |_| tracker.on_hidden())?;
    Ok(())
}

fn wire_waitlist_form(site: &Site) -> Result<(), SiteError> {
    let document = &site.document;

    if let Some(submit) = document.get_element_by_id(config::SUBMIT_BUTTON_ID) {
        let flow = site.submission.clone();
        let button = submit.clone();
        listen(&submit, "click", true, move |_| {
            flow.on_submit_click(resolve_label(Some(&button)));
        })?;
    }

    let form = document
        .get_element_by_id(config::WAITLIST_FORM_ID)
        .ok_or(SiteError::MissingElement(config::WAITLIST_FORM_ID))?
        .dyn_into::<HtmlFormElement>()
        .map_err(|_| SiteError::MissingElement(config::WAITLIST_FORM_ID))?;
    let modal_el = document
        .get_element_by_id(config::WAITLIST_MODAL_ID)
        .ok_or(SiteError::MissingElement(config::WAITLIST_MODAL_ID))?;

    let view = Rc::new(DomWaitlistView::new(document, form.clone(), modal_el));
    let flow = site.submission.clone();
    let submitted = form.clone();
    listen(&form, "submit", false, move |event| {
        event.prevent_default();
        let payload = read_payload(&submitted);
        let flow = flow.clone();
        let view = view.clone();
        spawn_local(async move {
            let transport = FetchTransport::new(config::get_form_endpoint());
            flow.submit(payload, &transport, view.as_ref()).await;
        });
    })
}

fn wire_effects(site: &Site) -> Result<(), SiteError> {
    effects::wire_all(&site.document)
}

/// Carries the hero's idea into the waitlist comments.
fn wire_build_app_idea(site: &Site) -> Result<(), SiteError> {
    let document = &site.document;
    let button = document
        .get_element_by_id(config::BUILD_APP_BUTTON_ID)
        .ok_or(SiteError::MissingElement(config::BUILD_APP_BUTTON_ID))?;

    let doc = document.clone();
    listen(&button, "click", false, move |_| {
        let idea = doc
            .get_element_by_id(config::BUILD_APP_INPUT_ID)
            .and_then(|input| value_of(&input))
            .unwrap_or_default();
        if let Some(comments) = doc
            .get_element_by_id(config::COMMENTS_ID)
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
        {
            comments.set_value(&idea);
        }
    })
}

fn wire_demo_video(site: &Site) -> Result<(), SiteError> {
    let document = &site.document;
    let (Some(modal_el), Some(frame)) = (
        document.get_element_by_id(config::DEMO_MODAL_ID),
        document.get_element_by_id(config::DEMO_VIDEO_ID),
    ) else {
        warn!("no demo video modal");
        return Ok(());
    };

    for trigger in query_all(document, config::DEMO_TRIGGER_SELECTOR) {
        let frame = frame.clone();
        let source = trigger.clone();
        listen(&trigger, "click", false, move |_| {
            let url = effects::demo_video_url(source.get_attribute("data-video"));
            let _ = frame.set_attribute("src", &url);
        })?;
    }

    listen(&modal_el, config::MODAL_HIDDEN_EVENT, false, move |_| {
        let _ = frame.set_attribute("src", "");
    })
}
