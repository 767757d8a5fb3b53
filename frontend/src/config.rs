use log::Level;

// Element ids the page markup provides.
pub const WAITLIST_MODAL_ID: &str = "waitlistModal";
pub const WAITLIST_FORM_ID: &str = "brebaWaitlistForm";
pub const SUBMIT_BUTTON_ID: &str = "submitBtn";
pub const SUBMIT_SPINNER_ID: &str = "submitSpinner";
pub const SUBMIT_TEXT_ID: &str = "submitText";
pub const FORM_ALERT_ID: &str = "formAlert";
pub const BUILD_APP_BUTTON_ID: &str = "buildAppBtn";
pub const BUILD_APP_INPUT_ID: &str = "buildAppInput";
pub const COMMENTS_ID: &str = "comments";
pub const DEMO_MODAL_ID: &str = "demoModal";
pub const DEMO_VIDEO_ID: &str = "demoVideo";
pub const LOGIN_LINK_ID: &str = "loginLink";
pub const HERO_SECTION_ID: &str = "product";
pub const HERO_TYPING_ID: &str = "heroTyping";
pub const HERO_GHOST_ID: &str = "heroGhost";

pub const WAITLIST_TRIGGER_SELECTOR: &str = ".join-waitlist-btn";
pub const WATCH_DEMO_SELECTOR: &str = ".hero-actions a.btn-secondary";
pub const DEMO_TRIGGER_SELECTOR: &str = "[data-bs-target=\"#demoModal\"]";
pub const CLOSE_BUTTON_SELECTOR: &str = ".btn-close";
pub const EMAIL_INPUT_SELECTOR: &str = "input[name=\"email\"]";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const NAV_MENU_SELECTOR: &str = ".nav-menu";
pub const NAV_ACTIONS_SELECTOR: &str = ".nav-actions";
pub const HAMBURGER_SELECTOR: &str = ".hamburger";
pub const FAQ_QUESTION_SELECTOR: &str = ".faq-question";
pub const ANCHOR_LINK_SELECTOR: &str = "a[href^=\"#\"]";
pub const ANIMATED_CARD_SELECTOR: &str = ".feature-card, .testimonial-card, .pricing-card";
pub const FLOATING_CARD_SELECTOR: &str = ".floating-card";
pub const HERO_SELECTOR: &str = ".hero";
pub const COPY_BUTTON_SELECTOR: &str = ".btn-secondary";

// Bootstrap modal lifecycle events and state class.
pub const MODAL_SHOWN_EVENT: &str = "shown.bs.modal";
pub const MODAL_HIDDEN_EVENT: &str = "hidden.bs.modal";
pub const MODAL_VISIBLE_CLASS: &str = "show";
pub const HIDDEN_CLASS: &str = "d-none";

// sessionStorage keys. Older pages wrote the login flag under the second key.
pub const WATCHED_DEMO_KEY: &str = "watched_demo";
pub const CLICKED_LOGIN_KEY: &str = "clicked_login";
pub const LEGACY_LOGIN_KEY: &str = "login_clicked";
pub const FLAG_SET: &str = "1";

/// Global the last waitlist attribution is mirrored under, for other page scripts.
pub const LAST_TRIGGER_GLOBAL: &str = "lastWaitlistTrigger";
pub const ANALYTICS_GLOBAL: &str = "gtag";

pub const WAITLIST_AREA: &str = "waitlist_modal";

// Analytics event names.
pub const EVENT_TRY_BETA_CLICK: &str = "try_beta_click";
pub const EVENT_MODAL_OPEN: &str = "waitlist_modal_open";
pub const EVENT_MODAL_CLOSE: &str = "waitlist_modal_close";
pub const EVENT_SUBMIT_CLICK: &str = "waitlist_submit_click";
pub const EVENT_SUBMIT_COMPLETED: &str = "waitlist_submit_completed";
pub const EVENT_WATCH_DEMO_CLICK: &str = "watch_demo_click";
pub const EVENT_LOGIN_CLICK: &str = "login_click";

pub const SUBMIT_TEXT_IDLE: &str = "Submit";
pub const SUBMIT_TEXT_BUSY: &str = "Submitting...";
pub const SUCCESS_MESSAGE: &str = "🎉 Thank you! Your response has been recorded.";
pub const FAILURE_MESSAGE: &str = "❌ There was an error submitting the form. Please try again.";
pub const SUCCESS_ALERT_CLASS: &str = "alert alert-success";
pub const FAILURE_ALERT_CLASS: &str = "alert alert-danger";

// Feedback on a copy button after its URL reached the clipboard.
pub const COPY_LABEL: &str = "Copy";
pub const COPIED_TEXT: &str = "Copied!";
pub const COPIED_BACKGROUND: &str = "#10b981";
pub const COPIED_COLOR: &str = "white";

pub const AUTO_CLOSE_DELAY_MS: u32 = 1_000;
pub const COPIED_FEEDBACK_MS: u32 = 2_000;
pub const NAVBAR_OFFSET_PX: f64 = 80.0;
pub const TYPING_START_DELAY_MS: u32 = 500;
pub const TYPING_STEP_MS: u32 = 50;
pub const PARALLAX_RATE: f64 = -0.5;

pub const DEFAULT_DEMO_VIDEO_URL: &str =
    "https://www.youtube.com/embed/Txv-lUdk1LM?rel=0&autoplay=1&rel=0";

const FORM_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbwCbKjWjO4ZkDWzFCeh7zo7e1rnHu6OP-ydwlJVJRyp-AjGav1gaG_5N1yEzOArvklW/exec";

pub fn get_form_endpoint() -> &'static str {
    FORM_ENDPOINT
}

#[cfg(debug_assertions)]
pub fn get_log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn get_log_level() -> Level {
    Level::Info
}
