use log::warn;
use web_sys::{window, Storage};

use crate::config;

/// Per-tab markers for one-time actions taken earlier in the session.
pub trait SessionFlags {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);

    fn watched_demo(&self) -> bool {
        self.get(config::WATCHED_DEMO_KEY).as_deref() == Some(config::FLAG_SET)
    }

    fn clicked_login(&self) -> bool {
        [config::CLICKED_LOGIN_KEY, config::LEGACY_LOGIN_KEY]
            .iter()
            .any(|key| self.get(key).as_deref() == Some(config::FLAG_SET))
    }

    fn mark_watched_demo(&self) {
        self.set(config::WATCHED_DEMO_KEY, config::FLAG_SET);
    }

    fn mark_clicked_login(&self) {
        self.set(config::CLICKED_LOGIN_KEY, config::FLAG_SET);
    }
}

/// Flags backed by `window.sessionStorage`. Storage can be missing (privacy
/// modes, sandboxed iframes); every read then reports the flag as unset.
pub struct BrowserSession;

impl BrowserSession {
    fn storage() -> Option<Storage> {
        window()
            .and_then(|w| w.session_storage().ok())
            .flatten()
    }
}

impl SessionFlags for BrowserSession {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|storage| storage.get_item(key).ok()).flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    warn!("sessionStorage rejected write of {}", key);
                }
            }
            None => warn!("sessionStorage unavailable, {} not recorded", key),
        }
    }
}

/// Analytics encoding of a flag.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
