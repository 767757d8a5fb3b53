use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

use crate::error::SiteError;

/// Registers a listener for the lifetime of the page.
pub fn listen<F>(
    target: &EventTarget,
    event: &str,
    capture: bool,
    handler: F,
) -> Result<(), SiteError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback_and_bool(
        event,
        callback.as_ref().unchecked_ref(),
        capture,
    )?;
    callback.forget();
    Ok(())
}
