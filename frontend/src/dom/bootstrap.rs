use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::error::SiteError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap)]
    type Modal;

    #[wasm_bindgen(
        catch,
        static_method_of = Modal,
        js_namespace = bootstrap,
        js_name = getOrCreateInstance
    )]
    fn get_or_create_instance(element: &Element) -> Result<Modal, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn show(this: &Modal) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, method)]
    fn hide(this: &Modal) -> Result<(), JsValue>;
}

/// Fails when Bootstrap's bundle has not loaded.
pub fn show_modal(element: &Element) -> Result<(), SiteError> {
    Modal::get_or_create_instance(element)?.show()?;
    Ok(())
}

pub fn hide_modal(element: &Element) -> Result<(), SiteError> {
    Modal::get_or_create_instance(element)?.hide()?;
    Ok(())
}
