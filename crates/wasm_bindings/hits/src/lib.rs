// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, info, warn};
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Window};

use hits_page::{HitsPage, SequenceQuery, SequenceTarget};
use http_client::BaseApiClient;
use shared_types::requests::RequestId;

pub mod dom;

use dom::DomView;

pub type SharedPage = Rc<RefCell<HitsPage<DomView>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// Loads the hits for `fasta` (the built-in sample when absent) from the API
/// at `api_base` into `#hits_table`, and wires up the download buttons.
///
/// `api_base` may be absolute or relative to the document, e.g. `/api/v1.0/`
/// for a same-origin API.
///
/// Waits `delay_ms` milliseconds first when given. Resolves to the number of
/// hits rendered; on failure the table has already been replaced with the
/// failure message.
#[wasm_bindgen]
pub async fn load_hits(
    api_base: String,
    fasta: Option<String>,
    delay_ms: Option<i32>,
) -> Result<u32, JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("window has no document"))?;
    let document_base = document
        .base_uri()
        .map_err(|err| js_error("reading the document base", err))?
        .ok_or_else(|| JsError::new("document has no base URI"))?;
    let api_base = resolve_api_base(&document_base, &api_base)?;

    let page = HitsPage::new(&api_base, DomView::new(document.clone()))?;
    let page: SharedPage = Rc::new(RefCell::new(page));
    bind_downloads(&document, &page).map_err(|err| js_error("binding downloads", err))?;

    if let Some(millis) = delay_ms.filter(|&millis| millis > 0) {
        info!("waiting {millis}ms before searching");
        sleep(&window, millis)
            .await
            .map_err(|err| js_error("waiting", err))?;
    }

    let query = fasta.map(SequenceQuery::new).unwrap_or_default();
    let request = page.borrow_mut().begin_request(query)?;
    let client = BaseApiClient::new(RequestId::new_unique_with_prefix("gmgc-hits"));
    let outcome = request.send(&client).await;
    let hits = page.borrow_mut().finish_request(outcome)?;
    Ok(u32::try_from(hits).unwrap_or(u32::MAX))
}

/// Resolves `api_base` against the document's base URI. Absolute bases are
/// returned unchanged.
pub fn resolve_api_base(document_base: &str, api_base: &str) -> Result<Url, url::ParseError> {
    Url::parse(document_base)?.join(api_base)
}

/// Makes the download buttons save the page's pending search as FASTA.
/// Clicks before the first successful search do nothing.
pub fn bind_downloads(document: &Document, page: &SharedPage) -> Result<(), JsValue> {
    for target in SequenceTarget::ALL {
        let Some(button) = document.get_element_by_id(target.button_id()) else {
            warn!("no #{} button, {target} downloads unavailable", target.button_id());
            continue;
        };
        let page = Rc::clone(page);
        let document = document.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            let Some(download) = page.borrow().download(target) else {
                return;
            };
            if let Err(err) = dom::save(&document, &download) {
                error!("{} download failed: {err:?}", download.file_name);
            }
        });
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        // the buttons live as long as the page
        on_click.forget();
    }
    Ok(())
}

async fn sleep(window: &Window, millis: i32) -> Result<(), JsValue> {
    let mut scheduled = Ok(0);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
    });
    scheduled?;
    JsFuture::from(promise).await?;
    Ok(())
}

fn js_error(ctx: &str, err: JsValue) -> JsError {
    JsError::new(&format!("{ctx}: {err:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://gmgc.embl.de/search.html?q=MySeq";

    #[test]
    fn relative_base_resolves_against_the_page() {
        assert_eq!(
            resolve_api_base(PAGE, "/api/v1.0/").unwrap().as_str(),
            "https://gmgc.embl.de/api/v1.0/"
        );
        assert_eq!(
            resolve_api_base("https://gmgc.embl.de/app/", "api/v1.0/").unwrap().as_str(),
            "https://gmgc.embl.de/app/api/v1.0/"
        );
    }

    #[test]
    fn absolute_base_is_kept() {
        assert_eq!(
            resolve_api_base(PAGE, "http://localhost:8080/api/v1.0/").unwrap().as_str(),
            "http://localhost:8080/api/v1.0/"
        );
    }

    #[test]
    fn invalid_document_base_is_an_error() {
        assert!(resolve_api_base("not a url", "/api/v1.0/").is_err());
    }
}
