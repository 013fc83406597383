// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{error, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlAnchorElement};

use hits_page::{FastaDownload, HitRow, HitsView, SequenceTarget};

pub const TABLE_ID: &str = "hits_table";
const TBODY_SELECTOR: &str = "#hits_table tbody";

/// Renders hits into the page's `#hits_table`.
#[derive(Debug, Clone)]
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn tbody(&self) -> Option<Element> {
        match self.document.query_selector(TBODY_SELECTOR) {
            Ok(tbody) => tbody,
            Err(err) => {
                error!("couldn't query {TBODY_SELECTOR}: {err:?}");
                None
            }
        }
    }

    fn append_row(&self, tbody: &Element, row: &HitRow) -> Result<(), JsValue> {
        let tr = self.document.create_element("tr")?;
        for cell in row.cells() {
            let td = self.document.create_element("td")?;
            td.set_text_content(Some(&cell));
            tr.append_child(&td)?;
        }
        tbody.append_child(&tr)?;
        Ok(())
    }
}

impl HitsView for DomView {
    fn clear_rows(&mut self) {
        if let Some(tbody) = self.tbody() {
            tbody.set_inner_html("");
        }
    }

    fn append_rows(&mut self, rows: &[HitRow]) {
        let Some(tbody) = self.tbody() else {
            warn!("no {TBODY_SELECTOR} to render {} hits into", rows.len());
            return;
        };
        for row in rows {
            if let Err(err) = self.append_row(&tbody, row) {
                error!("couldn't render hit {}: {err:?}", row.index);
            }
        }
    }

    fn replace_table(&mut self, message: &str) {
        let Some(table) = self.document.get_element_by_id(TABLE_ID) else {
            warn!("no #{TABLE_ID} to replace");
            return;
        };
        if let Err(err) = table.replace_with_with_str_1(message) {
            error!("couldn't replace #{TABLE_ID}: {err:?}");
        }
    }

    fn enable_downloads(&mut self) {
        for target in SequenceTarget::ALL {
            if let Some(button) = self.document.get_element_by_id(target.button_id()) {
                if let Err(err) = button.remove_attribute("disabled") {
                    error!("couldn't enable #{}: {err:?}", target.button_id());
                }
            }
        }
    }
}

/// Hands `download` to the browser through a temporary `data:` link.
pub fn save(document: &Document, download: &FastaDownload) -> Result<(), JsValue> {
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    let contents = String::from(js_sys::encode_uri_component(&download.contents));
    anchor.set_href(&format!("data:text/plain;charset=utf-8,{contents}"));
    anchor.set_download(download.file_name);

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Ok(())
}
