// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use hits_page::{FastaDownload, HitRow, HitsPage, HitsView, SequenceQuery, SequenceTarget, FAILURE_MESSAGE};
use hits_wasm::dom::{self, DomView};
use hits_wasm::SharedPage;
use shared_types::search::{HitRecord, QueryResult, SearchResult};
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use web_sys::{Document, Event, HtmlAnchorElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document_with_table() -> Document {
    let document = web_sys::window().unwrap().document().unwrap();
    document.body().unwrap().set_inner_html(
        r#"<table id="hits_table"><tbody><tr><td>stale</td></tr></tbody></table>
        <button id="protein_download" disabled>Protein</button>
        <button id="dna_download" disabled>DNA</button>"#,
    );
    document
}

fn row(index: usize, gene_id: &str) -> HitRow {
    HitRow {
        index,
        gene_id: gene_id.into(),
        protein_length: 3,
        dna_length: 9,
    }
}

#[wasm_bindgen_test]
fn renders_rows_in_order() {
    let document = document_with_table();
    let mut view = DomView::new(document.clone());

    view.clear_rows();
    view.append_rows(&[row(1, "g3"), row(2, "g1")]);
    view.enable_downloads();

    let rows = document.query_selector_all("#hits_table tbody tr").unwrap();
    assert_eq!(rows.length(), 2);
    let first = rows.item(0).unwrap().text_content().unwrap();
    let second = rows.item(1).unwrap().text_content().unwrap();
    assert!(first.contains("g3"), "{first}");
    assert!(second.contains("g1"), "{second}");

    let button = document.get_element_by_id("protein_download").unwrap();
    assert!(!button.has_attribute("disabled"));
}

#[wasm_bindgen_test]
fn failure_replaces_table() {
    let document = document_with_table();
    let mut view = DomView::new(document.clone());

    view.replace_table(FAILURE_MESSAGE);

    assert!(document.get_element_by_id("hits_table").is_none());
    let body = document.body().unwrap().text_content().unwrap();
    assert!(body.contains(FAILURE_MESSAGE));
    let button = document.get_element_by_id("dna_download").unwrap();
    assert!(button.has_attribute("disabled"));
}

/// Records the `(href, download)` of every link click on the document and
/// stops the browser from following it.
struct LinkClicks {
    document: Document,
    seen: Rc<RefCell<Vec<(String, String)>>>,
    listener: Closure<dyn FnMut(Event)>,
}

impl LinkClicks {
    fn install(document: &Document) -> Self {
        let seen = Rc::new(RefCell::new(vec![]));
        let seen_in_listener = seen.clone();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(anchor) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlAnchorElement>().ok())
            else {
                return;
            };
            event.prevent_default();
            seen_in_listener
                .borrow_mut()
                .push((anchor.href(), anchor.download()));
        });
        document
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .unwrap();
        Self {
            document: document.clone(),
            seen,
            listener,
        }
    }

    fn seen(&self) -> Vec<(String, String)> {
        self.seen.borrow().clone()
    }
}

impl Drop for LinkClicks {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("click", self.listener.as_ref().unchecked_ref());
    }
}

fn hit(gene_id: &str, protein: &str, dna: &str) -> HitRecord {
    HitRecord::from_iter([
        ("gene_id", gene_id),
        ("protein_sequence", protein),
        ("dna_sequence", dna),
    ])
}

fn shared_page(document: &Document) -> SharedPage {
    let base = Url::parse("https://gmgc.example.org/api/v1.0/").unwrap();
    Rc::new(RefCell::new(
        HitsPage::new(&base, DomView::new(document.clone())).unwrap(),
    ))
}

fn click(document: &Document, id: &str) {
    document
        .get_element_by_id(id)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

#[wasm_bindgen_test]
fn save_clicks_a_data_link_and_removes_it() {
    let document = document_with_table();
    let clicks = LinkClicks::install(&document);
    let download = FastaDownload::new(&[hit("g1", "AAA", "ATG")], SequenceTarget::Protein);

    dom::save(&document, &download).unwrap();

    assert_eq!(
        clicks.seen(),
        [(
            "data:text/plain;charset=utf-8,%3Eg1%0AAAA%0A".to_owned(),
            "protein_sequences.fasta".to_owned()
        )]
    );
    assert_eq!(document.get_elements_by_tag_name("a").length(), 0);
}

#[wasm_bindgen_test]
fn download_buttons_do_nothing_before_a_search() {
    let document = document_with_table();
    let clicks = LinkClicks::install(&document);
    let page = shared_page(&document);
    hits_wasm::bind_downloads(&document, &page).unwrap();

    for target in SequenceTarget::ALL {
        let button = document.get_element_by_id(target.button_id()).unwrap();
        button.remove_attribute("disabled").unwrap();
        click(&document, target.button_id());
    }

    assert!(clicks.seen().is_empty());
}

#[wasm_bindgen_test]
fn download_buttons_save_the_pending_search() {
    let document = document_with_table();
    let clicks = LinkClicks::install(&document);
    let page = shared_page(&document);
    hits_wasm::bind_downloads(&document, &page).unwrap();

    page.borrow_mut()
        .begin_request(SequenceQuery::sample())
        .unwrap();
    let response = SearchResult {
        results: vec![QueryResult {
            hits: vec![hit("g1", "AAA", "ATG"), hit("g2", "MW", "ATGTGG")],
            extra: Default::default(),
        }],
        extra: Default::default(),
    };
    assert_eq!(page.borrow_mut().finish_request(Ok(response)).unwrap(), 2);

    click(&document, "dna_download");

    assert_eq!(
        clicks.seen(),
        [(
            "data:text/plain;charset=utf-8,%3Eg1%0AATG%0A%3Eg2%0AATGTGG%0A".to_owned(),
            "dna_sequences.fasta".to_owned()
        )]
    );
}
