// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Front-end logic for the sequence search page: submit one FASTA query to
//! the search API, render the hits as table rows and turn the stored hits
//! into FASTA downloads. Rendering targets are abstracted behind
//! [`view::HitsView`] so the same controller drives the terminal and the DOM.

pub mod align;
pub mod fasta;
pub mod page;
pub mod query;
pub mod view;

pub use fasta::{FastaDownload, SequenceTarget};
pub use page::{HitsPage, PageError, PageState, PendingRequest};
pub use query::SequenceQuery;
pub use view::{HitRow, HitsView, TextTable, FAILURE_MESSAGE};
