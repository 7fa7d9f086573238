//! Burble renders single chat messages as composited terminal cells: an
//! avatar, top/bottom accessory labels, and a content container whose
//! shape (plain, bubble, outlined bubble, bubble with a speech tail, or
//! fully custom) follows a message-style variant. It also resolves mouse
//! input over the cell's nested, possibly overlapping sub-regions into a
//! single semantic tap callback.
//!
//! The crate is organized around two collaborating layers:
//! - [`core`] owns the message data model ([`core::message`]), cell-art
//!   image data ([`core::image`]), and the asynchronous map-snapshot
//!   collaborator boundary ([`core::snapshot`]).
//! - [`ui`] owns rendering and interaction: the style-to-paint engine
//!   ([`ui::style`], [`ui::container`]), tap routing ([`ui::hit`]), and
//!   the composed cell ([`ui::cell`]) a hosting list drives through its
//!   configure/layout/reuse contract.
//!
//! The hosting list itself stays external: it computes per-cell geometry,
//! owns cell recycling, and receives tap callbacks through
//! [`ui::cell::MessageCellDelegate`]. A reference host lives in the demo
//! binary (`src/main.rs`).

pub mod core;
pub mod ui;
