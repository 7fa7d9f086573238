//! Rendering and interaction layer for message cells.
//!
//! Key submodules:
//! - [`style`]: message-style variants and the (style, bounds) → paint
//!   mapping.
//! - [`container`]: the content container engine driving mask/fill/tint
//!   state and sub-region configuration.
//! - [`hit`]: pointer-up routing over the cell's named regions.
//! - [`cell`]: the composed per-message cell and its configure/layout/
//!   reuse contract.
//! - [`avatar`], [`label`], [`media`]: the cell's sub-region widgets.
//! - [`theme`]: default color policy for hosts without their own palette.
//!
//! Ownership boundary: this layer renders and routes interaction for a
//! single cell; [`crate::core`] owns message data and the asynchronous
//! snapshot collaborator boundary.

pub mod avatar;
pub mod cell;
pub mod container;
pub mod hit;
pub mod label;
pub mod media;
pub mod style;
pub mod theme;
