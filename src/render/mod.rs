//! Slide renderers. Both consume a [`crate::layout::Deck`] and make no
//! placement decisions of their own.

mod package;
mod parts;
pub mod pptx;
pub mod preview;
pub mod theme;

pub use package::PackageWriter;
pub use pptx::{export, write_pptx, EMU_PER_INCH};
pub use preview::{preview_section, render_preview, render_preview_document, render_slide};
