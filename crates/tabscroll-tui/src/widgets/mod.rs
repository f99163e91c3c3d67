mod document_view;
mod popup;
mod status_bar;

pub use document_view::DocumentViewWidget;
pub use popup::{centered_rect, PopupWidget};
pub use status_bar::StatusBarWidget;
