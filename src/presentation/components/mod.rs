mod body;
mod feedback;
mod fields;
mod footer;
mod header;
mod layout;
mod popup;
mod table;

pub use body::render_body;
pub use feedback::{render_modal, render_toasts};
pub use fields::render_dialog;
pub use footer::render_footer;
pub use header::render_header;
pub use popup::render_popup;
