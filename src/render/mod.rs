pub mod collapse;
pub mod format;
pub mod html;
pub mod text;

pub use collapse::{CollapseState, VisibleRow, project};
pub use format::{EM_DASH, format_amount};
pub use html::{render_html, render_html_page};
pub use text::render_text;
