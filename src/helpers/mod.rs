//! Helper functions shared by the renderer, the previews and the server

mod html;
mod url;

pub use html::*;
pub use url::*;
