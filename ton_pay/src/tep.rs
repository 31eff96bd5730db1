pub mod jetton;
mod text_comment;

pub use text_comment::*;
