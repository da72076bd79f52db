pub mod compose;
pub mod markdown;

pub use compose::compose;
pub use markdown::MarkdownRenderer;
