pub mod ast;
pub mod diagnostic;
pub mod display;
pub mod span;
pub mod structural;

pub use span::{Span, Spanned};
