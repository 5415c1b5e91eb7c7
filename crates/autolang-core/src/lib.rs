pub mod text;

pub use text::label::{LanguageLabel, ParseLanguageError};
pub use text::script::{classify, script_counts};
