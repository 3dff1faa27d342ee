pub mod fallback;
pub mod prompt;
pub mod rules;

pub use fallback::FallbackPicker;
