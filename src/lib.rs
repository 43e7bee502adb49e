pub mod config;
pub mod error;
pub mod langtab;
pub mod lexicon;
pub mod mask;
pub mod pipeline;
pub mod polish;
pub mod progress;
pub mod romanize;
pub mod target;
pub mod tokenize;
pub mod translate;

pub use error::{MixError, MixResult, Stage};
pub use lexicon::Lexicon;
pub use pipeline::{Mixer, PipelineConfig, RestoreStrategy};
pub use target::{MixTarget, TransTarget};
