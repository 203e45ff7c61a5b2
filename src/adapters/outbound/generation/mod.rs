mod openai;

pub use openai::{OpenAiCopyGenerator, UnconfiguredGenerator, DEFAULT_MODEL};
