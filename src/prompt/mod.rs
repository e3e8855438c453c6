// Prompt construction for both pipelines.
//
// Builders are pure: identical inputs render identical text. The prompts
// are written in Portuguese because the corpus is.

pub mod builder;

pub use builder::{
    classification_prompt, discovery_prompt, estimate_tokens, PromptContext, COMMENT_DELIMITER,
};
