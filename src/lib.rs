// Topica: topic annotation of social-media comments with generative models
//
// This is the library root. Each module corresponds to one stage of the
// annotation pipeline: load the corpus, build the prompt, call the model,
// normalize the answer, persist the results.

pub mod completion;
pub mod config;
pub mod corpus;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod taxonomy;
