// Corpus loading: turn a CSV export of comments into text records.
//
// The loader is the only stage that can fail on the input's shape. A
// missing text column is fatal and surfaces before any model is called.

pub mod loader;

pub use loader::{load_comments, read_comments, CorpusError, NA_MARKERS};
