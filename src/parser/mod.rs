//! Tokenizer, parser state and the evaluating grammar

pub(crate) mod grammar;
pub mod state;
pub mod tokenizer;

pub use state::ParserState;
pub use tokenizer::Tokenizer;
