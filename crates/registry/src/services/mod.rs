pub mod directory;
pub mod error;
pub mod generator;
pub mod resolver;
pub mod tokenizer;
pub mod validation;
