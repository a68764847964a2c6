//! Prompt domain
//!
//! System prompts for the classifier models.

mod template;

pub use template::RouterPromptTemplate;
