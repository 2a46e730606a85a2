pub mod fields;
pub mod honeypot;
pub mod metadata;
pub mod parser;
pub mod pipeline;

/// A validated contact form submission. Lives for one request only.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub interests: Vec<String>,
    pub message: String,
}
