// Career advice for the chat endpoint.
// Skills assessments go through the label encoder and classifier; free text
// is answered from the keyword table.

pub mod artifact;
pub mod classifier;
pub mod dispatcher;
pub mod encoder;
pub mod handlers;
pub mod keywords;
pub mod skills;
