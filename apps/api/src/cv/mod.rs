// Uploaded-CV access for the advisor: the Qdrant-backed store and the
// `review_user_cv` tool built on it.

pub mod retrieval;
pub mod store;
