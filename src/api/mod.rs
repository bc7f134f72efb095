pub mod client;
pub mod models;

// Re-export commonly used items
pub use client::CommentClient;
