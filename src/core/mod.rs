//! Message data model and the asynchronous collaborator boundary.

pub mod image;
pub mod message;
pub mod snapshot;
