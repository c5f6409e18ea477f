//! Host-side collaborators the dispatcher consumes.

pub mod notify;
