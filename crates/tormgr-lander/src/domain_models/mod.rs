//! Domain models used by state and middleware

pub mod adjacency;
pub mod edit_state;

pub use adjacency::adjacent_folder;
pub use edit_state::EditState;
