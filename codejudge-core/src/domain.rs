pub mod ids;
pub mod pagination;
pub mod submission;
pub mod task;

pub use ids::*;
pub use pagination::*;
pub use submission::*;
pub use task::*;
