pub mod manager;
pub mod models;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::{ListParams, ListQuery, Page, SortOrder, Submission};
pub use store::{SqliteSubmissionStore, SubmissionStore, SUBMISSION_NOT_FOUND};
