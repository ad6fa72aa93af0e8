pub mod error_boundary;
pub mod json_body;
pub mod query;
pub mod response;

pub use error_boundary::error_boundary;
pub use json_body::RecordBody;
pub use query::ListingQuery;
pub use response::{ApiResponse, ApiResult};
