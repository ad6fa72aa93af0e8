pub mod schema;
pub mod submissions;
pub mod validate;
