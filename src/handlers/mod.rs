// handlers/mod.rs - HTTP handlers
//
// form_schema  GET /api/form-schema
// submissions  /api/submissions[/:id] CRUD
// system       service descriptor, health and the unknown-route fallback
pub mod form_schema;
pub mod submissions;
pub mod system;
