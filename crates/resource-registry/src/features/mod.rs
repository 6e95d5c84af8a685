pub mod get_capability;
pub mod get_resource;
pub mod list_resources;
pub mod retire_resource;
pub mod upsert_resource;
