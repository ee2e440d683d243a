pub mod inventory;
pub mod object_store;
