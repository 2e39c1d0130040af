pub mod auth;
pub mod model;
pub mod remote;
pub mod store;
pub mod tree;
pub mod views;
