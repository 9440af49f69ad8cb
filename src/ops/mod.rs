pub mod check;
pub mod ids;
pub mod store;
