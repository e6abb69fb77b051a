pub mod appointment;
pub mod customer;
pub mod ids;
pub mod patch;
pub mod service;
pub mod slot;
