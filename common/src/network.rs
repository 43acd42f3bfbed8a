pub mod ip;
pub mod target;
