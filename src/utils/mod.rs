pub mod gps;
pub mod scratch;
pub mod validation;
