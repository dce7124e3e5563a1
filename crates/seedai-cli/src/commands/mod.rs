//! Command implementations.

pub mod generate;
pub mod verify;

pub use self::generate::execute_generate;
pub use self::verify::execute_verify;
