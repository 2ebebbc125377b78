pub mod enums;
pub mod ranking;
