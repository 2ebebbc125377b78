pub mod input;
pub mod test_utils;
