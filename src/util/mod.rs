pub mod input_line;
pub mod unicode;
