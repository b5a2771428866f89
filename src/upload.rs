pub mod file_input;
pub mod image_meta;
pub mod validation;
