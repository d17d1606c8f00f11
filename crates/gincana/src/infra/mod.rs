pub mod bible;
pub mod json_file;
