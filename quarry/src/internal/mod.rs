pub mod fsx;
pub mod lazy_directory_creator;
pub mod wildcard;
