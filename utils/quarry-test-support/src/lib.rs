pub mod command;
pub mod fsx;
pub mod predicates;
pub mod project_builder;
