pub mod input;
pub mod plan;
pub mod profile;
