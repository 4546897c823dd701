pub mod batch;
pub mod config;
pub mod geometry;
pub mod input;
pub mod report;
pub mod skeleton;
pub mod validator;
