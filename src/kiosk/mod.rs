pub mod core;
pub mod render;
pub mod run;
pub mod runtime;
