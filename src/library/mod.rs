pub mod line_format;
pub mod logger;
pub mod state_machine;
