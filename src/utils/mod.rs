pub mod cooldown;
pub mod log_error;
