pub mod ports;
pub mod security;
pub mod use_cases;
