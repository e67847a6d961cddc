pub mod console_service;
pub mod display;
pub mod poller_service;
