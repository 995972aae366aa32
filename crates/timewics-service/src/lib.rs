pub mod calendar;
pub mod error;
pub mod event;
pub mod export;
