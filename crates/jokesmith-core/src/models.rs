pub mod catalog;
pub mod evaluation;
pub mod history;
pub mod message;
pub mod parameters;
