pub mod book;
pub mod reading;
