pub mod content;
pub mod parser;
pub mod record;
pub mod tags;
pub mod timestamp;
