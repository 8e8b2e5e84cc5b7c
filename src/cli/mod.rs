pub mod export;
pub mod srt;
