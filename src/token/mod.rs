pub mod algorithm;
pub mod codec;
