pub mod assembler;
pub mod tokenizer;
pub mod verifier;
