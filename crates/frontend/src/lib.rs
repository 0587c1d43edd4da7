//! Front end analysis stage of the cobalt COBOL compiler.
//! Validates token streams against the COBOL grammar and builds the symbol table used by
//! later compilation phases.

pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;

#[cfg(test)]
mod tests;
