mod closure;
mod dfa_minimize;
mod machine;
mod nfa_to_dfa;
#[cfg(test)]
mod qc;
mod regex_to_nfa;
mod simulate;
pub mod stateid;
mod validate;

pub use closure::*;
pub use machine::*;
pub use regex_to_nfa::compile_regex;
pub use stateid::*;
pub use validate::*;
