// Terminal UI adapter: turns typed lines into controller commands and renders notices.

pub mod quote_shell;
pub mod symptom_shell;
