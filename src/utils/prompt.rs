use std::io::{self, BufRead, Write};
use log::warn;

/// Blocking user interaction: alerts and yes/no questions.
pub trait Prompter: Send + Sync {
    fn alert(&self, message: &str);

    fn confirm(&self, question: &str) -> bool;
}

/// Prompts on the terminal. With `assume_yes` every question is answered yes
/// without reading stdin.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        TerminalPrompter { assume_yes }
    }
}

impl Prompter for TerminalPrompter {
    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [s/N] ", question);
        if let Err(e) = io::stdout().flush() {
            warn!("Could not flush stdout: {}", e);
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!("Could not read the answer: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("s\n"));
        assert!(is_yes(" Sí "));
        assert!(is_yes("yes"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[test]
    fn assume_yes_never_reads_stdin() {
        assert!(TerminalPrompter::new(true).confirm("¿Seguro?"));
    }
}
