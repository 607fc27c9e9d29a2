//! Terminal dialogs: stdout notices, stdin confirmations, system browser.

use geosample_core::{UrlOpener, UserInterface};
use log::warn;
use std::io::{BufRead, Write};

/// Dialog host for an interactive terminal session.
pub struct TerminalUi {
    /// Answers every confirmation with yes (`--yes`).
    pub assume_yes: bool,
}

impl UrlOpener for TerminalUi {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        println!("{url}");
        webbrowser::open(url)
    }
}

impl UserInterface for TerminalUi {
    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{question} [s/N] ");
        if let Err(err) = std::io::stdout().flush() {
            warn!("event=confirm_prompt module=cli status=error error={err}");
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                warn!("event=confirm_prompt module=cli status=error error={err}");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}
