//! Terminal stand-ins for the browser surfaces: dialogs, toasts, navigation.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use filmoteka_runtime::confirm::ConfirmationGate;
use filmoteka_runtime::navigator::{Navigation, Navigator};
use filmoteka_runtime::toast::{Notifier, Toast};

pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, to: Navigation) {
        match to {
            Navigation::Goto(url) => println!("→ {url}"),
            Navigation::Reload => println!("↻ обновление страницы"),
        }
    }
}

/// Answer every dialog the gate shows, either automatically or from stdin.
pub fn answer_prompts(gate: Arc<ConfirmationGate>, assume_yes: bool) -> JoinHandle<()> {
    let mut shown = gate.subscribe();
    tokio::spawn(async move {
        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        while shown.changed().await.is_ok() {
            let Some(current) = shown.borrow_and_update().clone() else {
                continue;
            };
            println!("{}\n{}", current.dialog.title, current.dialog.message);
            if assume_yes {
                println!("{} [y/N] y", current.dialog.confirm_label);
                gate.answer(true);
                continue;
            }
            println!("{} [y/N]", current.dialog.confirm_label);
            let confirmed = match stdin.next_line().await {
                Ok(Some(line)) => matches!(line.trim(), "y" | "Y" | "д" | "Д"),
                Ok(None) => false,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read answer");
                    false
                }
            };
            gate.answer(confirmed);
        }
    })
}

/// Prints toasts shown since the last drain.
pub struct ToastPrinter {
    shown: broadcast::Receiver<Toast>,
}

impl ToastPrinter {
    pub fn new(notifier: &Notifier) -> Self {
        Self {
            shown: notifier.subscribe(),
        }
    }

    pub fn drain(&mut self) {
        loop {
            match self.shown.try_recv() {
                Ok(toast) => println!("[{}] {}", toast.kind, toast.message),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Toast printer lagged");
                }
                Err(_) => break,
            }
        }
    }
}
