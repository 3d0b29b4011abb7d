//! Terminal implementations of the list controller's collaborators.

use std::io::Write;

use async_trait::async_trait;
use client_core::{ConfirmationGate, ConfirmationRequest, Decision, Navigator, Notifier, Severity};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use url::form_urlencoded;

/// Prompts on stdin. Only `y`/`yes` accepts; EOF, read errors and anything
/// else reject.
pub struct TerminalConfirmation {
    assume_yes: bool,
}

impl TerminalConfirmation {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl ConfirmationGate for TerminalConfirmation {
    async fn confirm(&self, request: &ConfirmationRequest) -> Decision {
        if self.assume_yes {
            debug!(header = %request.header, "confirmation auto-accepted");
            return Decision::Accept;
        }

        print!("{}: {} [y/N] ", request.header, request.message);
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(_) => parse_answer(&line),
            Err(_) => Decision::Reject,
        }
    }
}

pub fn parse_answer(line: &str) -> Decision {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Decision::Accept,
        _ => Decision::Reject,
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => println!("{message}"),
            Severity::Error => eprintln!("error: {message}"),
        }
    }
}

/// The console has no sub-views; it prints where the operator would go.
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn go_to(&self, path: &str, params: &[(&str, String)]) {
        let target = route_with_params(path, params);
        info!(%target, "navigate");
        println!("-> {target}");
    }
}

pub fn route_with_params(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{path}?{query}")
}
