//! Operator confirmation for actions the model marks as sensitive

use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use super::SafetyDecision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyVerdict {
    Proceed,
    Terminate,
}

/// Source of operator verdicts
///
/// The agent awaits `confirm` before executing any action that carries a
/// safety decision. Implementations may block indefinitely.
#[async_trait]
pub trait SafetyGate: Send + Sync {
    async fn confirm(&self, decision: &SafetyDecision) -> SafetyVerdict;
}

/// Case-insensitive `y`/`yes`/`n`/`no`; anything else is `None`
pub fn parse_verdict(answer: &str) -> Option<SafetyVerdict> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(SafetyVerdict::Proceed),
        "n" | "no" => Some(SafetyVerdict::Terminate),
        _ => None,
    }
}

/// Ask until the operator gives a recognized answer
///
/// End of input counts as a refusal.
pub fn prompt_verdict<R: BufRead, W: Write>(
    decision: &SafetyDecision,
    input: &mut R,
    output: &mut W,
) -> io::Result<SafetyVerdict> {
    writeln!(output, "\n[Safety] Confirmation required:")?;
    writeln!(output, "{}", decision.message())?;

    let mut line = String::new();
    loop {
        write!(output, "Proceed? [Y]es/[N]o: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(SafetyVerdict::Terminate);
        }
        if let Some(verdict) = parse_verdict(&line) {
            return Ok(verdict);
        }
    }
}

/// Prompts on stdout and reads stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSafetyGate;

#[async_trait]
impl SafetyGate for ConsoleSafetyGate {
    async fn confirm(&self, decision: &SafetyDecision) -> SafetyVerdict {
        let decision = decision.clone();
        let answer = tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            let stdout = io::stdout();
            prompt_verdict(&decision, &mut stdin.lock(), &mut stdout.lock())
        })
        .await;

        match answer {
            Ok(Ok(verdict)) => {
                info!("Operator verdict: {:?}", verdict);
                verdict
            }
            Ok(Err(e)) => {
                warn!("Safety prompt failed, terminating: {}", e);
                SafetyVerdict::Terminate
            }
            Err(e) => {
                warn!("Safety prompt task failed, terminating: {}", e);
                SafetyVerdict::Terminate
            }
        }
    }
}

/// Print `prompt` and read one line from stdin off the async runtime
///
/// `Ok(None)` on end of input.
pub async fn read_console_line(prompt: String) -> io::Result<Option<String>> {
    tokio::task::spawn_blocking(move || {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decision(explanation: Option<&str>) -> SafetyDecision {
        SafetyDecision {
            explanation: explanation.map(str::to_string),
        }
    }

    #[test]
    fn verdict_tokens() {
        for yes in ["y", "Y", "yes", "YES", " Yes \n"] {
            assert_eq!(parse_verdict(yes), Some(SafetyVerdict::Proceed));
        }
        for no in ["n", "N", "no", "No\r\n"] {
            assert_eq!(parse_verdict(no), Some(SafetyVerdict::Terminate));
        }
        for other in ["", "maybe", "yep", "0"] {
            assert_eq!(parse_verdict(other), None);
        }
    }

    #[test]
    fn reprompts_until_recognized() {
        let mut input = Cursor::new("sure\n\nyes\n");
        let mut output = Vec::new();
        let verdict =
            prompt_verdict(&decision(Some("Submit the order")), &mut input, &mut output).unwrap();
        assert_eq!(verdict, SafetyVerdict::Proceed);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("[Safety] Confirmation required:"));
        assert!(shown.contains("Submit the order"));
        assert_eq!(shown.matches("Proceed? [Y]es/[N]o: ").count(), 3);
    }

    #[test]
    fn fallback_notice_is_shown() {
        let mut input = Cursor::new("n\n");
        let mut output = Vec::new();
        let verdict = prompt_verdict(&decision(None), &mut input, &mut output).unwrap();
        assert_eq!(verdict, SafetyVerdict::Terminate);
        assert!(String::from_utf8(output)
            .unwrap()
            .contains(SafetyDecision::FALLBACK_NOTICE));
    }

    #[test]
    fn end_of_input_terminates() {
        let mut input = Cursor::new("what\n");
        let mut output = Vec::new();
        let verdict = prompt_verdict(&decision(None), &mut input, &mut output).unwrap();
        assert_eq!(verdict, SafetyVerdict::Terminate);
    }
}
