use std::io::IsTerminal;

use async_trait::async_trait;
use launchgate_core::{Decision, PresentError, Presenter, Prompt, UserAction};
use log::warn;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;

/// Renders gates as a text prompt and reads the user's choice line by line.
pub struct TerminalPresenter<R, W> {
    io: Mutex<(R, W)>,
    has_target: fn() -> bool,
    open_url: fn(&str) -> std::io::Result<()>,
}

impl TerminalPresenter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self {
            io: Mutex::new((BufReader::new(tokio::io::stdin()), tokio::io::stdout())),
            has_target: || std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
            open_url: |url| open::that(url),
        }
    }
}

impl<R, W> TerminalPresenter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[cfg(test)]
    fn with_io(reader: R, writer: W, open_url: fn(&str) -> std::io::Result<()>) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
            has_target: || true,
            open_url,
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.io.into_inner().1
    }
}

fn title(decision: &Decision) -> &'static str {
    match decision {
        Decision::ShowAlert { blocking: true, .. } => "Notice",
        Decision::ShowAlert { .. } | Decision::NoAction => "Alert",
        Decision::ShowOptionalUpdate { .. } => "Update available",
        Decision::ShowRequiredUpdate { .. } => "Update required",
    }
}

fn choices(prompt: &Prompt) -> &'static str {
    match (prompt.offers_update(), prompt.is_dismissable()) {
        (true, true) => "[u]pdate / [d]ismiss: ",
        (true, false) => "[u]pdate: ",
        (false, true) => "[d]ismiss: ",
        (false, false) => "Press Enter to acknowledge: ",
    }
}

fn read_choice(prompt: &Prompt, line: &str) -> Option<UserAction> {
    let answer = line.trim().to_ascii_lowercase();
    if !prompt.offers_update() && !prompt.is_dismissable() {
        return Some(UserAction::Dismissed);
    }
    match answer.as_str() {
        "u" | "update" if prompt.offers_update() => Some(UserAction::AcceptedUpdate),
        "d" | "dismiss" if prompt.is_dismissable() => Some(UserAction::Dismissed),
        _ => None,
    }
}

#[async_trait]
impl<R, W> Presenter for TerminalPresenter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn present(&self, prompt: &Prompt) -> Result<UserAction, PresentError> {
        if !(self.has_target)() {
            return Err(PresentError::NoTarget);
        }
        let Some(message) = prompt.decision.message() else {
            return Ok(UserAction::Dismissed);
        };

        let mut io = self.io.lock().await;
        let (reader, writer) = &mut *io;

        writer
            .write_all(format!("\n{}\n{message}\n\n", title(&prompt.decision)).as_bytes())
            .await?;

        let action = loop {
            writer.write_all(choices(prompt).as_bytes()).await?;
            writer.flush().await?;

            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                // Input closed: the dialog went away without a choice.
                break UserAction::Dismissed;
            }
            if let Some(action) = read_choice(prompt, &line) {
                break action;
            }
        };

        if action == UserAction::AcceptedUpdate {
            let url = prompt.update_url.as_str();
            if let Err(error) = (self.open_url)(url) {
                warn!("Failed to open update page {url}: {error}");
                writer
                    .write_all(format!("Open {url} to update.\n").as_bytes())
                    .await?;
            }
        }

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use launchgate_core::{AlertSpec, UpdateSpec, Url};

    use super::*;

    fn prompt(decision: Decision) -> Prompt {
        Prompt {
            decision,
            update_url: Url::parse("https://apps.example.com/app/42").expect("valid test URL"),
        }
    }

    fn never_open(_url: &str) -> std::io::Result<()> {
        Err(std::io::Error::other("no browser in tests"))
    }

    fn open_ok(_url: &str) -> std::io::Result<()> {
        Ok(())
    }

    #[tokio::test]
    async fn optional_update_accepts_update_choice() {
        let presenter = TerminalPresenter::with_io(&b"x\nu\n"[..], Vec::new(), open_ok);
        let prompt = prompt(Decision::ShowOptionalUpdate {
            spec: UpdateSpec::new("Version 2.0 is out", "2.0"),
        });

        let action = presenter.present(&prompt).await.expect("prompt should succeed");
        let output = String::from_utf8(presenter.into_output()).expect("utf-8 output");

        assert_eq!(action, UserAction::AcceptedUpdate);
        assert!(output.contains("Update available"));
        assert!(output.contains("Version 2.0 is out"));
        assert_eq!(output.matches("[u]pdate / [d]ismiss").count(), 2);
    }

    #[tokio::test]
    async fn required_update_cannot_be_dismissed() {
        let presenter = TerminalPresenter::with_io(&b"d\nupdate\n"[..], Vec::new(), never_open);
        let prompt = prompt(Decision::ShowRequiredUpdate {
            spec: UpdateSpec::new("Please update", "2.0"),
        });

        let action = presenter.present(&prompt).await.expect("prompt should succeed");
        let output = String::from_utf8(presenter.into_output()).expect("utf-8 output");

        assert_eq!(action, UserAction::AcceptedUpdate);
        assert!(output.contains("Open https://apps.example.com/app/42 to update."));
    }

    #[tokio::test]
    async fn blocking_alert_is_acknowledged_with_any_line() {
        let presenter = TerminalPresenter::with_io(&b"\n"[..], Vec::new(), never_open);
        let prompt = prompt(Decision::ShowAlert {
            spec: AlertSpec::new("Service offline", true),
            blocking: true,
        });

        let action = presenter.present(&prompt).await.expect("prompt should succeed");
        let output = String::from_utf8(presenter.into_output()).expect("utf-8 output");

        assert_eq!(action, UserAction::Dismissed);
        assert!(output.contains("Press Enter to acknowledge"));
    }

    #[tokio::test]
    async fn closed_input_counts_as_dismissed() {
        let presenter = TerminalPresenter::with_io(&b""[..], Vec::new(), never_open);
        let prompt = prompt(Decision::ShowAlert {
            spec: AlertSpec::new("Maintenance", false),
            blocking: false,
        });

        let action = presenter.present(&prompt).await.expect("prompt should succeed");

        assert_eq!(action, UserAction::Dismissed);
    }

    #[test]
    fn read_choice_ignores_unavailable_buttons() {
        let alert = prompt(Decision::ShowAlert {
            spec: AlertSpec::new("Maintenance", false),
            blocking: false,
        });

        assert_eq!(read_choice(&alert, "u\n"), None);
        assert_eq!(read_choice(&alert, " D \n"), Some(UserAction::Dismissed));
    }
}
