//! Command-line surface: four positional arguments in, progress lines and a JSON result out.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use crate::client::GoogleVoiceError;
use crate::domain::{SendRequest, SendResult};
use crate::sender::{Provider, Sender, failed};

const BIN_NAME: &str = "send_sms";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = BIN_NAME,
    about = "Send one SMS through a Google Voice account",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// Recipient phone number
    pub phone: String,

    /// Message text
    pub message: String,

    /// Google account email
    pub email: String,

    /// Google account password or app password
    pub password: String,
}

impl From<Args> for SendRequest {
    fn from(args: Args) -> Self {
        SendRequest::new(args.phone, args.message, args.email, args.password)
    }
}

/// How a run ended, as far as the process exit status is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// A result was printed, whether the send succeeded or not.
    Completed,
    /// Wrong number of arguments; only usage text was printed.
    Usage,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Completed => ExitCode::SUCCESS,
            Exit::Usage => ExitCode::from(1),
        }
    }
}

/// Parse the arguments that follow the program name. `None` means usage should be shown.
pub fn parse_args<I, T>(args: I) -> Option<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() != 4 {
        return None;
    }
    // Everything after `--` is positional, so values like "-5 degrees" stay values.
    let argv = [OsString::from(BIN_NAME), OsString::from("--")]
        .into_iter()
        .chain(args);
    Args::try_parse_from(argv).ok()
}

pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Usage: {BIN_NAME} <phone> <message> <email> <password>")?;
    writeln!(
        out,
        "Example: {BIN_NAME} \"6125551234\" \"Your message\" \"user@example.com\" \"your_password\""
    )
}

pub fn write_result<W: Write>(out: &mut W, result: &SendResult) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    writeln!(out, "{json}")
}

/// Run one invocation against the provider produced by `connect`.
///
/// `connect` is only called for a well-formed invocation. A provider that cannot be built
/// is reported like any other send failure.
pub async fn run<I, T, P, F, W>(args: I, connect: F, out: &mut W) -> io::Result<Exit>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    P: Provider,
    F: FnOnce() -> Result<P, GoogleVoiceError>,
    W: Write,
{
    let Some(args) = parse_args(args) else {
        write_usage(out)?;
        return Ok(Exit::Usage);
    };
    let request = SendRequest::from(args);

    let result = match connect() {
        Ok(provider) => Sender::new(provider).send(&request, out).await?,
        Err(err) => {
            writeln!(out, "Error: {err}")?;
            failed(&err)
        }
    };

    write_result(out, &result)?;
    out.flush()?;
    Ok(Exit::Completed)
}

#[cfg(test)]
mod tests {
    use crate::domain::DeliveryReceipt;
    use crate::sender::tests::FakeProvider;

    use super::*;

    fn last_json(out: &[u8]) -> serde_json::Value {
        let text = std::str::from_utf8(out).unwrap();
        let start = text.find("\n{").map(|it| it + 1).unwrap_or(0);
        serde_json::from_str(&text[start..]).unwrap()
    }

    #[test]
    fn parse_args_requires_exactly_four() {
        for count in [0, 1, 2, 3, 5, 6] {
            let args = vec!["x"; count];
            assert_eq!(parse_args(args), None, "count {count}");
        }

        let args = parse_args(["6125551234", "Hello", "user@example.com", "secret"]).unwrap();
        assert_eq!(args.phone, "6125551234");
        assert_eq!(args.message, "Hello");
        assert_eq!(args.email, "user@example.com");
        assert_eq!(args.password, "secret");
    }

    #[test]
    fn parse_args_accepts_hyphen_values() {
        let args = parse_args(["6125551234", "-5 degrees", "user@example.com", "--pw"]).unwrap();
        assert_eq!(args.message, "-5 degrees");
        assert_eq!(args.password, "--pw");
    }

    #[tokio::test]
    async fn wrong_arity_prints_usage_only() {
        let mut out = Vec::new();
        let exit = run(
            ["6125551234", "Hello", "user@example.com"],
            || -> Result<FakeProvider, GoogleVoiceError> { panic!("must not connect") },
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(exit, Exit::Usage);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Usage: send_sms <phone> <message> <email> <password>\n"));
        assert!(!text.contains('{'));
    }

    #[tokio::test]
    async fn successful_send_prints_expected_json() {
        let mut out = Vec::new();
        let exit = run(
            ["6125551234", "Hello", "user@example.com", "secret"],
            || Ok(FakeProvider::accepting(DeliveryReceipt::default())),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(exit, Exit::Completed);
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("Sending SMS to: 6125551234\n"));
        assert!(text.ends_with(
            r#"{
  "success": true,
  "message": "SMS sent successfully",
  "to": "6125551234",
  "from": "user@example.com",
  "timestamp": ""
}
"#
        ));
    }

    #[tokio::test]
    async fn failed_send_still_completes_with_error_json() {
        let mut out = Vec::new();
        let exit = run(
            ["6125551234", "Hello", "user@example.com", "wrong"],
            || Ok(FakeProvider::failing_auth("bad credentials")),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(exit, Exit::Completed);
        let json = last_json(&out);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to send SMS");
        assert!(!json["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_construction_failure_is_reported_as_result() {
        let mut out = Vec::new();
        let exit = run(
            ["6125551234", "Hello", "user@example.com", "secret"],
            || -> Result<FakeProvider, GoogleVoiceError> {
                Err(GoogleVoiceError::Auth("no client".to_owned()))
            },
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(exit, Exit::Completed);
        let json = last_json(&out);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "authentication failed: no client");
    }
}
