use std::process::{Command, Output};

fn send_sms(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_send_sms"))
        .args(args)
        .output()
        .expect("run send_sms")
}

#[test]
fn wrong_argument_count_prints_usage_and_exits_1() {
    let cases: [&[&str]; 5] = [
        &[],
        &["6125551234"],
        &["6125551234", "Hello"],
        &["6125551234", "Hello", "user@example.com"],
        &["6125551234", "Hello", "user@example.com", "secret", "extra"],
    ];

    for args in cases {
        let output = send_sms(args);
        assert_eq!(output.status.code(), Some(1), "args: {args:?}");

        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.starts_with("Usage: send_sms"), "stdout: {stdout}");
        assert!(stdout.contains("Example: send_sms"), "stdout: {stdout}");
        assert!(!stdout.contains("\"success\""), "stdout: {stdout}");
    }
}

#[test]
fn invalid_input_still_prints_failure_json_and_exits_0() {
    // Blank message is rejected before any network traffic.
    let output = send_sms(&["6125551234", "   ", "user@example.com", "secret"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find("\n{").map(|it| it + 1).expect("json in stdout");
    let json: serde_json::Value = serde_json::from_str(&stdout[start..]).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to send SMS");
    assert!(!json["error"].as_str().unwrap().is_empty());
}
