use std::time::Duration;

use gvoice_sms::{GoogleVoiceClient, GoogleVoiceError, SendRequest, Sender};
use httpmock::prelude::*;

const LOGIN_PAGE: &str = r#"
<html><body>
  <form id="gaia_loginform" method="post">
    <input type="hidden" name="GALX" value="galx-42">
    <input type="email" name="Email" value="">
  </form>
</body></html>
"#;

const VOICE_PAGE: &str = r#"
<html><body>
  <form><input type="hidden" name="_rnr_se" value="rnr-se-token"></form>
</body></html>
"#;

fn client_for(server: &MockServer) -> GoogleVoiceClient {
    GoogleVoiceClient::builder()
        .login_page_endpoint(server.url("/ServiceLogin"))
        .login_endpoint(server.url("/ServiceLoginAuth"))
        .send_endpoint(server.url("/voice/sms/send/"))
        .timeout(Duration::from_secs(10))
        .build()
        .expect("client")
}

#[tokio::test]
async fn full_send_over_http_reports_success() {
    let server = MockServer::start_async().await;

    let login_page = server.mock(|when, then| {
        when.method(GET).path("/ServiceLogin");
        then.status(200).body(LOGIN_PAGE);
    });
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/ServiceLoginAuth")
            .is_true(|req| {
                let body = String::from_utf8_lossy(req.body().as_ref());
                body.contains("GALX=galx-42") && body.contains("Email=user%40example.com")
            });
        then.status(200)
            .header("set-cookie", "SID=session-cookie; Path=/")
            .body(VOICE_PAGE);
    });
    let send = server.mock(|when, then| {
        when.method(POST)
            .path("/voice/sms/send/")
            .header("cookie", "SID=session-cookie")
            .is_true(|req| {
                let body = String::from_utf8_lossy(req.body().as_ref());
                body.contains("_rnr_se=rnr-se-token") && body.contains("phoneNumber=%2B16125551234")
            });
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"ok":true,"data":{"code":0},"timestamp":1700000000}"#);
    });

    let sender = Sender::new(client_for(&server));
    let request = SendRequest::new("6125551234", "Hello", "user@example.com", "secret");
    let mut trail = Vec::new();

    let result = sender.send(&request, &mut trail).await.expect("trail");

    assert!(result.is_success(), "{result:?}");
    assert_eq!(result.delivered_to(), Some("6125551234"));
    assert_eq!(result.sent_from(), Some("user@example.com"));
    assert_eq!(result.provider_timestamp(), Some("1700000000"));
    login_page.assert_calls(1);
    login.assert_calls(1);
    send.assert_calls(1);
}

#[tokio::test]
async fn rejected_login_never_sends() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(GET).path("/ServiceLogin");
        then.status(200).body(LOGIN_PAGE);
    });
    server.mock(|when, then| {
        when.method(POST).path("/ServiceLoginAuth");
        then.status(200).body("<html>Wrong password. Try again.</html>");
    });
    let send = server.mock(|when, then| {
        when.method(POST).path("/voice/sms/send/");
        then.status(200).body(r#"{"ok":true}"#);
    });

    let sender = Sender::new(client_for(&server));
    let request = SendRequest::new("6125551234", "Hello", "user@example.com", "wrong");
    let mut trail = Vec::new();

    let result = sender.send(&request, &mut trail).await.expect("trail");

    assert!(!result.is_success());
    assert!(
        result
            .error_detail()
            .is_some_and(|detail| detail.starts_with("authentication failed")),
        "{result:?}"
    );
    send.assert_calls(0);
}

#[tokio::test]
async fn server_error_on_send_is_http_status() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(GET).path("/ServiceLogin");
        then.status(200).body(LOGIN_PAGE);
    });
    server.mock(|when, then| {
        when.method(POST).path("/ServiceLoginAuth");
        then.status(200).body(VOICE_PAGE);
    });
    server.mock(|when, then| {
        when.method(POST).path("/voice/sms/send/");
        then.status(500).body("boom");
    });

    let client = client_for(&server);
    let email = gvoice_sms::Email::new("user@example.com").unwrap();
    let password = gvoice_sms::Password::new("secret").unwrap();
    let session = client.login(&email, &password).await.expect("session");

    let err = client
        .send_sms(
            &session,
            &gvoice_sms::Destination::new("6125551234").unwrap(),
            &gvoice_sms::MessageText::new("Hello").unwrap(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GoogleVoiceError::HttpStatus {
            status: 500,
            body: Some(ref body)
        } if body == "boom"
    ));
}
