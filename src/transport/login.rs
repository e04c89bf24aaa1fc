use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Email, Password};

/// Google service name for Voice.
pub const SERVICE: &str = "grandcentral";
/// Where the login form sends the browser once the credentials are accepted.
pub const CONTINUE_URL: &str = "https://www.google.com/voice/account/signin";

/// Hidden anti-forgery field on the login form.
pub const GALX_FIELD: &str = "GALX";
/// Hidden per-account token on Voice pages, required by send calls.
pub const RNR_SE_FIELD: &str = "_rnr_se";

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("input tag pattern"));
static NAME_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bname\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("name attribute pattern")
});
static VALUE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bvalue\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("value attribute pattern")
});

/// Value of the first `<input name="{name}" value="...">` in `html`, if any.
pub fn scrape_input_value(html: &str, name: &str) -> Option<String> {
    INPUT_TAG.find_iter(html).find_map(|tag| {
        let tag = tag.as_str();
        let found = attribute(&NAME_ATTR, tag)?;
        if found != name {
            return None;
        }
        attribute(&VALUE_ATTR, tag).map(str::to_owned)
    })
}

fn attribute<'a>(pattern: &Regex, tag: &'a str) -> Option<&'a str> {
    let captures = pattern.captures(tag)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|it| it.as_str())
}

pub fn scrape_rnr_se(html: &str) -> Option<String> {
    scrape_input_value(html, RNR_SE_FIELD).filter(|token| !token.trim().is_empty())
}

pub fn encode_login_form(
    email: &Email,
    password: &Password,
    galx: Option<&str>,
) -> Vec<(String, String)> {
    let mut params = vec![
        (Email::FIELD.to_owned(), email.as_str().to_owned()),
        (Password::FIELD.to_owned(), password.as_str().to_owned()),
        ("continue".to_owned(), CONTINUE_URL.to_owned()),
        ("service".to_owned(), SERVICE.to_owned()),
    ];
    if let Some(galx) = galx {
        params.push((GALX_FIELD.to_owned(), galx.to_owned()));
    }
    params
}
