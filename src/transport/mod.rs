//! Transport layer: HTTP and wire-format details (form encoding, HTML scraping, JSON decoding).

mod login;
mod send_sms;

pub use login::{GALX_FIELD, encode_login_form, scrape_input_value, scrape_rnr_se};
pub use send_sms::{SendOutcome, decode_send_sms_json_response, encode_send_sms_form};
