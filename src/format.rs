//! Request and response log rendering
//!
//! Pure text renderers for the two lines logged per exchange: the request
//! as prepared and the response as received. Rendering never fails; absent
//! bodies and unprintable header values come out empty.

use crate::http::{RequestRecord, Response};

/// Render a prepared request
///
/// First line is `METHOD URL`, followed by one `name: value` line per
/// header and the serialized body, if any.
pub fn request(record: &RequestRecord) -> String {
    let mut text = format!("{} {}\n", record.method, record.url);
    for (name, value) in &record.headers {
        text.push_str(&format!("{name}: {}\n", value.to_str().unwrap_or("")));
    }
    if let Some(body) = &record.body {
        text.push_str(&String::from_utf8_lossy(body));
    }
    text
}

/// Render a completed response
///
/// First line is the status code, followed by one `name: value` line per
/// header, a blank separator line and the body text.
pub fn response(response: &Response) -> String {
    let mut text = format!("{}\n", response.status().as_u16());
    for (name, value) in response.headers() {
        text.push_str(&format!("{name}: {}\n", value.to_str().unwrap_or("")));
    }
    text.push('\n');
    text.push_str(&response.text());
    text
}
