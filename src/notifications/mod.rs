//! Arrival notifications
//!
//! Renders a new-arrival event into the fixed-structure HTML message and
//! delivers it through the [`NotificationSink`] seam. Delivery is
//! best-effort at-most-once: the monitor loop logs failures and moves on,
//! it never retries inside a tick and never rolls back committed state.

pub mod types;

use crate::errors::DeliveryError;
use crate::resolver::CountryInfo;
use crate::utils::html_escape;
use std::sync::Arc;

pub use types::{ArrivalEvent, NotificationSink};

/// Render the notification text for a new arrival
///
/// Layout is a formatting contract with the chat transport's HTML parse
/// mode: a bold header (flag, code, service, country, phone) and a code
/// body line.
pub fn render_arrival(event: &ArrivalEvent, country: &CountryInfo, service: &str) -> String {
    let header = format!(
        "<b>{} {} • {} • {} • <code>{}</code></b>",
        country.flag,
        country.code,
        service,
        country.display_name,
        html_escape(&event.phone_number)
    );
    format!("{}\n└ <code>{}</code>", header, html_escape(&event.message))
}

/// Dispatcher over a notification sink
pub struct Dispatcher<S: NotificationSink> {
    sink: Arc<S>,
}

impl<S: NotificationSink> Dispatcher<S> {
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    /// Render and deliver one arrival notification
    pub async fn dispatch(
        &self,
        event: &ArrivalEvent,
        country: &CountryInfo,
        service: &str,
    ) -> Result<(), DeliveryError> {
        let text = render_arrival(event, country, service);
        self.sink.send(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ArrivalEvent {
        ArrivalEvent {
            range: "Indonesia (+62)".to_string(),
            phone_number: "6281234567".to_string(),
            message: "Your WhatsApp code is 123456".to_string(),
        }
    }

    fn sample_country() -> CountryInfo {
        CountryInfo {
            flag: "🇮🇩".to_string(),
            code: "ID".to_string(),
            display_name: "Indonesia".to_string(),
        }
    }

    #[test]
    fn test_render_layout() {
        let text = render_arrival(&sample_event(), &sample_country(), "WhatsApp");
        let mut lines = text.lines();
        let header = lines.next().expect("header line");
        let body = lines.next().expect("body line");
        assert!(lines.next().is_none());

        assert!(header.starts_with("<b>🇮🇩 ID • WhatsApp • Indonesia"));
        assert!(header.contains("<code>6281234567</code>"));
        assert!(body.starts_with("└ <code>"));
        assert!(body.contains("Your WhatsApp code is 123456"));
    }

    #[test]
    fn test_render_escapes_html() {
        let mut event = sample_event();
        event.message = "<script>&".to_string();
        let text = render_arrival(&event, &sample_country(), "Other");
        assert!(text.contains("&lt;script&gt;&amp;"));
        assert!(!text.contains("<script>"));
    }
}
