//! Status page served on `/`.

use url::Url;

const REDACTED: &str = "REDACTED";

#[derive(Debug, Clone)]
pub struct StatusPage {
    project: String,
    topic: String,
    subscription: String,
    endpoint: String,
}

impl StatusPage {
    /// `endpoint` is the full push endpoint; its token is redacted here and
    /// never kept.
    pub fn new(
        project: impl Into<String>,
        topic: impl Into<String>,
        subscription: impl Into<String>,
        endpoint: &Url,
    ) -> Self {
        Self {
            project: project.into(),
            topic: topic.into(),
            subscription: subscription.into(),
            endpoint: redact_token(endpoint),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn render(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Pub/Sub relay</title>
</head>
<body>
  <h1>Pub/Sub relay</h1>
  <dl>
    <dt>Project</dt><dd id="project">{project}</dd>
    <dt>Topic</dt><dd id="topic">{topic}</dd>
    <dt>Subscription</dt><dd id="subscription">{subscription}</dd>
    <dt>Push endpoint</dt><dd id="endpoint">{endpoint}</dd>
  </dl>
  <form method="post" action="/send_message">
    <input type="text" name="message">
    <input type="submit" value="Send">
  </form>
  <p>Recent messages: <a href="/fetch_messages">/fetch_messages</a></p>
</body>
</html>
"#,
            project = escape_html(&self.project),
            topic = escape_html(&self.topic),
            subscription = escape_html(&self.subscription),
            endpoint = escape_html(&self.endpoint),
        )
    }
}

/// Replace the value of every `token` query parameter with `REDACTED`.
pub fn redact_token(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "token" {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
