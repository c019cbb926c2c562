//! HTML for the token generator page.

const PAGE_TOP: &str = r#"<!DOCTYPE html>
<html><head>
<style>.error{color:#ff0000;} .ack{color:#0000ff;}</style><title>reCAPTCHA Test</title></head>
<body><div style="width:100%"><div style="width: 50%;margin: 0 auto;">
<h3>reCAPTCHA Test</h3>
<p>This is a token generator</p>
"#;

const PAGE_BOTTOM: &str = "</div></div></body></html>\n";

/// A message shown above the form after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Ack(String),
    Error(String),
}

/// Whether `key` can be placed verbatim in the script URL and the
/// `grecaptcha.execute` string literal. Issued keys are URL-safe base64.
pub fn is_valid_site_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Render the page with the widget bound to `site_key`.
///
/// Callers are expected to have checked the key with [`is_valid_site_key`];
/// escaping here only keeps the markup well-formed.
pub fn render(site_key: &str, notice: Option<&Notice>) -> String {
    let key = escape_html(site_key);
    let mut page = String::with_capacity(2048);
    page.push_str(PAGE_TOP);

    match notice {
        Some(Notice::Ack(msg)) => {
            page.push_str(&format!("<p class=\"ack\">{}</p>\n", escape_html(msg)));
        }
        Some(Notice::Error(msg)) => {
            page.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(msg)));
        }
        None => {}
    }

    page.push_str(&format!(
        r#"<script src="https://www.google.com/recaptcha/api.js?render={key}"></script>
<script>
  function generateToken() {{
    grecaptcha.execute('{key}', {{action: 'submit'}}).then(function(token) {{
      document.getElementById("g-recaptcha-response").value = token;
    }});
  }}
  grecaptcha.ready(generateToken);
</script>
<form method="post" action="/">
<textarea id="g-recaptcha-response" name="g-recaptcha-response" style="margin: 0px; width: 600px; height: 100px;"></textarea>
<br>
<button type="button" onclick="generateToken()">Generate new token</button>
<button type="submit" name="button" value="verify">Verify token</button>
</form>
"#
    ));

    page.push_str(PAGE_BOTTOM);
    page
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
