//! Small HTML helpers shared by pages and emails.

/// Escape text for use in HTML content and attribute values.
pub fn escape(s: &str) -> String {
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

/// A centered card page, used for owner action results.
pub fn card_page(title: &str, heading_color: &str, paragraphs: &[String]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
      body {{ font-family: sans-serif; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #fcfaf8; color: #1c1917; }}
      .card {{ background: white; padding: 40px; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.05); text-align: center; max-width: 480px; }}
      h1 {{ color: {heading_color}; margin-bottom: 10px; }}
    </style>
  </head>
  <body>
    <div class="card">
      <h1>{title}</h1>
      {body}
    </div>
  </body>
</html>"#,
        title = escape(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_card_page_escapes_title() {
        let page = card_page("<Oops>", "#dc2626", &["Body".to_string()]);
        assert!(page.contains("<h1>&lt;Oops&gt;</h1>"));
        assert!(page.contains("<p>Body</p>"));
    }
}
