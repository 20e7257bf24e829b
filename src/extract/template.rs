//! Fixed HTML shell wrapped around every extracted page
//!
//! The shell is byte-identical for all pages apart from the title and the
//! body.

/// Stylesheet embedded in every normalized page
pub const STYLESHEET: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.6; }
        img { max-width: 100%; height: auto; }
        pre { background-color: #f6f8fa; padding: 1em; border-radius: 5px; overflow-x: auto; }
        code { font-family: monospace; }
        h1 { font-size: 2em; color: #333; }
        h2 { font-size: 1.5em; color: #444; }
        h3 { font-size: 1.17em; color: #555; }
        table { border-collapse: collapse; width: 100%; }
        table, th, td { border: 1px solid #ddd; }
        th, td { padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
        a { color: #0366d6; text-decoration: none; }
        a:hover { text-decoration: underline; }
"#;

/// Wraps a body fragment in the normalized document shell
///
/// The title is HTML-escaped; the body is inserted verbatim.
pub fn wrap_document(title: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + STYLESHEET.len() + 256);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!(
        "    <title>{}</title>\n",
        html_escape::encode_text(title)
    ));
    html.push_str("    <style>");
    html.push_str(STYLESHEET);
    html.push_str("    </style>\n</head>\n<body>\n");
    html.push_str(body);
    html.push_str("\n</body>\n</html>\n");

    html
}
