//! Minimal HTML pages. Every interpolated value goes through [`escape`].

use crate::db::DbPasswordEntry;

pub fn register(messages: &[String]) -> String {
    layout(
        "Register",
        messages,
        r#"<form method="post" action="/register">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Register</button>
</form>
<p><a href="/login">Already registered? Log in</a></p>"#,
    )
}

pub fn login(messages: &[String]) -> String {
    layout(
        "Login",
        messages,
        r#"<form method="post" action="/login">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Log in</button>
</form>
<p><a href="/register">Create an account</a></p>"#,
    )
}

pub fn dashboard(messages: &[String], entries: &[DbPasswordEntry]) -> String {
    let mut body = String::from(
        r#"<p><a href="/logout">Log out</a></p>
<h2>Add password</h2>
<form method="post" action="/add_password">
  <label>Site name <input name="site_name" required></label>
  <label>Site URL <input name="site_url" required></label>
  <label>Password <input name="site_password" required></label>
  <button type="submit">Add</button>
</form>
<h2>Saved passwords</h2>
"#,
    );

    if entries.is_empty() {
        body.push_str("<p>No passwords stored yet.</p>\n");
    }
    for entry in entries {
        body.push_str(&format!(
            r#"<form method="post" action="/update_password/{id}">
  <input name="site_name" value="{name}" required>
  <input name="site_url" value="{url}" required>
  <input name="site_password" value="{password}" required>
  <button type="submit">Update</button>
</form>
"#,
            id = entry.id,
            name = escape(&entry.site_name),
            url = escape(&entry.site_url),
            password = escape(&entry.site_password),
        ));
    }

    layout("Dashboard", messages, &body)
}

fn layout(title: &str, messages: &[String], body: &str) -> String {
    let mut flashes = String::new();
    if !messages.is_empty() {
        flashes.push_str("<ul class=\"flashes\">\n");
        for m in messages {
            flashes.push_str(&format!("  <li>{}</li>\n", escape(m)));
        }
        flashes.push_str("</ul>\n");
    }
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{flashes}{body}\n</body>\n</html>\n"
    )
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
