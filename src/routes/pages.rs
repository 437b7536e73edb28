//! Server-rendered pages.
//!
//! The markup is small enough to build with `format!`; each page goes through
//! [`page`] for the shared shell and nav. Anything that originated as user
//! input must pass through [`html_escape`] before it lands in a template.

use crate::models::User;

/// Escape the five characters that matter in HTML text and attribute values.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap page content in the shared document shell. The nav shows the
/// signed-in username with a logout link, or register/login links otherwise.
fn page(title: &str, user: Option<&User>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            r#"<span>{}</span> <a href="/auth/logout">Log Out</a>"#,
            html_escape(&user.username)
        ),
        None => String::from(
            r#"<a href="/auth/register">Register</a> <a href="/auth/login">Log In</a>"#,
        ),
    };
    format!(
        "<!doctype html>\n<html>\n<head><title>{title} - Basic Blog</title></head>\n\
         <body>\n<nav><h1>Basic Blog</h1>{nav}</nav>\n<section>\n{body}\n</section>\n\
         </body>\n</html>\n"
    )
}

fn flash_block(flash: Option<&str>) -> String {
    match flash {
        Some(message) => format!(r#"<div class="flash">{}</div>"#, html_escape(message)),
        None => String::new(),
    }
}

pub fn index(user: Option<&User>) -> String {
    let greeting = match user {
        Some(user) => format!("Hello, {}!", html_escape(&user.username)),
        None => String::from("Hello, World!"),
    };
    page("Home", user, &format!("<p>{greeting}</p>"))
}

pub fn register(flash: Option<&str>) -> String {
    let body = format!(
        "{}\n<form method=\"post\">\n\
         <label for=\"username\">Username</label>\n\
         <input name=\"username\" id=\"username\" required>\n\
         <label for=\"password\">Password</label>\n\
         <input type=\"password\" name=\"password\" id=\"password\" required>\n\
         <input type=\"submit\" value=\"Register\">\n</form>",
        flash_block(flash)
    );
    page("Register", None, &body)
}

pub fn login(flash: Option<&str>) -> String {
    let body = format!(
        "{}\n<form method=\"post\">\n\
         <label for=\"username\">Username</label>\n\
         <input name=\"username\" id=\"username\" required>\n\
         <label for=\"password\">Password</label>\n\
         <input type=\"password\" name=\"password\" id=\"password\" required>\n\
         <input type=\"submit\" value=\"Log In\">\n</form>",
        flash_block(flash)
    );
    page("Log In", None, &body)
}

pub fn profile(user: &User) -> String {
    let body = format!(
        "<p>Signed in as <strong>{}</strong> (id {}).</p>",
        html_escape(&user.username),
        user.id
    );
    page("Profile", Some(user), &body)
}
