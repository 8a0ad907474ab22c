// src/views/login.rs

use crate::views::layout::{escape_html, page};

/// Hands tokens from a magic-link fragment to the server
const SESSION_SCRIPT: &str = "if(location.hash.indexOf('access_token=')>=0){var p=new URLSearchParams(location.hash.slice(1));var f=document.getElementById('session');f.access_token.value=p.get('access_token');f.refresh_token.value=p.get('refresh_token')||'';f.expires_in.value=p.get('expires_in')||'';history.replaceState(null,'',location.pathname);f.submit();}";

/// Login form; one form, three actions picked by the submit button
pub fn login_page(email: &str, message: Option<&str>) -> String {
    let message = message
        .filter(|m| !m.is_empty())
        .map(|m| format!(r#"<p class="status">{}</p>"#, escape_html(m)))
        .unwrap_or_default();

    let body = format!(
        r#"<section style="max-width:360px">
<h1>Đăng nhập</h1>
<form method="post" action="/login">
<p><input name="email" type="email" placeholder="Email" value="{email}" required></p>
<p><input name="password" type="password" placeholder="Mật khẩu"></p>
<p><button type="submit">Đăng nhập</button></p>
<p><button type="submit" formaction="/login/signup">Đăng ký (email + password)</button></p>
<p><button type="submit" formaction="/login/magic-link">Gửi magic link</button></p>
</form>
{message}
<form id="session" method="post" action="/login/session" hidden>
<input type="hidden" name="access_token">
<input type="hidden" name="refresh_token">
<input type="hidden" name="expires_in">
</form>
<script>{script}</script>
</section>"#,
        email = escape_html(email),
        message = message,
        script = SESSION_SCRIPT,
    );
    page("Đăng nhập", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page_keeps_email_and_message() {
        let html = login_page("a@b.c", Some("Invalid login credentials"));
        assert!(html.contains(r#"value="a@b.c""#));
        assert!(html.contains("Invalid login credentials"));
        assert!(html.contains(r#"formaction="/login/magic-link""#));
        assert!(!login_page("", None).contains(r#"class="status""#));
    }
}
