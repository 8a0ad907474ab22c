// src/views/layout.rs
// DOCUMENTATION: Shared page chrome
// PURPOSE: HTML escaping, public layout and the admin shell with its sidebar

/// Escape text for element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

const SITE_NAME: &str = "Nhut Quang & Hai Yen";

const STYLE: &str = r#"<style>
body{margin:0;font-family:system-ui,sans-serif;color:#262626;background:#fff}
a{color:inherit}
header.site{position:sticky;top:0;display:flex;justify-content:space-between;align-items:center;padding:0 16px;height:56px;border-bottom:1px solid #eee;background:#fffc}
header.site nav a{margin-left:12px;font-size:14px;text-decoration:none}
.brand{font-size:13px;letter-spacing:.35em;text-transform:uppercase;text-decoration:none}
.hero{position:relative;height:80vh;overflow:hidden}
.hero img{width:100%;height:100%;object-fit:cover}
.hero .caption{position:absolute;inset:auto 0 48px 0;text-align:center;color:#fff}
.hero .nav{position:absolute;top:50%;padding:8px 14px;background:#0006;color:#fff;text-decoration:none}
.hero .prev{left:12px}.hero .next{right:12px}
.dots{position:absolute;bottom:16px;width:100%;text-align:center}
.dots a{display:inline-block;width:10px;height:10px;margin:0 4px;border-radius:50%;background:#fff8}
.dots a.active{background:#fff}
section{max-width:1100px;margin:48px auto;padding:0 24px}
.tabs a{margin-right:8px;padding:6px 12px;border:1px solid #ddd;border-radius:999px;text-decoration:none;font-size:13px}
.tabs a.active{background:#000;color:#fff}
.stage img{width:100%;max-height:70vh;object-fit:contain}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(180px,1fr));gap:12px;list-style:none;padding:0}
.grid img{width:100%;aspect-ratio:1;object-fit:cover}
.lightbox{background:#000;color:#fff;min-height:100vh;text-align:center}
.lightbox .frame{overflow:auto;max-height:85vh}
.lightbox .tools a{margin:0 6px;color:#fff}
.admin{display:flex;min-height:100vh}
.admin aside{width:220px;border-right:1px solid #eee;padding:16px}
.admin aside a{display:block;padding:8px;border-radius:6px;text-decoration:none}
.admin aside a.active{background:#000;color:#fff}
.admin main{flex:1;padding:24px;max-width:1000px}
.status{margin:12px 0;padding:12px;border:1px solid #ddd;border-radius:6px;white-space:pre-wrap}
.muted{color:#737373;font-size:12px}
.thumb{position:relative;border:1px solid #eee;border-radius:8px;overflow:hidden}
.thumb form{position:absolute;top:8px;right:8px}
</style>"#;

/// Full document around public page content
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="vi">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{style}
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

/// Top navigation of the public site
pub fn site_header() -> String {
    format!(
        r##"<header class="site">
<a class="brand" href="/">{name}</a>
<nav>
<a href="/">Trang chủ</a>
<a href="/#album-cards">Albums</a>
<a href="/#gallery">Gallery</a>
<a href="/admin">Admin</a>
</nav>
</header>"##,
        name = escape_html(SITE_NAME),
    )
}

const ADMIN_MENU: [(&str, &str); 3] = [
    ("Tổng quan", "/admin"),
    ("Upload Albums", "/admin/upload-albums"),
    ("Upload Banner", "/admin/upload-banner"),
];

/// Admin shell: sidebar with the current entry highlighted
pub fn admin_page(title: &str, current_path: &str, content: &str) -> String {
    let menu: String = ADMIN_MENU
        .iter()
        .map(|(label, url)| {
            let active = current_path == *url;
            format!(
                r#"<a href="{url}"{class}>{label}</a>"#,
                url = url,
                class = if active { r#" class="active""# } else { "" },
                label = escape_html(label),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<div class="admin">
<aside>
<p class="muted">Admin Panel</p>
{menu}
<form method="post" action="/logout"><button type="submit">Đăng xuất</button></form>
</aside>
<main>
{content}
</main>
</div>"#,
        menu = menu,
        content = content,
    );
    page(title, &body)
}

/// Result banner for redirect messages; nothing when empty
pub fn status_banner(message: Option<&str>) -> String {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => format!(r#"<div class="status">{}</div>"#, escape_html(message)),
        None => String::new(),
    }
}
