// src/views/admin.rs
// DOCUMENTATION: Admin pages
// PURPOSE: Overview, album upload/management and banner upload/management

use crate::models::{AlbumImage, AlbumSummary, BannerImage, BannerLocation, Device};
use crate::views::layout::{admin_page, escape_html, status_banner};

const CONFIRM_ALBUM_DELETE: &str = "Xác nhận xoá ảnh? Ảnh sẽ bị xoá khỏi Storage và khỏi bảng images. Hành động này không thể hoàn tác.";
const CONFIRM_BANNER_DELETE: &str =
    "Xác nhận xoá ảnh? Ảnh sẽ bị xoá khỏi Storage. Hành động này không thể hoàn tác.";

/// Marks a thumbnail whose URL does not load
const LOAD_ERROR_SCRIPT: &str = "var b=document.createElement('div');b.className='status';b.textContent='Load lỗi';this.parentNode.appendChild(b);this.onerror=null;";

pub fn overview_page(email: &str) -> String {
    let content = format!(
        r#"<h1>Admin · Upload ảnh vào album</h1>
<p class="muted">Chọn album có sẵn, chọn ảnh (và cover nếu có), rồi bấm upload.</p>
<p class="muted">Đăng nhập với: {}</p>"#,
        escape_html(email)
    );
    admin_page("Admin", "/admin", &content)
}

/// State of the album management page
pub struct AlbumsPage<'a> {
    pub albums: &'a [AlbumSummary],
    pub selected: Option<&'a AlbumSummary>,
    /// Images of the selected album, or the loading error text
    pub images: Result<Vec<AlbumImage>, String>,
    pub message: Option<&'a str>,
}

fn confirm_attr(text: &str) -> String {
    escape_html(&format!("return confirm('{}')", text.replace('\'', "\\'")))
}

pub fn albums_page(view: &AlbumsPage<'_>) -> String {
    let selected_id = view.selected.map(|a| a.id);

    let options: String = view
        .albums
        .iter()
        .map(|a| {
            format!(
                r#"<option value="{id}"{sel}>{title} ({key})</option>"#,
                id = a.id,
                sel = if Some(a.id) == selected_id { " selected" } else { "" },
                title = escape_html(&a.title),
                key = escape_html(&a.key),
            )
        })
        .collect();

    let selected_note = view
        .selected
        .map(|a| {
            format!(
                r#"<p class="muted">Đang chọn: <b>{}</b> · key: <code>{}</code></p>"#,
                escape_html(&a.title),
                escape_html(&a.key)
            )
        })
        .unwrap_or_default();

    let images_section = match view.selected {
        None => String::new(),
        Some(album) => album_images_section(album, &view.images),
    };

    let content = format!(
        r#"<h1>Admin · Upload ảnh vào album</h1>
<p class="muted">Chọn album, chọn ảnh (và cover nếu có), rồi upload.</p>
<form method="get" action="/admin/upload-albums">
<label>Chọn album</label>
<select name="album_id" onchange="this.form.submit()">
<option value="">-- Chọn một album --</option>
{options}
</select>
<noscript><button type="submit">Xem</button></noscript>
</form>
{selected_note}
<form method="post" action="/admin/upload-albums" enctype="multipart/form-data">
<input type="hidden" name="albumId" value="{album_id}">
<p><label>Ảnh cover (optional)</label><br><input type="file" name="cover" accept="image/*"></p>
<p><label>Ảnh album</label><br><input type="file" name="files" accept="image/*" multiple></p>
<p><button type="submit">Upload</button></p>
</form>
{status}
{images_section}"#,
        options = options,
        selected_note = selected_note,
        album_id = selected_id.map(|id| id.to_string()).unwrap_or_default(),
        status = status_banner(view.message),
        images_section = images_section,
    );
    admin_page("Upload Albums", "/admin/upload-albums", &content)
}

fn album_images_section(album: &AlbumSummary, images: &Result<Vec<AlbumImage>, String>) -> String {
    let (summary, list) = match images {
        Err(e) => (format!("Lỗi: {}", escape_html(e)), String::new()),
        Ok(images) => {
            let items: String = images
                .iter()
                .map(|img| {
                    format!(
                        r#"<li class="thumb">
<img src="{url}" alt="{caption}" loading="lazy" onerror="{onerror}">
<a href="{url}" target="_blank" rel="noopener">Xem ảnh</a>
<form method="post" action="/admin/upload-albums/images/{id}/delete" onsubmit="{confirm}">
<input type="hidden" name="album_id" value="{album_id}">
<button type="submit" title="Xoá ảnh khỏi Storage và DB">Xoá</button>
</form>
</li>"#,
                        url = escape_html(&img.url),
                        caption = escape_html(img.caption.as_deref().unwrap_or("")),
                        onerror = escape_html(LOAD_ERROR_SCRIPT),
                        id = img.id,
                        confirm = confirm_attr(CONFIRM_ALBUM_DELETE),
                        album_id = album.id,
                    )
                })
                .collect();
            (format!("{} ảnh", images.len()), items)
        }
    };

    format!(
        r#"<section>
<h2>Ảnh trong album</h2>
<p class="muted">{summary}</p>
<form method="post" action="/admin/upload-albums/{album_id}/resync">
<button type="submit" title="Đồng bộ Storage với bảng images">Đồng bộ lại</button>
</form>
<ul class="grid">{list}</ul>
</section>"#,
        summary = summary,
        album_id = album.id,
        list = list,
    )
}

/// State of the banner management page
pub struct BannersPage<'a> {
    pub locations: &'a [BannerLocation],
    pub location: Option<&'a str>,
    pub device: Device,
    /// Images of the selected slot; None until a location is picked
    pub images: Option<Result<Vec<BannerImage>, String>>,
    pub message: Option<&'a str>,
}

fn device_options(current: Device) -> String {
    Device::all()
        .iter()
        .map(|d| {
            format!(
                r#"<option value="{value}"{sel}>{label}</option>"#,
                value = d.as_str(),
                sel = if *d == current { " selected" } else { "" },
                label = match d {
                    Device::Pc => "PC",
                    Device::Mobile => "Mobile",
                },
            )
        })
        .collect()
}

pub fn banners_page(view: &BannersPage<'_>) -> String {
    let location_options: String = view
        .locations
        .iter()
        .map(|loc| {
            format!(
                r#"<option value="{key}"{sel}>{name} ({key})</option>"#,
                key = escape_html(&loc.key),
                sel = if view.location == Some(loc.key.as_str()) { " selected" } else { "" },
                name = escape_html(&loc.name),
            )
        })
        .collect();

    let images_section = match &view.images {
        None => String::new(),
        Some(Err(e)) => format!(r#"<p class="muted">Lỗi: {}</p>"#, escape_html(e)),
        Some(Ok(images)) if images.is_empty() => {
            r#"<p class="muted">Chưa có ảnh cho vị trí/thiết bị này.</p>"#.to_string()
        }
        Some(Ok(images)) => {
            let items: String = images
                .iter()
                .map(|img| {
                    let signed = format!("/admin/upload-banner/images/{}/signed", img.id);
                    format!(
                        r#"<li class="thumb">
<img src="{url}" alt="" loading="lazy" onerror="{onerror}">
<a href="{signed}" target="_blank" rel="noopener">Xem ảnh</a>
<p class="muted">{path}</p>
<form method="post" action="/admin/upload-banner/images/{id}/delete" onsubmit="{confirm}">
<input type="hidden" name="location" value="{location}">
<input type="hidden" name="device" value="{device}">
<button type="submit" title="Xoá ảnh khỏi Storage">Xoá</button>
</form>
</li>"#,
                        url = escape_html(&img.url),
                        onerror = escape_html(&format!("this.onerror=null;this.src='{}'", signed)),
                        signed = signed,
                        path = escape_html(img.path.as_deref().unwrap_or("")),
                        id = img.id,
                        confirm = confirm_attr(CONFIRM_BANNER_DELETE),
                        location = escape_html(&img.location),
                        device = escape_html(&img.device),
                    )
                })
                .collect();
            format!(
                r#"<p class="muted">{} ảnh</p><ul class="grid">{}</ul>"#,
                images.len(),
                items
            )
        }
    };

    let content = format!(
        r#"<h1>Admin · Upload Banner</h1>
<p class="muted">Chọn vị trí banner, thiết bị (pc/mobile) và ảnh rồi upload.</p>
<form method="post" action="/admin/upload-banner" enctype="multipart/form-data">
<p><label>Vị trí banner</label><br>
<select name="location" required>
<option value="">-- Chọn vị trí banner --</option>
{location_options}
</select></p>
<p><label>Thiết bị</label><br>
<select name="device" required>
{device_options}
</select></p>
<p><label>Ảnh banner</label><br><input type="file" name="files" accept="image/*" multiple required></p>
<p><button type="submit">Upload</button></p>
</form>
{status}
<section>
<h2>Ảnh đã upload</h2>
<form method="get" action="/admin/upload-banner">
<select name="location">
<option value="">-- Chọn vị trí banner --</option>
{location_options}
</select>
<select name="device">
{device_options}
</select>
<button type="submit">Xem</button>
</form>
{images_section}
</section>"#,
        location_options = location_options,
        device_options = device_options(view.device),
        status = status_banner(view.message),
        images_section = images_section,
    );
    admin_page("Upload Banner", "/admin/upload-banner", &content)
}
