// src/views/site.rs
// DOCUMENTATION: Public pages
// PURPOSE: Home page (hero slider, intro, gallery, video, album cards),
// album grid and the lightbox

use crate::models::{AlbumCard, HeroSlide};
use crate::services::{GalleryView, Lightbox, SliderState, ZOOM_MAX, ZOOM_MIN};
use crate::views::layout::{escape_html, page, site_header};

/// Link back to the home page carrying slider and gallery state
pub fn home_href(slide: usize, album: Option<&str>, photo: usize, anchor: &str) -> String {
    let mut href = format!("/?slide={}", slide);
    if let Some(album) = album {
        href.push_str(&format!("&album={}", urlencoding::encode(album)));
    }
    href.push_str(&format!("&photo={}", photo));
    if !anchor.is_empty() {
        href.push('#');
        href.push_str(anchor);
    }
    href
}

pub fn album_href(slug: &str) -> String {
    format!("/album/{}", urlencoding::encode(slug))
}

pub fn lightbox_href(slug: &str, index: usize, zoom: f64) -> String {
    if zoom > ZOOM_MIN {
        format!("{}/{}?zoom={}", album_href(slug), index, zoom)
    } else {
        format!("{}/{}", album_href(slug), index)
    }
}

fn hero_section(slides: &[HeroSlide], slider: SliderState, gallery: &GalleryView) -> String {
    let Some(slide) = slides.get(slider.index) else {
        return String::new();
    };
    let album = gallery.active_album.as_deref();
    let photo = gallery.index;

    let mut caption = String::new();
    if let Some(heading) = &slide.heading {
        caption.push_str(&format!("<h1>{}</h1>", escape_html(heading)));
    }
    if let Some(subheading) = &slide.subheading {
        caption.push_str(&format!("<p>{}</p>", escape_html(subheading)));
    }

    let dots: String = (0..slider.count)
        .map(|i| {
            let target = slider.jump_to(i);
            format!(
                r#"<a href="{href}"{class} aria-label="Slide {n}"></a>"#,
                href = escape_html(&home_href(target.index, album, photo, "")),
                class = if i == slider.index { r#" class="active""# } else { "" },
                n = i + 1,
            )
        })
        .collect();

    format!(
        r#"<section class="hero">
<img src="{src}" alt="{alt}">
<div class="caption">{caption}</div>
<a class="nav prev" href="{prev}" aria-label="Previous">‹</a>
<a class="nav next" href="{next}" aria-label="Next">›</a>
<div class="dots">{dots}</div>
</section>"#,
        src = escape_html(&slide.src),
        alt = escape_html(slide.alt.as_deref().unwrap_or("")),
        caption = caption,
        prev = escape_html(&home_href(slider.prev().index, album, photo, "")),
        next = escape_html(&home_href(slider.next().index, album, photo, "")),
        dots = dots,
    )
}

fn intro_section() -> &'static str {
    r#"<section class="intro">
<h2 class="muted">OUR WEDDING STORY</h2>
<p>Đám cưới của bọn mình là một hành trình đầy yêu thương và kỷ niệm, nơi mỗi khoảnh khắc đều được chuẩn bị với tất cả sự trân trọng. Từ những ngày đầu lên ý tưởng, lựa chọn phong cách, cho đến từng chi tiết trang trí, bọn mình mong muốn biến ngày đặc biệt này thành một câu chuyện ngọt ngào và đáng nhớ nhất trong cuộc đời. Đây không chỉ là một buổi lễ, mà còn là dịp để gắn kết gia đình, bạn bè, và tất cả những người đã đồng hành cùng bọn mình.</p>
</section>"#
}

fn gallery_section(
    gallery: &GalleryView,
    album_tabs: &[(String, String)],
    slider: SliderState,
) -> String {
    let tabs: String = album_tabs
        .iter()
        .map(|(key, title)| {
            let active = gallery.active_album.as_deref() == Some(key.as_str());
            format!(
                r#"<a href="{href}"{class}>{title}</a>"#,
                href = escape_html(&home_href(slider.index, Some(key.as_str()), 0, "gallery")),
                class = if active { r#" class="active""# } else { "" },
                title = escape_html(title),
            )
        })
        .collect();

    let album = gallery.active_album.as_deref();
    let stage = match gallery.current() {
        Some(image) => format!(
            r#"<figure class="stage">
<img src="{src}" alt="{caption}">
<figcaption>{caption} · {n}/{total}</figcaption>
</figure>
<p>
<a href="{prev}">‹ Trước</a>
<a href="{next}">Sau ›</a>
</p>"#,
            src = escape_html(&image.url),
            caption = escape_html(&image.caption),
            n = gallery.index + 1,
            total = gallery.images.len(),
            prev = escape_html(&home_href(slider.index, album, gallery.prev_index(), "gallery")),
            next = escape_html(&home_href(slider.index, album, gallery.next_index(), "gallery")),
        ),
        None => r#"<p class="muted">Chưa có ảnh.</p>"#.to_string(),
    };

    let description = gallery
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="muted">{}</p>"#, escape_html(d)))
        .unwrap_or_default();

    format!(
        r##"<section id="gallery">
<div class="tabs">{tabs}</div>
{description}
{stage}
<p><a href="#album-cards">Xem tất cả Albums</a></p>
</section>"##,
        tabs = tabs,
        description = description,
        stage = stage,
    )
}

fn approach_section() -> &'static str {
    r#"<section class="approach">
<h2>Video</h2>
<video controls playsinline poster="/images/main-banner.jpg" src="/video/wedding.mp4"></video>
<h3 class="muted">OUR APPROACH</h3>
<p>Chúng tôi tạo nên không gian ấm áp nuôi dưỡng sự kết nối và câu chuyện. Kinh nghiệm sâu rộng trong lập kế hoạch lẫn styling giúp từng chi tiết hòa quyện tự nhiên.</p>
</section>"#
}

fn cards_section(cards: &[AlbumCard]) -> String {
    let items: String = cards
        .iter()
        .map(|card| {
            format!(
                r#"<li><a href="{href}"><img src="{cover}" alt="{label}" loading="lazy"><span>{label}</span></a></li>"#,
                href = escape_html(&album_href(&card.slug)),
                cover = escape_html(&card.cover),
                label = escape_html(&card.label),
            )
        })
        .collect();

    format!(
        r#"<section id="album-cards">
<h2>Albums</h2>
<ul class="grid">{}</ul>
</section>"#,
        items
    )
}

/// Home page
pub fn home_page(
    slides: &[HeroSlide],
    slider: SliderState,
    gallery: &GalleryView,
    album_tabs: &[(String, String)],
    cards: &[AlbumCard],
) -> String {
    let body = [
        site_header(),
        hero_section(slides, slider, gallery),
        intro_section().to_string(),
        gallery_section(gallery, album_tabs, slider),
        approach_section().to_string(),
        cards_section(cards),
    ]
    .join("\n");
    page("Nhut Quang & Hai Yen · Wedding", &body)
}

/// Every picture of one album card
pub fn album_grid_page(card: &AlbumCard) -> String {
    let items: String = card
        .images
        .iter()
        .enumerate()
        .map(|(i, src)| {
            format!(
                r#"<li><a href="{href}"><img src="{src}" alt="{label} {n}" loading="lazy"></a></li>"#,
                href = escape_html(&lightbox_href(&card.slug, i, ZOOM_MIN)),
                src = escape_html(src),
                label = escape_html(&card.label),
                n = i + 1,
            )
        })
        .collect();

    let body = format!(
        r##"{header}
<section>
<h1>{label}</h1>
<p class="muted">{count} ảnh</p>
<ul class="grid">{items}</ul>
<p><a href="/#album-cards">← Albums</a></p>
</section>"##,
        header = site_header(),
        label = escape_html(&card.label),
        count = card.images.len(),
        items = items,
    );
    page(&card.label, &body)
}

/// Full-screen view of one picture with zoom controls
pub fn lightbox_page(card: &AlbumCard, lightbox: Lightbox) -> String {
    let src = card.images.get(lightbox.index).cloned().unwrap_or_default();
    let slug = &card.slug;
    let zoom_label = if lightbox.zoom <= ZOOM_MIN {
        "FIT".to_string()
    } else {
        format!("{}%", lightbox.zoom_percent())
    };
    let zoom_in = if lightbox.zoom >= ZOOM_MAX {
        r#"<span class="muted">+</span>"#.to_string()
    } else {
        format!(
            r#"<a href="{}">+</a>"#,
            escape_html(&lightbox_href(slug, lightbox.index, lightbox.zoom_in().zoom))
        )
    };

    let body = format!(
        r#"<div class="lightbox">
<p class="tools">
<a href="{close}">✕</a>
<a href="{prev}">‹</a>
<span>{n} / {total}</span>
<a href="{next}">›</a>
<a href="{zoom_out}">−</a>
<span>{zoom_label}</span>
{zoom_in}
<a href="{fit}">FIT</a>
</p>
<div class="frame">
<a href="{click}"><img src="{src}" alt="{label} {n}" style="width:{width}%"></a>
</div>
</div>"#,
        close = escape_html(&album_href(slug)),
        prev = escape_html(&lightbox_href(slug, lightbox.prev().index, ZOOM_MIN)),
        next = escape_html(&lightbox_href(slug, lightbox.next().index, ZOOM_MIN)),
        n = lightbox.index + 1,
        total = lightbox.count,
        zoom_out = escape_html(&lightbox_href(slug, lightbox.index, lightbox.zoom_out().zoom)),
        zoom_label = zoom_label,
        zoom_in = zoom_in,
        fit = escape_html(&lightbox_href(slug, lightbox.index, ZOOM_MIN)),
        click = escape_html(&lightbox_href(slug, lightbox.index, lightbox.click().zoom)),
        src = escape_html(&src),
        label = escape_html(&card.label),
        width = lightbox.zoom_percent(),
    );
    page(&card.label, &body)
}
