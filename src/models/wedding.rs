// src/models/wedding.rs
// DOCUMENTATION: Static wedding content for the public home page
// PURPOSE: Describe the gallery compactly and expand it into renderable data

use serde::{Deserialize, Serialize};

/// One gallery picture in the compact input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub id: u32,
    pub file: String,
    pub caption: String,
}

/// One album in the compact input: files `<start>.jpg ..= <end>.jpg`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRange {
    pub key: String,
    pub title: String,
    pub range: (u32, u32),
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Compact description of the home page gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeddingInput {
    /// Folder all files live in (e.g. "/albums/wedding")
    pub base: String,
    pub gallery: Vec<GalleryEntry>,
    pub albums: Vec<AlbumRange>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeddingImage {
    pub id: u32,
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeddingAlbumCard {
    pub key: String,
    pub title: String,
    pub cover_url: String,
    pub image_urls: Vec<String>,
    pub href: Option<String>,
    pub description: Option<String>,
}

/// Expanded gallery data consumed by the home page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeddingData {
    pub gallery: Vec<WeddingImage>,
    pub albums: Vec<WeddingAlbumCard>,
}

/// Album card in the "album cards" section (cover plus its own picture list)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlbumCard {
    pub slug: String,
    pub label: String,
    pub cover: String,
    pub images: Vec<String>,
}

/// Fallback hero slide, used when no active banner is stored
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeroSlide {
    pub src: String,
    pub heading: Option<String>,
    pub subheading: Option<String>,
    pub alt: Option<String>,
}

/// Join `base` and `file` with exactly one separator
pub fn join_url(base: &str, file: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, file)
    } else {
        format!("{}/{}", base, file)
    }
}

/// Expand the compact input into gallery images and album cards.
/// Album ranges are inclusive; an inverted range yields an album without
/// pictures and an empty cover.
pub fn make_wedding_data(input: &WeddingInput) -> WeddingData {
    let gallery = input
        .gallery
        .iter()
        .map(|g| WeddingImage {
            id: g.id,
            url: join_url(&input.base, &g.file),
            caption: g.caption.clone(),
        })
        .collect();

    let albums = input
        .albums
        .iter()
        .map(|a| {
            let (start, end) = a.range;
            let image_urls: Vec<String> = (start..=end)
                .map(|n| join_url(&input.base, &format!("{}.jpg", n)))
                .collect();
            WeddingAlbumCard {
                key: a.key.clone(),
                title: a.title.clone(),
                href: a.href.clone(),
                description: a.description.clone(),
                cover_url: image_urls.first().cloned().unwrap_or_default(),
                image_urls,
            }
        })
        .collect();

    WeddingData { gallery, albums }
}

fn entry(id: u32, caption: &str) -> GalleryEntry {
    GalleryEntry {
        id,
        file: format!("{}.jpg", id),
        caption: caption.to_string(),
    }
}

fn range(key: &str, title: &str, range: (u32, u32), description: &str) -> AlbumRange {
    AlbumRange {
        key: key.to_string(),
        title: title.to_string(),
        range,
        href: None,
        description: Some(description.to_string()),
    }
}

/// Gallery shipped with the site
pub fn default_wedding_input() -> WeddingInput {
    let fireworks = "Pháo hoa bừng sáng, mở đầu cho hành trình mới.";
    WeddingInput {
        base: "/albums/wedding".to_string(),
        gallery: vec![
            entry(1, "Khoảnh khắc đầu tiên gặp nhau bên khung cửa sổ mùa thu."),
            entry(2, "Lời tỏ tình nhẹ như gió, nhưng làm tim rung động thật lâu."),
            entry(3, "Bàn tay nắm chặt hứa hẹn đi cùng nhau suốt chặng đường."),
            entry(4, "Nụ cười của em là ánh nắng đẹp nhất trong ngày."),
            entry(5, "Bố mẹ nhìn theo, mắt rưng rưng mà đầy tự hào."),
            entry(6, "Bạn bè quây quần, kể lại những kỷ niệm không thể quên."),
            entry(7, "Điệu nhảy đầu tiên, chậm rãi mà ấm áp."),
            entry(8, fireworks),
            entry(9, fireworks),
            entry(10, fireworks),
            entry(11, fireworks),
            entry(12, fireworks),
        ],
        albums: vec![
            range(
                "dam-hoi",
                "Đám hỏi",
                (9, 18),
                "Những nghi lễ đính hôn và khoảnh khắc ra mắt hai họ trang trọng nhưng đầy ấm áp.",
            ),
            range(
                "le-cuoi",
                "Lễ cưới",
                (17, 26),
                "Bước vào lễ đường, trao nhau lời thề nguyện và nụ cười rạng rỡ trong ngày trọng đại.",
            ),
            range(
                "gia-dinh",
                "Gia đình",
                (19, 28),
                "Khung hình bình yên bên cha mẹ và người thân, nơi tình yêu bắt đầu và tiếp nối.",
            ),
            range(
                "ban-be",
                "Bạn bè",
                (19, 28),
                "Tiếng cười rộn ràng, lời chúc chân thành và những trò nghịch đáng nhớ của hội bạn.",
            ),
        ],
    }
}

fn card(slug: &str, label: &str, cover: &str, folder: &str, count: u32, ext: &str) -> AlbumCard {
    AlbumCard {
        slug: slug.to_string(),
        label: label.to_string(),
        cover: cover.to_string(),
        images: (1..=count)
            .map(|n| format!("/albums/{}/{}.{}", folder, n, ext))
            .collect(),
    }
}

/// Album cards shown at the bottom of the home page
pub fn default_album_cards() -> Vec<AlbumCard> {
    vec![
        card("pre-wedding", "Pre-wedding", "/albums/wedding/10.jpg", "prewedding", 4, "jpg"),
        card("dam-hoi", "Đám hỏi", "/albums/wedding/15.jpg", "damhoi", 4, "jpg"),
        card("le-cuoi", "Lễ cưới", "/albums/wedding/12.jpg", "wedding", 32, "JPG"),
        card("gia-dinh", "Gia đình", "/albums/wedding/20.jpg", "giadinh", 3, "jpg"),
        card("ban-be", "Bạn bè", "/albums/wedding/8.jpg", "banbe", 3, "jpg"),
    ]
}

/// Hero slides used when the banner table is empty or unreachable
pub fn default_hero_slides() -> Vec<HeroSlide> {
    [
        ("/albums/wedding/1.jpg", "Our Wedding", "Ngày chung đôi"),
        ("/albums/wedding/5.jpg", "Forever Begins", "Trăm năm hạnh phúc"),
        ("/albums/wedding/8.jpg", "Love Story", "Câu chuyện của chúng mình"),
    ]
    .iter()
    .map(|(src, heading, subheading)| HeroSlide {
        src: src.to_string(),
        heading: Some(heading.to_string()),
        subheading: Some(subheading.to_string()),
        alt: Some(heading.to_string()),
    })
    .collect()
}
