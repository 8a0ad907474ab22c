// src/services/gallery.rs
// DOCUMENTATION: Navigation state of the public gallery, slider and lightbox
// PURPOSE: Server-side rendition of the index/zoom state the pages link between

use crate::models::{WeddingData, WeddingImage};

/// Step a wrapping index forward or backward through `len` items
pub fn wrap_index(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    (((index as isize + delta) % len + len) % len) as usize
}

/// Gallery section of the home page
/// DOCUMENTATION: The first album is active by default; switching album
/// starts again at the first picture. Without an active album the default
/// gallery list is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryView {
    pub active_album: Option<String>,
    pub active_title: Option<String>,
    pub description: Option<String>,
    pub images: Vec<WeddingImage>,
    pub index: usize,
}

impl GalleryView {
    pub fn new(data: &WeddingData, album: Option<&str>, index: Option<usize>) -> Self {
        let active = album
            .and_then(|key| data.albums.iter().find(|a| a.key == key))
            .or_else(|| data.albums.first());

        let images = match active {
            Some(album) => album
                .image_urls
                .iter()
                .enumerate()
                .map(|(i, url)| WeddingImage {
                    id: i as u32 + 1,
                    url: url.clone(),
                    caption: format!("{} – khoảnh khắc {}", album.title, i + 1),
                })
                .collect(),
            None => data.gallery.clone(),
        };

        let index = index.filter(|i| *i < images.len()).unwrap_or(0);

        GalleryView {
            active_album: active.map(|a| a.key.clone()),
            active_title: active.map(|a| a.title.clone()),
            description: active.and_then(|a| a.description.clone()),
            images,
            index,
        }
    }

    pub fn current(&self) -> Option<&WeddingImage> {
        self.images.get(self.index)
    }

    pub fn prev_index(&self) -> usize {
        wrap_index(self.index, -1, self.images.len())
    }

    pub fn next_index(&self) -> usize {
        wrap_index(self.index, 1, self.images.len())
    }
}

/// Hero slider position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderState {
    pub index: usize,
    pub count: usize,
}

impl SliderState {
    pub fn new(index: usize, count: usize) -> Self {
        let index = if index < count { index } else { 0 };
        Self { index, count }
    }

    pub fn next(&self) -> Self {
        Self::new(wrap_index(self.index, 1, self.count), self.count)
    }

    pub fn prev(&self) -> Self {
        Self::new(wrap_index(self.index, -1, self.count), self.count)
    }

    /// Out-of-range targets and the current slide leave the state unchanged
    pub fn jump_to(&self, target: usize) -> Self {
        if target >= self.count || target == self.index {
            *self
        } else {
            Self::new(target, self.count)
        }
    }
}

pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.5;

/// Lightbox over a list of images
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lightbox {
    pub index: usize,
    pub count: usize,
    pub zoom: f64,
}

impl Lightbox {
    pub fn new(index: usize, count: usize, zoom: Option<f64>) -> Self {
        let index = if index < count { index } else { 0 };
        Self {
            index,
            count,
            zoom: clamp_zoom(zoom.unwrap_or(ZOOM_MIN)),
        }
    }

    /// Changing picture resets the zoom
    pub fn next(&self) -> Self {
        Self::new(wrap_index(self.index, 1, self.count), self.count, None)
    }

    pub fn prev(&self) -> Self {
        Self::new(wrap_index(self.index, -1, self.count), self.count, None)
    }

    pub fn zoom_in(&self) -> Self {
        Self {
            zoom: clamp_zoom(self.zoom + ZOOM_STEP),
            ..*self
        }
    }

    pub fn zoom_out(&self) -> Self {
        Self {
            zoom: clamp_zoom(self.zoom - ZOOM_STEP),
            ..*self
        }
    }

    pub fn fit(&self) -> Self {
        Self {
            zoom: ZOOM_MIN,
            ..*self
        }
    }

    /// Clicking the picture zooms in, or back to fit once at the maximum
    pub fn click(&self) -> Self {
        if self.zoom >= ZOOM_MAX {
            self.fit()
        } else {
            self.zoom_in()
        }
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return ZOOM_MIN;
    }
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_wedding_input, make_wedding_data};

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(0, -1, 5), 4);
        assert_eq!(wrap_index(4, 1, 5), 0);
        assert_eq!(wrap_index(2, 1, 5), 3);
        assert_eq!(wrap_index(0, 1, 0), 0);
    }

    #[test]
    fn test_gallery_defaults_to_first_album() {
        let data = make_wedding_data(&default_wedding_input());
        let view = GalleryView::new(&data, None, None);

        assert_eq!(view.active_album.as_deref(), Some("dam-hoi"));
        assert_eq!(view.index, 0);
        assert_eq!(view.images.len(), 10);
        assert_eq!(view.images[1].caption, "Đám hỏi – khoảnh khắc 2");
        assert_eq!(view.prev_index(), 9);
    }

    #[test]
    fn test_gallery_album_switch_and_bad_index() {
        let data = make_wedding_data(&default_wedding_input());
        let view = GalleryView::new(&data, Some("ban-be"), Some(3));
        assert_eq!(view.active_title.as_deref(), Some("Bạn bè"));
        assert_eq!(view.index, 3);
        assert_eq!(view.next_index(), 4);

        let out_of_range = GalleryView::new(&data, Some("ban-be"), Some(99));
        assert_eq!(out_of_range.index, 0);

        let unknown = GalleryView::new(&data, Some("nope"), None);
        assert_eq!(unknown.active_album.as_deref(), Some("dam-hoi"));
    }

    #[test]
    fn test_gallery_without_albums_uses_default_list() {
        let mut data = make_wedding_data(&default_wedding_input());
        data.albums.clear();
        let view = GalleryView::new(&data, None, None);
        assert!(view.active_album.is_none());
        assert_eq!(view.images.len(), 12);
        assert!(view.current().is_some());
    }

    #[test]
    fn test_slider_navigation() {
        let slider = SliderState::new(0, 3);
        assert_eq!(slider.prev().index, 2);
        assert_eq!(slider.next().next().next().index, 0);
        assert_eq!(slider.jump_to(2).index, 2);
        assert_eq!(slider.jump_to(7).index, 0);
        assert_eq!(SliderState::new(5, 3).index, 0);
    }

    #[test]
    fn test_lightbox_zoom_clamps() {
        let lightbox = Lightbox::new(0, 4, None);
        assert_eq!(lightbox.zoom, 1.0);
        assert_eq!(lightbox.zoom_out().zoom, 1.0);

        let maxed = lightbox.zoom_in().zoom_in().zoom_in().zoom_in().zoom_in().zoom_in().zoom_in();
        assert_eq!(maxed.zoom, 4.0);
        assert_eq!(maxed.zoom_percent(), 400);
        assert_eq!(maxed.click().zoom, 1.0);
        assert_eq!(lightbox.click().zoom, 1.5);

        assert_eq!(Lightbox::new(0, 4, Some(9.0)).zoom, 4.0);
        assert_eq!(Lightbox::new(0, 4, Some(f64::NAN)).zoom, 1.0);
    }

    #[test]
    fn test_lightbox_navigation_resets_zoom() {
        let lightbox = Lightbox::new(3, 4, Some(2.0));
        let next = lightbox.next();
        assert_eq!(next.index, 0);
        assert_eq!(next.zoom, 1.0);
        assert_eq!(lightbox.prev().index, 2);
    }
}
