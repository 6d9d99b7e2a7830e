//! Cosmetic block skins: four PNGs per skin, one per color, drawn over the
//! flat block when available.
//!
//! Loading is lazy and forgiving. Images that have not arrived yet simply
//! mean flat blocks for a frame or two; images that fail to load are latched
//! as failed per color so the same missing asset is not refetched for the
//! rest of the session.

use std::collections::{HashMap, HashSet};

use web_sys::{console, HtmlImageElement};

use crate::backend;
use crate::challenge::Color;

/// Asset URL for one color of a skin. The version bucket changes once a
/// minute so a re-uploaded skin propagates without cache tricks.
pub fn skin_image_url(slug: &str, color: Color, now_ms: f64) -> String {
    let version = (now_ms / 60_000.0).floor().max(0.0) as u64;
    format!(
        "{}/storage/v1/object/public/skins/{slug}/{}.png?v={version}",
        backend::BASE_URL,
        color.key()
    )
}

/// The equipped skin's images, keyed by block color.
#[derive(Default)]
pub struct SkinAtlas {
    slug: Option<String>,
    images: HashMap<Color, HtmlImageElement>,
    failed: HashSet<Color>,
}

impl SkinAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Switch to `slug` (or back to flat blocks with `None`), kicking off
    /// image loads for all four colors. No-op when the skin is unchanged,
    /// so calling this every frame is fine.
    pub fn set_skin(&mut self, slug: Option<&str>, now_ms: f64) {
        if self.slug.as_deref() == slug {
            return;
        }
        self.slug = slug.map(str::to_owned);
        self.images.clear();
        self.failed.clear();
        let Some(slug) = self.slug.clone() else {
            return;
        };
        for color in Color::ALL {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(&skin_image_url(&slug, color, now_ms));
                    self.images.insert(color, img);
                }
                Err(err) => {
                    console::warn_2(&"skin image element creation failed:".into(), &err);
                }
            }
        }
    }

    /// Image for `color`, if it has finished loading successfully. `None`
    /// means draw the flat block instead. A load error drops the image and
    /// latches the color as failed.
    pub fn image_for(&mut self, color: Color) -> Option<&HtmlImageElement> {
        if self.failed.contains(&color) {
            return None;
        }
        let (complete, broken) = match self.images.get(&color) {
            Some(img) => {
                let complete = img.complete();
                (complete, complete && img.natural_width() == 0)
            }
            None => return None,
        };
        if broken {
            self.failed.insert(color);
            self.images.remove(&color);
            console::warn_1(&format!("skin asset missing for {}, using flat block", color.key()).into());
            return None;
        }
        if !complete {
            return None;
        }
        self.images.get(&color)
    }
}
