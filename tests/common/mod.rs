// Shared fixtures for integration tests
// Author: kelexine (https://github.com/kelexine)
#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use medcot::error::{DiagnosisError, Result};
use medcot::providers::{ProviderKind, VisionProvider};
use medcot::vision::NormalizedImage;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Gradient RGB image encoded as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// Half-transparent RGBA image encoded as PNG.
pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| Rgba([200, (x % 256) as u8, 40, 128]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encode test image");
    buffer
}

/// Canned provider that records how often it was called.
pub struct FakeProvider {
    pub kind: ProviderKind,
    pub reply: std::result::Result<String, (u16, String)>,
    pub calls: AtomicUsize,
    pub credential: bool,
}

impl FakeProvider {
    pub fn replying(kind: ProviderKind, text: &str) -> Self {
        Self {
            kind,
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            credential: true,
        }
    }

    pub fn failing(kind: ProviderKind, status: u16, body: &str) -> Self {
        Self {
            kind,
            reply: Err((status, body.to_string())),
            calls: AtomicUsize::new(0),
            credential: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        "fake-vlm"
    }

    fn prompt(&self) -> &str {
        "describe the image"
    }

    fn has_credential(&self) -> bool {
        self.credential
    }

    async fn send(&self, image: &NormalizedImage, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(image.to_data_url().starts_with("data:image/jpeg;base64,"));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, body)) => Err(DiagnosisError::Provider {
                status: *status,
                status_text: "Unauthorized".to_string(),
                body: body.clone(),
            }),
        }
    }
}
