//! Parent signature capture.
//!
//! The parent signature is required before a registration can be submitted, but how it is
//! captured depends on the host: a drawing surface, a typed name, or anything else that can
//! export a data URL. [`SignaturePad`] is that seam. The draft store only ever sees the
//! exported string, so validation and submission do not change when a new pad is added.

use base64::{engine::general_purpose, Engine as _};

/// Source of a parent signature.
pub trait SignaturePad {
    /// The captured signature as a data URL, or `None` if nothing has been captured.
    fn export(&self) -> Option<String>;
}

fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

/// A signature given as the signer's typed full name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedSignature {
    name: String,
}

impl TypedSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SignaturePad for TypedSignature {
    fn export(&self) -> Option<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(data_url("text/plain", name.as_bytes()))
    }
}

/// A hand-drawn signature rendered to PNG by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawnSignature {
    png: Vec<u8>,
}

impl DrawnSignature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current drawing with an encoded PNG image.
    pub fn set_png(&mut self, png: Vec<u8>) {
        self.png = png;
    }

    pub fn clear(&mut self) {
        self.png.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

impl SignaturePad for DrawnSignature {
    fn export(&self) -> Option<String> {
        if self.png.is_empty() {
            return None;
        }
        Some(data_url("image/png", &self.png))
    }
}
