//! Background image decoding.
//!
//! An [`ImageSlot`] holds the decoded pixels of the image currently shown.
//! Encoded bytes are decoded on a short-lived worker thread; the owner calls
//! [`ImageSlot::poll`] once per frame to pick up the result. Until then the
//! slot is `Pending` and renderers draw nothing.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use image::RgbaImage;

use crate::error::RenderError;

/// Decode state of the current image.
#[derive(Debug, Default)]
pub enum SlotState {
    #[default]
    Empty,
    Pending,
    Ready(RgbaImage),
    /// Decoding failed; carries the error message.
    Failed(String),
}

type DecodeResult = Result<RgbaImage, RenderError>;

/// Decode encoded image bytes (PNG, JPEG, ...) to RGBA.
pub fn decode_bytes(data: &[u8]) -> Result<RgbaImage, RenderError> {
    let image = image::load_from_memory(data)?;
    Ok(image.to_rgba8())
}

/// Holder for one asynchronously decoded image.
#[derive(Debug, Default)]
pub struct ImageSlot {
    key: Option<String>,
    state: SlotState,
    result_rx: Option<Receiver<DecodeResult>>,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the image this slot holds or is decoding.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SlotState::Pending)
    }

    /// Decoded pixels, if ready.
    pub fn image(&self) -> Option<&RgbaImage> {
        match &self.state {
            SlotState::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Start decoding `data` for `key`, replacing whatever the slot held.
    ///
    /// A result still in flight for a previous key is discarded.
    pub fn begin(&mut self, key: impl Into<String>, data: Vec<u8>) {
        let key = key.into();
        let (result_tx, result_rx) = mpsc::channel::<DecodeResult>();

        let thread_key = key.clone();
        let spawned = thread::Builder::new()
            .name("image-decoder".to_string())
            .spawn(move || {
                log::debug!("Decoding image '{}' ({} bytes)", thread_key, data.len());
                // Receiver is gone if the slot moved on to another image
                let _ = result_tx.send(decode_bytes(&data));
            });

        self.key = Some(key);
        match spawned {
            Ok(_) => {
                self.state = SlotState::Pending;
                self.result_rx = Some(result_rx);
            }
            Err(e) => {
                log::warn!("Failed to spawn decoder thread: {}", e);
                self.state = SlotState::Failed(e.to_string());
                self.result_rx = None;
            }
        }
    }

    /// Store an already decoded image.
    pub fn set_ready(&mut self, key: impl Into<String>, image: RgbaImage) {
        self.key = Some(key.into());
        self.state = SlotState::Ready(image);
        self.result_rx = None;
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.state = SlotState::Empty;
        self.result_rx = None;
    }

    /// Check for a finished decode without blocking.
    ///
    /// Returns `true` if the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.result_rx else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.finish(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.finish(Err(RenderError::DecoderLost));
                true
            }
        }
    }

    /// Block until the pending decode finishes or `timeout` elapses.
    ///
    /// Returns `true` if the state changed.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let Some(rx) = &self.result_rx else {
            return false;
        };
        match rx.recv_timeout(timeout) {
            Ok(result) => {
                self.finish(result);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.finish(Err(RenderError::DecoderLost));
                true
            }
        }
    }

    fn finish(&mut self, result: DecodeResult) {
        self.result_rx = None;
        let key = self.key.as_deref().unwrap_or_default();
        self.state = match result {
            Ok(image) => {
                log::debug!(
                    "Decoded image '{}': {}x{}",
                    key,
                    image.width(),
                    image.height()
                );
                SlotState::Ready(image)
            }
            Err(e) => {
                log::warn!("Failed to decode image '{}': {}", key, e);
                SlotState::Failed(e.to_string())
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_bytes() {
        let image = decode_bytes(&png_bytes(4, 3)).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_slot_becomes_ready() {
        let mut slot = ImageSlot::new();
        assert!(!slot.poll());

        slot.begin("a", png_bytes(8, 8));
        assert_eq!(slot.key(), Some("a"));
        assert!(slot.is_pending());
        assert!(slot.image().is_none());

        assert!(slot.wait(Duration::from_secs(10)));
        assert_eq!(slot.image().map(|i| i.dimensions()), Some((8, 8)));
        assert!(!slot.poll());
    }

    #[test]
    fn test_slot_failure_is_not_fatal() {
        let mut slot = ImageSlot::new();
        slot.begin("broken", vec![0, 1, 2, 3]);
        assert!(slot.wait(Duration::from_secs(10)));
        assert!(matches!(slot.state(), SlotState::Failed(_)));
        assert!(slot.image().is_none());
    }

    #[test]
    fn test_newer_request_replaces_older() {
        let mut slot = ImageSlot::new();
        slot.begin("first", png_bytes(2, 2));
        slot.begin("second", png_bytes(5, 5));
        assert!(slot.wait(Duration::from_secs(10)));
        assert_eq!(slot.key(), Some("second"));
        assert_eq!(slot.image().map(|i| i.dimensions()), Some((5, 5)));
    }

    #[test]
    fn test_set_ready_and_clear() {
        let mut slot = ImageSlot::new();
        slot.set_ready("x", RgbaImage::new(3, 3));
        assert!(slot.image().is_some());
        slot.clear();
        assert!(matches!(slot.state(), SlotState::Empty));
        assert_eq!(slot.key(), None);
    }
}
