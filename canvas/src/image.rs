//! Background image slot with stale-load protection.
//!
//! Decoding happens asynchronously in the host. Each new source bumps a
//! generation counter and hands out an [`ImageTicket`]; a finished decode
//! only lands if its ticket is still current, so switching maps quickly never
//! shows the previous map's image.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

/// Proof that a load was requested for the slot's current source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket {
    generation: u64,
}

/// Holds the decoded background image for the current map.
#[derive(Debug)]
pub struct ImageSlot<T> {
    source: String,
    generation: u64,
    image: Option<T>,
}

impl<T> Default for ImageSlot<T> {
    fn default() -> Self {
        Self { source: String::new(), generation: 0, image: None }
    }
}

impl<T> ImageSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the slot at `source`.
    ///
    /// Returns a ticket when a decode should start. An unchanged source
    /// returns `None` and keeps the loaded image; an empty source clears it.
    pub fn request(&mut self, source: &str) -> Option<ImageTicket> {
        if source == self.source {
            return None;
        }
        self.source = source.to_owned();
        self.generation += 1;
        self.image = None;
        if source.is_empty() {
            return None;
        }
        Some(ImageTicket { generation: self.generation })
    }

    /// Store a decoded image. Returns `false` (and drops it) for a stale ticket.
    pub fn commit(&mut self, ticket: ImageTicket, image: T) -> bool {
        if !self.is_current(ticket) {
            log::debug!("discarding stale image load (generation {})", ticket.generation);
            return false;
        }
        self.image = Some(image);
        true
    }

    /// Record a failed decode for `ticket`. The slot stays empty.
    pub fn fail(&mut self, ticket: ImageTicket) {
        if self.is_current(ticket) {
            log::warn!("background image failed to decode");
        }
    }

    #[must_use]
    pub fn image(&self) -> Option<&T> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_current(&self, ticket: ImageTicket) -> bool {
        ticket.generation == self.generation
    }
}
