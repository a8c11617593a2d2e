// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Current-image slot with keyed decode requests.
//!
//! Decoding is the only asynchronous step. Every request gets a ticket
//! carrying a generation number; a result whose ticket is not the latest
//! one is dropped, so a slow decode can never overwrite a newer image.
//! Installing a new handle drops the previous one.

use super::error::DecodeError;
use crate::util::geometry::Size;

/// Identifies one decode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTicket {
    generation: u64,
    source: String,
}

impl DecodeTicket {
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A decoded image: natural pixel size plus a drawable handle.
#[derive(Debug)]
pub struct DecodedImage<H> {
    pub natural: Size,
    pub handle: H,
}

/// Outcome of handing a decode result to the slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Installed,
    Failed(DecodeError),
    Stale,
}

/// Holds the drawable for one surface.
#[derive(Debug)]
pub struct ImageSlot<H> {
    generation: u64,
    pending: Option<DecodeTicket>,
    current: Option<(String, DecodedImage<H>)>,
    failure: Option<DecodeError>,
}

impl<H> Default for ImageSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ImageSlot<H> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
            current: None,
            failure: None,
        }
    }

    /// Start a decode for `source`, superseding any request in flight.
    pub fn request(&mut self, source: impl Into<String>) -> DecodeTicket {
        self.generation += 1;
        let ticket = DecodeTicket {
            generation: self.generation,
            source: source.into(),
        };
        log::debug!(
            "Requested decode #{} for {}",
            ticket.generation,
            ticket.source
        );
        self.pending = Some(ticket.clone());
        self.failure = None;
        ticket
    }

    /// Accept a decode result. Only the latest ticket is honoured.
    pub fn resolve(
        &mut self,
        ticket: &DecodeTicket,
        result: Result<DecodedImage<H>, DecodeError>,
    ) -> Resolution {
        if !self.is_current(ticket) {
            log::warn!(
                "Discarding stale decode #{} for {}",
                ticket.generation,
                ticket.source
            );
            return Resolution::Stale;
        }
        self.pending = None;
        match result {
            Ok(image) => {
                log::info!(
                    "Installed image {} ({}x{})",
                    ticket.source,
                    image.natural.width,
                    image.natural.height
                );
                // The previous handle is dropped here.
                self.current = Some((ticket.source.clone(), image));
                Resolution::Installed
            }
            Err(err) => {
                log::error!("Decode failed: {}", err);
                self.failure = Some(err.clone());
                Resolution::Failed(err)
            }
        }
    }

    /// Whether `ticket` is the request the slot is waiting on.
    pub fn is_current(&self, ticket: &DecodeTicket) -> bool {
        self.pending.as_ref() == Some(ticket)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn failure(&self) -> Option<&DecodeError> {
        self.failure.as_ref()
    }

    pub fn source(&self) -> Option<&str> {
        self.current.as_ref().map(|(source, _)| source.as_str())
    }

    pub fn handle(&self) -> Option<&H> {
        self.current.as_ref().map(|(_, image)| &image.handle)
    }

    /// Natural size of the installed image; zero until one is decoded.
    pub fn natural_size(&self) -> Size {
        self.current
            .as_ref()
            .map_or(Size::default(), |(_, image)| image.natural)
    }

    /// Release the current handle and forget any request in flight.
    pub fn clear(&mut self) {
        self.pending = None;
        self.current = None;
        self.failure = None;
    }
}
