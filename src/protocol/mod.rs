// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for communicating with the LED controller.
//!
//! The controller exposes one `Get*`/`Set*` endpoint pair per channel. The
//! [`Protocol`] trait abstracts the two operations the proxy needs, and
//! [`HttpClient`] implements them over HTTP.

mod http;
mod paths;

pub use http::{HttpClient, HttpConfig};
pub use paths::{EndpointPaths, PayloadFormat};

use std::future::Future;

use crate::channel::{Channel, ChannelValue};
use crate::error::ProtocolError;
use crate::response::ValueResponse;

/// Raw response from a channel read.
#[derive(Debug, Clone)]
pub struct ChannelResponse {
    /// The raw response body.
    body: String,
}

impl ChannelResponse {
    /// Creates a new channel response with the given body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body as a value for `channel`.
    ///
    /// # Errors
    ///
    /// Returns error if the body is not a JSON value acceptable for the channel.
    pub fn parse(&self, channel: Channel) -> Result<ChannelValue, crate::error::ParseError> {
        ValueResponse::parse(&self.body)?.decode(channel)
    }
}

/// Trait for transports that can read and write light channels.
///
/// Futures must be `Send` because the proxy runs them on detached tasks.
pub trait Protocol: Send + Sync + 'static {
    /// Reads the current value of `channel` from the controller.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the controller answers
    /// with an error status.
    fn fetch(
        &self,
        channel: Channel,
    ) -> impl Future<Output = Result<ChannelResponse, ProtocolError>> + Send;

    /// Writes `value` to the controller.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the controller answers
    /// with an error status.
    fn push(&self, value: ChannelValue) -> impl Future<Output = Result<(), ProtocolError>> + Send;
}
