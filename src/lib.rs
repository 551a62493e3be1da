// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ws281x_bridge` - Expose an HTTP-controlled LED strip as a color light bulb.
//!
//! Home-automation hubs model a color bulb with four characteristics: power,
//! brightness, hue and saturation. Hubs call their getters and setters
//! synchronously and expect an immediate answer, while the LED controller
//! lives on the network. [`LightProxy`] bridges the two:
//!
//! - **Getters** return the last known value at once and refresh it in the
//!   background.
//! - **Setters** update the cached value at once and send it in the
//!   background.
//! - **Failures** are logged with `tracing` and tracked in [`DeviceHealth`];
//!   they never reach the hub.
//!
//! # Controller endpoints
//!
//! | Channel    | Read (GET) | Write (POST) | Value        |
//! |------------|------------|--------------|--------------|
//! | Power      | `/GetOn`   | `/SetOn`     | boolean      |
//! | Brightness | `/GetVal`  | `/SetVal`    | 0-100        |
//! | Hue        | `/GetHue`  | `/SetHue`    | 0-359        |
//! | Saturation | `/GetSat`  | `/SetSat`    | 0-100        |
//!
//! Paths, port, scheme, timeout and body shape are configurable through
//! [`HttpConfig`] or a deserialized [`LightConfig`].
//!
//! # Quick Start
//!
//! ```no_run
//! use ws281x_bridge::LightProxy;
//! use ws281x_bridge::types::{Brightness, Hue};
//!
//! #[tokio::main]
//! async fn main() -> ws281x_bridge::Result<()> {
//!     let light = LightProxy::http("192.168.1.60").build().await?;
//!
//!     light.set_on(true);
//!     light.set_brightness(Brightness::new(75)?);
//!     light.set_hue(Hue::new(120)?);
//!
//!     // Served from the cache, no waiting on the network
//!     println!("on: {}, hue: {}", light.get_on(), light.get_hue());
//!
//!     light.wait_idle().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Pushing controller-side changes to the hub
//!
//! ```no_run
//! use ws281x_bridge::{LightProxy, Subscribable};
//!
//! # async fn example() -> ws281x_bridge::Result<()> {
//! let light = LightProxy::http("192.168.1.60").build().await?;
//!
//! light.on_hue_changed(|hue| println!("hue changed on the controller: {hue}"));
//! light.on_not_responding(|error| eprintln!("controller unreachable: {error}"));
//! # Ok(())
//! # }
//! ```

mod channel;
mod config;
pub mod error;
mod health;
pub mod protocol;
mod proxy;
pub mod response;
pub mod state;
pub mod subscription;
pub mod types;

pub use channel::{Channel, ChannelValue};
pub use config::LightConfig;
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use health::DeviceHealth;
pub use protocol::{EndpointPaths, HttpClient, HttpConfig, PayloadFormat, Protocol};
pub use proxy::{LightProxy, LightProxyBuilder};
pub use state::{LightState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{Brightness, Hue, PowerState, Saturation};
