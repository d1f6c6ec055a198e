#![cfg_attr(not(test), no_std)]

//! This crate provides bring-up drivers for Novatek NT36xxx based display
//! modules: the CSOT NT36523A DSI panel and the NT36xxx family SPI touch
//! controller.
//!
//! Both devices are driven through the same [`Lifecycle`]:
//!
//! ```text
//! Idle -> PoweredOn -> Prepared -> Enabled
//! ```
//!
//! A [`Panel`] replays its vendor init table during `prepare`, a
//! [`Touchscreen`] identifies which chip of the family it talks to. Any fatal
//! failure on the way up rolls the device back to `Idle` with its supplies
//! off.
//!
//! Devices are created with a [`Builder`] or a [`TouchscreenBuilder`]:
//!
//! ```
//! use nt36xxx::{models::NT36XXX, register::RegisterBus, Lifecycle, LifecycleState, TouchscreenBuilder};
//! # struct Bus;
//! # impl RegisterBus for Bus {
//! #     type Error = core::convert::Infallible;
//! #     fn write(&mut self, _: u8, _: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn read(&mut self, _: u8, buf: &mut [u8]) -> Result<(), Self::Error> { buf.fill(0); Ok(()) }
//! # }
//! # let spi_bus = Bus;
//!
//! let touchscreen = TouchscreenBuilder::new(NT36XXX, spi_bus).build().unwrap();
//! assert_eq!(touchscreen.state(), LifecycleState::Idle);
//! ```
//!
//! The transport of each device sits behind an `embassy-sync` blocking
//! mutex. The default [`NoopRawMutex`](embassy_sync::blocking_mutex::raw::NoopRawMutex)
//! keeps a device in one execution context; `build_shared` picks another raw
//! mutex so register access can be shared.

pub mod command;
pub mod context;
pub mod dcs;
pub mod error;
pub mod identity;
pub mod interface;
pub mod lifecycle;
pub mod models;
pub mod options;
pub mod power;
pub mod register;
pub mod sequencer;

mod builder;
mod panel;
mod touchscreen;

pub use builder::*;
pub use error::Error;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use panel::{Panel, PanelError};
pub use touchscreen::{Touchscreen, TouchscreenError};

#[cfg(test)]
mod _mock;
