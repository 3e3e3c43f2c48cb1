//! EVE ESI market client.
//!
//! Fetches market and reference data from EVE Online's public ESI API:
//! - Paginated market order and history endpoints (bounded concurrent pages)
//! - Authenticated structure order books via an SSO token exchange
//! - Static reference dumps (types, regions, solar systems) with name/ID
//!   lookups
//!
//! Used by `esi-signals` for derived trading signals.

pub mod auth;
pub mod client;
pub mod history;
pub mod lookup;
pub mod orders;
pub mod sde;

pub use auth::{AccessToken, AuthError, SsoClient, SsoConfig};
pub use client::{EsiClient, EsiConfig, EsiError};
pub use history::{HistoryError, MAX_HISTORY_DAYS};
pub use lookup::LookupError;
pub use orders::{best_prices, sort_depth};
pub use sde::{InvType, Region, SdeConfig, SdeError, SolarSystem, StaticData};
