//! Network-facing pieces: the transport port and the reading frame codec.
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌───────────────────────┐
//! │ Transport │──▶│  Codec   │──▶│  SubscriberService    │
//! │ (trait)   │   │ (decode) │   │  registry → average   │
//! └───────────┘   └──────────┘   └───────────────────────┘
//!       ▲
//!       │         ┌──────────┐   ┌───────────────────────┐
//!       └─────────│  Codec   │◀──│  PublisherService     │
//!                 │ (encode) │   │  sensor → reading     │
//!                 └──────────┘   └───────────────────────┘
//! ```

pub mod codec;
pub mod transport;
