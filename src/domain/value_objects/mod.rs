//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`AdId`], [`TradeId`]: UUID-based identifiers
//! - [`UserId`]: String-based identifier from the identity provider
//! - [`IdGenerator`]: Seedable id generation seam
//!
//! ## Numeric Types
//!
//! - [`Price`]: Strictly-positive unit price
//! - [`FiatAmount`]: Non-negative fiat amount with minor-unit rounding
//! - [`Quantity`]: Non-negative asset quantity
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//!
//! ## Domain Enums
//!
//! - [`Asset`]: Tradeable crypto assets
//! - [`TradeSide`]: Buy or Sell
//! - [`ActorRole`]: Who performs an operation
//!
//! ## State Types
//!
//! - [`TradeState`]: Trade lifecycle state machine
//! - [`CancelReason`]: Audit cause of cancellation
//!
//! ## Settlement
//!
//! - [`UtrNumber`]: Syntactically-validated 12-digit settlement reference
//! - [`Timestamp`], [`Clock`]: Time handling with an injectable clock

pub mod actor;
pub mod arithmetic;
pub mod asset;
pub mod fiat;
pub mod ids;
pub mod price;
pub mod quantity;
pub mod timestamp;
pub mod trade_state;
pub mod utr;

pub use actor::{Actor, ActorRole};
pub use arithmetic::{round_half_up, ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use asset::{Asset, PaymentMethod, TradeSide, UnknownAssetError};
pub use fiat::FiatAmount;
pub use ids::{AdId, IdGenerator, RandomIdGenerator, SequentialIdGenerator, TradeId, UserId};
pub use price::Price;
pub use quantity::Quantity;
pub use timestamp::{Clock, ManualClock, SystemClock, Timestamp};
pub use trade_state::{CancelReason, InvalidTradeStateError, TradeState};
pub use utr::{UtrError, UtrNumber, UTR_LENGTH};
