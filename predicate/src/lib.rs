//! BondSwap Group Authorizer
//!
//! A stateless predicate deciding whether an atomic transaction group may be
//! approved on behalf of the bond exchange's delegated signing authority.
//!
//! Two group shapes are recognized:
//!
//! - **Exchange** (4 members): holder deposits the old bond, the exchange
//!   returns the same quantity of the new bond, pays the accrued coupon, and
//!   calls the redemption application with the `redeem_coupon` selector.
//! - **Opt-in** (2 members): a zero-value payment signed by the manager
//!   accompanies a zero-value asset acceptance.
//!
//! Every other shape is rejected.

pub mod params;
pub mod shape;
pub mod rejection;
pub mod authorizer;

pub use params::{BoundParameters, TemplateError};
pub use shape::GroupShape;
pub use rejection::{Field, Mode, Rejection, Verdict};
pub use authorizer::{authorize, evaluate, GroupAuthorizer, REDEEM_COUPON_SELECTOR};
