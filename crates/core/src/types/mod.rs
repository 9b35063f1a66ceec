//! Domain types for Vendor Desk.
//!
//! Everything the console reads from or writes to the vendor backend, plus
//! the traits shared by editable collections.

pub mod catalog;
pub mod coupon;
pub mod documents;
pub mod email;
pub mod entity;
pub mod id;
pub mod money;
pub mod order;
pub mod profile;
pub mod review;
pub mod shipment;
pub mod shipping;
pub mod staff;
pub mod status;
pub mod warehouse;

pub use catalog::{Attribute, Category};
pub use coupon::{Coupon, DiscountKind};
pub use documents::{KycDocument, KycStatus, Policy, PolicyKind};
pub use email::{Email, EmailError};
pub use entity::{Entity, Validate, ValidationError, require};
pub use id::*;
pub use money::{coerce_decimal, coerce_u32, format_amount};
pub use order::{Address, LineItem, Order, OrderNote};
pub use profile::VendorProfile;
pub use review::{Review, ReviewStatus, average_rating};
pub use shipment::{Carrier, Shipment, ShipmentDraft};
pub use shipping::{ShippingMethod, ShippingMethodKind, ShippingZone};
pub use staff::{StaffMember, StaffRole};
pub use status::{OrderStatus, StatusTab};
pub use warehouse::Warehouse;
