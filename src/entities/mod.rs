//! Record types for the three collections

pub mod convert;
pub mod member;
pub mod visitor;

pub use convert::{Convert, ConvertFollowUp};
pub use member::{Member, PartialDate};
pub use visitor::{Visitor, VisitorFollowUp};
