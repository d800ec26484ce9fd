pub mod fixture;
pub mod portal;

pub use fixture::{FixtureSource, UnreachableSource};
pub use portal::{parse_portal_body, PortalClient};
