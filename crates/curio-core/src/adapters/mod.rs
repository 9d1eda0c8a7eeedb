pub mod artic;
pub mod fixture;

pub use artic::ArticAdapter;
pub use fixture::FixtureAdapter;
