pub mod diff;
pub mod versions;
