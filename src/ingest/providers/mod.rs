pub mod fixture;
pub mod linkedin;
