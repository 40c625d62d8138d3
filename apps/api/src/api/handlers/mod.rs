pub mod auction;
pub mod stream;
