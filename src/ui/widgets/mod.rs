pub mod toast;
pub mod tweets;
