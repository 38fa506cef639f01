pub mod health;
pub mod logout;
pub mod me;
