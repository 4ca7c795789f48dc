pub mod auth;
pub mod calculator;
pub mod health;
pub mod leads;
pub mod proposals;
pub mod reports;
