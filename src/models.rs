pub mod auth;
pub mod calculator;
pub mod lead;
pub mod proposal;
pub mod reports;
