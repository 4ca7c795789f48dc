pub mod user_repo;
pub use user_repo::{UserRepository, UserStore};
pub mod proposal_repo;
pub use proposal_repo::{ProposalRepository, ProposalStore};
pub mod lead_repo;
pub use lead_repo::{LeadRepository, LeadStore};

#[cfg(test)]
pub mod memory;
