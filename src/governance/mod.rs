pub mod access;
pub mod calldata;
pub mod counting;
pub mod events;
pub mod governor;
pub mod guard;
pub mod policy;
pub mod proposals;
pub mod quorum;
pub mod state;
pub mod targets;
pub mod votes;
