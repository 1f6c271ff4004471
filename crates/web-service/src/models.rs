pub mod common;
pub mod err;
pub mod events;
pub mod investments;
pub mod ledger;
pub mod projects;
