pub mod bundle;
pub mod cli;
pub mod config;
pub mod startup;
pub mod status;
