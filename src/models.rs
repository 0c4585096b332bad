pub mod auth;
pub mod invoice;
pub mod stats;
pub mod transfer;
pub mod view;
pub mod workspace;
