pub mod car;
pub mod insight;
pub mod negotiation;
