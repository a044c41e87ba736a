pub mod impl_fake;
pub mod impl_tracing;
pub mod interface;
