//! Inbound event reconciliation

mod reconciler;

pub use reconciler::Reconciler;
