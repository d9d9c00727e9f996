//! HTTP surface for the shelfwatch alerting pipeline.
//!
//! A thin REST layer over the [`Pipeline`](shelfwatch_queue::Pipeline):
//! event ingestion, preference management, the in-app inbox, direct test
//! sends, and queue statistics. Errors are always a structured JSON body
//! with an `error` field, never a framework error page.

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{create_router, create_router_with_state, run, ServerState};
