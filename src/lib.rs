//! Response adaptation core of a passthrough HTTP mediation engine.
//!
//! A completed backend response is adapted into an engine-neutral message
//! (headers normalized, redirect Location rewritten, content type inferred,
//! body pipe attached) and handed to an external processing engine, with a
//! one-shot fault notification when the engine rejects it.

pub mod adapter;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod headers;
pub mod message;
pub mod pipe;
pub mod redirect;
pub mod response;
pub mod worker;

pub use adapter::ResponseAdapter;
pub use config::TargetConfig;
pub use engine::MessageEngine;
pub use error::AdaptError;
pub use exchange::{Exchange, ExchangeOrigin, RequestContext};
pub use message::{AdaptedMessage, CoreProperties, FaultInfo};
pub use pipe::{pipe, PipeReader, PipeWriter};
pub use response::{ConnectionContext, ReceivedResponse, WireLog};
pub use worker::{dispatch, DispatchWorker};
