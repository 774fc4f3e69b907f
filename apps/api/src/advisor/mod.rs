// Career advisor: one stateless request/response turn per call.
// The agent may consult tools mid-turn; the turn's tool activity is reported
// back to the caller as a step log.

pub mod handlers;
pub mod prompts;
pub mod runtime;
pub mod service;
pub mod steps;
pub mod tools;
