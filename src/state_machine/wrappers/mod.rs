//! Helpers for handing system resources to [`StateMachine`](super::StateMachine)s as input.

pub mod system;
