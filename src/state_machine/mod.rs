//! Pure state machines driving the recorder.
//!
//! Machines in this module never read the clock, draw random numbers, spawn tasks or await.
//! Timestamps and identifiers arrive as input, generated by the async runner in
//! [`recorder`](crate::recorder) through [`SystemResource`](wrappers::system::SystemResource).

pub mod recorder;
pub mod wrappers;

/// The [`StateMachine`] trait provides calling semantics for deterministic machines.
///
/// Inputs are grouped into the [`Input`](StateMachine::Input) type and dispatched by
/// [`process_input`](StateMachine::process_input). Results are queued inside the machine and
/// drained one at a time through [`poll_output`](StateMachine::poll_output).
///
/// # Invariants
/// Implementors must stay pure so identical input sequences always yield identical outputs:
///
/// - no interior mutability or shared ownership (`Cell`, `Mutex`, `Arc`, ...)
/// - no IO, including the system clock and system entropy
/// - no threads, no async, no blocking
///
/// Logging through `tracing` is allowed as a side effect, as long as the machine's logic never
/// depends on it.
///
/// Anything impure, like the current time, a fresh id or a captured sample, is resolved by the
/// runner that owns the machine and handed in as input. The same machine can then be replayed
/// from a recorded input sequence in tests.
pub trait StateMachine {
    /// The type of input that is [processed](StateMachine::process_input) by the state machine.
    type Input;
    /// The type of output that is [polled](StateMachine::poll_output) by the state machine.
    type Output;

    /// Process the provided `input` into the state machine.
    fn process_input(&mut self, input: Self::Input);

    /// Poll the state machine for output, returning the first available output if present.
    fn poll_output(&mut self) -> Option<Self::Output>;

    /// Process `input` and drain every output it produced, in order.
    fn dispatch(&mut self, input: Self::Input) -> Vec<Self::Output> {
        self.process_input(input);
        std::iter::from_fn(|| self.poll_output()).collect()
    }
}
