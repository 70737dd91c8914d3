use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleSearchError {
    #[error("skeleton graph has no cycle")]
    NoCycle,
    #[error("cycle search gave up after {steps} steps without finding a cycle")]
    Exhausted { steps: usize },
}
