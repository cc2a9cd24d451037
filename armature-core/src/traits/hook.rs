//! Per-step observer hook

/// Called after every command issued during a smoothed move
///
/// `step` counts from 1 to `total`. The final exact-target command is
/// always reported as `step == total`, including moves short enough to
/// jump straight to the target (`total == 1`).
pub trait StepHook {
    fn on_step(&mut self, step: u32, total: u32);
}

impl<F> StepHook for F
where
    F: FnMut(u32, u32),
{
    fn on_step(&mut self, step: u32, total: u32) {
        self(step, total)
    }
}

/// Hook that ignores every step
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl StepHook for NoHook {
    fn on_step(&mut self, _step: u32, _total: u32) {}
}
