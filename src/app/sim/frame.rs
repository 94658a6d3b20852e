use eframe::egui::Context;
use tracing::debug;

use super::Simulation;

/// The host's "schedule another frame" primitive.
pub(in crate::app) trait FrameHost {
    fn request_frame(&self);
}

impl FrameHost for Context {
    fn request_frame(&self) {
        self.request_repaint();
    }
}

/// Owned handle to the recurring integrate-then-draw callback.
///
/// Once cancelled (explicitly or by drop) no further frame integrates,
/// draws, or asks the host for another frame.
pub(in crate::app) struct FrameLoop<H: FrameHost> {
    host: Option<H>,
    frames: u64,
}

impl<H: FrameHost> FrameLoop<H> {
    pub fn start(host: H) -> Self {
        host.request_frame();
        debug!("frame loop started");
        Self {
            host: Some(host),
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.host.is_some()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Steps the simulation once, then draws it once.
    pub fn run_frame<R>(
        &mut self,
        sim: &mut Simulation,
        draw: impl FnOnce(&Simulation) -> R,
    ) -> Option<R> {
        let host = self.host.as_ref()?;

        sim.tick();
        let output = draw(sim);
        self.frames += 1;
        host.request_frame();

        Some(output)
    }

    pub fn cancel(&mut self) {
        if self.host.take().is_some() {
            debug!(frames = self.frames, "frame loop cancelled");
        }
    }
}

impl<H: FrameHost> Drop for FrameLoop<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::super::tests::{session_records, simulation};
    use super::*;

    #[derive(Clone, Default)]
    struct CountingHost {
        requests: Rc<Cell<u32>>,
    }

    impl FrameHost for CountingHost {
        fn request_frame(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    #[test]
    fn integrates_exactly_once_before_drawing() {
        let mut sim = simulation(&session_records(&[3, 5, 2, 8]), 800.0, 600.0);
        let mut expected = sim.clone();
        expected.tick();

        let host = CountingHost::default();
        let mut frames = FrameLoop::start(host.clone());
        let drawn = frames.run_frame(&mut sim, |state| {
            state
                .nodes()
                .iter()
                .map(|node| node.position)
                .collect::<Vec<_>>()
        });

        let expected_positions = expected
            .nodes()
            .iter()
            .map(|node| node.position)
            .collect::<Vec<_>>();
        assert_eq!(drawn, Some(expected_positions));
        assert_eq!(frames.frames(), 1);
        assert_eq!(host.requests.get(), 2);
    }

    #[test]
    fn cancelled_loop_neither_steps_nor_draws() {
        let mut sim = simulation(&session_records(&[3, 5]), 800.0, 600.0);
        let host = CountingHost::default();
        let mut frames = FrameLoop::start(host.clone());

        frames.cancel();
        let before = sim.nodes()[1].position;
        let mut drew = false;
        let result = frames.run_frame(&mut sim, |_| drew = true);

        assert!(result.is_none());
        assert!(!drew);
        assert!(!frames.is_running());
        assert_eq!(sim.nodes()[1].position, before);
        assert_eq!(host.requests.get(), 1);
    }

    #[test]
    fn dropping_the_loop_stops_scheduling() {
        let host = CountingHost::default();
        {
            let mut sim = simulation(&session_records(&[1]), 800.0, 600.0);
            let mut frames = FrameLoop::start(host.clone());
            frames.run_frame(&mut sim, |_| ());
        }
        let after_drop = host.requests.get();
        assert_eq!(after_drop, 2);
    }
}
