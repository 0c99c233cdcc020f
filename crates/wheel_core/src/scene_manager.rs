//! Scene stack and transitions
//!
//! The SceneManager owns every live scene:
//! - a stack of scenes, the top one is running
//! - at most one transition between the outgoing and incoming scene
//! - the lifecycle hook ordering around pushes, pops and replacements
//!
//! # Example
//! ```ignore
//! let mut manager = SceneManager::new();
//! manager.run_with_scene(Box::new(MainScene::create(&config)?));
//!
//! // Game loop
//! manager.update(dt);
//! manager.draw(&mut batch);
//! ```

use wheel_math::Vec2;
use wheel_physics::DebugDraw;

use crate::layer::EffectDraw;
use crate::scene::{Scene, SceneError};
use crate::scene_transition::{SceneTransition, TransitionEffect};

/// Where the scene leaving the stage currently lives
enum Outgoing {
    /// Removed from the stack (pop or replace); dropped when the transition ends
    Detached(Box<dyn Scene>),
    /// Still on the stack, just below the incoming scene (push)
    Covered,
    /// Nothing was showing before
    Nothing,
}

struct PendingTransition {
    transition: SceneTransition,
    outgoing: Outgoing,
}

/// Manages a stack of scenes and the transitions between them
pub struct SceneManager {
    /// Stack of scenes (top = running)
    stack: Vec<Box<dyn Scene>>,
    pending: Option<PendingTransition>,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            pending: None,
        }
    }

    // --- Scene stack ---

    /// Show `scene` immediately, replacing whatever is running
    pub fn run_with_scene(&mut self, scene: Box<dyn Scene>) {
        self.replace_scene(scene, TransitionEffect::Instant);
    }

    /// Push a scene on top of the stack, covering the running scene
    pub fn push_scene(&mut self, mut scene: Box<dyn Scene>, effect: TransitionEffect) {
        self.finish_transition();

        let from = self.running_scene_name().unwrap_or_default().to_string();
        let outgoing = match self.stack.last_mut() {
            Some(current) => {
                current.on_exit_transition_did_start();
                Outgoing::Covered
            }
            None => Outgoing::Nothing,
        };

        log::info!("Pushing scene '{}' over '{}'", scene.name(), from);
        scene.on_enter();
        let transition = SceneTransition::new(from, scene.name(), effect);
        self.stack.push(scene);
        self.begin_transition(transition, outgoing);
    }

    /// Pop the running scene, revealing the one below it
    ///
    /// Popping the last scene leaves the stack empty.
    pub fn pop_scene(&mut self, effect: TransitionEffect) -> Result<(), SceneError> {
        self.finish_transition();

        let mut popped = self.stack.pop().ok_or(SceneError::NoRunningScene)?;
        popped.on_exit_transition_did_start();

        let to = match self.stack.last_mut() {
            Some(revealed) => {
                revealed.on_enter();
                revealed.name().to_string()
            }
            None => String::new(),
        };

        log::info!("Popping scene '{}'", popped.name());
        let transition = SceneTransition::new(popped.name(), to, effect);
        self.begin_transition(transition, Outgoing::Detached(popped));
        Ok(())
    }

    /// Replace the running scene (or start with one if the stack is empty)
    pub fn replace_scene(&mut self, mut scene: Box<dyn Scene>, effect: TransitionEffect) {
        self.finish_transition();

        let outgoing = match self.stack.pop() {
            Some(mut current) => {
                current.on_exit_transition_did_start();
                Outgoing::Detached(current)
            }
            None => Outgoing::Nothing,
        };
        let from = match &outgoing {
            Outgoing::Detached(current) => current.name().to_string(),
            _ => String::new(),
        };

        log::info!("Replacing scene '{}' with '{}'", from, scene.name());
        scene.on_enter();
        let transition = SceneTransition::new(from, scene.name(), effect);
        self.stack.push(scene);
        self.begin_transition(transition, outgoing);
    }

    /// Exit every scene and empty the stack
    pub fn end(&mut self) {
        self.finish_transition();
        while let Some(mut scene) = self.stack.pop() {
            if scene.base().is_running() {
                scene.on_exit_transition_did_start();
                scene.on_exit();
            }
            log::debug!("Ended scene '{}'", scene.name());
        }
    }

    fn begin_transition(&mut self, transition: SceneTransition, outgoing: Outgoing) {
        self.pending = Some(PendingTransition {
            transition,
            outgoing,
        });
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.transition.is_complete())
        {
            self.finish_transition();
        }
    }

    /// Complete the pending transition, firing the remaining hooks
    fn finish_transition(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.outgoing {
            Outgoing::Detached(mut scene) => scene.on_exit(),
            Outgoing::Covered => {
                let len = self.stack.len();
                if len >= 2 {
                    self.stack[len - 2].on_exit();
                }
            }
            Outgoing::Nothing => {}
        }

        if let Some(incoming) = self.stack.last_mut() {
            incoming.on_enter_transition_did_finish();
            log::debug!("Transition into '{}' finished", incoming.name());
        }
    }

    // --- Running scene access ---

    pub fn running_scene(&self) -> Option<&dyn Scene> {
        self.stack.last().map(|scene| scene.as_ref())
    }

    pub fn running_scene_mut(&mut self) -> Option<&mut Box<dyn Scene>> {
        self.stack.last_mut()
    }

    pub fn running_scene_name(&self) -> Option<&str> {
        self.stack.last().map(|scene| scene.name())
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Progress of the pending transition, if any
    pub fn transition(&self) -> Option<&SceneTransition> {
        self.pending.as_ref().map(|p| &p.transition)
    }

    // --- Frame ---

    /// Advance the transition, then update the running scene if it is scheduled
    pub fn update(&mut self, dt: f32) {
        let complete = match self.pending.as_mut() {
            Some(pending) => pending.transition.advance(dt),
            None => false,
        };
        if complete {
            self.finish_transition();
        }

        if let Some(scene) = self.stack.last_mut() {
            if scene.base().is_update_scheduled() {
                scene.update(dt);
            }
        }
    }

    /// Draw the running scene, blending with the outgoing one mid-transition
    pub fn draw(&self, out: &mut dyn DebugDraw) {
        let Some(incoming) = self.stack.last() else {
            return;
        };

        let Some(pending) = &self.pending else {
            incoming.draw(out, 1.0);
            return;
        };

        let extent = incoming.base().viewport().half_extents() * 2.0;
        let (outgoing_offset, incoming_offset) = pending.transition.slide_offsets(extent);

        let outgoing: Option<&dyn Scene> = match &pending.outgoing {
            Outgoing::Detached(scene) => Some(scene.as_ref()),
            Outgoing::Covered => {
                let len = self.stack.len();
                (len >= 2).then(|| self.stack[len - 2].as_ref())
            }
            Outgoing::Nothing => None,
        };

        if let Some(scene) = outgoing {
            draw_with_offset(scene, out, pending.transition.outgoing_alpha(), outgoing_offset);
        }
        draw_with_offset(
            incoming.as_ref(),
            out,
            pending.transition.incoming_alpha(),
            incoming_offset,
        );
    }

    /// Forward a window resize to every live scene
    pub fn resize(&mut self, width: u32, height: u32) {
        for scene in &mut self.stack {
            scene.resize(width, height);
        }
        if let Some(PendingTransition {
            outgoing: Outgoing::Detached(scene),
            ..
        }) = &mut self.pending
        {
            scene.resize(width, height);
        }
    }
}

fn draw_with_offset(scene: &dyn Scene, out: &mut dyn DebugDraw, alpha: f32, offset: Vec2) {
    if alpha <= 0.0 {
        return;
    }
    if offset == Vec2::ZERO {
        scene.draw(out, alpha);
    } else {
        let mut shifted = EffectDraw::new(out, 1.0, offset);
        scene.draw(&mut shifted, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::test_support::Recorder;
    use crate::layers::DebugLinesLayer;
    use crate::scene::SceneBase;
    use crate::viewport::Viewport;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;
    use wheel_math::Color;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Scene that records its hooks and counts updates
    struct Probe {
        base: SceneBase,
        log: Log,
        updates: u32,
    }

    impl Probe {
        fn boxed(name: &str, log: &Log) -> Box<dyn Scene> {
            let mut base = SceneBase::new(name, Viewport::new(10.0, 800, 600));
            let mut lines = DebugLinesLayer::new();
            lines.add_line(Vec2::ZERO, Vec2::X, Color::WHITE);
            base.add_layer(Box::new(lines));
            Box::new(Self {
                base,
                log: log.clone(),
                updates: 0,
            })
        }

        fn record(&self, hook: &str) {
            self.log
                .borrow_mut()
                .push(format!("{}:{}", self.base.name(), hook));
        }
    }

    impl Scene for Probe {
        fn base(&self) -> &SceneBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SceneBase {
            &mut self.base
        }

        fn on_enter(&mut self) {
            self.base.on_enter();
            self.record("enter");
        }

        fn on_exit(&mut self) {
            self.base.on_exit();
            self.record("exit");
        }

        fn on_enter_transition_did_finish(&mut self) {
            self.base.schedule_update();
            self.record("enter_finished");
        }

        fn on_exit_transition_did_start(&mut self) {
            self.base.unschedule_update();
            self.record("exit_started");
        }

        fn update(&mut self, _dt: f32) {
            self.updates += 1;
            self.base.root.tag = self.updates as i32;
        }
    }

    fn fade(ms: u64) -> TransitionEffect {
        TransitionEffect::Fade {
            duration: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_new() {
        let manager = SceneManager::new();
        assert!(manager.running_scene().is_none());
        assert_eq!(manager.stack_depth(), 0);
        assert!(!manager.is_transitioning());
    }

    #[test]
    fn test_run_with_scene_fires_enter_hooks() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("main", &log));

        assert_eq!(*log.borrow(), vec!["main:enter", "main:enter_finished"]);
        assert_eq!(manager.running_scene_name(), Some("main"));
        assert!(!manager.is_transitioning());
    }

    #[test]
    fn test_update_only_runs_when_scheduled() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("main", &log));

        manager.update(1.0 / 60.0);
        manager.update(1.0 / 60.0);
        assert_eq!(manager.running_scene().map(|s| s.base().root.tag), Some(2));

        if let Some(scene) = manager.running_scene_mut() {
            scene.on_exit_transition_did_start();
        }
        manager.update(1.0 / 60.0);
        assert_eq!(manager.running_scene().map(|s| s.base().root.tag), Some(2));
    }

    #[test]
    fn test_replace_with_transition_orders_hooks() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("a", &log));
        log.borrow_mut().clear();

        manager.replace_scene(Probe::boxed("b", &log), fade(100));
        assert_eq!(*log.borrow(), vec!["a:exit_started", "b:enter"]);
        assert!(manager.is_transitioning());

        // Incoming scene is not updated until the transition finishes
        manager.update(0.05);
        assert_eq!(manager.running_scene().map(|s| s.base().root.tag), Some(0));

        manager.update(0.06);
        assert_eq!(
            *log.borrow(),
            vec!["a:exit_started", "b:enter", "a:exit", "b:enter_finished"]
        );
        assert!(!manager.is_transitioning());
        assert_eq!(manager.stack_depth(), 1);
    }

    #[test]
    fn test_push_and_pop() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("base", &log));
        manager.push_scene(Probe::boxed("overlay", &log), TransitionEffect::Instant);
        assert_eq!(manager.stack_depth(), 2);
        assert_eq!(manager.running_scene_name(), Some("overlay"));

        log.borrow_mut().clear();
        manager.pop_scene(TransitionEffect::Instant).unwrap();
        assert_eq!(manager.running_scene_name(), Some("base"));
        assert_eq!(
            *log.borrow(),
            vec![
                "overlay:exit_started",
                "base:enter",
                "overlay:exit",
                "base:enter_finished"
            ]
        );
    }

    #[test]
    fn test_pop_empty_stack_errors() {
        let mut manager = SceneManager::new();
        assert_eq!(
            manager.pop_scene(TransitionEffect::Instant),
            Err(SceneError::NoRunningScene)
        );
    }

    #[test]
    fn test_new_transition_finishes_pending_one() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("a", &log));
        manager.replace_scene(Probe::boxed("b", &log), fade(1000));
        manager.replace_scene(Probe::boxed("c", &log), TransitionEffect::Instant);

        let entries = log.borrow();
        let a_exit = entries.iter().position(|e| e == "a:exit");
        let b_finished = entries.iter().position(|e| e == "b:enter_finished");
        assert!(a_exit.is_some());
        assert!(b_finished.is_some());
        assert_eq!(entries.last().map(String::as_str), Some("c:enter_finished"));
        assert_eq!(manager.stack_depth(), 1);
    }

    #[test]
    fn test_draw_blends_both_scenes_mid_crossfade() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("a", &log));
        manager.replace_scene(
            Probe::boxed("b", &log),
            TransitionEffect::Crossfade {
                duration: Duration::from_secs(1),
            },
        );
        manager.update(0.5);

        let mut recorder = Recorder::default();
        manager.draw(&mut recorder);
        assert_eq!(recorder.segments.len(), 2);
        for (_, _, color) in &recorder.segments {
            assert!((color.a - 0.5).abs() < 0.001);
        }
    }

    #[test]
    fn test_end_exits_everything() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("a", &log));
        manager.push_scene(Probe::boxed("b", &log), TransitionEffect::Instant);
        log.borrow_mut().clear();

        manager.end();
        assert_eq!(manager.stack_depth(), 0);
        assert_eq!(*log.borrow(), vec!["b:exit_started", "b:exit"]);
    }

    #[test]
    fn test_resize_reaches_scenes() {
        let log = Log::default();
        let mut manager = SceneManager::new();
        manager.run_with_scene(Probe::boxed("a", &log));
        manager.resize(400, 400);
        let size = manager
            .running_scene()
            .map(|s| s.base().viewport().screen_size());
        assert_eq!(size, Some((400.0, 400.0)));
    }
}
