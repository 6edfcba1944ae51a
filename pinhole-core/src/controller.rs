/// Input-driven camera control
///
/// Each translation axis (plus roll) is a three-state machine driven by
/// [`CamEvent`]s. Key presses emit the event of their direction and key
/// releases emit the opposite one, so holding both keys of an axis cancels
/// out and releasing either leaves the other in effect.
use std::collections::HashMap;

use nalgebra::Vector3;

use crate::camera::Camera;
use crate::config::ControlsConfig;
use crate::error::{Error, Result};
use crate::transform::{try_normalize, Turn};

/// Directional shift requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CamEvent {
    LeftShift,
    RightShift,
    ForwardShift,
    BackwardShift,
    UpShift,
    DownShift,
    RollLeftShift,
    RollRightShift,
}

impl CamEvent {
    /// The event that cancels this one
    pub fn opposite(self) -> Self {
        match self {
            CamEvent::LeftShift => CamEvent::RightShift,
            CamEvent::RightShift => CamEvent::LeftShift,
            CamEvent::ForwardShift => CamEvent::BackwardShift,
            CamEvent::BackwardShift => CamEvent::ForwardShift,
            CamEvent::UpShift => CamEvent::DownShift,
            CamEvent::DownShift => CamEvent::UpShift,
            CamEvent::RollLeftShift => CamEvent::RollRightShift,
            CamEvent::RollRightShift => CamEvent::RollLeftShift,
        }
    }
}

/// State of one control axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Deflection {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl Deflection {
    /// Value written to the axis when this state is entered
    pub fn sign(self) -> f64 {
        match self {
            Deflection::Neutral => 0.0,
            Deflection::Positive => 1.0,
            Deflection::Negative => -1.0,
        }
    }
}

/// Table-driven finite state machine over [`Deflection`]
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    default: Deflection,
    current: Deflection,
    transitions: HashMap<(Deflection, CamEvent), Deflection>,
}

impl StateMachine {
    pub fn new(default: Deflection) -> Self {
        Self {
            default,
            current: default,
            transitions: HashMap::new(),
        }
    }

    pub fn current(&self) -> Deflection {
        self.current
    }

    pub fn add_transition(
        &mut self,
        from: Deflection,
        to: Deflection,
        trigger: CamEvent,
    ) -> Result<()> {
        if self.transitions.contains_key(&(from, trigger)) {
            return Err(Error::DuplicateTransition {
                state: from,
                trigger,
            });
        }
        self.transitions.insert((from, trigger), to);
        Ok(())
    }

    pub fn add_transitions(
        &mut self,
        from: Deflection,
        to: Deflection,
        triggers: &[CamEvent],
    ) -> Result<()> {
        triggers
            .iter()
            .try_for_each(|&trigger| self.add_transition(from, to, trigger))
    }

    /// Feed an event; returns the state entered, if a transition fired
    pub fn trigger(&mut self, event: CamEvent) -> Option<Deflection> {
        let next = *self.transitions.get(&(self.current, event))?;
        self.current = next;
        Some(next)
    }

    pub fn reset(&mut self) {
        self.current = self.default;
    }
}

/// A controllable axis of camera motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Right is positive
    Lateral,
    /// Forward is positive
    Medial,
    /// Up is positive
    Vertical,
    /// Clockwise (as seen by the camera) is positive
    Roll,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Lateral, Axis::Medial, Axis::Vertical, Axis::Roll];

    fn events(self) -> (CamEvent, CamEvent) {
        match self {
            Axis::Lateral => (CamEvent::RightShift, CamEvent::LeftShift),
            Axis::Medial => (CamEvent::ForwardShift, CamEvent::BackwardShift),
            Axis::Vertical => (CamEvent::UpShift, CamEvent::DownShift),
            Axis::Roll => (CamEvent::RollRightShift, CamEvent::RollLeftShift),
        }
    }
}

/// Neutral/positive/negative machine for one axis
#[derive(Debug, Clone)]
pub struct AxisMachine {
    axis: Axis,
    machine: StateMachine,
}

impl AxisMachine {
    pub fn new(axis: Axis, positive: CamEvent, negative: CamEvent) -> Result<Self> {
        use Deflection::*;

        let mut machine = StateMachine::new(Neutral);
        machine.add_transition(Neutral, Positive, positive)?;
        machine.add_transition(Positive, Neutral, negative)?;
        machine.add_transition(Neutral, Negative, negative)?;
        machine.add_transition(Negative, Neutral, positive)?;

        Ok(Self { axis, machine })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn state(&self) -> Deflection {
        self.machine.current()
    }

    pub fn trigger(&mut self, event: CamEvent) -> Option<Deflection> {
        self.machine.trigger(event)
    }

    pub fn reset(&mut self) {
        self.machine.reset();
    }
}

/// Camera-relative movement direction, one component per axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelativeDirection {
    pub lateral: f64,
    pub medial: f64,
    pub vertical: f64,
    pub roll: f64,
}

impl RelativeDirection {
    fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Lateral => self.lateral = value,
            Axis::Medial => self.medial = value,
            Axis::Vertical => self.vertical = value,
            Axis::Roll => self.roll = value,
        }
    }
}

/// Turns discrete input into camera velocities
#[derive(Debug, Clone)]
pub struct CameraController {
    look_sensitivity: f64,
    speed: f64,
    roll_speed: f64,
    direction: RelativeDirection,
    look: (f64, f64),
    machines: Vec<AxisMachine>,
}

impl CameraController {
    pub fn new(config: &ControlsConfig) -> Result<Self> {
        let machines = Axis::ALL
            .into_iter()
            .map(|axis| {
                let (positive, negative) = axis.events();
                AxisMachine::new(axis, positive, negative)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            look_sensitivity: config.look_sensitivity,
            speed: config.speed,
            roll_speed: config.roll_speed,
            direction: RelativeDirection::default(),
            look: (0.0, 0.0),
            machines,
        })
    }

    pub fn direction(&self) -> RelativeDirection {
        self.direction
    }

    pub fn axis_state(&self, axis: Axis) -> Deflection {
        self.machines
            .iter()
            .find(|machine| machine.axis() == axis)
            .map(AxisMachine::state)
            .unwrap_or_default()
    }

    pub fn translate_event(&mut self, event: CamEvent) {
        for machine in &mut self.machines {
            if let Some(entered) = machine.trigger(event) {
                log::trace!("{:?} axis entered {:?} on {:?}", machine.axis(), entered, event);
                self.direction.set(machine.axis(), entered.sign());
            }
        }
    }

    /// Return every axis to neutral, as if all keys were let go
    pub fn release_all(&mut self) {
        for machine in &mut self.machines {
            machine.reset();
        }
        self.direction = RelativeDirection::default();
    }

    /// Accumulate mouse motion (in screen pixels) for the current frame
    pub fn look_event(&mut self, dx: f64, dy: f64) {
        self.look.0 += dx;
        self.look.1 += dy;
    }

    /// Resolve this frame's input into the camera's velocities
    ///
    /// Mouse motion is converted to a rate so that the camera's dt-scaled
    /// update turns it by exactly `look_sensitivity` degrees per pixel. The
    /// accumulated motion is consumed.
    pub fn update(&mut self, camera: &mut Camera, dt: f64) -> Result<()> {
        let d = self.direction;
        let heading = camera.orientation() * d.medial
            + camera.image_x() * d.lateral
            + camera.image_y() * d.vertical;

        camera.velocity = if heading == Vector3::zeros() {
            Vector3::zeros()
        } else {
            try_normalize(&heading)? * self.speed
        };

        let (dx, dy) = std::mem::take(&mut self.look);
        let (yaw, pitch) = if dt > 0.0 {
            (
                -self.look_sensitivity * dx / dt,
                -self.look_sensitivity * dy / dt,
            )
        } else {
            (0.0, 0.0)
        };
        camera.angular_velocity = Turn::new(yaw, pitch, d.roll * self.roll_speed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn controller() -> CameraController {
        CameraController::new(&ControlsConfig::default()).unwrap()
    }

    fn camera() -> Camera {
        Camera::new(Point3::origin(), 360.0).unwrap()
    }

    #[test]
    fn test_duplicate_transition_rejected() {
        let mut machine = StateMachine::new(Deflection::Neutral);
        machine
            .add_transition(Deflection::Neutral, Deflection::Positive, CamEvent::UpShift)
            .unwrap();
        let result =
            machine.add_transition(Deflection::Neutral, Deflection::Negative, CamEvent::UpShift);
        assert_eq!(
            result,
            Err(Error::DuplicateTransition {
                state: Deflection::Neutral,
                trigger: CamEvent::UpShift,
            })
        );

        let result = machine.add_transitions(
            Deflection::Positive,
            Deflection::Neutral,
            &[CamEvent::DownShift, CamEvent::DownShift],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unregistered_event_is_ignored() {
        let mut machine = AxisMachine::new(Axis::Lateral, CamEvent::RightShift, CamEvent::LeftShift).unwrap();
        assert_eq!(machine.trigger(CamEvent::UpShift), None);
        assert_eq!(machine.state(), Deflection::Neutral);

        assert_eq!(machine.trigger(CamEvent::RightShift), Some(Deflection::Positive));
        // Pressing the same direction again does nothing
        assert_eq!(machine.trigger(CamEvent::RightShift), None);
        assert_eq!(machine.state(), Deflection::Positive);
    }

    #[test]
    fn test_reset() {
        let mut machine = StateMachine::new(Deflection::Neutral);
        machine
            .add_transition(Deflection::Neutral, Deflection::Negative, CamEvent::DownShift)
            .unwrap();
        machine.trigger(CamEvent::DownShift);
        assert_eq!(machine.current(), Deflection::Negative);
        machine.reset();
        assert_eq!(machine.current(), Deflection::Neutral);
    }

    #[test]
    fn test_left_press_sets_negative_lateral() {
        let mut controller = controller();
        controller.translate_event(CamEvent::LeftShift);
        assert_eq!(controller.axis_state(Axis::Lateral), Deflection::Negative);
        assert_eq!(controller.direction().lateral, -1.0);
        assert_eq!(controller.axis_state(Axis::Medial), Deflection::Neutral);
    }

    #[test]
    fn test_opposite_press_snaps_back_to_neutral() {
        let mut controller = controller();
        // left down
        controller.translate_event(CamEvent::LeftShift);
        // right down while left is held
        controller.translate_event(CamEvent::RightShift);
        assert_eq!(controller.axis_state(Axis::Lateral), Deflection::Neutral);
        assert_eq!(controller.direction().lateral, 0.0);

        // left up emits the opposite shift, leaving right in effect
        controller.translate_event(CamEvent::LeftShift.opposite());
        assert_eq!(controller.axis_state(Axis::Lateral), Deflection::Positive);
        assert_eq!(controller.direction().lateral, 1.0);
    }

    #[test]
    fn test_release_of_inactive_direction_has_no_effect() {
        let mut controller = controller();
        // right down
        controller.translate_event(CamEvent::RightShift);
        assert_eq!(controller.axis_state(Axis::Lateral), Deflection::Positive);

        // a stray left up is a RightShift, which Positive does not handle
        controller.translate_event(CamEvent::LeftShift.opposite());
        assert_eq!(controller.axis_state(Axis::Lateral), Deflection::Positive);

        // right up returns to neutral
        controller.translate_event(CamEvent::RightShift.opposite());
        assert_eq!(controller.axis_state(Axis::Lateral), Deflection::Neutral);
    }

    #[test]
    fn test_release_all_returns_to_neutral() {
        let mut controller = controller();
        controller.translate_event(CamEvent::ForwardShift);
        controller.translate_event(CamEvent::LeftShift);
        controller.translate_event(CamEvent::RollRightShift);

        controller.release_all();
        for axis in Axis::ALL {
            assert_eq!(controller.axis_state(axis), Deflection::Neutral);
        }
        assert_eq!(controller.direction(), RelativeDirection::default());

        // a stale key-up afterwards reads like a press of the other direction
        controller.translate_event(CamEvent::ForwardShift.opposite());
        assert_eq!(controller.axis_state(Axis::Medial), Deflection::Negative);
    }

    #[test]
    fn test_axes_are_independent() {
        let mut controller = controller();
        controller.translate_event(CamEvent::ForwardShift);
        controller.translate_event(CamEvent::UpShift);
        controller.translate_event(CamEvent::RollLeftShift);
        let d = controller.direction();
        assert_eq!((d.lateral, d.medial, d.vertical, d.roll), (0.0, 1.0, 1.0, -1.0));
    }

    #[test]
    fn test_velocity_follows_camera_basis() {
        let mut controller = controller();
        let mut camera = camera();

        controller.translate_event(CamEvent::ForwardShift);
        controller.update(&mut camera, 0.01).unwrap();
        assert_relative_eq!(camera.velocity, Vector3::new(400.0, 0.0, 0.0), epsilon = 1e-9);

        // Forward keeps meaning "along the orientation" after turning
        camera.rotate(&Turn::new(90.0, 0.0, 0.0)).unwrap();
        controller.update(&mut camera, 0.01).unwrap();
        assert_relative_eq!(camera.velocity, Vector3::new(0.0, 400.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_diagonal_velocity_is_normalized() {
        let mut controller = controller();
        let mut camera = camera();
        controller.translate_event(CamEvent::ForwardShift);
        controller.translate_event(CamEvent::RightShift);
        controller.update(&mut camera, 0.01).unwrap();

        assert_relative_eq!(camera.velocity.norm(), 400.0, epsilon = 1e-9);
        // right is image_x, which is -Y by default
        let s = 400.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(camera.velocity, Vector3::new(s, -s, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_neutral_means_stationary() {
        let mut controller = controller();
        let mut camera = camera();
        camera.velocity = Vector3::new(1.0, 2.0, 3.0);
        controller.update(&mut camera, 0.01).unwrap();
        assert_eq!(camera.velocity, Vector3::zeros());
        assert!(camera.angular_velocity.is_zero());
    }

    #[test]
    fn test_mouse_look_turns_by_sensitivity_per_pixel() {
        let mut controller = controller();
        let mut camera = camera();
        controller.look_event(30.0, 0.0);
        controller.look_event(20.0, -10.0);
        controller.update(&mut camera, 0.02).unwrap();

        let per_frame = camera.angular_velocity.scaled(0.02);
        assert_relative_eq!(per_frame.yaw, -5.0, epsilon = 1e-9);
        assert_relative_eq!(per_frame.pitch, 1.0, epsilon = 1e-9);

        // No inertia: without new motion the rates drop to zero
        controller.update(&mut camera, 0.02).unwrap();
        assert!(camera.angular_velocity.is_zero());
    }

    #[test]
    fn test_mouse_look_with_zero_dt() {
        let mut controller = controller();
        let mut camera = camera();
        controller.look_event(30.0, 30.0);
        controller.update(&mut camera, 0.0).unwrap();
        assert!(camera.angular_velocity.is_zero());
    }

    #[test]
    fn test_roll_rate() {
        let mut controller = controller();
        let mut camera = camera();
        controller.translate_event(CamEvent::RollRightShift);
        controller.update(&mut camera, 0.01).unwrap();
        assert_eq!(camera.angular_velocity.roll, ControlsConfig::default().roll_speed);
    }
}
