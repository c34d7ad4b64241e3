// Tilt Timer - Mode State Machine
//
// Owns the current mode and its session record, plus the display and
// actuator services.  The control loop feeds it one timestamped sensor
// sample per iteration via `step`; it never sleeps or spawns anything.
//
//   Menu ──(face detected)──▶ Countdown ──(expired)──▶ Alarm
//     ▲                          │                       │
//     └────(debounced reorientation, 500 ms)─────────────┘

use crate::alarm::{AlarmSession, Note};
use crate::countdown::{CountdownSession, Tick};
use crate::debounce::{Debounce, DebounceGuard};
use crate::events::{Mode, SensorData};
use crate::face::{self, Face, FaceProfile};
use crate::screen::{Rotation, Screen};
use crate::services::{Actuator, Display};

/// Mode plus the session record that only exists in that mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Menu,
    Countdown(CountdownSession),
    Alarm(AlarmSession),
}

impl State {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Menu => Mode::Menu,
            Self::Countdown(_) => Mode::Countdown,
            Self::Alarm(_) => Mode::Alarm,
        }
    }

    /// Face the running session was started on.
    pub fn locked_face(&self) -> Option<Face> {
        match self {
            Self::Menu => None,
            Self::Countdown(session) => Some(session.locked_face),
            Self::Alarm(session) => Some(session.locked_face),
        }
    }
}

pub struct StateMachine<D, A> {
    display: D,
    actuator: A,
    state: State,
    debounce: DebounceGuard,
}

impl<D, A> StateMachine<D, A>
where
    D: Display,
    A: Actuator,
{
    /// Start in the menu with all outputs off and the menu on screen.
    pub fn new(display: D, actuator: A) -> Self {
        let mut machine = Self {
            display,
            actuator,
            state: State::Menu,
            debounce: DebounceGuard::new(),
        };
        machine.enter_menu();
        machine
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn debounce_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Run one control-loop iteration.  Returns the mode after the step.
    pub fn step(&mut self, now: u32, sample: SensorData) -> Mode {
        let sensed = face::classify_sample(&sample);

        // Reorientation cancels a running session before any timer is
        // serviced on this iteration.
        if let Some(locked) = self.state.locked_face() {
            if self.debounce.update(sensed, locked, now) == Debounce::Interrupted {
                log::info!(
                    "Reoriented away from {} (now {}), back to menu",
                    locked.display_name(),
                    sensed.display_name()
                );
                self.enter_menu();
                return self.mode();
            }
        }

        let next = match &mut self.state {
            State::Menu => {
                self.debounce.reset();
                FaceProfile::for_face(sensed)
                    .map(|profile| State::Countdown(CountdownSession::start(sensed, profile, now)))
            }

            State::Countdown(session) => match session.tick(now) {
                Tick::Unchanged => None,
                Tick::Decremented => {
                    log::debug!("Countdown: {} s left", session.remaining_seconds);
                    self.display.render(
                        session.rotation,
                        &Screen::Countdown {
                            remaining_seconds: session.remaining_seconds,
                        },
                    );
                    None
                }
                Tick::Expired => Some(State::Alarm(AlarmSession::start(
                    session.locked_face,
                    session.rotation,
                    now,
                ))),
            },

            State::Alarm(session) => {
                let tick = session.tick(now);
                if let Some(on) = tick.led {
                    self.actuator.set_led(on);
                }
                if let Some(note) = tick.note {
                    play(&mut self.actuator, note);
                }
                None
            }
        };

        if let Some(next) = next {
            self.enter(next);
        }
        self.mode()
    }

    fn enter(&mut self, next: State) {
        log::info!("Mode: {} -> {}", self.mode().display_name(), next.mode().display_name());
        self.state = next;

        match next {
            State::Menu => self.enter_menu(),

            State::Countdown(session) => {
                self.debounce.reset();
                log::info!(
                    "Countdown started: {} s on {} ({} axis, rotation {})",
                    session.total_seconds,
                    session.locked_face.display_name(),
                    session.axis_label,
                    session.rotation.index()
                );
                self.display.render(
                    session.rotation,
                    &Screen::Countdown {
                        remaining_seconds: session.remaining_seconds,
                    },
                );
            }

            // A mismatch already pending from the countdown keeps its start time.
            State::Alarm(session) => {
                log::info!("Time's up, alarm on {}", session.locked_face.display_name());
                self.actuator.set_led(false);
                play(&mut self.actuator, session.current_note());
                self.display.render(session.rotation, &Screen::TimesUp);
            }
        }
    }

    fn enter_menu(&mut self) {
        if self.mode() != Mode::Menu {
            log::info!("Mode: {} -> {}", self.mode().display_name(), Mode::Menu.display_name());
        }
        self.state = State::Menu;
        self.debounce.reset();

        self.actuator.set_led(false);
        self.actuator.stop_tone();
        self.display.render(Rotation::Rotate0, &Screen::Menu);
    }
}

fn play<A: Actuator>(actuator: &mut A, note: Note) {
    if note.is_rest() {
        actuator.stop_tone();
    } else {
        actuator.play_tone(note.freq_hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;
    use crate::services::Accelerometer;

    // -----------------------------------------------------------------------
    // Fakes
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct RecordingDisplay {
        frames: Vec<(Rotation, Screen)>,
    }

    impl RecordingDisplay {
        fn last(&self) -> Option<(Rotation, Screen)> {
            self.frames.last().copied()
        }
    }

    impl Display for RecordingDisplay {
        fn render(&mut self, rotation: Rotation, screen: &Screen) {
            self.frames.push((rotation, *screen));
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Command {
        Led(bool),
        Tone(u32),
        Silence,
    }

    #[derive(Default)]
    struct RecordingActuator {
        led: bool,
        tone: Option<u32>,
        commands: Vec<Command>,
    }

    impl Actuator for RecordingActuator {
        fn set_led(&mut self, on: bool) {
            self.led = on;
            self.commands.push(Command::Led(on));
        }

        fn play_tone(&mut self, freq_hz: u32) {
            self.tone = Some(freq_hz);
            self.commands.push(Command::Tone(freq_hz));
        }

        fn stop_tone(&mut self) {
            self.tone = None;
            self.commands.push(Command::Silence);
        }
    }

    /// Cube held still on one orientation.
    struct RestingCube(SensorData);

    impl RestingCube {
        fn on(face: Face) -> Self {
            let g = STANDARD_GRAVITY;
            Self(match face {
                Face::None => SensorData::new(0.0, 0.0, g),
                Face::NegY => SensorData::new(0.0, -g, 0.0),
                Face::PosX => SensorData::new(g, 0.0, 0.0),
                Face::PosY => SensorData::new(0.0, g, 0.0),
                Face::NegX => SensorData::new(-g, 0.0, 0.0),
            })
        }
    }

    impl Accelerometer for RestingCube {
        fn sample(&mut self) -> SensorData {
            self.0
        }
    }

    type Machine = StateMachine<RecordingDisplay, RecordingActuator>;

    fn machine() -> Machine {
        StateMachine::new(RecordingDisplay::default(), RecordingActuator::default())
    }

    /// Step at the 50 ms loop cadence over `[from, to]`.
    fn run(machine: &mut Machine, cube: &mut impl Accelerometer, from: u32, to: u32) {
        let mut now = from;
        while now <= to {
            machine.step(now, cube.sample());
            now += LOOP_INTERVAL_MS as u32;
        }
    }

    fn countdown(machine: &Machine) -> CountdownSession {
        match machine.state() {
            State::Countdown(session) => *session,
            other => panic!("expected countdown, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_boots_into_menu() {
        let m = machine();
        assert_eq!(m.mode(), Mode::Menu);
        assert_eq!(m.display().frames, vec![(Rotation::Rotate0, Screen::Menu)]);
        assert!(!m.actuator().led);
        assert_eq!(m.actuator().tone, None);
    }

    #[test]
    fn test_flat_cube_stays_in_menu() {
        let mut m = machine();
        run(&mut m, &mut RestingCube::on(Face::None), 0, 10_000);
        assert_eq!(m.mode(), Mode::Menu);
        assert!(!m.debounce_pending());
        assert_eq!(m.display().frames.len(), 1);
    }

    #[test]
    fn test_each_face_starts_its_countdown() {
        let cases = [
            (Face::NegY, 5, Rotation::Rotate0),
            (Face::PosX, 30, Rotation::Rotate90),
            (Face::PosY, 15, Rotation::Rotate180),
            (Face::NegX, 10, Rotation::Rotate270),
        ];

        for (face, seconds, rotation) in cases {
            let mut m = machine();
            let mut cube = RestingCube::on(face);
            assert_eq!(m.step(0, cube.sample()), Mode::Countdown);

            let session = countdown(&m);
            assert_eq!(session.locked_face, face);
            assert_eq!(session.total_seconds, seconds);
            assert_eq!(session.remaining_seconds, seconds);
            assert_eq!(session.rotation, rotation);
            assert_eq!(
                m.display().last(),
                Some((rotation, Screen::Countdown { remaining_seconds: seconds }))
            );
        }
    }

    #[test]
    fn test_countdown_renders_each_second() {
        let mut m = machine();
        let mut cube = RestingCube::on(Face::NegY);
        run(&mut m, &mut cube, 0, 5000);

        let shown: Vec<u32> = m
            .display()
            .frames
            .iter()
            .filter_map(|(_, screen)| match screen {
                Screen::Countdown { remaining_seconds } => Some(*remaining_seconds),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(m.mode(), Mode::Countdown);
    }

    #[test]
    fn test_expiry_starts_alarm() {
        let mut m = machine();
        let mut cube = RestingCube::on(Face::NegY);
        run(&mut m, &mut cube, 0, 5950);
        assert_eq!(m.mode(), Mode::Countdown);

        assert_eq!(m.step(6000, cube.sample()), Mode::Alarm);
        assert_eq!(m.display().last(), Some((Rotation::Rotate0, Screen::TimesUp)));
        assert_eq!(m.actuator().tone, Some(MELODY[0].freq_hz));
        assert!(!m.actuator().led);
    }

    #[test]
    fn test_alarm_blinks_and_plays() {
        let mut m = machine();
        let mut cube = RestingCube::on(Face::PosY);
        run(&mut m, &mut cube, 0, 16_000);
        assert_eq!(m.mode(), Mode::Alarm);

        let leds = m
            .actuator()
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Led(true)))
            .count();
        let tones = m
            .actuator()
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Tone(_)))
            .count();
        // Alarm began at 16 000 ms; nothing has toggled yet.
        assert_eq!(leds, 0);
        assert_eq!(tones, 1);

        run(&mut m, &mut cube, 16_050, 19_000);
        assert!(m.actuator().commands.contains(&Command::Led(true)));
        assert!(m.actuator().commands.contains(&Command::Tone(MELODY[5].freq_hz)));
        assert_eq!(m.mode(), Mode::Alarm);
    }

    #[test]
    fn test_brief_bump_is_ignored() {
        let mut m = machine();
        run(&mut m, &mut RestingCube::on(Face::NegY), 0, 1000);

        // Knocked onto another face for 450 ms, then back.
        run(&mut m, &mut RestingCube::on(Face::PosX), 1050, 1500);
        assert_eq!(m.mode(), Mode::Countdown);
        assert!(m.debounce_pending());

        run(&mut m, &mut RestingCube::on(Face::NegY), 1550, 1550);
        assert!(!m.debounce_pending());
        assert_eq!(countdown(&m).locked_face, Face::NegY);
    }

    #[test]
    fn test_sustained_reorientation_cancels_countdown() {
        let mut m = machine();
        run(&mut m, &mut RestingCube::on(Face::NegX), 0, 2000);
        assert_eq!(countdown(&m).remaining_seconds, 8);

        // Lying flat from 2050 ms: pending at 2050, fires at 2550.
        let mut flat = RestingCube::on(Face::None);
        run(&mut m, &mut flat, 2050, 2500);
        assert_eq!(m.mode(), Mode::Countdown);
        assert_eq!(m.step(2550, flat.sample()), Mode::Menu);

        assert_eq!(m.display().last(), Some((Rotation::Rotate0, Screen::Menu)));
        assert!(!m.debounce_pending());
        assert!(!m.actuator().led);
        assert_eq!(m.actuator().tone, None);
    }

    #[test]
    fn test_reorienting_onto_new_face_restarts_after_cancel() {
        let mut m = machine();
        run(&mut m, &mut RestingCube::on(Face::NegY), 0, 500);

        let mut cube = RestingCube::on(Face::PosY);
        run(&mut m, &mut cube, 550, 1000);
        assert_eq!(m.mode(), Mode::Countdown);
        // 500 ms after the change the session is cancelled ...
        assert_eq!(m.step(1050, cube.sample()), Mode::Menu);
        // ... and the next iteration picks the new face up from the menu.
        assert_eq!(m.step(1100, cube.sample()), Mode::Countdown);
        assert_eq!(countdown(&m).locked_face, Face::PosY);
        assert_eq!(countdown(&m).total_seconds, COUNT_POS_Y_SEC);
    }

    #[test]
    fn test_cancel_preempts_due_tick() {
        let mut m = machine();
        run(&mut m, &mut RestingCube::on(Face::NegY), 0, 400);

        let mut flat = RestingCube::on(Face::None);
        run(&mut m, &mut flat, 500, 950);
        let frames_before = m.display().frames.len();

        // At 1000 ms both the first second and the debounce window are due;
        // the countdown must not render again.
        assert_eq!(m.step(1000, flat.sample()), Mode::Menu);
        let new_frames = &m.display().frames[frames_before..];
        assert_eq!(new_frames, &[(Rotation::Rotate0, Screen::Menu)]);
    }

    #[test]
    fn test_pending_reorientation_survives_expiry() {
        let mut m = machine();
        run(&mut m, &mut RestingCube::on(Face::NegY), 0, 5650);
        assert_eq!(m.mode(), Mode::Countdown);

        // Turned over at 5700 ms; the countdown still expires at 6000 ms.
        let mut cube = RestingCube::on(Face::PosX);
        run(&mut m, &mut cube, 5700, 6150);
        assert_eq!(m.mode(), Mode::Alarm);
        assert!(m.debounce_pending());

        // 500 ms after the change, not 500 ms after the alarm began.
        assert_eq!(m.step(6200, cube.sample()), Mode::Menu);
        assert!(!m.actuator().led);
        assert_eq!(m.actuator().tone, None);
    }

    #[test]
    fn test_end_to_end_neg_y() {
        let mut m = machine();
        let mut cube = RestingCube::on(Face::NegY);

        assert_eq!(m.step(0, cube.sample()), Mode::Countdown);
        let session = countdown(&m);
        assert_eq!((session.total_seconds, session.rotation), (5, Rotation::Rotate0));

        run(&mut m, &mut cube, 50, 6000);
        assert_eq!(m.mode(), Mode::Alarm);

        run(&mut m, &mut cube, 6050, 9000);
        assert_eq!(m.mode(), Mode::Alarm);

        // Turn it over and hold.
        let mut cube = RestingCube::on(Face::PosX);
        run(&mut m, &mut cube, 9050, 9500);
        assert_eq!(m.mode(), Mode::Alarm);
        assert_eq!(m.step(9550, cube.sample()), Mode::Menu);

        assert!(!m.actuator().led);
        assert_eq!(m.actuator().tone, None);
        assert_eq!(
            &m.actuator().commands[m.actuator().commands.len() - 2..],
            &[Command::Led(false), Command::Silence]
        );
        assert_eq!(m.display().last(), Some((Rotation::Rotate0, Screen::Menu)));
    }

    #[test]
    fn test_alarm_outputs_stop_on_exit() {
        let mut m = machine();
        let mut cube = RestingCube::on(Face::NegY);
        run(&mut m, &mut cube, 0, 7000);
        assert_eq!(m.mode(), Mode::Alarm);
        assert!(m.actuator().tone.is_some());

        let mut flat = RestingCube::on(Face::None);
        run(&mut m, &mut flat, 7050, 7550);
        assert_eq!(m.mode(), Mode::Menu);
        let commands_after_exit = m.actuator().commands.len();

        // Nothing keeps sounding or blinking from the menu.
        run(&mut m, &mut flat, 7600, 12_000);
        assert_eq!(m.actuator().commands.len(), commands_after_exit);
        assert!(!m.actuator().led);
        assert_eq!(m.actuator().tone, None);
    }
}
