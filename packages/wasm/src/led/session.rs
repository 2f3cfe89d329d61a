//! LED controller session
//!
//! Owns the LED buffer, the serial connection state and the running
//! animation. The transport is abstracted behind [`CommandSink`] and time is
//! passed in explicitly, so the session is deterministic and testable.

use log::{debug, warn};
use thiserror::Error;

use super::color::Rgb;
use super::pattern::{patterns_for, Arrangement, FramePattern, PatternKind};
use super::protocol::Command;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: ConnectionState,
        action: &'static str,
    },
    #[error("LED index {index} out of range for {led_count} LEDs")]
    IndexOutOfRange { index: usize, led_count: usize },
    #[error("failed to send command: {0}")]
    Send(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectionState {
    fn transition(
        self,
        expected: ConnectionState,
        next: ConnectionState,
        action: &'static str,
    ) -> Result<Self, SessionError> {
        if self == expected {
            Ok(next)
        } else {
            Err(SessionError::InvalidTransition { from: self, action })
        }
    }

    pub fn begin_connect(self) -> Result<Self, SessionError> {
        self.transition(Self::Disconnected, Self::Connecting, "connect")
    }

    pub fn connected(self) -> Result<Self, SessionError> {
        self.transition(Self::Connecting, Self::Connected, "finish connecting")
    }

    pub fn connect_failed(self) -> Result<Self, SessionError> {
        self.transition(Self::Connecting, Self::Disconnected, "abort connecting")
    }

    pub fn begin_disconnect(self) -> Result<Self, SessionError> {
        self.transition(Self::Connected, Self::Disconnecting, "disconnect")
    }

    pub fn disconnected(self) -> Result<Self, SessionError> {
        self.transition(Self::Disconnecting, Self::Disconnected, "finish disconnecting")
    }
}

/// Write side of the serial link; receives one encoded line per call.
pub trait CommandSink {
    fn send(&mut self, line: &str) -> Result<(), SessionError>;
}

impl CommandSink for Vec<String> {
    fn send(&mut self, line: &str) -> Result<(), SessionError> {
        self.push(line.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub led_count: usize,
    pub brightness: u8,
    pub arrangement: Arrangement,
    pub baud_rate: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            led_count: 8,
            brightness: 128,
            arrangement: Arrangement::Ring,
            baud_rate: 115_200,
        }
    }
}

/// A pattern scheduled on a fixed interval. Dropping it cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledPattern {
    kind: PatternKind,
    frame: u64,
    next_due_ms: u64,
}

impl ScheduledPattern {
    fn new(kind: PatternKind, now_ms: u64) -> Self {
        Self {
            kind,
            frame: 0,
            next_due_ms: now_ms.saturating_add(kind.frame_interval_ms() as u64),
        }
    }

    /// Frame number to render at `now_ms`, if one is due. Late ticks produce a
    /// single frame rather than a burst.
    fn poll(&mut self, now_ms: u64) -> Option<u64> {
        if now_ms < self.next_due_ms {
            return None;
        }
        let frame = self.frame;
        let interval = self.kind.frame_interval_ms() as u64;
        self.frame += 1;
        self.next_due_ms = self.next_due_ms.saturating_add(interval);
        if self.next_due_ms <= now_ms {
            self.next_due_ms = now_ms.saturating_add(interval);
        }
        Some(frame)
    }
}

pub struct LedSession<S: CommandSink> {
    config: SessionConfig,
    state: ConnectionState,
    sink: Option<S>,
    leds: Vec<Rgb>,
    pattern: Option<ScheduledPattern>,
}

impl<S: CommandSink> LedSession<S> {
    pub fn new(config: SessionConfig) -> Self {
        let leds = vec![Rgb::BLACK; config.led_count];
        Self {
            config,
            state: ConnectionState::Disconnected,
            sink: None,
            leds,
            pattern: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn leds(&self) -> &[Rgb] {
        &self.leds
    }

    pub fn patterns(&self) -> &'static [PatternKind] {
        patterns_for(self.config.arrangement)
    }

    /// The writer, while connected.
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    pub fn current_pattern(&self) -> Option<PatternKind> {
        self.pattern.as_ref().map(|p| p.kind)
    }

    /// Mark the port as being opened.
    pub fn begin_connect(&mut self) -> Result<(), SessionError> {
        self.state = self.state.begin_connect()?;
        Ok(())
    }

    /// The port opened: take the writer and push the current configuration.
    pub fn finish_connect(&mut self, sink: S) -> Result<(), SessionError> {
        self.state = self.state.connected()?;
        self.sink = Some(sink);
        self.send(&Command::LedCount(self.config.led_count))?;
        self.send(&Command::Brightness(self.config.brightness))
    }

    pub fn connect_failed(&mut self) -> Result<(), SessionError> {
        self.state = self.state.connect_failed()?;
        Ok(())
    }

    pub fn connect(&mut self, sink: S) -> Result<(), SessionError> {
        self.begin_connect()?;
        self.finish_connect(sink)
    }

    /// Stop the animation and hand the writer back so the caller can close the port.
    pub fn disconnect(&mut self) -> Result<Option<S>, SessionError> {
        self.state = self.state.begin_disconnect()?;
        self.stop_pattern();
        let sink = self.sink.take();
        self.state = self.state.disconnected()?;
        debug!("disconnected");
        Ok(sink)
    }

    /// Resize the strip. All LEDs reset to black; a running pattern keeps going.
    pub fn set_layout(
        &mut self,
        led_count: usize,
        arrangement: Arrangement,
    ) -> Result<(), SessionError> {
        self.config.led_count = led_count;
        self.config.arrangement = arrangement;
        self.leds = vec![Rgb::BLACK; led_count];
        self.send(&Command::LedCount(led_count))
    }

    pub fn set_led(&mut self, index: usize, color: Rgb) -> Result<(), SessionError> {
        let led_count = self.leds.len();
        let led = self
            .leds
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, led_count })?;
        *led = color;
        self.send_frame()
    }

    pub fn fill(&mut self, color: Rgb) -> Result<(), SessionError> {
        self.stop_pattern();
        self.leds.fill(color);
        self.send_frame()
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.fill(Rgb::BLACK)
    }

    /// Give every LED a color from `next_channel`, called three times per LED.
    pub fn randomize(&mut self, mut next_channel: impl FnMut() -> u8) -> Result<(), SessionError> {
        self.stop_pattern();
        for led in &mut self.leds {
            *led = Rgb::new(next_channel(), next_channel(), next_channel());
        }
        self.send_frame()
    }

    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), SessionError> {
        self.config.brightness = brightness;
        self.send(&Command::Brightness(brightness))?;
        self.send_frame()
    }

    /// Replace any running pattern. The first frame is due one interval after `now_ms`.
    pub fn run_pattern(&mut self, mut kind: PatternKind, now_ms: u64) {
        kind.init(self.config.led_count);
        debug!(
            "running pattern {} every {} ms",
            kind.name(),
            kind.frame_interval_ms()
        );
        self.pattern = Some(ScheduledPattern::new(kind, now_ms));
    }

    pub fn stop_pattern(&mut self) {
        if let Some(p) = self.pattern.take() {
            debug!("stopped pattern {} at frame {}", p.kind.name(), p.frame);
        }
    }

    /// Advance the running pattern. Returns whether a frame was rendered.
    pub fn tick(&mut self, now_ms: u64) -> Result<bool, SessionError> {
        let Some(pattern) = self.pattern.as_mut() else {
            return Ok(false);
        };
        let Some(frame) = pattern.poll(now_ms) else {
            return Ok(false);
        };
        self.leds = pattern
            .kind
            .colors_for_frame(frame, self.config.led_count);
        self.send_frame()?;
        Ok(true)
    }

    /// The frame as it goes on the wire: brightness applied.
    pub fn frame_command(&self) -> Command {
        let brightness = self.config.brightness;
        Command::Frame(self.leds.iter().map(|c| c.scaled(brightness)).collect())
    }

    fn send_frame(&mut self) -> Result<(), SessionError> {
        let command = self.frame_command();
        self.send(&command)
    }

    /// Commands are dropped while not connected.
    fn send(&mut self, command: &Command) -> Result<(), SessionError> {
        if self.state != ConnectionState::Connected {
            return Ok(());
        }
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        let line = command.encode();
        match sink.send(&line) {
            Ok(()) => {
                debug!("sent: {}", command);
                Ok(())
            }
            Err(e) => {
                warn!("failed to send `{}`: {}", command, e);
                Err(e)
            }
        }
    }
}
