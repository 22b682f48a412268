use std::io::{stdout, Write};

/// Sound cues fired by the session. Implementations must never fail loudly.
pub trait AudioSink {
    fn play_eat(&mut self);
    fn play_crash(&mut self);
}

impl<A: AudioSink + ?Sized> AudioSink for Box<A> {
    fn play_eat(&mut self) {
        (**self).play_eat()
    }

    fn play_crash(&mut self) {
        (**self).play_crash()
    }
}

/// Used when sound is muted or unavailable.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play_eat(&mut self) {}

    fn play_crash(&mut self) {}
}

/// Rings the terminal bell. Once a write fails the bell goes quiet for good.
#[derive(Debug)]
pub struct TerminalBell {
    broken: bool,
}

impl TerminalBell {
    pub fn new() -> Self {
        TerminalBell { broken: false }
    }

    fn ring(&mut self, times: usize) {
        self.ring_on(&mut stdout(), times);
    }

    fn ring_on<W: Write>(&mut self, out: &mut W, times: usize) {
        if self.broken {
            return;
        }

        let res = out.write_all(&b"\x07\x07"[..times.min(2)]).and_then(|_| out.flush());
        if let Err(err) = res {
            log::warn!("terminal bell unavailable, muting: {}", err);
            self.broken = true;
        }
    }
}

impl AudioSink for TerminalBell {
    fn play_eat(&mut self) {
        self.ring(1);
    }

    fn play_crash(&mut self) {
        self.ring(2);
    }
}

/// Picks the sink for this run.
pub fn select(mute: bool) -> Box<dyn AudioSink> {
    if mute {
        log::info!("audio muted");
        Box::new(Silent)
    } else {
        log::info!("audio cues on the terminal bell");
        Box::new(TerminalBell::new())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::AudioSink;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Cue {
        Eat,
        Crash,
    }

    /// Remembers every cue it was asked to play.
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub cues: Vec<Cue>,
    }

    impl AudioSink for Recorder {
        fn play_eat(&mut self) {
            self.cues.push(Cue::Eat);
        }

        fn play_crash(&mut self) {
            self.cues.push(Cue::Crash);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Cue, Recorder};
    use super::*;
    use std::io;

    #[test]
    fn test_boxed_sink_forwards() {
        let mut boxed: Box<Recorder> = Box::new(Recorder::default());
        boxed.play_eat();
        boxed.play_crash();
        assert_eq!(boxed.cues, vec![Cue::Eat, Cue::Crash]);
    }

    struct Unwritable {
        attempts: usize,
    }

    impl Write for Unwritable {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bell_rings_once_to_eat_twice_to_crash() {
        let mut bell = TerminalBell::new();
        let mut out = Vec::new();
        bell.ring_on(&mut out, 1);
        bell.ring_on(&mut out, 2);
        assert_eq!(out, b"\x07\x07\x07");
        assert!(!bell.broken);
    }

    #[test]
    fn test_bell_goes_quiet_after_a_failed_write() {
        let mut bell = TerminalBell::new();
        let mut out = Unwritable { attempts: 0 };
        bell.ring_on(&mut out, 1);
        assert!(bell.broken);
        assert_eq!(out.attempts, 1);

        bell.ring_on(&mut out, 2);
        assert_eq!(out.attempts, 1);
    }
}
