//! Utterance endpointing: decide where one spoken command starts and ends.
//!
//! The endpointer is driven purely by VAD flags and sample counts, so it never reads
//! the wall clock. A listen window ends in one of three ways:
//!
//! - no speech before `wait_timeout` → [`Endpoint::TimedOut`]
//! - speech followed by `gap` of silence → [`Endpoint::Complete`]
//! - speech running past `phrase_limit` → [`Endpoint::Complete`] (cut)

use std::time::Duration;
use tracing::debug;

/// Timing rules for one listen window.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub sample_rate: u32,
    /// Trailing silence that closes an utterance (default 800ms).
    pub gap: Duration,
    /// Speech shorter than this is treated as noise and dropped (default 200ms).
    pub min_speech: Duration,
    /// How long to wait for speech to begin.
    pub wait_timeout: Duration,
    /// Hard cap on utterance length once speech began.
    pub phrase_limit: Duration,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            gap: Duration::from_millis(800),
            min_speech: Duration::from_millis(200),
            wait_timeout: Duration::from_secs(8),
            phrase_limit: Duration::from_secs(5),
        }
    }
}

/// Result of feeding one chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Keep feeding audio.
    Pending,
    /// Nobody spoke within the wait timeout.
    TimedOut,
    /// A full utterance; samples run from the first speech frame to the last fed frame.
    Complete(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Waiting,
    Speaking { speech: Duration, silence: Duration },
}

pub struct Endpointer {
    config: EndpointConfig,
    state: State,
    waited: Duration,
    buffer: Vec<f32>,
}

impl Endpointer {
    pub fn new(config: EndpointConfig) -> Self {
        Self {
            config,
            state: State::Waiting,
            waited: Duration::ZERO,
            buffer: Vec::new(),
        }
    }

    fn chunk_duration(&self, samples: usize) -> Duration {
        let rate = self.config.sample_rate.max(1) as u64;
        Duration::from_micros(samples as u64 * 1_000_000 / rate)
    }

    /// Feed one VAD-classified chunk.
    pub fn push(&mut self, is_speech: bool, samples: &[f32]) -> Endpoint {
        let dt = self.chunk_duration(samples.len());

        match self.state.clone() {
            State::Waiting => {
                if is_speech {
                    debug!("speech started");
                    self.buffer.extend_from_slice(samples);
                    self.state = State::Speaking {
                        speech: dt,
                        silence: Duration::ZERO,
                    };
                    return self.check_phrase_limit();
                }
                self.waited += dt;
                if self.waited >= self.config.wait_timeout {
                    return Endpoint::TimedOut;
                }
                Endpoint::Pending
            }
            State::Speaking { speech, silence } => {
                self.buffer.extend_from_slice(samples);
                let (speech, silence) = if is_speech {
                    (speech + silence + dt, Duration::ZERO)
                } else {
                    (speech, silence + dt)
                };
                self.state = State::Speaking { speech, silence };

                if silence >= self.config.gap {
                    if speech < self.config.min_speech {
                        debug!(speech_ms = speech.as_millis() as u64, "dropping short noise burst");
                        // The discarded burst still counts against the wait timeout.
                        self.waited += speech + silence;
                        self.buffer.clear();
                        self.state = State::Waiting;
                        if self.waited >= self.config.wait_timeout {
                            return Endpoint::TimedOut;
                        }
                        return Endpoint::Pending;
                    }
                    return self.take();
                }
                self.check_phrase_limit()
            }
        }
    }

    fn check_phrase_limit(&mut self) -> Endpoint {
        if let State::Speaking { speech, silence } = self.state {
            if speech + silence >= self.config.phrase_limit {
                debug!("phrase time limit reached");
                return self.take();
            }
        }
        Endpoint::Pending
    }

    fn take(&mut self) -> Endpoint {
        self.state = State::Waiting;
        self.waited = Duration::ZERO;
        Endpoint::Complete(std::mem::take(&mut self.buffer))
    }
}
