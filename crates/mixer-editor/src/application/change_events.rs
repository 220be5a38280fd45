//! Per-field change notifications for views.
//!
//! A view subscribes once and then updates only the widget whose field
//! changed, instead of tearing down and rebuilding everything after each
//! mutation.  Events are derived by diffing the configuration before and after
//! a committed mutation, so repeating a mutation with the same value (the
//! operations are idempotent) produces no events at all.
//!
//! Subscribers receive events over a `std::sync::mpsc` channel.  Dropping the
//! `Receiver` unsubscribes; the hub prunes dead senders on the next publish.

use std::sync::mpsc::{self, Receiver, Sender};

use mixer_core::{Configuration, NoiseReduction, SliderIndex, SliderTarget};

/// Something a view may need to redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    /// A slider was created or re-targeted.
    SliderAssigned {
        index: SliderIndex,
        target: SliderTarget,
        previous: Option<SliderTarget>,
    },
    /// A slider disappeared (only possible through a whole-document save or reload).
    SliderRemoved {
        index: SliderIndex,
        previous: SliderTarget,
    },
    ComPortChanged(Option<String>),
    BaudRateChanged(u32),
    InvertSlidersChanged(bool),
    NoiseReductionChanged(NoiseReduction),
    /// The helper was launched by this session.
    HelperStarted { pid: u32 },
    /// These helper processes were terminated and have exited.
    HelperStopped { pids: Vec<u32> },
}

/// Lists the field-level differences between two configurations.
///
/// Keys outside the managed schema (`Configuration::extra`) produce no events.
pub fn diff(old: &Configuration, new: &Configuration) -> Vec<SettingsEvent> {
    let mut events = Vec::new();

    for (index, target) in new.sliders() {
        let previous = old.target(index);
        if previous != Some(target) {
            events.push(SettingsEvent::SliderAssigned {
                index,
                target: target.clone(),
                previous: previous.cloned(),
            });
        }
    }
    for (index, previous) in old.sliders() {
        if new.target(index).is_none() {
            events.push(SettingsEvent::SliderRemoved {
                index,
                previous: previous.clone(),
            });
        }
    }

    if old.com_port != new.com_port {
        events.push(SettingsEvent::ComPortChanged(new.com_port.clone()));
    }
    if old.baud_rate != new.baud_rate {
        events.push(SettingsEvent::BaudRateChanged(new.baud_rate));
    }
    if old.invert_sliders != new.invert_sliders {
        events.push(SettingsEvent::InvertSlidersChanged(new.invert_sliders));
    }
    if old.noise_reduction != new.noise_reduction {
        events.push(SettingsEvent::NoiseReductionChanged(new.noise_reduction));
    }

    events
}

/// Fan-out of [`SettingsEvent`]s to any number of subscribers.
#[derive(Default)]
pub struct EventHub {
    subscribers: Vec<Sender<SettingsEvent>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<SettingsEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers `event` to every live subscriber.
    pub fn publish(&mut self, event: SettingsEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of subscribers still connected as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
