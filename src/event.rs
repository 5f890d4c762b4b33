//! Event handling.
//!
//! This library exposes an event-based interface for reacting
//! to the state changes of the emulator in real-time. [EventListeners](EventListener)
//! can be registered on the [Emulator](crate::emulator::Emulator) with the
//! [add_listener](crate::emulator::Emulator::add_listener) method.
//!
//! A blanket implementation of [EventListener] for all `Fn(&Event)` is provided.

use crate::machine::Word;

/// Represents an event that occurred while executing a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// An `INP` instruction accepted a value.
    Input {
        value: Word,
    },

    /// An `OUT` instruction emitted a value.
    Output {
        value: Word,
    },

    /// The program modified a memory location.
    MemoryChange {
        /// The address of the changed memory location.
        address: usize,

        /// New value of the changed memory location.
        data: Word,
    },

    /// The program modified the accumulator.
    AccumulatorChange {
        /// The new value of the accumulator.
        data: Word,
    },

    /// A branch instruction transferred control.
    Jump {
        /// Address of the branch instruction.
        from: usize,

        /// Address of the next instruction.
        to: usize,
    },

    /// The program executed a halt.
    Halt {
        pc: usize,
    },

    /// Execution advanced past the last memory cell and stopped.
    Exhausted {
        /// Address of the last executed instruction.
        pc: usize,
    },
}

/// Trait for consuming events.
pub trait EventListener {
    /// Called whenever a new event has been created.
    fn event(&mut self, event: &Event);
}

impl<F> EventListener for F where F: Fn(&Event) {
    fn event(&mut self, event: &Event) {
        self(event)
    }
}

pub(crate) struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventDispatcher {
    pub fn new() -> EventDispatcher {
        EventDispatcher {
            listeners: Vec::new(),
        }
    }

    pub fn add_listener<L: EventListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener) as Box<dyn EventListener>)
    }

    pub fn dispatch(&mut self, event: Event) {
        for listener in &mut self.listeners {
            listener.event(&event);
        }
    }
}
