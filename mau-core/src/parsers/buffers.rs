//! Single-slot staging areas of the document parser.
//!
//! Argument, label and control lines do not produce nodes: they arm a
//! buffer that the next node-producing rule drains. A new value replaces an
//! armed one.

use super::condition::Condition;
use crate::arguments::Arguments;
use crate::environment::Environment;
use crate::error::Result;
use mau_types::Context;

#[derive(Debug, Clone, PartialEq)]
pub enum Buffer<T> {
    Empty,
    Armed(T),
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Buffer::Empty
    }
}

impl<T> Buffer<T> {
    pub fn push(&mut self, value: T) {
        *self = Buffer::Armed(value);
    }

    /// Empty the buffer, returning what it held.
    pub fn take_if_armed(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Buffer::Armed(value) => Some(value),
            Buffer::Empty => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Buffer::Armed(_))
    }
}

/// `.role text`
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub role: String,
    pub text: String,
    pub context: Context,
}

/// `@if CONDITION`
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub operator: String,
    pub condition: Condition,
    pub context: Context,
}

impl Control {
    /// Whether the next node is kept.
    pub fn process(&self, environment: &Environment) -> Result<bool> {
        self.condition.evaluate(environment)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Buffers {
    pub arguments: Buffer<Arguments>,
    pub label: Buffer<Label>,
    pub control: Buffer<Control>,
}

/// Metadata drained from the buffers for one node.
#[derive(Debug, Clone, Default)]
pub struct Pending {
    pub arguments: Arguments,
    pub label: Option<Label>,
    pub control: Option<Control>,
}

impl Buffers {
    pub fn drain(&mut self) -> Pending {
        Pending {
            arguments: self.arguments.take_if_armed().unwrap_or_default(),
            label: self.label.take_if_armed(),
            control: self.control.take_if_armed(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.arguments.is_armed() && !self.label.is_armed() && !self.control.is_armed()
    }
}
