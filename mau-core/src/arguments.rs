//! Argument metadata attached to nodes.

use crate::error::{MauError, Result};
use mau_types::Context;
use std::collections::BTreeMap;

/// Parsed arguments: positional values, `key=value` pairs, `#tags` and at
/// most one `*subtype`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub unnamed: Vec<String>,
    pub named: BTreeMap<String, String>,
    pub tags: Vec<String>,
    pub subtype: Option<String>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.unnamed.is_empty()
            && self.named.is_empty()
            && self.tags.is_empty()
            && self.subtype.is_none()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Name positional values.
    ///
    /// Names already claimed by a named argument are skipped, so the
    /// positional values shift to the next free name: with names
    /// `[a, b, c]`, the arguments `x, y, b=1` give `a=x, c=y, b=1`.
    /// Positional values left over once the names run out stay unnamed.
    /// Every name in `mandatory` must end up with a value.
    pub fn set_names(
        &mut self,
        mandatory: &[&str],
        optional: &[&str],
        context: &Context,
    ) -> Result<()> {
        let free: Vec<&str> = mandatory
            .iter()
            .chain(optional)
            .copied()
            .filter(|name| !self.named.contains_key(*name))
            .collect();

        let assigned = free.len().min(self.unnamed.len());
        let values: Vec<String> = self.unnamed.drain(..assigned).collect();
        for (name, value) in free.into_iter().zip(values) {
            self.named.insert(name.to_string(), value);
        }

        let missing: Vec<&str> = mandatory
            .iter()
            .copied()
            .filter(|name| !self.named.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(MauError::parser(
                format!("Missing mandatory argument(s): {}", missing.join(", ")),
                context.clone(),
            ));
        }

        Ok(())
    }

    /// [`set_names`](Self::set_names) for a fixed signature: positional
    /// values left over once every name is taken are an error.
    pub fn set_names_strict(
        &mut self,
        mandatory: &[&str],
        optional: &[&str],
        context: &Context,
    ) -> Result<()> {
        self.set_names(mandatory, optional, context)?;
        if !self.unnamed.is_empty() {
            return Err(MauError::parser(
                format!("Too many arguments: {}", self.unnamed.join(", ")),
                context.clone(),
            ));
        }
        Ok(())
    }
}
