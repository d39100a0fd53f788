//! Undo/redo history management.
//!
//! [`History`] keeps a linear timeline of executed [`Command`]s: one undo
//! stack, one redo stack, and nothing in flight. It is a plain value owned by
//! whoever owns the layout, so independent editors (and tests) each get their
//! own instance.

use crate::{Command, LayoutMutations};
use rackplan_core::{AppConfig, RackResult, MAX_HISTORY_DEPTH};
use std::collections::VecDeque;

/// Manages undo/redo history using reversible commands.
#[derive(Debug)]
pub struct History {
    /// Commands that can be undone (most recent = back of deque).
    undo_stack: VecDeque<Command>,

    /// Commands that can be redone (most recent = back of deque).
    /// Only ever filled by `undo`, so it is never deeper than the undo bound.
    redo_stack: VecDeque<Command>,

    max_depth: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY_DEPTH)
    }

    /// A depth of zero is treated as one.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_max_depth(config.effective_max_history_depth())
    }

    /// Apply a command and record it.
    ///
    /// Any new action invalidates the redo timeline. If the command fails,
    /// nothing is recorded and the redo stack is left alone.
    pub fn execute(
        &mut self,
        mut command: Command,
        surface: &mut dyn LayoutMutations,
    ) -> RackResult<()> {
        tracing::debug!("Executing: {}", command.description());
        if let Err(e) = command.forward(surface) {
            tracing::warn!("Command '{}' failed: {}", command.description(), e);
            return Err(e);
        }

        self.undo_stack.push_back(command);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.max_depth {
            if let Some(evicted) = self.undo_stack.pop_front() {
                tracing::debug!("History full, dropping: {}", evicted.description());
            }
        }
        Ok(())
    }

    /// Undo the most recent command. Returns `Ok(false)` when there is nothing to undo.
    ///
    /// A failing reverse leaves the command on the undo stack.
    pub fn undo(&mut self, surface: &mut dyn LayoutMutations) -> RackResult<bool> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        tracing::debug!("Undoing: {}", command.description());
        if let Err(e) = command.reverse(surface) {
            tracing::warn!("Undo of '{}' failed: {}", command.description(), e);
            self.undo_stack.push_back(command);
            return Err(e);
        }

        self.redo_stack.push_back(command);
        Ok(true)
    }

    /// Redo the most recently undone command. Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, surface: &mut dyn LayoutMutations) -> RackResult<bool> {
        let Some(mut command) = self.redo_stack.pop_back() else {
            return Ok(false);
        };

        tracing::debug!("Redoing: {}", command.description());
        if let Err(e) = command.forward(surface) {
            tracing::warn!("Redo of '{}' failed: {}", command.description(), e);
            self.redo_stack.push_back(command);
            return Err(e);
        }

        self.undo_stack.push_back(command);
        Ok(true)
    }

    /// Drop all history (called when a different document is loaded).
    pub fn clear(&mut self) {
        tracing::info!(
            "Clearing history ({} undo, {} redo)",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label for an "Undo: ..." menu item.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(Command::description)
    }

    /// Label for a "Redo: ..." menu item.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(Command::description)
    }

    /// Number of undoable commands.
    pub fn history_length(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Undoable commands, most recent first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &Command> {
        self.undo_stack.iter().rev()
    }

    /// Redoable commands, next-to-redo first.
    pub fn redo_entries(&self) -> impl Iterator<Item = &Command> {
        self.redo_stack.iter().rev()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
