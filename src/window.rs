use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{SetSize, SetTitle};
use std::io;

/// Window operations the flow asks for when switching views
pub trait WindowControl {
    fn resize_and_move(&self, width: u16, height: u16, duration_ms: u64, x: i32, y: i32) -> Result<()>;
    fn set_always_on_top(&self, on_top: bool) -> Result<()>;
    fn minimize(&self) -> Result<()>;
}

/// Maps window requests onto the terminal emulator.
/// Sizes are in cells; moving and minimizing are not expressible and only logged.
#[derive(Debug, Clone)]
pub struct TerminalWindow {
    title: String,
}

impl TerminalWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl WindowControl for TerminalWindow {
    fn resize_and_move(&self, width: u16, height: u16, duration_ms: u64, x: i32, y: i32) -> Result<()> {
        log::debug!(
            "resize to {}x{} over {}ms (move to {},{} ignored)",
            width,
            height,
            duration_ms,
            x,
            y
        );
        execute!(io::stdout(), SetSize(width, height)).context("Failed to resize terminal")
    }

    fn set_always_on_top(&self, on_top: bool) -> Result<()> {
        let title = if on_top {
            format!("{} [focus]", self.title)
        } else {
            self.title.clone()
        };
        execute!(io::stdout(), SetTitle(title)).context("Failed to set terminal title")
    }

    fn minimize(&self) -> Result<()> {
        log::debug!("minimize requested; terminal windows cannot be minimized");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum WindowCall {
        Resize { width: u16, height: u16 },
        AlwaysOnTop(bool),
        Minimize,
    }

    /// Records every request; optionally fails them all
    #[derive(Debug, Default)]
    pub struct RecordingWindow {
        pub calls: RefCell<Vec<WindowCall>>,
        pub fail: bool,
    }

    impl RecordingWindow {
        pub fn failing() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail: true,
            }
        }

        /// The most recent always-on-top request
        pub fn last_on_top(&self) -> Option<bool> {
            self.calls.borrow().iter().rev().find_map(|c| match c {
                WindowCall::AlwaysOnTop(on) => Some(*on),
                _ => None,
            })
        }

        fn record(&self, call: WindowCall) -> Result<()> {
            self.calls.borrow_mut().push(call);
            if self.fail {
                anyhow::bail!("window server unavailable");
            }
            Ok(())
        }
    }

    impl WindowControl for RecordingWindow {
        fn resize_and_move(&self, width: u16, height: u16, _duration_ms: u64, _x: i32, _y: i32) -> Result<()> {
            self.record(WindowCall::Resize { width, height })
        }

        fn set_always_on_top(&self, on_top: bool) -> Result<()> {
            self.record(WindowCall::AlwaysOnTop(on_top))
        }

        fn minimize(&self) -> Result<()> {
            self.record(WindowCall::Minimize)
        }
    }
}
