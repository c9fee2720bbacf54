use std::process::Command;

/// Fire-and-forget alert channel. Returns whether the alert was shown.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> bool;
}

/// Shells out to the platform notification tool:
/// osascript on macOS, notify-send on Linux
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> bool {
        if !self.enabled {
            return false;
        }

        let result = platform_command(title, body).map(|mut cmd| cmd.output());
        match result {
            Some(Ok(output)) if output.status.success() => true,
            Some(Ok(output)) => {
                log::warn!("notification '{}' exited with {}", title, output.status);
                false
            }
            Some(Err(e)) => {
                log::warn!("failed to send notification '{}': {}", title, e);
                false
            }
            None => {
                log::debug!("no notification backend on this platform for '{}'", title);
                false
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn platform_command(title: &str, body: &str) -> Option<Command> {
    let script = format!(
        r#"display notification "{}" with title "todoflow - {}""#,
        body.replace('"', "\\\""),
        title.replace('"', "\\\"")
    );
    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    Some(cmd)
}

#[cfg(target_os = "linux")]
fn platform_command(title: &str, body: &str) -> Option<Command> {
    let mut cmd = Command::new("notify-send");
    cmd.arg("--app-name=todoflow").arg(title).arg(body);
    Some(cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn platform_command(_title: &str, _body: &str) -> Option<Command> {
    None
}
