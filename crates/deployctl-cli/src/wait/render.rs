//! Human readable task status and activity output.

use std::collections::HashSet;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use colored::Colorize;

use deployctl_core::{ActivityElement, ActivityStatus, LogElement, TaskState, TaskSummary};

const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
const INDENT_SIZE: usize = 4;
const TIMING_INDENT_LEVEL: usize = 6;
const SEPARATOR: &str = "─";
const SEPARATOR_LENGTH: usize = 29;
const TASK_HEADER_RULE: &str = "──────";
const ACTIVITY_INDENT: &str = "         ";
const LOG_LINE_INDENT: &str = "                  ";

/// Output sink shared between the foreground and the polling task.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Activity IDs that have already been printed during one wait.
#[derive(Debug, Default)]
pub struct RenderState {
    rendered: HashSet<String>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, activity_id: &str) -> bool {
        self.rendered.contains(activity_id)
    }

    fn mark(&mut self, activity_id: &str) {
        self.rendered.insert(activity_id.to_owned());
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.rendered.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Red,
    Green,
    Yellow,
}

/// Formats task summaries and activity trees as colored text lines.
#[derive(Clone)]
pub struct ProgressRenderer {
    out: SharedWriter,
    color: bool,
}

impl ProgressRenderer {
    pub fn new(out: SharedWriter, color: bool) -> Self {
        Self { out, color }
    }

    /// Renderer writing to stdout, colored when stdout is a terminal and
    /// `NO_COLOR` is unset.
    pub fn stdout() -> Self {
        let color = std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
            && io::stdout().is_terminal();
        Self::new(Arc::new(Mutex::new(io::stdout())), color)
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Print a task's status line, or a full block once it has start and end times.
    pub fn render_task_header(&self, task: &TaskSummary) -> io::Result<()> {
        let status = self.paint(task.state.as_str(), task_state_tone(&task.state));

        let text = match task.timespan() {
            Some((started, ended)) => format!(
                "\n{rule} {id} {rule}\n   Name: {name}\n   Status: {status}\n   Started: {started}\n   Ended: {ended}\n   Duration: {duration}\n",
                rule = TASK_HEADER_RULE,
                id = task.id,
                name = task.description,
                status = status,
                started = format_time(started),
                ended = format_time(ended),
                duration = format_duration(ended - started),
            ),
            None => format!("{}: {}: {}", task.id, task.description, status),
        };

        self.write_lines(&[text])
    }

    /// Print the terminal, not yet printed children of `activity`.
    ///
    /// Only direct children are considered; call again as the tree grows. Each
    /// printed child is followed by the log lines of its terminal children and
    /// recorded in `state` so it is never printed twice.
    pub fn render_activity(
        &self,
        activity: &ActivityElement,
        state: &mut RenderState,
    ) -> io::Result<()> {
        for child in &activity.children {
            if !child.status.is_terminal() || state.contains(&child.id) {
                continue;
            }

            let mut lines = vec![self.activity_line(child)];
            for step in child.children.iter().filter(|s| s.status.is_terminal()) {
                self.push_log_lines(&step.log_elements, &mut lines);
            }
            self.write_lines(&lines)?;

            state.mark(&child.id);
        }
        Ok(())
    }

    fn activity_line(&self, activity: &ActivityElement) -> String {
        let line = format!("{}{}: {}", ACTIVITY_INDENT, activity.status, activity.name);
        let mut line = self.paint(&line, activity_tone(&activity.status));

        if let Some((started, ended)) = activity.timespan() {
            let indent = " ".repeat(TIMING_INDENT_LEVEL * INDENT_SIZE);
            let separator = format!("{}{}", indent, SEPARATOR.repeat(SEPARATOR_LENGTH));
            line.push_str(&format!(
                "\n{sep}\n{ind}Started:   {}\n{ind}Ended:     {}\n{ind}Duration:  {}\n{sep}",
                format_time(started),
                format_time(ended),
                format_duration(ended - started),
                sep = separator,
                ind = indent,
            ));
        }
        line
    }

    fn push_log_lines(&self, logs: &[LogElement], lines: &mut Vec<String>) {
        let mut last_was_retry = false;
        for log in logs {
            if log.is_retry_marker() {
                let marker = format!("------ {} ------", log.message_text);
                lines.push(format!(
                    "{}{}",
                    LOG_LINE_INDENT,
                    self.paint(&marker, Some(Tone::Yellow))
                ));
                last_was_retry = true;
            } else if last_was_retry && log.message_text.contains("Starting") {
                last_was_retry = false;
            }

            let line = format!(
                "{}{:<19}      {:<8} {}",
                LOG_LINE_INDENT,
                format_time(log.occurred_at),
                log.category,
                log.message_text
            );
            lines.push(self.paint(&line, log_category_tone(&log.category)));
        }
    }

    fn paint(&self, text: &str, tone: Option<Tone>) -> String {
        match (self.color, tone) {
            (true, Some(Tone::Red)) => text.red().to_string(),
            (true, Some(Tone::Green)) => text.green().to_string(),
            (true, Some(Tone::Yellow)) => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }

    /// Write lines under a single lock so concurrent writers never interleave them.
    fn write_lines(&self, lines: &[String]) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output writer poisoned"))?;
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

fn task_state_tone(state: &TaskState) -> Option<Tone> {
    match state {
        TaskState::Failed | TaskState::TimedOut => Some(Tone::Red),
        TaskState::Success => Some(Tone::Green),
        TaskState::Queued | TaskState::Executing | TaskState::Cancelling | TaskState::Canceled => {
            Some(Tone::Yellow)
        }
        TaskState::Other(_) => None,
    }
}

fn activity_tone(status: &ActivityStatus) -> Option<Tone> {
    match status {
        ActivityStatus::Success => Some(Tone::Green),
        ActivityStatus::Failed => Some(Tone::Red),
        ActivityStatus::Skipped | ActivityStatus::SuccessWithWarning | ActivityStatus::Canceled => {
            Some(Tone::Yellow)
        }
        _ => None,
    }
}

fn log_category_tone(category: &str) -> Option<Tone> {
    match category.to_lowercase().as_str() {
        "warning" => Some(Tone::Yellow),
        "error" | "fatal" => Some(Tone::Red),
        _ => None,
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Format a duration rounded to whole seconds, e.g. `1h2m3s`, `4m0s`, `12s`.
fn format_duration(duration: chrono::Duration) -> String {
    let millis = duration.num_milliseconds().max(0);
    let total = (millis + 500) / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
