//! Task ID collection from arguments and piped stdin.

use std::io::{self, BufRead, IsTerminal};

use deployctl_core::{CoreError, TaskId};

/// Parse task IDs given as arguments followed by those read from `piped`.
///
/// Blank piped lines are skipped; a blank argument is an error.
pub fn collect_task_ids(
    args: &[String],
    piped: impl BufRead,
) -> Result<Vec<TaskId>, CoreError> {
    let mut ids = args
        .iter()
        .map(|arg| arg.parse())
        .collect::<Result<Vec<TaskId>, _>>()?;

    for line in piped.lines().map_while(Result::ok) {
        if let Ok(id) = line.parse() {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Task IDs from arguments and, when stdin is piped, from stdin.
pub fn task_ids_from_args_and_stdin(args: &[String]) -> Result<Vec<TaskId>, CoreError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return collect_task_ids(args, io::empty());
    }
    collect_task_ids(args, stdin.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_then_piped_lines() {
        let args = vec!["T1".to_string()];
        let piped = "T2\n\n  T3  \r\n".as_bytes();
        let ids = collect_task_ids(&args, piped).unwrap();
        assert_eq!(ids, vec![TaskId::new("T1"), TaskId::new("T2"), TaskId::new("T3")]);
    }

    #[test]
    fn test_blank_argument_rejected() {
        let args = vec![" ".to_string()];
        assert!(matches!(
            collect_task_ids(&args, io::empty()),
            Err(CoreError::InvalidTaskId(_))
        ));
    }

    #[test]
    fn test_nothing_given() {
        assert!(collect_task_ids(&[], io::empty()).unwrap().is_empty());
    }
}
