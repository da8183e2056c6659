use std::{
    io::{BufRead, Write},
    ops::ControlFlow,
    process::ExitCode,
};

use tracing::{error, warn};

use crate::{CalcError, lexer::tokenize, runtime::interpreter::evaluate};

/// What happens to the rest of the input once a line fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first failing line.
    #[default]
    Abort,
    /// Report the failing line on the diagnostic stream and keep reading.
    Report,
}

impl ErrorPolicy {
    pub fn on_error(&self, err: CalcError, diagnostics: &mut impl Write) -> ControlFlow<CalcError> {
        match self {
            Self::Abort => {
                error!(%err, "aborting");
                ControlFlow::Break(err)
            }
            Self::Report => {
                warn!(%err, "skipping line");
                match writeln!(diagnostics, "{err}") {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(e) => ControlFlow::Break(e.into()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub evaluated: usize,
    pub failed: usize,
}

impl Summary {
    pub fn exit_code(&self) -> ExitCode {
        if self.failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub fn process_line(line: &str) -> Result<String, CalcError> {
    let expression = tokenize(line)?;
    Ok(evaluate(&expression)?)
}

fn record_failure(
    line_number: usize,
    err: CalcError,
    diagnostics: &mut impl Write,
    policy: ErrorPolicy,
    summary: &mut Summary,
) -> Result<(), CalcError> {
    summary.failed += 1;
    let err = CalcError::AtLine(line_number, Box::new(err));
    match policy.on_error(err, diagnostics) {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(err) => Err(err),
    }
}

pub fn handle_line(
    line_number: usize,
    line: &str,
    output: &mut impl Write,
    diagnostics: &mut impl Write,
    policy: ErrorPolicy,
    summary: &mut Summary,
) -> Result<(), CalcError> {
    match process_line(line) {
        Ok(result) => {
            writeln!(output, "{result}")?;
            output.flush()?;
            summary.evaluated += 1;
            Ok(())
        }
        Err(err) => record_failure(line_number, err, diagnostics, policy, summary),
    }
}

/// Evaluates every line of `input` until it is exhausted. Lines are passed on with their
/// terminator so the lexer is the only place that trims them.
pub fn run(
    mut input: impl BufRead,
    mut output: impl Write,
    mut diagnostics: impl Write,
    policy: ErrorPolicy,
) -> Result<Summary, CalcError> {
    let mut summary = Summary::default();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        if input.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        match std::str::from_utf8(&buffer) {
            Ok(line) => handle_line(
                line_number,
                line,
                &mut output,
                &mut diagnostics,
                policy,
                &mut summary,
            )?,
            Err(err) => record_failure(
                line_number,
                err.into(),
                &mut diagnostics,
                policy,
                &mut summary,
            )?,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Cursor},
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::{
        lexer::LexerError,
        runtime::{interpreter::InterpreterErr, roman::RomanErr},
    };

    fn run_str(input: &str, policy: ErrorPolicy) -> (Result<Summary, CalcError>, String, String) {
        run_bytes(input.as_bytes(), policy)
    }

    fn run_bytes(input: &[u8], policy: ErrorPolicy) -> (Result<Summary, CalcError>, String, String) {
        let mut output = Vec::new();
        let mut diagnostics = Vec::new();
        let result = run(Cursor::new(input), &mut output, &mut diagnostics, policy);
        (
            result,
            String::from_utf8(output).unwrap(),
            String::from_utf8(diagnostics).unwrap(),
        )
    }

    fn inner(err: CalcError) -> (usize, CalcError) {
        match err {
            CalcError::AtLine(line, err) => (line, *err),
            other => panic!("Expected AtLine, found {other:?}"),
        }
    }

    #[test]
    fn test_run_examples() {
        let (result, output, diagnostics) =
            run_str("3 + 4\nX / II\nIX - I\n2 * 5\n", ErrorPolicy::Abort);
        assert_eq!(
            result.unwrap(),
            Summary {
                evaluated: 4,
                failed: 0
            }
        );
        assert_eq!(output, "7\nV\nVIII\n10\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_run_empty_input() {
        let (result, output, _) = run_str("", ErrorPolicy::Abort);
        assert_eq!(result.unwrap(), Summary::default());
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_without_final_newline() {
        let (result, output, _) = run_str("1 - 5", ErrorPolicy::Abort);
        assert!(result.is_ok());
        assert_eq!(output, "-4\n");
    }

    #[test]
    fn test_abort_stops_at_first_error() {
        let (result, output, diagnostics) = run_str("3 + 4\nV - V\n1 + 1\n", ErrorPolicy::Abort);
        let (line, err) = inner(result.unwrap_err());
        assert_eq!(line, 2);
        assert!(matches!(
            err,
            CalcError::Interpreter(InterpreterErr::Roman(RomanErr::NonPositiveResult(0)))
        ));
        assert_eq!(output, "7\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_abort_on_blank_line() {
        let (result, output, _) = run_str("\n3 + 4\n", ErrorPolicy::Abort);
        let (line, err) = inner(result.unwrap_err());
        assert_eq!(line, 1);
        assert!(matches!(
            err,
            CalcError::Lexer(LexerError::MalformedExpression(1))
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn test_report_continues() {
        let (result, output, diagnostics) = run_str(
            "3+4\n3 + IV\n4 / 0\nI - V\n3 % 4\n2 * 5\n",
            ErrorPolicy::Report,
        );
        let summary = result.unwrap();
        assert_eq!(
            summary,
            Summary {
                evaluated: 1,
                failed: 5
            }
        );
        assert_eq!(summary.exit_code(), ExitCode::FAILURE);
        assert_eq!(output, "10\n");

        let lines: Vec<&str> = diagnostics.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("line 1: bad expression"));
        assert!(lines[1].starts_with("line 2: incorrect members of an expression"));
        assert!(lines[2].starts_with("line 3: incorrect members of an expression"));
        assert!(lines[3].starts_with("line 4: roman number must be greater than zero"));
        assert!(lines[4].starts_with("line 5: unknown operation"));
    }

    #[test]
    fn test_process_line() {
        assert_eq!(process_line("X * X").unwrap(), "C");
        assert!(matches!(
            process_line("3 + 4 + 5"),
            Err(CalcError::Lexer(LexerError::MalformedExpression(5)))
        ));
        assert!(matches!(
            process_line("4 / 0"),
            Err(CalcError::Lexer(LexerError::UnrecognizedOperands(_, _)))
        ));
        assert!(matches!(
            process_line("I / II"),
            Err(CalcError::Interpreter(InterpreterErr::Roman(
                RomanErr::NonPositiveResult(0)
            )))
        ));
    }

    #[test]
    fn test_run_line_terminators() {
        let (result, output, _) = run_str("3 + 4\r\nX / II\n", ErrorPolicy::Abort);
        assert!(result.is_ok());
        assert_eq!(output, "7\nV\n");

        let (result, output, _) = run_str("3 + 4\r\r\n", ErrorPolicy::Abort);
        let (line, err) = inner(result.unwrap_err());
        assert_eq!(line, 1);
        assert!(matches!(
            err,
            CalcError::Lexer(LexerError::UnrecognizedOperands(_, _))
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn test_report_invalid_utf8_line() {
        let (result, output, diagnostics) =
            run_bytes(b"3 + 4\n\xff + 1\n2 * 5\n", ErrorPolicy::Report);
        assert_eq!(
            result.unwrap(),
            Summary {
                evaluated: 2,
                failed: 1
            }
        );
        assert_eq!(output, "7\n10\n");
        assert!(diagnostics.starts_with("line 2: "));
        assert_eq!(diagnostics.lines().count(), 1);
    }

    #[test]
    fn test_abort_invalid_utf8_line() {
        let (result, output, _) = run_bytes(b"\xff + 1\n3 + 4\n", ErrorPolicy::Abort);
        let (line, err) = inner(result.unwrap_err());
        assert_eq!(line, 1);
        assert!(matches!(err, CalcError::Utf8(_)));
        assert!(output.is_empty());
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_policy_log_levels() {
        let logs = SharedBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let _ = run_str("3+4\n", ErrorPolicy::Report);
            let _ = run_str("3+4\n", ErrorPolicy::Abort);
        });

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let warn = logs.lines().find(|l| l.contains("skipping line")).unwrap();
        let error = logs.lines().find(|l| l.contains("aborting")).unwrap();
        assert!(warn.contains("WARN"));
        assert!(error.contains("ERROR"));
    }
}
