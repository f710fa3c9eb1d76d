//! Pending log records and deferred formatting
//!
//! A [`Record`] is what travels from a producer to its consumer. Producers
//! never run the formatter: a record either carries ready text, or it carries
//! the format template together with an owned copy of every argument, and the
//! consumer renders the final string when it pops the record.

use super::error::{LoggerError, Result};
use super::severity::Severity;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write};

/// A by-value capture of the arguments of one emission call.
///
/// Implemented for tuples of arity 0 through 8 whose elements are
/// `Display + Send`, so every call site monomorphizes its own capture type
/// and owns its arguments outright. Nothing in a capture may borrow from the
/// producer's stack.
pub trait ArgList: Send {
    /// Number of captured arguments.
    fn count(&self) -> usize;

    /// Render the argument at `index` into `out`.
    fn write_arg(&self, index: usize, out: &mut String) -> fmt::Result;
}

macro_rules! impl_arg_list {
    ($len:expr $(, $name:ident : $idx:tt)*) => {
        impl<$($name: fmt::Display + Send),*> ArgList for ($($name,)*) {
            fn count(&self) -> usize {
                $len
            }

            #[allow(unused_variables)]
            fn write_arg(&self, index: usize, out: &mut String) -> fmt::Result {
                match index {
                    $($idx => write!(out, "{}", self.$idx),)*
                    _ => Err(fmt::Error),
                }
            }
        }
    };
}

impl_arg_list!(0);
impl_arg_list!(1, A: 0);
impl_arg_list!(2, A: 0, B: 1);
impl_arg_list!(3, A: 0, B: 1, C: 2);
impl_arg_list!(4, A: 0, B: 1, C: 2, D: 3);
impl_arg_list!(5, A: 0, B: 1, C: 2, D: 3, E: 4);
impl_arg_list!(6, A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_arg_list!(7, A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_arg_list!(8, A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

enum Payload {
    /// Text rendered on the producer (argument-free emissions).
    Ready(String),
    /// Template plus captured arguments; rendered by the consumer.
    Deferred {
        template: String,
        args: Box<dyn ArgList>,
    },
}

/// One pending log entry.
///
/// Created on the producer inside an emit call, owned by the shard queue
/// while enqueued, handed to exactly one consumer on pop, and dropped after
/// its line reaches the sinks.
pub struct Record {
    pub severity: Severity,
    /// Capture instant, taken before the record is enqueued.
    pub timestamp: DateTime<Utc>,
    payload: Payload,
}

impl Record {
    /// Record carrying fully rendered text.
    pub fn ready(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            timestamp: Utc::now(),
            payload: Payload::Ready(text.into()),
        }
    }

    /// Record carrying a template and a by-value argument capture.
    pub fn deferred(
        severity: Severity,
        template: impl Into<String>,
        args: impl ArgList + 'static,
    ) -> Self {
        Self {
            severity,
            timestamp: Utc::now(),
            payload: Payload::Deferred {
                template: template.into(),
                args: Box::new(args),
            },
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.payload, Payload::Deferred { .. })
    }

    /// Finalize: produce the text of this record, running the formatter for
    /// deferred payloads. A template whose placeholders do not match the
    /// captured arguments yields `<formatting error: {template}>` instead of
    /// failing the consumer.
    pub fn into_message(self) -> String {
        match self.payload {
            Payload::Ready(text) => text,
            Payload::Deferred { template, args } => match render(&template, args.as_ref()) {
                Ok(text) => text,
                Err(_) => format!("<formatting error: {}>", template),
            },
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = match &self.payload {
            Payload::Ready(text) => format!("Ready({:?})", text),
            Payload::Deferred { template, args } => {
                format!("Deferred({:?}, {} args)", template, args.count())
            }
        };
        f.debug_struct("Record")
            .field("severity", &self.severity)
            .field("timestamp", &self.timestamp)
            .field("payload", &payload)
            .finish()
    }
}

/// Substitute successive `{}` placeholders in `template` with the captured
/// arguments. `{{` and `}}` escape literal braces. Anything fancier than a
/// plain `{}` placeholder, or an arity mismatch in either direction, is a
/// formatting error.
fn render(template: &str, args: &dyn ArgList) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut next_arg = 0usize;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => match chars.peek() {
                Some('{') => {
                    chars.next();
                    out.push('{');
                }
                Some('}') => {
                    chars.next();
                    if next_arg >= args.count() {
                        return Err(LoggerError::format(template));
                    }
                    args.write_arg(next_arg, &mut out)
                        .map_err(|_| LoggerError::format(template))?;
                    next_arg += 1;
                }
                _ => return Err(LoggerError::format(template)),
            },
            '}' => match chars.peek() {
                Some('}') => {
                    chars.next();
                    out.push('}');
                }
                _ => return Err(LoggerError::format(template)),
            },
            _ => out.push(c),
        }
    }

    if next_arg != args.count() {
        return Err(LoggerError::format(template));
    }
    Ok(out)
}
