//! Log payloads and their conversion to text
//!
//! Anything that can be logged implements [`ToPayload`]. Plain text, numbers
//! and booleans convert directly; structured values go through `serde_json`
//! via the [`Json`] wrapper, which is where serialization failures surface.

use super::error::Result;
use serde::Serialize;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

/// The data carried by a single log entry
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Structured(serde_json::Value),
}

impl Payload {
    /// Render the payload as the text placed after the label.
    ///
    /// Text passes through unchanged and structured values are serialized as
    /// compact JSON. Integers and booleans use their canonical form. Floats
    /// render `NaN` and `Infinity` by name and use exponent form (`1e+21`) for
    /// very large or tiny magnitudes.
    pub fn render(&self) -> Result<String> {
        Ok(match self {
            Payload::Text(text) => text.clone(),
            Payload::Integer(n) => n.to_string(),
            Payload::Unsigned(n) => n.to_string(),
            Payload::Float(n) => render_float(*n),
            Payload::Bool(b) => b.to_string(),
            Payload::Structured(value) => serde_json::to_string(value)?,
        })
    }
}

/// Shortest round-trip form of `n`, spelled the way log readers expect:
/// `NaN`, `Infinity`, `-Infinity`, a bare `0` for either zero, and exponent
/// notation with an explicit sign outside `1e-6 <= |n| < 1e21`.
fn render_float(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let text = format!("{:e}", n);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Conversion into a [`Payload`]
pub trait ToPayload {
    fn to_payload(&self) -> Result<Payload>;
}

impl ToPayload for Payload {
    fn to_payload(&self) -> Result<Payload> {
        Ok(self.clone())
    }
}

impl ToPayload for str {
    fn to_payload(&self) -> Result<Payload> {
        Ok(Payload::Text(self.to_string()))
    }
}

impl ToPayload for String {
    fn to_payload(&self) -> Result<Payload> {
        Ok(Payload::Text(self.clone()))
    }
}

impl<T: ToPayload + ?Sized> ToPayload for &T {
    fn to_payload(&self) -> Result<Payload> {
        (**self).to_payload()
    }
}

macro_rules! impl_to_payload {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl ToPayload for $ty {
                fn to_payload(&self) -> Result<Payload> {
                    Ok(Payload::$variant(<$target>::from(*self)))
                }
            }
        )+
    };
}

impl_to_payload!(Integer as i64: i8, i16, i32, i64);
impl_to_payload!(Unsigned as u64: u8, u16, u32, u64);
impl_to_payload!(Float as f64: f32, f64);
impl_to_payload!(Bool as bool: bool);

impl ToPayload for usize {
    fn to_payload(&self) -> Result<Payload> {
        Ok(Payload::Unsigned(*self as u64))
    }
}

impl ToPayload for isize {
    fn to_payload(&self) -> Result<Payload> {
        Ok(Payload::Integer(*self as i64))
    }
}

impl ToPayload for serde_json::Value {
    fn to_payload(&self) -> Result<Payload> {
        Ok(Payload::Structured(self.clone()))
    }
}

/// Log any `Serialize` value as compact JSON.
///
/// # Examples
///
/// ```
/// use stumper::{Json, ToPayload};
/// use std::collections::BTreeMap;
///
/// let mut ports = BTreeMap::new();
/// ports.insert("http", 80);
/// let text = Json(&ports).to_payload().unwrap().render().unwrap();
/// assert_eq!(text, r#"{"http":80}"#);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Json<T>(pub T);

impl<T: Serialize> ToPayload for Json<T> {
    fn to_payload(&self) -> Result<Payload> {
        Ok(Payload::Structured(serde_json::to_value(&self.0)?))
    }
}

/// An error value caught by the caller.
///
/// Rendered as its stack text when one was captured, otherwise as
/// `[{name}] {message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaisedError {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl RaisedError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Build from an error and capture a backtrace at the call site.
    ///
    /// The backtrace is only kept when capture is enabled
    /// (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`).
    pub fn capture<E: std::error::Error + ?Sized>(error: &E) -> Self {
        Self::from_error(error).with_backtrace(&Backtrace::capture())
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: &Backtrace) -> Self {
        if backtrace.status() == BacktraceStatus::Captured {
            self.stack = Some(format!("{}: {}\n{}", self.name, self.message, backtrace));
        }
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        Self::new(short_type_name(std::any::type_name::<E>()), error.to_string())
    }
}

impl<E: std::error::Error + ?Sized> From<&E> for RaisedError {
    fn from(error: &E) -> Self {
        Self::from_error(error)
    }
}

impl fmt::Display for RaisedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stack {
            Some(ref stack) => f.write_str(stack),
            None => write!(f, "[{}] {}", self.name, self.message),
        }
    }
}

impl ToPayload for RaisedError {
    fn to_payload(&self) -> Result<Payload> {
        Ok(Payload::Text(self.to_string()))
    }
}

impl<'a> ToPayload for dyn std::error::Error + 'a {
    fn to_payload(&self) -> Result<Payload> {
        RaisedError::from(self).to_payload()
    }
}

impl<'a> ToPayload for dyn std::error::Error + Send + Sync + 'a {
    fn to_payload(&self) -> Result<Payload> {
        RaisedError::from(self).to_payload()
    }
}

/// An application exception with a numeric code.
///
/// Logged by [`Logger::caught_exception`](crate::Logger::caught_exception) with
/// the code as identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exception {
    pub message: String,
    pub error_code: i64,
    pub catastrophic: bool,
}

impl Exception {
    pub fn new(message: impl Into<String>, error_code: i64) -> Self {
        Self {
            message: message.into(),
            error_code,
            catastrophic: false,
        }
    }

    pub fn catastrophic(message: impl Into<String>, error_code: i64) -> Self {
        Self {
            catastrophic: true,
            ..Self::new(message, error_code)
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.error_code)
    }
}

impl std::error::Error for Exception {}

/// Strip module paths and generic arguments from a type name.
///
/// `std::io::error::Error` and `dyn core::error::Error + Send` both become
/// `Error`.
fn short_type_name(full: &str) -> &str {
    let full = full.trim_start_matches("dyn ");
    let base = full.split(['<', '+']).next().unwrap_or(full).trim();
    base.rsplit("::").next().unwrap_or(base)
}
